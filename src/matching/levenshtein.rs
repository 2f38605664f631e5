//! Levenshtein edit distance over Unicode scalar values.

/// Minimum number of single-character insertions, deletions or
/// substitutions turning `a` into `b`.
pub fn distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    let mut prev_row: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr_row: Vec<usize> = vec![0; b_chars.len() + 1];

    for (i, a_char) in a_chars.iter().enumerate() {
        curr_row[0] = i + 1;

        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = usize::from(a_char != b_char);

            curr_row[j + 1] = (prev_row[j + 1] + 1)
                .min(curr_row[j] + 1)
                .min(prev_row[j] + cost);
        }

        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[b_chars.len()]
}

/// `1 - distance / max(len)`. Two empty strings are identical (1.0).
pub fn similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - distance(a, b) as f64 / max_len as f64
}

/// One step of an edit script aligning `expected` against `actual`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOp {
    /// Both characters agree.
    Keep(char),
    /// Expected character replaced by a different actual character.
    Substitute(char),
    /// Expected character missing from the actual text.
    Delete(char),
    /// Extra character present only in the actual text.
    Insert(char),
}

/// Full-matrix alignment of `expected` against `actual` using `eq` to
/// compare characters. Ops are returned in reading order.
pub fn alignment<F>(expected: &[char], actual: &[char], eq: F) -> Vec<EditOp>
where
    F: Fn(char, char) -> bool,
{
    let rows = expected.len() + 1;
    let cols = actual.len() + 1;
    let mut matrix = vec![vec![0usize; cols]; rows];

    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..cols {
        matrix[0][j] = j;
    }

    for i in 1..rows {
        for j in 1..cols {
            let cost = usize::from(!eq(expected[i - 1], actual[j - 1]));
            matrix[i][j] = (matrix[i - 1][j] + 1)
                .min(matrix[i][j - 1] + 1)
                .min(matrix[i - 1][j - 1] + cost);
        }
    }

    let mut ops = Vec::with_capacity(rows.max(cols));
    let (mut i, mut j) = (expected.len(), actual.len());

    while i > 0 || j > 0 {
        if i > 0 && j > 0 {
            let same = eq(expected[i - 1], actual[j - 1]);
            let diagonal = matrix[i - 1][j - 1] + usize::from(!same);
            if matrix[i][j] == diagonal {
                ops.push(if same {
                    EditOp::Keep(expected[i - 1])
                } else {
                    EditOp::Substitute(expected[i - 1])
                });
                i -= 1;
                j -= 1;
                continue;
            }
        }
        if i > 0 && matrix[i][j] == matrix[i - 1][j] + 1 {
            ops.push(EditOp::Delete(expected[i - 1]));
            i -= 1;
        } else {
            ops.push(EditOp::Insert(actual[j - 1]));
            j -= 1;
        }
    }

    ops.reverse();
    ops
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_distances() {
        assert_eq!(distance("kitten", "sitting"), 3);
        assert_eq!(distance("flaw", "lawn"), 2);
        assert_eq!(distance("", "abc"), 3);
        assert_eq!(distance("abc", ""), 3);
        assert_eq!(distance("", ""), 0);
    }

    #[test]
    fn test_counts_chars_not_bytes() {
        assert_eq!(distance("café", "cafe"), 1);
        assert_eq!(distance("ñ", "n"), 1);
    }

    #[test]
    fn test_metric_properties() {
        let words = ["maison", "raison", "saison", "mais", "", "chien", "chat"];
        for a in words {
            assert_eq!(distance(a, a), 0);
            for b in words {
                assert_eq!(distance(a, b), distance(b, a));
                for c in words {
                    assert!(distance(a, c) <= distance(a, b) + distance(b, c));
                }
            }
        }
    }

    #[test]
    fn test_similarity() {
        assert_eq!(similarity("", ""), 1.0);
        assert_eq!(similarity("abc", ""), 0.0);
        assert!((similarity("chien", "chian") - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_alignment_cost_matches_distance() {
        let expected: Vec<char> = "sitting".chars().collect();
        let actual: Vec<char> = "kitten".chars().collect();
        let ops = alignment(&expected, &actual, |a, b| a == b);

        let edits = ops.iter().filter(|op| !matches!(op, EditOp::Keep(_))).count();
        assert_eq!(edits, 3);

        let rebuilt: String = ops
            .iter()
            .filter_map(|op| match op {
                EditOp::Keep(c) | EditOp::Substitute(c) | EditOp::Delete(c) => Some(*c),
                EditOp::Insert(_) => None,
            })
            .collect();
        assert_eq!(rebuilt, "sitting");
    }
}
