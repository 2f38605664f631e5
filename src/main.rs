use clap::{Parser, Subcommand};
use log::info;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use vocab_engine::config::Settings;
use vocab_engine::database::db;
use vocab_engine::export::json::{export_json_to_path, import_json};
use vocab_engine::import::duplicates::check_duplicates;
use vocab_engine::matching::{self, DiffSegment, Strictness};
use vocab_engine::models::difficulty::classify;
use vocab_engine::models::sm2::{calculate_next_review, preview_intervals};
use vocab_engine::models::{
    Answer, HumanRating, ImportCandidate, LearningSession, Placement, QualityRating, Scope,
};
use vocab_engine::Result;

#[derive(Parser)]
#[command(name = "vocab", about = "Vocabulary drills with spaced repetition")]
struct Cli {
    /// Settings file (created with defaults when missing)
    #[arg(long, default_value = "vocab.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Clone, Copy)]
struct ScopeArgs {
    #[arg(long)]
    book: Option<i64>,
    #[arg(long)]
    chapter: Option<i64>,
    #[arg(long)]
    section: Option<i64>,
    /// Use every item regardless of placement
    #[arg(long)]
    all: bool,
}

impl ScopeArgs {
    fn placement(&self) -> Placement {
        Placement {
            book_id: self.book,
            chapter_id: self.chapter,
            section_id: self.section,
        }
    }

    fn scope(&self) -> Scope {
        if self.all {
            Scope::All
        } else {
            Scope::of(&self.placement())
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Check a typed answer
    Check {
        expected: String,
        actual: String,
        #[arg(long)]
        strictness: Option<Strictness>,
    },
    /// Check a speech transcript
    Voice {
        expected: String,
        transcript: String,
        #[arg(long)]
        language: Option<String>,
    },
    /// Add one item
    Add {
        source: String,
        target: String,
        #[arg(long)]
        notes: Option<String>,
        #[command(flatten)]
        scope: ScopeArgs,
    },
    /// Import items from JSON, skipping duplicates unless forced
    Import {
        file: PathBuf,
        #[arg(long)]
        force: bool,
        #[command(flatten)]
        scope: ScopeArgs,
    },
    /// Export a scope to JSON
    Export {
        file: PathBuf,
        #[command(flatten)]
        scope: ScopeArgs,
    },
    /// List items due today
    Due {
        #[command(flatten)]
        scope: ScopeArgs,
    },
    /// Grade an item directly with a 0-5 quality
    Grade { item_id: i64, quality: u8 },
    /// Move the simulated date forward one day
    AdvanceDay,
    /// Show progress and difficulty for an item
    Stats { item_id: i64 },
    /// Practice due items interactively
    Practice {
        /// typed, voice or rated
        #[arg(long, default_value = "typed")]
        mode: String,
        #[command(flatten)]
        scope: ScopeArgs,
    },
    /// Soft-delete an item
    Delete { item_id: i64 },
}

fn render_diff(segments: &[DiffSegment]) -> String {
    segments
        .iter()
        .map(|segment| {
            if segment.is_highlighted {
                format!("[{}]", segment.text)
            } else {
                segment.text.clone()
            }
        })
        .collect()
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load(&cli.config);

    match cli.command {
        Command::Check {
            expected,
            actual,
            strictness,
        } => {
            let strictness = strictness.unwrap_or(settings.strictness);
            let check = matching::check_answer(&expected, &actual, strictness);
            println!(
                "{} (similarity {:.2}, distance {})",
                if check.is_correct { "correct" } else { "incorrect" },
                check.similarity,
                check.distance
            );
            if !check.is_correct {
                if matching::has_accent_mismatch_only(&expected, &actual) {
                    println!("almost: only the accents differ");
                }
                println!("{}", render_diff(&matching::highlight_differences(&expected, &actual)));
            }
            Ok(())
        }
        Command::Voice {
            expected,
            transcript,
            language,
        } => {
            let language = language.unwrap_or_else(|| settings.foreign_language.clone());
            let result = matching::combined_match(&transcript, &expected, &language);
            println!(
                "{} ({:?}, confidence {:.2})",
                if result.is_correct { "match" } else { "no match" },
                result.match_type,
                result.similarity
            );
            Ok(())
        }
        command => run_with_store(command, &settings),
    }
}

fn run_with_store(command: Command, settings: &Settings) -> Result<()> {
    let conn = db::init_database(&settings.database_path)?;

    match command {
        Command::Check { .. } | Command::Voice { .. } => {}
        Command::Add {
            source,
            target,
            notes,
            scope,
        } => {
            let candidate = ImportCandidate {
                source_text: source,
                target_text: target,
                notes,
            };
            let id = db::add_vocabulary_item(&candidate, &scope.placement(), &conn)?;
            println!("Added item {}", id);
        }
        Command::Import { file, force, scope } => {
            let candidates = import_json(&file)?;
            let duplicates = check_duplicates(
                &candidates,
                scope.scope(),
                &settings.duplicate_options(),
                &conn,
            )?;

            let mut added = 0;
            for (index, candidate) in candidates.iter().enumerate() {
                if let Some(duplicate) = duplicates.get(&index) {
                    println!(
                        "#{} '{}' duplicates item {} ({:.0}%){}",
                        index,
                        candidate.source_text,
                        duplicate.duplicate_of,
                        duplicate.similarity * 100.0,
                        if force { ", inserting anyway" } else { ", skipped" }
                    );
                    if !force {
                        continue;
                    }
                }
                db::add_vocabulary_item(candidate, &scope.placement(), &conn)?;
                added += 1;
            }
            println!("Imported {} of {} items", added, candidates.len());
        }
        Command::Export { file, scope } => {
            let items = db::load_scope(scope.scope(), &conn)?;
            export_json_to_path(&items, &file)?;
            println!("Exported {} items to {}", items.len(), file.display());
        }
        Command::Due { scope } => {
            let today = db::get_current_date(&conn)?;
            let due = db::get_items_due_for_review(scope.scope(), &conn)?;
            println!("{} items due on {}", due.len(), today);
            for (item, progress) in due {
                let status = match progress {
                    Some(p) => format!("due {}, {} reviews", p.next_review_date, p.total_reviews),
                    None => "new".to_string(),
                };
                println!("  {:>4}  {} = {}  ({})", item.id, item.source_text, item.target_text, status);
            }
        }
        Command::Grade { item_id, quality } => {
            db::get_vocabulary_item(item_id, &conn)?;
            let today = db::get_current_date(&conn)?;
            let previous = db::get_progress(item_id, &conn)?;
            let progress =
                calculate_next_review(previous.as_ref(), item_id, QualityRating::new(quality), today);
            db::save_progress(&progress, &conn)?;
            println!(
                "Next review {} (interval {}d, ease {:.2})",
                progress.next_review_date, progress.interval, progress.ease_factor
            );
        }
        Command::AdvanceDay => {
            let date = db::advance_day(&conn)?;
            println!("Current date is now {}", date);
        }
        Command::Stats { item_id } => {
            let item = db::get_vocabulary_item(item_id, &conn)?;
            let today = db::get_current_date(&conn)?;
            let progress = db::get_progress(item_id, &conn)?;
            println!("{} = {}", item.source_text, item.target_text);
            match &progress {
                Some(p) => {
                    println!(
                        "ease {:.2}, interval {}d, streak {}, {}/{} correct, next {}",
                        p.ease_factor,
                        p.interval,
                        p.repetitions,
                        p.correct_reviews,
                        p.total_reviews,
                        p.next_review_date
                    );
                    if let Some(tier) = classify(p) {
                        println!("difficulty: {:?}", tier);
                    }
                }
                None => println!("never reviewed"),
            }
            let [again, hard, good] = preview_intervals(progress.as_ref(), item_id, today);
            println!("again {}d / hard {}d / good {}d", again, hard, good);
        }
        Command::Practice { mode, scope } => {
            practice(&conn, settings, scope.scope(), &mode)?;
        }
        Command::Delete { item_id } => {
            db::soft_delete_item(item_id, &conn)?;
            println!("Deleted item {}", item_id);
        }
    }

    Ok(())
}

fn practice(conn: &rusqlite::Connection, settings: &Settings, scope: Scope, mode: &str) -> Result<()> {
    let mut session = LearningSession::start(scope, settings.session_config(), conn)?;
    if session.is_completed() {
        println!("Nothing due.");
        return Ok(());
    }
    if settings.foreign().is_none() {
        info!("Unknown language '{}', voice answers use fuzzy matching only", settings.foreign_language);
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    let mut round = 0;
    while !session.is_completed() {
        if session.round_number != round {
            round = session.round_number;
            println!("Round {}: {} items left", round, session.remaining_count());
        }
        let Some(prompt) = session.prompt() else { break };
        let expected = session.expected_answer().unwrap_or_default().to_string();

        let answer = if mode == "rated" {
            println!("{}", prompt);
            println!("  answer: {}", expected);
            let Some(rating) = read_rating(&mut lines)? else { break };
            Answer::Rated(rating)
        } else {
            print!("{} > ", prompt);
            io::stdout().flush()?;
            let Some(line) = lines.next().transpose()? else { break };
            if mode == "voice" {
                Answer::Spoken(line)
            } else {
                Answer::Typed(line)
            }
        };

        let verdict = session.submit(&answer, conn)?;
        let evaluation = &verdict.evaluation;
        if evaluation.quality.is_pass() {
            println!("  correct, next review {}", verdict.progress.next_review_date);
        } else if evaluation.accent_only {
            println!("  almost: {}", expected);
        } else if !evaluation.highlights.is_empty() {
            println!("  expected: {}", render_diff(&evaluation.highlights));
        } else {
            println!("  expected: {}", expected);
        }
        session.next_card();
    }

    println!("Session finished after {} rounds.", session.round_number);
    Ok(())
}

/// Asks until the line parses as a rating. `None` at end of input.
fn read_rating(lines: &mut impl Iterator<Item = io::Result<String>>) -> Result<Option<HumanRating>> {
    loop {
        print!("  rate again/hard/good > ");
        io::stdout().flush()?;
        let Some(line) = lines.next().transpose()? else { return Ok(None) };
        match line.parse::<HumanRating>() {
            Ok(rating) => return Ok(Some(rating)),
            Err(e) => println!("  {}, try again", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(input: &[&str]) -> impl Iterator<Item = io::Result<String>> {
        input
            .iter()
            .map(|line| Ok(line.to_string()))
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn test_read_rating_asks_again_on_unknown_input() {
        let mut input = lines(&["maybe", "", "hard", "good"]);
        assert_eq!(read_rating(&mut input).unwrap(), Some(HumanRating::Hard));
        assert_eq!(read_rating(&mut input).unwrap(), Some(HumanRating::Good));
    }

    #[test]
    fn test_read_rating_end_of_input() {
        let mut input = lines(&["nope"]);
        assert_eq!(read_rating(&mut input).unwrap(), None);
    }
}
