//! JSON import/export for vocabulary lists.
//! Import reads a batch of candidates; export writes a scope's items.

use crate::error::Result;
use crate::models::{ImportCandidate, VocabularyItem};
use log::info;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Exports vocabulary items to a pretty-printed JSON file.
pub fn export_json_to_path(items: &[VocabularyItem], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, items)?;
    writer.flush()?;

    info!("Exported {} items to '{}'", items.len(), path.display());
    Ok(())
}

/// Reads import candidates from a JSON array. Both `source_text` and
/// `sourceText` spellings are accepted.
pub fn import_json(path: impl AsRef<Path>) -> Result<Vec<ImportCandidate>> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let candidates: Vec<ImportCandidate> = serde_json::from_reader(reader)?;

    info!("Read {} import candidates from '{}'", candidates.len(), path.display());
    Ok(candidates)
}
