use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use leafcheck_core::{AnalysisResult, ItemId};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// On-disk form of one exported report.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDocument<'a> {
    pub item_id: ItemId,
    pub source_name: &'a str,
    pub media_type: &'a str,
    pub analyzed_utc: &'a str,
    pub report: &'a AnalysisResult,
}

/// Ensure output directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    Ok(())
}

/// Writes reports as `{sanitized_stem}--{item_id}-{short_hash(source)}.json`,
/// each via a temp file renamed into place.
pub struct ReportExporter {
    dir: PathBuf,
}

impl ReportExporter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn export(
        &self,
        document: &ReportDocument<'_>,
        source_bytes: &[u8],
    ) -> Result<PathBuf, PersistError> {
        ensure_output_dir(&self.dir)?;
        let json = serde_json::to_string_pretty(document)?;

        let target = self
            .dir
            .join(report_filename(document.item_id, document.source_name, source_bytes));
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}

/// Deterministic, filesystem-safe report name for one item's source file.
///
/// The item id keeps same-named, identical uploads from sharing a report.
pub fn report_filename(item_id: ItemId, source_name: &str, source_bytes: &[u8]) -> String {
    let stem = Path::new(source_name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(source_name);
    format!(
        "{}--{}-{}.json",
        sanitize_stem(stem),
        item_id,
        short_hash(source_bytes)
    )
}

fn sanitize_stem(input: &str) -> String {
    let mut compacted = String::with_capacity(input.len());
    let mut prev_underscore = false;
    for c in input.chars() {
        let c = if is_forbidden(c) { '_' } else { c };
        if c == '_' && prev_underscore {
            continue;
        }
        prev_underscore = c == '_';
        compacted.push(c);
    }
    let mut cleaned = compacted.trim_matches(&['_', ' ', '.'][..]).to_string();
    if cleaned.is_empty() {
        cleaned = "leaf".to_string();
    }
    if cleaned.chars().count() > 80 {
        cleaned = cleaned.chars().take(80).collect();
    }
    cleaned
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn short_hash(input: &[u8]) -> String {
    let digest = Sha256::digest(input);
    let mut hex = String::with_capacity(8);
    for byte in digest.iter().take(4) {
        use std::fmt::Write;
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_is_sanitized_and_stable() {
        let name = report_filename(3, "my: leaf?.jpg", b"abc");
        assert!(name.starts_with("my_ leaf--3-"));
        assert!(name.ends_with(".json"));
        assert_eq!(name, report_filename(3, "my: leaf?.jpg", b"abc"));
        assert_ne!(name, report_filename(3, "my: leaf?.jpg", b"abd"));
    }

    #[test]
    fn identical_uploads_get_distinct_names() {
        assert_ne!(
            report_filename(1, "dir_a/leaf.jpg", b"same"),
            report_filename(2, "dir_b/leaf.jpg", b"same")
        );
    }

    #[test]
    fn empty_stem_falls_back() {
        assert!(report_filename(1, "???.png", b"x").starts_with("leaf--1-"));
    }
}
