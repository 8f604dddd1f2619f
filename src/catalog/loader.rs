use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use thiserror::Error;

use crate::catalog::{Catalog, ElementSet, OrbitModel, RecordError};

/// File extension of cached element files.
pub const ELEMENT_FILE_EXT: &str = "tle";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("cache directory not found: {0}")]
    DirectoryNotFound(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A record that failed validation, kept so callers can report it.
#[derive(Debug)]
pub struct RecordFault {
    pub name: String,
    pub error: RecordError,
}

/// Outcome of parsing one source: the accepted models plus the rejects.
#[derive(Default)]
pub struct LoadReport {
    pub objects: BTreeMap<String, OrbitModel>,
    pub rejected: Vec<RecordFault>,
}

/// Parses newline-delimited (name, line1, line2) triples.
///
/// Blank lines are ignored and a trailing partial triple is dropped. A
/// malformed record is logged, recorded in the report, and skipped; it
/// never aborts the rest of the input. An input with no valid record
/// yields an empty report, and the caller decides whether that is fatal.
pub fn parse_records(text: &str) -> LoadReport {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let mut report = LoadReport::default();
    for chunk in lines.chunks_exact(3) {
        let name = chunk[0];
        match parse_record(name, chunk[1], chunk[2]) {
            Ok(model) => {
                report.objects.insert(model.record.name.clone(), model);
            }
            Err(error) => {
                warn!("Skipping element record {:?}: {}", name, error);
                report.rejected.push(RecordFault {
                    name: name.to_string(),
                    error,
                });
            }
        }
    }
    report
}

fn parse_record(name: &str, line1: &str, line2: &str) -> Result<OrbitModel, RecordError> {
    let record = ElementSet::parse(name, line1, line2)?;
    OrbitModel::from_record(record)
}

/// Parses a single element file.
pub fn load_file(path: &Path) -> Result<LoadReport, CatalogError> {
    debug!("Loading element file: {}", path.display());
    let content = fs::read_to_string(path)?;
    Ok(parse_records(&content))
}

/// Loads every `.tle` file in the cache directory into a catalog, one
/// source per file, in file name order. A file that fails to read is
/// logged and skipped.
pub fn load_dir(dir: &Path) -> Result<Catalog, CatalogError> {
    if !dir.exists() {
        return Err(CatalogError::DirectoryNotFound(dir.display().to_string()));
    }

    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == ELEMENT_FILE_EXT))
        .collect();
    paths.sort();

    let mut catalog = Catalog::new();
    for path in paths {
        let label = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        match load_file(&path) {
            Ok(report) => {
                if report.objects.is_empty() {
                    warn!("No valid element records in {}", path.display());
                } else {
                    info!("Loaded {} objects from {}", report.objects.len(), label);
                    catalog.push_source(label, report.objects);
                }
            }
            Err(e) => {
                warn!("Failed to read element file {}: {}", path.display(), e);
                // Continue with other files
            }
        }
    }
    Ok(catalog)
}
