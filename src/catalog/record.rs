use sgp4::{Constants, Elements};
use thiserror::Error;

/// Canonical width of an orbital element line.
pub const ELEMENT_LINE_LEN: usize = 69;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("line {line} is {len} characters, expected 69")]
    BadLength { line: u8, len: usize },
    #[error("line {line} is missing its element line prefix")]
    BadPrefix { line: u8 },
    #[error("element set rejected: {0}")]
    Elements(String),
}

/// One validated three-line element record, exactly as read.
#[derive(Debug, Clone)]
pub struct ElementSet {
    pub name: String,
    pub line1: String,
    pub line2: String,
}

impl ElementSet {
    /// Validates the fixed-width layout. The orbital fields themselves are
    /// checked later, when the propagation model is built.
    pub fn parse(name: &str, line1: &str, line2: &str) -> Result<Self, RecordError> {
        validate_line(line1, 1, "1 ")?;
        validate_line(line2, 2, "2 ")?;
        Ok(Self {
            name: name.trim().to_string(),
            line1: line1.to_string(),
            line2: line2.to_string(),
        })
    }
}

fn validate_line(line: &str, index: u8, prefix: &str) -> Result<(), RecordError> {
    if line.len() != ELEMENT_LINE_LEN {
        return Err(RecordError::BadLength {
            line: index,
            len: line.len(),
        });
    }
    if !line.starts_with(prefix) {
        return Err(RecordError::BadPrefix { line: index });
    }
    Ok(())
}

/// A catalog entry: the raw record plus its ready-to-propagate model.
#[derive(Debug)]
pub struct OrbitModel {
    pub record: ElementSet,
    pub elements: Elements,
    pub constants: Constants,
}

impl OrbitModel {
    pub fn from_record(record: ElementSet) -> Result<Self, RecordError> {
        let elements = Elements::from_tle(
            Some(record.name.clone()),
            record.line1.as_bytes(),
            record.line2.as_bytes(),
        )
        .map_err(|e| RecordError::Elements(e.to_string()))?;
        let constants =
            Constants::from_elements(&elements).map_err(|e| RecordError::Elements(e.to_string()))?;
        Ok(Self {
            record,
            elements,
            constants,
        })
    }
}
