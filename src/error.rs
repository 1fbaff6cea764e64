use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::model::Molecule;

pub type Result<T> = std::result::Result<T, SimError>;

#[derive(Debug, Error)]
pub enum SimError {
    /// Source sheet does not have the expected shape. `row` is the 1-based
    /// sheet row, 0 for workbook-level problems.
    #[error("input format error at row {row}: {message}")]
    InputFormat { row: usize, message: String },

    #[error("patient {patient}: missing data: {message}")]
    MissingData { patient: i64, message: String },

    #[error("patient {patient}: exp overflow for {molecule} (weighted sum {weighted})")]
    Overflow {
        patient: i64,
        molecule: Molecule,
        weighted: f64,
    },

    #[error("patient {patient}: every exp underflows to zero (largest weighted sum {weighted})")]
    Underflow { patient: i64, weighted: f64 },

    #[error("failed to read {}: {message}", .path.display())]
    Read { path: PathBuf, message: String },

    #[error("failed to write {}: {message}", .path.display())]
    Write { path: PathBuf, message: String },
}

impl SimError {
    pub fn input_format(row: usize, message: impl Into<String>) -> Self {
        SimError::InputFormat {
            row,
            message: message.into(),
        }
    }

    pub fn missing_data(patient: i64, message: impl Into<String>) -> Self {
        SimError::MissingData {
            patient,
            message: message.into(),
        }
    }

    pub fn read(path: &Path, message: impl ToString) -> Self {
        SimError::Read {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }

    pub fn write(path: &Path, message: impl ToString) -> Self {
        SimError::Write {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }
}
