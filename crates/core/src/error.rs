use std::path::PathBuf;
use thiserror::Error;

pub type MmmResult<T> = Result<T, MmmError>;

#[derive(Error, Debug)]
pub enum MmmError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Logarithm of non-positive value {value} in column `{column}` at week {week}")]
    NonPositiveLog {
        column: String,
        week: u32,
        value: f64,
    },

    #[error("Singular design matrix: rank {rank} < {columns} columns")]
    SingularMatrix { rank: usize, columns: usize },

    #[error("Insufficient data: need more than {required} observations, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("Distribution error: {0}")]
    Distribution(String),

    #[error("Unknown coefficient `{0}`")]
    UnknownCoefficient(String),
}

impl MmmError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Natural log that refuses non-positive input instead of yielding NaN or -inf.
pub fn checked_ln(value: f64, column: &str, week: u32) -> MmmResult<f64> {
    if value > 0.0 && value.is_finite() {
        Ok(value.ln())
    } else {
        Err(MmmError::NonPositiveLog {
            column: column.to_string(),
            week,
            value,
        })
    }
}
