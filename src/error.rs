use std::path::PathBuf;

use thiserror::Error;

use crate::ReadId;

/// Fatal conditions of an evaluation run. An empty comparison is not one of
/// these, it is reported as a missing evaluation instead.
#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("Failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read or write table {}: {source}", .path.display())]
    Csv { path: PathBuf, source: csv::Error },

    #[error("Parsing error in {} at line {line}: {message}", .path.display())]
    Parse {
        path: PathBuf,
        line: u64,
        message: String,
    },

    /// Simulated ground truth must never contain a class at or below the
    /// trivial threshold.
    #[error(
        "Found {count} trivial classes (at most {threshold} reads) in the ground truth, \
         the simulation and clustering results are likely mismatched"
    )]
    TrivialClasses { count: usize, threshold: usize },

    #[error("Unknown clustering tool '{0}', expected one of isONclust, qCluster, random_cluster")]
    UnknownTool(String),

    #[error("Read {0} was clustered but is not present in the ground truth")]
    MissingClass(ReadId),
}

impl EvaluationError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, line: u64, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            line,
            message: message.into(),
        }
    }
}
