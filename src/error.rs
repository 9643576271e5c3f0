use std::path::PathBuf;
use std::process::ExitCode;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid filter pattern '{pattern}'")]
    InvalidFilter {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("missing required argument: {0}")]
    MissingArgument(&'static str),

    #[error("invalid destination key '{0}'")]
    InvalidKey(String),

    #[error("listing s3://{bucket} failed")]
    Enumeration {
        bucket: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("batch delete in s3://{bucket} failed")]
    Deletion {
        bucket: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("{failed} of {requested} objects could not be deleted")]
    PartialDeletion { failed: usize, requested: usize },

    #[error("upload to s3://{bucket}/{key} failed")]
    Upload {
        bucket: String,
        key: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("could not read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("writing output failed")]
    Output(#[from] std::io::Error),
}

impl Error {
    /// Validation errors are raised before any request reaches the backend.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::InvalidFilter { .. } | Error::MissingArgument(_) | Error::InvalidKey(_)
        )
    }

    pub fn exit_code(&self) -> ExitCode {
        if self.is_validation() {
            ExitCode::from(2)
        } else {
            ExitCode::FAILURE
        }
    }
}
