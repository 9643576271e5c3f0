use std::fmt;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::store::ObjectStore;

/// Where an upload lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub bucket: String,
    pub key: String,
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.key)
    }
}

/// Builds the object key from an optional prefix and a destination key.
///
/// The key is checked on its own first: it must contain something other than
/// whitespace and slashes.
pub fn destination_key(prefix: Option<&str>, key: &str) -> Result<String> {
    let trimmed = key.trim_start_matches('/');
    if trimmed.trim().is_empty() {
        return Err(Error::InvalidKey(key.to_owned()));
    }

    match prefix.map(|p| p.trim_end_matches('/')) {
        Some(prefix) if !prefix.is_empty() => Ok(format!("{prefix}/{trimmed}")),
        _ => Ok(trimmed.to_owned()),
    }
}

/// Upload arguments as given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadRequest {
    pub bucket: String,
    pub prefix: Option<String>,
    pub key: Option<String>,
    pub file: Option<PathBuf>,
}

/// A checked upload: the destination key is built and the file is named.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub destination: Destination,
    pub file: PathBuf,
}

impl UploadRequest {
    pub fn validate(&self) -> Result<Upload> {
        let key = self.key.as_deref().ok_or(Error::MissingArgument("--key"))?;
        let file = self.file.clone().ok_or(Error::MissingArgument("--file"))?;

        Ok(Upload {
            destination: Destination {
                bucket: self.bucket.clone(),
                key: destination_key(self.prefix.as_deref(), key)?,
            },
            file,
        })
    }
}

/// Reads the file fully and stores it as a single object.
pub async fn upload_file<S: ObjectStore + ?Sized>(store: &S, upload: &Upload) -> Result<()> {
    let Upload { destination, file } = upload;

    let body = tokio::fs::read(file).await.map_err(|source| Error::Io {
        path: file.clone(),
        source,
    })?;

    tracing::info!(file = %file.display(), %destination, bytes = body.len(), "uploading");
    store
        .put(&destination.bucket, &destination.key, body)
        .await
        .map_err(|source| Error::Upload {
            bucket: destination.bucket.clone(),
            key: destination.key.clone(),
            source,
        })
}
