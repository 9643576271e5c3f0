//! The backend seam: everything the commands need from object storage.

use anyhow::Result;
use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

/// One listing call: bucket, optional prefix, and the cursor from the previous page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListRequest {
    pub bucket: String,
    pub prefix: Option<String>,
    pub cursor: Option<String>,
}

impl ListRequest {
    pub fn new(bucket: impl Into<String>, prefix: Option<&str>) -> Self {
        ListRequest {
            bucket: bucket.into(),
            // An empty prefix means no restriction.
            prefix: prefix.filter(|p| !p.is_empty()).map(str::to_owned),
            cursor: None,
        }
    }
}

/// A bounded slice of the listing. `next_cursor` is present iff more pages remain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPage {
    pub keys: Vec<String>,
    pub next_cursor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyError {
    pub key: String,
    pub code: Option<String>,
    pub message: Option<String>,
}

/// What the backend says happened to a deletion batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteReport {
    pub deleted: Vec<String>,
    pub errors: Vec<KeyError>,
}

impl DeleteReport {
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn list_page(&self, request: &ListRequest) -> Result<ListingPage>;

    /// Removes `keys` as one batch. Per-key failures land in the report, not in `Err`.
    async fn delete_batch(&self, bucket: &str, keys: &[String]) -> Result<DeleteReport>;

    async fn put(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()>;
}
