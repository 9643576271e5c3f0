//! [`ObjectStore`] over the AWS SDK S3 client.

use std::future::Future;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{Delete, ObjectIdentifier};

use crate::store::{DeleteReport, KeyError, ListRequest, ListingPage, ObjectStore};

/// S3 rejects DeleteObjects requests with more identifiers than this.
pub const MAX_DELETE_KEYS: usize = 1_000;

/// Error code given to keys whose DeleteObjects request failed as a whole.
pub const REQUEST_FAILED: &str = "RequestFailed";

pub struct S3Store {
    client: aws_sdk_s3::Client,
}

impl S3Store {
    pub fn new(client: aws_sdk_s3::Client) -> S3Store {
        S3Store { client }
    }

    async fn delete_chunk(&self, bucket: &str, chunk: Vec<String>) -> Result<DeleteReport> {
        let objects = chunk
            .iter()
            .map(|key| ObjectIdentifier::builder().key(key).build())
            .collect::<Result<Vec<_>, _>>()?;

        // quiet(false) makes S3 echo back every key it removed.
        let delete = Delete::builder()
            .set_objects(Some(objects))
            .quiet(false)
            .build()?;

        tracing::debug!(bucket, keys = chunk.len(), "DeleteObjects");
        let output = self
            .client
            .delete_objects()
            .bucket(bucket)
            .delete(delete)
            .send()
            .await
            .map_err(|err| anyhow!("{}", DisplayErrorContext(err)))
            .context("DeleteObjects failed")?;

        Ok(DeleteReport {
            deleted: output
                .deleted()
                .iter()
                .filter_map(|deleted| deleted.key().map(str::to_owned))
                .collect(),
            errors: output
                .errors()
                .iter()
                .map(|err| KeyError {
                    key: err.key().unwrap_or_default().to_owned(),
                    code: err.code().map(str::to_owned),
                    message: err.message().map(str::to_owned),
                })
                .collect(),
        })
    }
}

/// Sends `keys` through `send` in chunks of at most `chunk_size`, merging the reports.
///
/// A failed first chunk fails the whole call. Once any chunk has gone through,
/// a failure stops the walk and every key not yet confirmed is reported as a
/// per-key error instead, so earlier confirmations are never lost.
async fn delete_in_chunks<F, Fut>(
    keys: &[String],
    chunk_size: usize,
    mut send: F,
) -> Result<DeleteReport>
where
    F: FnMut(Vec<String>) -> Fut,
    Fut: Future<Output = Result<DeleteReport>>,
{
    let mut report = DeleteReport::default();

    for (index, chunk) in keys.chunks(chunk_size).enumerate() {
        match send(chunk.to_vec()).await {
            Ok(part) => {
                report.deleted.extend(part.deleted);
                report.errors.extend(part.errors);
            }
            Err(err) if index == 0 => return Err(err),
            Err(err) => {
                let sent = index * chunk_size;
                tracing::warn!(
                    chunk = index,
                    unconfirmed = keys.len() - sent,
                    "DeleteObjects request failed: {err:#}"
                );
                let message = format!("{err:#}");
                report.errors.extend(keys[sent..].iter().map(|key| KeyError {
                    key: key.clone(),
                    code: Some(REQUEST_FAILED.to_owned()),
                    message: Some(message.clone()),
                }));
                break;
            }
        }
    }

    Ok(report)
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn list_page(&self, request: &ListRequest) -> Result<ListingPage> {
        tracing::debug!(
            bucket = %request.bucket,
            prefix = request.prefix.as_deref().unwrap_or_default(),
            cursor = request.cursor.as_deref().unwrap_or_default(),
            "ListObjectsV2"
        );

        let output = self
            .client
            .list_objects_v2()
            .bucket(&request.bucket)
            .set_prefix(request.prefix.clone())
            .set_continuation_token(request.cursor.clone())
            .send()
            .await
            .map_err(|err| anyhow!("{}", DisplayErrorContext(err)))
            .context("ListObjectsV2 failed")?;

        let keys = output
            .contents()
            .iter()
            .filter_map(|object| object.key().map(str::to_owned))
            .collect();

        Ok(ListingPage {
            keys,
            next_cursor: output.next_continuation_token().map(str::to_owned),
        })
    }

    async fn delete_batch(&self, bucket: &str, keys: &[String]) -> Result<DeleteReport> {
        delete_in_chunks(keys, MAX_DELETE_KEYS, |chunk| self.delete_chunk(bucket, chunk)).await
    }

    async fn put(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()> {
        tracing::debug!(bucket, key, bytes = body.len(), "PutObject");
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|err| anyhow!("{}", DisplayErrorContext(err)))
            .context("PutObject failed")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("k{i}")).collect()
    }

    fn confirm_all(chunk: Vec<String>) -> Result<DeleteReport> {
        Ok(DeleteReport {
            deleted: chunk,
            errors: Vec::new(),
        })
    }

    #[tokio::test]
    async fn splits_into_chunks_and_merges_reports() {
        let mut sent = Vec::new();
        let report = delete_in_chunks(&keys(5), 2, |chunk| {
            sent.push(chunk.len());
            let result = if chunk.contains(&"k3".to_string()) {
                Ok(DeleteReport {
                    deleted: vec!["k2".into()],
                    errors: vec![KeyError {
                        key: "k3".into(),
                        code: Some("AccessDenied".into()),
                        message: None,
                    }],
                })
            } else {
                confirm_all(chunk)
            };
            async move { result }
        })
        .await
        .unwrap();

        assert_eq!(sent, vec![2, 2, 1]);
        assert_eq!(report.deleted, vec!["k0", "k1", "k2", "k4"]);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].key, "k3");
    }

    #[tokio::test]
    async fn later_chunk_failure_keeps_earlier_confirmations() {
        let mut calls = 0;
        let report = delete_in_chunks(&keys(5), 2, |chunk| {
            calls += 1;
            let result = if calls == 2 {
                Err(anyhow!("403 Forbidden"))
            } else {
                confirm_all(chunk)
            };
            async move { result }
        })
        .await
        .unwrap();

        // The walk stops at the failed request; the last chunk is never sent.
        assert_eq!(calls, 2);
        assert_eq!(report.deleted, vec!["k0", "k1"]);
        let failed: Vec<_> = report.errors.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(failed, vec!["k2", "k3", "k4"]);
        for failure in &report.errors {
            assert_eq!(failure.code.as_deref(), Some(REQUEST_FAILED));
            assert_eq!(failure.message.as_deref(), Some("403 Forbidden"));
        }
    }

    #[tokio::test]
    async fn first_chunk_failure_is_an_error() {
        let err = delete_in_chunks(&keys(3), 2, |_| async { Err(anyhow!("dispatch failure")) })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "dispatch failure");
    }
}
