use anyhow::Result;

use crate::store::{ListRequest, ObjectStore};

/// Walks every key under a prefix, one listing page at a time.
///
/// Pages are fetched lazily and strictly in sequence, since each request
/// carries the continuation token of the page before it.
pub struct KeyPager<'a, S: ObjectStore + ?Sized> {
    store: &'a S,
    request: ListRequest,

    keys: Vec<String>,
    truncated: Truncation,
    pages: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Truncation {
    NotYetKnown,
    Truncated,
    NotTruncated,
}

impl<'a, S: ObjectStore + ?Sized> KeyPager<'a, S> {
    pub fn new(store: &'a S, bucket: &str, prefix: Option<&str>) -> KeyPager<'a, S> {
        KeyPager {
            store,
            request: ListRequest::new(bucket, prefix),
            keys: Vec::new(),
            truncated: Truncation::NotYetKnown,
            pages: 0,
        }
    }

    /// Number of listing pages fetched so far.
    pub fn pages(&self) -> usize {
        self.pages
    }

    async fn fetch(&mut self) -> Result<()> {
        let page = self.store.list_page(&self.request).await?;
        self.pages += 1;

        tracing::debug!(
            bucket = %self.request.bucket,
            page = self.pages,
            keys = page.keys.len(),
            more = page.next_cursor.is_some(),
            "fetched listing page"
        );

        self.truncated = if page.next_cursor.is_some() {
            Truncation::Truncated
        } else {
            Truncation::NotTruncated
        };
        self.request.cursor = page.next_cursor;

        self.keys = page.keys;
        // Pop from the back while still yielding keys in listing order.
        self.keys.reverse();

        Ok(())
    }

    pub async fn next(&mut self) -> Result<Option<String>> {
        loop {
            match (self.keys.pop(), self.truncated) {
                (Some(key), _) => return Ok(Some(key)),

                // First call, or the last page said there is more. A page may
                // be empty and still carry a token, so keep going.
                (None, Truncation::Truncated | Truncation::NotYetKnown) => self.fetch().await?,

                (None, Truncation::NotTruncated) => return Ok(None),
            }
        }
    }
}
