use std::sync::Mutex;

use anyhow::{bail, Result};
use async_trait::async_trait;
use bucket_sweep::{DeleteReport, ListRequest, ListingPage, ObjectStore};

/// A bucket served in fixed-size pages, recording every call made against it.
#[derive(Default)]
pub struct PagedBucket {
    keys: Vec<String>,
    page_size: usize,
    fail_on_page: Option<usize>,
    pub calls: Mutex<Calls>,
}

#[derive(Default, Debug)]
pub struct Calls {
    pub lists: Vec<ListRequest>,
    pub deletes: Vec<Vec<String>>,
    pub puts: Vec<(String, Vec<u8>)>,
}

impl PagedBucket {
    pub fn new(keys: &[&str], page_size: usize) -> Self {
        PagedBucket {
            keys: keys.iter().map(|k| k.to_string()).collect(),
            page_size: page_size.max(1),
            ..Default::default()
        }
    }

    /// Fail the listing request for the given 1-based page.
    pub fn failing_on_page(mut self, page: usize) -> Self {
        self.fail_on_page = Some(page);
        self
    }
}

#[async_trait]
impl ObjectStore for PagedBucket {
    async fn list_page(&self, request: &ListRequest) -> Result<ListingPage> {
        let page_no = {
            let mut calls = self.calls.lock().unwrap();
            calls.lists.push(request.clone());
            calls.lists.len()
        };
        if self.fail_on_page == Some(page_no) {
            bail!("connection reset by peer");
        }

        let start: usize = match &request.cursor {
            Some(cursor) => cursor.parse()?,
            None => 0,
        };
        let visible: Vec<&String> = self
            .keys
            .iter()
            .filter(|k| request.prefix.as_deref().map_or(true, |p| k.starts_with(p)))
            .collect();
        let end = (start + self.page_size).min(visible.len());

        Ok(ListingPage {
            keys: visible[start.min(end)..end].iter().map(|k| k.to_string()).collect(),
            next_cursor: (end < visible.len()).then(|| end.to_string()),
        })
    }

    async fn delete_batch(&self, _bucket: &str, keys: &[String]) -> Result<DeleteReport> {
        self.calls.lock().unwrap().deletes.push(keys.to_vec());
        Ok(DeleteReport {
            deleted: keys.to_vec(),
            errors: Vec::new(),
        })
    }

    async fn put(&self, _bucket: &str, key: &str, body: Vec<u8>) -> Result<()> {
        self.calls.lock().unwrap().puts.push((key.to_owned(), body));
        Ok(())
    }
}
