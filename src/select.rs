//! Paginated, regex-filtered enumeration and the batch delete built on it.

use regex::Regex;

use crate::error::{Error, Result};
use crate::pager::KeyPager;
use crate::store::{DeleteReport, ObjectStore};

/// A compiled key filter. Matching is an unanchored search over the full key;
/// a filter without a pattern matches every key.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    regex: Option<Regex>,
}

impl Filter {
    pub fn new(pattern: &str) -> Result<Filter> {
        let regex = Regex::new(pattern).map_err(|source| Error::InvalidFilter {
            pattern: pattern.to_owned(),
            source,
        })?;
        Ok(Filter { regex: Some(regex) })
    }

    pub fn any() -> Filter {
        Filter::default()
    }

    pub fn is_match(&self, key: &str) -> bool {
        self.regex.as_ref().map_or(true, |re| re.is_match(key))
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_ref().map_or("", Regex::as_str)
    }
}

/// Keys that matched, in listing order, plus how much of the listing was seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub matched: Vec<String>,
    pub scanned: usize,
    pub pages: usize,
}

impl Selection {
    /// True when the backend had no objects under the prefix at all.
    pub fn is_empty_listing(&self) -> bool {
        self.scanned == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    NothingToDelete,
    Deleted(DeleteReport),
}

/// Lists every key under `prefix` and keeps the ones `filter` matches.
///
/// Any listing error aborts the walk and the partial selection is dropped.
pub async fn enumerate_and_select<S: ObjectStore + ?Sized>(
    store: &S,
    bucket: &str,
    prefix: Option<&str>,
    filter: &Filter,
) -> Result<Selection> {
    let mut pager = KeyPager::new(store, bucket, prefix);
    let mut selection = Selection::default();

    loop {
        let key = pager.next().await.map_err(|source| Error::Enumeration {
            bucket: bucket.to_owned(),
            source,
        })?;
        let Some(key) = key else { break };

        selection.scanned += 1;
        if filter.is_match(&key) {
            selection.matched.push(key);
        }
    }
    selection.pages = pager.pages();

    tracing::info!(
        bucket,
        prefix = prefix.unwrap_or_default(),
        filter = filter.as_str(),
        scanned = selection.scanned,
        matched = selection.matched.len(),
        pages = selection.pages,
        "enumeration finished"
    );
    Ok(selection)
}

/// Submits the frozen selection as a single batch delete.
///
/// An empty selection never reaches the backend. The returned report is the
/// backend's own account of what was deleted and what failed.
pub async fn delete_selected<S: ObjectStore + ?Sized>(
    store: &S,
    bucket: &str,
    selection: &Selection,
) -> Result<DeleteOutcome> {
    if selection.matched.is_empty() {
        tracing::info!(bucket, "nothing to delete");
        return Ok(DeleteOutcome::NothingToDelete);
    }

    tracing::info!(bucket, keys = selection.matched.len(), "submitting batch delete");
    let report = store
        .delete_batch(bucket, &selection.matched)
        .await
        .map_err(|source| Error::Deletion {
            bucket: bucket.to_owned(),
            source,
        })?;

    if !report.is_complete() {
        tracing::warn!(
            bucket,
            deleted = report.deleted.len(),
            failed = report.errors.len(),
            "batch delete partially failed"
        );
    }
    Ok(DeleteOutcome::Deleted(report))
}
