//! Runs a parsed [`Command`] against an [`ObjectStore`].
//!
//! [`prepare`] does every check that needs no backend; [`execute`] then runs
//! the checked [`Plan`]. Keys go to `out`, one per line; per-key failures go
//! to `err`. Errors are returned to the caller, which owns the exit code.

use std::io::Write;

use crate::cli::{Command, Target};
use crate::error::{Error, Result};
use crate::select::{delete_selected, enumerate_and_select, DeleteOutcome, Filter};
use crate::store::ObjectStore;
use crate::upload::{upload_file, Upload, UploadRequest};

pub const NO_FILES_FOUND: &str = "No files found in the bucket.";
pub const NO_FILES_MATCHED: &str = "No files matched the filter.";
pub const NOTHING_TO_DELETE: &str = "Nothing to delete.";

/// A command whose filter is compiled and whose upload arguments are checked.
#[derive(Debug, Clone)]
pub enum Plan {
    List { target: Target, filter: Filter },
    Upload(Upload),
    Delete { target: Target, filter: Filter },
}

/// Validates `command` without touching the network.
pub fn prepare(command: &Command) -> Result<Plan> {
    let plan = match command {
        Command::List { target, filter } => Plan::List {
            target: target.clone(),
            filter: match filter {
                Some(pattern) => Filter::new(pattern)?,
                None => Filter::any(),
            },
        },
        Command::Upload { target, file, key } => {
            let request = UploadRequest {
                bucket: target.bucket.clone(),
                prefix: target.prefix.clone(),
                key: key.clone(),
                file: file.clone(),
            };
            Plan::Upload(request.validate()?)
        }
        Command::Delete { target, filter } => Plan::Delete {
            target: target.clone(),
            filter: Filter::new(filter)?,
        },
    };
    Ok(plan)
}

pub async fn execute<S, O, E>(store: &S, plan: &Plan, out: &mut O, err: &mut E) -> Result<()>
where
    S: ObjectStore + ?Sized,
    O: Write,
    E: Write,
{
    match plan {
        Plan::List { target, filter } => list(store, target, filter, out).await,
        Plan::Upload(upload) => {
            upload_file(store, upload).await?;
            let Upload { destination, file } = upload;
            writeln!(out, "Uploaded {} to {destination}", file.display())?;
            Ok(())
        }
        Plan::Delete { target, filter } => delete(store, target, filter, out, err).await,
    }
}

async fn list<S, O>(store: &S, target: &Target, filter: &Filter, out: &mut O) -> Result<()>
where
    S: ObjectStore + ?Sized,
    O: Write,
{
    let selection =
        enumerate_and_select(store, &target.bucket, target.prefix.as_deref(), filter).await?;

    if selection.is_empty_listing() {
        writeln!(out, "{NO_FILES_FOUND}")?;
    } else if selection.matched.is_empty() {
        writeln!(out, "{NO_FILES_MATCHED}")?;
    }
    for key in &selection.matched {
        writeln!(out, "{key}")?;
    }

    tracing::info!(
        "listed {} of {} objects",
        selection.matched.len(),
        selection.scanned
    );
    Ok(())
}

async fn delete<S, O, E>(
    store: &S,
    target: &Target,
    filter: &Filter,
    out: &mut O,
    err: &mut E,
) -> Result<()>
where
    S: ObjectStore + ?Sized,
    O: Write,
    E: Write,
{
    let selection =
        enumerate_and_select(store, &target.bucket, target.prefix.as_deref(), filter).await?;

    if selection.is_empty_listing() {
        writeln!(out, "{NO_FILES_FOUND}")?;
    }

    let report = match delete_selected(store, &target.bucket, &selection).await? {
        DeleteOutcome::NothingToDelete => {
            writeln!(out, "{NOTHING_TO_DELETE}")?;
            return Ok(());
        }
        DeleteOutcome::Deleted(report) => report,
    };

    for key in &report.deleted {
        writeln!(out, "{key}")?;
    }
    for failure in &report.errors {
        writeln!(
            err,
            "failed to delete {}: {} {}",
            failure.key,
            failure.code.as_deref().unwrap_or("UnknownError"),
            failure.message.as_deref().unwrap_or_default()
        )?;
    }

    if report.is_complete() {
        Ok(())
    } else {
        Err(Error::PartialDeletion {
            failed: report.errors.len(),
            requested: selection.matched.len(),
        })
    }
}
