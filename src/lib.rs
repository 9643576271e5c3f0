//! List, upload and bulk-delete objects in an S3 bucket.
//!
//! The interesting part is [`select`]: keys are enumerated page by page
//! through a [`pager::KeyPager`], filtered with a regex, and the frozen match
//! set is removed with a single batch delete. Everything that talks to the
//! network goes through the [`store::ObjectStore`] trait.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod pager;
pub mod s3;
pub mod select;
pub mod store;
pub mod upload;

pub use error::{Error, Result};
pub use store::{DeleteReport, KeyError, ListRequest, ListingPage, ObjectStore};
