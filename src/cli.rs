use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::config::ClientConfig;

/// List, upload and bulk-delete objects in an S3 bucket.
///
/// Every option falls back to an environment variable, and a `.env` file in
/// the working directory is loaded first.
#[derive(Parser, Debug)]
#[command(name = "bucket-sweep", version, about)]
pub struct Cli {
    /// Increase log verbosity: -v = info, -vv = debug
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Named profile from the shared AWS config/credentials files
    #[arg(long, env = "AWS_PROFILE", global = true)]
    pub profile: Option<String>,

    #[arg(long, env = "AWS_REGION", global = true)]
    pub region: Option<String>,

    /// Custom endpoint for S3-compatible stores
    #[arg(long, env = "AWS_ENDPOINT_URL", global = true)]
    pub endpoint_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the objects under a prefix, optionally filtered by a regex
    #[command(alias = "list-files")]
    List {
        #[command(flatten)]
        target: Target,

        /// Only print keys matching this regular expression
        #[arg(long, env = "S3_FILTER")]
        filter: Option<String>,
    },

    /// Upload one local file
    #[command(alias = "upload-file")]
    Upload {
        #[command(flatten)]
        target: Target,

        /// Local file to upload
        #[arg(long)]
        file: Option<PathBuf>,

        /// Destination key, placed under --prefix when one is set
        #[arg(long)]
        key: Option<String>,
    },

    /// Delete every object under a prefix whose key matches a regex
    #[command(alias = "delete-files")]
    Delete {
        #[command(flatten)]
        target: Target,

        /// Regular expression selecting the keys to delete
        #[arg(long, env = "S3_FILTER")]
        filter: String,
    },
}

#[derive(Args, Debug, Clone)]
pub struct Target {
    /// The S3 bucket name
    #[arg(long, env = "S3_BUCKET")]
    pub bucket: String,

    /// The S3 key prefix
    #[arg(long, env = "S3_PREFIX")]
    pub prefix: Option<String>,
}

impl Cli {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(
            self.region.clone(),
            self.profile.clone(),
            self.endpoint_url.clone(),
        )
    }

    /// Log level implied by `-v`, used when `RUST_LOG` is not set.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}
