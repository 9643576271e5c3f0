use std::io::{self, Write};
use std::process::ExitCode;

use bucket_sweep::cli::Cli;
use bucket_sweep::commands::{execute, prepare};
use bucket_sweep::config::build_client;
use bucket_sweep::s3::S3Store;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // Variables already in the environment win over the .env file.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level())),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let (mut out, mut err) = (io::stdout().lock(), io::stderr().lock());
    match run(&cli, &mut out, &mut err).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let code = e.exit_code();
            // {:#} prints the whole source chain on one line.
            let _ = writeln!(err, "Error: {:#}", anyhow::Error::new(e));
            code
        }
    }
}

async fn run(cli: &Cli, out: &mut impl Write, err: &mut impl Write) -> bucket_sweep::Result<()> {
    // Loading the AWS config may already reach the network (IMDS region lookup),
    // so bad input has to be rejected first.
    let plan = prepare(&cli.command)?;

    let client = build_client(&cli.client_config()).await;
    let store = S3Store::new(client);
    execute(&store, &plan, out, err).await
}
