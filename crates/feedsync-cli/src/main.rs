//! feedsync - supplier feed to catalog converter

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use feedsync_cli::config::{FtpConfig, DEFAULT_CONFIG_FILE};
use feedsync_cli::jobs::{JobList, DEFAULT_JOBS_FILE};
use feedsync_cli::loader::{DefaultLoader, SourceLoader};
use feedsync_cli::sink::{FtpSink, LocalDirSink, Sink};
use feedsync_cli::run_batch;
use feedsync_common::logging::{init_logging, LogConfig, LogLevel};
use feedsync_convert::TransformOptions;
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "feedsync")]
#[command(author, version, about = "Convert supplier product feeds to catalog XML and publish them")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert every job in the job list and deliver the results
    Run {
        /// Job list: one `<url-or-path> <destination-name>` per line
        #[arg(short, long, default_value = DEFAULT_JOBS_FILE)]
        jobs: PathBuf,

        /// FTP connection settings (JSON)
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,

        /// Write catalogs to this directory instead of uploading them
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        #[command(flatten)]
        transform: TransformArgs,
    },

    /// Convert a single source and print or save the catalog
    Convert {
        /// URL or local path of the supplier feed
        source: String,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        transform: TransformArgs,
    },
}

#[derive(Args, Debug)]
struct TransformArgs {
    /// Currency code written on every product
    #[arg(long, default_value = "TRY")]
    currency: String,

    /// Label of the first variant slot
    #[arg(long, default_value = "Color")]
    color_label: String,

    /// Label of the second variant slot
    #[arg(long, default_value = "Size")]
    size_label: String,
}

impl From<TransformArgs> for TransformOptions {
    fn from(args: TransformArgs) -> Self {
        Self {
            currency: args.currency,
            color_label: args.color_label,
            size_label: args.size_label,
            ..TransformOptions::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    // LOG_* variables take precedence over --verbose
    let log_config = LogConfig::new("feedsync").with_level(log_level).merge_env()?;

    let _guard = init_logging(&log_config)?;

    match cli.command {
        Command::Run {
            jobs,
            config,
            output_dir,
            transform,
        } => run(jobs, config, output_dir, transform.into()).await,
        Command::Convert {
            source,
            output,
            transform,
        } => convert(&source, output, &transform.into()).await,
    }
}

async fn run(
    jobs: PathBuf,
    config: PathBuf,
    output_dir: Option<PathBuf>,
    options: TransformOptions,
) -> Result<()> {
    let list = JobList::read(&jobs)
        .await
        .with_context(|| format!("Failed to read job list {}", jobs.display()))?;

    if list.is_empty() {
        warn!(jobs = %jobs.display(), "Job list contains no jobs");
    }

    let sink: Box<dyn Sink> = match output_dir {
        Some(dir) => Box::new(LocalDirSink::new(dir)),
        None => {
            let ftp = FtpConfig::load(&config)
                .with_context(|| format!("Failed to load FTP config {}", config.display()))?;
            Box::new(FtpSink::new(ftp))
        },
    };

    let loader = DefaultLoader::new()?;
    let report = run_batch(&list, &loader, sink.as_ref(), &options).await;

    info!(
        "Batch complete: {}/{} delivered, {} failed, {} rejected lines",
        report.delivered.len(),
        report.total(),
        report.failures.len(),
        report.rejected.len()
    );
    Ok(())
}

async fn convert(source: &str, output: Option<PathBuf>, options: &TransformOptions) -> Result<()> {
    let loader = DefaultLoader::new()?;
    let raw = loader.load(source).await?;
    let catalog = feedsync_convert::convert(&raw, options)?;

    match output {
        Some(path) => {
            tokio::fs::write(&path, &catalog)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), bytes = catalog.len(), "Saved catalog");
        },
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(catalog.as_bytes())?;
            stdout.write_all(b"\n")?;
            stdout.flush()?;
        },
    }

    Ok(())
}
