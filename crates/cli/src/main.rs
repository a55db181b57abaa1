mod args;
mod report;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use webpify_core::{
    load_config, load_default_config, validate_config, BatchConverter, BatchProgress, CancelToken,
    Config, DirectorySink, FileStatus, OutputManager, Session, SourceFile, WebpCodec, ZipPackager,
};

use args::Args;

/// Config file picked up from the working directory when no path is given.
const DEFAULT_CONFIG_FILE: &str = "webpify.toml";

/// Buffer size for the progress channel
const PROGRESS_BUFFER_SIZE: usize = 64;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = resolve_config(args.config.as_deref())?;
    args.apply(&mut config);
    validate_config(&config).context("Configuration validation failed")?;

    info!(
        "Quality {}, writing to {:?}",
        config.conversion.quality, config.output.dir
    );

    let mut session = Session::from_config(&config).context("Invalid conversion settings")?;

    let sources = read_sources(&args.files).await;
    let report = session.intake(sources)?;
    if report.rejected() > 0 {
        debug!("Ignored {} file(s) at intake", report.rejected());
    }
    if session.is_empty() {
        warn!("No PNG files to convert");
        return Ok(());
    }

    let session = session.into_shared();
    let cancel = CancelToken::new();
    let converter = BatchConverter::new(WebpCodec::new()).with_cancel_token(cancel.clone());

    // Stop between files on Ctrl+C
    let cancel_task = tokio::spawn(cancel_on_signal(cancel));

    let (progress_tx, progress_rx) = mpsc::channel(PROGRESS_BUFFER_SIZE);
    let progress_task = tokio::spawn(log_progress(progress_rx));

    let summary = converter
        .convert_all_with_progress(&session, progress_tx)
        .await
        .context("Conversion failed to start")?;
    cancel_task.abort();
    let _ = progress_task.await;

    if summary.cancelled {
        warn!("Conversion cancelled, {} file(s) left", summary.remaining);
    }

    let guard = session.read().await;
    for item in guard.items() {
        println!("{}", report::item_line(item));
    }
    println!("{}", report::summary_line(&guard.stats()));

    let manager = OutputManager::new(ZipPackager::new(), DirectorySink::new(&config.output.dir))
        .with_config(&config.output);

    if args.zip {
        match manager
            .download_all(guard.items())
            .await
            .context("Failed to save converted files")?
        {
            Some(download) => println!("wrote {}", manager.sink().path_for(&download.filename)?.display()),
            None => info!("Nothing to save"),
        }
    } else {
        for item in guard.items().iter().filter(|i| i.status() == FileStatus::Done) {
            let download = manager
                .download_file(item)
                .await
                .with_context(|| format!("Failed to save {}", item.source().name()))?;
            println!("wrote {}", manager.sink().path_for(&download.filename)?.display());
        }
    }

    Ok(())
}

/// Loads the explicit config file, then `webpify.toml` if present, then
/// built-in defaults. Environment overrides apply in every case.
fn resolve_config(explicit: Option<&Path>) -> Result<Config> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|p| p.exists()),
    };

    match path {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            load_config(&path).with_context(|| format!("Failed to load config from {:?}", path))
        }
        None => load_default_config().context("Failed to load default configuration"),
    }
}

/// Reads every path, skipping the ones that cannot be read.
async fn read_sources(paths: &[PathBuf]) -> Vec<SourceFile> {
    let mut sources = Vec::with_capacity(paths.len());
    for path in paths {
        match SourceFile::from_path(path).await {
            Ok(source) => sources.push(source),
            Err(e) => warn!("Skipping {:?}: {}", path, e),
        }
    }
    sources
}

async fn log_progress(mut rx: mpsc::Receiver<BatchProgress>) {
    while let Some(event) = rx.recv().await {
        match event {
            BatchProgress::Started {
                file_name,
                index,
                total,
                ..
            } => debug!("[{}/{}] Converting {}", index + 1, total, file_name),
            BatchProgress::Finished {
                file_name,
                status,
                failure,
                percent,
                ..
            } => match failure {
                Some(kind) => warn!("{}% {} {} ({:?})", percent, file_name, status, kind),
                None => info!("{}% {} {}", percent, file_name, status),
            },
        }
    }
}

async fn cancel_on_signal(cancel: CancelToken) {
    if signal::ctrl_c().await.is_ok() {
        warn!("Interrupt received, finishing current file");
        cancel.cancel();
    }
}
