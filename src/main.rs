use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use plscraper::{config::Args, fetch::ReqwestTransport, pipeline};
use std::{fs::File, path::Path, sync::Arc};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    let args = Args::parse();

    // ─── 1) init logging ─────────────────────────────────────────────
    init_logging(args.log_file.as_deref())?;
    info!("startup");

    // ─── 2) validate before any I/O ──────────────────────────────────
    let today = Local::now().date_naive();
    let config = args.validate(today).context("invalid arguments")?;

    // ─── 3) fetch, clean, save ───────────────────────────────────────
    let transport = ReqwestTransport::new(args.timeout(), args.retries)?;
    let path = pipeline::run(&transport, &config)
        .with_context(|| format!("{} report for {}", config.source, config.range))?;

    info!(path = %path.display(), "all done");
    Ok(())
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            Some(fmt::layer().with_ansi(false).with_writer(Arc::new(file)))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();
    Ok(())
}
