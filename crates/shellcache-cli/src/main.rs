//! shellcache CLI - drive the offline asset cache worker from a terminal.
//!
//! Subcommands mirror the worker lifecycle: `install` populates the cache
//! generations from the configured manifest, `activate` purges stale
//! generations, `status` inspects the store, and `fetch` routes a single
//! request through the caching strategies.

use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use url::Url;

use shellcache::{CacheStore, CacheWorker, FetchRequest, HttpFetcher, WorkerConfig, WorkerEvent};

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn usage() {
    eprintln!("Usage: shellcache <command>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  install       Populate cache generations from the manifest");
    eprintln!("  activate      Purge generations from other versions");
    eprintln!("  status        Show generations, entry counts, and entry ages");
    eprintln!("  fetch <url>   Route one request through the worker");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let Some(command) = args.get(1) else {
        usage();
        return Ok(());
    };

    let config = WorkerConfig::load().context("Failed to load configuration")?;
    info!(version = %config.version, store = %config.store_dir.display(), "shellcache starting");

    let store = Arc::new(
        CacheStore::open(config.store_dir.clone()).context("Failed to open cache store")?,
    );
    let fetcher = Arc::new(HttpFetcher::new().context("Failed to build HTTP client")?);
    let worker = CacheWorker::new(config, fetcher, store);

    match command.as_str() {
        "install" => cmd_install(&worker).await,
        "activate" => cmd_activate(&worker).await,
        "status" => cmd_status(&worker).await,
        "fetch" => match args.get(2) {
            Some(raw) => cmd_fetch(&worker, raw).await,
            None => {
                usage();
                Ok(())
            }
        },
        _ => {
            usage();
            Ok(())
        }
    }
}

async fn cmd_install(worker: &CacheWorker) -> Result<()> {
    worker.handle_event(WorkerEvent::Install).await?;

    let store = worker.store();
    for name in [
        worker.config().static_generation(),
        worker.config().dynamic_generation(),
    ] {
        let count = store.entry_count(&name).await.unwrap_or(0);
        println!("{}: {} entries", name, count);
    }
    println!("Install complete.");
    Ok(())
}

async fn cmd_activate(worker: &CacheWorker) -> Result<()> {
    let before = worker.store().generation_names().await;
    worker.handle_event(WorkerEvent::Activate).await?;
    let after = worker.store().generation_names().await;

    for name in before.iter().filter(|n| !after.contains(n)) {
        println!("Purged stale generation: {}", name);
    }
    println!("Active generations: {}", after.join(", "));
    Ok(())
}

async fn cmd_status(worker: &CacheWorker) -> Result<()> {
    let store = worker.store();
    let names = store.generation_names().await;
    if names.is_empty() {
        println!("Cache store is empty; run `shellcache install` first.");
        return Ok(());
    }

    for name in names {
        let entries = store.entries_in(&name).await;
        println!("{} ({} entries)", name, entries.len());
        for entry in entries {
            println!("  {}  [{}]  {}", entry.url, entry.status, entry.age_display());
        }
    }
    Ok(())
}

async fn cmd_fetch(worker: &CacheWorker, raw: &str) -> Result<()> {
    let url = Url::parse(raw).with_context(|| format!("Invalid URL: {}", raw))?;

    // Strategies only serve once the worker is active, and each CLI run is
    // a fresh process. Activate through cmd_activate so any generation
    // purge is reported, never silent.
    cmd_activate(worker).await?;

    let request = FetchRequest::get(url);
    let response = worker.handle_fetch(&request).await?;
    println!(
        "{}  [{}]  {} bytes  (from {})",
        response.url,
        response.status,
        response.body.len(),
        response.source
    );
    Ok(())
}
