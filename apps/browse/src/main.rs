use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{projector::project, AggregationController, HttpCatalogClient};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod render;

use config::{load_settings, DEFAULT_CONFIG_PATH};

/// Browse popular movies, TV shows and people from a catalog API.
#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    #[arg(long)]
    api_base_url: Option<String>,
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Search by title; repeat to issue several searches, the last one wins.
    #[arg(long = "search")]
    searches: Vec<String>,
    /// Reload the whole catalog once after the first load.
    #[arg(long)]
    reload: bool,
    /// Print the projected screen as JSON instead of text.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(&args.config)?;
    if let Some(url) = args.api_base_url {
        settings.api_base_url = url;
    }
    if let Some(secs) = args.timeout_secs {
        settings.request_timeout_secs = secs;
    }
    info!(api_base_url = %settings.api_base_url, "starting catalog browser");

    let client = HttpCatalogClient::with_timeout(&settings.api_base_url, settings.request_timeout())?;
    let controller = AggregationController::new(Arc::new(client));

    let load = tokio::spawn({
        let controller = Arc::clone(&controller);
        async move { controller.load().await }
    });

    // Searches go out while the initial lists are still loading.
    let mut searches = Vec::new();
    for query in &args.searches {
        match controller.submit_search(query).await {
            Some(handle) => searches.push(handle),
            None => warn!(query = %query, "skipping empty search query"),
        }
    }

    let phase = load.await.context("initial load task failed")?;
    info!(?phase, "initial load finished");
    for handle in searches {
        handle.await.context("search task failed")?;
    }

    if args.reload {
        let phase = controller.reload().await;
        info!(?phase, "reload finished");
        if let Some(query) = args.searches.last() {
            controller.search(query).await;
        }
    }

    let state = controller.snapshot().await;
    let screen = project(&state, &settings.limits);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&screen)?);
    } else {
        print!("{}", render::render_text(&screen)?);
    }

    Ok(())
}
