use std::net::SocketAddr;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use prefill::api;
use prefill::client::{GENERIC_SEARCH_ERROR, SearchClient};
use prefill::mapping::FieldMapping;
use prefill::search::SearchService;
use prefill::ui::SearchPage;

#[derive(Parser)]
#[command(
    name = "prefill",
    about = "Recherche Grist et génération d'URLs pré-remplies Démarches Simplifiées"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP service
    Serve {
        #[arg(long, default_value = "127.0.0.1:5000")]
        bind: SocketAddr,
    },
    /// Submit one search against a running instance and print the rendered
    /// results
    Search {
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "http://127.0.0.1:5000")]
        base_url: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(true)
        .init();

    match Cli::parse().command {
        Command::Serve { bind } => serve(bind).await,
        Command::Search { email, base_url } => search(&email, &base_url).await,
    }
}

async fn serve(bind: SocketAddr) -> anyhow::Result<()> {
    let mapping = FieldMapping::load();
    if !mapping.status().loaded {
        tracing::warn!("field mapping unavailable, /search will answer 500");
    }

    let service = Arc::new(SearchService::from_config(mapping));
    let router = api::create_router(service);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!(%bind, "listening");
    axum::serve(listener, router).await?;
    Ok(())
}

async fn search(email: &str, base_url: &str) -> anyhow::Result<()> {
    let mut page = SearchPage::new(SearchClient::new(base_url));
    page.submit(email).await;

    if let Some(results) = &page.state.results {
        println!("{}", results.stats);
        println!("{}", results.content);
        return Ok(());
    }
    anyhow::bail!(
        "{}",
        page.state
            .error
            .as_deref()
            .unwrap_or(GENERIC_SEARCH_ERROR)
    )
}
