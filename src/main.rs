//! docfeed - cursor-paginated document feeds for archive collections
//!
//! One binary, four entry points: `build` lays a collection out as a chain
//! of immutable page files, `serve` answers the same page shape live with a
//! threshold cursor, `cat` walks either chain from its entry point, and
//! `digest` prints the full content record of a single document.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod collection;
mod config;
mod digest;
mod error;
mod feed;
mod routes;
mod server;
mod state;
mod store;

use collection::{CollectionScanner, FeedIndex};
use config::Config;
use digest::{assemble_digest, ContentExtractor, DocumentDigester, HtmlExtractor, VersionCache};
use error::AppError;
use feed::{FeedPageWriter, FeedReader, Location};
use state::AppState;
use store::DigestStore;

#[derive(Parser)]
#[command(name = "docfeed", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Digest a source tree and write the batch page chain
    Build {
        /// Source collection root
        #[arg(long)]
        source: PathBuf,
        /// Output root for pages, digests, and the version cache
        #[arg(long)]
        out: PathBuf,
        /// Documents per page
        #[arg(long)]
        chunk_size: Option<usize>,
        /// Re-digest every document, ignoring the version cache
        #[arg(long)]
        force: bool,
    },
    /// Serve the collection as a live threshold-cursor feed
    Serve {
        /// Source collection root
        #[arg(long)]
        source: PathBuf,
        /// Listen address, host:port
        listen: String,
    },
    /// Walk a feed from its entry point and print one summary per line
    Cat {
        /// Collection entry point: an http(s) URL or a meta.json path
        location: String,
    },
    /// Print the full digest of one document from a source tree
    Digest {
        /// Source collection root
        #[arg(long)]
        source: PathBuf,
        /// Document id
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    match cli.command {
        Commands::Build {
            source,
            out,
            chunk_size,
            force,
        } => build(&config, &source, &out, chunk_size, force),
        Commands::Serve { source, listen } => serve(&config, &source, &listen).await,
        Commands::Cat { location } => cat(&location).await,
        Commands::Digest { source, id } => print_digest(&config, &source, &id),
    }
}

fn build(
    config: &Config,
    source: &Path,
    out: &Path,
    chunk_size: Option<usize>,
    force: bool,
) -> Result<()> {
    let chunk_size = chunk_size.unwrap_or(config.chunk_size);
    if chunk_size == 0 {
        return Err(AppError::BadRequest("chunk size must be at least 1".to_string()).into());
    }

    let start = std::time::Instant::now();
    let items = CollectionScanner::new(source).scan()?;

    fs::create_dir_all(out)?;
    let mut cache = VersionCache::open(out.join("versions.json"))?;
    if !cache.is_empty() {
        tracing::info!("Version cache primed with {} entries", cache.len());
    }
    let store = DigestStore::new(out.join("documents"));
    let extractor = HtmlExtractor::new();
    let mut digester = DocumentDigester::new(&extractor, &store, &mut cache, force);

    let writer = FeedPageWriter::new(out, chunk_size, config.collection_name.clone());
    let report = writer.publish(&items, &mut digester)?;

    tracing::info!(
        "Build complete: {} documents in {} pages in {:?}",
        report.documents,
        report.pages,
        start.elapsed()
    );
    Ok(())
}

async fn serve(config: &Config, source: &Path, listen: &str) -> Result<()> {
    let items = CollectionScanner::new(source).scan()?;
    let index = FeedIndex::new(config.collection_name.clone(), items);
    if index.is_empty() {
        tracing::warn!("Source collection is empty; the feed will serve no documents");
    }
    let state = AppState::new(index);
    server::serve(listen, state).await?;
    Ok(())
}

async fn cat(location: &str) -> Result<()> {
    let reader = FeedReader::new()?;
    let entry = Location::parse(location);
    let mut traversal = reader.traverse(&entry).await?;

    while let Some(page) = traversal.next_page().await? {
        for document in page.documents {
            println!("{}", serde_json::to_string(&document)?);
        }
    }
    Ok(())
}

fn print_digest(config: &Config, source: &Path, id: &str) -> Result<()> {
    let items = CollectionScanner::new(source).scan()?;
    let index = FeedIndex::new(config.collection_name.clone(), items);
    let item = index
        .find(id)
        .ok_or_else(|| AppError::NotFound(format!("document '{id}'")))?;

    let extractor = HtmlExtractor::new();
    let content = extractor.extract(item)?;
    let digest = assemble_digest(item, &item.version, content);

    println!("{}", serde_json::to_string_pretty(&digest)?);
    Ok(())
}
