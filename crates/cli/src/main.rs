use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use storage::MetadataStore;
use tagger_core::config;
use tagger_core::pipeline::{self, Pipeline};
use tagger_core::search::TagIndex;
use tracing::info;

const SAMPLE_LIMIT: usize = 5;

#[derive(Parser)]
#[command(name = "auto-tagger")]
#[command(about = "Tag files with LLM-backed content analyzers", long_about = None)]
struct Cli {
    /// Directory to process
    directory: PathBuf,

    /// Process directories recursively
    #[arg(short, long)]
    recursive: bool,

    /// Print files carrying TAG from the persisted store, without processing
    #[arg(short, long, value_name = "TAG")]
    search: Option<String>,

    /// Path to config TOML
    #[arg(short, long)]
    config: Option<String>,

    /// Output JSON instead of text
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = config::load(cli.config.as_deref())?;
    let store = MetadataStore::open(&cfg.store.path);
    info!(
        "metadata store {} holds {} records",
        cfg.store.path,
        store.len()
    );

    if let Some(tag) = &cli.search {
        return run_search(&store, tag, cli.json);
    }

    anyhow::ensure!(
        cli.directory.is_dir(),
        "directory '{}' does not exist",
        cli.directory.display()
    );

    let registry = pipeline::build_registry(&cfg);
    let analyzers = pipeline::build_analyzers(&cfg, &registry)?;
    let mut pipeline = Pipeline::new(store, analyzers, &cfg.scan.exclude)?;

    let results = pipeline
        .process_directory(&cli.directory, cli.recursive)
        .await?;

    if cli.json {
        let files: Vec<serde_json::Value> = results
            .iter()
            .map(|(path, record)| {
                serde_json::json!({
                    "path": path,
                    "tags": record.tags,
                    "agent": record.agent,
                    "error": record.metadata.error,
                })
            })
            .collect();
        let summary = serde_json::json!({
            "status": "ok",
            "processed": results.len(),
            "files": files,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Processed {} files", results.len());
    if !results.is_empty() {
        println!("\nSample of tagged files:");
        for (path, record) in results.iter().take(SAMPLE_LIMIT) {
            println!("\n{path}:");
            println!("  Tags: {}", record.tags.join(", "));
            println!("  Agent: {}", record.agent);
            if let Some(err) = &record.metadata.error {
                println!("  Error: {err}");
            }
        }
    }

    Ok(())
}

fn run_search(store: &MetadataStore, tag: &str, json: bool) -> Result<()> {
    let index = TagIndex::build(store);
    let paths = index.search(tag);

    if json {
        println!("{}", serde_json::to_string_pretty(&paths)?);
        return Ok(());
    }

    if paths.is_empty() {
        println!("No files found with tag '{tag}'");
    } else {
        println!("Files tagged with '{tag}':");
        for path in paths {
            println!("  - {path}");
        }
    }

    Ok(())
}
