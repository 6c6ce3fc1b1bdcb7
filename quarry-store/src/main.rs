use clap::{Parser, Subcommand};
use quarry_embed::{EmbedConfig, HttpEmbedProvider};
use quarry_store::pipeline::{self, PipelineConfig};
use quarry_store::vector_store::VectorStore;
use serde::Serialize;
use std::path::PathBuf;
use std::process;

/// A CLI tool to build and query quarry vector stores.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path of the persisted vector store.
    #[arg(short, long, default_value = "vectors.json")]
    store: PathBuf,

    /// Base URL of the embedding endpoint (OpenAI-compatible).
    #[arg(long, default_value = quarry_embed::config::DEFAULT_BASE_URL)]
    base_url: String,

    /// Embedding model name.
    #[arg(long, default_value = quarry_embed::config::DEFAULT_MODEL)]
    model: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the vector store from a list of .txt / .docx files
    Build {
        /// Files to index
        files: Vec<PathBuf>,
        /// Chunk window size in characters
        #[arg(long, default_value_t = 1000)]
        chunk_size: usize,
        /// Characters shared between consecutive chunks
        #[arg(long, default_value_t = 200)]
        chunk_overlap: usize,
    },
    /// Retrieve context for a query
    Query {
        /// The query text
        question: String,
        /// Maximum number of chunks to retrieve
        #[arg(short, long, default_value_t = 3)]
        k: usize,
        /// Output format
        #[arg(short, long, default_value = "summary")]
        format: OutputFormat,
    },
    /// Show store statistics
    Stats {
        /// Output format
        #[arg(short, long, default_value = "summary")]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, PartialEq)]
enum OutputFormat {
    Summary,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "summary" => Ok(OutputFormat::Summary),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Invalid format: {s}")),
        }
    }
}

#[derive(Serialize)]
struct StoreStats {
    records: usize,
    dimension: usize,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn provider_from_env(args: &Args) -> anyhow::Result<HttpEmbedProvider> {
    let api_key = std::env::var("QUARRY_API_KEY")
        .map_err(|_| anyhow::anyhow!("QUARRY_API_KEY is not set"))?;
    let config = EmbedConfig::new(api_key)
        .with_base_url(args.base_url.clone())
        .with_model(args.model.clone());
    Ok(HttpEmbedProvider::new(config)?)
}

async fn run() -> anyhow::Result<()> {
    let args = Args::parse();

    match &args.command {
        Commands::Build {
            files,
            chunk_size,
            chunk_overlap,
        } => {
            if files.is_empty() {
                return Err(anyhow::anyhow!("no input files given"));
            }
            let provider = provider_from_env(&args)?;
            let config = PipelineConfig::new(&args.store)
                .with_chunk_size(*chunk_size)
                .with_chunk_overlap(*chunk_overlap);

            let records = pipeline::build_index(files, &provider, &config).await?;
            println!(
                "Indexed {} chunks from {} files into {}",
                records,
                files.len(),
                args.store.display()
            );
            Ok(())
        }
        Commands::Query {
            question,
            k,
            format,
        } => {
            let provider = provider_from_env(&args)?;
            let config = PipelineConfig::new(&args.store);

            let retrieved = pipeline::retrieve(question, *k, &provider, &config).await?;
            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&retrieved)?);
                }
                OutputFormat::Summary => {
                    println!("Context:\n{}", retrieved.context);
                    println!("\nSources:");
                    for provenance in &retrieved.provenance {
                        println!("  {}", provenance.filename);
                    }
                }
            }
            Ok(())
        }
        Commands::Stats { format } => {
            let store = VectorStore::load(&args.store)?;
            let stats = StoreStats {
                records: store.len(),
                dimension: store.dimension(),
            };
            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&stats)?);
                }
                OutputFormat::Summary => {
                    println!("Store: {}", args.store.display());
                    println!("  Records: {}", stats.records);
                    println!("  Dimension: {}", stats.dimension);
                }
            }
            Ok(())
        }
    }
}
