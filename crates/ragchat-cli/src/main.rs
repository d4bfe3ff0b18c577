//! ragchat CLI - command-line interface for the ragchat service.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use ragchat_core::{QueryMatch, RagChatConfig, RagChatError};
use ragchat_index::PineconeClient;
use ragchat_model::OpenAiClient;
use ragchat_server::{connect, serve};

/// ragchat - retrieval-augmented chat over your documents
#[derive(Parser)]
#[command(name = "ragchat")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Config file (default: ~/.config/ragchat/config.toml, then ./ragchat.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Bind address (overrides config)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Upload files into the vector index
    Upload {
        /// Files to ingest
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Run a retrieval query and print the matches
    Query {
        /// Query text
        text: String,

        /// Number of matches to print
        #[arg(short = 'k', long, default_value = "3")]
        top_k: usize,
    },

    /// Check credentials and connectivity to both APIs
    Check,

    /// Manage the vector index
    Index {
        #[command(subcommand)]
        action: IndexAction,
    },
}

#[derive(Subcommand)]
enum IndexAction {
    /// List all indexes
    List,

    /// Create the configured index
    Create,

    /// Delete the configured index
    Delete,

    /// Delete and recreate the configured index
    Recreate,

    /// Show statistics for the configured index
    Stats,
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn load_config(path: Option<&PathBuf>) -> Result<RagChatConfig, RagChatError> {
    match path {
        Some(path) => RagChatConfig::load(path),
        None => RagChatConfig::load_default(),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Serve { bind } => {
            let mut config = config;
            if let Some(bind) = bind {
                config.server.bind_address = bind;
            }
            serve(config).await
        }
        Commands::Upload { paths } => upload(&config, &paths).await,
        Commands::Query { text, top_k } => query(&config, &text, top_k).await,
        Commands::Check => check(&config).await,
        Commands::Index { action } => match action {
            IndexAction::List => index_list(&config).await,
            IndexAction::Create => index_create(&config).await,
            IndexAction::Delete => index_delete(&config).await,
            IndexAction::Recreate => index_recreate(&config).await,
            IndexAction::Stats => index_stats(&config).await,
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn upload(config: &RagChatConfig, paths: &[PathBuf]) -> Result<(), RagChatError> {
    let service = connect(config).await?;

    println!("Uploading {} file(s)...", paths.len());

    let mut success_count = 0;
    let mut error_count = 0;

    for path in paths {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                eprintln!("  {} - Error reading file: {}", path.display(), e);
                error_count += 1;
                continue;
            }
        };

        match service.upload_document(&filename, &bytes).await {
            Ok(chunks) => {
                println!("  {} - OK ({} chunks)", path.display(), chunks);
                success_count += 1;
            }
            Err(e) => {
                eprintln!("  {} - Error: {}", path.display(), e);
                error_count += 1;
            }
        }
    }

    println!(
        "\nComplete: {} succeeded, {} failed",
        success_count, error_count
    );

    Ok(())
}

async fn query(config: &RagChatConfig, text: &str, top_k: usize) -> Result<(), RagChatError> {
    println!("Querying: '{}'", text);

    let service = connect(config).await?;
    let matches = service.engine().retrieve(text, top_k).await?;

    println!("Found {} matches.", matches.len());
    for (i, m) in matches.iter().enumerate() {
        println!("\nMatch {} (Score: {:.4}):", i + 1, m.score);
        println!("Source: {}", match_source(m));
        println!("Text: {}...", match_snippet(m, 200));
    }

    Ok(())
}

fn match_source(m: &QueryMatch) -> &str {
    m.metadata
        .as_ref()
        .map(|md| md.filename.as_str())
        .unwrap_or("Unknown")
}

fn match_snippet(m: &QueryMatch, max_chars: usize) -> String {
    m.metadata
        .as_ref()
        .map(|md| md.text.chars().take(max_chars).collect())
        .unwrap_or_default()
}

/// Mask a credential for terminal echo, keeping the first five and last
/// four characters.
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() > 9 {
        let head: String = chars[..5].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    } else {
        "*".repeat(chars.len())
    }
}

async fn check(config: &RagChatConfig) -> Result<(), RagChatError> {
    println!("Checking credentials...");

    let openai_key = config.openai.resolve_api_key().ok();
    let pinecone_key = config.pinecone.resolve_api_key().ok();

    match &openai_key {
        Some(key) => println!("OPENAI_API_KEY found: {}", mask_key(key)),
        None => println!("ERROR: OPENAI_API_KEY not found in config or environment"),
    }
    match &pinecone_key {
        Some(key) => println!("PINECONE_API_KEY found: {}", mask_key(key)),
        None => println!("ERROR: PINECONE_API_KEY not found in config or environment"),
    }

    if openai_key.is_none() || pinecone_key.is_none() {
        return Ok(());
    }

    println!("\nTesting OpenAI connection...");
    let openai = OpenAiClient::from_config(&config.openai)?;
    match openai.list_models().await {
        Ok(models) => println!(
            "SUCCESS: OpenAI connection established ({} models visible).",
            models.len()
        ),
        Err(e) => println!("ERROR: OpenAI connection failed: {}", e),
    }

    println!("\nTesting Pinecone connection...");
    let pinecone = PineconeClient::from_config(&config.pinecone)?;
    match pinecone.list_indexes().await {
        Ok(_) => println!("SUCCESS: Pinecone connection established."),
        Err(e) => println!("ERROR: Pinecone connection failed: {}", e),
    }

    Ok(())
}

async fn index_list(config: &RagChatConfig) -> Result<(), RagChatError> {
    let pinecone = PineconeClient::from_config(&config.pinecone)?;
    let indexes = pinecone.list_indexes().await?;

    if indexes.is_empty() {
        println!("No indexes found.");
    } else {
        let names: Vec<&str> = indexes.iter().map(|i| i.name.as_str()).collect();
        println!("Found indexes: {}", names.join(", "));
    }

    Ok(())
}

async fn index_create(config: &RagChatConfig) -> Result<(), RagChatError> {
    let pinecone = PineconeClient::from_config(&config.pinecone)?;
    pinecone
        .create_index(&config.pinecone, config.openai.embedding_dimension)
        .await?;
    println!(
        "Successfully created index '{}'.",
        config.pinecone.index_name
    );
    Ok(())
}

async fn index_delete(config: &RagChatConfig) -> Result<(), RagChatError> {
    let pinecone = PineconeClient::from_config(&config.pinecone)?;
    pinecone.delete_index(&config.pinecone.index_name).await?;
    println!(
        "Successfully deleted index '{}'.",
        config.pinecone.index_name
    );
    Ok(())
}

async fn index_recreate(config: &RagChatConfig) -> Result<(), RagChatError> {
    let pinecone = PineconeClient::from_config(&config.pinecone)?;
    let name = &config.pinecone.index_name;

    match pinecone.delete_index(name).await {
        Ok(()) => println!("Successfully deleted index '{}'.", name),
        Err(RagChatError::IndexNotFound { .. }) => {
            println!("Index '{}' does not exist.", name)
        }
        Err(e) => return Err(e),
    }

    println!("Waiting 10 seconds before creating...");
    tokio::time::sleep(Duration::from_secs(10)).await;

    pinecone
        .create_index(&config.pinecone, config.openai.embedding_dimension)
        .await?;
    println!("Successfully created index '{}'.", name);

    Ok(())
}

async fn index_stats(config: &RagChatConfig) -> Result<(), RagChatError> {
    let pinecone = PineconeClient::from_config(&config.pinecone)?;
    let name = &config.pinecone.index_name;

    match pinecone.index(name).await {
        Ok(index_handle) => {
            use ragchat_core::VectorIndex;
            let stats = index_handle.stats().await?;
            println!("Index '{}':", name);
            println!("- Vectors: {}", stats.total_vector_count);
            println!("- Dimension: {}", stats.dimension);
            println!("- Fullness: {:.4}", stats.index_fullness);
        }
        Err(RagChatError::IndexNotFound { .. }) => {
            println!("Index '{}' does not exist.", name);
        }
        Err(e) => return Err(e),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ragchat_core::VectorMetadata;

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key("sk-proj-abcdefghijkl-wxyz"), "sk-pr...wxyz");
        assert_eq!(mask_key("short"), "*****");
        assert_eq!(mask_key(""), "");
    }

    #[test]
    fn test_match_snippet_truncates_on_char_boundary() {
        let m = QueryMatch {
            id: "a-0".to_string(),
            score: 0.5,
            metadata: Some(VectorMetadata {
                text: "é".repeat(300),
                filename: "a.txt".to_string(),
            }),
        };
        let snippet = match_snippet(&m, 200);
        assert_eq!(snippet.chars().count(), 200);
    }

    #[test]
    fn test_match_source_without_metadata() {
        let m = QueryMatch {
            id: "a-0".to_string(),
            score: 0.5,
            metadata: None,
        };
        assert_eq!(match_source(&m), "Unknown");
    }
}
