//! pathkv CLI
//!
//! Command-line interface over a directory-backed store.

use clap::{Parser, Subcommand};
use pathkv::{codec, Config, FileBackend, IndexedStore, Value};
use tracing_subscriber::{fmt, EnvFilter};

/// pathkv CLI
#[derive(Parser, Debug)]
#[command(name = "pathkv")]
#[command(about = "Path-addressed versioned key-value store")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./pathkv_data")]
    data_dir: String,

    /// Maximum number of entries returned by `list`
    #[arg(short, long, default_value = "100")]
    max_items: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Save a value under a path
    Save {
        /// The path to save under
        path: String,

        /// The value (JSON, or taken as a plain string if it is not JSON)
        value: String,
    },

    /// Get the value stored under a path
    Get {
        /// The path to read
        path: String,
    },

    /// List stored items, oldest first
    List {
        /// Regex filter on paths
        #[arg(short, long)]
        pattern: Option<String>,

        /// Keep only the first N items of the window
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Remove a path
    Remove {
        /// The path to remove
        path: String,
    },
}

fn main() {
    // Initialize tracing/logging (stderr, so stdout stays machine-readable)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,pathkv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> pathkv::Result<()> {
    let config = Config::builder().max_items(args.max_items).build()?;
    let backend = FileBackend::open(&args.data_dir)?;
    let store = IndexedStore::with_config(backend, config);

    match args.command {
        Commands::Save { path, value } => {
            if !store.save(&path, parse_value(&value))? {
                tracing::error!("Nothing saved: empty path or empty value");
                std::process::exit(1);
            }
        }
        Commands::Get { path } => match store.get(&path) {
            Some(value) => println!("{}", codec::encode(&value)?),
            None => println!("null"),
        },
        Commands::List { pattern, limit } => {
            let items = store.get_list(pattern.as_deref(), limit)?;
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
        Commands::Remove { path } => store.remove(&path),
    }

    Ok(())
}

/// JSON if it parses, otherwise the raw text
fn parse_value(raw: &str) -> Value {
    codec::decode(raw).unwrap_or_else(|_| Value::from(raw))
}
