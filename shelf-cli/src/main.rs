//! Shelf CLI - Command-line tools for library inventory catalogs

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use shelf_core::StoreKind;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Parse and validate jobs argument (must be at least 1)
fn parse_jobs(s: &str) -> Result<usize, String> {
    let n: usize = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
    if n < 1 {
        Err("jobs must be at least 1".to_string())
    } else {
        Ok(n)
    }
}

#[derive(Parser)]
#[command(name = "shelf")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every book in a catalog
    List {
        /// Catalog file (JSON array of books)
        catalog: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single book from a catalog
    Show {
        /// Catalog file (JSON array of books)
        catalog: String,

        /// Book id
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a catalog file
    Validate {
        /// Catalog file (JSON array of books)
        catalog: String,

        /// Require an explicit id on every entry
        #[arg(long)]
        strict: bool,
    },

    /// Race concurrent checkouts against a single record
    Drill {
        /// Copies on the shelf
        #[arg(short, long, default_value = "10")]
        copies: u32,

        /// Concurrent checkout attempts
        #[arg(short, long, default_value = "100")]
        borrowers: usize,

        /// Inventory backend (locked, sharded)
        #[arg(short, long, default_value = "locked")]
        store: StoreKind,

        /// Number of worker threads (must be at least 1)
        #[arg(short, long, default_value = "4", value_parser = parse_jobs)]
        jobs: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "shelf_cli=debug,shelf_core=debug"
    } else {
        "shelf_cli=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::List { catalog, json } => commands::list(&catalog, json),

        Commands::Show { catalog, id, json } => commands::show(&catalog, &id, json),

        Commands::Validate { catalog, strict } => commands::validate(&catalog, strict),

        Commands::Drill {
            copies,
            borrowers,
            store,
            jobs,
        } => commands::drill(copies, borrowers, store, jobs),
    }
}
