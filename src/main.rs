//! # kb-rank CLI (`kbr`)
//!
//! Manage a local knowledge file and rank its records against a query.
//!
//! ## Usage
//!
//! ```bash
//! kbr --config ./config/kbr.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `kbr init` | Create the knowledge file |
//! | `kbr add "<text>"` | Add one record |
//! | `kbr list` | List all records |
//! | `kbr clear` | Remove all records |
//! | `kbr import <file>` | Add one record per non-blank line |
//! | `kbr search "<query>"` | Rank records against a query |
//! | `kbr context "<query>"` | Show the assembled chat prompt |
//!
//! When the config file does not exist, built-in defaults are used and the
//! knowledge file lives at `./data/knowledge.json`.

use clap::{Parser, Subcommand};
use kb_rank::config::{self, Config};
use kb_rank::progress::ProgressMode;
use kb_rank::search::SearchOptions;
use kb_rank::{context, kb, knowledge, search};
use std::path::PathBuf;

/// kb-rank CLI — rank knowledge-base snippets for chat context.
#[derive(Parser)]
#[command(
    name = "kbr",
    about = "kb-rank — rank knowledge-base snippets for chat context",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/kbr.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the knowledge file. Safe to run repeatedly.
    Init,

    /// Add a knowledge record.
    Add {
        /// Record text.
        text: String,
    },

    /// List all knowledge records.
    List {
        /// Print a JSON array instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Remove all knowledge records.
    Clear,

    /// Import records from a text file, one per non-blank line.
    Import {
        path: PathBuf,

        /// Progress on stderr. Defaults to `human` on a TTY, `off` otherwise.
        #[arg(long, value_enum)]
        progress: Option<ProgressMode>,
    },

    /// Rank knowledge records against a query.
    Search {
        query: String,

        /// Maximum number of results (defaults to `retrieval.final_limit`).
        #[arg(long)]
        limit: Option<usize>,

        /// Use whole-query substring matching instead of relevance ranking.
        #[arg(long)]
        naive: bool,

        /// Show the per-signal score breakdown. Not available with `--naive`.
        #[arg(long, conflicts_with = "naive")]
        explain: bool,

        /// Search a plain-text file (one record per line) instead of the knowledge file.
        #[arg(long)]
        corpus: Option<PathBuf>,

        /// Print a JSON array instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Print the chat prompt assembled for a query.
    Context {
        query: String,

        /// Maximum number of context records.
        #[arg(long)]
        limit: Option<usize>,

        /// Print the messages as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cfg = if cli.config.exists() {
        config::load_config(&cli.config)?
    } else {
        Config::minimal()
    };

    match cli.command {
        Commands::Init => {
            knowledge::init_store(&cfg).await?;
            println!(
                "Knowledge file ready at {}.",
                cfg.knowledge.path.display()
            );
        }
        Commands::Add { text } => {
            kb::run_add(&cfg, &text).await?;
        }
        Commands::List { json } => {
            kb::run_list(&cfg, json).await?;
        }
        Commands::Clear => {
            kb::run_clear(&cfg).await?;
        }
        Commands::Import { path, progress } => {
            let mode = progress.unwrap_or_else(ProgressMode::default_for_tty);
            let reporter = mode.reporter();
            kb::run_import(&cfg, &path, reporter.as_ref()).await?;
        }
        Commands::Search {
            query,
            limit,
            naive,
            explain,
            corpus,
            json,
        } => {
            let opts = SearchOptions {
                limit,
                naive,
                explain,
                corpus,
            };
            search::run_search(&cfg, &query, &opts, json).await?;
        }
        Commands::Context { query, limit, json } => {
            context::run_context(&cfg, &query, limit, json).await?;
        }
    }

    Ok(())
}
