//! SecurePaste admin CLI: inspect and prune the record store and upload sessions offline.
//!
//! Reads the same environment (or `.env`) as the server, notably DATA_DIR and SESSION_DIR.

use anyhow::Context;
use clap::{Parser, Subcommand};
use securepaste_cli::{init_tracing, preview};
use securepaste_core::Config;
use securepaste_services::{
    create_record_store, DeletionService, IndexService, SessionDirectoryManager, SessionReaper,
    StoreBackend,
};
use serde::Serialize;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "securepaste", about = "SecurePaste admin CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the newest records
    List {
        /// Maximum number of records (capped at 200)
        #[arg(long, default_value = "20")]
        limit: usize,
        /// One line per record instead of JSON
        #[arg(long)]
        brief: bool,
    },
    /// Delete every record with the given id
    Delete {
        /// Record id (32 hex characters)
        id: String,
    },
    /// Remove upload sessions older than the TTL
    Reap {
        /// Override SESSION_TTL_SECS
        #[arg(long)]
        ttl_secs: Option<u64>,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    if config.store_backend() == StoreBackend::Memory {
        anyhow::bail!("STORE_BACKEND=memory has nothing on disk to administer");
    }

    match cli.command {
        Commands::List { limit, brief } => {
            let store = create_record_store(&config).await?;
            let records = IndexService::new(store).list_limited(limit).await?;
            if brief {
                for record in &records {
                    println!(
                        "{}  {}  {}  {}",
                        record.timestamp,
                        record.id,
                        if record.is_encrypted() { "enc" } else { "txt" },
                        preview(record.remark(), 40)
                    );
                }
            } else {
                print_json(&records)?;
            }
        }
        Commands::Delete { id } => {
            let store = create_record_store(&config).await?;
            let deleted_count = DeletionService::new(store).delete(&id).await?;
            print_json(&serde_json::json!({ "status": "success", "deleted_count": deleted_count }))?;
        }
        Commands::Reap { ttl_secs } => {
            let sessions = SessionDirectoryManager::new(config.session_dir().clone()).await?;
            let ttl = Duration::from_secs(ttl_secs.unwrap_or(config.session_ttl_secs()));
            let removed = SessionReaper::new(sessions, config.sessions)
                .sweep_older_than(ttl)
                .await?;
            print_json(&serde_json::json!({ "removed": removed, "ttl_secs": ttl.as_secs() }))?;
        }
    }

    Ok(())
}
