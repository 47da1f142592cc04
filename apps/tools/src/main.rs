use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use client_core::{submit_text, HttpRemoteStore, RemoteStore};
use shared::domain::RowId;

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = "http://127.0.0.1:8443")]
    store_url: String,
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Leave a message for the display.
    Submit { text: String },
    /// List messages that have not been acknowledged yet.
    Unseen,
    /// Mark a message as seen.
    Ack { row_id: i64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();
    let store = HttpRemoteStore::new(&cli.store_url, Duration::from_secs(cli.timeout_secs))?;

    match cli.command {
        Command::Submit { text } => {
            let row_id = submit_text(&store, &text).await?;
            println!("submitted row_id={row_id}");
        }
        Command::Unseen => {
            let rows = store.fetch_unseen_rows().await?;
            if rows.is_empty() {
                println!("no unseen messages");
            }
            for row in rows {
                println!(
                    "{}\t{}\t{}",
                    row.row_id,
                    row.created_at.format("%Y-%m-%d %H:%M:%S"),
                    row.text
                );
            }
        }
        Command::Ack { row_id } => {
            store.acknowledge(RowId(row_id)).await?;
            println!("acknowledged row_id={row_id}");
        }
    }

    Ok(())
}
