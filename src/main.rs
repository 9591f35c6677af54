//! Interactive banking console.
//!
//! Usage: `teller [snapshot.json]` (default `teller.json`). State is loaded
//! from the snapshot at startup and rewritten after every mutation. On first
//! boot, two identities are seeded: `admin`/`admin123` and `demo`/`demo123`.
//! Commands are read line by line from stdin; type `help` for the list.

use std::env;
use std::io::BufRead;

use tokio_stream::wrappers::ReceiverStream;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use teller::Bank;
use teller::console;
use teller::snapshot::JsonFile;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse().unwrap()))
        .with_writer(std::io::stderr)
        .init();

    let path = env::args().nth(1).unwrap_or_else(|| "teller.json".to_string());

    let bank = match Bank::open(Box::new(JsonFile::new(&path))) {
        Ok(bank) => bank,
        Err(e) => {
            eprintln!("failed to open snapshot '{path}': {e}");
            std::process::exit(1);
        }
    };

    let (line_sender, line_receiver) = tokio::sync::mpsc::channel(16);

    tokio::task::spawn_blocking(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if line_sender.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("stdin read failed: {e}");
                    break;
                }
            }
        }
    });

    console::run(&bank, ReceiverStream::new(line_receiver)).await;

    // The stdin reader may still be blocked on a read; exit without waiting
    // for it (runtime shutdown would otherwise stall until the next line).
    std::process::exit(0);
}
