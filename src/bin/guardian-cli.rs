//! Guardian CLI - Headless interface for the Guardian response engine
//!
//! This binary runs queries against a scene file, enabling scripted checks
//! of mission-mode behavior with or without the remote model.
//!
//! # Usage
//!
//! ```bash
//! # Build the CLI binary
//! cargo build --features cli --bin guardian-cli
//!
//! # Execute a single query against a scene
//! ./target/debug/guardian-cli --scene scene.json -e "What do you see?"
//!
//! # Deterministic replies only, in defense mode
//! ./target/debug/guardian-cli --offline -m defense -e "Is this area safe?"
//!
//! # JSON output for scripting
//! ./target/debug/guardian-cli -e "Hello" --json | jq .
//!
//! # Voice transcripts must start with a wake word
//! ./target/debug/guardian-cli --voice -e "hey guardian, how many people"
//!
//! # Interactive REPL mode (when no -e or -f provided)
//! ./target/debug/guardian-cli
//! ```
//!
//! # Features
//!
//! This binary requires the `cli` feature flag.

use anyhow::Result;
use clap::Parser;

use guardian_lib::cli::{execute_batch, execute_once, initialize, run_repl, Args};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let ctx = initialize(&args).await?;

    let result = if let Some(ref query) = args.execute {
        execute_once(&ctx, query).await
    } else if let Some(ref file) = args.file {
        execute_batch(&ctx, file).await
    } else {
        run_repl(&ctx).await
    };

    ctx.shutdown().await?;

    result
}
