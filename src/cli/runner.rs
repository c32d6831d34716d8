//! CLI execution runner.
//!
//! Runs queries through the response engine against the current scene.

use std::path::Path;

use anyhow::{Context, Result};

use crate::intent::{strip_wake_words, WakeOutcome, WAKE_ACKNOWLEDGEMENT};

use super::bootstrap::CliContext;
use super::output::{print_notice, print_reply};

/// Turn raw input into query text. Voice transcripts without a wake word
/// yield `None`; a bare wake word is acknowledged here.
fn resolve_query(ctx: &CliContext, input: &str) -> Result<Option<String>> {
    if !ctx.args.voice {
        return Ok(Some(input.to_string()));
    }

    match strip_wake_words(input) {
        WakeOutcome::Ignored => {
            tracing::debug!("Transcript has no wake word, ignoring");
            Ok(None)
        }
        WakeOutcome::Acknowledge => {
            print_notice("acknowledge", WAKE_ACKNOWLEDGEMENT, ctx.args.json)?;
            Ok(None)
        }
        WakeOutcome::Command(command) => Ok(Some(command)),
    }
}

/// Execute a single query and print the reply.
pub async fn execute_once(ctx: &CliContext, input: &str) -> Result<()> {
    let Some(query) = resolve_query(ctx, input)? else {
        return Ok(());
    };

    let raw = ctx.perception.detect();
    let detections = ctx.engine.snapshot(&raw);
    let mode = ctx.engine.active_mode();

    let reply = ctx.engine.respond_detailed(&query, &detections, mode).await;

    print_reply(&reply, &detections, ctx.args.json, ctx.args.quiet)
}

/// Execute queries from a file, one per line.
///
/// Each non-empty, non-comment line is executed sequentially.
/// Lines starting with `#` are treated as comments.
pub async fn execute_batch(ctx: &CliContext, file_path: &Path) -> Result<()> {
    let content = tokio::fs::read_to_string(file_path)
        .await
        .with_context(|| format!("Failed to read query file: {}", file_path.display()))?;

    let queries = parse_batch(&content);
    if queries.is_empty() {
        anyhow::bail!("No queries found in file: {}", file_path.display());
    }

    let total = queries.len();
    if !ctx.args.quiet && !ctx.args.json {
        eprintln!(
            "[batch] Executing {} query(s) from {}",
            total,
            file_path.display()
        );
    }

    for (i, query) in queries.iter().enumerate() {
        if !ctx.args.quiet && !ctx.args.json {
            eprintln!("\n[batch] [{}/{}] {}", i + 1, total, truncate(query, 50));
        }
        execute_once(ctx, query).await?;
    }

    Ok(())
}

/// Non-empty, non-comment lines of a batch file.
fn parse_batch(content: &str) -> Vec<&str> {
    content
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect()
}

/// Truncate a string for display
fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
