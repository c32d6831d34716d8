//! Lightweight REPL (Read-Eval-Print-Loop) for guardian-cli.
//!
//! Provides an interactive mode when no query is provided via `-e` or `-f`.
//! Supports commands:
//! - `/quit`, `/exit`, `/q` - Exit the REPL
//! - `/mode <name>` - Switch mission mode
//! - `/key <api-key>` - Store and use an API key
//! - `/clearkey` - Forget the API key
//! - `/verify <api-key>` - Test an API key against the remote model
//! - `/history`, `/clear` - Show or clear conversation history
//! - `/status` - Mode, remote availability and threat panel
//! - `/config <key>` - Show a setting by dotted key
//! - `/help` - List commands
//!
//! Any other input is sent as a query to the engine.

use std::io::{self, BufRead, Write};

use anyhow::Result;

use crate::credentials::validate_credential_format;

use super::bootstrap::CliContext;
use super::output::{format_history, format_status};
use super::runner::execute_once;

const HELP: &str = "Commands: /mode <medical|defense|policing>, /key <api-key>, /clearkey, /verify <api-key>, /history, /clear, /status, /config <key>, /help, /quit";

/// REPL command variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    /// Exit the REPL
    Quit,
    /// Switch mission mode
    Mode(String),
    /// Set and persist an API key
    Key(String),
    /// Forget the API key
    ClearKey,
    /// Test an API key
    Verify(String),
    /// Show conversation history
    History,
    /// Clear conversation history
    ClearHistory,
    /// Show engine status
    Status,
    /// Show a setting
    Config(String),
    /// List commands
    Help,
    /// Command missing its argument
    Usage(&'static str),
    /// Unknown command (will show help)
    Unknown(String),
    /// Regular query to send to the engine
    Prompt(String),
    /// Empty input (skip)
    Empty,
}

impl ReplCommand {
    /// Parse user input into a REPL command.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();

        if trimmed.is_empty() {
            return ReplCommand::Empty;
        }

        if !trimmed.starts_with('/') {
            return ReplCommand::Prompt(trimmed.to_string());
        }

        let (command, arg) = match trimmed.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (trimmed, ""),
        };

        match (command.to_lowercase().as_str(), arg) {
            ("/quit" | "/exit" | "/q", _) => ReplCommand::Quit,
            ("/mode", "") => ReplCommand::Usage("/mode <medical|defense|policing>"),
            ("/mode", name) => ReplCommand::Mode(name.to_string()),
            ("/key", "") => ReplCommand::Usage("/key <api-key>"),
            ("/key", key) => ReplCommand::Key(key.to_string()),
            ("/clearkey", _) => ReplCommand::ClearKey,
            ("/verify", "") => ReplCommand::Usage("/verify <api-key>"),
            ("/verify", key) => ReplCommand::Verify(key.to_string()),
            ("/history", _) => ReplCommand::History,
            ("/clear", _) => ReplCommand::ClearHistory,
            ("/status", _) => ReplCommand::Status,
            ("/config", "") => ReplCommand::Usage("/config <key>"),
            ("/config", key) => ReplCommand::Config(key.to_string()),
            ("/help" | "/?", _) => ReplCommand::Help,
            _ => ReplCommand::Unknown(trimmed.to_string()),
        }
    }
}

/// Run an interactive REPL session.
///
/// Returns when the user exits or on EOF (Ctrl+D).
pub async fn run_repl(ctx: &CliContext) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    eprintln!("guardian-cli interactive mode ({} mode)", ctx.engine.active_mode());
    eprintln!("Type /help for commands, /quit to exit\n");

    loop {
        print!("> ");
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            // EOF (Ctrl+D)
            eprintln!("\nGoodbye!");
            break;
        }

        match ReplCommand::parse(&input) {
            ReplCommand::Empty => continue,
            ReplCommand::Quit => {
                eprintln!("Goodbye!");
                break;
            }
            ReplCommand::Mode(name) => match ctx.engine.set_mode(&name) {
                Ok(mode) => eprintln!("Mission mode: {}", mode),
                Err(e) => eprintln!("Error: {}", e),
            },
            ReplCommand::Key(key) => handle_key(ctx, &key),
            ReplCommand::ClearKey => {
                ctx.engine.clear_credential();
                match ctx.credential_store.clear() {
                    Ok(()) => eprintln!("API key cleared. Using deterministic replies."),
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
            ReplCommand::Verify(key) => match ctx.engine.verify_credential(&key).await {
                Ok(reply) => eprintln!("API key works. Model replied: {}", reply),
                Err(e) => eprintln!("Verification failed: {}", e),
            },
            ReplCommand::History => println!("{}", format_history(&ctx.engine.history())),
            ReplCommand::ClearHistory => {
                ctx.engine.clear_history();
                eprintln!("Conversation history cleared.");
            }
            ReplCommand::Status => {
                let detections = ctx.engine.snapshot(&ctx.perception.detect());
                println!(
                    "{}",
                    format_status(
                        ctx.engine.active_mode(),
                        ctx.remote_enabled(),
                        ctx.engine.last_failure(),
                        &detections,
                    )
                );
            }
            ReplCommand::Config(key) => match ctx.settings_manager.get_value(&key).await {
                Ok(value) => println!("{} = {}", key, value),
                Err(e) => eprintln!("Error: {}", e),
            },
            ReplCommand::Help => eprintln!("{}", HELP),
            ReplCommand::Usage(usage) => eprintln!("Usage: {}", usage),
            ReplCommand::Unknown(cmd) => {
                eprintln!("Unknown command: {}", cmd);
                eprintln!("{}", HELP);
            }
            ReplCommand::Prompt(prompt) => {
                if let Err(e) = execute_once(ctx, &prompt).await {
                    eprintln!("Error: {}", e);
                }
                println!();
            }
        }
    }

    Ok(())
}

fn handle_key(ctx: &CliContext, key: &str) {
    let credential = match validate_credential_format(key) {
        Ok(credential) => credential,
        Err(e) => {
            eprintln!("Error: {}", e);
            return;
        }
    };

    if let Err(e) = ctx.credential_store.save(&credential) {
        eprintln!("Warning: API key not saved: {}", e);
    }

    if ctx.args.offline {
        eprintln!("API key saved. Offline mode keeps the remote model disabled.");
    } else {
        ctx.engine.set_credential(credential.expose());
        eprintln!("API key set. Remote model enabled.");
    }
}
