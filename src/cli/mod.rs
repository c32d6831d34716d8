//! CLI module for Guardian headless operation.
//!
//! This module provides a command-line harness around the response engine,
//! enabling scripted scene checks and interactive sessions without a camera
//! or microphone attached.
//!
//! # Architecture
//!
//! ```text
//! +-----------------+     +----------------+     +---------------+
//! | PerceptionSource| --> | ResponseEngine | --> | output.rs     |
//! | (scene file)    |     | (remote/synth) |     | (print/JSON)  |
//! +-----------------+     +----------------+     +---------------+
//! ```
//!
//! # REPL Mode
//!
//! When no query is provided via `-e` or `-f`, the CLI enters
//! interactive REPL mode. See `repl.rs` for details.

mod args;
mod bootstrap;
mod output;
mod repl;
mod runner;

pub use args::Args;
pub use bootstrap::{initialize, CliContext};
pub use output::{format_history, format_status, print_reply, ReplyRecord};
pub use repl::{run_repl, ReplCommand};
pub use runner::{execute_batch, execute_once};
