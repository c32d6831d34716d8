//! CLI argument parsing using clap.
//!
//! Defines the command-line interface for guardian-cli.

use clap::Parser;
use std::path::PathBuf;

/// Guardian CLI - Headless interface for the Guardian response engine
#[derive(Parser, Debug, Clone)]
#[command(name = "guardian-cli")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Execute a single query and exit
    #[arg(short = 'e', long, conflicts_with = "file")]
    pub execute: Option<String>,

    /// Execute queries from a file (one per line) and exit
    #[arg(short = 'f', long, conflicts_with = "execute")]
    pub file: Option<PathBuf>,

    /// Scene file: JSON array of `{class, score, bbox}` detections
    #[arg(short = 's', long)]
    pub scene: Option<PathBuf>,

    /// Mission mode override: medical, defense, policing
    #[arg(short = 'm', long)]
    pub mode: Option<String>,

    /// Override model from settings
    #[arg(long)]
    pub model: Option<String>,

    /// API key (overrides the stored key, settings and env vars)
    #[arg(long, env = "GUARDIAN_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Never call the remote model; always use deterministic replies
    #[arg(long)]
    pub offline: bool,

    /// Treat input as voice transcripts that must start with a wake word
    #[arg(long)]
    pub voice: bool,

    /// Settings file (default: ~/.guardian/settings.toml)
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Output replies as JSON lines (for scripting/parsing)
    #[arg(long)]
    pub json: bool,

    /// Only output the reply text
    #[arg(long, short = 'q')]
    pub quiet: bool,

    /// Show verbose output (debug information)
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_default_values() {
        let args = Args::parse_from(["guardian-cli"]);
        assert!(args.execute.is_none());
        assert!(args.scene.is_none());
        assert!(!args.offline);
        assert!(!args.voice);
        assert!(!args.json);
        assert!(!args.quiet);
        assert!(!args.verbose);
    }

    #[test]
    fn test_args_execute_flag() {
        let args = Args::parse_from(["guardian-cli", "-e", "what do you see"]);
        assert_eq!(args.execute, Some("what do you see".to_string()));
    }

    #[test]
    fn test_args_execute_conflicts_with_file() {
        let result = Args::try_parse_from(["guardian-cli", "-e", "hi", "-f", "queries.txt"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_args_scene_and_mode() {
        let args = Args::parse_from([
            "guardian-cli",
            "--scene",
            "scene.json",
            "-m",
            "defense",
            "--model",
            "gemini-2.0-flash",
        ]);
        assert_eq!(args.scene, Some(PathBuf::from("scene.json")));
        assert_eq!(args.mode, Some("defense".to_string()));
        assert_eq!(args.model, Some("gemini-2.0-flash".to_string()));
    }

    #[test]
    fn test_args_output_modes() {
        let args = Args::parse_from(["guardian-cli", "--json", "--quiet", "--offline", "--voice"]);
        assert!(args.json);
        assert!(args.quiet);
        assert!(args.offline);
        assert!(args.voice);
    }
}
