//! Tracing setup.

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Crate targets that receive the configured level
const TARGETS: &[&str] = &["guardian_lib", "guardian_cli"];

/// Build the filter: `RUST_LOG` first, then `{target}={level}` for Guardian's
/// own targets.
pub fn env_filter(level: &str) -> Result<EnvFilter> {
    let mut filter = EnvFilter::from_default_env();
    for target in TARGETS {
        let directive = format!("{}={}", target, level.trim().to_lowercase());
        filter = filter.add_directive(
            directive
                .parse()
                .with_context(|| format!("Invalid log level '{}'", level))?,
        );
    }
    Ok(filter)
}

/// Install the global subscriber, writing to stderr. A second call is a no-op.
pub fn init_tracing(level: &str) -> Result<()> {
    let filter = env_filter(level)?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
    Ok(())
}
