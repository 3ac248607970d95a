//! Log output for resolution and validation runs.
//!
//! `GENERA_LOG` takes either a bare level or full `EnvFilter` directives.
//! A bare level applies to the genera crates only; every other target stays
//! at `warn`, so `GENERA_LOG=trace` shows substitution steps without the
//! worker-pool and bench-harness noise.
//!
//! ```bash
//! # Diamond checks, join fallbacks and validation failures
//! GENERA_LOG=debug cargo test -p genera-checker
//!
//! # Per-edge substitution as an indented tree
//! GENERA_LOG=trace GENERA_LOG_FORMAT=tree cargo bench -p genera-solver
//! ```
//!
//! Nothing is installed unless `GENERA_LOG` is set.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Crates whose spans and events a bare `GENERA_LOG` level enables.
pub const ENGINE_TARGETS: &[&str] = &["genera_common", "genera_solver", "genera_checker"];

/// Level for targets outside [`ENGINE_TARGETS`].
const OTHER_TARGETS_LEVEL: &str = "warn";

/// Output shape, from `GENERA_LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    /// Indented by span nesting, one level per generalization edge.
    Tree,
    Json,
}

impl LogFormat {
    /// Unknown names fall back to [`LogFormat::Text`].
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Expand a `GENERA_LOG` value into filter directives.
///
/// `"debug"` becomes `warn,genera_common=debug,genera_solver=debug,...`.
/// Anything carrying a target (`=`) or several directives (`,`) is used as is.
pub fn engine_directives(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        return OTHER_TARGETS_LEVEL.to_string();
    }
    if value.contains('=') || value.contains(',') {
        return value.to_string();
    }
    let mut directives = OTHER_TARGETS_LEVEL.to_string();
    for target in ENGINE_TARGETS {
        directives.push(',');
        directives.push_str(target);
        directives.push('=');
        directives.push_str(value);
    }
    directives
}

/// Install the global subscriber from `GENERA_LOG` and `GENERA_LOG_FORMAT`.
///
/// Returns whether this call installed it. `false` when `GENERA_LOG` is
/// unset or another subscriber got there first, so tests and benches may all
/// call it.
pub fn init_tracing() -> bool {
    let Ok(value) = std::env::var("GENERA_LOG") else {
        return false;
    };
    let format = LogFormat::parse(&std::env::var("GENERA_LOG_FORMAT").unwrap_or_default());
    install(&engine_directives(&value), format)
}

fn install(directives: &str, format: LogFormat) -> bool {
    let filter = EnvFilter::builder().parse_lossy(directives);
    let installed = match format {
        LogFormat::Tree => Registry::default()
            .with(filter)
            .with(
                tracing_tree::HierarchicalLayer::default()
                    .with_indent_amount(2)
                    .with_indent_lines(true)
                    .with_targets(true),
            )
            .try_init(),
        LogFormat::Json => Registry::default()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Text => Registry::default()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    };
    installed.is_ok()
}

#[cfg(test)]
#[path = "../tests/tracing_config_tests.rs"]
mod tests;
