//! Logging setup: a `tracing` fmt subscriber on stderr with an env filter.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Install the global subscriber.
///
/// `level` is the default directive; `RUST_LOG` still overrides per target.
/// Unknown levels fall back to `info`.
pub fn init_logging(level: &str) {
    let (level, invalid) = normalize_level(level);

    let filter = EnvFilter::builder()
        .with_default_directive(level.parse().unwrap_or_else(|_| {
            tracing::level_filters::LevelFilter::INFO.into()
        }))
        .parse_lossy(std::env::var("RUST_LOG").unwrap_or_default());

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();

    if let Some(invalid) = invalid {
        tracing::warn!("Invalid log level '{}', defaulting to 'info'", invalid);
    }
}

fn normalize_level(level: &str) -> (&'static str, Option<String>) {
    let lower = level.to_ascii_lowercase();
    match LEVELS.iter().find(|l| **l == lower) {
        Some(l) => (*l, None),
        None => ("info", Some(level.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_level() {
        assert_eq!(normalize_level("debug"), ("debug", None));
        assert_eq!(normalize_level("WARN"), ("warn", None));
        assert_eq!(normalize_level("loud"), ("info", Some("loud".to_string())));
    }
}
