//! Logging initialization.
//!
//! Logs go to stderr so that stdout only carries command output (paths,
//! fingerprints, JSON).

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the global subscriber at `level`, pretty or JSON.
///
/// `RUST_LOG` takes precedence over `level` when set.
pub fn init(level: &str, json_format: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Initialize logging from the `[logging]` section with CLI overrides.
pub fn init_from_config(
    config: &multipath_core::Config,
    verbose_override: bool,
    json_logs_override: bool,
) {
    let (level, json_format) = resolve(config, verbose_override, json_logs_override);
    init(level, json_format);
}

fn resolve(
    config: &multipath_core::Config,
    verbose_override: bool,
    json_logs_override: bool,
) -> (&str, bool) {
    let level = match config.logging.level.as_str() {
        _ if verbose_override => "debug",
        "" => "info",
        level => level,
    };
    (level, json_logs_override || config.logging.format == "json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_wins_over_config_level() {
        let mut config = multipath_core::Config::default();
        config.logging.level = "warn".into();
        assert_eq!(resolve(&config, false, false), ("warn", false));
        assert_eq!(resolve(&config, true, false), ("debug", false));

        config.logging.format = "json".into();
        assert_eq!(resolve(&config, false, false), ("warn", true));
    }
}
