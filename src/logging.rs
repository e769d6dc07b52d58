//! Logger bootstrap for hosts embedding the engine.

use crate::config::LogLevel;

/// Install the process logger at the configured level.
///
/// `RUST_LOG` still overrides the level for individual modules. Calling this
/// more than once keeps the first logger and only adjusts the level.
#[cfg(not(target_arch = "wasm32"))]
pub fn init(level: LogLevel) {
    let filter = level.to_level_filter();
    let result = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter.as_str()))
        .format_timestamp_millis()
        .try_init();
    if result.is_err() {
        log::set_max_level(filter);
    }
    log::debug!("📋 Logging at {}", level.name());
}

/// The host installs its own logger on wasm; only the level is applied.
#[cfg(target_arch = "wasm32")]
pub fn init(level: LogLevel) {
    log::set_max_level(level.to_level_filter());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        init(LogLevel::Warn);
        init(LogLevel::Debug);
        assert_eq!(log::max_level(), log::LevelFilter::Debug);
    }
}
