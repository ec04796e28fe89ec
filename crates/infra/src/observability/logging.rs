//! Tracing subscriber initialisation

use predcache_domain::{LoggingConfig, PredCacheError, Result};
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence over `config.level`. Returns `Ok(false)` when
/// a subscriber was already installed, which is not an error.
///
/// # Errors
/// Returns `PredCacheError::Config` if `config.level` is not a valid filter
/// directive and `RUST_LOG` is unset.
pub fn init_tracing(config: &LoggingConfig) -> Result<bool> {
    let filter = build_filter(config)?;

    let installed = if config.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).with_target(true).try_init()
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).with_target(true).try_init()
    };

    Ok(installed.is_ok())
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.level).map_err(|err| {
            PredCacheError::Config(format!("Invalid log level '{}': {}", config.level, err))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_initialisation_is_tolerated() {
        let config = LoggingConfig::default();
        let first = init_tracing(&config).unwrap();
        let second = init_tracing(&config).unwrap();
        assert!(!(first && second), "only one subscriber can be installed");
        assert!(!second);
    }

    #[test]
    fn filter_accepts_module_directives() {
        let config = LoggingConfig { level: "predcache_core=debug,warn".to_string(), json: true };
        assert!(build_filter(&config).is_ok());
    }
}
