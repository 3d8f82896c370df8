//! Scanlite configuration.

use std::env;

/// Request handling configuration.
#[derive(Debug, Clone)]
pub struct ScanliteConfig {
    /// Most constraint violations listed in one validation error.
    pub max_validation_errors: usize,
    /// Most write requests accepted by one `BatchWriteItem` call.
    pub max_batch_write_items: usize,
    /// Apply the digit and magnitude limits to request numbers.
    pub enforce_number_limits: bool,
    /// Log every dispatched operation.
    pub log_requests: bool,
}

impl ScanliteConfig {
    /// Create configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_validation_errors: env_usize(
                "SCANLITE_MAX_VALIDATION_ERRORS",
                defaults.max_validation_errors,
            ),
            max_batch_write_items: env_usize(
                "SCANLITE_MAX_BATCH_WRITE_ITEMS",
                defaults.max_batch_write_items,
            ),
            enforce_number_limits: env_bool(
                "SCANLITE_ENFORCE_NUMBER_LIMITS",
                defaults.enforce_number_limits,
            ),
            log_requests: env_bool("SCANLITE_LOG_REQUESTS", defaults.log_requests),
        }
    }
}

impl Default for ScanliteConfig {
    fn default() -> Self {
        Self {
            max_validation_errors: 10,
            max_batch_write_items: 25,
            enforce_number_limits: true,
            log_requests: false,
        }
    }
}

fn env_bool(key: &str, default: bool) -> bool {
    env::var(key).map_or(default, |v| {
        matches!(v.as_str(), "1" | "true" | "yes" | "TRUE" | "YES")
    })
}

fn env_usize(key: &str, default: usize) -> usize {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
