//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Invoice numbering and aggregation configuration.
    #[serde(default)]
    pub invoice: InvoiceConfig,
    /// Booking lifecycle configuration.
    #[serde(default)]
    pub booking: BookingConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_log_filter() -> String {
    "staydesk=debug".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

/// Invoice configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceConfig {
    /// Prefix of generated invoice numbers.
    #[serde(default = "default_number_prefix")]
    pub number_prefix: String,
    /// Fresh numbers tried before a collision is reported to the caller.
    #[serde(default = "default_number_attempts")]
    pub number_attempts: u32,
    /// Length of the random suffix of invoice numbers.
    #[serde(default = "default_suffix_length")]
    pub suffix_length: usize,
}

fn default_number_prefix() -> String {
    "INV".to_string()
}

fn default_number_attempts() -> u32 {
    3
}

fn default_suffix_length() -> usize {
    6
}

impl Default for InvoiceConfig {
    fn default() -> Self {
        Self {
            number_prefix: default_number_prefix(),
            number_attempts: default_number_attempts(),
            suffix_length: default_suffix_length(),
        }
    }
}

/// Booking lifecycle configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingConfig {
    /// Reject booking status changes outside the stay lifecycle graph.
    #[serde(default)]
    pub enforce_status_transitions: bool,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("STAYDESK").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
