//! Configuration management for the Inventory MRP client
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with INVENTORY prefix

use std::time::Duration;

use config::{ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::{AbcThresholds, ReportOptions};

use crate::api::RetryPolicy;

/// Main client configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Backend API configuration
    pub api: ApiConfig,

    /// Retry behavior for read queries
    pub retry: RetryConfig,

    /// Report presentation settings
    pub reports: ReportsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Base URL of the inventory backend
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetryConfig {
    /// Retries for list queries (single-item reads and mutations never retry)
    pub list_retries: u32,

    /// Delay before the first retry, doubled on each further attempt
    pub base_delay_ms: u64,

    /// Upper bound for the retry delay
    pub max_delay_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportsConfig {
    /// Upper cumulative share of class A
    pub abc_threshold_a: f64,

    /// Upper cumulative share of class B
    pub abc_threshold_b: f64,

    /// ABC rows shown before truncating
    pub abc_show_rows: usize,

    /// Size of the top products ranking
    pub top_products: usize,

    /// Movements fetched for the product detail view
    pub movements_limit: u32,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("INVENTORY_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("api.base_url", "http://localhost:8000")?
            .set_default("api.timeout_secs", 30)?
            .set_default("retry.list_retries", 3)?
            .set_default("retry.base_delay_ms", 1000)?
            .set_default("retry.max_delay_ms", 30000)?
            .set_default("reports.abc_threshold_a", 0.8)?
            .set_default("reports.abc_threshold_b", 0.95)?
            .set_default("reports.abc_show_rows", 15)?
            .set_default("reports.top_products", 5)?
            .set_default("reports.movements_limit", 20)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (INVENTORY__ prefix)
            .add_source(
                Environment::with_prefix("INVENTORY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl RetryConfig {
    /// Policy applied to list queries
    pub fn list_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.list_retries,
            Duration::from_millis(self.base_delay_ms),
            Duration::from_millis(self.max_delay_ms),
        )
    }
}

impl ReportsConfig {
    /// Validated report options
    pub fn report_options(&self) -> Result<ReportOptions, ConfigError> {
        let a = Decimal::try_from(self.abc_threshold_a)
            .map_err(|e| ConfigError::Message(format!("reports.abc_threshold_a: {}", e)))?;
        let b = Decimal::try_from(self.abc_threshold_b)
            .map_err(|e| ConfigError::Message(format!("reports.abc_threshold_b: {}", e)))?;
        let thresholds =
            AbcThresholds::new(a, b).map_err(|e| ConfigError::Message(e.to_string()))?;

        Ok(ReportOptions {
            thresholds,
            abc_show_rows: self.abc_show_rows,
            top_products: self.top_products,
        })
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            list_retries: 3,
            base_delay_ms: 1000,
            max_delay_ms: 30000,
        }
    }
}
