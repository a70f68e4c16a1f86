//! Configuration validation.

use super::types::ServerConfig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid port: {0}")]
    InvalidPort(u16),

    #[error("Invalid body limit: must be greater than zero")]
    InvalidBodyLimit,

    #[error("Confidential label must not be empty")]
    EmptyConfidentialLabel,

    #[error("Invalid confidential font size: {0}")]
    InvalidFontSize(f64),

    #[error("Invalid watermark threshold: {0}")]
    InvalidWatermarkThreshold(&'static str),
}

/// Validate server configuration.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.server.port == 0 {
        errors.push(ConfigError::InvalidPort(0));
    }

    if config.server.body_limit_bytes == 0 {
        errors.push(ConfigError::InvalidBodyLimit);
    }

    if config.export.confidential_label.trim().is_empty() {
        errors.push(ConfigError::EmptyConfidentialLabel);
    }

    if !(config.export.confidential_font_pt > 0.0) {
        errors.push(ConfigError::InvalidFontSize(config.export.confidential_font_pt));
    }

    errors.extend(
        config
            .watermark
            .invalid_thresholds()
            .into_iter()
            .map(ConfigError::InvalidWatermarkThreshold),
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
