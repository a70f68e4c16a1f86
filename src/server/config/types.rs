//! Server configuration types.

use crate::deck::{ExportSettings, WatermarkConfig};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Main server configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server binding configuration.
    #[serde(default)]
    pub server: ServerBindConfig,
    /// Template locations.
    #[serde(default)]
    pub resources: ResourcesConfig,
    /// Confidentiality label settings.
    #[serde(default)]
    pub export: ExportConfig,
    /// Default watermark removal settings.
    #[serde(default)]
    pub watermark: WatermarkConfig,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        self.server.socket_addr()
    }

    /// Settings handed to the deck generator.
    pub fn export_settings(&self) -> ExportSettings {
        ExportSettings {
            confidential_label: self.export.confidential_label.clone(),
            confidential_font_pt: self.export.confidential_font_pt,
            watermark: self.watermark.clone(),
        }
    }
}

/// Server binding configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerBindConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Largest accepted request body.
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_body_limit() -> usize {
    50 * 1024 * 1024
}

impl Default for ServerBindConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

impl ServerBindConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

/// Where templates and the template mapping file live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourcesConfig {
    /// Directory template file names are resolved against.
    #[serde(default = "default_resources_dir")]
    pub dir: PathBuf,
    /// The JSON mapping file written by `template-mapper`.
    #[serde(default = "default_template_maps")]
    pub template_maps: PathBuf,
}

fn default_resources_dir() -> PathBuf {
    PathBuf::from("src/resources")
}

fn default_template_maps() -> PathBuf {
    PathBuf::from("src/resources/template-maps.json")
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        Self {
            dir: default_resources_dir(),
            template_maps: default_template_maps(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_confidential_label")]
    pub confidential_label: String,
    #[serde(default = "default_confidential_font_pt")]
    pub confidential_font_pt: f64,
}

fn default_confidential_label() -> String {
    "Bell Confidential".to_string()
}

fn default_confidential_font_pt() -> f64 {
    9.0
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            confidential_label: default_confidential_label(),
            confidential_font_pt: default_confidential_font_pt(),
        }
    }
}
