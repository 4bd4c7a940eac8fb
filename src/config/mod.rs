//! Configuration loading and management

use serde::{Deserialize, Serialize};

use crate::core::error::{ProposalError, Result};

/// Listening address
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// Datatable paging limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatatableConfig {
    /// Rows per page when the client does not ask for a size
    pub page_size: usize,

    /// Upper bound for a requested page size
    pub max_page_size: usize,
}

impl Default for DatatableConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            max_page_size: 100,
        }
    }
}

/// Flash notice settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlashConfig {
    pub cookie_name: String,
}

impl Default for FlashConfig {
    fn default() -> Self {
        Self {
            cookie_name: "flash_message".to_string(),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,

    /// Locale of the message bundle
    pub locale: String,

    /// Optional YAML file overriding the built-in messages
    pub translations_path: Option<String>,

    pub datatable: DatatableConfig,

    pub flash: FlashConfig,
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ProposalError::Config(format!("{}: {}", path, e)))?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let mut config: Self = serde_yaml::from_str(yaml)?;
        if config.locale.is_empty() {
            config.locale = "en".to_string();
        }
        config.validate()?;
        Ok(config)
    }

    /// Defaults, with `locale` filled in
    pub fn default_config() -> Self {
        Self {
            locale: "en".to_string(),
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<()> {
        if self.datatable.page_size == 0 || self.datatable.max_page_size == 0 {
            return Err(ProposalError::Config(
                "datatable page sizes must be positive".to_string(),
            ));
        }
        if self.flash.cookie_name.is_empty()
            || !self
                .flash
                .cookie_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(ProposalError::Config(format!(
                "invalid flash cookie name: '{}'",
                self.flash.cookie_name
            )));
        }
        Ok(())
    }
}
