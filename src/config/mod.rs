//! Configuration loading and management
//!
//! Configuration is read from YAML. Every section has defaults, so an empty
//! document is a valid configuration. Environment variables override the
//! values that differ between deployments:
//!
//! - `POSTGRES_URL`: database connection URL
//! - `INVOICE_DASH_ADDR`: HTTP bind address

use crate::core::cache::DEFAULT_VIEW_CAPACITY;
use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable naming the database URL
pub const DATABASE_URL_ENV: &str = "POSTGRES_URL";

/// Environment variable naming the bind address
pub const ADDR_ENV: &str = "INVOICE_DASH_ADDR";

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub dashboard: DashboardConfig,
    pub search: SearchConfig,
    pub actions: ActionsConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind, e.g. `127.0.0.1:3000`
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Relational store settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection URL; `None` selects the in-memory store
    pub url: Option<String>,

    /// Upper bound handed to the driver's pool
    pub max_connections: u32,

    /// Require TLS to the database server
    pub require_ssl: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 5,
            require_ssl: true,
        }
    }
}

/// List view settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Path of the invoice list view; mutations revalidate and redirect here
    pub list_path: String,

    /// Invoices per list page
    pub items_per_page: usize,

    /// Cached list views kept per distinct query; 0 turns the cache off
    pub cache_capacity: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            list_path: "/dashboard/invoices".to_string(),
            items_per_page: 6,
            cache_capacity: DEFAULT_VIEW_CAPACITY,
        }
    }
}

/// Search box settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Quiet period before a keystroke turns into a navigation
    pub debounce_ms: u64,
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { debounce_ms: 300 }
    }
}

/// What the update action does when the store rejects a valid write
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateFailurePolicy {
    /// Return a failure message to the form; no revalidation, no redirect
    #[default]
    Report,

    /// Log, then revalidate and redirect as if the write succeeded
    Redirect,
}

/// Mutation action settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionsConfig {
    pub update_failure: UpdateFailurePolicy,
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.to_string(),
            },
            _ => ConfigError::IoError {
                message: e.to_string(),
            },
        })?;
        Self::parse(&content, Some(path))
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Self::parse(yaml, None)
    }

    fn parse(yaml: &str, file: Option<&str>) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to an empty mapping.
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError {
                file: file.map(str::to_string),
                message: e.to_string(),
            })?
        };
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup (the environment in production)
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(DATABASE_URL_ENV).filter(|v| !v.is_empty()) {
            self.database.url = Some(url);
        }
        if let Some(addr) = lookup(ADDR_ENV).filter(|v| !v.is_empty()) {
            self.server.addr = addr;
        }
        self
    }

    /// Check invariants the types cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        let list_path = &self.dashboard.list_path;
        if !list_path.starts_with('/') || list_path.ends_with('/') {
            return Err(ConfigError::InvalidValue {
                field: "dashboard.list_path".to_string(),
                value: list_path.clone(),
                message: "must start with '/' and must not end with '/'".to_string(),
            });
        }
        if self.dashboard.items_per_page == 0 {
            return Err(ConfigError::InvalidValue {
                field: "dashboard.items_per_page".to_string(),
                value: "0".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                field: "database.max_connections".to_string(),
                value: "0".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
