use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::utils::file::expand_path;

use super::cli::CliConfig;
use super::constants::{
    APP_DOT_FOLDER, CONFIG_FILE_NAME, DEFAULT_COLLECTION, DEFAULT_HOST, DEFAULT_PORT,
};

// =============================================================================
// Store Backend Enum (SQLite or in-memory)
// =============================================================================

/// Document store backend for listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Sqlite,
    Memory,
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::Sqlite => write!(f, "sqlite"),
            StoreBackend::Memory => write!(f, "memory"),
        }
    }
}

// =============================================================================
// File Config Structs (from JSON config file)
// =============================================================================

/// Server configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ServerFileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// SQLite configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct SqliteFileConfig {
    /// Database file path, or `:memory:`
    pub path: Option<String>,
}

/// Database configuration section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct DatabaseFileConfig {
    /// Store backend: sqlite (default) or memory
    pub backend: Option<StoreBackend>,
    /// Logical database name reported by diagnostics
    pub name: Option<String>,
    /// Collection holding listings
    pub collection: Option<String>,
    /// SQLite-specific configuration
    pub sqlite: Option<SqliteFileConfig>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub server: Option<ServerFileConfig>,
    pub database: Option<DatabaseFileConfig>,
    pub debug: Option<bool>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        if let Some(server) = other.server {
            let current = self.server.get_or_insert_with(ServerFileConfig::default);
            if server.host.is_some() {
                tracing::trace!(host = ?server.host, "Merging server.host");
                current.host = server.host;
            }
            if server.port.is_some() {
                tracing::trace!(port = ?server.port, "Merging server.port");
                current.port = server.port;
            }
        }

        if let Some(database) = other.database {
            let current = self.database.get_or_insert_with(DatabaseFileConfig::default);
            if database.backend.is_some() {
                tracing::trace!(backend = ?database.backend, "Merging database.backend");
                current.backend = database.backend;
            }
            if database.name.is_some() {
                tracing::trace!(name = ?database.name, "Merging database.name");
                current.name = database.name;
            }
            if database.collection.is_some() {
                tracing::trace!(collection = ?database.collection, "Merging database.collection");
                current.collection = database.collection;
            }
            if let Some(sqlite) = database.sqlite {
                let current_sqlite = current.sqlite.get_or_insert_with(SqliteFileConfig::default);
                if sqlite.path.is_some() {
                    tracing::trace!(path = ?sqlite.path, "Merging database.sqlite.path");
                    current_sqlite.path = sqlite.path;
                }
            }
        }

        if other.debug.is_some() {
            tracing::trace!(debug = ?other.debug, "Merging debug");
            self.debug = other.debug;
        }
    }
}

// =============================================================================
// Runtime Config Structs (final merged configuration)
// =============================================================================

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// SQLite configuration (final/runtime)
#[derive(Debug, Clone, Default)]
pub struct SqliteConfig {
    /// Explicit database path; `None` uses the file under the data directory
    pub path: Option<String>,
}

/// Database configuration (final/runtime)
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub backend: StoreBackend,
    pub name: Option<String>,
    pub collection: String,
    pub sqlite: SqliteConfig,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            name: None,
            collection: DEFAULT_COLLECTION.to_string(),
            sqlite: SqliteConfig::default(),
        }
    }
}

impl DatabaseConfig {
    /// Whether a database location was configured explicitly
    pub fn url_configured(&self) -> bool {
        self.sqlite.path.is_some()
    }
}

/// Final merged application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub debug: bool,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.estate/estate.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        if let Some(profile_path) = get_profile_config_path()
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(&profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_path(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        let config = Self::from_layers(cli, file_config);
        config.validate()?;

        if is_all_interfaces(&config.server.host) {
            tracing::warn!(
                host = %config.server.host,
                "Listening on all interfaces; listing creation is unauthenticated"
            );
        }

        tracing::debug!(config = ?config, "Configuration loaded");
        Ok(config)
    }

    /// Layer configs: defaults -> file config -> CLI/env overrides
    fn from_layers(cli: &CliConfig, file_config: FileConfig) -> Self {
        let file_server = file_config.server.unwrap_or_default();
        let file_database = file_config.database.unwrap_or_default();
        let file_sqlite = file_database.sqlite.unwrap_or_default();

        let host = cli
            .host
            .clone()
            .or(file_server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = cli.port.or(file_server.port).unwrap_or(DEFAULT_PORT);

        let database = DatabaseConfig {
            backend: cli
                .database_backend
                .or(file_database.backend)
                .unwrap_or_default(),
            name: cli.database_name.clone().or(file_database.name),
            collection: file_database
                .collection
                .unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
            sqlite: SqliteConfig {
                path: cli.database_url.clone().or(file_sqlite.path),
            },
        };

        // debug: CLI flag enables, otherwise file config decides
        let debug = cli.debug || file_config.debug.unwrap_or(false);

        Self {
            server: ServerConfig { host, port },
            database,
            debug,
        }
    }

    /// Validate the configuration for consistency and correctness
    fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            anyhow::bail!("Configuration error: server.host must not be empty");
        }

        // Port 0 would bind an ephemeral port nobody knows about
        if self.server.port == 0 {
            anyhow::bail!("Configuration error: server.port must be greater than 0");
        }

        if self.database.collection.trim().is_empty() {
            anyhow::bail!("Configuration error: database.collection must not be empty");
        }

        if self
            .database
            .sqlite
            .path
            .as_deref()
            .is_some_and(|p| p.trim().is_empty())
        {
            anyhow::bail!("Configuration error: database.sqlite.path must not be empty when set");
        }

        Ok(())
    }
}

/// Get the profile config path (~/.estate/estate.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}

/// Check if host binds to all network interfaces
fn is_all_interfaces(host: &str) -> bool {
    matches!(host, "0.0.0.0" | "::" | "[::]")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(json: &str) -> FileConfig {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_store_backend_serde() {
        let backend: StoreBackend = serde_json::from_str(r#""memory""#).unwrap();
        assert_eq!(backend, StoreBackend::Memory);
        assert_eq!(StoreBackend::Sqlite.to_string(), "sqlite");
        assert!(serde_json::from_str::<StoreBackend>(r#""mongo""#).is_err());
    }

    #[test]
    fn test_file_config_parse_full() {
        let config = parse(
            r#"{
                "server": { "host": "0.0.0.0", "port": 8080 },
                "database": {
                    "backend": "sqlite",
                    "name": "realestate",
                    "collection": "listings",
                    "sqlite": { "path": "/tmp/estate.db" }
                },
                "debug": true
            }"#,
        );

        let server = config.server.as_ref().unwrap();
        assert_eq!(server.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(server.port, Some(8080));

        let database = config.database.as_ref().unwrap();
        assert_eq!(database.backend, Some(StoreBackend::Sqlite));
        assert_eq!(database.name.as_deref(), Some("realestate"));
        assert_eq!(database.collection.as_deref(), Some("listings"));
        assert_eq!(
            database.sqlite.as_ref().unwrap().path.as_deref(),
            Some("/tmp/estate.db")
        );
        assert_eq!(config.debug, Some(true));
    }

    #[test]
    fn test_file_config_parse_empty() {
        let config = parse("{}");
        assert!(config.server.is_none());
        assert!(config.database.is_none());
        assert!(config.debug.is_none());
    }

    #[test]
    fn test_file_config_parse_extra_fields() {
        let config = parse(r#"{ "server": { "host": "localhost" }, "mongo_url": "x" }"#);
        assert_eq!(config.extra.get("mongo_url").unwrap(), "x");
    }

    #[test]
    fn test_file_config_merge() {
        let mut base = parse(
            r#"{
                "server": { "host": "base.host", "port": 1000 },
                "database": { "name": "base", "sqlite": { "path": "base.db" } }
            }"#,
        );
        let overlay = parse(
            r#"{
                "server": { "port": 2000 },
                "database": { "backend": "memory" },
                "debug": true
            }"#,
        );

        base.merge(overlay);

        let server = base.server.as_ref().unwrap();
        assert_eq!(server.host.as_deref(), Some("base.host"));
        assert_eq!(server.port, Some(2000));

        let database = base.database.as_ref().unwrap();
        assert_eq!(database.backend, Some(StoreBackend::Memory));
        assert_eq!(database.name.as_deref(), Some("base"));
        assert_eq!(
            database.sqlite.as_ref().unwrap().path.as_deref(),
            Some("base.db")
        );
        assert_eq!(base.debug, Some(true));
    }

    #[test]
    fn test_from_layers_defaults() {
        let config = AppConfig::from_layers(&CliConfig::default(), FileConfig::default());

        assert_eq!(config.server.host, DEFAULT_HOST);
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.database.backend, StoreBackend::Sqlite);
        assert_eq!(config.database.collection, DEFAULT_COLLECTION);
        assert!(config.database.name.is_none());
        assert!(!config.database.url_configured());
        assert!(!config.debug);
    }

    #[test]
    fn test_from_layers_cli_overrides_file() {
        let file = parse(
            r#"{
                "server": { "host": "file.host", "port": 1000 },
                "database": { "backend": "sqlite", "name": "file", "sqlite": { "path": "file.db" } }
            }"#,
        );
        let cli = CliConfig {
            host: Some("cli.host".to_string()),
            port: Some(3000),
            debug: true,
            database_backend: Some(StoreBackend::Memory),
            database_url: Some(":memory:".to_string()),
            database_name: Some("cli".to_string()),
            ..Default::default()
        };

        let config = AppConfig::from_layers(&cli, file);

        assert_eq!(config.server.host, "cli.host");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.backend, StoreBackend::Memory);
        assert_eq!(config.database.name.as_deref(), Some("cli"));
        assert_eq!(config.database.sqlite.path.as_deref(), Some(":memory:"));
        assert!(config.debug);
    }

    #[test]
    fn test_load_from_explicit_config_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "server": {{ "port": 9100 }}, "database": {{ "collection": "homes" }} }}"#
        )
        .unwrap();

        let cli = CliConfig {
            config: Some(file.path().to_path_buf()),
            host: Some("127.0.0.1".to_string()),
            ..Default::default()
        };
        let config = AppConfig::load(&cli).unwrap();

        assert_eq!(config.server.port, 9100);
        assert_eq!(config.database.collection, "homes");
    }

    #[test]
    fn test_load_missing_config_path_fails() {
        let cli = CliConfig {
            config: Some(PathBuf::from("/nonexistent/estate.json")),
            ..Default::default()
        };
        let err = AppConfig::load(&cli).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_validation_server_port_zero() {
        let config = AppConfig::from_layers(
            &CliConfig {
                port: Some(0),
                ..Default::default()
            },
            FileConfig::default(),
        );
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("server.port must be greater than 0"));
    }

    #[test]
    fn test_validation_empty_host() {
        let config = AppConfig::from_layers(
            &CliConfig {
                host: Some(String::new()),
                ..Default::default()
            },
            FileConfig::default(),
        );
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("server.host must not be empty"));
    }

    #[test]
    fn test_validation_empty_collection() {
        let config = AppConfig::from_layers(
            &CliConfig::default(),
            parse(r#"{ "database": { "collection": "  " } }"#),
        );
        let err = config.validate().unwrap_err();
        assert!(
            err.to_string()
                .contains("database.collection must not be empty")
        );
    }

    #[test]
    fn test_validation_empty_sqlite_path() {
        let config = AppConfig::from_layers(
            &CliConfig {
                database_url: Some(String::new()),
                ..Default::default()
            },
            FileConfig::default(),
        );
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_is_all_interfaces() {
        assert!(is_all_interfaces("0.0.0.0"));
        assert!(is_all_interfaces("::"));
        assert!(is_all_interfaces("[::]"));
        assert!(!is_all_interfaces("127.0.0.1"));
        assert!(!is_all_interfaces("localhost"));
    }
}
