use clap::Parser;

use std::path::PathBuf;

use super::config::StoreBackend;
use super::constants::{
    ENV_CONFIG, ENV_DATABASE_BACKEND, ENV_DATABASE_NAME, ENV_DATABASE_URL, ENV_DEBUG, ENV_HOST,
    ENV_PORT,
};

#[derive(Parser)]
#[command(name = "estate")]
#[command(version, about = "Real estate listing search service", long_about = None)]
pub struct Cli {
    /// Server host address
    #[arg(long, short = 'H', env = ENV_HOST)]
    pub host: Option<String>,

    /// Server port
    #[arg(long, short = 'p', env = ENV_PORT)]
    pub port: Option<u16>,

    /// Enable debug mode (debug-level logging unless ESTATE_LOG or RUST_LOG is set)
    #[arg(long, env = ENV_DEBUG)]
    pub debug: bool,

    /// Path to config file
    #[arg(long, short = 'c', env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    // Database options
    /// Document store backend (sqlite or memory)
    #[arg(long, env = ENV_DATABASE_BACKEND, value_parser = parse_store_backend)]
    pub database_backend: Option<StoreBackend>,

    /// Database location: SQLite file path, or `:memory:`
    #[arg(long, env = ENV_DATABASE_URL)]
    pub database_url: Option<String>,

    /// Logical database name reported by diagnostics
    #[arg(long, env = ENV_DATABASE_NAME)]
    pub database_name: Option<String>,
}

/// Parse store backend from CLI/env string
fn parse_store_backend(s: &str) -> Result<StoreBackend, String> {
    match s.to_lowercase().as_str() {
        "sqlite" => Ok(StoreBackend::Sqlite),
        "memory" => Ok(StoreBackend::Memory),
        _ => Err(format!(
            "Invalid database backend '{}'. Valid options: sqlite, memory",
            s
        )),
    }
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub debug: bool,
    pub config: Option<PathBuf>,
    pub database_backend: Option<StoreBackend>,
    pub database_url: Option<String>,
    pub database_name: Option<String>,
}

impl From<Cli> for CliConfig {
    fn from(cli: Cli) -> Self {
        Self {
            host: cli.host,
            port: cli.port,
            debug: cli.debug,
            config: cli.config,
            database_backend: cli.database_backend,
            database_url: cli.database_url,
            database_name: cli.database_name,
        }
    }
}

/// Parse CLI arguments
pub fn parse() -> CliConfig {
    Cli::parse().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_store_backend() {
        assert_eq!(parse_store_backend("sqlite"), Ok(StoreBackend::Sqlite));
        assert_eq!(parse_store_backend("MEMORY"), Ok(StoreBackend::Memory));
        assert!(
            parse_store_backend("mongo")
                .unwrap_err()
                .contains("Valid options: sqlite, memory")
        );
    }

    #[test]
    fn test_cli_flags_map_to_config() {
        let cli = Cli::try_parse_from([
            "estate",
            "--host",
            "0.0.0.0",
            "-p",
            "9000",
            "--database-backend",
            "memory",
            "--database-name",
            "realestate",
        ])
        .unwrap();
        let config = CliConfig::from(cli);

        assert_eq!(config.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(config.port, Some(9000));
        assert_eq!(config.database_backend, Some(StoreBackend::Memory));
        assert_eq!(config.database_name.as_deref(), Some("realestate"));
    }

    #[test]
    fn test_invalid_backend_is_rejected() {
        let result = Cli::try_parse_from(["estate", "--database-backend", "mongo"]);
        assert!(result.is_err());
    }
}
