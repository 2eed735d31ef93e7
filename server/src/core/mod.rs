//! Core application infrastructure

pub mod cli;
pub mod config;
pub mod constants;
pub mod shutdown;
pub mod storage;

pub use crate::app::CoreApp;
pub use cli::CliConfig;
pub use config::{AppConfig, DatabaseConfig, ServerConfig, StoreBackend};
pub use storage::{AppStorage, DataSubdir};

// Re-export the store service enum from the data layer
pub use crate::data::StoreService;

pub use shutdown::ShutdownService;
