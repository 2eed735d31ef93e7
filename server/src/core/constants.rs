// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display and platform directories)
pub const APP_NAME: &str = "Estate";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".estate";

/// Human readable API title (startup log)
pub const API_TITLE: &str = "Real Estate API";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "estate.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "ESTATE_CONFIG";

// =============================================================================
// Environment Variables - Debug
// =============================================================================

/// Environment variable for debug mode
pub const ENV_DEBUG: &str = "ESTATE_DEBUG";

// =============================================================================
// Environment Variables - Server
// =============================================================================

/// Environment variable for server host
pub const ENV_HOST: &str = "ESTATE_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "ESTATE_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "ESTATE_LOG";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 8000;

/// Default log filter when neither ESTATE_LOG nor RUST_LOG is set
pub const DEFAULT_LOG_FILTER: &str = "info,estate=info";

/// Default log filter in debug mode
pub const DEBUG_LOG_FILTER: &str = "info,estate=debug";

// =============================================================================
// Environment Variables - Storage
// =============================================================================

/// Environment variable to override data directory
pub const ENV_DATA_DIR: &str = "ESTATE_DATA_DIR";

/// Environment variable for the document store backend (`sqlite` or `memory`)
pub const ENV_DATABASE_BACKEND: &str = "ESTATE_DATABASE_BACKEND";

/// Environment variable for the database location (SQLite file path or `:memory:`)
pub const ENV_DATABASE_URL: &str = "ESTATE_DATABASE_URL";

/// Environment variable for the logical database name
pub const ENV_DATABASE_NAME: &str = "ESTATE_DATABASE_NAME";

// =============================================================================
// Listings
// =============================================================================

/// Collection holding property listings
pub const DEFAULT_COLLECTION: &str = "property";

/// Default maximum number of results per search
pub const DEFAULT_SEARCH_LIMIT: u32 = 50;

/// Largest accepted search limit
pub const MAX_SEARCH_LIMIT: u32 = 200;

/// Maximum number of collection names reported by diagnostics
pub const DIAGNOSTICS_MAX_COLLECTIONS: usize = 10;

// =============================================================================
// SQLite Database
// =============================================================================

/// SQLite database filename
pub const SQLITE_DB_FILENAME: &str = "estate.db";

/// Path value selecting a private in-memory SQLite database
pub const SQLITE_MEMORY_PATH: &str = ":memory:";

/// Maximum connections in the SQLite pool
pub const SQLITE_MAX_CONNECTIONS: u32 = 5;

/// Busy timeout for SQLite connections
pub const SQLITE_BUSY_TIMEOUT_SECS: u64 = 30;

/// SQLite page cache size (negative = KiB)
pub const SQLITE_CACHE_SIZE: &str = "-64000";

/// Pages between automatic WAL checkpoints
pub const SQLITE_WAL_AUTOCHECKPOINT: &str = "1000";

/// Interval between background WAL checkpoints
pub const SQLITE_CHECKPOINT_INTERVAL_SECS: u64 = 300;

// =============================================================================
// Request Body Limits
// =============================================================================

/// Default body limit for API requests (1 MB)
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

// =============================================================================
// Shutdown
// =============================================================================

/// Maximum time to wait for background tasks during shutdown
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 30;
