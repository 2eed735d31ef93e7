//! Core application

use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, fmt, reload};

use crate::api::ApiServer;
use crate::core::cli::{self, CliConfig};
use crate::core::config::AppConfig;
use crate::core::constants::{API_TITLE, DEBUG_LOG_FILTER, DEFAULT_LOG_FILTER, ENV_LOG};
use crate::core::shutdown::ShutdownService;
use crate::core::storage::AppStorage;
use crate::data::StoreService;
use crate::domain::ListingService;

/// Handle for swapping the log filter after config is loaded
type LogFilterHandle = reload::Handle<EnvFilter, Registry>;

pub struct CoreApp {
    pub shutdown: ShutdownService,
    pub config: AppConfig,
    pub storage: AppStorage,
    /// `None` when the store failed to initialize and the service runs degraded
    pub store: Option<Arc<StoreService>>,
    pub listings: ListingService,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        let log_filter = Self::init_logging();

        tracing::debug!("Application starting");

        let cli_config = cli::parse();
        tracing::trace!(config = ?cli_config, "Parsed command line");

        let app = Self::init(&cli_config, log_filter.as_ref()).await?;
        Self::start_server(app).await
    }

    async fn init(cli: &CliConfig, log_filter: Option<&LogFilterHandle>) -> Result<Self> {
        let config = AppConfig::load(cli)?;
        if let Some(handle) = log_filter {
            apply_debug_filter(handle, config.debug);
        }
        let storage = AppStorage::init().await?;

        let store = match StoreService::init(&config.database, &storage).await {
            Ok(store) => {
                tracing::debug!(backend = %store.backend(), "Document store initialized");
                Some(Arc::new(store))
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    backend = %config.database.backend,
                    "Document store unavailable, listing requests will fail until restart"
                );
                None
            }
        };

        let listings = ListingService::new(
            store.as_ref().map(|s| s.store()),
            config.database.collection.clone(),
        );
        let shutdown = ShutdownService::new(store.clone());

        Ok(Self {
            shutdown,
            config,
            storage,
            store,
            listings,
        })
    }

    /// Returns a reload handle unless the filter came from the environment
    fn init_logging() -> Option<LogFilterHandle> {
        let env_filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .ok();
        let from_env = env_filter.is_some();
        let filter = env_filter.unwrap_or_else(|| default_log_filter(false).to_string());

        let (filter_layer, handle) = reload::Layer::new(EnvFilter::new(filter));
        tracing_subscriber::registry()
            .with(filter_layer)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_level(true)
                    .with_ansi(true)
                    .compact(),
            )
            .init();

        (!from_env).then_some(handle)
    }

    async fn start_server(app: Self) -> Result<()> {
        // Install signal handlers FIRST (before any blocking calls)
        app.shutdown.install_signal_handlers();

        app.start_background_tasks().await;

        tracing::info!(
            host = %app.config.server.host,
            port = app.config.server.port,
            data_dir = %app.storage.data_dir().display(),
            store = if app.listings.is_available() { "available" } else { "unavailable" },
            "{} starting",
            API_TITLE
        );

        let server = ApiServer::new(app);
        let app = server.start().await?;
        app.shutdown.shutdown().await;

        Ok(())
    }

    pub async fn start_background_tasks(&self) {
        if let Some(store) = &self.store
            && let Some(handle) = store.start_checkpoint_task(self.shutdown.subscribe())
        {
            self.shutdown.register(handle).await;
        }

        tracing::debug!("Background tasks started");
    }
}

/// Filter used when neither ESTATE_LOG nor RUST_LOG is set
fn default_log_filter(debug: bool) -> &'static str {
    if debug {
        DEBUG_LOG_FILTER
    } else {
        DEFAULT_LOG_FILTER
    }
}

/// Raise the default filter to debug level when debug mode is on
fn apply_debug_filter(handle: &LogFilterHandle, debug: bool) {
    if !debug {
        return;
    }
    match handle.reload(EnvFilter::new(default_log_filter(true))) {
        Ok(()) => tracing::debug!("Debug logging enabled"),
        Err(e) => tracing::warn!(error = %e, "Failed to enable debug logging"),
    }
}
