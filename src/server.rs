//! Reusable server runtime.
//!
//! [`ServerHandle`] owns the full lifecycle: metrics recorder, database and
//! migrations, bootstrap admin, the REST API and graceful shutdown.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use crate::application::UserService;
use crate::config::AppConfig;
use crate::domain::RepositoryProvider;
use crate::infrastructure::database::migrator::Migrator;
use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;
use crate::infrastructure::init_database;
use crate::interfaces::http::{create_api_router, ApiDependencies};
use crate::shared::shutdown::{listen_for_shutdown_signals, ShutdownSignal};
use crate::shared::types::InfraError;

// ── Options ────────────────────────────────────────────────────────

/// Options for starting the workshop service.
pub struct ServerOptions {
    pub config: AppConfig,
    /// Run database migrations on startup (default: true).
    pub auto_migrate: bool,
    /// Create the configured admin when the users table is empty (default: true).
    pub create_default_admin: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
            create_default_admin: true,
        }
    }
}

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running API server.
///
/// ```rust,no_run
/// use workshop::server::{ServerHandle, ServerOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(ServerOptions::default()).await?;
///     handle.shutdown().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    pub repos: Arc<dyn RepositoryProvider>,
    pub config: AppConfig,
    /// Port the REST API is listening on.
    pub api_port: u16,

    db: DatabaseConnection,
    shutdown: ShutdownSignal,
    api_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    pub async fn start(opts: ServerOptions) -> Result<Self, InfraError> {
        let app_cfg = opts.config;

        info!("Starting workshop service...");

        let prometheus_handle = prometheus_handle();

        // ── Database ───────────────────────────────────────────
        let db = init_database(&app_cfg.database_config()).await?;

        if opts.auto_migrate {
            info!("Running database migrations...");
            Migrator::up(&db, None).await?;
            info!("Migrations completed");
        }

        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
        let jwt_config = app_cfg.jwt_config();
        info!(
            "JWT configured with {}h token expiration",
            jwt_config.expiration_hours
        );

        if opts.create_default_admin {
            let users = UserService::new(
                Arc::clone(&repos),
                jwt_config.clone(),
                app_cfg.security.bcrypt_cost,
            );
            let admin = &app_cfg.admin;
            if let Err(e) = users
                .ensure_default_admin(&admin.name, &admin.email, &admin.password)
                .await
            {
                error!("Failed to create default admin: {}", e);
            }
        }

        // ── REST API server ────────────────────────────────────
        let api_router = create_api_router(ApiDependencies {
            db: db.clone(),
            repos: Arc::clone(&repos),
            jwt_config,
            bcrypt_cost: app_cfg.security.bcrypt_cost,
            default_page_limit: app_cfg.pagination.default_limit,
            metrics_handle: prometheus_handle,
        });

        let api_addr = app_cfg.api_address();
        let listener = tokio::net::TcpListener::bind(&api_addr).await?;
        let api_port = listener.local_addr()?.port();
        info!("REST API server listening on http://{}", api_addr);
        info!("Swagger UI available at http://{}/docs/", api_addr);

        let shutdown = ShutdownSignal::new();
        let api_shutdown = shutdown.clone();
        let api_server = axum::serve(listener, api_router).with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("🛑 REST API server received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("REST API server error: {}", e);
            }
        });

        Ok(Self {
            repos,
            config: app_cfg,
            api_port,
            db,
            shutdown,
            api_task,
        })
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.clone()
    }

    /// Trigger shutdown on SIGTERM / SIGINT.
    pub fn install_signal_handler(&self) {
        tokio::spawn(listen_for_shutdown_signals(self.shutdown.clone()));
    }

    pub fn trigger_shutdown(&self) {
        self.shutdown.trigger();
    }

    /// Wait for the API task to drain after shutdown was triggered, bounded by
    /// `server.shutdown_timeout`.
    pub async fn wait(self) {
        info!("⏳ Waiting for in-flight requests to complete...");

        let timeout = Duration::from_secs(self.config.server.shutdown_timeout);
        match tokio::time::timeout(timeout, self.api_task).await {
            Ok(Ok(())) => info!("REST API server stopped"),
            Ok(Err(e)) => error!("REST API server task panicked: {}", e),
            Err(_) => warn!("REST API server did not stop within {:?}", timeout),
        }

        if let Err(e) = self.db.close().await {
            warn!("Error closing database connection: {}", e);
        } else {
            info!("✅ Database connection closed");
        }

        info!("👋 Workshop service shutdown complete");
    }

    pub async fn shutdown(self) {
        info!("🛑 Shutting down workshop service...");
        self.trigger_shutdown();
        self.wait().await;
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

// ── Helpers ────────────────────────────────────────────────────────

/// The global recorder can be installed once per process; later starts reuse it.
fn prometheus_handle() -> Option<PrometheusHandle> {
    static PROM_HANDLE: OnceLock<Option<PrometheusHandle>> = OnceLock::new();

    PROM_HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                info!("📊 Prometheus metrics recorder installed");
                Some(handle)
            }
            Err(e) => {
                warn!("Prometheus recorder unavailable, /metrics disabled: {}", e);
                None
            }
        })
        .clone()
}

/// Initialize tracing from the logging section.
///
/// Call once at process startup, before [`ServerHandle::start`]. `RUST_LOG`
/// takes precedence over `logging.level`.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_memory_options() -> ServerOptions {
        let mut config = AppConfig::default();
        config.server.api_host = "127.0.0.1".to_string();
        config.server.api_port = 0;
        config.server.shutdown_timeout = 5;
        config.database.url = "sqlite::memory:".to_string();
        config.database.max_connections = 1;
        config.security.bcrypt_cost = 4;
        ServerOptions {
            config,
            ..ServerOptions::default()
        }
    }

    #[tokio::test]
    async fn starts_seeds_admin_and_shuts_down() {
        let handle = ServerHandle::start(in_memory_options()).await.unwrap();
        assert!(handle.api_port > 0);
        assert!(handle.is_running());
        assert_eq!(handle.repos.users().count().await.unwrap(), 1);

        handle.shutdown().await;
    }
}
