//! # Haven Server
//!
//! Main entry point for the Haven marketplace API.

use haven_config::{AppConfig, ConfigLoader, ObservabilityConfig};
use haven_core::{HavenError, HavenResult};
use haven_repository::{DatabasePool, DatabasePoolInterface};
use haven_rest::{create_router, AppState};
use haven_server::di::{build_module, InfrastructureResolver};
use haven_server::startup;
use haven_service::StoreHealth;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    let config = match ConfigLoader::from_default_location() {
        Ok(loader) => loader.get().await,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config.observability);
    startup::print_banner();
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.app.environment);

    if let Err(e) = run(config).await {
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> HavenResult<()> {
    let db_pool = DatabasePool::connect(&config.database).await?;
    if config.database.run_migrations {
        db_pool.run_migrations().await?;
    }

    let module = build_module(&db_pool, &config);

    let store = module.volatile_store();
    if !store.open().await {
        warn!("Serving without a cache; every read goes to the database");
    }

    let state = AppState::from_module(module.as_ref())
        .with_health_check(Arc::new(db_pool))
        .with_health_check(Arc::new(StoreHealth::new(Arc::clone(&store))));
    let router = create_router(state, module.token_provider(), &config.server);

    let addr = config.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| HavenError::internal(format!("Failed to bind {addr}: {e}")))?;
    startup::print_startup_info(&config);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| HavenError::internal(format!("Server error: {e}")))?;

    store.close().await;
    module.database_pool().close().await;
    info!("Server shutdown complete");
    Ok(())
}

fn init_logging(observability: &ObservabilityConfig) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{},haven=debug,tower_http=debug",
            observability.log_level
        ))
    });

    let registry = tracing_subscriber::registry().with(filter);
    if observability.is_json() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}
