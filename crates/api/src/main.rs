use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trainhub_api::config::ServerConfig;
use trainhub_api::router::build_app_router;
use trainhub_api::state::AppState;
use trainhub_core::clock::SystemClock;
use trainhub_notify::push::{HttpPushProvider, PushProvider, SimulatedPushProvider};
use trainhub_notify::{NotificationService, Scheduler, Stores};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "trainhub_api=debug,trainhub_notify=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = trainhub_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    trainhub_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    trainhub_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Push provider ---
    let provider: Arc<dyn PushProvider> = match &config.push_gateway_url {
        Some(url) => {
            tracing::info!(%url, "Using HTTP push gateway");
            Arc::new(
                HttpPushProvider::new(url.clone(), config.push_timeout())
                    .expect("Failed to build push gateway client"),
            )
        }
        None => {
            tracing::info!("PUSH_GATEWAY_URL not set, push delivery is simulated");
            Arc::new(SimulatedPushProvider)
        }
    };

    // --- Notification pipeline ---
    let service = NotificationService::new(
        Stores::postgres(pool.clone()),
        provider,
        config.push_timeout(),
    );
    let scheduler = Scheduler::new(service, Arc::new(SystemClock), config.scheduler.clone());

    let jobs_cancel = CancellationToken::new();
    let job_handles = scheduler.spawn(jobs_cancel.clone());
    tracing::info!("Scheduler started (reminders, notification cleanup, token cleanup)");

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        scheduler,
    };

    let app = build_app_router(state);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    jobs_cancel.cancel();
    for handle in job_handles {
        let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
    }
    tracing::info!("Scheduler stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
