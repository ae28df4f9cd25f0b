use library_loan_jobs::{
    adapters::{
        postgres::PostgresLoanRepository,
        smtp::SmtpMailer,
        worker::{TaskWorker, spawn_overdue_schedule},
    },
    api::{handlers::AppState, router::create_router},
    application::notification::{JobDependencies, SweepGuard},
    config::AppConfig,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// ワーカーのキュー容量
const TASK_QUEUE_CAPACITY: usize = 256;

/// Ctrl+C または SIGTERM を待つ
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining task queue");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "library_loan_jobs=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    if config.sweep_guard == SweepGuard::Legacy {
        tracing::warn!(
            "Overdue sweep runs with the legacy guard: reminders are skipped whenever overdue loans exist. \
             Set OVERDUE_SWEEP_GUARD=corrected to send them"
        );
    }

    // Initialize database connection pool
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    // Initialize adapters
    let loan_repository = Arc::new(PostgresLoanRepository::new(pool));
    let mailer = Arc::new(SmtpMailer::new(&config.smtp));

    let deps = JobDependencies {
        loan_repository,
        mailer,
        from_email: config.from_email.clone(),
        sweep_guard: config.sweep_guard,
    };

    // Start worker and recurring sweep
    let (worker, worker_handle) = TaskWorker::spawn(deps, TASK_QUEUE_CAPACITY);
    let task_queue = Arc::new(worker);
    let schedule_handle = spawn_overdue_schedule(task_queue.clone(), config.sweep_interval);

    tracing::info!(
        interval_secs = config.sweep_interval.as_secs(),
        "Overdue sweep scheduled"
    );

    // Create router
    let app_state = Arc::new(AppState { task_queue });
    let app = create_router(app_state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Drain queued tasks before exiting
    schedule_handle.abort();
    worker_handle.await?;

    Ok(())
}
