use std::sync::Arc;
use std::time::Duration;

use auth::SessionCodec;
use chrono::Utc;
use identity_service::config::Config;
use identity_service::domain::employee::service::EmployeeService;
use identity_service::domain::identity::service::IdentityService;
use identity_service::domain::records::service::RecordsService;
use identity_service::domain::token::ports::SetupServicePort;
use identity_service::domain::token::service::SetupService;
use identity_service::inbound::http::router::create_router;
use identity_service::inbound::http::router::AppState;
use identity_service::outbound::credentials::ArgonCredentialVerifier;
use identity_service::outbound::notifier::LogNotifier;
use identity_service::outbound::repositories::PostgresEmployeeRepository;
use identity_service::outbound::repositories::PostgresIdentityRepository;
use identity_service::outbound::repositories::PostgresRecordsRepository;
use identity_service::outbound::repositories::PostgresSetupTokenRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Reaper cadence; setup tokens live 48 hours, the sweep runs hourly.
const TOKEN_SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "identity_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "identity-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let employee_repository = Arc::new(PostgresEmployeeRepository::new(pg_pool.clone()));
    let identity_repository = Arc::new(PostgresIdentityRepository::new(pg_pool.clone()));
    let token_repository = Arc::new(PostgresSetupTokenRepository::new(pg_pool.clone()));
    let records_repository = Arc::new(PostgresRecordsRepository::new(pg_pool));

    let session_codec = Arc::new(SessionCodec::new(config.jwt.secret.as_bytes()));

    let setup_service = Arc::new(SetupService::new(
        token_repository,
        Arc::new(LogNotifier::new()),
        config.provisioning.setup_link_base.clone(),
    ));

    let identity_service = Arc::new(IdentityService::new(
        identity_repository,
        Arc::clone(&employee_repository),
        Arc::clone(&setup_service),
        Arc::new(ArgonCredentialVerifier::new()),
        Arc::clone(&session_codec),
        config.jwt.expiration_hours,
    ));

    let employee_service = Arc::new(EmployeeService::new(
        employee_repository,
        Arc::clone(&identity_service),
    ));

    let records_service = Arc::new(RecordsService::new(records_repository));

    // Hourly token reaper; the service method is idempotent so overlapping
    // or restarted sweeps are harmless.
    let reaper = Arc::clone(&setup_service);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(TOKEN_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            match reaper.sweep(Utc::now()).await {
                Ok(deleted) => {
                    tracing::debug!(deleted, "Token sweep completed");
                }
                Err(e) => {
                    tracing::error!(error = %e, "Token sweep failed");
                }
            }
        }
    });

    let state = AppState {
        employee_service,
        identity_service,
        setup_service,
        records_service,
        session_codec,
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(http_listener, create_router(state)).await?;

    Ok(())
}
