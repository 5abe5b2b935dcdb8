use std::sync::Arc;

use auth::Authenticator;
use auth_service::config::Config;
use auth_service::config::StorageBackend;
use auth_service::domain::user::models::EmailAddress;
use auth_service::domain::user::ports::AuthServicePort;
use auth_service::domain::user::service::AuthService;
use auth_service::inbound::http::router::create_router;
use auth_service::outbound::repositories::InMemoryUserRepository;
use auth_service::outbound::repositories::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "auth-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        storage = ?config.storage.backend,
        jwt_algorithm = ?config.jwt.algorithm,
        access_token_expire_minutes = config.jwt.access_token_expire_minutes,
        refresh_token_expire_days = config.jwt.refresh_token_expire_days,
        "Configuration loaded"
    );

    let authenticator = Arc::new(Authenticator::with_settings(
        config.jwt.secret.as_bytes(),
        config.jwt.algorithm,
        config.jwt.lifetimes()?,
    ));

    let auth_service: Arc<dyn AuthServicePort> = match config.storage.backend {
        StorageBackend::Postgres => {
            let pg_pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .connect(&config.database.url)
                .await?;
            tracing::info!(
                max_connections = config.database.max_connections,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            let user_repository = Arc::new(PostgresUserRepository::new(pg_pool));
            Arc::new(AuthService::new(user_repository, Arc::clone(&authenticator)))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory user store; users are lost on restart");
            let user_repository = Arc::new(InMemoryUserRepository::new());
            Arc::new(AuthService::new(user_repository, Arc::clone(&authenticator)))
        }
    };

    if let Some(superuser) = &config.superuser {
        let email = EmailAddress::new(superuser.email.clone())?;
        let user = auth_service
            .bootstrap_superuser(email, &superuser.password)
            .await?;
        tracing::info!(user_id = %user.id, "Superuser ensured");
    }

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(auth_service);

    axum::serve(http_listener, http_application)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server exited successfully");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
