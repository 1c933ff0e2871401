//! MentorBridge - A tutoring marketplace backend

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mentorbridge::{
    api::{self, AppState},
    config::Config,
    db::{
        self,
        repositories::{
            SqlxAvailabilityRepository, SqlxNotificationRepository,
            SqlxSessionRequestRepository, SqlxUserRepository,
        },
    },
    services::{
        AvailabilityService, AvatarStore, DirectoryService, NotificationService, SessionService,
        TokenService,
    },
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mentorbridge=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting MentorBridge...");

    // Load configuration
    let config = Config::load_with_env(Path::new("config.yml"))?;
    tracing::info!("Configuration loaded");

    // Initialize database
    let pool = db::create_pool(&config.database).await?;
    tracing::info!("Database connected: {}", config.database.url);

    // Run migrations
    db::migrations::run_migrations(&pool).await?;
    tracing::info!("Database migrations completed");

    // Create repositories
    let user_repo = SqlxUserRepository::boxed(pool.clone());
    let session_repo = SqlxSessionRequestRepository::boxed(pool.clone());
    let notification_repo = SqlxNotificationRepository::boxed(pool.clone());
    let availability_repo = SqlxAvailabilityRepository::boxed(pool.clone());

    // Initialize services
    let tokens = Arc::new(TokenService::with_expiry_days(
        &config.auth.token_secret,
        config.auth.token_expiry_days,
    ));
    let directory = Arc::new(DirectoryService::new(user_repo.clone(), tokens.clone()));
    let sessions = Arc::new(SessionService::new(
        session_repo,
        user_repo,
        notification_repo.clone(),
    ));
    let notifications = Arc::new(NotificationService::new(notification_repo));
    let availability = Arc::new(AvailabilityService::new(availability_repo));
    let avatars = Arc::new(AvatarStore::new(
        config.upload.avatars_dir(),
        config.upload.public_base_url.clone(),
    ));

    // Build application state
    let state = AppState {
        pool,
        directory,
        sessions,
        notifications,
        availability,
        avatars,
        tokens,
        upload_config: Arc::new(config.upload.clone()),
    };

    // Build router
    let app = api::build_router(state, &config.server.cors_origin);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
