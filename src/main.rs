//! Process bootstrap for the family recipes service.

use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use family_recipes::adapters::http::{router, AppState};
use family_recipes::adapters::line::{LineClientConfig, LineMessagingClient, SignatureVerifier};
use family_recipes::adapters::lock::RedisConversationLock;
use family_recipes::adapters::memory::InMemoryConversationLock;
use family_recipes::adapters::photos::{LocalPhotoStorage, UrlSigner};
use family_recipes::adapters::postgres::{
    PostgresCommentRepository, PostgresConversationStateRepository, PostgresCookingEventLog,
    PostgresCookingSessionRepository, PostgresMemberDirectory, PostgresSessionSeasoningRepository,
};
use family_recipes::application::handlers::recording::{RecordingPorts, RecordingWorkflow};
use family_recipes::config::{AppConfig, ConfigError, RedisConfig, ServerConfig, ValidationError};
use family_recipes::domain::catalog::{Catalog, CatalogError};
use family_recipes::ports::{ConversationLock, MessagingError};

#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    #[error("catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error("database: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migrations: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("redis: {0}")]
    Redis(String),

    #[error("messaging client: {0}")]
    Messaging(#[from] MessagingError),

    #[error("server: {0}")]
    Io(#[from] std::io::Error),
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    if server.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn connect_lock(
    redis: Option<&RedisConfig>,
) -> Result<Arc<dyn ConversationLock>, StartupError> {
    let Some(redis) = redis else {
        tracing::warn!("No Redis configured, using in-process conversation lock");
        return Ok(Arc::new(InMemoryConversationLock::new()));
    };

    let client = redis::Client::open(redis.url.as_str())
        .map_err(|e| StartupError::Redis(e.to_string()))?;
    let conn = tokio::time::timeout(
        redis.connect_timeout(),
        client.get_multiplexed_tokio_connection(),
    )
    .await
    .map_err(|_| StartupError::Redis("connection timed out".to_string()))?
    .map_err(|e| StartupError::Redis(e.to_string()))?;

    Ok(Arc::new(RedisConversationLock::new(conn)))
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<http::HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let catalog = match &config.recording.catalog_path {
        Some(path) => Arc::new(Catalog::load(path)?),
        None => Catalog::builtin()?,
    };

    let pool = config
        .database
        .pool_options()
        .connect(&config.database.url)
        .await?;
    if config.database.run_migrations {
        sqlx::migrate!().run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    let messaging = LineMessagingClient::new(LineClientConfig {
        channel_access_token: config.line.channel_access_token.clone(),
        api_base_url: config.line.api_base_url.clone(),
        data_api_base_url: config.line.data_api_base_url.clone(),
        timeout: config.line.timeout(),
    })?;

    let signer = UrlSigner::new(
        config.storage.signing_key.clone(),
        config.storage.public_base_url.clone(),
    );
    tokio::fs::create_dir_all(&config.storage.photo_root).await?;

    let ports = RecordingPorts {
        catalog,
        members: Arc::new(PostgresMemberDirectory::new(pool.clone())),
        states: Arc::new(PostgresConversationStateRepository::new(pool.clone())),
        sessions: Arc::new(PostgresCookingSessionRepository::new(pool.clone())),
        events: Arc::new(PostgresCookingEventLog::new(pool.clone())),
        seasonings: Arc::new(PostgresSessionSeasoningRepository::new(pool.clone())),
        comments: Arc::new(PostgresCommentRepository::new(pool.clone())),
        messaging: Arc::new(messaging),
        photos: Arc::new(LocalPhotoStorage::new(config.storage.photo_root.clone(), signer)),
        lock: connect_lock(config.redis.as_ref()).await?,
    };

    let workflow = RecordingWorkflow::new(ports, config.recording_settings());
    let verifier = SignatureVerifier::new(config.line.channel_secret.clone());
    let state = AppState::new(workflow, verifier);

    let app = router(state)
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(cors_layer(&config.server))
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        environment = ?config.server.environment,
        completion_policy = ?config.recording.completion_policy,
        "Family recipes listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
