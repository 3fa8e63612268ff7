mod alerts;
mod applications;
mod config;
mod db;
mod errors;
mod listings;
mod models;
mod resumes;
mod routes;
mod saved_jobs;
mod state;
mod store;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::{Config, DataBackend, PostgresBackend};
use crate::db::create_pool;
use crate::listings::pagination::Paginator;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::files::S3FileStore;
use crate::store::kv::RedisStore;
use crate::store::postgres::{PgAlertSource, PgApplicationSource, PgJobSource, PgResumeSource};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CareerHub API v{}", env!("CARGO_PKG_VERSION"));

    let state = match &config.backend {
        DataBackend::Postgres(backend) => postgres_state(backend, config.clone()).await?,
        DataBackend::Memory => {
            info!("Using in-memory data sources; nothing is persisted");
            AppState::in_memory(config.clone())
        }
    };
    info!(
        "Listings: {} per page, {} featured",
        config.jobs_per_page, config.featured_jobs_limit
    );

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS origins once the web client has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Wires PostgreSQL, Redis and S3 behind the data-source traits.
async fn postgres_state(backend: &PostgresBackend, config: Config) -> Result<AppState> {
    // Initialize PostgreSQL
    let db = create_pool(&backend.database_url).await?;

    // Initialize Redis
    let redis = redis::Client::open(backend.redis_url.clone())?;
    let kv = RedisStore::connect(&redis).await?;

    // Initialize S3 / MinIO
    let s3 = build_s3_client(backend).await;
    let files = Arc::new(S3FileStore::new(s3, backend.s3_bucket.clone()));
    info!("S3 client initialized (bucket: {})", backend.s3_bucket);

    Ok(AppState {
        jobs: Arc::new(PgJobSource::new(db.clone())),
        applications: Arc::new(PgApplicationSource::new(db.clone())),
        resumes: Arc::new(PgResumeSource::new(db.clone(), files)),
        alerts: Arc::new(PgAlertSource::new(db)),
        kv: Arc::new(kv),
        paginator: Paginator::new(config.jobs_per_page),
        config,
    })
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(backend: &PostgresBackend) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &backend.aws_access_key_id,
        &backend.aws_secret_access_key,
        None,
        None,
        "careerhub-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&backend.s3_endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
