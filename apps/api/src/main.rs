mod auth;
mod chat;
mod config;
mod db;
mod embedding;
mod errors;
mod llm_client;
mod models;
mod profile;
mod resume;
mod retrieval;
mod routes;
mod state;

#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::JwtVerifier;
use crate::chat::pipeline::check_dimension;
use crate::config::Config;
use crate::db::{create_pool, ensure_schema};
use crate::embedding::{OpenAiEmbedder, EMBEDDING_MODEL};
use crate::llm_client::LlmClient;
use crate::profile::store::PgProfileStore;
use crate::retrieval::pinecone::PineconeIndex;
use crate::retrieval::VectorIndex;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CareerChat API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL profile store
    let db = create_pool(&config.database_url).await?;
    ensure_schema(&db).await?;

    // Initialize upstream clients
    let embedder = OpenAiEmbedder::new(
        &config.openai_api_key,
        &config.openai_base_url,
        config.upstream_timeout,
    )?;
    info!("Embedding client initialized (model: {EMBEDDING_MODEL})");

    let index = PineconeIndex::new(
        &config.pinecone_api_key,
        &config.pinecone_index_host,
        &config.pinecone_namespace,
        config.upstream_timeout,
    )?;
    check_index(&index, config.embedding_dimension).await?;

    let llm = LlmClient::new(
        &config.openai_api_key,
        &config.openai_base_url,
        config.upstream_timeout,
    )?;
    info!("LLM client initialized");

    let verifier = JwtVerifier::new(
        &config.auth_jwt_secret,
        config.auth_jwt_issuer.as_deref(),
        config.auth_jwt_audience.as_deref(),
    );

    // Build app state
    let state = AppState {
        embedder: Arc::new(embedder),
        index: Arc::new(index),
        llm: Arc::new(llm),
        profiles: Arc::new(PgProfileStore::new(db)),
        verifier: Arc::new(verifier),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the web client's host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Fails startup when the index dimension disagrees with the embedding
/// dimension. An unreachable index only warns; each request checks again.
async fn check_index(index: &dyn VectorIndex, expected_dimension: usize) -> Result<()> {
    match index.describe_stats().await {
        Ok(stats) => {
            info!(
                "Vector index reachable ({} vectors, dimension {:?})",
                stats.total_vector_count, stats.dimension
            );
            if let Some(actual) = stats.dimension {
                check_dimension(actual, expected_dimension)?;
            }
            Ok(())
        }
        Err(e) => {
            warn!("Could not read vector index stats at startup: {e}");
            Ok(())
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum ShutdownSignal {
    CtrlC,
    Terminate,
}

/// Resolves on Ctrl-C or SIGTERM so in-flight requests drain before exit.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl-C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    match first_signal(ctrl_c, terminate).await {
        ShutdownSignal::CtrlC => info!("Received Ctrl-C, starting shutdown..."),
        ShutdownSignal::Terminate => info!("Received SIGTERM, starting shutdown..."),
    }
}

async fn first_signal(
    ctrl_c: impl Future<Output = ()>,
    terminate: impl Future<Output = ()>,
) -> ShutdownSignal {
    tokio::select! {
        _ = ctrl_c => ShutdownSignal::CtrlC,
        _ = terminate => ShutdownSignal::Terminate,
    }
}
