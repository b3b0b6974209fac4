use std::sync::Arc;

use crate::auth::TokenVerifier;
use crate::config::Config;
use crate::embedding::Embedder;
use crate::llm_client::ChatModel;
use crate::profile::store::ProfileStore;
use crate::retrieval::VectorIndex;

/// Shared application state injected into all route handlers via Axum extractors.
/// Every upstream sits behind a trait object so tests can swap in fakes.
#[derive(Clone)]
pub struct AppState {
    pub embedder: Arc<dyn Embedder>,
    pub index: Arc<dyn VectorIndex>,
    pub llm: Arc<dyn ChatModel>,
    pub profiles: Arc<dyn ProfileStore>,
    pub verifier: Arc<dyn TokenVerifier>,
    pub config: Config,
}
