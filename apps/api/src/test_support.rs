//! In-memory fakes of every upstream, with call counters.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::auth::{AuthError, TokenVerifier, VerifiedUser};
use crate::config::Config;
use crate::embedding::{Embedder, EmbeddingError};
use crate::errors::AppError;
use crate::llm_client::{ChatModel, ChatRequest, LlmError};
use crate::models::occupation::{KEY_CODE, KEY_MLTSSL, KEY_OCCUPATION};
use crate::profile::models::UserProfile;
use crate::profile::store::ProfileStore;
use crate::retrieval::{IndexError, IndexStats, ScoredMatch, VectorIndex};
use crate::state::AppState;

pub const TEST_TOKEN: &str = "test-token";
pub const TEST_UID: &str = "uid-test";
pub const TEST_EMAIL: &str = "ana@example.com";
pub const TEST_DIMENSION: usize = 8;

pub struct FakeEmbedder {
    dimension: usize,
    calls: AtomicUsize,
}

impl FakeEmbedder {
    pub fn with_dimension(dimension: usize) -> Self {
        Self {
            dimension,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for FakeEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![0.1; self.dimension])
    }
}

/// Returns one match per configured score, in the given order.
pub struct FakeIndex {
    scores: Vec<f32>,
    fail: bool,
    calls: AtomicUsize,
    top_k: Mutex<Option<usize>>,
}

impl FakeIndex {
    pub fn with_scores(scores: &[f32]) -> Self {
        Self {
            scores: scores.to_vec(),
            fail: false,
            calls: AtomicUsize::new(0),
            top_k: Mutex::new(None),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::with_scores(&[])
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requested_top_k(&self) -> Option<usize> {
        *self.top_k.lock().unwrap()
    }
}

#[async_trait]
impl VectorIndex for FakeIndex {
    async fn query(
        &self,
        _vector: &[f32],
        top_k: usize,
        _include_metadata: bool,
    ) -> Result<Vec<ScoredMatch>, IndexError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.top_k.lock().unwrap() = Some(top_k);
        if self.fail {
            return Err(IndexError::Api {
                status: 503,
                body: "index unavailable".to_string(),
            });
        }

        Ok(self
            .scores
            .iter()
            .take(top_k)
            .enumerate()
            .map(|(i, score)| {
                let metadata = json!({
                    KEY_OCCUPATION: format!("Occupation {i}"),
                    KEY_CODE: format!("26131{i}"),
                    KEY_MLTSSL: "Yes",
                });
                ScoredMatch {
                    id: format!("occ-{i}"),
                    score: *score,
                    metadata: match metadata {
                        Value::Object(map) => map,
                        _ => Map::new(),
                    },
                }
            })
            .collect())
    }

    async fn describe_stats(&self) -> Result<IndexStats, IndexError> {
        if self.fail {
            return Err(IndexError::Api {
                status: 503,
                body: "index unavailable".to_string(),
            });
        }
        Ok(IndexStats {
            dimension: Some(TEST_DIMENSION),
            total_vector_count: self.scores.len() as u64,
        })
    }
}

pub struct FakeChat {
    reply: Option<String>,
    calls: AtomicUsize,
    last_user: Mutex<Option<String>>,
    last_model: Mutex<Option<&'static str>>,
}

impl FakeChat {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            calls: AtomicUsize::new(0),
            last_user: Mutex::new(None),
            last_model: Mutex::new(None),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            ..Self::replying("")
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_user_prompt(&self) -> Option<String> {
        self.last_user.lock().unwrap().clone()
    }

    pub fn last_model(&self) -> Option<&'static str> {
        *self.last_model.lock().unwrap()
    }
}

#[async_trait]
impl ChatModel for FakeChat {
    async fn complete(&self, request: ChatRequest<'_>) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_user.lock().unwrap() = Some(request.user.to_string());
        *self.last_model.lock().unwrap() = Some(request.params.model);
        self.reply.clone().ok_or(LlmError::Api {
            status: 500,
            message: "model overloaded".to_string(),
        })
    }
}

/// Profile documents held as raw JSON maps, merged the way the database merges.
#[derive(Default)]
pub struct MemoryProfileStore {
    docs: Mutex<HashMap<String, Map<String, Value>>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl MemoryProfileStore {
    pub fn with_profile(uid: &str, profile: &UserProfile) -> Self {
        let store = Self::default();
        if let Value::Object(map) = serde_json::to_value(profile).unwrap() {
            store.docs.lock().unwrap().insert(uid.to_string(), map);
        }
        store
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn raw(&self, uid: &str) -> Option<Map<String, Value>> {
        self.docs.lock().unwrap().get(uid).cloned()
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn get(&self, uid: &str) -> Result<Option<UserProfile>, AppError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let doc = self.docs.lock().unwrap().get(uid).cloned();
        Ok(doc.map(|map| serde_json::from_value(Value::Object(map)).unwrap()))
    }

    async fn merge(&self, uid: &str, patch: Map<String, Value>) -> Result<(), AppError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.docs
            .lock()
            .unwrap()
            .entry(uid.to_string())
            .or_default()
            .extend(patch);
        Ok(())
    }
}

/// Accepts exactly `TEST_TOKEN`.
pub struct StaticVerifier;

#[async_trait]
impl TokenVerifier for StaticVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedUser, AuthError> {
        if token == TEST_TOKEN {
            Ok(VerifiedUser {
                uid: TEST_UID.to_string(),
                email: Some(TEST_EMAIL.to_string()),
            })
        } else {
            Err(AuthError::Invalid("unknown token".to_string()))
        }
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost/test".to_string(),
        openai_api_key: "sk-test".to_string(),
        openai_base_url: "http://localhost:0".to_string(),
        pinecone_api_key: "pc-test".to_string(),
        pinecone_index_host: "localhost".to_string(),
        pinecone_namespace: String::new(),
        embedding_dimension: TEST_DIMENSION,
        auth_jwt_secret: "secret".to_string(),
        auth_jwt_issuer: None,
        auth_jwt_audience: None,
        upstream_timeout: Duration::from_secs(5),
        port: 0,
        rust_log: "info".to_string(),
    }
}

/// Fakes wired into an `AppState`; the handles stay inspectable after requests.
pub struct TestApp {
    pub embedder: Arc<FakeEmbedder>,
    pub index: Arc<FakeIndex>,
    pub chat: Arc<FakeChat>,
    pub profiles: Arc<MemoryProfileStore>,
}

impl TestApp {
    pub fn new(index: FakeIndex, chat: FakeChat, profiles: MemoryProfileStore) -> Self {
        Self {
            embedder: Arc::new(FakeEmbedder::with_dimension(TEST_DIMENSION)),
            index: Arc::new(index),
            chat: Arc::new(chat),
            profiles: Arc::new(profiles),
        }
    }

    pub fn state(&self) -> AppState {
        AppState {
            embedder: self.embedder.clone(),
            index: self.index.clone(),
            llm: self.chat.clone(),
            profiles: self.profiles.clone(),
            verifier: Arc::new(StaticVerifier),
            config: test_config(),
        }
    }
}
