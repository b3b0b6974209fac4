//! Pinecone data-plane client (REST).

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{sort_by_score_desc, IndexError, IndexStats, ScoredMatch, VectorIndex};

const API_VERSION: &str = "2024-07";

#[derive(Clone)]
pub struct PineconeIndex {
    client: Client,
    host: String,
    namespace: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
    include_values: bool,
    #[serde(skip_serializing_if = "is_default_namespace")]
    namespace: &'a str,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<ScoredMatch>,
}

impl PineconeIndex {
    /// `host` is the index host shown in the console, with or without scheme.
    pub fn new(
        api_key: &str,
        host: &str,
        namespace: &str,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        anyhow::ensure!(!api_key.trim().is_empty(), "missing Pinecone API key");
        anyhow::ensure!(!host.trim().is_empty(), "missing Pinecone index host");

        let mut headers = HeaderMap::new();
        headers.insert(
            "Api-Key",
            HeaderValue::from_str(api_key.trim()).context("invalid Pinecone API key")?,
        );
        headers.insert(
            "X-Pinecone-API-Version",
            HeaderValue::from_static(API_VERSION),
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .context("failed to build Pinecone HTTP client")?;

        Ok(Self {
            client,
            host: normalize_host(host),
            namespace: namespace.to_string(),
        })
    }

    async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, IndexError>
    where
        T: serde::de::DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self
            .client
            .post(format!("{}{}", self.host, path))
            .json(body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(IndexError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> Result<Vec<ScoredMatch>, IndexError> {
        let request = QueryRequest {
            vector,
            top_k,
            include_metadata,
            include_values: false,
            namespace: &self.namespace,
        };
        let response: QueryResponse = self.post("/query", &request).await?;
        let mut matches = response.matches;
        sort_by_score_desc(&mut matches);
        matches.truncate(top_k);
        Ok(matches)
    }

    async fn describe_stats(&self) -> Result<IndexStats, IndexError> {
        self.post("/describe_index_stats", &json!({})).await
    }
}

fn is_default_namespace(namespace: &&str) -> bool {
    namespace.is_empty()
}

fn normalize_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_host_adds_scheme() {
        assert_eq!(
            normalize_host("anzsco-abc123.svc.us-east1-gcp.pinecone.io/"),
            "https://anzsco-abc123.svc.us-east1-gcp.pinecone.io"
        );
        assert_eq!(normalize_host("http://localhost:5080"), "http://localhost:5080");
    }

    #[test]
    fn test_query_request_uses_camel_case_wire_names() {
        let vector = [0.1_f32, 0.2];
        let request = QueryRequest {
            vector: &vector,
            top_k: 5,
            include_metadata: true,
            include_values: false,
            namespace: "",
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["topK"], 5);
        assert_eq!(json["includeMetadata"], true);
        assert!(json.get("namespace").is_none());
    }

    #[test]
    fn test_query_response_parses_sparse_matches() {
        let raw = r#"{
            "matches": [
                {"id": "261313", "score": 0.82, "metadata": {"ANZSCO Occupation Name": "Software Engineer"}},
                {"id": "261312", "score": 0.55}
            ],
            "namespace": ""
        }"#;
        let parsed: QueryResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.matches.len(), 2);
        assert!(parsed.matches[1].metadata.is_empty());
    }

    #[test]
    fn test_stats_response_parses_dimension() {
        let raw = r#"{"dimension": 3072, "indexFullness": 0, "totalVectorCount": 1237, "namespaces": {"": {"vectorCount": 1237}}}"#;
        let stats: IndexStats = serde_json::from_str(raw).unwrap();
        assert_eq!(stats.dimension, Some(3072));
        assert_eq!(stats.total_vector_count, 1237);
    }
}
