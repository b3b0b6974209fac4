//! Bearer-token authentication.
//!
//! Handlers take an `AuthUser` extractor; it rejects with 401 before any
//! request body is read or any store is touched.

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use thiserror::Error;

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing or malformed bearer token")]
    MissingToken,

    #[error("token expired")]
    Expired,

    #[error("invalid token: {0}")]
    Invalid(String),
}

/// Identity established from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedUser {
    pub uid: String,
    pub email: Option<String>,
}

/// Verifies an opaque bearer token. Carried in `AppState` as `Arc<dyn TokenVerifier>`.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<VerifiedUser, AuthError>;
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
}

/// HS256 JWT verifier. `sub` is the user id; `exp` is always enforced.
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str, issuer: Option<&str>, audience: Option<&str>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);
        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }
        match audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }
}

#[async_trait]
impl TokenVerifier for JwtVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedUser, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                other => AuthError::Invalid(format!("{other:?}")),
            }
        })?;

        if data.claims.sub.trim().is_empty() {
            return Err(AuthError::Invalid("empty subject".to_string()));
        }

        Ok(VerifiedUser {
            uid: data.claims.sub,
            email: data.claims.email,
        })
    }
}

/// Extracts the token from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::MissingToken)
}

/// The authenticated caller.
#[derive(Debug, Clone)]
pub struct AuthUser(pub VerifiedUser);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let token = bearer_token(&parts.headers)?;
        let user = state.verifier.verify(token).await?;
        Ok(AuthUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    const SECRET: &str = "test-secret";

    fn token(claims: serde_json::Value, secret: &str) -> String {
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn future_exp() -> i64 {
        chrono::Utc::now().timestamp() + 3600
    }

    #[tokio::test]
    async fn test_valid_token_yields_subject() {
        let verifier = JwtVerifier::new(SECRET, None, None);
        let t = token(
            json!({ "sub": "uid-123", "email": "ana@example.com", "exp": future_exp() }),
            SECRET,
        );
        let user = verifier.verify(&t).await.unwrap();
        assert_eq!(user.uid, "uid-123");
        assert_eq!(user.email.as_deref(), Some("ana@example.com"));
    }

    #[tokio::test]
    async fn test_expired_token_is_rejected() {
        let verifier = JwtVerifier::new(SECRET, None, None);
        let exp = chrono::Utc::now().timestamp() - 3600;
        let t = token(json!({ "sub": "uid-123", "exp": exp }), SECRET);
        assert!(matches!(verifier.verify(&t).await, Err(AuthError::Expired)));
    }

    #[tokio::test]
    async fn test_wrong_secret_is_rejected() {
        let verifier = JwtVerifier::new(SECRET, None, None);
        let t = token(json!({ "sub": "uid-123", "exp": future_exp() }), "other-secret");
        assert!(matches!(verifier.verify(&t).await, Err(AuthError::Invalid(_))));
    }

    #[tokio::test]
    async fn test_audience_is_enforced_when_configured() {
        let verifier = JwtVerifier::new(SECRET, None, Some("careerchat"));
        let t = token(
            json!({ "sub": "uid-123", "aud": "someone-else", "exp": future_exp() }),
            SECRET,
        );
        assert!(verifier.verify(&t).await.is_err());
    }

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert!(matches!(bearer_token(&headers), Err(AuthError::MissingToken)));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(matches!(bearer_token(&headers), Err(AuthError::MissingToken)));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert!(matches!(bearer_token(&headers), Err(AuthError::MissingToken)));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def.ghi");
    }
}
