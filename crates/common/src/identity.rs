//! Identity provider boundary.
//!
//! Token verification is delegated to an external federated-identity provider.
//! This module treats it as an opaque call: bearer token in, profile claims
//! out. Everything else about the provider (key rotation, token format,
//! session handling) stays on the other side of the boundary.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{AppError, AppResult};

/// Profile claims returned by the identity provider for a verified token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// Stable external user id. Unique and immutable per identity.
    pub uid: String,
    /// Email address, if the provider shares it.
    #[serde(default)]
    pub email: Option<String>,
    /// Display name claim.
    #[serde(default)]
    pub name: Option<String>,
    /// Avatar URL claim.
    #[serde(default)]
    pub picture: Option<String>,
    /// Audience the token was issued for, if any.
    #[serde(default)]
    pub aud: Option<String>,
}

/// Identity provider trait.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify a bearer token and return the claims it carries.
    ///
    /// An invalid or expired token is `AppError::Unauthorized`; transport
    /// failures talking to the provider are `AppError::IdentityProvider`.
    async fn verify(&self, token: &str) -> AppResult<IdentityClaims>;
}

/// HTTP-backed identity provider.
///
/// Posts the token to the provider's verification endpoint and deserializes
/// the claims from the response body.
pub struct HttpIdentityProvider {
    client: reqwest::Client,
    verify_url: String,
    audience: Option<String>,
}

#[derive(Serialize)]
struct VerifyRequest<'a> {
    token: &'a str,
}

impl HttpIdentityProvider {
    /// Create a new provider pointing at the given verification endpoint.
    #[must_use]
    pub fn new(verify_url: String, audience: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            verify_url,
            audience,
        }
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn verify(&self, token: &str) -> AppResult<IdentityClaims> {
        let response = self
            .client
            .post(&self.verify_url)
            .json(&VerifyRequest { token })
            .send()
            .await
            .map_err(|e| AppError::IdentityProvider(e.to_string()))?;

        let status = response.status();
        if status.is_client_error() {
            return Err(AppError::Unauthorized);
        }
        if !status.is_success() {
            return Err(AppError::IdentityProvider(format!(
                "verification endpoint returned {status}"
            )));
        }

        let claims: IdentityClaims = response
            .json()
            .await
            .map_err(|e| AppError::IdentityProvider(e.to_string()))?;

        if let Some(ref expected) = self.audience
            && claims.aud.as_deref() != Some(expected.as_str())
        {
            return Err(AppError::Unauthorized);
        }

        Ok(claims)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_deserialize_minimal() {
        let claims: IdentityClaims = serde_json::from_str(r#"{"uid":"abc123"}"#).unwrap();
        assert_eq!(claims.uid, "abc123");
        assert!(claims.email.is_none());
        assert!(claims.name.is_none());
        assert!(claims.picture.is_none());
    }

    #[test]
    fn test_claims_deserialize_full() {
        let claims: IdentityClaims = serde_json::from_str(
            r#"{"uid":"u1","email":"a@b.c","name":"Ada","picture":"https://cdn/x.png","aud":"clipstream"}"#,
        )
        .unwrap();
        assert_eq!(claims.email.as_deref(), Some("a@b.c"));
        assert_eq!(claims.aud.as_deref(), Some("clipstream"));
    }
}
