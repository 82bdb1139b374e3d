//! # Identity pass-through
//!
//! Sign-up, sign-in and sign-out delegate to a hosted identity provider
//! over HTTP; account durability and session semantics are entirely the
//! provider's. Sessions gate nothing here — the inventory collection is
//! shared by every caller, signed in or not.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("identity request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("credentials rejected")]
    Rejected,
}

/// Opaque session token minted by the provider, passed through unchanged.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_up(&self, email: &str, password: &str) -> Result<Session, IdentityError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, IdentityError>;

    async fn sign_out(&self, token: &str) -> Result<(), IdentityError>;
}

/// Thin HTTP client against the provider's email/password endpoints.
pub struct HttpIdentityProvider {
    http: reqwest::Client,
    base_url: String,
}

impl HttpIdentityProvider {
    pub fn new(base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    async fn credential_call(
        &self,
        path: &str,
        email: &str,
        password: &str,
    ) -> Result<Session, IdentityError> {
        let response = self
            .http
            .post(format!("{}/{path}", self.base_url))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        if response.status().is_client_error() {
            return Err(IdentityError::Rejected);
        }

        Ok(response.error_for_status()?.json().await?)
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn sign_up(&self, email: &str, password: &str) -> Result<Session, IdentityError> {
        self.credential_call("signup", email, password).await
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, IdentityError> {
        self.credential_call("signin", email, password).await
    }

    async fn sign_out(&self, token: &str) -> Result<(), IdentityError> {
        self.http
            .post(format!("{}/signout", self.base_url))
            .json(&json!({ "token": token }))
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}
