//! HTTP client for the identity provider's admin claims API.

use anyhow::Context as _;
use reqwest::StatusCode;
use uuid::Uuid;

use steeple_auth_types::claims::Claims;

use crate::domain::repository::ClaimsPort;
use crate::error::DirectoryServiceError;

/// Talks to `{base_url}/v1/users/{id}/claims` with a service bearer token.
#[derive(Clone)]
pub struct HttpClaimsClient {
    http: reqwest::Client,
    base_url: String,
    api_token: String,
}

impl HttpClaimsClient {
    pub fn new(base_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_token: api_token.into(),
        }
    }

    fn claims_url(&self, user_id: Uuid) -> String {
        format!("{}/v1/users/{user_id}/claims", self.base_url)
    }
}

impl ClaimsPort for HttpClaimsClient {
    async fn get_claims(&self, user_id: Uuid) -> Result<Claims, DirectoryServiceError> {
        let response = self
            .http
            .get(self.claims_url(user_id))
            .bearer_auth(&self.api_token)
            .send()
            .await
            .context("get claims request")?;

        // Accounts start with no custom claims document.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Claims::default());
        }
        let claims = response
            .error_for_status()
            .context("get claims status")?
            .json::<Claims>()
            .await
            .context("decode claims body")?;
        Ok(claims)
    }

    async fn set_claims(
        &self,
        user_id: Uuid,
        claims: &Claims,
    ) -> Result<(), DirectoryServiceError> {
        self.http
            .put(self.claims_url(user_id))
            .bearer_auth(&self.api_token)
            .json(claims)
            .send()
            .await
            .context("set claims request")?
            .error_for_status()
            .context("set claims status")?;
        Ok(())
    }

    async fn delete_claims(&self, user_id: Uuid) -> Result<(), DirectoryServiceError> {
        let response = self
            .http
            .delete(self.claims_url(user_id))
            .bearer_auth(&self.api_token)
            .send()
            .await
            .context("delete claims request")?;

        // Already gone is fine; this runs during account-deletion cleanup.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        response.error_for_status().context("delete claims status")?;
        Ok(())
    }
}
