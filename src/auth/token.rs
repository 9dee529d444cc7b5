use super::LoginHandler;
use crate::client::VaultClient;
use crate::error::Error;
use crate::secret::Secret;
use async_trait::async_trait;
use std::collections::HashMap;

/// Token "authentication": the caller already holds a token; we verify it
/// against lookup-self and hand it back as the secret.
pub struct TokenHandler;

impl TokenHandler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TokenHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LoginHandler for TokenHandler {
    async fn auth(
        &self,
        client: &VaultClient,
        params: &HashMap<String, String>,
    ) -> Result<Secret, Error> {
        let token = params
            .get("token")
            .ok_or_else(|| Error::MissingCredential("'token' is required".to_string()))?;

        tracing::debug!("verifying supplied token via lookup-self");
        client.read_with_token("auth/token/lookup-self", token).await
    }

    fn help(&self) -> String {
        "Usage: vauth login -m token token=<token>\n\n  \
         Verifies the given token against the backend and persists it for\n  \
         subsequent calls. No new token is issued."
            .to_string()
    }
}
