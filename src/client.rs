use crate::error::Error;
use crate::secret::Secret;

pub struct VaultClientBuilder {
    base_url: Option<String>,
    token: Option<String>,
}

impl Default for VaultClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl VaultClientBuilder {
    pub fn new() -> Self {
        Self {
            base_url: None,
            token: None,
        }
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn build(self) -> Result<VaultClient, Error> {
        let base_url = self
            .base_url
            .or_else(|| std::env::var("VAULT_ADDR").ok())
            .ok_or(Error::VaultNotDetected)?;

        let token = self.token.or_else(|| std::env::var("VAULT_TOKEN").ok());

        Ok(VaultClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            http: reqwest::Client::new(),
        })
    }
}

/// Minimal Vault API client: enough surface for login flows and the
/// follow-up token submission.
pub struct VaultClient {
    base_url: String,
    token: Option<String>,
    http: reqwest::Client,
}

impl VaultClient {
    /// Build a client from VAULT_ADDR / VAULT_TOKEN.
    pub fn from_env() -> Result<Self, Error> {
        VaultClientBuilder::new().build()
    }

    pub fn builder() -> VaultClientBuilder {
        VaultClientBuilder::new()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// POST a login payload to `/v1/<path>` and decode the secret.
    pub async fn login_write(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<Secret, Error> {
        let url = format!("{}/v1/{}", self.base_url, path);

        let mut request = self.http.post(&url).json(body);
        if let Some(ref token) = self.token {
            request = request.header("X-Vault-Token", token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Request(e.to_string()))?;

        Self::decode(response).await
    }

    /// Unauthenticated GET of `/v1/<path>`.
    pub async fn read(&self, path: &str) -> Result<Secret, Error> {
        let url = format!("{}/v1/{}", self.base_url, path);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Request(e.to_string()))?;

        Self::decode(response).await
    }

    /// GET `/v1/<path>` authenticated with an explicit token.
    pub async fn read_with_token(&self, path: &str, token: &str) -> Result<Secret, Error> {
        let url = format!("{}/v1/{}", self.base_url, path);

        let response = self
            .http
            .get(&url)
            .header("X-Vault-Token", token)
            .send()
            .await
            .map_err(|e| Error::Request(e.to_string()))?;

        Self::decode(response).await
    }

    async fn decode(response: reqwest::Response) -> Result<Secret, Error> {
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Client {
                status,
                message: body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| Error::Request(format!("Invalid response: {}", e)))
    }
}
