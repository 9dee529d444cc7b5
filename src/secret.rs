use serde::Deserialize;

/// The slice of a Vault API response this tool cares about.
#[derive(Debug, Clone, Deserialize)]
pub struct Secret {
    #[serde(default)]
    pub auth: Option<SecretAuth>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// Auth block returned by login endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct SecretAuth {
    pub client_token: String,
    #[serde(default)]
    pub lease_duration: u64,
    #[serde(default)]
    pub renewable: bool,
    #[serde(default)]
    pub policies: Vec<String>,
}

impl Secret {
    /// The token carried by this secret, if any. Login responses put it in
    /// the auth block; token lookup-self puts it under `data.id`.
    pub fn token_id(&self) -> Option<&str> {
        if let Some(auth) = &self.auth {
            return Some(&auth.client_token);
        }
        self.data
            .as_ref()
            .and_then(|d| d.get("id"))
            .and_then(|v| v.as_str())
    }
}
