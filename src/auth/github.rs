use super::{LoginHandler, mount_path};
use crate::client::VaultClient;
use crate::error::Error;
use crate::secret::Secret;
use async_trait::async_trait;
use std::collections::HashMap;

/// GitHub personal access token authentication.
pub struct GithubHandler {
    default_mount: &'static str,
}

impl GithubHandler {
    pub fn new(default_mount: &'static str) -> Self {
        Self { default_mount }
    }
}

#[async_trait]
impl LoginHandler for GithubHandler {
    async fn auth(
        &self,
        client: &VaultClient,
        params: &HashMap<String, String>,
    ) -> Result<Secret, Error> {
        let token = params
            .get("token")
            .ok_or_else(|| Error::MissingCredential("'token' is required".to_string()))?;

        let mount = mount_path(params, self.default_mount);
        let path = format!("auth/{}/login", mount);

        tracing::debug!(mount, "logging in with GitHub token");
        client
            .login_write(&path, &serde_json::json!({ "token": token }))
            .await
    }

    fn help(&self) -> String {
        "Usage: vauth login -m github token=<personal-access-token> [mount=<mount>]\n\n  \
         Authenticates with a GitHub personal access token. The token must\n  \
         belong to an organization team mapped to a policy on the backend."
            .to_string()
    }
}
