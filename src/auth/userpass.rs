use super::{LoginHandler, mount_path};
use crate::client::VaultClient;
use crate::error::Error;
use crate::secret::Secret;
use async_trait::async_trait;
use std::collections::HashMap;

/// Username/password credential exchange. Backs the `userpass`, `ldap`,
/// `okta` and `radius` methods, which differ only in default mount path.
pub struct UserpassHandler {
    default_mount: &'static str,
}

impl UserpassHandler {
    pub fn new(default_mount: &'static str) -> Self {
        Self { default_mount }
    }
}

#[async_trait]
impl LoginHandler for UserpassHandler {
    async fn auth(
        &self,
        client: &VaultClient,
        params: &HashMap<String, String>,
    ) -> Result<Secret, Error> {
        let username = params
            .get("username")
            .ok_or_else(|| Error::MissingCredential("'username' is required".to_string()))?;
        let password = params.get("password").map(String::as_str).unwrap_or("");

        let mount = mount_path(params, self.default_mount);
        let path = format!("auth/{}/login/{}", mount, username);

        tracing::debug!(mount, username, "logging in with username/password");
        client
            .login_write(&path, &serde_json::json!({ "password": password }))
            .await
    }

    fn help(&self) -> String {
        format!(
            "Usage: vauth login -m {m} username=<user> [password=<pass>] [mount=<mount>]\n\n  \
             Authenticates with a username and password against the {m} auth\n  \
             backend. When password is omitted it is read from the PASSWORD\n  \
             environment variable; an empty password is passed through as-is.",
            m = self.default_mount
        )
    }
}
