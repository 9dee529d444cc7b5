use super::{LoginHandler, mount_path};
use crate::client::VaultClient;
use crate::error::Error;
use crate::secret::Secret;
use async_trait::async_trait;
use std::collections::HashMap;

/// TLS certificate authentication. The client certificate itself travels at
/// the transport layer; this handler only selects the named cert role.
pub struct CertHandler {
    default_mount: &'static str,
}

impl CertHandler {
    pub fn new(default_mount: &'static str) -> Self {
        Self { default_mount }
    }
}

#[async_trait]
impl LoginHandler for CertHandler {
    async fn auth(
        &self,
        client: &VaultClient,
        params: &HashMap<String, String>,
    ) -> Result<Secret, Error> {
        let mount = mount_path(params, self.default_mount);
        let path = format!("auth/{}/login", mount);

        let body = match params.get("name") {
            Some(name) => serde_json::json!({ "name": name }),
            None => serde_json::json!({}),
        };

        tracing::debug!(mount, "logging in with client certificate");
        client.login_write(&path, &body).await
    }

    fn help(&self) -> String {
        "Usage: vauth login -m cert [name=<cert-role>] [mount=<mount>]\n\n  \
         Authenticates using the TLS client certificate configured on the\n  \
         connection. An optional name selects a specific certificate role."
            .to_string()
    }
}
