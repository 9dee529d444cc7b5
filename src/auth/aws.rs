use super::{LoginHandler, mount_path};
use crate::client::VaultClient;
use crate::error::Error;
use crate::secret::Secret;
use async_trait::async_trait;
use std::collections::HashMap;

/// AWS IAM authentication. The signed STS request elements are produced by
/// the caller's tooling and supplied as parameters; this handler forwards
/// them untouched.
pub struct AwsHandler {
    default_mount: &'static str,
}

impl AwsHandler {
    pub fn new(default_mount: &'static str) -> Self {
        Self { default_mount }
    }
}

#[async_trait]
impl LoginHandler for AwsHandler {
    async fn auth(
        &self,
        client: &VaultClient,
        params: &HashMap<String, String>,
    ) -> Result<Secret, Error> {
        let mount = mount_path(params, self.default_mount);
        let path = format!("auth/{}/login", mount);

        let mut body = serde_json::Map::new();
        for (k, v) in params {
            if k != "mount" {
                body.insert(k.clone(), serde_json::Value::String(v.clone()));
            }
        }

        tracing::debug!(mount, "logging in with AWS IAM credentials");
        client.login_write(&path, &serde_json::Value::Object(body)).await
    }

    fn help(&self) -> String {
        "Usage: vauth login -m aws role=<role> iam_http_request_method=POST \\\n    \
         iam_request_url=<b64> iam_request_body=<b64> iam_request_headers=<b64>\n\n  \
         Authenticates with a pre-signed AWS STS GetCallerIdentity request.\n  \
         All supplied parameters are forwarded to the auth backend."
            .to_string()
    }
}
