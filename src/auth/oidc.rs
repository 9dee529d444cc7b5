use super::{LoginHandler, mount_path};
use crate::client::VaultClient;
use crate::error::Error;
use crate::secret::Secret;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

const CALLBACK_PORT: u16 = 8250;
const CALLBACK_TIMEOUT: Duration = Duration::from_secs(300);

/// Browser-based OIDC authentication: fetch the provider auth URL, open the
/// browser, catch the redirect on a loopback listener, then exchange the
/// code at the backend's callback endpoint.
pub struct OidcHandler {
    default_mount: &'static str,
}

impl OidcHandler {
    pub fn new(default_mount: &'static str) -> Self {
        Self { default_mount }
    }

    async fn get_auth_url(
        &self,
        client: &VaultClient,
        mount: &str,
        role: Option<&str>,
    ) -> Result<(String, String), Error> {
        let path = format!("auth/{}/oidc/auth_url", mount);
        let body = serde_json::json!({
            "role": role.unwrap_or_default(),
            "redirect_uri": format!("http://localhost:{}/oidc/callback", CALLBACK_PORT),
        });

        let secret = client.login_write(&path, &body).await?;

        #[derive(Deserialize)]
        struct AuthUrlData {
            auth_url: String,
            state: String,
        }

        let data: AuthUrlData = secret
            .data
            .map(serde_json::from_value)
            .transpose()?
            .ok_or_else(|| Error::Request("auth_url response carried no data".to_string()))?;

        Ok((data.auth_url, data.state))
    }

    async fn wait_for_callback(&self, expected_state: &str) -> Result<(String, String), Error> {
        let listener = TcpListener::bind(format!("127.0.0.1:{}", CALLBACK_PORT))
            .await
            .map_err(|e| Error::Request(format!("failed to bind callback port: {}", e)))?;

        let (state, code) = tokio::time::timeout(CALLBACK_TIMEOUT, async {
            let (mut stream, _) = listener.accept().await?;

            let mut reader = BufReader::new(&mut stream);
            let mut request_line = String::new();
            reader.read_line(&mut request_line).await?;

            // GET /oidc/callback?state=...&code=... HTTP/1.1
            let path = request_line.split_whitespace().nth(1).ok_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::InvalidData, "invalid request")
            })?;
            let query = path.split('?').nth(1).ok_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::InvalidData, "no query string")
            })?;

            let mut state = None;
            let mut code = None;
            for pair in query.split('&') {
                if let Some((key, value)) = pair.split_once('=') {
                    match key {
                        "state" => state = Some(value.to_string()),
                        "code" => code = Some(value.to_string()),
                        _ => {}
                    }
                }
            }

            let response = "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n\r\n\
                            <html><body><h1>Authentication successful!</h1>\
                            <p>You can close this window.</p></body></html>";
            stream.write_all(response.as_bytes()).await?;

            Ok::<_, std::io::Error>((
                state.ok_or_else(|| {
                    std::io::Error::new(std::io::ErrorKind::InvalidData, "missing state")
                })?,
                code.ok_or_else(|| {
                    std::io::Error::new(std::io::ErrorKind::InvalidData, "missing code")
                })?,
            ))
        })
        .await
        .map_err(|_| Error::Request("timed out waiting for OIDC callback".to_string()))?
        .map_err(|e| Error::Request(format!("callback error: {}", e)))?;

        if state != expected_state {
            return Err(Error::Request("OIDC state mismatch".to_string()));
        }

        Ok((state, code))
    }

    async fn exchange_code(
        &self,
        client: &VaultClient,
        mount: &str,
        state: &str,
        code: &str,
    ) -> Result<Secret, Error> {
        let path = format!(
            "auth/{}/oidc/callback?state={}&code={}",
            mount, state, code
        );
        client.read(&path).await
    }
}

#[async_trait]
impl LoginHandler for OidcHandler {
    async fn auth(
        &self,
        client: &VaultClient,
        params: &HashMap<String, String>,
    ) -> Result<Secret, Error> {
        let mount = mount_path(params, self.default_mount);
        let role = params.get("role").map(String::as_str);

        let (auth_url, state) = self.get_auth_url(client, mount, role).await?;

        tracing::info!("opening browser for OIDC authentication");
        if webbrowser::open(&auth_url).is_err() {
            tracing::warn!("failed to open browser, please visit: {}", auth_url);
        }

        let (state, code) = self.wait_for_callback(&state).await?;
        self.exchange_code(client, mount, &state, &code).await
    }

    fn help(&self) -> String {
        "Usage: vauth login -m oidc [role=<role>] [mount=<mount>]\n\n  \
         Opens a browser to the configured OIDC provider and completes the\n  \
         flow via a localhost callback on port 8250."
            .to_string()
    }
}
