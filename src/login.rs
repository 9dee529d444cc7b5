//! Login orchestration: resolve the handler, fill credential defaults from
//! the environment, run the exchange, persist the token.

use crate::auth::HandlerRegistry;
use crate::client::VaultClient;
use crate::error::Error;
use crate::token_store::TokenStore;
use std::collections::HashMap;
use std::io::Write;

/// Methods that take a username/password pair and participate in
/// environment defaulting.
const CREDENTIAL_PAIR_METHODS: [&str; 2] = ["userpass", "ldap"];

/// Ordered environment fallback chains for credential defaulting. Explicit
/// parameters always win over anything found here.
pub struct AuthenticatorConfig {
    pub username_env_chain: Vec<String>,
    pub password_env_chain: Vec<String>,
}

impl Default for AuthenticatorConfig {
    fn default() -> Self {
        Self {
            username_env_chain: vec!["LOGNAME".to_string(), "USER".to_string()],
            password_env_chain: vec!["PASSWORD".to_string()],
        }
    }
}

pub struct Authenticator {
    registry: HandlerRegistry,
    store: TokenStore,
    config: AuthenticatorConfig,
}

impl Authenticator {
    pub fn new(registry: HandlerRegistry, store: TokenStore, config: AuthenticatorConfig) -> Self {
        Self {
            registry,
            store,
            config,
        }
    }

    /// Run a full login: handler resolution, credential defaulting, the
    /// credential exchange itself, and token persistence. A confirmation
    /// (or, on persistence failure, the raw token) is written to `out`.
    ///
    /// Nothing here retries; a failed attempt is reported and left to the
    /// caller.
    pub async fn login<W: Write>(
        &self,
        client: &VaultClient,
        method: &str,
        mut params: HashMap<String, String>,
        out: &mut W,
    ) -> Result<(), Error> {
        let handler = self
            .registry
            .resolve(method)
            .ok_or_else(|| Error::UnsupportedMethod {
                method: method.to_string(),
            })?;

        if CREDENTIAL_PAIR_METHODS.contains(&method) {
            apply_credential_defaults(&mut params, &self.config, |name| {
                std::env::var(name).ok()
            })?;
        }

        tracing::info!(method, "authenticating");
        let secret = match handler.auth(client, &params).await {
            Ok(secret) => secret,
            Err(e) => {
                return Err(Error::AuthenticationFailed {
                    message: e.to_string(),
                    help: handler.help(),
                });
            }
        };

        let token = secret
            .token_id()
            .ok_or(Error::NoTokenReturned)?
            .to_string();

        if let Err(e) = self.store.store(&token) {
            tracing::warn!(error = %e, "failed to persist token");
            // The credential is still valid; surface it rather than lose it.
            writeln!(out, "{}", token)?;
            return Err(Error::PersistenceFailed(e.to_string()));
        }

        writeln!(out, "Success! You are now authenticated.")?;
        writeln!(out, "Token ID: {}", token)?;
        Ok(())
    }
}

/// Fill in `username` and `password` from the configured environment chains.
/// Explicit keys are never overwritten; a missing username is an error while
/// a missing password is passed through empty (some backends verify the user
/// externally).
fn apply_credential_defaults(
    params: &mut HashMap<String, String>,
    config: &AuthenticatorConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), Error> {
    if !params.contains_key("username") {
        let username = first_non_empty(&config.username_env_chain, &lookup).ok_or_else(|| {
            Error::MissingCredential(format!(
                "'username' not supplied and none of {} are set",
                config.username_env_chain.join(", ")
            ))
        })?;
        params.insert("username".to_string(), username);
    }

    if !params.contains_key("password") {
        let password = first_non_empty(&config.password_env_chain, &lookup).unwrap_or_default();
        params.insert("password".to_string(), password);
    }

    Ok(())
}

fn first_non_empty(
    chain: &[String],
    lookup: &impl Fn(&str) -> Option<String>,
) -> Option<String> {
    chain
        .iter()
        .filter_map(|name| lookup(name))
        .find(|value| !value.is_empty())
}
