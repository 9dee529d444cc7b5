mod aws;
mod cert;
mod github;
mod oidc;
mod token;
mod userpass;

pub use aws::AwsHandler;
pub use cert::CertHandler;
pub use github::GithubHandler;
pub use oidc::OidcHandler;
pub use token::TokenHandler;
pub use userpass::UserpassHandler;

use crate::client::VaultClient;
use crate::error::Error;
use crate::secret::Secret;
use async_trait::async_trait;
use std::collections::HashMap;

/// Trait every auth method handler must implement to enable login via the
/// CLI.
#[async_trait]
pub trait LoginHandler: Send + Sync {
    /// Perform the credential exchange and return the resulting secret.
    async fn auth(
        &self,
        client: &VaultClient,
        params: &HashMap<String, String>,
    ) -> Result<Secret, Error>;

    /// Usage text for this method, shown when authentication fails.
    fn help(&self) -> String;
}

/// Fixed mapping from method name to its handler. Populated once at process
/// start and read-only afterwards.
pub struct HandlerRegistry {
    handlers: HashMap<&'static str, Box<dyn LoginHandler>>,
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        let mut handlers: HashMap<&'static str, Box<dyn LoginHandler>> = HashMap::new();

        handlers.insert("aws", Box::new(AwsHandler::new("aws")));
        handlers.insert("cert", Box::new(CertHandler::new("cert")));
        handlers.insert("github", Box::new(GithubHandler::new("github")));
        handlers.insert("ldap", Box::new(UserpassHandler::new("ldap")));
        handlers.insert("oidc", Box::new(OidcHandler::new("oidc")));
        handlers.insert("okta", Box::new(UserpassHandler::new("okta")));
        // radius and userpass share an implementation and differ only in
        // their default mount path.
        handlers.insert("radius", Box::new(UserpassHandler::new("radius")));
        handlers.insert("token", Box::new(TokenHandler::new()));
        handlers.insert("userpass", Box::new(UserpassHandler::new("userpass")));

        Self { handlers }
    }
}

impl HandlerRegistry {
    /// Look up the handler for a method name. Pure lookup, no I/O.
    pub fn resolve(&self, method: &str) -> Option<&dyn LoginHandler> {
        self.handlers.get(method).map(|h| h.as_ref())
    }

    /// Canonical method names, sorted.
    pub fn methods(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.handlers.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

/// The mount path the handler should target: an explicit `mount` parameter
/// wins, otherwise the handler's configured default.
fn mount_path<'a>(params: &'a HashMap<String, String>, default_mount: &'a str) -> &'a str {
    params.get("mount").map(String::as_str).unwrap_or(default_mount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_methods() {
        let registry = HandlerRegistry::default();
        for method in ["aws", "cert", "github", "ldap", "oidc", "okta", "radius", "token", "userpass"]
        {
            assert!(registry.resolve(method).is_some(), "missing {}", method);
        }
    }

    #[test]
    fn test_resolve_unknown_method() {
        let registry = HandlerRegistry::default();
        assert!(registry.resolve("doesnotexist").is_none());
    }

    #[test]
    fn test_methods_sorted() {
        let registry = HandlerRegistry::default();
        let methods = registry.methods();
        let mut sorted = methods.clone();
        sorted.sort_unstable();
        assert_eq!(methods, sorted);
    }

    #[test]
    fn test_mount_override() {
        let mut params = HashMap::new();
        assert_eq!(mount_path(&params, "userpass"), "userpass");

        params.insert("mount".to_string(), "corp-ldap".to_string());
        assert_eq!(mount_path(&params, "userpass"), "corp-ldap");
    }
}
