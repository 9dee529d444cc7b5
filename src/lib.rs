//! vauth - lightweight CLI for authenticating against HashiCorp Vault
//!
//! The login flow is:
//! 1. raw `key=value` tokens become a parameter map ([`kv`])
//! 2. the requested method resolves to a handler ([`auth::HandlerRegistry`])
//! 3. the handler performs the credential exchange ([`Authenticator`])
//! 4. the resulting token is persisted for later calls ([`TokenStore`])

pub mod auth;
mod client;
mod error;
pub mod kv;
mod login;
mod secret;
mod token_store;

pub use client::{VaultClient, VaultClientBuilder};
pub use error::Error;
pub use login::{Authenticator, AuthenticatorConfig};
pub use secret::{Secret, SecretAuth};
pub use token_store::TokenStore;
