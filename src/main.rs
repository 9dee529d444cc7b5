use clap::{Parser, Subcommand};
use vauth::auth::HandlerRegistry;
use vauth::{Authenticator, AuthenticatorConfig, Error, TokenStore, VaultClient};

/// Lightweight CLI for authenticating against HashiCorp Vault.
#[derive(Parser, Debug)]
#[command(name = "vauth", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Authenticate against Vault and persist the resulting token
    Login {
        /// Authentication method (aws, cert, github, ldap, oidc, okta,
        /// radius, token, userpass)
        #[arg(short, long)]
        method: String,

        /// Method parameters as key=value, key=@file, key=-, @file, or -
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Operate on the locally stored token
    Token {
        #[command(subcommand)]
        command: TokenCommand,
    },
}

#[derive(Subcommand, Debug)]
enum TokenCommand {
    /// Print the stored token
    Read,
    /// Delete the stored token
    Erase,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        // Authentication failures already embed the method's usage text, so
        // nothing beyond the error itself is printed.
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Error> {
    match cli.command {
        Command::Login { method, args } => {
            let params = vauth::kv::parse_args_data_string(std::io::stdin().lock(), &args)?;

            let client = VaultClient::from_env()?;
            let authenticator = Authenticator::new(
                HandlerRegistry::default(),
                TokenStore::new()?,
                AuthenticatorConfig::default(),
            );

            let mut stdout = std::io::stdout().lock();
            authenticator.login(&client, &method, params, &mut stdout).await
        }
        Command::Token { command } => {
            let store = TokenStore::new()?;
            match command {
                TokenCommand::Read => {
                    println!("{}", store.read()?);
                    Ok(())
                }
                TokenCommand::Erase => store.erase(),
            }
        }
    }
}
