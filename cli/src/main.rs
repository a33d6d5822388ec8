use clap::Parser;
use service_account_auth::{Config, TokenFetcher};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Prints a short-lived OAuth2 access token for a service account.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Service account key file.
    #[arg(
        long,
        env = "GOOGLE_APPLICATION_CREDENTIALS",
        default_value = service_account_auth::DEFAULT_CREDENTIALS_PATH,
    )]
    credentials: PathBuf,
    /// Scope to request; repeat for more than one.
    #[arg(long = "scope", default_value = service_account_auth::FIREBASE_MESSAGING_SCOPE)]
    scopes: Vec<String>,
    /// Token request timeout in seconds.
    #[arg(long, env = "FCM_TOKEN_TIMEOUT")]
    timeout: Option<u64>,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            credentials_path: args.credentials,
            scopes: args.scopes,
            timeout: args.timeout.map(Duration::from_secs),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let config = Config::from(Args::parse());
    let client = http_dispatch::Client::reqwest(reqwest::Client::new(), config.timeout);
    let token = TokenFetcher::new(client, config).fetch().await?;
    service_account_auth::emit(&token, io::stdout().lock())?;

    Ok(())
}
