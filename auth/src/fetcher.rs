use crate::{Error, ScopeSet, ScopedCredential, ServiceAccountKey, Token};
use std::io;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Config {
    pub credentials_path: PathBuf,
    pub scopes: Vec<String>,
    /// Upper bound on the token request. `None` leaves it to the transport.
    pub timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            credentials_path: crate::DEFAULT_CREDENTIALS_PATH.into(),
            scopes: vec![crate::FIREBASE_MESSAGING_SCOPE.to_owned()],
            timeout: None,
        }
    }
}

/// Loads a service account key and exchanges it for one access token per [`TokenFetcher::fetch`].
#[derive(Clone)]
pub struct TokenFetcher {
    client: http_dispatch::Client,
    config: Config,
}

impl TokenFetcher {
    pub fn new(client: http_dispatch::Client, config: Config) -> Self {
        Self { client, config }
    }

    #[tracing::instrument(err, ret, skip(self), fields(path = %self.config.credentials_path.display()))]
    pub async fn fetch(&self) -> Result<Token, Error> {
        let key = ServiceAccountKey::from_file(&self.config.credentials_path).await?;
        tracing::debug!(
            client_email = %key.client_email,
            project_id = ?key.project_id,
            "loaded service account",
        );
        let credential = ScopedCredential::new(key, ScopeSet::new(&self.config.scopes)?);
        credential.refresh(&self.client).await
    }
}

pub fn emit<W>(token: &Token, mut writer: W) -> io::Result<()>
where
    W: io::Write,
{
    writeln!(writer, "Access Token: {}", token.access_token)
}
