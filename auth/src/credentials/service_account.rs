// https://google.aip.dev/auth/4112

use crate::{Error, LoadError};
use http::Uri;
use jsonwebtoken::EncodingKey;
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use tokio::fs;

const SERVICE_ACCOUNT: &str = "service_account";

#[serde_with::serde_as]
#[derive(Deserialize)]
struct File {
    #[serde(rename = "type")]
    kind: String,
    client_email: String,
    private_key: String,
    private_key_id: Option<String>,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    token_uri: Uri,
    project_id: Option<String>,
    client_id: Option<String>,
}

/// A parsed service account key file. The private key is validated on load.
#[derive(Clone)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key_id: Option<String>,
    pub token_uri: Uri,
    pub project_id: Option<String>,
    pub client_id: Option<String>,
    pub(crate) encoding_key: EncodingKey,
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key_id", &self.private_key_id)
            .field("private_key", &crate::SENSITIVE)
            .field("token_uri", &self.token_uri)
            .field("project_id", &self.project_id)
            .field("client_id", &self.client_id)
            .finish()
    }
}

impl ServiceAccountKey {
    #[tracing::instrument(err, ret)]
    pub async fn from_file(path: &Path) -> Result<Self, Error> {
        tracing::debug!("loading credentials from {}", path.display());
        let contents = fs::read(path).await.map_err(|e| Error::CredentialLoad {
            path: path.to_owned(),
            source: e.into(),
        })?;
        Self::from_slice(&contents).map_err(|source| Error::CredentialLoad {
            path: path.to_owned(),
            source,
        })
    }

    pub fn from_slice(contents: &[u8]) -> Result<Self, LoadError> {
        let file = serde_json::from_slice::<File>(contents)?;
        if file.kind != SERVICE_ACCOUNT {
            return Err(LoadError::UnsupportedType(file.kind));
        }
        Ok(Self {
            encoding_key: EncodingKey::from_rsa_pem(file.private_key.as_bytes())?,
            client_email: file.client_email,
            private_key_id: file.private_key_id,
            token_uri: file.token_uri,
            project_id: file.project_id,
            client_id: file.client_id,
        })
    }
}
