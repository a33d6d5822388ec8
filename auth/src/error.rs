use http::StatusCode;
use serde::Deserialize;
use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load credentials from {}: {source}", .path.display())]
    CredentialLoad {
        path: PathBuf,
        #[source]
        source: LoadError,
    },
    #[error("invalid configuration: {0}")]
    Configuration(String),
    #[error("failed to sign assertion: {0}")]
    Assertion(#[source] jsonwebtoken::errors::Error),
    #[error("token endpoint rejected the request [{status}]: {message}")]
    Auth { status: StatusCode, message: String },
    #[error("token request failed: {0}")]
    Network(#[source] http_dispatch::Error),
    #[error("token request timed out")]
    Timeout(#[source] http_dispatch::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("unsupported credential type {0:?}, expected \"service_account\"")]
    UnsupportedType(String),
    #[error("invalid private key: {0}")]
    PrivateKey(#[from] jsonwebtoken::errors::Error),
}

impl From<http_dispatch::Error> for Error {
    fn from(e: http_dispatch::Error) -> Self {
        match e {
            // The provider is unavailable or throttling, not rejecting the assertion.
            e @ http_dispatch::Error::Http { status, .. }
                if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS =>
            {
                Self::Network(e)
            }
            http_dispatch::Error::Http { status, body } => Self::Auth {
                status,
                message: describe(&body),
            },
            e @ http_dispatch::Error::Timeout(_) => Self::Timeout(e),
            e => Self::Network(e),
        }
    }
}

// https://datatracker.ietf.org/doc/html/rfc6749#section-5.2
fn describe(body: &[u8]) -> String {
    #[derive(Deserialize)]
    struct Response {
        error: String,
        error_description: Option<String>,
    }

    match serde_json::from_slice::<Response>(body) {
        Ok(Response {
            error,
            error_description: Some(description),
        }) => format!("{error}: {description}"),
        Ok(Response { error, .. }) => error,
        Err(_) => String::from_utf8_lossy(body).into_owned(),
    }
}
