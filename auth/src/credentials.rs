mod service_account;


pub use service_account::ServiceAccountKey;

use crate::{Error, ScopeSet, Token};
use chrono::{DateTime, Duration, Utc};
use http::Method;
use jsonwebtoken::{Algorithm, Header};
use serde::{Deserialize, Serialize};
use serde_with::formats::SpaceSeparator;
use serde_with::StringWithSeparator;

// https://datatracker.ietf.org/doc/html/rfc7523#section-2.1
const GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECONDS: i64 = 3600;

/// A service account key bound to the scopes it will request.
#[derive(Debug)]
pub struct ScopedCredential {
    key: ServiceAccountKey,
    scopes: ScopeSet,
}

impl ScopedCredential {
    pub fn new(key: ServiceAccountKey, scopes: ScopeSet) -> Self {
        Self { key, scopes }
    }

    pub fn key(&self) -> &ServiceAccountKey {
        &self.key
    }

    pub fn scopes(&self) -> &ScopeSet {
        &self.scopes
    }

    /// Signs the RS256 assertion exchanged at `token_uri`, issued at `now`.
    pub fn assertion(&self, now: DateTime<Utc>) -> Result<String, Error> {
        #[serde_with::serde_as]
        #[derive(Serialize)]
        struct Claims<'a> {
            iss: &'a str,
            #[serde_as(as = "StringWithSeparator::<SpaceSeparator, &str>")]
            scope: Vec<&'a str>,
            aud: String,
            iat: i64,
            exp: i64,
        }

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id.clone();
        jsonwebtoken::encode(
            &header,
            &Claims {
                iss: &self.key.client_email,
                scope: self.scopes.iter().collect(),
                aud: self.key.token_uri.to_string(),
                iat: now.timestamp(),
                exp: (now + Duration::seconds(ASSERTION_LIFETIME_SECONDS)).timestamp(),
            },
            &self.key.encoding_key,
        )
        .map_err(Error::Assertion)
    }

    #[tracing::instrument(err, ret, skip(client))]
    pub async fn refresh(&self, client: &http_dispatch::Client) -> Result<Token, Error> {
        let now = Utc::now();
        let assertion = self.assertion(now)?;

        let response = {
            #[derive(Deserialize)]
            struct Response {
                access_token: String,
                expires_in: Option<i64>,
                #[serde(default = "bearer")]
                token_type: String,
            }

            fn bearer() -> String {
                "Bearer".to_owned()
            }

            client
                .send::<_, http_dispatch::Json<Response>>(
                    Method::POST,
                    self.key.token_uri.clone(),
                    http_dispatch::Form(&[
                        ("grant_type", GRANT_TYPE),
                        ("assertion", assertion.as_str()),
                    ]),
                )
                .await?
                .0
        };
        Ok(Token {
            access_token: response.access_token,
            token_type: response.token_type,
            expires_at: response.expires_in.and_then(|expires_in| {
                let expires_at = Duration::try_seconds(expires_in)
                    .and_then(|expires_in| now.checked_add_signed(expires_in));
                if expires_at.is_none() {
                    tracing::warn!(expires_in, "ignoring out of range token lifetime");
                }
                expires_at
            }),
        })
    }
}
