use chrono::{DateTime, Utc};
use std::fmt;

#[derive(Clone)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
    /// `None` when the endpoint reports no usable lifetime.
    pub expires_at: Option<DateTime<Utc>>,
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &crate::SENSITIVE)
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
