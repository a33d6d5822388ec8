mod credentials;
mod error;
mod fetcher;
mod scope;
mod token;


pub use credentials::{ScopedCredential, ServiceAccountKey};
pub use error::{Error, LoadError};
pub use fetcher::{emit, Config, TokenFetcher};
pub use scope::ScopeSet;
pub use token::Token;

pub const FIREBASE_MESSAGING_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";
pub const DEFAULT_CREDENTIALS_PATH: &str = "./key.json";
const SENSITIVE: &str = "***";
