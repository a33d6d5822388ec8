use crate::Error;
use std::fmt;

/// Ordered, non-empty set of OAuth2 scopes requested for a single token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScopeSet(Box<[Box<str>]>);

impl ScopeSet {
    /// Duplicates are dropped, keeping the first occurrence.
    pub fn new<I>(scopes: I) -> Result<Self, Error>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut set = Vec::<Box<str>>::new();
        for scope in scopes {
            let scope = scope.as_ref();
            if scope.is_empty() {
                return Err(Error::Configuration("scope must not be empty".to_owned()));
            }
            if scope.contains(char::is_whitespace) {
                return Err(Error::Configuration(format!(
                    "scope {scope:?} must not contain whitespace",
                )));
            }
            if !set.iter().any(|s| &**s == scope) {
                set.push(scope.into());
            }
        }
        if set.is_empty() {
            return Err(Error::Configuration(
                "at least one scope is required".to_owned(),
            ));
        }
        Ok(Self(set.into()))
    }

    pub fn firebase_messaging() -> Self {
        Self(vec![Box::from(crate::FIREBASE_MESSAGING_SCOPE)].into())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|scope| &**scope)
    }
}

impl Default for ScopeSet {
    fn default() -> Self {
        Self::firebase_messaging()
    }
}

impl fmt::Display for ScopeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, scope) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(scope)?;
        }
        Ok(())
    }
}
