//! Session tri-state handed to every data-fetching component.

use std::fmt;

/// An opaque bearer token issued by the external authentication service.
///
/// `Debug` is redacted so tokens never end up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap a token. Returns `None` for blank input.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        let trimmed = token.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// The raw token, for building the `Authorization` header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// The current authentication session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// The authentication service has not answered yet.
    #[default]
    Pending,
    /// Nobody is signed in.
    Absent,
    /// Signed in with the given token.
    Present(AccessToken),
}

impl SessionState {
    /// Build a session from an optional raw token.
    pub fn from_token(token: Option<&str>) -> Self {
        match token.and_then(AccessToken::new) {
            Some(token) => Self::Present(token),
            None => Self::Absent,
        }
    }

    /// The token, if signed in.
    pub fn token(&self) -> Option<&AccessToken> {
        match self {
            Self::Present(token) => Some(token),
            _ => None,
        }
    }

    /// Whether a token is available.
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }
}
