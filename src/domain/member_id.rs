use super::SubscriberEmail;
use crate::digest::digest;

/// The provider's identifier for a list member: the MD5 hex digest of the
/// lowercased email address. Treated as an opaque key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberId(String);

impl From<&SubscriberEmail> for MemberId {
    fn from(email: &SubscriberEmail) -> Self {
        Self(digest(&email.as_ref().to_lowercase()))
    }
}

impl AsRef<str> for MemberId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MemberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
