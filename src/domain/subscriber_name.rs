use unicode_segmentation::UnicodeSegmentation;

/// A first or last name sent to the provider as a merge field. Enforces the
/// invariants of a valid name, so if you have an instance of this, the name is
/// guaranteed to be valid.
///
/// # Examples
/// ```
/// use registration_wall::domain::SubscriberName;
///
/// let name = SubscriberName::parse("Ursula".to_string()).unwrap();
/// assert_eq!("Ursula", name.as_ref());
/// ```
#[derive(Debug, Clone)]
pub struct SubscriberName(String);

impl SubscriberName {
    /// Returns `Ok` with a `SubscriberName` if the name is valid, otherwise returns
    /// `Err` with an error message.
    ///
    /// A name is invalid if:
    /// * It is all whitespace (or empty)
    /// * It has more than 256 characters
    /// * Contains any of `/`, `(`, `)`, `"`, `<`, `>`, `\`, `{`, or `}`
    pub fn parse(s: String) -> Result<Self, String> {
        let is_empty_or_whitespace = s.trim().is_empty();

        // graphemes are the visible characters in a unicode string
        let is_too_long = s.graphemes(true).count() > 256;

        let forbidden_characters = ['/', '(', ')', '"', '<', '>', '\\', '{', '}'];
        let contains_forbidden_characters = s.chars().any(|g| forbidden_characters.contains(&g));

        if is_empty_or_whitespace || is_too_long || contains_forbidden_characters {
            Err(format!("{} is not a valid subscriber name.", s))
        } else {
            Ok(Self(s.trim().to_string()))
        }
    }

    /// Parses an optional form field. Missing and blank values are not an
    /// error: they simply leave the merge field unset.
    pub fn parse_optional(s: Option<String>) -> Result<Option<Self>, String> {
        match s {
            Some(s) if !s.trim().is_empty() => Self::parse(s).map(Some),
            _ => Ok(None),
        }
    }
}

impl AsRef<str> for SubscriberName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
