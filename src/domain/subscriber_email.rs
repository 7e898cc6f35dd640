use validator::validate_email;

/// The email address a registration is filed under. Enforces validity of the
/// email address, so any instance of this is guaranteed to have a valid email
/// address.
///
/// The address keeps the casing it was submitted with; the provider stores it
/// as given. Case only stops mattering once it becomes a [`MemberId`].
///
/// # Examples
/// Use the `parse` function to build a `SubscriberEmail` from a string.
/// We can then get the email address back out using the `AsRef<str>` implementation.
/// ```
/// use registration_wall::domain::SubscriberEmail;
///
/// let email = SubscriberEmail::parse("Valid@Domain.com".to_string()).unwrap();
/// assert_eq!("Valid@Domain.com", email.as_ref());
/// ```
///
/// [`MemberId`]: super::MemberId
#[derive(Debug, Clone)]
pub struct SubscriberEmail(String);

impl SubscriberEmail {
    /// Return `Ok` with a valid `SubscriberEmail` when `s` is a valid email address.
    /// Surrounding whitespace is ignored. Otherwise, returns `Err` with an error
    /// message describing the problem.
    pub fn parse(s: String) -> Result<Self, String> {
        let trimmed = s.trim();
        if validate_email(trimmed) {
            Ok(SubscriberEmail(trimmed.to_string()))
        } else {
            Err(format!("{} is not a valid subscriber email.", s))
        }
    }
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubscriberEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
