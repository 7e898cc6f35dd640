/// A non-blank label attached to a member record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagName(String);

impl TagName {
    /// Returns `Err` if `s` is empty or only whitespace. Surrounding whitespace
    /// is trimmed.
    pub fn parse(s: String) -> Result<Self, String> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            Err("Tag names cannot be blank.".to_string())
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }
}

impl AsRef<str> for TagName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The registration's primary tag plus the interests the submitter picked.
#[derive(Debug, Clone)]
pub struct TagSet {
    primary: TagName,
    interests: Vec<TagName>,
}

impl TagSet {
    /// Blank interests are dropped rather than rejected.
    pub fn new(primary: TagName, interests: Vec<String>) -> Self {
        let interests = interests
            .into_iter()
            .filter_map(|interest| TagName::parse(interest).ok())
            .collect();
        Self { primary, interests }
    }

    pub fn primary(&self) -> &TagName {
        &self.primary
    }

    pub fn interests(&self) -> &[TagName] {
        &self.interests
    }

    /// Order used when tagging an existing member: primary tag first.
    pub fn primary_first(&self) -> impl Iterator<Item = &TagName> {
        std::iter::once(&self.primary).chain(self.interests.iter())
    }

    /// Order used when creating a member: interests first, primary tag last.
    pub fn interests_first(&self) -> impl Iterator<Item = &TagName> {
        self.interests.iter().chain(std::iter::once(&self.primary))
    }
}
