use super::{MemberId, SubscriberEmail, SubscriberName, TagSet};

/// Captures all of the information we need to process a registration, after
/// the submitted form has been validated.
#[derive(Debug)]
pub struct NewRegistration {
    pub email: SubscriberEmail,
    pub merge_fields: MergeFields,
    pub tags: TagSet,
    /// Analytics client id of the browser that submitted the form.
    pub analytics_client_id: Option<String>,
    /// Whether the submitter says they are already on the list.
    pub claims_membership: bool,
}

impl NewRegistration {
    pub fn member_id(&self) -> MemberId {
        MemberId::from(&self.email)
    }
}

/// Profile attributes stored on a newly created member. Unset fields are not
/// sent to the provider.
#[derive(Debug, Default)]
pub struct MergeFields {
    pub first_name: Option<SubscriberName>,
    pub last_name: Option<SubscriberName>,
    pub organisation: Option<String>,
    pub job_title: Option<String>,
}
