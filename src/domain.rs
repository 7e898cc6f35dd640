mod member_id;
mod new_registration;
mod subscriber_email;
mod subscriber_name;
mod tag;

pub use member_id::MemberId;
pub use new_registration::{MergeFields, NewRegistration};
pub use subscriber_email::SubscriberEmail;
pub use subscriber_name::SubscriberName;
pub use tag::{TagName, TagSet};
