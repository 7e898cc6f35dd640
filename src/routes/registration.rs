use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};
use tracing::Instrument;

use crate::analytics_client::{AnalyticsClient, RegistrationStatus};
use crate::domain::{MergeFields, NewRegistration, SubscriberEmail, SubscriberName, TagName, TagSet};
use crate::mailing_list_client::{MailingListClient, ProviderError};

/// The JSON body posted by the registration form. Every field is optional on
/// the wire; `NewRegistration::try_from` decides what is actually required.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    tag_name: Option<String>,
    #[serde(default, deserialize_with = "list_or_empty")]
    interests: Vec<String>,
    #[serde(default)]
    ga_client_id: Option<String>,
    #[serde(default, deserialize_with = "is_yes")]
    existing: bool,
    #[serde(default)]
    organisation: Option<String>,
    #[serde(default)]
    job_title: Option<String>,
}

/// Anything but an array of strings counts as no interests.
fn list_or_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// Only the exact string `"yes"` is a membership claim.
fn is_yes<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str() == Some("yes"))
}

impl TryFrom<RegistrationForm> for NewRegistration {
    type Error = String;

    fn try_from(form: RegistrationForm) -> Result<Self, Self::Error> {
        let email = SubscriberEmail::parse(form.email.unwrap_or_default())?;
        let primary = TagName::parse(form.tag_name.unwrap_or_default())?;
        let merge_fields = MergeFields {
            first_name: SubscriberName::parse_optional(form.first_name)?,
            last_name: SubscriberName::parse_optional(form.last_name)?,
            organisation: non_blank(form.organisation),
            job_title: non_blank(form.job_title),
        };

        Ok(Self {
            email,
            merge_fields,
            tags: TagSet::new(primary, form.interests),
            analytics_client_id: non_blank(form.ga_client_id),
            claims_membership: form.existing,
        })
    }
}

fn non_blank(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Every way a registration can fail. Each variant keeps the status code and
/// response body the registration form already knows how to display.
#[derive(thiserror::Error)]
pub enum RegistrationError {
    #[error("{0}")]
    Validation(String),
    #[error("The request body is not valid JSON: {0}")]
    MalformedBody(String),
    #[error("Failed to check whether the member exists")]
    LookupFailed(#[source] ProviderError),
    #[error("Failed to add tags to the existing member")]
    TagUpdateFailed(#[source] ProviderError),
    #[error("The member claims to be on the list but was not found")]
    MemberNotFound,
    #[error("Failed to create the new member")]
    MemberCreationFailed(#[source] ProviderError),
}

impl std::fmt::Debug for RegistrationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for RegistrationError {
    fn status_code(&self) -> StatusCode {
        match self {
            RegistrationError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            RegistrationError::Validation(_) => json!({
                "error": "Some required form fields are empty or invalid."
            }),
            RegistrationError::TagUpdateFailed(_) => json!({ "message": "An error occurred." }),
            RegistrationError::MemberNotFound => json!({
                "success": false,
                "error": "Sorry, this email address wasn't found in our database."
            }),
            RegistrationError::MemberCreationFailed(_) => json!({
                "success": false,
                "error": "Error creating member"
            }),
            RegistrationError::MalformedBody(_) | RegistrationError::LookupFailed(_) => {
                json!({ "error": "An error occurred." })
            }
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

/// Writes `e` followed by every error in its `source` chain.
pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}

/// Handles a submission of the registration form.
///
/// The submitter is looked up on the list by the digest of their lowercased
/// email, then either:
/// * tagged, if they are already a member,
/// * rejected, if they said they were a member but are not,
/// * subscribed as a new member otherwise.
///
/// Once the provider has accepted the change an analytics event is sent in
/// the background. Its outcome never changes the response.
#[tracing::instrument(
    name = "Handling a registration",
    skip(form, mailing_list, analytics),
    fields(
        subscriber_email = tracing::field::Empty,
        tag_name = tracing::field::Empty,
    )
)]
pub async fn register(
    form: web::Json<RegistrationForm>,
    mailing_list: web::Data<MailingListClient>,
    analytics: web::Data<AnalyticsClient>,
) -> Result<HttpResponse, RegistrationError> {
    let registration: NewRegistration = form
        .into_inner()
        .try_into()
        .map_err(RegistrationError::Validation)?;

    let span = tracing::Span::current();
    span.record("subscriber_email", &tracing::field::display(&registration.email));
    span.record("tag_name", &registration.tags.primary().as_ref());

    let member_id = registration.member_id();
    let member_exists = mailing_list
        .member_exists(&member_id)
        .await
        .map_err(RegistrationError::LookupFailed)?;

    if member_exists {
        mailing_list
            .add_tags(&member_id, &registration.tags)
            .await
            .map_err(RegistrationError::TagUpdateFailed)?;

        dispatch_analytics_event(
            analytics,
            registration.analytics_client_id,
            RegistrationStatus::MemberExisted,
        );

        Ok(HttpResponse::Ok().json(json!({ "message": "Member exists. Tag added." })))
    } else if registration.claims_membership {
        Err(RegistrationError::MemberNotFound)
    } else {
        mailing_list
            .create_member(&registration)
            .await
            .map_err(RegistrationError::MemberCreationFailed)?;

        dispatch_analytics_event(
            analytics,
            registration.analytics_client_id,
            RegistrationStatus::NewMember,
        );

        Ok(HttpResponse::Ok().json(json!({ "success": true })))
    }
}

/// Sends the analytics event on a detached task. Failures are logged from
/// inside the task and go no further.
fn dispatch_analytics_event(
    analytics: web::Data<AnalyticsClient>,
    client_id: Option<String>,
    status: RegistrationStatus,
) {
    let Some(client_id) = client_id else {
        tracing::warn!("No analytics client id was submitted, skipping analytics event");
        return;
    };

    actix_web::rt::spawn(
        async move {
            if let Err(e) = analytics.send_registration_event(&client_id, status).await {
                tracing::error!(
                    error.cause_chain = ?e,
                    error.message = %e,
                    "Failed to send analytics event"
                );
            }
        }
        .in_current_span(),
    );
}
