use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use url::Url;

use crate::domain::{MemberId, NewRegistration, TagSet};

/// A failed call to the mailing-list provider.
#[derive(thiserror::Error, Debug)]
pub enum ProviderError {
    #[error("Failed to build the provider endpoint URL")]
    Url(#[from] url::ParseError),
    #[error("Request to the mailing-list provider failed")]
    Request(#[from] reqwest::Error),
}

/// A client for one list on the mailing-list provider's REST API.
pub struct MailingListClient {
    http_client: Client,
    base_url: Url,
    list_id: String,
    api_key: Secret<String>,
}

impl MailingListClient {
    /// Creates a client for the list `list_id`.
    ///
    /// `base_url` is the root of the provider's API and must end in `/`. `api_key`
    /// is sent as a bearer token on every request.
    pub fn new(base_url: Url, list_id: String, api_key: Secret<String>) -> Self {
        Self {
            http_client: Client::new(),
            base_url,
            list_id,
            api_key,
        }
    }

    /// Asks the provider whether `member_id` is on the list.
    ///
    /// Any response other than `200 OK` means the member does not exist. Only a
    /// failure to get a response at all is an `Err`.
    #[tracing::instrument(name = "Checking whether member exists", skip(self))]
    pub async fn member_exists(&self, member_id: &MemberId) -> Result<bool, ProviderError> {
        let url = self.member_url(member_id, "")?;
        let response = self
            .http_client
            .get(url)
            .bearer_auth(self.api_key.expose_secret())
            .send()
            .await?;

        Ok(response.status() == StatusCode::OK)
    }

    /// Marks every tag in `tags` active on an existing member.
    #[tracing::instrument(name = "Adding tags to existing member", skip(self, tags))]
    pub async fn add_tags(&self, member_id: &MemberId, tags: &TagSet) -> Result<(), ProviderError> {
        let url = self.member_url(member_id, "/tags")?;
        let body = AddTagsRequest {
            tags: tags
                .primary_first()
                .map(|tag| MemberTag {
                    name: tag.as_ref(),
                    status: "active",
                })
                .collect(),
        };

        self.http_client
            .post(url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }

    /// Subscribes a new member to the list, tagged and with merge fields set.
    #[tracing::instrument(name = "Creating new member", skip(self, registration))]
    pub async fn create_member(&self, registration: &NewRegistration) -> Result<(), ProviderError> {
        let url = self
            .base_url
            .join(&format!("lists/{}/members/", self.list_id))?;

        let fields = &registration.merge_fields;
        let body = CreateMemberRequest {
            email_address: registration.email.as_ref(),
            status: "subscribed",
            tags: registration
                .tags
                .interests_first()
                .map(AsRef::as_ref)
                .collect(),
            merge_fields: MergeFieldsBody {
                first_name: fields.first_name.as_ref().map(AsRef::as_ref),
                last_name: fields.last_name.as_ref().map(AsRef::as_ref),
                organisation: fields.organisation.as_deref(),
                job_title: fields.job_title.as_deref(),
            },
        };

        self.http_client
            .post(url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }

    fn member_url(&self, member_id: &MemberId, suffix: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(&format!(
            "lists/{}/members/{}{}",
            self.list_id, member_id, suffix
        ))
    }
}

/// Body of `POST /lists/{list_id}/members/{member_id}/tags`
#[derive(Serialize)]
struct AddTagsRequest<'a> {
    tags: Vec<MemberTag<'a>>,
}

#[derive(Serialize)]
struct MemberTag<'a> {
    name: &'a str,
    status: &'a str,
}

/// Body of `POST /lists/{list_id}/members/`
#[derive(Serialize)]
struct CreateMemberRequest<'a> {
    email_address: &'a str,
    status: &'a str,
    tags: Vec<&'a str>,
    merge_fields: MergeFieldsBody<'a>,
}

/// Merge field tags are defined per list on the provider side.
#[derive(Serialize)]
struct MergeFieldsBody<'a> {
    #[serde(rename = "FNAME", skip_serializing_if = "Option::is_none")]
    first_name: Option<&'a str>,
    #[serde(rename = "LNAME", skip_serializing_if = "Option::is_none")]
    last_name: Option<&'a str>,
    #[serde(rename = "ORG", skip_serializing_if = "Option::is_none")]
    organisation: Option<&'a str>,
    #[serde(rename = "MMERGE6", skip_serializing_if = "Option::is_none")]
    job_title: Option<&'a str>,
}
