use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use url::Url;

/// Name every registration event is reported under.
pub const REGISTRATION_EVENT: &str = "registration_wall";

/// A failed measurement-protocol call. Never surfaced to the person
/// registering, only logged.
#[derive(thiserror::Error, Debug)]
pub enum AnalyticsError {
    #[error("Failed to build the collect endpoint URL")]
    Url(#[from] url::ParseError),
    #[error("Request to the analytics collector failed")]
    Request(#[from] reqwest::Error),
}

/// How the registration ended, as reported to analytics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    MemberExisted,
    NewMember,
}

/// A client for the measurement-protocol collect endpoint.
pub struct AnalyticsClient {
    http_client: Client,
    base_url: Url,
    measurement_id: String,
    api_secret: Secret<String>,
}

impl AnalyticsClient {
    pub fn new(base_url: Url, measurement_id: String, api_secret: Secret<String>) -> Self {
        Self {
            http_client: Client::new(),
            base_url,
            measurement_id,
            api_secret,
        }
    }

    /// Reports a single registration event for the browser identified by
    /// `client_id`.
    #[tracing::instrument(name = "Sending analytics event", skip(self))]
    pub async fn send_registration_event(
        &self,
        client_id: &str,
        status: RegistrationStatus,
    ) -> Result<(), AnalyticsError> {
        let mut url = self.base_url.join("mp/collect")?;
        url.query_pairs_mut()
            .append_pair("measurement_id", &self.measurement_id)
            .append_pair("api_secret", self.api_secret.expose_secret());

        let body = CollectRequest {
            client_id,
            events: vec![Event {
                name: REGISTRATION_EVENT,
                params: EventParams { status },
            }],
        };

        self.http_client
            .post(url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        tracing::info!("Analytics event accepted");
        Ok(())
    }
}

/// The format of a request body required by the measurement-protocol API
#[derive(Serialize)]
struct CollectRequest<'a> {
    client_id: &'a str,
    events: Vec<Event<'a>>,
}

#[derive(Serialize)]
struct Event<'a> {
    name: &'a str,
    params: EventParams,
}

/// The submitter's email is deliberately left out: it is personal data.
#[derive(Serialize)]
struct EventParams {
    status: RegistrationStatus,
}
