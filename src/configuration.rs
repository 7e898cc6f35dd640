use secrecy::Secret;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;
use url::Url;

/// App-wide configuration
#[derive(Clone, Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub mailing_list: MailingListSettings,
    pub analytics: AnalyticsSettings,
}

#[derive(Clone, Deserialize)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    /// Value of `Access-Control-Allow-Origin` on every response. `*` for a
    /// public form, or the single origin the form is served from.
    pub allowed_origin: String,
}

/// Settings needed to talk to the mailing-list provider's REST API.
#[derive(Clone, Deserialize)]
pub struct MailingListSettings {
    pub api_key: Secret<String>,
    /// Datacenter prefix of the account, e.g. `us1`.
    pub server_prefix: String,
    pub list_id: String,
    /// Overrides the URL derived from `server_prefix`. Only needed when the
    /// API is reached through something other than the public endpoint.
    #[serde(default)]
    pub base_url: Option<String>,
}

impl MailingListSettings {
    /// The root of the provider's v3 API, always ending in `/` so that
    /// endpoint paths can be joined onto it.
    pub fn base_url(&self) -> Result<Url, url::ParseError> {
        let raw = match &self.base_url {
            Some(base_url) => base_url.clone(),
            None => format!("https://{}.api.mailchimp.com/3.0", self.server_prefix),
        };
        with_trailing_slash(&raw)
    }
}

/// Settings needed to post measurement-protocol events.
#[derive(Clone, Deserialize)]
pub struct AnalyticsSettings {
    pub base_url: String,
    pub measurement_id: String,
    pub api_secret: Secret<String>,
}

impl AnalyticsSettings {
    pub fn base_url(&self) -> Result<Url, url::ParseError> {
        with_trailing_slash(&self.base_url)
    }
}

fn with_trailing_slash(raw: &str) -> Result<Url, url::ParseError> {
    if raw.ends_with('/') {
        Url::parse(raw)
    } else {
        Url::parse(&format!("{}/", raw))
    }
}

/// Reads app configuration from the default file location, then applies any
/// overrides found in `APP_`-prefixed environment variables.
///
/// `APP_APPLICATION__PORT=5001` overrides `application.port`, and
/// `APP_MAILING_LIST__API_KEY=...` overrides `mailing_list.api_key`.
///
/// Returns an error if parsing the config into a `Settings` struct fails. This
/// could be a problem reading from the file, a malformed file, or a missing key.
pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    config::Config::builder()
        .add_source(config::File::with_name("configuration"))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?
        .try_deserialize()
}
