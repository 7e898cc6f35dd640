use std::net::TcpListener;
use std::time::Duration;

use once_cell::sync::Lazy;
use registration_wall::{
    configuration::get_configuration,
    digest::digest,
    startup::Application,
    telemetry::{get_subscriber, init_subscriber},
};
use secrecy::ExposeSecret;
use serde_json::json;
use wiremock::MockServer;

// Ensure that we only initialize our subscriber once by wrapping in Lazy
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "debug";
    let subscriber_name = "test";

    // We use an environment variable to decide whether to swallow logs.
    // Need two separate blocks because the generic types on get_subscriber differ
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

/// Description of a mock app spun up for integration testing
pub struct TestApp {
    /// Address to send requests to the mock app
    pub address: String,
    /// Stand in for the mailing-list provider
    pub mailing_list_server: MockServer,
    /// Stand in for the analytics collector
    pub analytics_server: MockServer,
    pub list_id: String,
    pub api_key: String,
}

impl TestApp {
    /// Send a POST with a JSON `body` to the registration endpoint
    pub async fn post_registration(&self, body: &serde_json::Value) -> reqwest::Response {
        self.send_registration(reqwest::Method::POST, "/", body).await
    }

    /// Send a JSON `body` with any method to any path
    pub async fn send_registration(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &serde_json::Value,
    ) -> reqwest::Response {
        reqwest::Client::new()
            .request(method, &format!("{}{}", self.address, path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Send a POST with an arbitrary body and no content type
    pub async fn post_raw_registration(&self, body: &'static str) -> reqwest::Response {
        reqwest::Client::new()
            .post(&format!("{}/", self.address))
            .body(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Send a CORS preflight for `path`
    pub async fn preflight(&self, path: &str) -> reqwest::Response {
        reqwest::Client::new()
            .request(reqwest::Method::OPTIONS, &format!("{}{}", self.address, path))
            .header("Origin", "https://forms.example.org")
            .header("Access-Control-Request-Method", "POST")
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Send a preflight for `/` that also carries a registration body
    pub async fn preflight_with_body(&self, body: &serde_json::Value) -> reqwest::Response {
        reqwest::Client::new()
            .request(reqwest::Method::OPTIONS, &format!("{}/", self.address))
            .header("Origin", "https://forms.example.org")
            .header("Access-Control-Request-Method", "POST")
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Send a GET to the health_check API of our mocked app
    pub async fn get_health_check(&self) -> reqwest::Response {
        reqwest::Client::new()
            .get(&format!("{}/health_check", &self.address))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Path of the provider resource for the member registered as `email`
    pub fn member_path(&self, email: &str) -> String {
        format!(
            "/lists/{}/members/{}",
            self.list_id,
            digest(&email.to_lowercase())
        )
    }

    /// Analytics events are sent in the background, after the response. Wait
    /// a little for `expected` of them to arrive.
    pub async fn analytics_requests(&self, expected: usize) -> Vec<wiremock::Request> {
        for _ in 0..50 {
            let requests = self
                .analytics_server
                .received_requests()
                .await
                .expect("Request recording is disabled");
            if requests.len() >= expected {
                return requests;
            }
            actix_web::rt::time::sleep(Duration::from_millis(20)).await;
        }
        self.analytics_server
            .received_requests()
            .await
            .expect("Request recording is disabled")
    }
}

/// A complete registration form for `email`
pub fn registration_body(email: &str) -> serde_json::Value {
    json!({
        "firstName": "Ursula",
        "lastName": "Le Guin",
        "email": email,
        "tagName": "registration-wall",
        "interests": ["climate", "health"],
        "gaClientId": "555.1234",
        "organisation": "Earthsea",
        "jobTitle": "Writer"
    })
}

/// Spins up a testing app to write integration tests against.
pub async fn spawn_app() -> TestApp {
    spawn(false).await
}

/// Like `spawn_app`, but nothing is listening at the provider's address.
pub async fn spawn_app_with_unreachable_provider() -> TestApp {
    spawn(true).await
}

async fn spawn(unreachable_provider: bool) -> TestApp {
    // TRACING will only run the first time this function is called.
    Lazy::force(&TRACING);

    let mailing_list_server = MockServer::start().await;
    let analytics_server = MockServer::start().await;

    let provider_uri = if unreachable_provider {
        // Mock servers are pooled and keep listening after drop, so grab a
        // port from the OS and release it instead.
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind to random port");
        let port = listener.local_addr().unwrap().port();
        format!("http://127.0.0.1:{}", port)
    } else {
        mailing_list_server.uri()
    };

    let configuration = {
        let mut c = get_configuration().expect("Failed to read configuration");
        // Ask the OS for a random port
        c.application.port = 0;
        c.mailing_list.base_url = Some(provider_uri);
        c.analytics.base_url = analytics_server.uri();
        c
    };

    let app = Application::build(configuration.clone())
        .await
        .expect("Failed to build application");
    let address = format!("http://127.0.0.1:{}", app.port());
    let _ = tokio::spawn(app.run_until_stopped());

    TestApp {
        address,
        mailing_list_server,
        analytics_server,
        list_id: configuration.mailing_list.list_id,
        api_key: configuration.mailing_list.api_key.expose_secret().clone(),
    }
}
