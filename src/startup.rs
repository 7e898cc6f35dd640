use std::net::TcpListener;

use actix_web::http::header;
use actix_web::middleware::DefaultHeaders;
use actix_web::{dev::Server, guard, web, App, HttpServer};
use tracing_actix_web::TracingLogger;

use crate::{
    analytics_client::AnalyticsClient,
    configuration::Settings,
    mailing_list_client::MailingListClient,
    routes::{health_check, preflight, register, AllowedOrigin, RegistrationError},
};

/// A running application
pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    /// Build an HTTP server running our app. The behavior of the app is configured
    /// through the `settings` argument.
    pub async fn build(settings: Settings) -> std::io::Result<Self> {
        let mailing_list_config = settings.mailing_list;
        let mailing_list_client = MailingListClient::new(
            mailing_list_config
                .base_url()
                .expect("Invalid mailing list base URL"),
            mailing_list_config.list_id,
            mailing_list_config.api_key,
        );

        let analytics_config = settings.analytics;
        let analytics_client = AnalyticsClient::new(
            analytics_config
                .base_url()
                .expect("Invalid analytics base URL"),
            analytics_config.measurement_id,
            analytics_config.api_secret,
        );

        let app_config = settings.application;
        let app_address = format!("{}:{}", &app_config.host, app_config.port);
        let listener = TcpListener::bind(app_address)?;
        let port = listener.local_addr()?.port();

        let server = run(
            listener,
            mailing_list_client,
            analytics_client,
            AllowedOrigin(app_config.allowed_origin),
        )?;
        Ok(Self { port, server })
    }

    /// The port that the app is listening on
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Listen and handle requests until we receive a stop signal
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}

/// Starts a server, listening on `listener`, running in the background and returns it
fn run(
    listener: TcpListener,
    mailing_list_client: MailingListClient,
    analytics_client: AnalyticsClient,
    allowed_origin: AllowedOrigin,
) -> std::io::Result<Server> {
    let mailing_list_client = web::Data::new(mailing_list_client);
    let analytics_client = web::Data::new(analytics_client);
    let allowed_origin = web::Data::new(allowed_origin);

    // Bodies that are not JSON go through the same error type as the rest of
    // the registration flow. The form does not always set a content type.
    let json_config = web::JsonConfig::default()
        .content_type_required(false)
        .error_handler(|err, _req| RegistrationError::MalformedBody(err.to_string()).into());

    let server = HttpServer::new(move || {
        App::new()
            .wrap(DefaultHeaders::new().add((
                header::ACCESS_CONTROL_ALLOW_ORIGIN,
                allowed_origin.0.clone(),
            )))
            .wrap(TracingLogger::default())
            // Registered first so that preflights never reach a resource
            // that would answer 405.
            .service(
                web::resource("/{tail:.*}")
                    .guard(guard::Options())
                    .to(preflight),
            )
            // Guarded so that other methods fall through to the form handler
            // instead of getting a 405.
            .service(
                web::resource("/health_check")
                    .guard(guard::Get())
                    .to(health_check),
            )
            // Every other request is a form submission, whatever its method
            // or path. Bodies that are not JSON end up as `MalformedBody`.
            .default_service(web::to(register))
            .app_data(json_config.clone())
            .app_data(mailing_list_client.clone())
            .app_data(analytics_client.clone())
            .app_data(allowed_origin.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
