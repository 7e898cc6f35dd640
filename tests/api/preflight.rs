use crate::app;
use wiremock::{matchers::any, Mock, ResponseTemplate};

#[actix_web::test]
async fn preflight_returns_cors_headers_and_no_body() {
    let app = app::spawn_app().await;

    let response = app.preflight("/").await;

    assert_eq!(200, response.status().as_u16());
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(
        headers["access-control-allow-methods"],
        "GET, POST, PUT, DELETE, OPTIONS"
    );
    assert_eq!(headers["access-control-allow-headers"], "Content-Type");
    assert_eq!(Some(0), response.content_length());
}

#[actix_web::test]
async fn preflight_is_answered_on_any_path() {
    let app = app::spawn_app().await;

    for path in ["/health_check", "/some/other/path"] {
        let response = app.preflight(path).await;

        assert_eq!(
            200,
            response.status().as_u16(),
            "Preflight for {} was not answered",
            path
        );
        assert_eq!(response.headers()["access-control-allow-headers"], "Content-Type");
    }
}

#[actix_web::test]
async fn preflight_never_reaches_the_provider() {
    let app = app::spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.mailing_list_server)
        .await;

    app.preflight("/").await;
}

#[actix_web::test]
async fn preflight_with_a_registration_body_is_still_a_preflight() {
    let app = app::spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.mailing_list_server)
        .await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&app.analytics_server)
        .await;

    let response = app
        .preflight_with_body(&app::registration_body("ursula_le_guin@gmail.com"))
        .await;

    assert_eq!(200, response.status().as_u16());
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(
        headers["access-control-allow-methods"],
        "GET, POST, PUT, DELETE, OPTIONS"
    );
    assert_eq!(headers["access-control-allow-headers"], "Content-Type");
    assert_eq!(Some(0), response.content_length());
}
