use actix_web::HttpResponse;

/// Liveness probe for whatever fronts the service. Always 200, empty body,
/// and never touches the provider or the analytics collector.
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().finish()
}
