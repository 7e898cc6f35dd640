use actix_web::http::header;
use actix_web::{web, HttpResponse};

/// The origin allowed to call the API from a browser. Sent back as
/// `Access-Control-Allow-Origin` on every response.
#[derive(Debug, Clone)]
pub struct AllowedOrigin(pub String);

/// Answers a CORS preflight request. No body, whatever was requested.
pub async fn preflight(allowed_origin: web::Data<AllowedOrigin>) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header((header::ACCESS_CONTROL_ALLOW_ORIGIN, allowed_origin.0.as_str()))
        .insert_header((
            header::ACCESS_CONTROL_ALLOW_METHODS,
            "GET, POST, PUT, DELETE, OPTIONS",
        ))
        .insert_header((header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"))
        .finish()
}
