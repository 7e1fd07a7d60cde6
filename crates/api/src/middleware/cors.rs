use axum::http::{header, Method};
use tower_http::cors::{Any, CorsLayer};

/// Forms are filled from arbitrary origins (shared links), so any origin
/// may call the API.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
