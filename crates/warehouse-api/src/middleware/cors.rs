//! CORS layer configuration.

use std::time::Duration;

use axum::http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};

use warehouse_core::config::CorsConfig;

use crate::handlers::CONFIRM_PASSWORD_HEADER;

/// Builds a CORS tower layer from configuration.
///
/// Methods and headers are fixed to what the API accepts; only origins are
/// configurable.
pub fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins = if config.allows_any_origin() {
        AllowOrigin::any()
    } else {
        let listed: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        AllowOrigin::list(listed)
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static(CONFIRM_PASSWORD_HEADER),
        ])
        .max_age(Duration::from_secs(config.max_age_seconds))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_from_defaults() {
        let _layer = build_cors_layer(&CorsConfig::default());
    }

    #[test]
    fn test_build_with_explicit_origins() {
        let config = CorsConfig {
            allowed_origins: vec![
                "https://crm.example.com".to_string(),
                "not a header\u{0}".to_string(),
            ],
            ..CorsConfig::default()
        };
        let _layer = build_cors_layer(&config);
    }
}
