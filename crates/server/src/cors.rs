use config::{AnyOrUrlArray, CorsConfig};
use http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Builds the CORS layer from configuration.
///
/// Origins containing glob characters are matched as patterns, the rest exactly.
/// The browser frontend only needs `GET`, `POST` and a JSON content type.
pub(super) fn generate(
    CorsConfig {
        allow_credentials,
        allow_origins,
        max_age,
    }: &CorsConfig,
) -> CorsLayer {
    let mut cors_layer = CorsLayer::new()
        .allow_credentials(*allow_credentials)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    if let Some(allow_origins) = allow_origins {
        cors_layer = cors_layer.allow_origin(match allow_origins {
            AnyOrUrlArray::Any => AllowOrigin::any(),
            AnyOrUrlArray::Explicit(origins) => {
                let mut constants = Vec::new();
                let mut globs = Vec::new();

                for origin in origins {
                    let origin = &origin[..url::Position::BeforePath];

                    if origin.chars().any(|c| "?*[]{}!\\".contains(c)) {
                        globs.push(origin.to_owned());
                    } else if let Ok(value) = HeaderValue::from_str(origin) {
                        constants.push(value);
                    } else {
                        log::warn!("Ignoring CORS origin that is not a valid header value: {origin}");
                    }
                }

                if globs.is_empty() {
                    AllowOrigin::list(constants)
                } else {
                    AllowOrigin::predicate(move |origin: &HeaderValue, _| {
                        constants.contains(origin) || globs.iter().any(|glob| fast_glob::glob_match(glob, origin))
                    })
                }
            }
        });
    }

    if let Some(max_age) = max_age {
        cors_layer = cors_layer.max_age(*max_age);
    }

    cors_layer
}
