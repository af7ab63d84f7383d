use config::{AnyOrUrlArray, CorsConfig};
use http::{HeaderName, HeaderValue};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer, ExposeHeaders};

pub(super) fn generate(config: &CorsConfig) -> CorsLayer {
    let mut cors_layer = CorsLayer::new().allow_credentials(config.allow_credentials);

    if let Some(allow_origins) = &config.allow_origins {
        cors_layer = cors_layer.allow_origin(match allow_origins {
            AnyOrUrlArray::Any => AllowOrigin::any(),
            AnyOrUrlArray::Explicit(origins) => {
                let origins: Vec<_> = origins
                    .iter()
                    .filter_map(|origin| {
                        // Origins are scheme + authority; anything after the
                        // path separator never matches a browser Origin header.
                        let origin = &origin[..url::Position::BeforePath];
                        HeaderValue::from_str(origin).ok()
                    })
                    .collect();

                AllowOrigin::list(origins)
            }
        });
    }

    if let Some(max_age) = config.max_age {
        cors_layer = cors_layer.max_age(max_age);
    }

    if let Some(allow_headers) = &config.allow_headers {
        let headers: Vec<_> = allow_headers
            .iter()
            .filter_map(|header| header.parse::<HeaderName>().ok())
            .collect();

        cors_layer = cors_layer.allow_headers(AllowHeaders::list(headers));
    }

    if let Some(expose_headers) = &config.expose_headers {
        let headers: Vec<_> = expose_headers
            .iter()
            .filter_map(|header| header.parse::<HeaderName>().ok())
            .collect();

        cors_layer = cors_layer.expose_headers(ExposeHeaders::list(headers));
    }

    cors_layer
}
