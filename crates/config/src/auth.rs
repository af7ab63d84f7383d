//! Auth service configuration.

use serde::Deserialize;
use url::Url;

/// The auth service used for local development when no base URL is configured.
const DEFAULT_AUTH_BASE_URL: &str = "http://localhost:3000/";

/// Configuration for the external auth service.
///
/// Sessions are resolved by forwarding request credentials to this service.
/// Production deployments set `base_url` to the public application URL,
/// typically through `{{ env.APP_URL }}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    /// Base URL of the auth service.
    pub base_url: Option<Url>,
}

impl AuthConfig {
    /// The effective base URL, falling back to the local development default.
    pub fn base_url(&self) -> Url {
        self.base_url
            .clone()
            .unwrap_or_else(|| Url::parse(DEFAULT_AUTH_BASE_URL).expect("static URL is valid"))
    }
}
