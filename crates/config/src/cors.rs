//! Configuration for CORS (Cross-Origin Resource Sharing).

use std::time::Duration;

use duration_str::deserialize_option_duration;
use serde::Deserialize;
use url::Url;

/// Configuration for CORS (Cross-Origin Resource Sharing).
#[derive(Clone, Default, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorsConfig {
    /// If false (or not defined), credentials are not allowed in requests.
    pub allow_credentials: bool,
    /// Origins from which we allow requests.
    pub allow_origins: Option<AnyOrUrlArray>,
    /// Maximum time between OPTIONS and the next request.
    #[serde(deserialize_with = "deserialize_option_duration")]
    pub max_age: Option<Duration>,
    /// Headers allowed in incoming requests.
    pub allow_headers: Option<Vec<String>>,
    /// Headers exposed to the browser.
    pub expose_headers: Option<Vec<String>>,
}

/// An origin list that is either the wildcard `"*"` or explicit URLs.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyOrUrlArray {
    /// Any origin is allowed.
    Any,
    /// Only the listed origins are allowed.
    Explicit(Vec<Url>),
}

impl<'de> Deserialize<'de> for AnyOrUrlArray {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct AnyOrUrlArrayVisitor;

        impl<'de> serde::de::Visitor<'de> for AnyOrUrlArrayVisitor {
            type Value = AnyOrUrlArray;

            fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                formatter.write_str("expecting string \"*\", or an array of origin URLs")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                if value == "*" {
                    Ok(AnyOrUrlArray::Any)
                } else {
                    value
                        .parse::<Url>()
                        .map_err(E::custom)
                        .map(|url| AnyOrUrlArray::Explicit(vec![url]))
                }
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let mut array = Vec::new();

                while let Some(value) = seq.next_element()? {
                    array.push(value);
                }

                Ok(AnyOrUrlArray::Explicit(array))
            }
        }

        deserializer.deserialize_any(AnyOrUrlArrayVisitor)
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use crate::{AnyOrUrlArray, Config};

    #[test]
    fn cors_any_origin() {
        let config_str = indoc! {r#"
            [server.cors]
            allow_origins = "*"
            allow_credentials = true
        "#};

        let config: Config = toml::from_str(config_str).unwrap();
        let cors = config.server.cors.unwrap();

        assert_eq!(cors.allow_origins, Some(AnyOrUrlArray::Any));
        assert!(cors.allow_credentials);
    }

    #[test]
    fn cors_explicit_origins() {
        let config_str = indoc! {r#"
            [server.cors]
            allow_origins = ["https://app.example.com"]
            max_age = "60s"
        "#};

        let config: Config = toml::from_str(config_str).unwrap();
        let cors = config.server.cors.unwrap();

        let AnyOrUrlArray::Explicit(origins) = cors.allow_origins.unwrap() else {
            unreachable!("expected explicit origins");
        };

        assert_eq!(origins.len(), 1);
        assert_eq!(cors.max_age, Some(std::time::Duration::from_secs(60)));
    }

    #[test]
    fn cors_single_origin_as_string() {
        let config_str = indoc! {r#"
            [server.cors]
            allow_origins = "https://app.example.com"
        "#};

        let config: Config = toml::from_str(config_str).unwrap();
        let cors = config.server.cors.unwrap();

        let AnyOrUrlArray::Explicit(origins) = cors.allow_origins.unwrap() else {
            unreachable!("expected explicit origins");
        };

        assert_eq!(origins[0].as_str(), "https://app.example.com/");
    }
}
