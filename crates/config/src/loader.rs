use std::{fmt::Write, path::Path};

use anyhow::bail;
use indoc::indoc;
use regex::Regex;
use serde::Deserialize;
use toml::Value;

use crate::Config;

/// Matches `{{ env.NAME }}` placeholders in configuration strings.
const ENV_VAR_PATTERN: &str = r"\{\{\s*env\.([A-Za-z_][A-Za-z0-9_]*)\s*\}\}";

/// Configuration paths whose environment variables may be absent.
/// The field is dropped from the configuration instead of failing the load.
const OPTIONAL_ENV_FIELDS: &[&str] = &["llm.google.base_url", "auth.base_url"];

pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Config> {
    let content = std::fs::read_to_string(path.as_ref())?;
    load_from_str(&content)
}

fn load_from_str(content: &str) -> anyhow::Result<Config> {
    let mut raw_config: Value = toml::from_str(content)?;
    let pattern = Regex::new(ENV_VAR_PATTERN).expect("static pattern is valid");

    loop {
        match expand_env_vars(&mut Vec::new(), &mut raw_config, &pattern) {
            Ok(()) => break,
            Err(missing) if OPTIONAL_ENV_FIELDS.contains(&missing.path.as_str()) => {
                remove_field(&mut raw_config, &missing.path);

                log::debug!(
                    "Removed optional field '{}': environment variable {} is not set",
                    missing.path,
                    missing.name
                );
            }
            Err(missing) => {
                bail!(
                    "Environment variable '{}' referenced at '{}' is not set",
                    missing.name,
                    missing.path
                );
            }
        }
    }

    let config = Config::deserialize(raw_config)?;
    validate(&config)?;

    Ok(config)
}

pub(crate) fn validate(config: &Config) -> anyhow::Result<()> {
    if config.llm.enabled() && config.llm.google.api_key.is_none() {
        bail!(indoc! {r#"
            No Google API key configured. Planforge needs a Gemini API key to generate project plans.

            Example configuration:

              [llm.google]
              api_key = "{{ env.GOOGLE_API_KEY }}"
        "#});
    }

    if config.database.url.is_none() {
        bail!(indoc! {r#"
            No database configured. Planforge stores generated plans in Postgres.

            Example configuration:

              [database]
              url = "{{ env.DATABASE_URL }}"
        "#});
    }

    Ok(())
}

struct MissingEnvVar {
    path: String,
    name: String,
}

fn expand_env_vars<'a>(
    path: &mut Vec<Result<&'a str, usize>>,
    value: &'a mut Value,
    pattern: &Regex,
) -> Result<(), MissingEnvVar> {
    match value {
        Value::String(s) => {
            let mut missing = None;

            let replaced = pattern.replace_all(s, |caps: &regex::Captures<'_>| {
                let name = &caps[1];

                match std::env::var(name) {
                    Ok(value) => value,
                    Err(_) => {
                        missing.get_or_insert_with(|| name.to_string());
                        String::new()
                    }
                }
            });

            if let Some(name) = missing {
                return Err(MissingEnvVar {
                    path: render_path(path),
                    name,
                });
            }

            let replaced = replaced.into_owned();
            *s = replaced;
        }
        Value::Array(values) => {
            for (i, value) in values.iter_mut().enumerate() {
                path.push(Err(i));
                expand_env_vars(path, value, pattern)?;
                path.pop();
            }
        }
        Value::Table(map) => {
            for (key, value) in map {
                path.push(Ok(key.as_str()));
                expand_env_vars(path, value, pattern)?;
                path.pop();
            }
        }
        Value::Integer(_) | Value::Float(_) | Value::Boolean(_) | Value::Datetime(_) => (),
    }

    Ok(())
}

fn render_path(path: &[Result<&str, usize>]) -> String {
    let mut rendered = String::new();

    for segment in path {
        match segment {
            Ok(key) => {
                if !rendered.is_empty() {
                    rendered.push('.');
                }
                rendered.push_str(key);
            }
            Err(i) => write!(rendered, "[{i}]").expect("writing to a string never fails"),
        }
    }

    rendered
}

fn remove_field(config: &mut Value, path: &str) {
    let parts: Vec<&str> = path.split('.').collect();

    let Some((last, parents)) = parts.split_last() else {
        return;
    };

    let mut current = config;

    for part in parents {
        let Some(next) = current.as_table_mut().and_then(|table| table.get_mut(*part)) else {
            return;
        };

        current = next;
    }

    if let Some(table) = current.as_table_mut() {
        table.remove(*last);
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use insta::assert_snapshot;

    use super::load_from_str;

    #[test]
    fn missing_api_key_fails_validation() {
        let config_str = indoc! {r#"
            [database]
            url = "postgres://localhost/planforge"
        "#};

        let error = load_from_str(config_str).unwrap_err().to_string();

        assert_snapshot!(error, @r#"
        No Google API key configured. Planforge needs a Gemini API key to generate project plans.

        Example configuration:

          [llm.google]
          api_key = "{{ env.GOOGLE_API_KEY }}"
        "#);
    }

    #[test]
    fn missing_database_url_fails_validation() {
        let config_str = indoc! {r#"
            [llm.google]
            api_key = "test-key"
        "#};

        let error = load_from_str(config_str).unwrap_err().to_string();

        assert_snapshot!(error, @r#"
        No database configured. Planforge stores generated plans in Postgres.

        Example configuration:

          [database]
          url = "{{ env.DATABASE_URL }}"
        "#);
    }

    #[test]
    fn disabled_llm_does_not_require_api_key() {
        let config_str = indoc! {r#"
            [llm]
            enabled = false

            [database]
            url = "postgres://localhost/planforge"
        "#};

        let config = load_from_str(config_str).unwrap();
        assert!(!config.llm.enabled());
    }

    #[test]
    fn env_vars_are_expanded() {
        // Unique name so parallel tests cannot observe a partial state.
        unsafe { std::env::set_var("PLANFORGE_TEST_API_KEY", "expanded-key") };

        let config_str = indoc! {r#"
            [llm.google]
            api_key = "{{ env.PLANFORGE_TEST_API_KEY }}"

            [database]
            url = "postgres://localhost/planforge"
        "#};

        let config = load_from_str(config_str).unwrap();

        use secrecy::ExposeSecret;
        let api_key = config.llm.google.api_key.unwrap();
        assert_eq!(api_key.expose_secret(), "expanded-key");
    }

    #[test]
    fn missing_required_env_var_fails() {
        let config_str = indoc! {r#"
            [llm.google]
            api_key = "{{ env.PLANFORGE_TEST_KEY_THAT_DOES_NOT_EXIST }}"

            [database]
            url = "postgres://localhost/planforge"
        "#};

        let error = load_from_str(config_str).unwrap_err().to_string();

        assert_snapshot!(error, @"Environment variable 'PLANFORGE_TEST_KEY_THAT_DOES_NOT_EXIST' referenced at 'llm.google.api_key' is not set");
    }

    #[test]
    fn missing_optional_env_var_drops_the_field() {
        let config_str = indoc! {r#"
            [llm.google]
            api_key = "test-key"
            base_url = "{{ env.PLANFORGE_TEST_BASE_URL_THAT_DOES_NOT_EXIST }}"

            [database]
            url = "postgres://localhost/planforge"
        "#};

        let config = load_from_str(config_str).unwrap();

        assert!(config.llm.google.base_url.is_none());
    }
}
