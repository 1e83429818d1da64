use crate::core::state::DEFAULT_PREVIEW_LIMIT;
use crate::infra::placeholder::DEFAULT_BASE_URL;
use thiserror::Error;

const DEFAULT_DATABASE_PATH: &str = "data/mypics.db";
const DEFAULT_PORT: u16 = 3001;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set when DATABASE_MODE=turso")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseTarget {
    Local { path: String },
    Turso { url: String, token: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database: DatabaseTarget,
    pub port: u16,
    pub photos_api_url: String,
    pub preview_limit: usize,
}

impl Config {
    /// Reads the process environment (after `.env` has been loaded).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database = match get("DATABASE_MODE").as_deref().unwrap_or("local") {
            "turso" => DatabaseTarget::Turso {
                url: get("TURSO_DATABASE_URL").ok_or(ConfigError::Missing("TURSO_DATABASE_URL"))?,
                token: get("TURSO_AUTH_TOKEN").ok_or(ConfigError::Missing("TURSO_AUTH_TOKEN"))?,
            },
            "local" => DatabaseTarget::Local {
                path: get("DATABASE_PATH").unwrap_or_else(|| DEFAULT_DATABASE_PATH.into()),
            },
            other => {
                return Err(ConfigError::Invalid {
                    key: "DATABASE_MODE",
                    value: other.to_string(),
                });
            }
        };

        Ok(Self {
            database,
            port: parse_or(&get, "PORT", DEFAULT_PORT)?,
            photos_api_url: get("PHOTOS_API_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into()),
            preview_limit: parse_or(&get, "PREVIEW_LIMIT", DEFAULT_PREVIEW_LIMIT)?,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match get(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(
            cfg.database,
            DatabaseTarget::Local {
                path: "data/mypics.db".into()
            }
        );
        assert_eq!(cfg.port, 3001);
        assert_eq!(cfg.preview_limit, 3);
        assert_eq!(cfg.photos_api_url, "https://jsonplaceholder.typicode.com");
    }

    #[test]
    fn test_turso_requires_credentials() {
        let err = config(&[("DATABASE_MODE", "turso"), ("TURSO_DATABASE_URL", "libsql://x")]);
        assert_eq!(err, Err(ConfigError::Missing("TURSO_AUTH_TOKEN")));

        let cfg = config(&[
            ("DATABASE_MODE", "turso"),
            ("TURSO_DATABASE_URL", "libsql://x"),
            ("TURSO_AUTH_TOKEN", "secret"),
        ])
        .unwrap();
        assert!(matches!(cfg.database, DatabaseTarget::Turso { .. }));
    }

    #[test]
    fn test_invalid_numbers_are_errors() {
        assert!(matches!(
            config(&[("PREVIEW_LIMIT", "five")]),
            Err(ConfigError::Invalid { key: "PREVIEW_LIMIT", .. })
        ));
        assert!(matches!(
            config(&[("PORT", "99999")]),
            Err(ConfigError::Invalid { key: "PORT", .. })
        ));
        assert_eq!(config(&[("PREVIEW_LIMIT", " 5 ")]).unwrap().preview_limit, 5);
    }

    #[test]
    fn test_unknown_database_mode() {
        assert!(matches!(
            config(&[("DATABASE_MODE", "postgres")]),
            Err(ConfigError::Invalid { key: "DATABASE_MODE", .. })
        ));
    }
}
