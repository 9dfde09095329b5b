use thiserror::Error;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;
const DATABASE: &str = "vacation_planner";
const TOKEN_TTL_HOURS: i64 = 24;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub mongodb_uri: String,
    pub database_name: String,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    /// Any origin is allowed when unset.
    pub cors_allowed_origin: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| HOST.to_string()),
            port: get("PORT")
                .and_then(|port| port.parse().ok())
                .unwrap_or(PORT),
            mongodb_uri: get("MONGODB_URI").ok_or(ConfigError::Missing("MONGODB_URI"))?,
            database_name: get("MONGODB_DATABASE").unwrap_or_else(|| DATABASE.to_string()),
            jwt_secret: get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?,
            token_ttl_hours: get("TOKEN_TTL_HOURS")
                .and_then(|hours| hours.parse().ok())
                .filter(|hours: &i64| *hours > 0)
                .unwrap_or(TOKEN_TTL_HOURS),
            cors_allowed_origin: get("CORS_ALLOWED_ORIGIN"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_applied() {
        let config = AppConfig::from_lookup(lookup(&[
            ("MONGODB_URI", "mongodb://localhost:27017"),
            ("JWT_SECRET", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.database_name, "vacation_planner");
        assert_eq!(config.token_ttl_hours, 24);
        assert!(config.cors_allowed_origin.is_none());
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let config = AppConfig::from_lookup(lookup(&[
            ("MONGODB_URI", "mongodb://db:27017"),
            ("JWT_SECRET", "secret"),
            ("PORT", "not-a-port"),
            ("TOKEN_TTL_HOURS", "-3"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.token_ttl_hours, 24);
    }

    #[test]
    fn test_missing_required_variables() {
        let err = AppConfig::from_lookup(lookup(&[("JWT_SECRET", "secret")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("MONGODB_URI"));

        let err = AppConfig::from_lookup(lookup(&[
            ("MONGODB_URI", "mongodb://db:27017"),
            ("JWT_SECRET", "  "),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Missing("JWT_SECRET"));
    }
}
