use error_stack::{IntoReport, Report, ResultExt};
use std::str::FromStr;

pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
pub const PORT_VAR: &str = "PORT";
pub const DATABASE_POOL_SIZE_VAR: &str = "DATABASE_POOL_SIZE";
pub const METRICS_ENABLED_VAR: &str = "METRICS_ENABLED";

const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{0} has an invalid value")]
    Invalid(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub pool_size: Option<usize>,
    pub metrics_enabled: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, Report<ConfigError>> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads every setting through `lookup`, so tests don't have to touch the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Report<ConfigError>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup(DATABASE_URL_VAR)
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| ConfigError::Missing(DATABASE_URL_VAR).into_report())?;

        Ok(Self {
            database_url,
            port: parse_or(&lookup, PORT_VAR, DEFAULT_PORT)?,
            pool_size: parse_opt(&lookup, DATABASE_POOL_SIZE_VAR)?,
            metrics_enabled: parse_or(&lookup, METRICS_ENABLED_VAR, true)?,
        })
    }
}

fn parse_opt<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, Report<ConfigError>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .change_context(ConfigError::Invalid(key))
                .attach_with(|| format!("got '{raw}'"))
        })
        .transpose()
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, Report<ConfigError>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    Ok(parse_opt(lookup, key)?.unwrap_or(default))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_database_url_is_set() {
        let config =
            AppConfig::from_lookup(lookup(&[(DATABASE_URL_VAR, "postgresql://localhost/db")]))
                .unwrap();

        assert_eq!(
            AppConfig {
                database_url: "postgresql://localhost/db".to_string(),
                port: 8080,
                pool_size: None,
                metrics_enabled: true,
            },
            config
        );
    }

    #[test]
    fn every_setting_is_read() {
        let config = AppConfig::from_lookup(lookup(&[
            (DATABASE_URL_VAR, "postgresql://db"),
            (PORT_VAR, "9000"),
            (DATABASE_POOL_SIZE_VAR, " 4 "),
            (METRICS_ENABLED_VAR, "false"),
        ]))
        .unwrap();

        assert_eq!(9000, config.port);
        assert_eq!(Some(4), config.pool_size);
        assert!(!config.metrics_enabled);
    }

    #[rstest]
    #[case::unset(&[])]
    #[case::blank(&[(DATABASE_URL_VAR, "  ")])]
    fn database_url_is_required(#[case] vars: &[(&str, &str)]) {
        let err = AppConfig::from_lookup(lookup(vars)).unwrap_err();

        assert_eq!(&ConfigError::Missing(DATABASE_URL_VAR), err.current_context());
    }

    #[rstest]
    #[case::port_not_a_number(PORT_VAR, "eighty")]
    #[case::port_too_big(PORT_VAR, "70000")]
    #[case::negative_pool_size(DATABASE_POOL_SIZE_VAR, "-1")]
    #[case::metrics_not_a_bool(METRICS_ENABLED_VAR, "yes")]
    fn invalid_values_name_the_variable(#[case] key: &'static str, #[case] value: &str) {
        let err =
            AppConfig::from_lookup(lookup(&[(DATABASE_URL_VAR, "postgresql://db"), (key, value)]))
                .unwrap_err();

        assert_eq!(&ConfigError::Invalid(key), err.current_context());
    }
}
