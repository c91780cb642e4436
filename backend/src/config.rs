use std::env;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("invalid value `{value}` for {key}: {reason}")]
pub struct ConfigError {
    key: &'static str,
    value: String,
    reason: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Where templates and `templates_index.json` are stored.
    pub templates_dir: PathBuf,
    /// Upper bound for a multipart request, in megabytes.
    pub max_upload_mb: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            host: env::var("DOCFACTORY_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parsed("DOCFACTORY_PORT", "8080")?,
            templates_dir: env::var("DOCFACTORY_TEMPLATES_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("templates")),
            max_upload_mb: parsed("DOCFACTORY_MAX_UPLOAD_MB", "25")?,
        })
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb * 1024 * 1024
    }
}

fn parsed<T>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    value.trim().parse().map_err(|e: T::Err| ConfigError {
        key,
        reason: e.to_string(),
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_parse() {
        let port: u16 = parsed("DOCFACTORY_TEST_UNSET_PORT", "8080").unwrap();
        assert_eq!(port, 8080);
    }

    #[test]
    fn bad_number_names_the_key() {
        let err = parsed::<u16>("DOCFACTORY_TEST_UNSET_PORT", "eighty").unwrap_err();
        assert!(err.to_string().contains("DOCFACTORY_TEST_UNSET_PORT"));
        assert!(err.to_string().contains("eighty"));
    }

    #[test]
    fn upload_limit_in_bytes() {
        let config = AppConfig {
            host: "127.0.0.1".into(),
            port: 8080,
            templates_dir: PathBuf::from("templates"),
            max_upload_mb: 2,
        };
        assert_eq!(config.max_upload_bytes(), 2 * 1024 * 1024);
    }
}
