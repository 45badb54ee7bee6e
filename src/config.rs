//! Runtime settings.
//!
//! There is no config file.  The feed URL may be given as the first
//! command-line argument.  The environment can point `QUAKEFEED_LOG` at a
//! log file and override the network limits:
//!
//! | Variable | Meaning |
//! |---|---|
//! | `QUAKEFEED_CONNECT_TIMEOUT_MS` | connect deadline |
//! | `QUAKEFEED_READ_TIMEOUT_MS` | longest wait for response data |
//! | `QUAKEFEED_MAX_BODY_BYTES` | largest accepted body |

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::source::{CONNECT_TIMEOUT, MAX_BODY_SIZE, READ_TIMEOUT};

/// USGS query used when no URL is given.
pub const DEFAULT_FEED_URL: &str =
    "https://earthquake.usgs.gov/fdsnws/event/1/query?format=geojson&starttime=2014-01-01&endtime=2014-01-02";

/// Environment variable naming the log file.
pub const LOG_FILE_ENV: &str = "QUAKEFEED_LOG";
pub const CONNECT_TIMEOUT_ENV: &str = "QUAKEFEED_CONNECT_TIMEOUT_MS";
pub const READ_TIMEOUT_ENV: &str = "QUAKEFEED_READ_TIMEOUT_MS";
pub const MAX_BODY_ENV: &str = "QUAKEFEED_MAX_BODY_BYTES";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// An override was set but is not a positive integer.
    #[error("{key} must be a positive integer, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// GeoJSON feed to load.
    pub feed_url: String,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    /// Largest response body accepted, in bytes.
    pub max_body_size: usize,
    /// Where to write tracing output; `None` disables logging.
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            connect_timeout: CONNECT_TIMEOUT,
            read_timeout: READ_TIMEOUT,
            max_body_size: MAX_BODY_SIZE,
            log_file: None,
        }
    }
}

impl Config {
    /// Build from the process arguments and environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_sources(std::env::args().skip(1), |key| std::env::var(key).ok())
    }

    /// Build from explicit sources.  `args` excludes the program name.
    pub fn from_sources<I, E>(args: I, env: E) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
        E: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = args.into_iter().next() {
            config.feed_url = url;
        }
        config.log_file = env(LOG_FILE_ENV)
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);

        if let Some(ms) = positive_number(&env, CONNECT_TIMEOUT_ENV)? {
            config.connect_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = positive_number(&env, READ_TIMEOUT_ENV)? {
            config.read_timeout = Duration::from_millis(ms);
        }
        if let Some(bytes) = positive_number(&env, MAX_BODY_ENV)? {
            config.max_body_size = usize::try_from(bytes).unwrap_or(usize::MAX);
        }

        Ok(config)
    }
}

/// Read `key` as a positive integer.  Unset or empty means no override.
fn positive_number<E>(env: &E, key: &'static str) -> Result<Option<u64>, ConfigError>
where
    E: Fn(&str) -> Option<String>,
{
    let Some(raw) = env(key).filter(|v| !v.trim().is_empty()) else {
        return Ok(None);
    };
    match raw.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(Some(n)),
        _ => Err(ConfigError::InvalidNumber { key, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_without_arguments() {
        let config = Config::from_sources(Vec::new(), no_env).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.connect_timeout, Duration::from_millis(1500));
        assert_eq!(config.read_timeout, Duration::from_millis(1000));
    }

    #[test]
    fn first_argument_is_feed_url() {
        let args = vec!["https://example.com/q".to_string(), "ignored".to_string()];
        let config = Config::from_sources(args, no_env).unwrap();
        assert_eq!(config.feed_url, "https://example.com/q");
    }

    #[test]
    fn log_file_from_environment() {
        let config = Config::from_sources(Vec::new(), |key| {
            (key == LOG_FILE_ENV).then(|| "/tmp/quakefeed.log".to_string())
        })
        .unwrap();
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/quakefeed.log")));
    }

    #[test]
    fn empty_log_path_disables_logging() {
        let config = Config::from_sources(Vec::new(), |_| Some(String::new())).unwrap();
        assert!(config.log_file.is_none());
        assert_eq!(config.read_timeout, READ_TIMEOUT);
    }

    fn env_from(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn network_limits_from_environment() {
        let env = env_from(&[
            (CONNECT_TIMEOUT_ENV, "250"),
            (READ_TIMEOUT_ENV, " 4000 "),
            (MAX_BODY_ENV, "1048576"),
        ]);
        let config = Config::from_sources(Vec::new(), env).unwrap();

        assert_eq!(config.connect_timeout, Duration::from_millis(250));
        assert_eq!(config.read_timeout, Duration::from_millis(4000));
        assert_eq!(config.max_body_size, 1_048_576);
    }

    #[test]
    fn non_numeric_override_is_rejected() {
        let env = env_from(&[(READ_TIMEOUT_ENV, "soon")]);
        let err = Config::from_sources(Vec::new(), env).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidNumber {
                key: READ_TIMEOUT_ENV,
                value: "soon".into()
            }
        );
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let env = env_from(&[(CONNECT_TIMEOUT_ENV, "0")]);
        let err = Config::from_sources(Vec::new(), env).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { key: CONNECT_TIMEOUT_ENV, .. }));
    }
}
