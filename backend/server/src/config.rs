use std::{env, fmt::Display, str::FromStr, time::Duration};

use tracing::{info, warn};

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub process_delay: u64,
    pub counter_interval: Duration,
    pub answer_backlog: usize,
    pub dist_dir: String,
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        Ok(Self {
            port: try_load("RUST_PORT", "1313")?,
            process_delay: try_load("PROCESS_DELAY_SECS", "2")?,
            counter_interval: Duration::from_millis(try_load("COUNTER_INTERVAL_MS", "1000")?),
            answer_backlog: try_load::<usize>("ANSWER_BACKLOG", "16")?.max(1),
            dist_dir: try_load("DIST_DIR", "dist")?,
        })
    }

    /// How long a `/processed` stream waits for an answer before giving up.
    pub fn answer_timeout(&self) -> Duration {
        Duration::from_secs(self.process_delay + 1)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 1313,
            process_delay: 2,
            counter_interval: Duration::from_secs(1),
            answer_backlog: 16,
            dist_dir: "dist".to_string(),
        }
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T, AppError>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    parse(key, &raw)
}

fn parse<T: FromStr>(key: &str, raw: &str) -> Result<T, AppError>
where
    T::Err: Display,
{
    raw.trim().parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        AppError::Config {
            key: key.to_string(),
            reason: e.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert_eq!(parse::<u16>("RUST_PORT", "8080").unwrap(), 8080);
        assert_eq!(parse::<u64>("PROCESS_DELAY_SECS", " 3 ").unwrap(), 3);
    }

    #[test]
    fn test_parse_invalid() {
        let err = parse::<u16>("RUST_PORT", "eighty").unwrap_err();
        assert!(matches!(err, AppError::Config { ref key, .. } if key == "RUST_PORT"));

        assert!(parse::<u16>("RUST_PORT", "70000").is_err());
    }

    #[test]
    fn test_unset_key_uses_default() {
        let key = "ANSWER_SERVER_TEST_UNSET_KEY";
        assert!(env::var(key).is_err());

        assert_eq!(try_load::<u16>(key, "1313").unwrap(), 1313);
        assert_eq!(try_load::<String>(key, "dist").unwrap(), "dist");
        assert!(try_load::<u64>(key, "two").is_err());
    }

    #[test]
    fn test_answer_timeout() {
        let config = Config {
            process_delay: 2,
            ..Config::default()
        };

        assert_eq!(config.answer_timeout(), Duration::from_secs(3));
    }
}
