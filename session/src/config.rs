use std::time::Duration;

use crate::error::{Result, StoreError};

/// Default period between expiry sweeps.
pub const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Longest accepted timeout or sweep period (one year). Larger values would
/// overflow the deadline arithmetic in the pool and the ticker.
pub const MAX_DURATION: Duration = Duration::from_secs(365 * 24 * 60 * 60);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    /// SQLite connection string, e.g. `sqlite://sessions.db`.
    pub database_url: String,

    /// Upper bound on pooled connections shared by callers and the sweep.
    pub max_connections: u32,

    /// How long an operation waits for a free connection before failing.
    ///
    /// Store operations take no timeout of their own; this is the only bound
    /// on how long a caller can be stuck behind an exhausted pool.
    pub acquire_timeout: Duration,

    /// Period of the background expiry sweep. `Duration::ZERO` disables it,
    /// in which case expired rows stay on disk (but remain invisible).
    pub cleanup_interval: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://sessions.db".to_string(),
            max_connections: 8,
            acquire_timeout: Duration::from_secs(30),
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL,
        }
    }
}

impl StoreConfig {
    /// Reads `SESSION_*` environment variables, falling back to defaults for
    /// anything unset.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`StoreConfig::from_env`] with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let database_url = lookup("SESSION_DATABASE_URL").unwrap_or(defaults.database_url);

        let max_connections = match lookup("SESSION_MAX_CONNECTIONS") {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(StoreError::Config {
                        key: "SESSION_MAX_CONNECTIONS",
                        value: raw,
                    });
                }
            },
            None => defaults.max_connections,
        };

        let acquire_timeout = parse_secs(&lookup, "SESSION_ACQUIRE_TIMEOUT_SECS")?
            .unwrap_or(defaults.acquire_timeout);

        let cleanup_interval = parse_secs(&lookup, "SESSION_CLEANUP_INTERVAL_SECS")?
            .unwrap_or(defaults.cleanup_interval);

        let cfg = Self {
            database_url,
            max_connections,
            acquire_timeout,
            cleanup_interval,
        };
        cfg.validate()?;

        Ok(cfg)
    }

    /// Checks values that would otherwise only fail (or panic) once the pool
    /// and sweep are running. Also applied to hand-built configs by
    /// `SqliteStore::from_config`.
    pub fn validate(&self) -> Result<()> {
        if self.max_connections == 0 {
            return Err(StoreError::Config {
                key: "max_connections",
                value: "0".to_string(),
            });
        }

        for (key, d) in [
            ("acquire_timeout", self.acquire_timeout),
            ("cleanup_interval", self.cleanup_interval),
        ] {
            if d > MAX_DURATION {
                return Err(StoreError::Config {
                    key,
                    value: format!("{}s", d.as_secs()),
                });
            }
        }

        Ok(())
    }
}

fn parse_secs<F>(lookup: &F, key: &'static str) -> Result<Option<Duration>>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };

    match raw.trim().parse::<u64>() {
        Ok(secs) if secs <= MAX_DURATION.as_secs() => Ok(Some(Duration::from_secs(secs))),
        _ => Err(StoreError::Config { key, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let cfg = StoreConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(cfg, StoreConfig::default());
        assert_eq!(cfg.cleanup_interval, Duration::from_secs(300));
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = StoreConfig::from_lookup(lookup_from(&[
            ("SESSION_DATABASE_URL", "sqlite::memory:"),
            ("SESSION_MAX_CONNECTIONS", "2"),
            ("SESSION_ACQUIRE_TIMEOUT_SECS", "3"),
            ("SESSION_CLEANUP_INTERVAL_SECS", " 60 "),
        ]))
        .unwrap();

        assert_eq!(cfg.database_url, "sqlite::memory:");
        assert_eq!(cfg.max_connections, 2);
        assert_eq!(cfg.acquire_timeout, Duration::from_secs(3));
        assert_eq!(cfg.cleanup_interval, Duration::from_secs(60));
    }

    #[test]
    fn zero_interval_is_accepted_and_disables_cleanup() {
        let cfg =
            StoreConfig::from_lookup(lookup_from(&[("SESSION_CLEANUP_INTERVAL_SECS", "0")]))
                .unwrap();
        assert!(cfg.cleanup_interval.is_zero());
    }

    #[test]
    fn garbage_values_are_rejected() {
        let err = StoreConfig::from_lookup(lookup_from(&[("SESSION_CLEANUP_INTERVAL_SECS", "5m")]))
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Config {
                key: "SESSION_CLEANUP_INTERVAL_SECS",
                ..
            }
        ));

        let err = StoreConfig::from_lookup(lookup_from(&[("SESSION_MAX_CONNECTIONS", "0")]))
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Config {
                key: "SESSION_MAX_CONNECTIONS",
                ..
            }
        ));
    }

    #[test]
    fn oversized_durations_are_rejected() {
        let huge = u64::MAX.to_string();

        let err = StoreConfig::from_lookup(lookup_from(&[(
            "SESSION_ACQUIRE_TIMEOUT_SECS",
            huge.as_str(),
        )]))
        .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Config {
                key: "SESSION_ACQUIRE_TIMEOUT_SECS",
                ..
            }
        ));

        let err = StoreConfig::from_lookup(lookup_from(&[(
            "SESSION_CLEANUP_INTERVAL_SECS",
            huge.as_str(),
        )]))
        .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Config {
                key: "SESSION_CLEANUP_INTERVAL_SECS",
                ..
            }
        ));

        // Exactly at the cap is still fine.
        let at_cap = MAX_DURATION.as_secs().to_string();
        let cfg = StoreConfig::from_lookup(lookup_from(&[(
            "SESSION_CLEANUP_INTERVAL_SECS",
            at_cap.as_str(),
        )]))
        .unwrap();
        assert_eq!(cfg.cleanup_interval, MAX_DURATION);
    }

    #[test]
    fn validate_catches_hand_built_configs() {
        let cfg = StoreConfig {
            acquire_timeout: Duration::from_secs(u64::MAX),
            ..StoreConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(StoreError::Config {
                key: "acquire_timeout",
                ..
            })
        ));

        let cfg = StoreConfig {
            max_connections: 0,
            ..StoreConfig::default()
        };
        assert!(cfg.validate().is_err());

        assert!(StoreConfig::default().validate().is_ok());
    }
}
