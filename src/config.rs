use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "Dosewise";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default API bind address (loopback only).
pub const DEFAULT_BIND: &str = "127.0.0.1:7341";

/// Default reminder tick: once per minute.
pub const DEFAULT_TICK_SECS: u64 = 60;

const DATABASE_FILE: &str = "dosewise.db";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot determine home directory; set DOSEWISE_DATA_DIR")]
    NoHomeDir,
    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
}

/// Get the application data directory
/// ~/Dosewise/ on all platforms
pub fn app_data_dir() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
    Ok(home.join(APP_NAME))
}

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "info,dosewise_lib=debug,tower_http=warn"
}

/// Runtime configuration, read from `DOSEWISE_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub bind: SocketAddr,
    pub tick_interval: Duration,
    /// Seed the starter medication list when the database is empty.
    pub seed_demo: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = match lookup("DOSEWISE_DATA_DIR") {
            Some(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => app_data_dir()?,
        };

        let bind_raw = lookup("DOSEWISE_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_raw.parse().map_err(|_| ConfigError::InvalidValue {
            var: "DOSEWISE_BIND",
            value: bind_raw.clone(),
        })?;

        let tick_secs = match lookup("DOSEWISE_TICK_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        var: "DOSEWISE_TICK_SECS",
                        value: raw,
                    })
                }
            },
            None => DEFAULT_TICK_SECS,
        };

        let seed_demo = match lookup("DOSEWISE_SEED_DEMO").as_deref() {
            None | Some("1") | Some("true") => true,
            Some("0") | Some("false") => false,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    var: "DOSEWISE_SEED_DEMO",
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            data_dir,
            bind,
            tick_interval: Duration::from_secs(tick_secs),
            seed_demo,
        })
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }
}
