use base64::engine::general_purpose::STANDARD as b64;
use base64::Engine;
use once_cell::sync::Lazy;
use std::cell::UnsafeCell;
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;
use std::time::Duration;
use zeroize::{Zeroize, Zeroizing};

pub static CONF: Lazy<Config> = Lazy::new(|| Config::from_env().expect("Failed to load config"));

const DB_USERNAME_VAR: &str = "BANK_DB_USERNAME";
const DB_PASSWORD_VAR: &str = "BANK_DB_PASSWORD";
const DB_HOSTNAME_VAR: &str = "BANK_DB_HOSTNAME";
const DB_PORT_VAR: &str = "BANK_DB_PORT";
const DB_NAME_VAR: &str = "BANK_DB_NAME";
const DB_MAX_CONNECTIONS_VAR: &str = "BANK_DB_MAX_CONNECTIONS";
const DB_IDLE_TIMEOUT_SECS_VAR: &str = "BANK_DB_IDLE_TIMEOUT_SECS";

const TOKEN_SIGNING_KEY_VAR: &str = "BANK_TOKEN_SIGNING_KEY_B64";
const HEALTH_ENDPOINT_KEY_VAR: &str = "BANK_HEALTH_ENDPOINT_KEY";

const ACTIX_WORKER_COUNT_VAR: &str = "BANK_ACTIX_WORKER_COUNT";
const LOG_LEVEL_VAR: &str = "BANK_LOG_LEVEL";

const DEFAULT_TRANSFER_CATEGORY_VAR: &str = "BANK_DEFAULT_TRANSFER_CATEGORY";

const TOKEN_SIGNING_KEY_SIZE: usize = 64;

#[derive(Zeroize)]
pub struct ConfigInner {
    pub db_username: String,
    pub db_password: String,
    pub db_hostname: String,
    pub db_port: u16,
    pub db_name: String,
    #[zeroize(skip)]
    pub db_max_connections: u32,
    #[zeroize(skip)]
    pub db_idle_timeout: Duration,

    pub token_signing_key: [u8; TOKEN_SIGNING_KEY_SIZE],
    pub health_endpoint_key: String,

    #[zeroize(skip)]
    pub actix_worker_count: usize,
    #[zeroize(skip)]
    pub log_level: String,

    #[zeroize(skip)]
    pub default_transfer_category: String,
}

impl ConfigInner {
    pub fn database_uri(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.db_username, self.db_password, self.db_hostname, self.db_port, self.db_name,
        )
    }
}

pub struct Config {
    inner: UnsafeCell<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        // Safe as long as `unsafe Config::zeroize()` hasn't been called
        unsafe { &*self.inner.get() }
    }
}

// Safe to be shared across threads as long as `unsafe Config::zeroize()` hasn't been called
unsafe impl Sync for Config {}

impl Config {
    pub fn from_env() -> Result<Config, ConfigError> {
        let token_signing_key =
            decode_signing_key(&Zeroizing::new(env_var::<String>(TOKEN_SIGNING_KEY_VAR)?))?;

        let inner = ConfigInner {
            db_username: env_var(DB_USERNAME_VAR)?,
            db_password: env_var(DB_PASSWORD_VAR)?,
            db_hostname: env_var(DB_HOSTNAME_VAR)?,
            db_port: env_var(DB_PORT_VAR)?,
            db_name: env_var(DB_NAME_VAR)?,
            db_max_connections: env_var_or(DB_MAX_CONNECTIONS_VAR, 48)?,
            db_idle_timeout: Duration::from_secs(env_var_or(DB_IDLE_TIMEOUT_SECS_VAR, 30)?),

            token_signing_key,
            health_endpoint_key: env_var(HEALTH_ENDPOINT_KEY_VAR)?,

            actix_worker_count: env_var_or(ACTIX_WORKER_COUNT_VAR, num_cpus::get())?,
            log_level: env_var_or(LOG_LEVEL_VAR, String::from("info"))?,

            default_transfer_category: env_var_or(
                DEFAULT_TRANSFER_CATEGORY_VAR,
                String::from("Transfer"),
            )?,
        };

        Ok(Config {
            inner: UnsafeCell::new(inner),
        })
    }

    /// # Safety
    ///
    /// Safe only if the Config isn't being used by other threads or across an async
    /// boundary. Generally, this should only be used at the end of the main function once
    /// all threads have been joined.
    pub unsafe fn zeroize(&self) {
        unsafe {
            (*self.inner.get()).zeroize();
        }
    }
}

fn env_var<T: FromStr>(key: &'static str) -> Result<T, ConfigError> {
    let var = std::env::var(key).map_err(|_| ConfigError::missing(key))?;
    let var: T = var.parse().map_err(|_| ConfigError::invalid(key))?;
    Ok(var)
}

/// Falls back to `default` only when the variable is unset. A value that is set but doesn't
/// parse is an error.
fn env_var_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(key) {
        Ok(var) => var.parse().map_err(|_| ConfigError::invalid(key)),
        Err(std::env::VarError::NotPresent) => Ok(default),
        Err(std::env::VarError::NotUnicode(_)) => Err(ConfigError::invalid(key)),
    }
}

fn decode_signing_key(key_b64: &str) -> Result<[u8; TOKEN_SIGNING_KEY_SIZE], ConfigError> {
    let key = Zeroizing::new(
        b64.decode(key_b64.as_bytes())
            .map_err(|_| ConfigError::invalid(TOKEN_SIGNING_KEY_VAR))?,
    );

    key.as_slice()
        .try_into()
        .map_err(|_| ConfigError::invalid(TOKEN_SIGNING_KEY_VAR))
}

#[derive(Clone, Copy, Debug)]
pub enum ConfigError {
    MissingVar(&'static str),
    InvalidVar(&'static str),
}

impl ConfigError {
    fn missing(var_name: &'static str) -> Self {
        Self::MissingVar(var_name)
    }

    fn invalid(var_name: &'static str) -> Self {
        Self::InvalidVar(var_name)
    }
}

impl std::error::Error for ConfigError {}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingVar(key) => write!(f, "Missing environment variable '{}'", key),
            Self::InvalidVar(key) => write!(f, "Environment variable '{}' is invalid", key),
        }
    }
}

#[cfg(test)]
pub mod testing {
    use bank_common::db::{create_db_thread_pool, DbThreadPool};

    use super::*;

    pub static DB_THREAD_POOL: Lazy<DbThreadPool> = Lazy::new(|| {
        create_db_thread_pool(
            &CONF.database_uri(),
            CONF.db_max_connections,
            CONF.db_idle_timeout,
        )
    });
}
