use std::{env, io::Write, time::Duration as StdDuration};

use chrono::Duration;
use digiflazz_tools::DigiflazzConfig;
use log::*;
use rand::{distributions::Alphanumeric, thread_rng, Rng};
use tempfile::NamedTempFile;
use topup_common::{parse_boolean_flag, Secret};

use crate::errors::ServerError;

const DEFAULT_TOPUP_HOST: &str = "127.0.0.1";
const DEFAULT_TOPUP_PORT: u16 = 8360;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/topup_store.db";
const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_BCRYPT_COST: u32 = 12;
const DEFAULT_RECONCILE_INTERVAL: StdDuration = StdDuration::from_secs(30);
const DEFAULT_RECONCILE_BATCH: u32 = 50;
const DEFAULT_JWT_EXPIRY_HOURS: i64 = 24;
const RANDOM_SECRET_LEN: usize = 64;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub auth: AuthConfig,
    pub admin: AdminConfig,
    /// Where and how to reach the vendor and the nickname service.
    pub vendor: DigiflazzConfig,
    pub reconciliation: ReconciliationConfig,
    /// The bcrypt cost for merchant passwords and PINs created through the admin API.
    pub bcrypt_cost: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_TOPUP_HOST.to_string(),
            port: DEFAULT_TOPUP_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            auth: AuthConfig::default(),
            admin: AdminConfig::default(),
            vendor: DigiflazzConfig::default(),
            reconciliation: ReconciliationConfig::default(),
            bcrypt_cost: DEFAULT_BCRYPT_COST,
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("TOPUP_HOST").ok().unwrap_or_else(|| DEFAULT_TOPUP_HOST.into());
        let port = env::var("TOPUP_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for TOPUP_PORT. {e} Using the default, {DEFAULT_TOPUP_PORT}, \
                         instead."
                    );
                    DEFAULT_TOPUP_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_TOPUP_PORT);
        let database_url = env::var("TOPUP_DATABASE_URL").ok().unwrap_or_else(|| {
            info!("🪛️ TOPUP_DATABASE_URL is not set. Using {DEFAULT_DATABASE_URL}");
            DEFAULT_DATABASE_URL.to_string()
        });
        let auth = AuthConfig::try_from_env().unwrap_or_else(|e| {
            warn!(
                "🪛️ Could not load the authentication configuration from environment variables. {e}. Reverting to the \
                 default configuration."
            );
            AuthConfig::default()
        });
        let bcrypt_cost = match parse_env("TOPUP_BCRYPT_COST", DEFAULT_BCRYPT_COST) {
            cost @ 4..=31 => cost,
            cost => {
                warn!("🪛️ TOPUP_BCRYPT_COST must be between 4 and 31, not {cost}. Using {DEFAULT_BCRYPT_COST}.");
                DEFAULT_BCRYPT_COST
            },
        };
        Self {
            host,
            port,
            database_url,
            auth,
            admin: AdminConfig::from_env(),
            vendor: DigiflazzConfig::new_from_env_or_default(),
            reconciliation: ReconciliationConfig::from_env(),
            bcrypt_cost,
        }
    }
}

/// Reads a numeric environment variable, warning and falling back to `default` if it is not valid.
fn parse_env<T>(name: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display + Copy,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(s) => s.trim().parse::<T>().unwrap_or_else(|e| {
            warn!("🪛️ Invalid configuration value for {name}: {s}. {e}. Using the default, {default}.");
            default
        }),
        Err(_) => {
            debug!("🪛️ {name} is not set. Using the default value of {default}.");
            default
        },
    }
}

//-------------------------------------------------  AdminConfig  ------------------------------------------------------
#[derive(Clone, Debug, Default)]
pub struct AdminConfig {
    pub username: String,
    /// If `None`, nobody can log in as admin.
    pub password: Option<Secret<String>>,
}

impl AdminConfig {
    pub fn new(username: &str, password: &str) -> Self {
        Self { username: username.to_string(), password: Some(Secret::new(password.to_string())) }
    }

    pub fn from_env() -> Self {
        let username = env::var("TOPUP_ADMIN_USERNAME").ok().unwrap_or_else(|| DEFAULT_ADMIN_USERNAME.to_string());
        let password = env::var("TOPUP_ADMIN_PASSWORD").ok().filter(|p| !p.is_empty()).map(Secret::new);
        if password.is_none() {
            warn!("🪛️ TOPUP_ADMIN_PASSWORD is not set. Admin login is disabled for this session.");
        }
        Self { username, password }
    }
}

//---------------------------------------------  ReconciliationConfig  -------------------------------------------------
#[derive(Clone, Copy, Debug)]
pub struct ReconciliationConfig {
    pub enabled: bool,
    pub interval: StdDuration,
    pub batch_size: u32,
}

impl Default for ReconciliationConfig {
    fn default() -> Self {
        Self { enabled: true, interval: DEFAULT_RECONCILE_INTERVAL, batch_size: DEFAULT_RECONCILE_BATCH }
    }
}

impl ReconciliationConfig {
    pub fn from_env() -> Self {
        let enabled = !parse_boolean_flag(env::var("TOPUP_DISABLE_RECONCILIATION").ok(), false);
        let seconds = parse_env("TOPUP_RECONCILE_INTERVAL", DEFAULT_RECONCILE_INTERVAL.as_secs()).max(1);
        let batch_size = parse_env("TOPUP_RECONCILE_BATCH", DEFAULT_RECONCILE_BATCH).max(1);
        if !enabled {
            warn!("🪛️ Reconciliation of pending orders is disabled. Pending orders will only move on a status check.");
        }
        Self { enabled, interval: StdDuration::from_secs(seconds), batch_size }
    }
}

//-------------------------------------------------  AuthConfig  -------------------------------------------------------
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// The HMAC key used to sign and verify access tokens.
    pub jwt_secret: Secret<String>,
    pub token_expiry: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        let mut tmpfile = NamedTempFile::new().ok().and_then(|f| f.keep().ok());
        warn!(
            "🚨️🚨️🚨️ The JWT signing secret has not been set. I'm using a random value for this session. DO NOT operate \
             on production like this since every access token becomes invalid when the server restarts. 🚨️🚨️🚨️"
        );
        let secret = thread_rng().sample_iter(&Alphanumeric).take(RANDOM_SECRET_LEN).map(char::from).collect::<String>();
        match &mut tmpfile {
            Some((f, p)) => match writeln!(f, "TOPUP_JWT_SECRET={secret}") {
                Ok(()) => warn!(
                    "🚨️🚨️🚨️ The JWT signing secret for this session was written to {}. If this is a production \
                     instance, you are doing it wrong! Set the TOPUP_JWT_SECRET environment variable instead. 🚨️🚨️🚨️",
                    p.display()
                ),
                Err(e) => warn!("🪛️ Could not write the JWT signing secret to the temporary file. {e}"),
            },
            None => {
                warn!("🪛️ Could not create a temporary file to store the JWT signing secret.");
            },
        }
        Self { jwt_secret: Secret::new(secret), token_expiry: Duration::hours(DEFAULT_JWT_EXPIRY_HOURS) }
    }
}

impl AuthConfig {
    pub fn new(secret: &str, token_expiry: Duration) -> Self {
        Self { jwt_secret: Secret::new(secret.to_string()), token_expiry }
    }

    pub fn try_from_env() -> Result<Self, ServerError> {
        let secret = env::var("TOPUP_JWT_SECRET")
            .map_err(|e| ServerError::ConfigurationError(format!("{e} [TOPUP_JWT_SECRET]")))?;
        if secret.len() < 32 {
            return Err(ServerError::ConfigurationError(
                "TOPUP_JWT_SECRET must be at least 32 characters long".to_string(),
            ));
        }
        let hours = parse_env("TOPUP_JWT_EXPIRY", DEFAULT_JWT_EXPIRY_HOURS).max(1);
        Ok(Self::new(&secret, Duration::hours(hours)))
    }
}
