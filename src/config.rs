use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use crate::models::coupon::CouponMode;
use crate::models::registration::Origin;

/// Survey auto-redirect delay bounds, in seconds.
pub const MIN_REDIRECT_DELAY_SECS: u64 = 2;
pub const MAX_REDIRECT_DELAY_SECS: u64 = 3;

/// Which `DataStore` adapter backs the running service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "pg" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!("unknown store backend '{other}'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app_name: String,
    pub bind_addr: String,
    pub database_url: String,
    pub store_backend: StoreBackend,
    pub session_key: Option<String>,
    /// Keep the pending registration across browser restarts (static-hosting style).
    pub session_persistent: bool,
    pub session_ttl_hours: i64,
    pub origin: Origin,
    pub remote_timeout: Duration,
    pub redirect_delay_secs: u64,
    pub coupon_mode: CouponMode,
    /// Number of coupons to generate at startup when the pool has none left. 0 disables.
    pub seed_coupons: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: "Ticket Survey".to_string(),
            bind_addr: "127.0.0.1:8080".to_string(),
            database_url: "postgres://localhost/ticket_survey".to_string(),
            store_backend: StoreBackend::Postgres,
            session_key: None,
            session_persistent: false,
            session_ttl_hours: 24,
            origin: Origin::Local,
            remote_timeout: Duration::from_millis(5000),
            redirect_delay_secs: MIN_REDIRECT_DELAY_SECS,
            coupon_mode: CouponMode::Transactional,
            seed_coupons: 0,
        }
    }
}

impl AppConfig {
    /// Build the configuration from environment variables, falling back to defaults
    /// (with a warning) for anything missing or malformed.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let redirect_delay_secs: u64 = try_load("REDIRECT_DELAY_SECS", defaults.redirect_delay_secs);

        Self {
            app_name: env::var("APP_NAME").unwrap_or(defaults.app_name),
            bind_addr: env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| {
                log::info!("DATABASE_URL not set, using default: {}", defaults.database_url);
                defaults.database_url
            }),
            store_backend: try_load("STORE_BACKEND", defaults.store_backend),
            session_key: env::var("SESSION_KEY").ok(),
            session_persistent: try_load("SESSION_PERSISTENT", defaults.session_persistent),
            session_ttl_hours: try_load("SESSION_TTL_HOURS", defaults.session_ttl_hours).max(1),
            origin: try_load("DEPLOY_ORIGIN", defaults.origin),
            remote_timeout: Duration::from_millis(try_load("REMOTE_TIMEOUT_MS", 5000u64).max(1)),
            redirect_delay_secs: clamp_redirect_delay(redirect_delay_secs),
            coupon_mode: try_load("COUPON_MODE", defaults.coupon_mode),
            seed_coupons: try_load("SEED_COUPONS", defaults.seed_coupons),
        }
    }
}

fn clamp_redirect_delay(secs: u64) -> u64 {
    let clamped = secs.clamp(MIN_REDIRECT_DELAY_SECS, MAX_REDIRECT_DELAY_SECS);
    if clamped != secs {
        log::warn!("REDIRECT_DELAY_SECS={secs} out of range, using {clamped}");
    }
    clamped
}

fn try_load<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|e| {
            log::warn!("Invalid {key} value '{raw}': {e}; using default: {default}");
            default
        }),
        Err(_) => default,
    }
}

impl Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackend::Postgres => write!(f, "postgres"),
            StoreBackend::Memory => write!(f, "memory"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirect_delay_is_clamped_to_window() {
        assert_eq!(clamp_redirect_delay(0), 2);
        assert_eq!(clamp_redirect_delay(3), 3);
        assert_eq!(clamp_redirect_delay(10), 3);
    }

    #[test]
    fn store_backend_parses_aliases() {
        assert_eq!("PG".parse::<StoreBackend>(), Ok(StoreBackend::Postgres));
        assert_eq!(" memory ".parse::<StoreBackend>(), Ok(StoreBackend::Memory));
        assert!("redis".parse::<StoreBackend>().is_err());
    }
}
