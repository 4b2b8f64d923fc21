use std::{env, fmt, time::Duration};

use log::warn;
use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_POOL_SIZE: u32 = 10;
const DEFAULT_STRIPE_API_BASE: &str = "https://api.stripe.com";
const DEFAULT_BUY_CACHE_TTL: Duration = Duration::from_secs(60);
const DEFAULT_WEBHOOK_TOLERANCE: Duration = Duration::from_secs(300);
/// Discount and tax applied on `/buy` until real selection logic exists.
const DEFAULT_ADJUSTMENT_ID: i64 = 1;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// A value that must never end up in logs.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Secret<T>
where
    T: Clone + Default,
{
    value: T,
}

impl<T: Clone + Default> Secret<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }

    pub fn reveal(&self) -> &T {
        &self.value
    }
}

impl<T: Clone + Default> fmt::Debug for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("****")
    }
}

impl<T: Clone + Default> fmt::Display for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("****")
    }
}

#[derive(Clone, Debug)]
pub struct StripeConfig {
    pub secret_key: Secret<String>,
    /// Publishable key handed to the browser.
    pub public_key: String,
    pub webhook_secret: Secret<String>,
    pub api_base: String,
    /// Maximum age of a signed webhook.
    pub webhook_tolerance: Duration,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub pool_size: u32,
    pub stripe: StripeConfig,
    pub buy_cache_ttl: Duration,
    pub default_discount_id: Option<i64>,
    pub default_tax_id: Option<i64>,
}

impl AppConfig {
    /// Read configuration from the process environment. Call after
    /// `dotenvy::dotenv()` so a `.env` file is honoured.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let port = parsed(&lookup, "PORT")?.unwrap_or(DEFAULT_PORT);
        let pool_size = parsed(&lookup, "DB_POOL_SIZE")?.unwrap_or(DEFAULT_POOL_SIZE);
        let buy_cache_ttl = parsed(&lookup, "BUY_CACHE_TTL_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_BUY_CACHE_TTL);

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            database_url: required("DATABASE_URL")?,
            pool_size,
            stripe: StripeConfig {
                secret_key: Secret::new(required("STRIPE_SECRET_KEY")?),
                public_key: required("STRIPE_PUBLIC_KEY")?,
                webhook_secret: Secret::new(required("STRIPE_WEBHOOK_SECRET")?),
                api_base: lookup("STRIPE_API_BASE")
                    .unwrap_or_else(|| DEFAULT_STRIPE_API_BASE.to_string()),
                webhook_tolerance: DEFAULT_WEBHOOK_TOLERANCE,
            },
            buy_cache_ttl,
            default_discount_id: optional_id(&lookup, "DEFAULT_DISCOUNT_ID")?,
            default_tax_id: optional_id(&lookup, "DEFAULT_TAX_ID")?,
        })
    }
}

fn parsed<F, T>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(name)
        .map(|value| value.parse().map_err(|_| ConfigError::Invalid { name, value }))
        .transpose()
}

/// Unset means the built-in default; an empty value disables the adjustment.
fn optional_id<F>(lookup: &F, name: &'static str) -> Result<Option<i64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(Some(DEFAULT_ADJUSTMENT_ID)),
        Some(v) if v.trim().is_empty() => {
            warn!("{name} is empty; no default will be applied on /buy");
            Ok(None)
        }
        Some(v) => v.trim().parse().map(Some).map_err(|_| ConfigError::Invalid { name, value: v }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    const REQUIRED: [(&str, &str); 4] = [
        ("DATABASE_URL", "postgres://localhost/shop"),
        ("STRIPE_SECRET_KEY", "sk_test_123"),
        ("STRIPE_PUBLIC_KEY", "pk_test_123"),
        ("STRIPE_WEBHOOK_SECRET", "whsec_123"),
    ];

    #[test]
    fn defaults_apply() {
        let config = AppConfig::from_lookup(lookup_from(&REQUIRED)).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.buy_cache_ttl, Duration::from_secs(60));
        assert_eq!(config.default_discount_id, Some(1));
        assert_eq!(config.default_tax_id, Some(1));
        assert_eq!(config.stripe.api_base, "https://api.stripe.com");
        assert_eq!(config.stripe.secret_key.reveal(), "sk_test_123");
    }

    #[test]
    fn missing_secret_is_an_error() {
        let err = AppConfig::from_lookup(lookup_from(&REQUIRED[..3])).unwrap_err();
        assert_eq!(err.to_string(), "STRIPE_WEBHOOK_SECRET must be set");
    }

    #[test]
    fn invalid_port_is_an_error() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("PORT", "eighty"));
        assert!(matches!(
            AppConfig::from_lookup(lookup_from(&pairs)),
            Err(ConfigError::Invalid { name: "PORT", .. })
        ));
    }

    #[test]
    fn empty_default_ids_disable_adjustments() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("DEFAULT_DISCOUNT_ID", ""));
        pairs.push(("DEFAULT_TAX_ID", "3"));
        let config = AppConfig::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(config.default_discount_id, None);
        assert_eq!(config.default_tax_id, Some(3));
    }

    #[test]
    fn secrets_are_redacted() {
        let config = AppConfig::from_lookup(lookup_from(&REQUIRED)).unwrap();
        let printed = format!("{:?}", config.stripe);
        assert!(!printed.contains("sk_test_123"));
        assert!(!printed.contains("whsec_123"));
        assert!(printed.contains("****"));
    }
}
