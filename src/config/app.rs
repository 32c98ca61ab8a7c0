use anyhow::{anyhow, bail, Result};
use chrono::Duration;
use std::env;

const DEV_JWT_SECRET: &str = "your-secret-key-change-in-production";
const MAX_TOKEN_LIFETIME_DAYS: i64 = 365;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub log_level: String,
    pub jwt_secret: String,
    pub jwt_expires_in: Duration,
    pub client_url: String,
    pub rate_limit_max: usize,
    pub rate_limit_window_secs: u64,
    /// Key rate limits on `X-Forwarded-For` / `X-Real-IP` instead of the socket address
    pub trust_proxy: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            environment: "development".to_string(),
            log_level: "info".to_string(),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            jwt_expires_in: Duration::days(1),
            client_url: "http://localhost:5173".to_string(),
            rate_limit_max: 100,
            rate_limit_window_secs: 15 * 60,
            trust_proxy: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let host = env::var("HOST").unwrap_or(defaults.host);
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);
        let environment = env::var("ENVIRONMENT").unwrap_or(defaults.environment);
        let log_level = env::var("LOG_LEVEL").unwrap_or(defaults.log_level);

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => defaults.jwt_secret,
        };

        let jwt_expires_in = match env::var("JWT_EXPIRES_IN") {
            Ok(raw) => parse_expires_in(&raw)?,
            Err(_) => defaults.jwt_expires_in,
        };

        let client_url = env::var("CLIENT_URL").unwrap_or(defaults.client_url);
        let rate_limit_max = env::var("RATE_LIMIT_MAX")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.rate_limit_max);
        let rate_limit_window_secs = env::var("RATE_LIMIT_WINDOW_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.rate_limit_window_secs);
        let trust_proxy = env::var("TRUST_PROXY")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(defaults.trust_proxy);

        let config = AppConfig {
            host,
            port,
            environment,
            log_level,
            jwt_secret,
            jwt_expires_in,
            client_url,
            rate_limit_max,
            rate_limit_window_secs,
            trust_proxy,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Production must not run with the built-in development secret.
    pub fn validate(&self) -> Result<()> {
        if self.is_production() && self.jwt_secret == DEV_JWT_SECRET {
            bail!("JWT_SECRET must be set in production");
        }
        Ok(())
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parse a token lifetime such as `1d`, `12h`, `30m`, `45s` or a bare number of seconds.
pub fn parse_expires_in(raw: &str) -> Result<Duration> {
    let raw = raw.trim();
    if raw.is_empty() {
        bail!("token lifetime cannot be empty");
    }

    let (digits, unit) = match raw.char_indices().last() {
        Some((idx, c)) if c.is_ascii_alphabetic() => (&raw[..idx], Some(c)),
        _ => (raw, None),
    };

    let amount: i64 = digits
        .parse()
        .map_err(|_| anyhow!("invalid token lifetime: {raw}"))?;
    if amount <= 0 {
        bail!("token lifetime must be positive: {raw}");
    }

    let lifetime = match unit {
        None | Some('s') => Duration::try_seconds(amount),
        Some('m') => Duration::try_minutes(amount),
        Some('h') => Duration::try_hours(amount),
        Some('d') => Duration::try_days(amount),
        Some(other) => bail!("unknown token lifetime unit '{other}' in {raw}"),
    }
    .filter(|lifetime| *lifetime <= Duration::days(MAX_TOKEN_LIFETIME_DAYS))
    .ok_or_else(|| {
        anyhow!("token lifetime {raw} exceeds {MAX_TOKEN_LIFETIME_DAYS} days")
    })?;

    Ok(lifetime)
}
