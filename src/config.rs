use std::{env, fmt::Display, str::FromStr, time::Duration};

use tracing::{info, warn};

use crate::error::ConfigError;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub bearer_token: String,
    pub social_api_url: String,
    pub following_page_size: u32,
    pub following_max_pages: u32,
    pub geocoder_url: String,
    pub geocoder_user_agent: String,
    pub geocode_policy: GeocodePolicy,
}

/// Pacing of calls to the upstream geocoder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeocodePolicy {
    pub min_delay: Duration,
    pub max_retries: u32,
    pub error_wait: Duration,
}

impl Default for GeocodePolicy {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_millis(300),
            max_retries: 2,
            error_wait: Duration::from_secs(2),
        }
    }
}

impl GeocodePolicy {
    /// No spacing between calls and no retries.
    pub fn immediate() -> Self {
        Self {
            min_delay: Duration::ZERO,
            max_retries: 0,
            error_wait: Duration::ZERO,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let bearer_token = env::var("BEARER_TOKEN")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("BEARER_TOKEN"))?;

        Ok(Self {
            host: try_load("HOST", "127.0.0.1")?,
            port: try_load("PORT", "8080")?,
            bearer_token,
            social_api_url: try_load("SOCIAL_API_URL", "https://api.twitter.com")?,
            following_page_size: try_load::<u32>("FOLLOWING_PAGE_SIZE", "100")?.clamp(1, 1000),
            following_max_pages: try_load::<u32>("FOLLOWING_MAX_PAGES", "1")?.max(1),
            geocoder_url: try_load("GEOCODER_URL", "https://nominatim.openstreetmap.org")?,
            geocoder_user_agent: try_load("GEOCODER_USER_AGENT", "Friends map")?,
            geocode_policy: GeocodePolicy {
                min_delay: Duration::from_millis(try_load("GEOCODE_MIN_DELAY_MS", "300")?),
                max_retries: try_load("GEOCODE_MAX_RETRIES", "2")?,
                error_wait: Duration::from_millis(try_load("GEOCODE_ERROR_WAIT_MS", "2000")?),
            },
        })
    }
}

fn try_load<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.trim().parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }
    })
}
