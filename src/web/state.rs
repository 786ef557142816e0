use std::sync::Arc;

use anyhow::Context;

use crate::config::Config;
use crate::services::location_service::{Geocoder, NominatimGeocoder};
use crate::services::rate_limiter::RateLimitedGeocoder;
use crate::services::social_service::{SocialGraph, TwitterClient};

/// Process-wide collaborators shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub social: Arc<dyn SocialGraph>,
    /// Already rate limited; each request wraps it in its own cache.
    pub geocoder: Arc<dyn Geocoder>,
}

impl AppState {
    pub fn new(social: Arc<dyn SocialGraph>, geocoder: Arc<dyn Geocoder>) -> Self {
        Self { social, geocoder }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let social = TwitterClient::new(
            &config.social_api_url,
            &config.bearer_token,
            config.following_page_size,
            config.following_max_pages,
        )
        .context("social API client")?;
        let nominatim = NominatimGeocoder::new(&config.geocoder_url, &config.geocoder_user_agent)
            .context("geocoder client")?;
        let geocoder = RateLimitedGeocoder::new(Arc::new(nominatim), config.geocode_policy);

        Ok(Self::new(Arc::new(social), Arc::new(geocoder)))
    }
}
