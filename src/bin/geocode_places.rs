//! Resolves place strings from the command line the same way the map does.
//!
//! ```sh
//! cargo run --bin geocode_places -- "Jo's Cafe, San Marcos, Texas, USA" "Paris, France"
//! ```

use std::sync::Arc;

use anyhow::{bail, Context};
use dotenvy::dotenv;
use tracing_subscriber::{fmt, EnvFilter};

use friends_map::config::GeocodePolicy;
use friends_map::services::geocode_resolver::GeocodeResolver;
use friends_map::services::location_service::NominatimGeocoder;
use friends_map::services::rate_limiter::RateLimitedGeocoder;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let places: Vec<String> = std::env::args().skip(1).collect();
    if places.is_empty() {
        bail!("usage: geocode_places <place> [<place> ...]");
    }

    let base_url = std::env::var("GEOCODER_URL")
        .unwrap_or_else(|_| "https://nominatim.openstreetmap.org".to_string());
    let user_agent =
        std::env::var("GEOCODER_USER_AGENT").unwrap_or_else(|_| "Friends map".to_string());

    let nominatim =
        NominatimGeocoder::new(&base_url, &user_agent).context("building geocoder client")?;
    let geocoder = RateLimitedGeocoder::new(Arc::new(nominatim), GeocodePolicy::default());
    let mut resolver = GeocodeResolver::new(Arc::new(geocoder));

    for place in &places {
        match resolver.resolve(place).await {
            Some(c) => println!("{}\t{}\t{}", place, c.latitude, c.longitude),
            None => println!("{}\t-\t-", place),
        }
    }

    let stats = resolver.stats();
    eprintln!(
        "geocode: lookups={}, upstream_calls={}, cache_hits={}, unresolved={}",
        stats.lookups, stats.upstream_calls, stats.cache_hits, stats.unresolved
    );
    Ok(())
}
