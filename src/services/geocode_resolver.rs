use std::sync::Arc;

use tracing::{debug, warn};

use crate::models::Coordinate;
use crate::services::geocode_cache::{CacheEntry, GeocodeCache};
use crate::services::location_service::{GeocodeOutcome, Geocoder};

/// Profile location value meaning "no location given".
pub const NO_LOCATION: &str = "nan";

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ResolverStats {
    pub lookups: usize,
    pub cache_hits: usize,
    pub upstream_calls: usize,
    pub unresolved: usize,
}

/// Memoizing front for a geocoder. Lives for a single map request.
///
/// A place that does not match is retried with its leading comma-separated
/// component removed until something matches or nothing is left to remove.
/// Whatever the outcome, it is cached under the place exactly as given.
pub struct GeocodeResolver {
    geocoder: Arc<dyn Geocoder>,
    cache: GeocodeCache,
    stats: ResolverStats,
}

impl GeocodeResolver {
    pub fn new(geocoder: Arc<dyn Geocoder>) -> Self {
        Self {
            geocoder,
            cache: GeocodeCache::new(),
            stats: ResolverStats::default(),
        }
    }

    pub fn stats(&self) -> ResolverStats {
        self.stats
    }

    pub fn cache(&self) -> &GeocodeCache {
        &self.cache
    }

    pub async fn resolve(&mut self, place: &str) -> Option<Coordinate> {
        if place == NO_LOCATION {
            return None;
        }

        self.stats.lookups += 1;
        if let Some(entry) = self.cache.get(place) {
            self.stats.cache_hits += 1;
            return entry.coordinate();
        }

        let entry = self.walk_truncation_chain(place).await;
        if entry == CacheEntry::Unresolvable {
            self.stats.unresolved += 1;
            debug!("📍 No coordinates for '{}'", place);
        }
        self.cache.insert(place, entry).coordinate()
    }

    async fn walk_truncation_chain(&mut self, place: &str) -> CacheEntry {
        let mut current = place.to_string();
        let mut first = true;

        loop {
            // A shorter form that was itself looked up earlier already
            // carries the answer for the rest of the chain.
            if !first {
                if let Some(entry) = self.cache.get(&current) {
                    self.stats.cache_hits += 1;
                    return entry;
                }
            }
            first = false;

            if current.trim().is_empty() || current == NO_LOCATION {
                debug!("📍 Skipping empty candidate derived from '{}'", place);
            } else {
                self.stats.upstream_calls += 1;
                match self.geocoder.geocode(&current).await {
                    GeocodeOutcome::Found(coordinate) => return CacheEntry::Resolved(coordinate),
                    GeocodeOutcome::NotFound => {}
                    GeocodeOutcome::Unavailable(reason) => {
                        warn!(
                            "📍 Geocoder unavailable for '{}' ({}). Proceeding...",
                            current, reason
                        );
                    }
                }
            }

            match crop_address(&current) {
                Some(shorter) => current = shorter,
                None => return CacheEntry::Unresolvable,
            }
        }
    }
}

/// Drops the leftmost comma-separated segment, keeping the rest verbatim.
/// Returns `None` when there is no comma to cut at.
///
/// ```
/// use friends_map::services::geocode_resolver::crop_address;
///
/// assert_eq!(
///     crop_address("Jo's Cafe, San Marcos, Texas, USA").as_deref(),
///     Some(" San Marcos, Texas, USA")
/// );
/// assert_eq!(crop_address(" Texas, USA").as_deref(), Some(" USA"));
/// assert_eq!(crop_address(" USA"), None);
/// ```
pub fn crop_address(place: &str) -> Option<String> {
    place.split_once(',').map(|(_, rest)| rest.to_string())
}
