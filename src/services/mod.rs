pub mod friends_map_service;
pub mod geocode_cache;
pub mod geocode_resolver;
pub mod location_service;
pub mod map_service;
pub mod rate_limiter;
pub mod social_service;

#[cfg(test)]
pub(crate) mod testing;
