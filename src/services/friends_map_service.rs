use std::sync::Arc;

use tracing::{debug, info};

use crate::error::AppError;
use crate::models::FriendEntry;
use crate::services::geocode_resolver::GeocodeResolver;
use crate::services::location_service::Geocoder;
use crate::services::social_service::SocialGraph;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct FriendsMapReport {
    pub following: usize,
    pub without_location: usize,
    pub unresolved: usize,
    pub placed: usize,
}

#[derive(Debug)]
pub struct FriendsMapData {
    pub username: String,
    pub friends: Vec<FriendEntry>,
    pub report: FriendsMapReport,
}

/// Trims the submitted account name; a leading `@` is accepted.
pub fn normalize_username(raw: Option<&str>) -> Option<String> {
    raw.map(|s| s.trim().trim_start_matches('@').trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

pub async fn build_friends_map(
    social: &dyn SocialGraph,
    geocoder: Arc<dyn Geocoder>,
    raw_username: Option<&str>,
) -> Result<FriendsMapData, AppError> {
    let username = normalize_username(raw_username).ok_or(AppError::NoUsername)?;

    let user_id = social
        .lookup_user_id(&username)
        .await?
        .ok_or_else(|| AppError::UserNotFound(username.clone()))?;

    let following = social.following(&user_id).await?;
    let mut report = FriendsMapReport {
        following: following.len(),
        ..Default::default()
    };

    // Fresh cache per request.
    let mut resolver = GeocodeResolver::new(geocoder);
    let mut friends = Vec::new();

    for account in following {
        let Some(location) = account.location.as_deref() else {
            report.without_location += 1;
            continue;
        };

        match resolver.resolve(location).await {
            Some(coordinate) => friends.push(FriendEntry {
                coordinate,
                username: account.username,
            }),
            None => {
                debug!("📍 {} left off the map ('{}')", account.username, location);
                report.unresolved += 1;
            }
        }
    }
    report.placed = friends.len();

    let stats = resolver.stats();
    info!(
        "🗺️ Map for @{}: following={}, placed={}, without_location={}, unresolved={}, upstream_calls={}, cache_hits={}",
        username,
        report.following,
        report.placed,
        report.without_location,
        report.unresolved,
        stats.upstream_calls,
        stats.cache_hits
    );

    Ok(FriendsMapData {
        username,
        friends,
        report,
    })
}
