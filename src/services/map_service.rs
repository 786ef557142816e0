use askama::Template;
use serde::Serialize;

use crate::models::FriendEntry;

#[derive(Debug, Serialize)]
struct MarkerView<'a> {
    lat: f64,
    lon: f64,
    label: &'a str,
}

#[derive(Template)]
#[template(path = "map.html")]
struct FriendsMapTemplate {
    title: String,
    marker_count: usize,
    markers_json: String,
}

/// Renders a Leaflet page with one popup marker per friend, in input order.
pub fn render_friends_map(username: &str, friends: &[FriendEntry]) -> askama::Result<String> {
    let template = FriendsMapTemplate {
        title: format!("Accounts followed by @{}", username),
        marker_count: friends.len(),
        markers_json: markers_json(friends),
    };
    template.render()
}

/// Marker list as a JSON array that is safe to inline in a `<script>` block.
pub fn markers_json(friends: &[FriendEntry]) -> String {
    let markers: Vec<MarkerView<'_>> = friends
        .iter()
        .map(|f| MarkerView {
            lat: f.coordinate.latitude,
            lon: f.coordinate.longitude,
            label: &f.username,
        })
        .collect();

    // Serializing plain structs of floats and strings cannot fail.
    let json = serde_json::to_string(&markers).unwrap_or_else(|_| "[]".to_string());
    json.replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}
