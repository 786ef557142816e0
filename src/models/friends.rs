use super::Coordinate;

/// A followed account that made it onto the map.
#[derive(Debug, Clone, PartialEq)]
pub struct FriendEntry {
    pub coordinate: Coordinate,
    pub username: String,
}
