use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct UserLookupResponse {
    pub data: Option<UserData>,
}

#[derive(Debug, Deserialize)]
pub struct UserData {
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FollowingResponse {
    // Absent when the user follows nobody.
    #[serde(default)]
    pub data: Vec<FollowedAccount>,
    pub meta: Option<PageMeta>,
}

#[derive(Debug, Deserialize)]
pub struct PageMeta {
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FollowedAccount {
    #[serde(default)]
    pub id: String,
    pub username: String,
    pub name: Option<String>,
    pub location: Option<String>,
}
