use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::SocialError;
use crate::models::{FollowedAccount, FollowingResponse, UserLookupResponse};

/// Read access to the social graph.
#[async_trait]
pub trait SocialGraph: Send + Sync {
    /// `Ok(None)` when the username has no account.
    async fn lookup_user_id(&self, username: &str) -> Result<Option<String>, SocialError>;

    async fn following(&self, user_id: &str) -> Result<Vec<FollowedAccount>, SocialError>;
}

/// Twitter API v2 client authenticated with an app bearer token.
pub struct TwitterClient {
    client: reqwest::Client,
    base_url: Url,
    page_size: u32,
    max_pages: u32,
}

impl TwitterClient {
    pub fn new(
        base_url: &str,
        bearer_token: &str,
        page_size: u32,
        max_pages: u32,
    ) -> Result<Self, SocialError> {
        let base_url =
            Url::parse(base_url).map_err(|e| SocialError::Unreachable(e.to_string()))?;
        let client = reqwest::Client::builder()
            .default_headers(bearer_headers(bearer_token)?)
            .build()
            .map_err(|e| SocialError::Unreachable(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            page_size,
            max_pages,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, SocialError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SocialError::Unreachable(format!("bad base url {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, url: Url, query: &[(&str, String)]) -> Result<Response, SocialError> {
        self.client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| SocialError::Unreachable(e.to_string()))
    }
}

async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, SocialError> {
    resp.json::<T>()
        .await
        .map_err(|e| SocialError::Malformed(e.to_string()))
}

#[async_trait]
impl SocialGraph for TwitterClient {
    async fn lookup_user_id(&self, username: &str) -> Result<Option<String>, SocialError> {
        let url = self.endpoint(&["2", "users", "by", "username", username])?;
        let resp = self.send(url, &[]).await?;

        // Unknown usernames come back as an error body without `data`,
        // sometimes with a non-OK status; both mean "no such account".
        let status = resp.status();
        if !status.is_success() {
            warn!("Social API non-OK for user lookup of {}: {}", username, status);
        }
        let body: UserLookupResponse = read_json(resp).await?;
        Ok(body.data.and_then(|d| d.id))
    }

    async fn following(&self, user_id: &str) -> Result<Vec<FollowedAccount>, SocialError> {
        let url = self.endpoint(&["2", "users", user_id, "following"])?;
        let mut accounts = Vec::new();
        let mut pagination_token: Option<String> = None;

        for page in 0..self.max_pages {
            let mut query = vec![
                ("user.fields", "location".to_string()),
                ("max_results", self.page_size.to_string()),
            ];
            if let Some(token) = pagination_token.take() {
                query.push(("pagination_token", token));
            }

            let resp = self.send(url.clone(), &query).await?;
            let status = resp.status();
            if !status.is_success() {
                warn!(
                    "Social API non-OK for following page {} of {}: {}",
                    page + 1,
                    user_id,
                    status
                );
                return Err(SocialError::Status(status.as_u16()));
            }

            let body: FollowingResponse = read_json(resp).await?;
            debug!(
                "Following page {} for {}: {} accounts",
                page + 1,
                user_id,
                body.data.len()
            );
            accounts.extend(body.data);

            match body.meta.and_then(|m| m.next_token) {
                Some(token) => pagination_token = Some(token),
                None => break,
            }
        }

        Ok(accounts)
    }
}

fn bearer_headers(token: &str) -> Result<HeaderMap, SocialError> {
    let mut headers = HeaderMap::new();
    let mut auth_value = HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|_| SocialError::Unreachable("bearer token is not a valid header".into()))?;
    auth_value.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth_value);
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use axum::extract::{Path, Query, State};
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Json};
    use axum::routing::get;
    use axum::Router;
    use serde_json::json;

    use super::*;

    // ── Local social API stub ──────────────────────────────────

    #[derive(Debug, Clone, PartialEq)]
    struct SeenRequest {
        user_id: String,
        pagination_token: Option<String>,
        max_results: Option<String>,
        authorization: Option<String>,
    }

    #[derive(Clone, Default)]
    struct StubLog(Arc<Mutex<Vec<SeenRequest>>>);

    impl StubLog {
        fn requests(&self) -> Vec<SeenRequest> {
            self.0.lock().unwrap().clone()
        }
    }

    fn page(usernames: &[&str], next_token: Option<&str>) -> axum::response::Response {
        let data: Vec<_> = usernames
            .iter()
            .map(|u| json!({ "id": format!("id-{}", u), "username": u, "location": "Paris, France" }))
            .collect();
        let mut meta = json!({ "result_count": data.len() });
        if let Some(token) = next_token {
            meta["next_token"] = json!(token);
        }
        Json(json!({ "data": data, "meta": meta })).into_response()
    }

    fn too_many_requests() -> axum::response::Response {
        (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({ "title": "Too Many Requests", "status": 429 })),
        )
            .into_response()
    }

    async fn following_stub(
        State(log): State<StubLog>,
        Path(user_id): Path<String>,
        Query(params): Query<HashMap<String, String>>,
        headers: axum::http::HeaderMap,
    ) -> axum::response::Response {
        let token = params.get("pagination_token").cloned();
        log.0.lock().unwrap().push(SeenRequest {
            user_id: user_id.clone(),
            pagination_token: token.clone(),
            max_results: params.get("max_results").cloned(),
            authorization: headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        });

        match (user_id.as_str(), token.as_deref()) {
            // Two pages, then no more token.
            ("42", None) => page(&["ann", "bob"], Some("p2")),
            ("42", Some("p2")) => page(&["cid"], None),
            // Always has another page.
            ("endless", t) => page(&["loop"], Some(format!("{}+", t.unwrap_or("p")).as_str())),
            // Rate limited straight away, or only on the second page.
            ("limited", _) => too_many_requests(),
            ("flaky", None) => page(&["ann"], Some("p2")),
            ("flaky", Some(_)) => too_many_requests(),
            _ => StatusCode::NOT_FOUND.into_response(),
        }
    }

    async fn lookup_stub(Path(username): Path<String>) -> axum::response::Response {
        match username.as_str() {
            "ann" => Json(json!({ "data": { "id": "42", "username": "ann" } })).into_response(),
            _ => Json(json!({
                "errors": [{ "detail": format!("Could not find user with username: [{}].", username) }]
            }))
            .into_response(),
        }
    }

    async fn spawn_stub() -> (String, StubLog) {
        let log = StubLog::default();
        let app = Router::new()
            .route("/2/users/by/username/:username", get(lookup_stub))
            .route("/2/users/:user_id/following", get(following_stub))
            .with_state(log.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}", addr), log)
    }

    fn usernames(accounts: &[FollowedAccount]) -> Vec<&str> {
        accounts.iter().map(|a| a.username.as_str()).collect()
    }

    fn client(base: &str) -> TwitterClient {
        TwitterClient::new(base, "token", 100, 1).unwrap()
    }

    #[test]
    fn endpoint_escapes_username() {
        let url = client("https://api.twitter.com")
            .endpoint(&["2", "users", "by", "username", "a/b c"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.twitter.com/2/users/by/username/a%2Fb%20c"
        );
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let url = client("http://127.0.0.1:9000/proxy/")
            .endpoint(&["2", "users", "42", "following"])
            .unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/proxy/2/users/42/following");
    }

    #[test]
    fn missing_user_has_no_id() {
        let body: UserLookupResponse = serde_json::from_str(
            r#"{"errors":[{"detail":"Could not find user with username: [nobody]."}]}"#,
        )
        .unwrap();
        assert!(body.data.and_then(|d| d.id).is_none());
    }

    #[test]
    fn following_without_data_is_empty() {
        let body: FollowingResponse =
            serde_json::from_str(r#"{"meta":{"result_count":0}}"#).unwrap();
        assert!(body.data.is_empty());
        assert!(body.meta.and_then(|m| m.next_token).is_none());
    }

    #[test]
    fn following_location_is_optional() {
        let body: FollowingResponse = serde_json::from_str(
            r#"{"data":[
                {"id":"1","name":"Ann","username":"ann","location":"Paris, France"},
                {"id":"2","name":"Bob","username":"bob"}
            ],"meta":{"result_count":2,"next_token":"abc"}}"#,
        )
        .unwrap();
        assert_eq!(body.data[0].location.as_deref(), Some("Paris, France"));
        assert_eq!(body.data[1].location, None);
        assert_eq!(body.meta.and_then(|m| m.next_token).as_deref(), Some("abc"));
    }

    // ── Against the stub ───────────────────────────────────────

    #[tokio::test]
    async fn lookup_returns_id_or_none() {
        let (base, _log) = spawn_stub().await;
        let client = TwitterClient::new(&base, "token", 100, 1).unwrap();

        assert_eq!(client.lookup_user_id("ann").await.unwrap().as_deref(), Some("42"));
        assert_eq!(client.lookup_user_id("ghost").await.unwrap(), None);
    }

    #[tokio::test]
    async fn following_walks_pages_until_token_runs_out() {
        let (base, log) = spawn_stub().await;
        let client = TwitterClient::new(&base, "secret", 50, 5).unwrap();

        let accounts = client.following("42").await.unwrap();

        assert_eq!(usernames(&accounts), vec!["ann", "bob", "cid"]);
        let requests = log.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].pagination_token, None);
        assert_eq!(requests[1].pagination_token.as_deref(), Some("p2"));
        assert!(requests.iter().all(|r| r.max_results.as_deref() == Some("50")));
        assert!(requests
            .iter()
            .all(|r| r.authorization.as_deref() == Some("Bearer secret")));
    }

    #[tokio::test]
    async fn following_stops_at_page_limit() {
        let (base, log) = spawn_stub().await;
        let client = TwitterClient::new(&base, "token", 100, 2).unwrap();

        let accounts = client.following("endless").await.unwrap();

        assert_eq!(usernames(&accounts), vec!["loop", "loop"]);
        let tokens: Vec<_> = log
            .requests()
            .into_iter()
            .map(|r| r.pagination_token)
            .collect();
        assert_eq!(tokens, vec![None, Some("p+".to_string())]);
    }

    #[tokio::test]
    async fn single_page_limit_ignores_next_token() {
        let (base, log) = spawn_stub().await;
        let client = TwitterClient::new(&base, "token", 100, 1).unwrap();

        let accounts = client.following("42").await.unwrap();

        assert_eq!(usernames(&accounts), vec!["ann", "bob"]);
        assert_eq!(log.requests().len(), 1);
    }

    #[tokio::test]
    async fn rate_limited_following_is_an_error() {
        let (base, _log) = spawn_stub().await;
        let client = TwitterClient::new(&base, "token", 100, 1).unwrap();

        let err = client.following("limited").await.unwrap_err();
        assert!(matches!(err, SocialError::Status(429)));
    }

    #[tokio::test]
    async fn error_on_later_page_is_not_a_short_list() {
        let (base, log) = spawn_stub().await;
        let client = TwitterClient::new(&base, "token", 100, 3).unwrap();

        let err = client.following("flaky").await.unwrap_err();
        assert!(matches!(err, SocialError::Status(429)));
        assert_eq!(log.requests().len(), 2);
    }
}
