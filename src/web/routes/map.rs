use axum::{extract::State, response::Html, Form};
use serde::Deserialize;

use crate::error::AppError;
use crate::services::{friends_map_service, map_service};
use crate::web::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct MapForm {
    #[serde(rename = "Account name")]
    pub account_name: Option<String>,
}

pub async fn generate_map_handler(
    State(state): State<AppState>,
    form: Option<Form<MapForm>>,
) -> Result<Html<String>, AppError> {
    let form = form.map(|Form(f)| f).unwrap_or_default();

    let data = friends_map_service::build_friends_map(
        state.social.as_ref(),
        state.geocoder.clone(),
        form.account_name.as_deref(),
    )
    .await?;

    let html = map_service::render_friends_map(&data.username, &data.friends)?;
    Ok(Html(html))
}
