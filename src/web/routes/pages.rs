use askama::Template;
use axum::response::Html;

use crate::error::AppError;

pub const BUILD_ID: &str = env!("FRIENDS_MAP_BUILD_ID");

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub build_id: &'static str,
}

#[derive(Template)]
#[template(path = "failure_no_username.html")]
pub struct NoUsernameTemplate;

#[derive(Template)]
#[template(path = "failure_does_not_exist.html")]
pub struct DoesNotExistTemplate;

pub async fn index_handler() -> Result<Html<String>, AppError> {
    let template = IndexTemplate { build_id: BUILD_ID };
    Ok(Html(template.render()?))
}

pub async fn no_username_error_handler() -> Result<Html<String>, AppError> {
    Ok(Html(NoUsernameTemplate.render()?))
}

pub async fn does_not_exist_error_handler() -> Result<Html<String>, AppError> {
    Ok(Html(DoesNotExistTemplate.render()?))
}
