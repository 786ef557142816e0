use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use thiserror::Error;
use tracing::{error, info};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("environment variable {0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Error, Debug)]
pub enum SocialError {
    #[error("social API unreachable: {0}")]
    Unreachable(String),

    #[error("social API returned an unreadable body: {0}")]
    Malformed(String),

    #[error("social API answered with status {0}")]
    Status(u16),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("no username submitted")]
    NoUsername,

    #[error("user {0} does not exist")]
    UserNotFound(String),

    #[error(transparent)]
    Social(#[from] SocialError),

    #[error("template render failed: {0}")]
    Render(#[from] askama::Error),
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NoUsername => {
                info!("Map requested without a username");
                Redirect::to("/no_username_error").into_response()
            }
            AppError::UserNotFound(name) => {
                info!("Map requested for unknown user {}", name);
                Redirect::to("/does_not_exist_error").into_response()
            }
            AppError::Social(e) => {
                error!("Social API failure: {}", e);
                let template = ErrorTemplate {
                    message: "Could not reach the social network. Please try again later."
                        .to_string(),
                };
                match template.render() {
                    Ok(body) => (StatusCode::BAD_GATEWAY, Html(body)).into_response(),
                    Err(_) => StatusCode::BAD_GATEWAY.into_response(),
                }
            }
            AppError::Render(e) => {
                error!("Template render failed: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
