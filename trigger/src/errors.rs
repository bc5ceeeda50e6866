//! Error types for the deploy trigger

use thiserror::Error;

/// Pipeline stage a failure is attributed to.
///
/// The CSRF and login stages terminate the run the same way, but the
/// operator must be able to tell them apart in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Csrf,
    Login,
    UpdateImage,
    Deploy,
    Webhook,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Csrf => "csrf token",
            Stage::Login => "login",
            Stage::UpdateImage => "update image",
            Stage::Deploy => "deploy",
            Stage::Webhook => "webhook",
        };
        f.write_str(name)
    }
}

/// Status and body captured from a failed response, for reporting.
#[derive(Debug, Clone)]
pub struct FailedResponse {
    pub status: reqwest::StatusCode,
    pub content_type: Option<String>,
    pub body: String,
}

/// Main error type for the deploy trigger
#[derive(Error, Debug)]
pub enum TriggerError {
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("{stage} request failed with status {}", .response.status)]
    UnexpectedStatus { stage: Stage, response: FailedResponse },

    #[error("{stage} response did not set a `{name}` cookie (status {})", .response.status)]
    MissingCookie {
        stage: Stage,
        name: &'static str,
        response: FailedResponse,
    },
}
