//! Session-establishment handshake
//!
//! The dashboard refuses state-changing calls without a CSRF token and
//! an authenticated session cookie. Both come out of the cookie jars of
//! two strictly ordered calls: `GET /api/csrf`, then
//! `POST /api/auth/login`. Either call failing ends the run; there is
//! no retry and no way back to an earlier step.

use reqwest::header::COOKIE;
use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde_json::json;
use tracing::{debug, error, info};

use crate::config::Credentials;
use crate::errors::{Stage, TriggerError};
use crate::http::client::{failed_response, DashboardClient, CSRF_HEADER};
use crate::http::cookies::find_cookie;

/// Cookie set by the CSRF endpoint.
pub const CSRF_COOKIE: &str = "csrftoken";

/// Cookie set by a successful login.
pub const SESSION_COOKIE: &str = "sessionid";

/// Proof of an authenticated, anti-forgery-protected session.
#[derive(Debug, Clone)]
pub struct AuthSession {
    csrf_token: String,
    session_id: String,
}

impl AuthSession {
    pub fn new(csrf_token: String, session_id: String) -> Self {
        Self {
            csrf_token,
            session_id,
        }
    }

    /// CSRF token for the `x-csrftoken` request header.
    pub fn csrf_token(&self) -> &str {
        &self.csrf_token
    }

    /// Cookie header carrying both session and CSRF cookies.
    ///
    /// The server does not care about the order; it is fixed so the
    /// serialization is stable.
    pub fn cookie_header(&self) -> String {
        format!(
            "{SESSION_COOKIE}={}; {CSRF_COOKIE}={}",
            self.session_id, self.csrf_token
        )
    }
}

impl DashboardClient {
    /// Fetch a CSRF token from the dedicated endpoint.
    pub async fn acquire_csrf_token(&self) -> Result<String, TriggerError> {
        let url = self.url("/api/csrf");
        debug!("GET {}", url);

        let response = self.http().get(&url).send().await?;

        if !response.status().is_success() {
            let response = failed_response(response).await;
            error!("csrf token request failed: {}", response.status);
            return Err(TriggerError::UnexpectedStatus {
                stage: Stage::Csrf,
                response,
            });
        }

        let token = find_cookie(response.headers(), CSRF_COOKIE).filter(|t| !t.is_empty());
        match token {
            Some(token) => Ok(token),
            None => {
                error!("csrf endpoint did not set a {} cookie", CSRF_COOKIE);
                Err(TriggerError::MissingCookie {
                    stage: Stage::Csrf,
                    name: CSRF_COOKIE,
                    response: failed_response(response).await,
                })
            }
        }
    }

    /// Exchange the CSRF token and operator credentials for a session.
    ///
    /// The token must travel both as the `x-csrftoken` header and as a
    /// cookie or the dashboard rejects the login outright. A successful
    /// login answers 201 Created with a `sessionid` cookie.
    pub async fn login(
        &self,
        csrf_token: &str,
        credentials: &Credentials,
    ) -> Result<String, TriggerError> {
        let url = self.url("/api/auth/login");
        debug!("POST {}", url);

        let body = json!({
            "username": credentials.username,
            "password": credentials.password.expose_secret(),
        });

        let response = self
            .http()
            .post(&url)
            .headers(self.extra_headers())
            .header(CSRF_HEADER, csrf_token)
            .header(COOKIE, format!("{CSRF_COOKIE}={csrf_token}"))
            .json(&body)
            .send()
            .await?;

        if response.status() != StatusCode::CREATED {
            let response = failed_response(response).await;
            error!("login failed: {}", response.status);
            return Err(TriggerError::UnexpectedStatus {
                stage: Stage::Login,
                response,
            });
        }

        let session_id = find_cookie(response.headers(), SESSION_COOKIE).filter(|s| !s.is_empty());
        match session_id {
            Some(session_id) => {
                info!("authenticated as {}", credentials.username);
                Ok(session_id)
            }
            None => {
                error!("login response did not set a {} cookie", SESSION_COOKIE);
                Err(TriggerError::MissingCookie {
                    stage: Stage::Login,
                    name: SESSION_COOKIE,
                    response: failed_response(response).await,
                })
            }
        }
    }
}
