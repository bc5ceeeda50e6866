//! Service mutation calls
//!
//! Both calls require the handshake's cookie pair and CSRF header;
//! success is judged purely by status class.

use reqwest::header::COOKIE;
use serde_json::Value;
use tracing::{debug, error};

use crate::config::ServiceTarget;
use crate::errors::{Stage, TriggerError};
use crate::http::client::{failed_response, DashboardClient, CSRF_HEADER};
use crate::http::session::AuthSession;
use crate::models::deploy::{DeployRequest, DeployResponse, ServiceChange};

impl DashboardClient {
    /// Stage an image change for the service.
    pub async fn request_image_update(
        &self,
        auth: &AuthSession,
        target: &ServiceTarget,
    ) -> Result<Value, TriggerError> {
        let url = self.url(&format!(
            "/api/projects/{}/request-service-changes/docker/{}/",
            target.project_slug, target.service_slug
        ));
        debug!("PUT {}", url);

        let response = self
            .http()
            .put(&url)
            .headers(self.extra_headers())
            .header(CSRF_HEADER, auth.csrf_token())
            .header(COOKIE, auth.cookie_header())
            .json(&ServiceChange::image_update(&target.image))
            .send()
            .await?;

        if !response.status().is_success() {
            let response = failed_response(response).await;
            error!("image update failed: {}", response.status);
            return Err(TriggerError::UnexpectedStatus {
                stage: Stage::UpdateImage,
                response,
            });
        }

        let state = response.json().await?;
        Ok(state)
    }

    /// Queue a new deployment for the service.
    pub async fn deploy_service(
        &self,
        auth: &AuthSession,
        target: &ServiceTarget,
        commit_message: &str,
    ) -> Result<DeployResponse, TriggerError> {
        let url = self.url(&format!(
            "/api/projects/{}/deploy-service/docker/{}/",
            target.project_slug, target.service_slug
        ));
        debug!("PUT {}", url);

        let response = self
            .http()
            .put(&url)
            .headers(self.extra_headers())
            .header(CSRF_HEADER, auth.csrf_token())
            .header(COOKIE, auth.cookie_header())
            .json(&DeployRequest {
                commit_message: commit_message.to_string(),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let response = failed_response(response).await;
            error!("deploy request failed: {}", response.status);
            return Err(TriggerError::UnexpectedStatus {
                stage: Stage::Deploy,
                response,
            });
        }

        let text = response.text().await?;
        let deployment: DeployResponse = serde_json::from_str(&text)?;
        Ok(deployment)
    }
}
