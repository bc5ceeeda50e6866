//! Webhook-only deploy trigger

use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::{debug, error};

use crate::config::WebhookConfig;
use crate::errors::{Stage, TriggerError};
use crate::http::client::failed_response;
use crate::models::deploy::WebhookDeployRequest;

/// Send the single pre-authenticated deploy request.
///
/// No handshake: the webhook URL embeds its own authorization. The
/// dashboard answers exactly 200 on success; anything else is failure.
pub async fn trigger_webhook(config: &WebhookConfig) -> Result<(), TriggerError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(30))
        .build()?;

    debug!("PUT {}", config.url);
    let response = client
        .put(&config.url)
        .headers(config.extra_headers.clone())
        .json(&WebhookDeployRequest {
            new_image: config.image.clone(),
            commit_message: config.commit_message.clone(),
        })
        .send()
        .await?;

    if response.status() != StatusCode::OK {
        let response = failed_response(response).await;
        error!("webhook deploy failed: {}", response.status);
        return Err(TriggerError::UnexpectedStatus {
            stage: Stage::Webhook,
            response,
        });
    }

    Ok(())
}
