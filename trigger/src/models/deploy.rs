//! Deployment request/response models

use serde::{Deserialize, Serialize};

/// A staged change to one field of a service.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceChange {
    /// Change kind; image updates are always `UPDATE`.
    #[serde(rename = "type")]
    pub change_type: String,

    /// Service field the change applies to.
    pub field: String,

    /// New value for the field.
    pub new_value: String,
}

impl ServiceChange {
    /// An `UPDATE` change of the `image` field.
    pub fn image_update(image: &str) -> Self {
        Self {
            change_type: "UPDATE".to_string(),
            field: "image".to_string(),
            new_value: image.to_string(),
        }
    }
}

/// Body of the deploy-service call.
#[derive(Debug, Clone, Serialize)]
pub struct DeployRequest {
    pub commit_message: String,
}

/// Deployment queued by the dashboard.
///
/// Only `hash` is interpreted; the rest of the payload is kept as-is so
/// the full deployment object can be printed back to the operator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,

    #[serde(flatten)]
    pub rest: serde_json::Map<String, serde_json::Value>,
}

/// Body of the webhook-only deploy call.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookDeployRequest {
    pub new_image: String,
    pub commit_message: String,
}
