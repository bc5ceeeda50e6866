//! The trigger run pipeline
//!
//! Strictly sequential: each call goes out only after the previous
//! response has been consumed, and the first failure aborts the rest.

use tracing::{debug, info};

use crate::app::options::AppOptions;
use crate::config::{DeployConfig, RunMode, WebhookConfig};
use crate::errors::{Stage, TriggerError};
use crate::http::client::DashboardClient;
use crate::http::session::AuthSession;
use crate::http::webhook::trigger_webhook;
use crate::models::deploy::DeployResponse;
use crate::report;

/// Outcome of a successful run.
#[derive(Debug)]
pub struct RunOutcome {
    /// The queued deployment, when the dashboard returned one.
    pub deployment: Option<DeployResponse>,

    /// Inspection link for the queued deployment.
    pub inspect_url: Option<String>,
}

/// Execute the configured run mode.
pub async fn run(options: AppOptions) -> Result<RunOutcome, TriggerError> {
    match options.mode {
        RunMode::Deploy(config) => run_deploy(config).await,
        RunMode::Webhook(config) => run_webhook(config).await,
    }
}

async fn run_deploy(config: DeployConfig) -> Result<RunOutcome, TriggerError> {
    let client = DashboardClient::new(&config.base_url, config.extra_headers.clone())?;

    report::stage(Stage::Csrf);
    let csrf_token = client.acquire_csrf_token().await?;
    report::stage_ok(Stage::Csrf);

    report::stage(Stage::Login);
    let session_id = client.login(&csrf_token, &config.credentials).await?;
    report::stage_ok(Stage::Login);

    let auth = AuthSession::new(csrf_token, session_id);

    report::stage(Stage::UpdateImage);
    let state = client.request_image_update(&auth, &config.target).await?;
    debug!("service change set: {}", state);
    report::stage_ok(Stage::UpdateImage);

    report::stage(Stage::Deploy);
    let deployment = client
        .deploy_service(&auth, &config.target, &config.commit_message)
        .await?;
    report::stage_ok(Stage::Deploy);

    let inspect_url = deployment.hash.as_deref().map(|hash| {
        report::inspect_url(
            client.base_url(),
            &config.target.project_slug,
            &config.target.service_slug,
            hash,
        )
    });

    info!(
        "deployment queued for {}/{}",
        config.target.project_slug, config.target.service_slug
    );

    Ok(RunOutcome {
        deployment: Some(deployment),
        inspect_url,
    })
}

async fn run_webhook(config: WebhookConfig) -> Result<RunOutcome, TriggerError> {
    report::stage(Stage::Webhook);
    trigger_webhook(&config).await?;
    report::stage_ok(Stage::Webhook);

    info!("webhook deploy accepted");

    Ok(RunOutcome {
        deployment: None,
        inspect_url: None,
    })
}
