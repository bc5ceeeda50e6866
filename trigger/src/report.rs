//! Console reporting
//!
//! Stateless formatting helpers for the operator-facing output: stage
//! progress, the final verdict, and failure bodies. Diagnostic lines go
//! through `tracing`; these are the plain console lines a CI job shows.

use colored::Colorize;

use crate::errors::{FailedResponse, Stage, TriggerError};

/// Announce a stage.
pub fn stage(stage: Stage) {
    println!("{} {}", "::".blue().bold(), stage);
}

/// Mark a stage as completed.
pub fn stage_ok(stage: Stage) {
    println!("{} {}", "[OK]".green().bold(), stage);
}

/// Print the success summary, with the inspection link when the
/// dashboard returned a deployment hash.
pub fn success(inspect_url: Option<&str>) {
    println!();
    println!("{} deployment queued", "[SUCCESS]".green().bold());
    if let Some(url) = inspect_url {
        println!("inspect: {}", url);
    }
}

/// Print a run failure.
///
/// Stage failures show the HTTP status and the response body verbatim,
/// pretty-printed when the response declared JSON. Everything else gets
/// a one-line generic failure.
pub fn failure(error: &TriggerError) {
    match error {
        TriggerError::UnexpectedStatus { stage, response } => {
            eprintln!(
                "{} {} (status {})",
                "[FAILED]".red().bold(),
                stage,
                response.status
            );
            print_body(response);
        }
        TriggerError::MissingCookie {
            stage,
            name,
            response,
        } => {
            eprintln!(
                "{} {}: no `{}` cookie in response (status {})",
                "[FAILED]".red().bold(),
                stage,
                name,
                response.status
            );
            print_body(response);
        }
        other => {
            eprintln!("{} {}", "[FAILED]".red().bold(), other);
        }
    }
}

fn print_body(response: &FailedResponse) {
    if response.body.is_empty() {
        return;
    }
    eprintln!("{}", pretty_body(response));
}

/// Response body verbatim, pretty-printed when the content type is JSON.
pub fn pretty_body(response: &FailedResponse) -> String {
    let is_json = response
        .content_type
        .as_deref()
        .is_some_and(|ct| ct.contains("application/json"));
    if is_json {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(&response.body) {
            if let Ok(pretty) = serde_json::to_string_pretty(&value) {
                return pretty;
            }
        }
    }
    response.body.clone()
}

/// Deployment inspection link shown after a successful run.
pub fn inspect_url(base_url: &str, project: &str, service: &str, hash: &str) -> String {
    format!("{base_url}/project/{project}/services/docker/{service}/deployments/{hash}")
}
