//! ZaneOps Deploy Trigger - Entry Point
//!
//! A short-lived client for CI pipelines: log in to the dashboard,
//! stage the service's new image, queue a deployment, exit 0 or 1.

use std::collections::HashMap;
use std::env;

use tracing::error;

use zane_trigger::app::options::AppOptions;
use zane_trigger::app::run::run;
use zane_trigger::config::source::{CiInputSource, EnvSource};
use zane_trigger::config::{self, RunMode};
use zane_trigger::errors::TriggerError;
use zane_trigger::logs::{init_logging, LogLevel, LogOptions};
use zane_trigger::report;
use zane_trigger::utils::version_info;

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut cli_args: HashMap<String, String> = HashMap::new();

    for arg in args.iter().skip(1) {
        if let Some((key, value)) = arg.split_once('=') {
            // Handle --key=value format
            let clean_key = key.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), value.to_string());
        } else if arg.starts_with("--") {
            // Handle standalone flags like --version
            let clean_key = arg.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), "true".to_string());
        }
    }

    // Print version and exit
    if cli_args.contains_key("version") {
        match serde_json::to_string_pretty(&version_info()) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("{e}"),
        }
        return;
    }

    // Initialize logging
    let log_level = cli_args
        .get("log-level")
        .and_then(|v| v.parse::<LogLevel>().ok())
        .unwrap_or_default();
    let log_options = LogOptions {
        log_level,
        json_format: cli_args.contains_key("log-json"),
    };
    if let Err(e) = init_logging(log_options) {
        println!("Failed to initialize logging: {e}");
    }

    // Resolve configuration: explicit --source flag first, then the CI
    // runner's input convention when running as an action.
    let mode = resolve_mode(cli_args.get("source").map(String::as_str));
    let mode = match mode {
        Ok(mode) => mode,
        Err(e) => {
            error!("Invalid configuration: {e}");
            report::failure(&e);
            std::process::exit(1);
        }
    };

    let options = AppOptions { mode };
    match run(options).await {
        Ok(outcome) => {
            if let Some(deployment) = &outcome.deployment {
                if let Ok(json) = serde_json::to_string_pretty(deployment) {
                    println!("{json}");
                }
            }
            report::success(outcome.inspect_url.as_deref());
        }
        Err(e) => {
            error!("Deploy trigger failed: {e}");
            report::failure(&e);
            std::process::exit(1);
        }
    }
}

fn resolve_mode(source_flag: Option<&str>) -> Result<RunMode, TriggerError> {
    match source_flag {
        Some("inputs") => config::resolve(&CiInputSource),
        Some("env") => config::resolve(&EnvSource),
        Some(other) => Err(TriggerError::ConfigError(format!(
            "unknown configuration source `{other}` (expected `env` or `inputs`)"
        ))),
        None => {
            if env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true") {
                config::resolve(&CiInputSource)
            } else {
                config::resolve(&EnvSource)
            }
        }
    }
}
