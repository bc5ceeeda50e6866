//! Configuration sources
//!
//! The same client is driven either by plain environment variables or
//! by the `INPUT_*` variables a CI runner exports for declared action
//! inputs. Both go through one trait so resolution and validation are
//! shared.

use std::env;

/// A configuration value recognized by the trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    Username,
    Password,
    ProjectSlug,
    ServiceSlug,
    ServiceImage,
    DashboardBaseUrl,
    CommitMessage,
    ExtraHeaders,
    WebhookUrl,
}

impl ConfigKey {
    /// Human-readable name used in configuration errors.
    pub fn describe(self) -> &'static str {
        match self {
            ConfigKey::Username => "username",
            ConfigKey::Password => "password",
            ConfigKey::ProjectSlug => "project slug",
            ConfigKey::ServiceSlug => "service slug",
            ConfigKey::ServiceImage => "service image",
            ConfigKey::DashboardBaseUrl => "dashboard base URL",
            ConfigKey::CommitMessage => "commit message",
            ConfigKey::ExtraHeaders => "extra headers",
            ConfigKey::WebhookUrl => "webhook URL",
        }
    }

    /// Environment variable read by [`EnvSource`].
    pub fn env_var(self) -> &'static str {
        match self {
            ConfigKey::Username => "ZANE_USERNAME",
            ConfigKey::Password => "ZANE_PASSWORD",
            ConfigKey::ProjectSlug => "ZANE_PROJECT_SLUG",
            ConfigKey::ServiceSlug => "ZANE_SERVICE_SLUG",
            ConfigKey::ServiceImage => "SERVICE_IMAGE",
            ConfigKey::DashboardBaseUrl => "ZANE_DASHBOARD_BASE_URL",
            ConfigKey::CommitMessage => "COMMIT_MESSAGE",
            ConfigKey::ExtraHeaders => "EXTRA_HEADERS",
            ConfigKey::WebhookUrl => "DEPLOY_WEBHOOK_URL",
        }
    }

    /// CI input variable read by [`CiInputSource`].
    pub fn input_var(self) -> &'static str {
        match self {
            ConfigKey::Username => "INPUT_USERNAME",
            ConfigKey::Password => "INPUT_PASSWORD",
            ConfigKey::ProjectSlug => "INPUT_PROJECT_SLUG",
            ConfigKey::ServiceSlug => "INPUT_SERVICE_SLUG",
            ConfigKey::ServiceImage => "INPUT_SERVICE_IMAGE",
            ConfigKey::DashboardBaseUrl => "INPUT_DASHBOARD_BASE_URL",
            ConfigKey::CommitMessage => "INPUT_COMMIT_MESSAGE",
            ConfigKey::ExtraHeaders => "INPUT_EXTRA_HEADERS",
            ConfigKey::WebhookUrl => "INPUT_WEBHOOK_URL",
        }
    }
}

/// Where configuration values come from.
pub trait ConfigSource {
    fn get(&self, key: ConfigKey) -> Option<String>;
}

/// Reads `ZANE_*`-style process environment variables.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSource;

impl ConfigSource for EnvSource {
    fn get(&self, key: ConfigKey) -> Option<String> {
        non_empty(env::var(key.env_var()).ok())
    }
}

/// Reads `INPUT_<NAME>` variables exported by the CI runner.
#[derive(Debug, Clone, Copy, Default)]
pub struct CiInputSource;

impl ConfigSource for CiInputSource {
    fn get(&self, key: ConfigKey) -> Option<String> {
        non_empty(env::var(key.input_var()).ok())
    }
}

// Unset and empty are equivalent: CI runners export declared inputs as
// empty strings when the caller omits them.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
