//! Run configuration and validation
//!
//! Everything is resolved once at startup, before the first network
//! call, and is immutable for the rest of the run.

pub mod source;

use http::header::{HeaderMap, HeaderName, HeaderValue};
use secrecy::SecretString;
use url::Url;

use crate::errors::TriggerError;

use self::source::{ConfigKey, ConfigSource};

/// Operator credentials for the dashboard login.
#[derive(Debug)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

/// The deployable unit being updated.
#[derive(Debug)]
pub struct ServiceTarget {
    pub project_slug: String,
    pub service_slug: String,
    pub image: String,
}

/// Full-pipeline configuration: handshake plus the two mutation calls.
#[derive(Debug)]
pub struct DeployConfig {
    pub base_url: String,
    pub credentials: Credentials,
    pub target: ServiceTarget,
    pub commit_message: String,
    pub extra_headers: HeaderMap,
}

/// Webhook-only configuration: one pre-authenticated PUT, no handshake.
#[derive(Debug)]
pub struct WebhookConfig {
    pub url: String,
    pub image: String,
    pub commit_message: String,
    pub extra_headers: HeaderMap,
}

/// The resolved run mode.
#[derive(Debug)]
pub enum RunMode {
    Deploy(DeployConfig),
    Webhook(WebhookConfig),
}

/// Resolve and validate the run configuration from a source.
///
/// A configured webhook URL selects webhook-only mode. Otherwise the
/// full deploy pipeline is configured: credentials, slugs, image and
/// dashboard URL are all required.
pub fn resolve(source: &dyn ConfigSource) -> Result<RunMode, TriggerError> {
    let image = require_value(source, ConfigKey::ServiceImage)?;
    let commit_message = source
        .get(ConfigKey::CommitMessage)
        .unwrap_or_else(|| default_commit_message(commit_sha().as_deref()));
    let extra_headers = parse_extra_headers(source.get(ConfigKey::ExtraHeaders).as_deref());

    if let Some(webhook_url) = source.get(ConfigKey::WebhookUrl) {
        let url = parse_absolute_url(&webhook_url, ConfigKey::WebhookUrl)?;
        return Ok(RunMode::Webhook(WebhookConfig {
            url,
            image,
            commit_message,
            extra_headers,
        }));
    }

    let username = require_value(source, ConfigKey::Username)?;
    let password = SecretString::from(require_value(source, ConfigKey::Password)?);
    let project_slug = require_slug(source, ConfigKey::ProjectSlug)?;
    let service_slug = require_slug(source, ConfigKey::ServiceSlug)?;
    let base_url = parse_absolute_url(
        &require_value(source, ConfigKey::DashboardBaseUrl)?,
        ConfigKey::DashboardBaseUrl,
    )?;

    Ok(RunMode::Deploy(DeployConfig {
        base_url,
        credentials: Credentials { username, password },
        target: ServiceTarget {
            project_slug,
            service_slug,
            image,
        },
        commit_message,
        extra_headers,
    }))
}

/// Slugs may contain letters, digits, hyphens and underscores only.
pub fn is_valid_slug(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Default commit message when none is configured.
pub fn default_commit_message(sha: Option<&str>) -> String {
    format!("auto-deploy from commit {}", sha.unwrap_or("unknown"))
}

/// Parse the optional extra-headers JSON object.
///
/// Malformed JSON, non-string values and invalid header names are all
/// treated as an empty set, never as an error.
pub fn parse_extra_headers(raw: Option<&str>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let Some(raw) = raw else {
        return headers;
    };
    let Ok(map) = serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(raw) else {
        return headers;
    };
    for (name, value) in map {
        let Some(value) = value.as_str() else { continue };
        let (Ok(name), Ok(value)) = (
            HeaderName::try_from(name.as_str()),
            HeaderValue::from_str(value),
        ) else {
            continue;
        };
        headers.insert(name, value);
    }
    headers
}

fn require_value(source: &dyn ConfigSource, key: ConfigKey) -> Result<String, TriggerError> {
    source.get(key).ok_or_else(|| {
        TriggerError::ConfigError(format!(
            "missing {}: set {} (or {} as a CI input)",
            key.describe(),
            key.env_var(),
            key.input_var()
        ))
    })
}

fn require_slug(source: &dyn ConfigSource, key: ConfigKey) -> Result<String, TriggerError> {
    let value = require_value(source, key)?;
    if !is_valid_slug(&value) {
        return Err(TriggerError::ConfigError(format!(
            "invalid {}: `{}` is not a valid slug",
            key.describe(),
            value
        )));
    }
    Ok(value)
}

fn parse_absolute_url(raw: &str, key: ConfigKey) -> Result<String, TriggerError> {
    let url = Url::parse(raw)
        .map_err(|e| TriggerError::ConfigError(format!("invalid {} `{}`: {}", key.describe(), raw, e)))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(TriggerError::ConfigError(format!(
            "invalid {} `{}`: expected an http(s) URL",
            key.describe(),
            raw
        )));
    }
    Ok(raw.trim_end_matches('/').to_string())
}

// The runner's commit identifier: GITHUB_SHA on hosted CI, COMMIT_SHA otherwise.
fn commit_sha() -> Option<String> {
    std::env::var("GITHUB_SHA")
        .ok()
        .filter(|v| !v.is_empty())
        .or_else(|| std::env::var("COMMIT_SHA").ok().filter(|v| !v.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeSource(Vec<(ConfigKey, &'static str)>);

    impl ConfigSource for FakeSource {
        fn get(&self, key: ConfigKey) -> Option<String> {
            self.0
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v).to_string())
        }
    }

    fn full_deploy_source() -> FakeSource {
        FakeSource(vec![
            (ConfigKey::Username, "deployer"),
            (ConfigKey::Password, "hunter2"),
            (ConfigKey::ProjectSlug, "sandbox"),
            (ConfigKey::ServiceSlug, "api"),
            (ConfigKey::ServiceImage, "ghcr.io/acme/api:1.2.3"),
            (ConfigKey::DashboardBaseUrl, "https://dash.example.com/"),
        ])
    }

    #[test]
    fn test_resolve_deploy_mode() {
        let mode = resolve(&full_deploy_source()).unwrap();
        let RunMode::Deploy(config) = mode else {
            panic!("expected deploy mode");
        };
        assert_eq!(config.base_url, "https://dash.example.com");
        assert_eq!(config.credentials.username, "deployer");
        assert_eq!(config.target.project_slug, "sandbox");
        assert_eq!(config.target.service_slug, "api");
        assert_eq!(config.target.image, "ghcr.io/acme/api:1.2.3");
        assert!(config.commit_message.starts_with("auto-deploy from commit"));
    }

    #[test]
    fn test_resolve_requires_credentials() {
        let mut entries = full_deploy_source().0;
        entries.retain(|(k, _)| *k != ConfigKey::Password);
        let err = resolve(&FakeSource(entries)).unwrap_err();
        assert!(err.to_string().contains("password"));
    }

    #[test]
    fn test_slug_charset() {
        assert!(is_valid_slug("my-service_2"));
        assert!(is_valid_slug("API"));
        assert!(!is_valid_slug("my service"));
        assert!(!is_valid_slug("a/b"));
        assert!(!is_valid_slug(""));
    }

    #[test]
    fn test_resolve_rejects_bad_slug() {
        let mut entries = full_deploy_source().0;
        entries.retain(|(k, _)| *k != ConfigKey::ServiceSlug);
        entries.push((ConfigKey::ServiceSlug, "api/v1"));
        let err = resolve(&FakeSource(entries)).unwrap_err();
        assert!(err.to_string().contains("not a valid slug"));
    }

    #[test]
    fn test_resolve_rejects_bad_url() {
        let mut entries = full_deploy_source().0;
        entries.retain(|(k, _)| *k != ConfigKey::DashboardBaseUrl);
        entries.push((ConfigKey::DashboardBaseUrl, "dash.example.com"));
        assert!(resolve(&FakeSource(entries)).is_err());
    }

    #[test]
    fn test_webhook_url_selects_webhook_mode() {
        let mode = resolve(&FakeSource(vec![
            (ConfigKey::ServiceImage, "ghcr.io/acme/api:1.2.3"),
            (ConfigKey::WebhookUrl, "https://dash.example.com/hooks/deploy/wh_123"),
        ]))
        .unwrap();
        let RunMode::Webhook(config) = mode else {
            panic!("expected webhook mode");
        };
        assert_eq!(config.url, "https://dash.example.com/hooks/deploy/wh_123");
        assert_eq!(config.image, "ghcr.io/acme/api:1.2.3");
    }

    #[test]
    fn test_default_commit_message() {
        assert_eq!(
            default_commit_message(Some("abc123")),
            "auto-deploy from commit abc123"
        );
        assert_eq!(
            default_commit_message(None),
            "auto-deploy from commit unknown"
        );
    }

    #[test]
    fn test_extra_headers_object() {
        let headers =
            parse_extra_headers(Some(r#"{"x-proxy-token": "tok", "x-trace": "abc"}"#));
        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("x-proxy-token").unwrap(), "tok");
    }

    #[test]
    fn test_malformed_extra_headers_are_empty() {
        assert!(parse_extra_headers(Some("not json")).is_empty());
        assert!(parse_extra_headers(Some(r#"["array"]"#)).is_empty());
        assert!(parse_extra_headers(None).is_empty());
    }

    #[test]
    fn test_extra_headers_skip_invalid_entries() {
        let headers = parse_extra_headers(Some(
            r#"{"x-ok": "yes", "bad header": "no", "x-num": 3}"#,
        ));
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("x-ok").unwrap(), "yes");
    }
}
