//! Modrinth API client for project icon lookups
//!
//! Uses async reqwest. Each lookup runs under its own deadline; when it fires
//! the in-flight request future is dropped, which cancels it.

use crate::config::{HydratorConfig, USER_AGENT};
use crate::error::{HydrateError, Result};
use reqwest::header::ACCEPT;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::time::Duration;

/// Modrinth project response, trimmed to the one field we read.
///
/// Only a JSON object is a project; any other body shape fails to decode.
/// An `icon_url` that is present but not a JSON string reads as `None`.
#[derive(Debug, Clone, Default)]
pub struct ModrinthProject {
    pub icon_url: Option<String>,
}

impl ModrinthProject {
    /// Icon URL, if the project has a non-empty one
    pub fn icon_url(&self) -> Option<&str> {
        self.icon_url.as_deref().filter(|url| !url.is_empty())
    }
}

impl<'de> Deserialize<'de> for ModrinthProject {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Object(fields) => Ok(Self {
                icon_url: fields
                    .get("icon_url")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            }),
            other => Err(D::Error::custom(format!(
                "expected a project object, got {}",
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Project lookup client
#[derive(Debug, Clone)]
pub struct ModrinthClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl ModrinthClient {
    /// Build a client from the hydrator settings
    pub fn new(config: &HydratorConfig) -> Result<Self> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self::with_client(client, &config.api_base, config.timeout))
    }

    /// Wrap an existing reqwest client
    pub fn with_client(client: reqwest::Client, base_url: &str, timeout: Duration) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Lookup URL for a slug, with the slug percent-encoded as one path segment
    pub fn project_url(&self, slug: &str) -> String {
        format!("{}/project/{}", self.base_url, urlencoding::encode(slug))
    }

    /// Fetch a project by slug.
    ///
    /// The deadline covers sending the request and reading the body. No retries.
    pub async fn fetch_project(&self, slug: &str) -> Result<ModrinthProject> {
        let url = self.project_url(slug);
        log::debug!("Fetching project from Modrinth: {}", url);

        let lookup = async {
            let response = self
                .client
                .get(&url)
                .header(ACCEPT, "application/json")
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(HydrateError::HttpStatus(status));
            }

            let body = response.bytes().await?;
            Ok(serde_json::from_slice::<ModrinthProject>(&body)?)
        };

        match tokio::time::timeout(self.timeout, lookup).await {
            Ok(result) => result,
            Err(_) => Err(HydrateError::Timeout(self.timeout.as_millis())),
        }
    }
}

#[cfg(test)]
#[path = "modrinth_tests.rs"]
mod tests;
