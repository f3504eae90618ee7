//! Icon load attempts
//!
//! After a card's logo `src` is swapped, the icon either loads or it doesn't.
//! An `ImageProbe` performs that attempt once and reports the outcome.

use crate::config::USER_AGENT;
use crate::error::Result;
use reqwest::header::CONTENT_TYPE;
use std::future::Future;
use std::time::Duration;

/// Outcome of one icon load attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageLoad {
    Loaded,
    Failed,
}

/// Performs a single load attempt for an icon URL.
pub trait ImageProbe {
    fn load(&self, url: &str) -> impl Future<Output = ImageLoad> + Send;
}

/// Loads the icon over HTTP.
///
/// A load fails on network errors, timeouts, non-success statuses, empty
/// bodies, and responses that declare a non-image content type.
#[derive(Debug, Clone)]
pub struct HttpImageProbe {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpImageProbe {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self::with_client(client, timeout))
    }

    pub fn with_client(client: reqwest::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }
}

impl ImageProbe for HttpImageProbe {
    fn load(&self, url: &str) -> impl Future<Output = ImageLoad> + Send {
        let client = self.client.clone();
        let timeout = self.timeout;
        let url = url.to_string();

        async move {
            log::debug!("Loading icon: {}", url);

            let attempt = async {
                let response = client.get(&url).send().await.ok()?;
                if !response.status().is_success() {
                    log::debug!("Icon {} returned {}", url, response.status());
                    return None;
                }

                let declared_image = response
                    .headers()
                    .get(CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .map(|ct| ct.trim().to_ascii_lowercase().starts_with("image/"));
                if declared_image == Some(false) {
                    log::debug!("Icon {} is not an image", url);
                    return None;
                }

                let body = response.bytes().await.ok()?;
                (!body.is_empty()).then_some(())
            };

            match tokio::time::timeout(timeout, attempt).await {
                Ok(Some(())) => ImageLoad::Loaded,
                Ok(None) => ImageLoad::Failed,
                Err(_) => {
                    log::debug!("Icon {} timed out", url);
                    ImageLoad::Failed
                }
            }
        }
    }
}

/// Reports every icon as loaded without touching the network
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeLoaded;

impl ImageProbe for AssumeLoaded {
    fn load(&self, _url: &str) -> impl Future<Output = ImageLoad> + Send {
        std::future::ready(ImageLoad::Loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn probe() -> HttpImageProbe {
        HttpImageProbe::with_client(reqwest::Client::new(), Duration::from_secs(2))
    }

    #[tokio::test]
    async fn test_png_response_loads() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/icons/a.png"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(vec![0x89, b'P', b'N', b'G'], "image/png"),
            )
            .mount(&mock_server)
            .await;

        let url = format!("{}/icons/a.png", mock_server.uri());
        assert_eq!(probe().load(&url).await, ImageLoad::Loaded);
    }

    #[tokio::test]
    async fn test_missing_icon_fails() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/icons/gone.png"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let url = format!("{}/icons/gone.png", mock_server.uri());
        assert_eq!(probe().load(&url).await, ImageLoad::Failed);
    }

    #[tokio::test]
    async fn test_html_response_fails() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/icons/a.png"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(b"<html></html>".to_vec(), "text/html"),
            )
            .mount(&mock_server)
            .await;

        let url = format!("{}/icons/a.png", mock_server.uri());
        assert_eq!(probe().load(&url).await, ImageLoad::Failed);
    }

    #[tokio::test]
    async fn test_slow_icon_fails() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/icons/slow.png"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(vec![1, 2, 3], "image/png")
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&mock_server)
            .await;

        let probe = HttpImageProbe::with_client(reqwest::Client::new(), Duration::from_millis(100));
        let url = format!("{}/icons/slow.png", mock_server.uri());
        assert_eq!(probe.load(&url).await, ImageLoad::Failed);
    }

    #[tokio::test]
    async fn test_assume_loaded() {
        assert_eq!(
            AssumeLoaded.load("https://cdn.example/a.png").await,
            ImageLoad::Loaded
        );
    }
}
