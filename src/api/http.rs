//! reqwest-backed [`Fetch`] transport for the headless runner.

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use super::{ApiError, ApiRequest, ApiResponse, Fetch, Method};

/// Sends requests to a fixed backend origin.
#[derive(Clone)]
pub struct HttpFetch {
    client: Client,
    base_url: Url,
}

impl HttpFetch {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base_url =
            Url::parse(base_url).map_err(|e| ApiError::Transport(format!("{base_url}: {e}")))?;
        let client = Client::builder()
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl Fetch for HttpFetch {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = self
            .base_url
            .join(&request.path)
            .map_err(|e| ApiError::Transport(format!("{}: {}", request.path, e)))?;

        let builder = match request.method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
            Method::Delete => self.client.delete(url),
        };
        let builder = match &request.body {
            Some(body) => builder.json(body),
            None => builder.header(reqwest::header::CONTENT_TYPE, "application/json"),
        };

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        tracing::debug!("{} {} -> {}", request.method.as_str(), request.path, status);
        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unparseable_base_url() {
        assert!(matches!(
            HttpFetch::new("not a url"),
            Err(ApiError::Transport(_))
        ));
    }

    #[test]
    fn joins_absolute_api_paths_onto_origin() {
        let fetch = HttpFetch::new("http://display.local:5000/ignored/").unwrap();
        let url = fetch.base_url().join("/api/alerts").unwrap();
        assert_eq!(url.as_str(), "http://display.local:5000/api/alerts");
    }
}
