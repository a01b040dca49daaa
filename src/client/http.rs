use crate::client::wire::{self, Decoded, PosterRequest};
use crate::client::{
    ImageOutput, ImageRequest, PosterOutput, ScriptOutput, StageClient, VideoOutput, VideoRequest,
};
use crate::config::ServiceConfig;
use cinegen_core::{Brief, StageFailure, StageKind, StageResult};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Longest slice of a non-JSON error body quoted in a transport message
const BODY_SNIPPET_LEN: usize = 200;

/// [`StageClient`] backed by the generation service's JSON endpoints.
pub struct HttpStageClient {
    client: Client,
    base_url: String,
}

impl HttpStageClient {
    pub fn new(config: &ServiceConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client with timeout: {}", e);
                Client::new()
            });

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post<B, T>(&self, path: &str, body: &B, stage: StageKind) -> StageResult<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        tracing::debug!("POST {} ({} stage)", url, stage);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| StageFailure::transport(transport_message(stage, &e)))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            StageFailure::transport(format!("Failed to read {} response: {}", stage, e))
        })?;

        match wire::decode::<T>(&text, stage) {
            Decoded::Ok(output) if status.is_success() => Ok(output),
            Decoded::Reported(failure) => {
                tracing::debug!("{} service reported failure ({}): {}", stage, status, failure);
                Err(failure)
            }
            Decoded::Ok(_) => Err(StageFailure::transport(format!(
                "{} request failed with HTTP {}",
                stage, status
            ))),
            Decoded::Malformed(_) if !status.is_success() => {
                Err(StageFailure::transport(format!(
                    "{} request failed with HTTP {}: {}",
                    stage,
                    status,
                    snippet(&text)
                )))
            }
            Decoded::Malformed(message) => Err(StageFailure::service(message, None)),
        }
    }
}

#[async_trait::async_trait]
impl StageClient for HttpStageClient {
    async fn generate_script(&self, brief: &Brief) -> StageResult<ScriptOutput> {
        self.post("/generate_script", brief, StageKind::Script).await
    }

    async fn generate_image(&self, request: &ImageRequest) -> StageResult<ImageOutput> {
        self.post("/generate_image", request, StageKind::Image).await
    }

    async fn generate_video(&self, request: &VideoRequest) -> StageResult<VideoOutput> {
        self.post("/generate_video", request, StageKind::Video).await
    }

    async fn generate_poster(&self, brief: &Brief) -> StageResult<PosterOutput> {
        let request = PosterRequest { movie_data: brief };
        self.post("/generate_poster", &request, StageKind::Poster)
            .await
    }
}

fn transport_message(stage: StageKind, err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("{} request timed out", stage)
    } else if err.is_connect() {
        format!("Could not connect to {} service: {}", stage, err)
    } else {
        format!("{} request failed: {}", stage, err)
    }
}

fn snippet(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(BODY_SNIPPET_LEN) {
        Some((cut, _)) => format!("{}...", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let client = HttpStageClient::new(&ServiceConfig {
            base_url: "http://localhost:5000/".into(),
            timeout_secs: 5,
        });
        assert_eq!(
            client.url("/generate_image"),
            "http://localhost:5000/generate_image"
        );
    }

    #[test]
    fn snippet_truncates_long_bodies() {
        let long = "x".repeat(500);
        let cut = snippet(&long);
        assert_eq!(cut.len(), BODY_SNIPPET_LEN + 3);
        assert!(cut.ends_with("..."));
        assert_eq!(snippet("  short  "), "short");
    }
}
