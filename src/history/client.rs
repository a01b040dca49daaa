use super::types::{MovieDetail, MovieSummary};
use crate::config::ServiceConfig;
use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

/// History calls are plain reads, so they get a short timeout of their own.
const HISTORY_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(flatten)]
    body: Option<T>,
}

#[derive(Debug, Deserialize)]
struct MovieList {
    movies: Vec<MovieSummary>,
}

#[derive(Debug, Deserialize)]
struct MovieRecord {
    movie: MovieDetail,
}

#[derive(Debug, Deserialize)]
struct Empty {}

/// Client for the movie history endpoints.
pub struct HistoryClient {
    client: Client,
    base_url: String,
}

impl HistoryClient {
    pub fn new(config: &ServiceConfig) -> Self {
        let client = Client::builder()
            .timeout(HISTORY_TIMEOUT)
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
        format!("{}/api/movies{}", self.base_url, path)
    }

    pub async fn list(&self) -> Result<Vec<MovieSummary>> {
        let list: MovieList = self
            .send(self.client.get(self.url("")), "Failed to load movies")
            .await?;
        tracing::debug!("Loaded {} movies", list.movies.len());
        Ok(list.movies)
    }

    pub async fn get(&self, id: &str) -> Result<MovieDetail> {
        let record: MovieRecord = self
            .send(
                self.client.get(self.url(&format!("/{}", id))),
                "Failed to load movie details",
            )
            .await?;
        Ok(record.movie)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let _: Empty = self
            .send(
                self.client.delete(self.url(&format!("/{}/delete", id))),
                "Failed to delete movie",
            )
            .await?;
        tracing::info!("Deleted movie {}", id);
        Ok(())
    }

    /// Where the finished video for `id` can be downloaded.
    pub fn download_url(&self, id: &str) -> String {
        self.url(&format!("/{}/download", id))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        context_msg: &str,
    ) -> Result<T> {
        let response = request.send().await.context(context_msg.to_string())?;
        let status = response.status();
        let text = response.text().await.context(context_msg.to_string())?;

        let envelope: Envelope<T> = serde_json::from_str(&text).with_context(|| {
            format!("{}: unexpected response (HTTP {})", context_msg, status)
        })?;

        if !envelope.success {
            let error = envelope
                .error
                .unwrap_or_else(|| format!("HTTP {}", status));
            anyhow::bail!("{}: {}", context_msg, error);
        }
        envelope
            .body
            .with_context(|| format!("{}: response is missing its payload", context_msg))
    }
}
