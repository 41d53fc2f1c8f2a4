use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, RequestBuilder, StatusCode};

use super::stream::EventStream;
use super::Transport;
use crate::config::Config;
use crate::error::ClientError;

/// Board API client. Every request carries the bearer token.
pub struct LichessClient {
    client: Client,
    base_url: String,
    token: String,
}

impl LichessClient {
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        // No overall timeout: the game stream stays open for the whole game.
        let client = Client::builder()
            .user_agent(concat!("board-cli/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            token: config.auth_token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/board/game/{}", self.base_url, path)
    }

    async fn send(
        &self,
        req: RequestBuilder,
        context: &'static str,
    ) -> Result<reqwest::Response, ClientError> {
        let resp = req.bearer_auth(&self.token).send().await?;

        if resp.status() != StatusCode::OK {
            return Err(ClientError::Status {
                context,
                status: resp.status(),
            });
        }
        Ok(resp)
    }
}

#[async_trait]
impl Transport for LichessClient {
    async fn open_stream(&self, game_id: &str) -> Result<EventStream, ClientError> {
        let url = self.url(&format!("stream/{game_id}"));
        tracing::info!(%game_id, "Opening game stream");

        let resp = self
            .send(
                self.client.get(&url).header("Accept", "application/x-ndjson"),
                "Couldn't start streaming",
            )
            .await?;

        let chunks = resp
            .bytes_stream()
            .map(|chunk| chunk.map(|b| b.to_vec()).map_err(ClientError::from));
        Ok(EventStream::new(chunks.boxed()))
    }

    async fn submit_move(&self, game_id: &str, uci: &str) -> Result<(), ClientError> {
        let url = self.url(&format!("{game_id}/move/{uci}"));
        tracing::info!(%game_id, %uci, "Sending move");

        self.send(self.client.post(&url), "Couldn't send the move")
            .await?;
        Ok(())
    }

    async fn resign(&self, game_id: &str) -> Result<(), ClientError> {
        let url = self.url(&format!("{game_id}/resign"));
        tracing::info!(%game_id, "Resigning");

        self.send(self.client.post(&url), "Couldn't send resignation")
            .await?;
        Ok(())
    }
}
