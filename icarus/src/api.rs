use crate::api_trait::{Authority, MoveOutcome};
use crate::config::Config;
use crate::error::{MazeError, Result};
use crate::maze::{Direction, Survey};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

/// HTTP client for a maze authority speaking the daedalus protocol.
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: Config,
    client: reqwest::Client,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Reply {
    #[serde(default, alias = "Survey")]
    survey: Survey,
    #[serde(default, alias = "Victory")]
    victory: bool,
    #[serde(default, alias = "Message")]
    message: String,
    #[serde(default, alias = "Error")]
    error: Option<String>,
}

impl Reply {
    fn into_outcome(self, endpoint: &str) -> Result<MoveOutcome> {
        if let Some(error) = self.error.filter(|e| !e.is_empty()) {
            return Err(MazeError::transport(endpoint, error));
        }
        if self.victory {
            let message = Some(self.message).filter(|m| !m.is_empty());
            Ok(MoveOutcome::Victory {
                survey: self.survey,
                message,
            })
        } else {
            Ok(MoveOutcome::Continue(self.survey))
        }
    }
}

pub(crate) fn decode_reply(endpoint: &str, body: &[u8]) -> Result<Reply> {
    serde_json::from_slice(body)
        .map_err(|e| MazeError::transport(endpoint, format!("Undecodable reply: {}", e)))
}

impl ApiClient {
    pub fn new(config: Config) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.move_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| MazeError::transport(&config.base_url, e))?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Moves by raw token, rejecting anything but the four directions
    /// before contacting the authority.
    pub async fn step_named(&self, token: &str) -> Result<MoveOutcome> {
        let direction: Direction = token.parse()?;
        self.step(direction).await
    }

    /// Fetches `path` and returns the full URL used together with the body,
    /// so every error names the same endpoint form.
    async fn request(&self, path: &str) -> Result<(String, Vec<u8>)> {
        let url = self.config.endpoint(path);
        debug!(%url, "Calling authority");

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                MazeError::transport(&url, "Request timed out")
            } else {
                MazeError::transport(&url, e)
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(MazeError::transport(
                &url,
                format!("Authority returned status {}: {}", status, text),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| MazeError::transport(&url, e))?;
        Ok((url, body.to_vec()))
    }
}

#[async_trait]
impl Authority for ApiClient {
    async fn awake(&self) -> Result<Survey> {
        let (url, body) = self.request("awake").await?;
        let reply = decode_reply(&url, &body)?;
        match reply.error.filter(|e| !e.is_empty()) {
            Some(error) => Err(MazeError::transport(url, error)),
            None => Ok(reply.survey),
        }
    }

    async fn step(&self, direction: Direction) -> Result<MoveOutcome> {
        let path = format!("move/{}", direction.as_str());
        let (url, body) = self.request(&path).await?;
        let outcome = decode_reply(&url, &body)?.into_outcome(&url)?;
        if let MoveOutcome::Victory {
            message: Some(message),
            ..
        } = &outcome
        {
            info!("{}", message);
        }
        Ok(outcome)
    }

    async fn done(&self) -> Result<()> {
        self.request("done").await.map(|_| ())
    }
}
