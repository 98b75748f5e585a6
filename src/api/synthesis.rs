use crate::config::RemoteConfig;
use crate::error::MenuError;
use crate::types::synthesis::{AudioRequest, RemoteReply, TokenRequest};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Client for the token issuance and speech synthesis endpoints.
///
/// Both calls are a JSON `PUT` answered by `{code, message}`. A non-200 `code`
/// is returned as a reply, not an error; transport failures, decode failures
/// and HTTP error pages without the envelope surface as `MenuError`. Nothing is retried.
#[derive(Clone)]
pub struct SynthesisClient {
    http: reqwest::Client,
    token_url: Url,
    audio_url: Option<Url>,
}

impl SynthesisClient {
    /// Build the client with fixed connect/read timeouts and an optional proxy.
    pub fn new(cfg: &RemoteConfig) -> Result<Self, MenuError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("menuannam/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
            .timeout(Duration::from_secs(cfg.timeout_secs));
        if let Some(proxy_url) = cfg.proxy.as_ref() {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url.as_str())?);
        }
        let http = builder.build()?;
        Ok(Self::with_client(
            http,
            cfg.token_url.clone(),
            cfg.audio_url.clone(),
        ))
    }

    pub fn with_client(http: reqwest::Client, token_url: Url, audio_url: Option<Url>) -> Self {
        Self {
            http,
            token_url,
            audio_url,
        }
    }

    /// Ask the service to send a token to `email`. The token arrives out-of-band.
    pub async fn issue_token(&self, email: &str) -> Result<RemoteReply, MenuError> {
        let body = TokenRequest {
            email: email.to_string(),
        };
        let reply = self.put(self.token_url.clone(), &body).await?;
        info!(email, code = reply.code, "token request answered");
        Ok(reply)
    }

    /// Request speech for `word`; on success the message is base64 MP3.
    pub async fn synthesize(
        &self,
        word: &str,
        email: &str,
        token: &str,
    ) -> Result<RemoteReply, MenuError> {
        let url = self.audio_url.clone().ok_or_else(|| {
            MenuError::InvalidInput("Audio endpoint is not configured".to_string())
        })?;
        let body = AudioRequest {
            word: word.to_string(),
            email: email.to_string(),
            token: token.to_string(),
        };
        let reply = self.put(url, &body).await?;
        info!(word, code = reply.code, "synthesis request answered");
        Ok(reply)
    }

    async fn put<T: Serialize>(&self, url: Url, body: &T) -> Result<RemoteReply, MenuError> {
        let resp = self.http.put(url).json(body).send().await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;

        match serde_json::from_slice::<RemoteReply>(&bytes) {
            Ok(reply) => {
                debug!(%status, code = reply.code, "remote reply decoded");
                Ok(reply)
            }
            // Only a decoded envelope can reject a token; a bare error page cannot.
            Err(e) if !status.is_success() => {
                warn!(%status, error = %e, "remote error without reply envelope");
                Err(MenuError::RemoteStatus(status))
            }
            Err(e) => Err(e.into()),
        }
    }
}
