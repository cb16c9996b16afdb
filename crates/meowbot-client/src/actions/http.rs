use std::time::Duration;

use async_trait::async_trait;

use meowbot_core::error::{MeowError, Result};
use meowbot_core::protocol::ActionRequest;

use super::ActionSubmitter;
use crate::config::ActionsSection;

/// Posts actions to the backend's HTTP API:
/// `POST {base_url}/v1/LuaApiCaller?qq={bot_uin}&funcname={endpoint}&timeout={secs}`.
pub struct HttpActionSubmitter {
    http: reqwest::Client,
    call_url: String,
    bot_uin: i64,
    timeout_secs: u64,
}

impl HttpActionSubmitter {
    pub fn new(cfg: &ActionsSection) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()
            .map_err(|e| MeowError::Internal(format!("http client build failed: {e}")))?;
        Ok(Self {
            http,
            call_url: format!("{}/v1/LuaApiCaller", cfg.base_url.trim_end_matches('/')),
            bot_uin: cfg.bot_uin,
            timeout_secs: (cfg.timeout_ms / 1000).max(1),
        })
    }

    pub fn call_url(&self) -> &str {
        &self.call_url
    }
}

#[async_trait]
impl ActionSubmitter for HttpActionSubmitter {
    async fn submit(&self, req: &ActionRequest) -> Result<String> {
        let endpoint = req.endpoint.as_str();
        let resp = self
            .http
            .post(&self.call_url)
            .query(&[
                ("qq", self.bot_uin.to_string()),
                ("funcname", endpoint.to_string()),
                ("timeout", self.timeout_secs.to_string()),
            ])
            .json(&req.body)
            .send()
            .await
            .map_err(|e| MeowError::ActionSubmission(format!("{endpoint}: {e}")))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| MeowError::ActionSubmission(format!("{endpoint}: read body: {e}")))?;

        if !status.is_success() {
            return Err(MeowError::ActionSubmission(format!(
                "{endpoint}: http {status}: {text}"
            )));
        }

        tracing::debug!(endpoint = %endpoint, status = %status, "action submitted");
        Ok(text)
    }
}
