//! HTTP client for the logo generation backend.

use crate::error::OpError;
use crate::image::RenderedLogo;
use crate::model::{
    ApiRequest, AppConfig, ErrorBody, GenerateRequest, Generation, GenerationResponse, Operation,
    RefineRequest,
};
use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, warn};

/// Thin wrapper over a shared `reqwest::Client`. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct LogoClient {
    http: reqwest::Client,
    base_url: String,
}

impl LogoClient {
    pub fn new(cfg: &AppConfig) -> Result<Self> {
        // No request timeout; only the transport defaults apply.
        let http = reqwest::Client::builder()
            .user_agent(cfg.user_agent.clone())
            .build()
            .context("build HTTP client")?;
        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, op: Operation) -> String {
        format!("{}/{}", self.base_url, op.endpoint())
    }

    pub async fn execute(&self, req: &ApiRequest) -> Result<Generation, OpError> {
        match req {
            ApiRequest::Generate(r) => self.generate(r).await,
            ApiRequest::Refine(r) => self.refine(r).await,
        }
    }

    pub async fn generate(&self, req: &GenerateRequest) -> Result<Generation, OpError> {
        self.post(Operation::Generate, req).await
    }

    pub async fn refine(&self, req: &RefineRequest) -> Result<Generation, OpError> {
        self.post(Operation::Refine, req).await
    }

    async fn post<B: Serialize>(&self, op: Operation, body: &B) -> Result<Generation, OpError> {
        let url = self.endpoint(op);
        debug!(%url, "sending request");

        let resp = self.http.post(&url).json(body).send().await?;
        let status = resp.status();
        let raw = resp.bytes().await?;

        if !status.is_success() {
            // A non-JSON error body is treated the same as a JSON body without `error`.
            let message = serde_json::from_slice::<ErrorBody>(&raw)
                .ok()
                .and_then(|b| b.error);
            warn!(%url, status = status.as_u16(), ?message, "backend rejected request");
            return Err(OpError::Backend {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerationResponse = serde_json::from_slice(&raw)
            .map_err(|e| OpError::Malformed(format!("unexpected response body: {e}")))?;
        let logo = RenderedLogo::from_base64(&parsed.image)?;
        debug!(
            %url,
            seed = %parsed.seed,
            width = logo.width,
            height = logo.height,
            "received logo"
        );

        Ok(Generation {
            prompt: parsed.prompt,
            seed: parsed.seed,
            logo,
        })
    }
}
