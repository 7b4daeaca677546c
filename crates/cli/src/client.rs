//! Blocking RPC client for a running rightsizing server

use anyhow::{bail, Context, Result};
use rightsizing_server::wire::{
    ErrorBody, ForecastRequest, ForecastResponse, RightsizingRequest, RightsizingResponse,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

const FORECAST_PATH: &str = "/api/v1/forecast";
const RIGHTSIZING_PATH: &str = "/api/v1/rightsizing";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

pub struct RpcClient {
    base_url: String,
    http: reqwest::blocking::Client,
}

impl RpcClient {
    /// Client for a server at `base_url`, e.g. `http://localhost:50051`
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn forecast(&self, request: &ForecastRequest) -> Result<ForecastResponse> {
        self.call(FORECAST_PATH, request)
    }

    pub fn rightsizing(&self, request: &RightsizingRequest) -> Result<RightsizingResponse> {
        self.call(RIGHTSIZING_PATH, request)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn call<Req, Resp>(&self, path: &str, request: &Req) -> Result<Resp>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let url = self.url(path);
        tracing::debug!(%url, "sending request");

        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .with_context(|| format!("request to {} failed", url))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<Resp>()
                .with_context(|| format!("invalid response from {}", url));
        }

        let text = response.text().unwrap_or_default();
        match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => bail!("{} ({}): {}", status, body.code, body.error),
            Err(_) => bail!("{}: {}", status, text),
        }
    }
}
