// src/sources/http.rs
use std::time::Duration;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use crate::config::HttpConfig;

/// Shared GET client for all adapters: browser user agent, fixed timeout,
/// bounded redirects, non-2xx treated as an error.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
}

impl HttpClient {
    pub fn new(cfg: &HttpConfig) -> Result<Self> {
        Self::with_max_redirects(cfg, cfg.max_redirects)
    }

    pub fn with_max_redirects(cfg: &HttpConfig, max_redirects: usize) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .user_agent(cfg.user_agent.as_str())
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(max_redirects))
            .build()
            .context("building http client")?;
        Ok(Self { inner })
    }

    pub async fn get_text(&self, url: &str) -> Result<String> {
        self.get(url, None).await
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let body = self.get(url, Some("application/json")).await?;
        serde_json::from_str(&body).with_context(|| format!("decoding json from {url}"))
    }

    async fn get(&self, url: &str, accept: Option<&str>) -> Result<String> {
        let mut req = self.inner.get(url);
        if let Some(accept) = accept {
            req = req.header(reqwest::header::ACCEPT, accept);
        }
        let resp = req
            .send()
            .await
            .with_context(|| format!("GET {url}"))?
            .error_for_status()
            .with_context(|| format!("GET {url}"))?;
        resp.text()
            .await
            .with_context(|| format!("reading body of {url}"))
    }
}
