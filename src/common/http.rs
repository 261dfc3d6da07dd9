use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, header::HeaderMap};
use tracing::debug;

use crate::common::errors::{Result, SummaryError};

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/134.0.0.0 Safari/537.36";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Performs a GET request and hands back the body text.
#[async_trait]
pub trait Transport: Send + Sync {
  async fn get(&self, url: &str, headers: &HeaderMap) -> Result<String>;
}

pub struct HttpClient;

impl HttpClient {
  pub fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
  }

  pub fn new(user_agent: &str, timeout: Duration) -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
      .user_agent(user_agent)
      .timeout(timeout)
      .build()
  }
}

/// [`Transport`] backed by a shared reqwest client.
#[derive(Clone)]
pub struct HttpTransport {
  client: Client,
}

impl HttpTransport {
  pub fn new(client: Client) -> Self {
    Self { client }
  }
}

#[async_trait]
impl Transport for HttpTransport {
  async fn get(&self, url: &str, headers: &HeaderMap) -> Result<String> {
    let resp = self
      .client
      .get(url)
      .headers(headers.clone())
      .send()
      .await
      .map_err(|e| SummaryError::transport(url, e))?;

    let status = resp.status();
    if !status.is_success() {
      return Err(SummaryError::transport(url, format!("HTTP status {}", status)));
    }

    let body = resp
      .text()
      .await
      .map_err(|e| SummaryError::transport(url, e))?;
    debug!("HTTP GET {} - Status: {}", url, status.as_u16());
    Ok(body)
  }
}
