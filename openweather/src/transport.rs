use async_trait::async_trait;
use reqwest::Client;
use std::{fmt::Debug, time::Duration};
use tokio::sync::OnceCell;
use tracing::debug;

use crate::{error::TransportError, query::QueryParams};

/// Performs a GET and hands back the raw response body.
///
/// Implementations must turn non-2xx responses into [`TransportError::Status`]
/// rather than returning the body.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    async fn get(&self, url: &str, query: &QueryParams) -> Result<String, TransportError>;
}

/// Default transport over `reqwest`.
///
/// The underlying client is built on the first request and shared by every
/// request after that.
#[derive(Debug, Default)]
pub struct HttpTransport {
    timeout: Option<Duration>,
    http: OnceCell<Client>,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overall deadline for each request. Unset means reqwest's default (none).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    async fn client(&self) -> Result<&Client, TransportError> {
        self.http
            .get_or_try_init(|| async {
                let mut builder = Client::builder();
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                builder.build().map_err(TransportError::request)
            })
            .await
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str, query: &QueryParams) -> Result<String, TransportError> {
        let res = self
            .client()
            .await?
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(TransportError::request)?;

        let status = res.status();
        let body = res.text().await.map_err(TransportError::request)?;
        debug!(status = status.as_u16(), bytes = body.len(), "received OpenWeather response");

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        Ok(body)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
