// src/signals/http.rs
//! Plain-JSON HTTP backends. Both talk to contract-agnostic endpoints that
//! mirror the internal shapes: an engagement endpoint returning a post
//! array, a trends endpoint returning an interest series. Platform-specific
//! API clients live outside this crate and are expected to present this
//! same shape.

use super::source::{EngagementRecord, EngagementSource, FetchError, TrendSource};
use reqwest::Client;
use std::time::Duration;

fn transport(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Transport(e.to_string())
    }
}

/// `GET {base_url}?q=<terms joined by space>` → `[EngagementRecord, ...]`
pub struct HttpEngagement {
    base_url: String,
    client: Client,
}

impl HttpEngagement {
    pub fn new(base_url: String, timeout: Duration) -> Self {
        Self {
            base_url,
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
        }
    }
}

#[async_trait::async_trait]
impl EngagementSource for HttpEngagement {
    async fn fetch(&self, terms: &[String]) -> Result<Vec<EngagementRecord>, FetchError> {
        let rsp = self
            .client
            .get(&self.base_url)
            .query(&[("q", terms.join(" "))])
            .send()
            .await
            .map_err(transport)?
            .error_for_status()
            .map_err(transport)?;
        rsp.json::<Vec<EngagementRecord>>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }

    fn name(&self) -> &'static str {
        "http-engagement"
    }
}

/// `GET {base_url}?kw=<keywords joined by comma>` → `[f64, ...]` (0..100)
pub struct HttpTrends {
    base_url: String,
    client: Client,
}

impl HttpTrends {
    pub fn new(base_url: String, timeout: Duration) -> Self {
        Self {
            base_url,
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
        }
    }
}

#[async_trait::async_trait]
impl TrendSource for HttpTrends {
    async fn interest_over_time(&self, keywords: &[String]) -> Result<Vec<f64>, FetchError> {
        let rsp = self
            .client
            .get(&self.base_url)
            .query(&[("kw", keywords.join(","))])
            .send()
            .await
            .map_err(transport)?
            .error_for_status()
            .map_err(transport)?;
        rsp.json::<Vec<f64>>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }

    fn name(&self) -> &'static str {
        "http-trends"
    }
}
