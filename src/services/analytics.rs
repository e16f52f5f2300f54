//! Study-time analytics backend client

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::{error::ClientError, timer::UsageSink};

#[derive(Debug, Serialize)]
struct StudyTimeUpdate {
    minutes: u64,
    date: NaiveDate,
}

/// Posts `{minutes, date}` to the analytics endpoint
#[derive(Debug, Clone)]
pub struct HttpUsageSink {
    client: Client,
    url: String,
}

impl HttpUsageSink {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl UsageSink for HttpUsageSink {
    async fn record(&self, minutes: u64, date: NaiveDate) -> Result<(), ClientError> {
        debug!("POST {} minutes={} date={}", self.url, minutes, date);

        let resp = self
            .client
            .post(&self.url)
            .json(&StudyTimeUpdate { minutes, date })
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                endpoint: self.url.clone(),
                source,
            })?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }

        let body = resp.text().await.unwrap_or_default();
        Err(ClientError::Status {
            endpoint: self.url.clone(),
            status: status.as_u16(),
            body,
        })
    }
}
