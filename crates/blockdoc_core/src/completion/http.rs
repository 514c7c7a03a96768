//! HTTP client for a remote completion endpoint.

use crate::completion::{
    CancelToken, CompletionError, CompletionProvider, CompletionRequest, CompletionResponse,
};
use log::{info, warn};
use std::time::{Duration, Instant};

/// Posts requests as JSON to `endpoint` and expects `{"completion": "..."}`.
pub struct HttpCompletionProvider {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl HttpCompletionProvider {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, CompletionError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| CompletionError::Network(err.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl CompletionProvider for HttpCompletionProvider {
    fn complete(
        &self,
        request: &CompletionRequest,
        cancel: &CancelToken,
    ) -> Result<CompletionResponse, CompletionError> {
        if cancel.is_cancelled() {
            return Err(CompletionError::Cancelled);
        }

        let started_at = Instant::now();
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .map_err(|err| {
                warn!(
                    "event=completion_http module=completion status=error duration_ms={} error_code=network error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                CompletionError::Network(err.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            warn!(
                "event=completion_http module=completion status=error duration_ms={} error_code=http status_code={}",
                started_at.elapsed().as_millis(),
                status.as_u16()
            );
            return Err(CompletionError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let decoded: CompletionResponse = response
            .json()
            .map_err(|err| CompletionError::Parse(err.to_string()))?;
        info!(
            "event=completion_http module=completion status=ok duration_ms={}",
            started_at.elapsed().as_millis()
        );

        if cancel.is_cancelled() {
            return Err(CompletionError::Cancelled);
        }
        Ok(decoded)
    }
}
