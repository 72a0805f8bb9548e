//! HTTP client for the submission endpoint.

use crate::{FormError, FormResult};
use api_shared::{routes, SubmissionRes};
use reqwest::Url;
use std::time::Duration;

/// Posts bookings to a tourdesk server and decodes its response envelopes.
#[derive(Clone, Debug)]
pub struct SubmissionClient {
    http: reqwest::Client,
    base: Url,
}

impl SubmissionClient {
    /// Create a client for the server at `base_url` (e.g. `http://localhost:3000`).
    ///
    /// # Errors
    ///
    /// Returns `FormError::InvalidUrl` if `base_url` is not an absolute http(s) URL, or
    /// `FormError::Http` if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> FormResult<Self> {
        let base =
            Url::parse(base_url).map_err(|e| FormError::InvalidUrl(format!("{base_url}: {e}")))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(FormError::InvalidUrl(format!(
                "{base_url}: scheme must be http or https"
            )));
        }

        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base })
    }

    fn url(&self, path: &str) -> FormResult<Url> {
        self.base
            .join(path)
            .map_err(|e| FormError::InvalidUrl(format!("{path}: {e}")))
    }

    /// Posts `payload` to the submit endpoint.
    ///
    /// Validation failures come back as `Ok` with `success: false` and the field errors, so
    /// the caller can show them inline.
    ///
    /// # Errors
    ///
    /// Returns `FormError::Http` on transport failure or
    /// `FormError::UnexpectedResponse` if the body is not a response envelope.
    pub async fn submit(&self, payload: &serde_json::Value) -> FormResult<SubmissionRes> {
        let response = self
            .http
            .post(self.url(routes::SUBMIT_PATH)?)
            .json(payload)
            .send()
            .await?;
        decode(response).await
    }

    /// Fetches a stored submission by id.
    pub async fn fetch(&self, id: &str) -> FormResult<SubmissionRes> {
        let url = self.url(&format!("{}/{id}", routes::SUBMISSIONS_PATH))?;
        let response = self.http.get(url).send().await?;
        decode(response).await
    }
}

async fn decode(response: reqwest::Response) -> FormResult<SubmissionRes> {
    let status = response.status().as_u16();
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!(status, "unreadable response from submission endpoint: {e}");
        FormError::UnexpectedResponse { status }
    })
}
