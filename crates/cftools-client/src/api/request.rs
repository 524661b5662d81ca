use std::sync::Arc;
use std::time::Instant;

use reqwest::header::{ACCEPT, CACHE_CONTROL, HeaderMap, HeaderValue, ORIGIN, PRAGMA, REFERER, USER_AGENT};
use serde::Serialize;

use super::*;

const BROWSER_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/144.0.0.0 Safari/537.36";

impl CfClient {
    /// Build a client over the given session. Cookies set by responses are
    /// merged back into the session's jar automatically.
    pub fn new(session: Arc<CfSession>) -> Self {
        let http = reqwest::Client::builder()
            .cookie_provider(session.jar())
            .build()
            .expect("reqwest client");
        Self { http, session }
    }

    pub fn session(&self) -> &Arc<CfSession> {
        &self.session
    }

    /// The service rejects requests without a browser-like header set.
    fn browser_headers(&self, origin: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        headers.insert(ORIGIN, HeaderValue::from_str(origin).unwrap());
        headers.insert(REFERER, HeaderValue::from_str(&format!("{origin}/")).unwrap());
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_UA));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
        headers
    }

    /// Execute a GET request and return the raw response body.
    pub(super) async fn get_bytes(&self, path: &str, origin: &str) -> Result<Vec<u8>, CfError> {
        let url = format!("{API_BASE}{path}");
        let started = Instant::now();
        let resp = self
            .http
            .get(&url)
            .headers(self.browser_headers(origin))
            .send()
            .await?;

        let status = resp.status();
        let body = resp.bytes().await?;
        tracing::debug!(path, status = status.as_u16(), elapsed_ms = started.elapsed().as_millis() as u64, "GET");

        if !status.is_success() {
            return Err(CfError::Api {
                status: status.as_u16(),
                message: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        Ok(body.to_vec())
    }

    /// Execute a POST request with a JSON body and return the raw response
    /// body. The service expects `text/plain` as the content type even for
    /// JSON payloads, mirroring its own web frontend.
    pub(super) async fn post_json(
        &self,
        path: &str,
        origin: &str,
        body: &impl Serialize,
    ) -> Result<Vec<u8>, CfError> {
        let url = format!("{API_BASE}{path}");
        let payload = serde_json::to_vec(body)?;
        let started = Instant::now();
        let resp = self
            .http
            .post(&url)
            .headers(self.browser_headers(origin))
            .header(reqwest::header::CONTENT_TYPE, "text/plain;charset=UTF-8")
            .body(payload)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.bytes().await?;
        tracing::debug!(path, status = status.as_u16(), elapsed_ms = started.elapsed().as_millis() as u64, "POST");

        if !status.is_success() {
            return Err(CfError::Api {
                status: status.as_u16(),
                message: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        Ok(body.to_vec())
    }
}
