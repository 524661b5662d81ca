//! CFTools Cloud REST client.
//!
//! Raw byte access to the per-player profile sub-resources plus the
//! global free-text query, with session cookie and anti-CSRF handling.
//! Sub-resource fetches return the response body untouched so callers
//! can keep the payload for audit and parse it best-effort.

mod auth;
mod profile;
mod query;
mod request;

pub mod models;

pub use models::{QueryResponse, QueryResult, QueryUser};

use std::sync::Arc;

use crate::{CfError, CfSession};

const API_BASE: &str = "https://api.cftools.cloud";
const AUTH_ORIGIN: &str = "https://auth.cftools.cloud";
const APP_ORIGIN: &str = "https://app.cftools.cloud";

/// CFTools Cloud API client bound to a shared cookie session.
pub struct CfClient {
    pub(super) http: reqwest::Client,
    pub(super) session: Arc<CfSession>,
}
