//! CFTools Cloud integration client library.
//!
//! Provides cookie-session authentication against the CFTools web API,
//! raw access to the per-player profile sub-resources, and the global
//! free-text player query.

pub mod api;
pub mod session;

pub use api::CfClient;
pub use session::CfSession;

/// Operator credentials for native login.
///
/// The password is the pre-hashed value the CFTools web frontend submits,
/// never the clear-text password.
#[derive(Debug, Clone, Default)]
pub struct CfCredentials {
    pub identifier: String,
    pub password_hash: String,
}

/// Unified error type for the cftools-client crate.
#[derive(Debug, thiserror::Error)]
pub enum CfError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Authentication required: no session cookies")]
    AuthRequired,

    #[error("Missing credentials: set cookie auth or identifier + password hash")]
    MissingCredentials,

    #[error("Anti-CSRF token not found in response")]
    AcsrfNotFound,

    #[error("CFTools API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}
