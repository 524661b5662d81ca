//! Shared cookie-session state for the CFTools web API.
//!
//! The service authenticates through browser cookies (`cdn-auth`,
//! `cf_clearance`, `session`, `user_info`) plus an anti-CSRF token, and
//! rotates them on responses. All of that state lives here, in one
//! explicit object the client holds a handle to.

use std::sync::{Arc, Mutex};

use reqwest::cookie::{CookieStore, Jar};
use url::Url;

/// Cookies are scoped to the parent domain so they apply to the
/// api/auth/app hosts alike.
const COOKIE_DOMAIN: &str = ".cftools.cloud";

const COOKIE_URL: &str = "https://api.cftools.cloud/";

/// Session cookies and anti-CSRF token shared by all requests.
///
/// Cookies set by any response are merged into the jar by the HTTP
/// client; operator-supplied values are installed via [`CfSession::update_auth`].
pub struct CfSession {
    jar: Arc<Jar>,
    acsrf: Mutex<String>,
}

impl Default for CfSession {
    fn default() -> Self {
        Self::new()
    }
}

impl CfSession {
    pub fn new() -> Self {
        Self {
            jar: Arc::new(Jar::default()),
            acsrf: Mutex::new(String::new()),
        }
    }

    /// The cookie store the HTTP client should be built over.
    pub fn jar(&self) -> Arc<Jar> {
        Arc::clone(&self.jar)
    }

    pub(crate) fn cookie_url() -> Url {
        Url::parse(COOKIE_URL).expect("static cookie URL")
    }

    /// Install operator-supplied auth cookies. Empty values are skipped,
    /// so a partial refresh keeps the remaining cookies intact.
    pub fn update_auth(
        &self,
        cdn_auth: &str,
        cf_clearance: &str,
        session: &str,
        user_info: &str,
        acsrf: &str,
    ) {
        let url = Self::cookie_url();
        for (name, value) in [
            ("cdn-auth", cdn_auth),
            ("cf_clearance", cf_clearance),
            ("session", session),
            ("user_info", user_info),
            ("acsrf", acsrf),
        ] {
            if !value.is_empty() {
                self.jar.add_cookie_str(
                    &format!("{name}={value}; Domain={COOKIE_DOMAIN}; Path=/"),
                    &url,
                );
            }
        }
        if !acsrf.is_empty() {
            self.set_acsrf(acsrf);
        }
    }

    /// The current anti-CSRF token, empty when none was obtained yet.
    pub fn acsrf(&self) -> String {
        self.acsrf
            .lock()
            .map(|token| token.clone())
            .unwrap_or_default()
    }

    pub fn set_acsrf(&self, token: &str) {
        if let Ok(mut guard) = self.acsrf.lock() {
            *guard = token.to_string();
        }
    }

    /// Value of a single cookie currently in the jar, if present.
    pub fn cookie_value(&self, name: &str) -> Option<String> {
        let header = self.jar.cookies(&Self::cookie_url())?;
        let header = header.to_str().ok()?;
        header.split(';').find_map(|pair| {
            let (k, v) = pair.trim().split_once('=')?;
            (k == name).then(|| v.to_string())
        })
    }

    /// Whether any session cookies are present at all.
    pub fn has_cookies(&self) -> bool {
        self.jar
            .cookies(&Self::cookie_url())
            .map(|h| !h.is_empty())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_auth_skips_empty_values() {
        let session = CfSession::new();
        session.update_auth("cdn-token", "", "sess-token", "", "csrf-token");

        assert_eq!(session.cookie_value("cdn-auth").as_deref(), Some("cdn-token"));
        assert_eq!(session.cookie_value("session").as_deref(), Some("sess-token"));
        assert_eq!(session.cookie_value("cf_clearance"), None);
        assert_eq!(session.acsrf(), "csrf-token");
        assert!(session.has_cookies());
    }

    #[test]
    fn empty_session_has_no_cookies() {
        let session = CfSession::new();
        assert!(!session.has_cookies());
        assert_eq!(session.acsrf(), "");
    }
}
