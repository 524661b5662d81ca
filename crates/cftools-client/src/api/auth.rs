use serde_json::json;

use crate::CfCredentials;

use super::*;

impl CfClient {
    /// Authenticate the session.
    ///
    /// When auth cookies were installed via [`CfSession::update_auth`]
    /// (token mode) this is a no-op. Otherwise a native login is performed
    /// with the given credentials: obtain an anti-CSRF token, warm the
    /// session, then submit identifier + password hash.
    ///
    /// [`CfSession::update_auth`]: crate::CfSession::update_auth
    pub async fn login(&self, credentials: &CfCredentials) -> Result<(), CfError> {
        if self.session.cookie_value("cdn-auth").is_some() {
            return Ok(());
        }

        if credentials.identifier.is_empty() || credentials.password_hash.is_empty() {
            return Err(CfError::MissingCredentials);
        }

        if self.session.acsrf().is_empty() {
            self.acsrf_token().await?;
        }

        // The web frontend hits the status endpoint before logging in; the
        // response seeds the session/user_info cookies.
        let _ = self.fetch_status().await;

        let payload = json!({
            "acsrf_token": self.session.acsrf(),
            "password": credentials.password_hash,
            "identifier": credentials.identifier,
            "_v": 2,
            "_i": credentials.identifier,
        });
        self.post_json("/olymp/v1/@me/native-login", AUTH_ORIGIN, &payload)
            .await?;

        let _ = self.fetch_status().await;
        let _ = self.fetch_persona().await;

        tracing::info!("CFTools native login succeeded");
        Ok(())
    }

    /// Fetch a fresh anti-CSRF token and store it on the session.
    ///
    /// The token arrives either as an `acsrf` cookie or in the response
    /// body, depending on the session state.
    pub async fn acsrf_token(&self) -> Result<String, CfError> {
        let body = self.get_bytes("/olymp/v1/@me/acsrf-token", AUTH_ORIGIN).await?;

        if let Some(token) = self.session.cookie_value("acsrf") {
            self.session.set_acsrf(&token);
            return Ok(token);
        }

        #[derive(serde::Deserialize)]
        struct TokenBody {
            #[serde(default)]
            token: String,
        }
        if let Ok(parsed) = serde_json::from_slice::<TokenBody>(&body) {
            if !parsed.token.is_empty() {
                self.session.set_acsrf(&parsed.token);
                return Ok(parsed.token);
            }
        }

        Err(CfError::AcsrfNotFound)
    }

    /// Whether the session carries any cookies at all. Says nothing about
    /// whether the service still accepts them; see [`CfClient::verify_auth`].
    pub fn is_logged_in(&self) -> bool {
        self.session.has_cookies()
    }

    /// Check the current cookies against the live service.
    pub async fn verify_auth(&self) -> Result<(), CfError> {
        self.acsrf_token().await.map(|_| ())
    }

    async fn fetch_status(&self) -> Result<(), CfError> {
        self.get_bytes("/olymp/v1/@me/status", AUTH_ORIGIN).await.map(|_| ())
    }

    async fn fetch_persona(&self) -> Result<(), CfError> {
        self.get_bytes("/app/v1/@me/persona", AUTH_ORIGIN).await.map(|_| ())
    }
}
