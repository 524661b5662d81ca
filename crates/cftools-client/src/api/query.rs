use serde_json::json;

use super::*;

impl CfClient {
    /// Free-text player search across the whole service.
    ///
    /// In cookie-token auth mode the service accepts an empty acsrf token.
    pub async fn global_query(&self, identifier: &str) -> Result<QueryResponse, CfError> {
        let payload = json!({
            "acsrf_token": self.session.acsrf(),
            "identifier": identifier,
        });
        let body = self.post_json("/app/v1/global-query", APP_ORIGIN, &payload).await?;
        let resp: QueryResponse = serde_json::from_slice(&body)?;
        Ok(resp)
    }
}
