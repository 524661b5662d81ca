use super::*;

impl CfClient {
    /// Account flags, status code, display name and avatar.
    pub async fn profile_status(&self, cftools_id: &str) -> Result<Vec<u8>, CfError> {
        self.profile_get(cftools_id, "status").await
    }

    /// Online flag and current server, if any.
    pub async fn profile_play_state(&self, cftools_id: &str) -> Result<Vec<u8>, CfError> {
        self.profile_get(cftools_id, "playState").await
    }

    /// Ban count and associated server list.
    pub async fn profile_structure(&self, cftools_id: &str) -> Result<Vec<u8>, CfError> {
        self.profile_get(cftools_id, "structure").await
    }

    /// Linked accounts, playtime, sessions and alias list.
    pub async fn profile_overview(&self, cftools_id: &str) -> Result<Vec<u8>, CfError> {
        self.profile_get(cftools_id, "overview").await
    }

    /// Recent activity feed. Fetched during full sync but not parsed.
    pub async fn profile_activities(&self, cftools_id: &str) -> Result<Vec<u8>, CfError> {
        self.profile_get(cftools_id, "activities").await
    }

    /// Steam cross-reference: steam64, persona, avatar and ban counters.
    pub async fn profile_steam(&self, cftools_id: &str) -> Result<Vec<u8>, CfError> {
        self.profile_get(cftools_id, "steam").await
    }

    /// Server ban list detail.
    pub async fn profile_bans(&self, cftools_id: &str) -> Result<Vec<u8>, CfError> {
        self.profile_get(cftools_id, "bans").await
    }

    /// BattlEye publisher ban status.
    pub async fn profile_battleye_ban_status(&self, cftools_id: &str) -> Result<Vec<u8>, CfError> {
        self.profile_get(cftools_id, "publisher-services/battleye/ban-status")
            .await
    }

    async fn profile_get(&self, cftools_id: &str, suffix: &str) -> Result<Vec<u8>, CfError> {
        let path = format!("/app/v1/profile/{cftools_id}/{suffix}");
        self.get_bytes(&path, APP_ORIGIN).await
    }
}
