//! Best-effort decode targets for the CFTools profile sub-resources.
//!
//! The service omits sub-objects freely and individual fields come and go
//! between responses, so every field defaults. A payload that fails to
//! decode as a whole only loses its own fields, never the record.

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct StatusPayload {
    #[serde(default)]
    pub account: StatusAccount,
    #[serde(default)]
    pub profile: StatusProfile,
}

#[derive(Debug, Default, Deserialize)]
pub struct StatusAccount {
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub status: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct StatusProfile {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub avatar: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct PlayStatePayload {
    #[serde(rename = "playState", default)]
    pub play_state: PlayState,
}

#[derive(Debug, Default, Deserialize)]
pub struct PlayState {
    #[serde(default)]
    pub online: bool,
    #[serde(default)]
    pub server: Option<PlayStateServer>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PlayStateServer {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct OverviewPayload {
    #[serde(default)]
    pub alternate_accounts: AlternateAccounts,
    #[serde(default)]
    pub omega: Omega,
}

#[derive(Debug, Default, Deserialize)]
pub struct AlternateAccounts {
    #[serde(default)]
    pub total_count: i64,
    #[serde(default)]
    pub links: Vec<AccountLink>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AccountLink {
    #[serde(default)]
    pub cftools_id: String,
    #[serde(default)]
    pub confirmed: bool,
    #[serde(default)]
    pub trusted: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct Omega {
    #[serde(default)]
    pub playtime: i64,
    #[serde(default)]
    pub sessions: i64,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StructurePayload {
    #[serde(default)]
    pub bans: StructureBans,
    #[serde(default)]
    pub servers: Vec<StructureServer>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StructureBans {
    #[serde(default)]
    pub count: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct StructureServer {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub game: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct SteamPayload {
    #[serde(default)]
    pub steam64: String,
    #[serde(default)]
    pub profile: SteamProfile,
    #[serde(default)]
    pub bans: SteamBans,
}

#[derive(Debug, Default, Deserialize)]
pub struct SteamProfile {
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub avatarfull: String,
    #[serde(default)]
    pub personaname: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SteamBans {
    #[serde(rename = "NumberOfVACBans", default)]
    pub vac_bans: i64,
    #[serde(rename = "NumberOfGameBans", default)]
    pub game_bans: i64,
}
