//! Record normalization: merge the profile sub-resource payloads into one
//! canonical player record.

use chrono::{DateTime, Utc};
use roster_db::players::Player;
use serde::de::DeserializeOwned;

use crate::payload::{
    OverviewPayload, PlayStatePayload, StatusPayload, SteamPayload, StructurePayload,
};

/// True when a string looks like a raw CFTools identifier: exactly 24 hex
/// characters, optionally suffixed with `+`. The service occasionally
/// echoes identifiers in `omega.aliases`, and those must not end up in the
/// nickname set.
pub fn is_identifier_like(s: &str) -> bool {
    let s = s.trim();
    let s = s.strip_suffix('+').unwrap_or(s);
    s.len() == 24 && s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Eligible as a nickname for the given player: non-empty, not the
/// player's own identifier, and not identifier-shaped.
pub fn is_nickname_candidate(s: &str, cftools_id: &str) -> bool {
    !s.is_empty() && s != cftools_id && !is_identifier_like(s)
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Option<T> {
    if bytes.is_empty() {
        return None;
    }
    match serde_json::from_slice(bytes) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!(error = %e, "payload decode failed");
            None
        }
    }
}

fn parse_activity_ts(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Extract (online, server name) from a play-state payload, falling back
/// to the server id when the name is blank.
pub fn parse_play_state(bytes: &[u8]) -> (bool, String) {
    let Some(ps) = decode::<PlayStatePayload>(bytes) else {
        return (false, String::new());
    };
    let server = ps.play_state.server.map(|s| {
        if s.name.is_empty() { s.id } else { s.name }
    });
    (ps.play_state.online, server.unwrap_or_default())
}

/// Display name from a status payload, empty when absent.
pub fn parse_display_name(bytes: &[u8]) -> String {
    decode::<StatusPayload>(bytes)
        .map(|st| st.profile.display_name)
        .unwrap_or_default()
}

/// Alias nicknames from an overview payload, filtered for the given player.
pub fn parse_aliases(bytes: &[u8], cftools_id: &str) -> Vec<String> {
    decode::<OverviewPayload>(bytes)
        .map(|ov| {
            ov.omega
                .aliases
                .into_iter()
                .filter(|a| is_nickname_candidate(a, cftools_id))
                .collect()
        })
        .unwrap_or_default()
}

/// Merge the four primary payloads into a canonical record. Each payload
/// is optional; a parse failure or missing sub-object only skips the
/// fields it would have populated.
pub fn build_player(
    cftools_id: &str,
    status: &[u8],
    play_state: &[u8],
    overview: &[u8],
    structure: &[u8],
) -> Player {
    let mut p = Player {
        cftools_id: cftools_id.to_string(),
        ..Player::default()
    };

    if let Some(st) = decode::<StatusPayload>(status) {
        p.is_bot = st.account.is_bot;
        p.account_status = st.account.status;
        p.display_name = st.profile.display_name;
        p.avatar = st.profile.avatar;
    }

    let (online, server) = parse_play_state(play_state);
    p.online = online;
    if !server.is_empty() {
        p.last_server_identifier = server;
    }

    if let Some(st) = decode::<StructurePayload>(structure) {
        p.bans_count = st.bans.count;
        p.server_ids = st.servers.into_iter().map(|s| s.id).collect();
    }

    if let Some(ov) = decode::<OverviewPayload>(overview) {
        p.linked_accounts_count = ov.alternate_accounts.total_count;
        p.playtime_sec = ov.omega.playtime;
        p.sessions_count = ov.omega.sessions;
        p.last_activity_at = parse_activity_ts(&ov.omega.updated_at);
        p.linked_cftools_ids = ov
            .alternate_accounts
            .links
            .into_iter()
            .map(|l| l.cftools_id)
            .collect();
        p.nicknames = ov
            .omega
            .aliases
            .into_iter()
            .filter(|a| is_nickname_candidate(a, cftools_id))
            .collect();
    }

    // The display name always belongs in the nickname set, appended last
    // unless an alias already matched it exactly.
    if !p.display_name.is_empty() && !p.nicknames.contains(&p.display_name) {
        p.nicknames.push(p.display_name.clone());
    }

    p
}

/// Fold the steam cross-reference into the record. The full-size avatar is
/// preferred over the thumbnail.
pub fn apply_steam(p: &mut Player, steam: &[u8]) {
    let Some(st) = decode::<SteamPayload>(steam) else {
        return;
    };
    p.steam64 = st.steam64;
    p.steam_avatar = if st.profile.avatarfull.is_empty() {
        st.profile.avatar
    } else {
        st.profile.avatarfull
    };
    p.steam_persona = st.profile.personaname;
    p.steam_vac_bans = st.bans.vac_bans;
    p.steam_game_bans = st.bans.game_bans;
}
