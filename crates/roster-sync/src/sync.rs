//! Synchronization service: fetch, normalize and persist players.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use cftools_client::{CfClient, CfError};
use roster_db::Database;
use roster_db::links::PlayerLink;
use roster_db::players::Player;
use roster_db::servers::PlayerServer;

use crate::SyncError;
use crate::normalize;
use crate::payload::{OverviewPayload, StructurePayload};

/// Hard cap on how many search hits are synchronized per query.
pub const MAX_SEARCH_RESULTS: usize = 30;

/// Orchestrates fetch → normalize → persist for single players, batches
/// and free-text searches against the external source.
pub struct SyncService {
    client: Arc<CfClient>,
    db: Database,
}

impl SyncService {
    pub fn new(client: Arc<CfClient>, db: Database) -> Self {
        Self { client, db }
    }

    /// Synchronize one player. `light` skips the steam/ban/anti-cheat
    /// detail fetches, roughly halving the external request count.
    pub async fn sync_player(&self, cftools_id: &str, light: bool) -> Result<Player, SyncError> {
        self.fetch_and_save(cftools_id, "", "", "", light).await
    }

    /// Synchronize a batch of identifiers. A failing player is logged and
    /// skipped; the batch never aborts as a whole.
    pub async fn sync_batch(&self, cftools_ids: &[String], light: bool) -> Vec<Player> {
        let mut saved = Vec::new();
        for cftools_id in cftools_ids {
            if cftools_id.is_empty() {
                continue;
            }
            match self.fetch_and_save(cftools_id, "", "", "", light).await {
                Ok(player) => saved.push(player),
                Err(e) => tracing::warn!(cftools_id, error = %e, "batch sync failed for player"),
            }
        }
        saved
    }

    /// Free-text search against the external source, synchronizing every
    /// hit. Results are deduplicated by identifier and capped at
    /// [`MAX_SEARCH_RESULTS`].
    pub async fn search_and_sync(
        &self,
        query: &str,
        light: bool,
    ) -> Result<Vec<Player>, SyncError> {
        let resp = self.client.global_query(query).await?;

        let mut seen = HashSet::new();
        let mut saved = Vec::new();
        for result in resp.results {
            if saved.len() >= MAX_SEARCH_RESULTS {
                break;
            }
            let cftools_id = result.user.cftools_id;
            if cftools_id.is_empty() || !seen.insert(cftools_id.clone()) {
                continue;
            }
            match self
                .fetch_and_save(
                    &cftools_id,
                    &result.user.display_name,
                    &result.user.avatar,
                    &result.identifier,
                    light,
                )
                .await
            {
                Ok(player) => saved.push(player),
                Err(e) => tracing::warn!(cftools_id, error = %e, "search sync failed for player"),
            }
        }
        Ok(saved)
    }

    /// Fetch and normalize without persisting, for callers that want fresh
    /// data without mutating stored state. Fetch failures degrade to
    /// missing fields, as in a regular sync.
    pub async fn fetch_live(&self, cftools_id: &str) -> Player {
        let status = fetch_or_empty("status", self.client.profile_status(cftools_id)).await;
        let play_state =
            fetch_or_empty("playState", self.client.profile_play_state(cftools_id)).await;
        let overview = fetch_or_empty("overview", self.client.profile_overview(cftools_id)).await;
        let structure =
            fetch_or_empty("structure", self.client.profile_structure(cftools_id)).await;

        let mut player =
            normalize::build_player(cftools_id, &status, &play_state, &overview, &structure);
        player.updated_at = Some(Utc::now());
        player
    }

    async fn fetch_and_save(
        &self,
        cftools_id: &str,
        display_name: &str,
        avatar: &str,
        search_identifier: &str,
        light: bool,
    ) -> Result<Player, SyncError> {
        let status = fetch_or_empty("status", self.client.profile_status(cftools_id)).await;
        let play_state =
            fetch_or_empty("playState", self.client.profile_play_state(cftools_id)).await;
        let overview = fetch_or_empty("overview", self.client.profile_overview(cftools_id)).await;
        let structure =
            fetch_or_empty("structure", self.client.profile_structure(cftools_id)).await;

        let mut steam = Vec::new();
        let mut bans = Vec::new();
        let mut battleye = Vec::new();
        if !light {
            steam = fetch_or_empty("steam", self.client.profile_steam(cftools_id)).await;
            bans = fetch_or_empty("bans", self.client.profile_bans(cftools_id)).await;
            battleye = fetch_or_empty(
                "battleye",
                self.client.profile_battleye_ban_status(cftools_id),
            )
            .await;
            // Warms the service's profile cache; the payload itself is not
            // consumed.
            let _ = fetch_or_empty("activities", self.client.profile_activities(cftools_id)).await;
        }

        let mut player =
            normalize::build_player(cftools_id, &status, &play_state, &overview, &structure);
        if player.display_name.is_empty() {
            player.display_name = display_name.to_string();
        }
        if player.avatar.is_empty() {
            player.avatar = avatar.to_string();
        }
        player.raw_status = String::from_utf8_lossy(&status).into_owned();
        player.raw_play_state = String::from_utf8_lossy(&play_state).into_owned();
        player.raw_overview = String::from_utf8_lossy(&overview).into_owned();
        player.raw_structure = String::from_utf8_lossy(&structure).into_owned();
        player.raw_bans = String::from_utf8_lossy(&bans).into_owned();
        player.raw_battleye = String::from_utf8_lossy(&battleye).into_owned();
        player.last_seen_at = Some(Utc::now());
        if !steam.is_empty() {
            normalize::apply_steam(&mut player, &steam);
        }

        save_snapshot(&self.db, player, search_identifier, &overview, &structure)
    }
}

/// Persist one normalized snapshot: merge-upsert the canonical record,
/// append the sync-log row, accumulate nicknames, replace the link and
/// server snapshot sets, and return the stored record re-read in full.
/// Satellite write failures are logged and skipped so a single bad row
/// cannot lose the whole snapshot.
fn save_snapshot(
    db: &Database,
    player: Player,
    search_identifier: &str,
    overview: &[u8],
    structure: &[u8],
) -> Result<Player, SyncError> {
    let cftools_id = player.cftools_id.clone();
    let player_id = db.upsert_player(&player)?;

    if let Err(e) = db.log_sync(player_id, &cftools_id, &player.display_name) {
        tracing::warn!(cftools_id, error = %e, "sync log append failed");
    }

    for (nickname, source) in nickname_observations(&player, search_identifier, overview) {
        if let Err(e) = db.upsert_nickname(player_id, &nickname, source) {
            tracing::warn!(cftools_id, nickname, error = %e, "nickname upsert failed");
        }
    }

    let links = overview_links(overview);
    if let Err(e) = db.replace_links(player_id, &links) {
        tracing::warn!(cftools_id, error = %e, "link snapshot replace failed");
    }

    let servers = structure_servers(structure);
    if let Err(e) = db.replace_servers(player_id, &servers) {
        tracing::warn!(cftools_id, error = %e, "server snapshot replace failed");
    }

    db.get_player(&cftools_id)?
        .ok_or_else(|| roster_db::DbError::NotFound(cftools_id).into())
}

/// Source-tagged nickname observations for one snapshot, deduplicated by
/// string with the first tag winning: display name, then the search
/// identifier that matched, then the overview aliases.
fn nickname_observations(
    player: &Player,
    search_identifier: &str,
    overview: &[u8],
) -> Vec<(String, &'static str)> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    if normalize::is_nickname_candidate(&player.display_name, &player.cftools_id)
        && seen.insert(player.display_name.clone())
    {
        out.push((player.display_name.clone(), "display_name"));
    }
    if normalize::is_nickname_candidate(search_identifier, &player.cftools_id)
        && seen.insert(search_identifier.to_string())
    {
        out.push((search_identifier.to_string(), "search"));
    }
    for alias in normalize::parse_aliases(overview, &player.cftools_id) {
        if seen.insert(alias.clone()) {
            out.push((alias, "alias"));
        }
    }
    out
}

fn overview_links(overview: &[u8]) -> Vec<PlayerLink> {
    if overview.is_empty() {
        return Vec::new();
    }
    serde_json::from_slice::<OverviewPayload>(overview)
        .map(|ov| {
            ov.alternate_accounts
                .links
                .into_iter()
                .filter(|l| !l.cftools_id.is_empty())
                .map(|l| PlayerLink {
                    linked_cftools_id: l.cftools_id,
                    confirmed: l.confirmed,
                    trusted: l.trusted,
                })
                .collect()
        })
        .unwrap_or_default()
}

fn structure_servers(structure: &[u8]) -> Vec<PlayerServer> {
    if structure.is_empty() {
        return Vec::new();
    }
    serde_json::from_slice::<StructurePayload>(structure)
        .map(|st| {
            st.servers
                .into_iter()
                .filter(|s| !s.id.is_empty())
                .map(|s| PlayerServer {
                    cftools_server_id: s.id,
                    identifier: s.identifier,
                    game_type: s.game,
                })
                .collect()
        })
        .unwrap_or_default()
}

async fn fetch_or_empty(
    what: &str,
    fut: impl Future<Output = Result<Vec<u8>, CfError>>,
) -> Vec<u8> {
    match fut.await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, "{what} fetch failed");
            Vec::new()
        }
    }
}
