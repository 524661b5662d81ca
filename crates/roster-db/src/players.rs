//! Canonical player records and the merge-preserving upsert.

use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::{Database, DbError, timefmt};

/// Canonical identity record for one external player identifier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Player {
    pub id: i64,
    pub cftools_id: String,
    pub display_name: String,
    pub avatar: String,
    pub is_bot: bool,
    pub account_status: i64,
    pub playtime_sec: i64,
    pub sessions_count: i64,
    pub bans_count: i64,
    pub linked_accounts_count: i64,
    pub last_activity_at: Option<DateTime<Utc>>,
    pub last_seen_at: Option<DateTime<Utc>>,
    pub online: bool,
    pub last_server_identifier: String,
    pub raw_status: String,
    pub raw_overview: String,
    pub raw_structure: String,
    pub raw_play_state: String,
    pub raw_bans: String,
    pub raw_battleye: String,
    pub steam64: String,
    pub steam_avatar: String,
    pub steam_persona: String,
    pub steam_vac_bans: i64,
    pub steam_game_bans: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub nicknames: Vec<String>,
    pub linked_cftools_ids: Vec<String>,
    pub server_ids: Vec<String>,
}

/// Sort key for roster listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Updated,
    Playtime,
    Bans,
    Online,
}

#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub limit: i64,
    pub offset: i64,
    pub only_online: bool,
    pub only_banned: bool,
    pub sort: SortKey,
}

/// Merge-preserving upsert statement. A repeat sight overwrites each field
/// with the incoming value unless that value is empty/zero, in which case
/// the stored value survives. The steam ban counters share one guard: they
/// are only overwritten when the new payload carries any VAC or game bans,
/// so an empty steam fetch cannot erase a previously observed count.
const UPSERT_PLAYER: &str = "
    INSERT INTO players (cftools_id, display_name, avatar, is_bot, account_status,
        playtime_sec, sessions_count, bans_count, linked_accounts_count,
        last_activity_at, last_seen_at, online, last_server_identifier,
        raw_status, raw_overview, raw_structure, raw_play_state, raw_bans, raw_battleye,
        steam64, steam_avatar, steam_persona, steam_vac_bans, steam_game_bans, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13,
            ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25)
    ON CONFLICT(cftools_id) DO UPDATE SET
        display_name = COALESCE(NULLIF(excluded.display_name, ''), display_name),
        avatar = COALESCE(NULLIF(excluded.avatar, ''), avatar),
        is_bot = excluded.is_bot,
        account_status = COALESCE(NULLIF(excluded.account_status, 0), account_status),
        playtime_sec = COALESCE(NULLIF(excluded.playtime_sec, 0), playtime_sec),
        sessions_count = COALESCE(NULLIF(excluded.sessions_count, 0), sessions_count),
        bans_count = COALESCE(NULLIF(excluded.bans_count, 0), bans_count),
        linked_accounts_count = COALESCE(NULLIF(excluded.linked_accounts_count, 0), linked_accounts_count),
        last_activity_at = COALESCE(excluded.last_activity_at, last_activity_at),
        last_seen_at = COALESCE(excluded.last_seen_at, last_seen_at),
        online = excluded.online,
        last_server_identifier = COALESCE(NULLIF(excluded.last_server_identifier, ''), last_server_identifier),
        raw_status = COALESCE(NULLIF(excluded.raw_status, ''), raw_status),
        raw_overview = COALESCE(NULLIF(excluded.raw_overview, ''), raw_overview),
        raw_structure = COALESCE(NULLIF(excluded.raw_structure, ''), raw_structure),
        raw_play_state = COALESCE(NULLIF(excluded.raw_play_state, ''), raw_play_state),
        raw_bans = COALESCE(NULLIF(excluded.raw_bans, ''), raw_bans),
        raw_battleye = COALESCE(NULLIF(excluded.raw_battleye, ''), raw_battleye),
        steam64 = COALESCE(NULLIF(excluded.steam64, ''), steam64),
        steam_avatar = COALESCE(NULLIF(excluded.steam_avatar, ''), steam_avatar),
        steam_persona = COALESCE(NULLIF(excluded.steam_persona, ''), steam_persona),
        steam_vac_bans = CASE
            WHEN excluded.steam_vac_bans > 0 OR excluded.steam_game_bans > 0
            THEN excluded.steam_vac_bans ELSE steam_vac_bans END,
        steam_game_bans = CASE
            WHEN excluded.steam_vac_bans > 0 OR excluded.steam_game_bans > 0
            THEN excluded.steam_game_bans ELSE steam_game_bans END,
        updated_at = excluded.updated_at";

const FULL_COLUMNS: &str = "id, cftools_id, display_name, avatar, is_bot, account_status,
    playtime_sec, sessions_count, bans_count, linked_accounts_count,
    last_activity_at, last_seen_at, online, last_server_identifier,
    raw_status, raw_overview, raw_structure, raw_play_state, raw_bans, raw_battleye,
    steam64, steam_avatar, steam_persona, steam_vac_bans, steam_game_bans,
    created_at, updated_at";

fn full_row(row: &Row) -> rusqlite::Result<Player> {
    Ok(Player {
        id: row.get(0)?,
        cftools_id: row.get(1)?,
        display_name: row.get(2)?,
        avatar: row.get(3)?,
        is_bot: row.get(4)?,
        account_status: row.get(5)?,
        playtime_sec: row.get(6)?,
        sessions_count: row.get(7)?,
        bans_count: row.get(8)?,
        linked_accounts_count: row.get(9)?,
        last_activity_at: timefmt::parse_opt(row.get(10)?),
        last_seen_at: timefmt::parse_opt(row.get(11)?),
        online: row.get(12)?,
        last_server_identifier: row.get(13)?,
        raw_status: row.get(14)?,
        raw_overview: row.get(15)?,
        raw_structure: row.get(16)?,
        raw_play_state: row.get(17)?,
        raw_bans: row.get(18)?,
        raw_battleye: row.get(19)?,
        steam64: row.get(20)?,
        steam_avatar: row.get(21)?,
        steam_persona: row.get(22)?,
        steam_vac_bans: row.get(23)?,
        steam_game_bans: row.get(24)?,
        created_at: timefmt::parse_opt(row.get(25)?),
        updated_at: timefmt::parse_opt(row.get(26)?),
        ..Player::default()
    })
}

impl Database {
    /// Insert or merge-update the canonical record and return its stable
    /// internal id.
    pub fn upsert_player(&self, p: &Player) -> Result<i64, DbError> {
        let now = timefmt::now();
        self.with_conn(|conn| {
            conn.execute(
                UPSERT_PLAYER,
                rusqlite::params![
                    p.cftools_id,
                    p.display_name,
                    p.avatar,
                    p.is_bot,
                    p.account_status,
                    p.playtime_sec,
                    p.sessions_count,
                    p.bans_count,
                    p.linked_accounts_count,
                    timefmt::fmt_opt(p.last_activity_at),
                    timefmt::fmt_opt(p.last_seen_at),
                    p.online,
                    p.last_server_identifier,
                    p.raw_status,
                    p.raw_overview,
                    p.raw_structure,
                    p.raw_play_state,
                    p.raw_bans,
                    p.raw_battleye,
                    p.steam64,
                    p.steam_avatar,
                    p.steam_persona,
                    p.steam_vac_bans,
                    p.steam_game_bans,
                    now,
                ],
            )?;
            // On the update path the row keeps its original id, so resolve
            // it by the external identifier rather than last_insert_rowid().
            let id = conn.query_row(
                "SELECT id FROM players WHERE cftools_id = ?1",
                [&p.cftools_id],
                |row| row.get(0),
            )?;
            Ok(id)
        })
    }

    /// Full record by external identifier, hydrated with the nickname,
    /// link and server id sets.
    pub fn get_player(&self, cftools_id: &str) -> Result<Option<Player>, DbError> {
        let player = self.with_conn(|conn| {
            let sql = format!("SELECT {FULL_COLUMNS} FROM players WHERE cftools_id = ?1");
            let mut stmt = conn.prepare(&sql)?;
            Ok(stmt.query_row([cftools_id], full_row).optional()?)
        })?;

        let Some(mut player) = player else {
            return Ok(None);
        };
        player.nicknames = self.player_nicknames(player.id)?;
        player.linked_cftools_ids = self.player_link_ids(player.id)?;
        player.server_ids = self.player_server_ids(player.id)?;
        Ok(Some(player))
    }

    pub fn update_display_name(&self, player_id: i64, display_name: &str) -> Result<(), DbError> {
        let now = timefmt::now();
        self.with_conn(|conn| {
            conn.execute(
                "UPDATE players SET display_name = ?1, updated_at = ?2 WHERE id = ?3",
                rusqlite::params![display_name, now, player_id],
            )?;
            Ok(())
        })
    }

    /// Poll-time presence update. Stamps `last_seen_at` on every call; the
    /// last server is only replaced while the player is online on a known
    /// server.
    pub fn update_online_status(
        &self,
        player_id: i64,
        online: bool,
        server_name: &str,
    ) -> Result<(), DbError> {
        let now = timefmt::now();
        self.with_conn(|conn| {
            if online && !server_name.is_empty() {
                conn.execute(
                    "UPDATE players SET online = ?1, last_seen_at = ?2,
                        last_server_identifier = ?3, updated_at = ?2 WHERE id = ?4",
                    rusqlite::params![online, now, server_name, player_id],
                )?;
            } else {
                conn.execute(
                    "UPDATE players SET online = ?1, last_seen_at = ?2, updated_at = ?2
                     WHERE id = ?3",
                    rusqlite::params![online, now, player_id],
                )?;
            }
            Ok(())
        })
    }

    /// Roster listing without the raw snapshots or satellite sets.
    pub fn list_players(&self, opts: &ListOptions) -> Result<Vec<Player>, DbError> {
        let limit = if opts.limit <= 0 { 50 } else { opts.limit.min(200) };
        let mut where_clause = String::from("1=1");
        if opts.only_online {
            where_clause.push_str(" AND online = 1");
        }
        if opts.only_banned {
            where_clause.push_str(" AND bans_count > 0");
        }
        let sql = format!(
            "SELECT {FULL_COLUMNS} FROM players WHERE {where_clause} {} LIMIT ?1 OFFSET ?2",
            order_clause(opts.sort, "")
        );
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(rusqlite::params![limit, opts.offset.max(0)], full_row)?;
            rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
        })
    }

    /// Search by display name or any accumulated nickname, case-insensitive
    /// substring match.
    pub fn search_by_nickname(
        &self,
        query: &str,
        limit: i64,
        opts: &ListOptions,
    ) -> Result<Vec<Player>, DbError> {
        let limit = if limit <= 0 { 5000 } else { limit.min(10000) };
        let mut where_clause = String::from(
            "(LOWER(p.display_name) LIKE LOWER(?1) OR LOWER(n.nickname) LIKE LOWER(?1))",
        );
        if opts.only_online {
            where_clause.push_str(" AND p.online = 1");
        }
        if opts.only_banned {
            where_clause.push_str(" AND p.bans_count > 0");
        }
        let columns = FULL_COLUMNS
            .split(',')
            .map(|c| format!("p.{}", c.trim()))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "SELECT DISTINCT {columns} FROM players p
             LEFT JOIN nicknames n ON n.player_id = p.id
             WHERE {where_clause} {} LIMIT ?2",
            order_clause(opts.sort, "p.")
        );
        let pattern = format!("%{query}%");
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(rusqlite::params![pattern, limit], full_row)?;
            rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
        })
    }

    pub fn count_players(&self, opts: &ListOptions) -> Result<i64, DbError> {
        let mut where_clause = String::from("1=1");
        if opts.only_online {
            where_clause.push_str(" AND online = 1");
        }
        if opts.only_banned {
            where_clause.push_str(" AND bans_count > 0");
        }
        self.with_conn(|conn| {
            let n = conn.query_row(
                &format!("SELECT COUNT(*) FROM players WHERE {where_clause}"),
                [],
                |row| row.get(0),
            )?;
            Ok(n)
        })
    }

    /// Delete all roster data. The autoincrement sequences are reset so a
    /// re-seeded database starts from id 1 again.
    pub fn wipe_all_data(&self) -> Result<(), DbError> {
        const TABLES: &[&str] = &[
            "watched_players",
            "player_history",
            "sync_log",
            "nicknames",
            "player_links",
            "player_servers",
            "players",
        ];
        self.with_conn(|conn| {
            for table in TABLES {
                conn.execute(&format!("DELETE FROM {table}"), [])?;
            }
            conn.execute(
                "DELETE FROM sqlite_sequence WHERE name IN
                    ('players','player_history','sync_log','nicknames','player_links','player_servers')",
                [],
            )?;
            tracing::info!("All roster data wiped");
            Ok(())
        })
    }
}

fn order_clause(sort: SortKey, prefix: &str) -> String {
    match sort {
        SortKey::Updated => format!("ORDER BY {prefix}updated_at DESC"),
        SortKey::Playtime => {
            format!("ORDER BY {prefix}playtime_sec DESC, {prefix}updated_at DESC")
        }
        SortKey::Bans => format!(
            "ORDER BY {prefix}bans_count DESC, {prefix}playtime_sec DESC, {prefix}updated_at DESC"
        ),
        SortKey::Online => format!(
            "ORDER BY {prefix}online DESC, COALESCE({prefix}last_seen_at,'') DESC, {prefix}updated_at DESC"
        ),
    }
}
