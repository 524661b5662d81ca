//! Append-only presence history log.
//!
//! Rows are written only on online/offline transitions, never on every
//! poll, and are never mutated afterwards. Durations are derived at write
//! time: the session length lands on the entry that goes offline, the
//! offline gap on the entry that comes back online.

use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::{Database, DbError, timefmt};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub ts: DateTime<Utc>,
    pub online: bool,
    pub server_name: String,
    pub playtime_sec: i64,
    pub sessions_count: i64,
    pub display_name: String,
    pub session_duration_sec: i64,
    pub offline_duration_sec: i64,
}

fn history_row(row: &Row) -> rusqlite::Result<HistoryRecord> {
    Ok(HistoryRecord {
        ts: timefmt::parse_opt(row.get(0)?).unwrap_or_default(),
        online: row.get(1)?,
        server_name: row.get(2)?,
        playtime_sec: row.get(3)?,
        sessions_count: row.get(4)?,
        display_name: row.get(5)?,
        session_duration_sec: row.get(6)?,
        offline_duration_sec: row.get(7)?,
    })
}

const HISTORY_COLUMNS: &str =
    "ts, online, server_name, playtime_sec, sessions_count, display_name,
     session_duration_sec, offline_duration_sec";

impl Database {
    pub fn append_history(&self, player_id: i64, record: &HistoryRecord) -> Result<(), DbError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO player_history (player_id, ts, online, server_name, playtime_sec,
                    sessions_count, display_name, session_duration_sec, offline_duration_sec)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                rusqlite::params![
                    player_id,
                    timefmt::fmt(record.ts),
                    record.online,
                    record.server_name,
                    record.playtime_sec,
                    record.sessions_count,
                    record.display_name,
                    record.session_duration_sec,
                    record.offline_duration_sec,
                ],
            )?;
            Ok(())
        })
    }

    /// Most recent history entry, if any. This is what the tracker compares
    /// a fresh observation against to detect a state change.
    pub fn last_history(&self, player_id: i64) -> Result<Option<HistoryRecord>, DbError> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {HISTORY_COLUMNS} FROM player_history
                 WHERE player_id = ?1 ORDER BY ts DESC LIMIT 1"
            );
            let mut stmt = conn.prepare(&sql)?;
            Ok(stmt.query_row([player_id], history_row).optional()?)
        })
    }

    /// History entries, newest first.
    pub fn player_history(
        &self,
        player_id: i64,
        limit: i64,
    ) -> Result<Vec<HistoryRecord>, DbError> {
        let limit = if limit <= 0 { 500 } else { limit };
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {HISTORY_COLUMNS} FROM player_history
                 WHERE player_id = ?1 ORDER BY ts DESC LIMIT ?2"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(rusqlite::params![player_id, limit], history_row)?;
            rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
        })
    }
}
