//! Accumulated nickname observations.
//!
//! Nicknames are never deleted individually: a re-observation only bumps
//! the last-seen timestamp. This is deliberately different from the
//! link/server snapshot sets, which track the service's current state.

use serde::{Deserialize, Serialize};

use crate::{Database, DbError, timefmt};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Nickname {
    pub nickname: String,
    pub source: String,
    pub first_seen_at: String,
    pub last_seen_at: String,
}

impl Database {
    /// Record a nickname observation, bumping last-seen on repeats. The
    /// source tag from the first observation wins.
    pub fn upsert_nickname(
        &self,
        player_id: i64,
        nickname: &str,
        source: &str,
    ) -> Result<(), DbError> {
        let now = timefmt::now();
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO nicknames (player_id, nickname, source, first_seen_at, last_seen_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)
                 ON CONFLICT(player_id, nickname) DO UPDATE SET last_seen_at = excluded.last_seen_at",
                rusqlite::params![player_id, nickname, source, now],
            )?;
            Ok(())
        })
    }

    /// Nickname strings only, oldest first.
    pub fn player_nicknames(&self, player_id: i64) -> Result<Vec<String>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT nickname FROM nicknames WHERE player_id = ?1 ORDER BY id")?;
            let rows = stmt.query_map([player_id], |row| row.get(0))?;
            rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
        })
    }

    /// Full nickname rows with source tags and observation timestamps.
    pub fn player_nickname_records(&self, player_id: i64) -> Result<Vec<Nickname>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT nickname, source, first_seen_at, last_seen_at
                 FROM nicknames WHERE player_id = ?1 ORDER BY id",
            )?;
            let rows = stmt.query_map([player_id], |row| {
                Ok(Nickname {
                    nickname: row.get(0)?,
                    source: row.get(1)?,
                    first_seen_at: row.get(2)?,
                    last_seen_at: row.get(3)?,
                })
            })?;
            rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
        })
    }
}
