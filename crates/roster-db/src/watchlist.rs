//! Bounded watch-list of players subject to background presence tracking.

use rusqlite::OptionalExtension;

use crate::players::Player;
use crate::{Database, DbError, timefmt};

/// Hard cap on concurrently tracked players. The external source is
/// rate-sensitive and the tracker polls every entry sequentially.
pub const WATCH_LIMIT: usize = 10;

impl Database {
    /// Add a player to the watch-list. Fails with
    /// [`DbError::WatchLimitReached`] once the list is full; re-adding an
    /// already watched player is a no-op.
    pub fn add_watched(&self, player_id: i64) -> Result<(), DbError> {
        let now = timefmt::now();
        self.with_conn(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM watched_players", [], |row| {
                row.get(0)
            })?;
            if count as usize >= WATCH_LIMIT {
                return Err(DbError::WatchLimitReached(WATCH_LIMIT));
            }
            conn.execute(
                "INSERT OR IGNORE INTO watched_players (player_id, added_at) VALUES (?1, ?2)",
                rusqlite::params![player_id, now],
            )?;
            Ok(())
        })
    }

    /// Removing an absent entry is not an error.
    pub fn remove_watched(&self, player_id: i64) -> Result<(), DbError> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM watched_players WHERE player_id = ?1", [player_id])?;
            Ok(())
        })
    }

    pub fn is_watched(&self, player_id: i64) -> Result<bool, DbError> {
        self.with_conn(|conn| {
            let row: Option<i64> = conn
                .query_row(
                    "SELECT 1 FROM watched_players WHERE player_id = ?1",
                    [player_id],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(row.is_some())
        })
    }

    /// External identifiers of watched players, in add order.
    pub fn watched_ids(&self) -> Result<Vec<String>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT p.cftools_id FROM players p
                 JOIN watched_players wp ON p.id = wp.player_id
                 ORDER BY wp.added_at",
            )?;
            let rows = stmt.query_map([], |row| row.get(0))?;
            rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
        })
    }

    /// Hydrated records of watched players, in add order.
    pub fn watched_players(&self) -> Result<Vec<Player>, DbError> {
        let mut players = Vec::new();
        for cftools_id in self.watched_ids()? {
            if let Some(player) = self.get_player(&cftools_id)? {
                players.push(player);
            }
        }
        Ok(players)
    }
}
