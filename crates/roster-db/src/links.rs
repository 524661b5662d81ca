//! Linked-account snapshot set.
//!
//! The external source returns the complete current link set on every full
//! synchronization, so the stored set is replaced wholesale each time.

use serde::{Deserialize, Serialize};

use crate::{Database, DbError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerLink {
    pub linked_cftools_id: String,
    pub confirmed: bool,
    pub trusted: bool,
}

impl Database {
    /// Replace the player's link set with the given snapshot.
    pub fn replace_links(&self, player_id: i64, links: &[PlayerLink]) -> Result<(), DbError> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM player_links WHERE player_id = ?1", [player_id])?;
            let mut stmt = conn.prepare(
                "INSERT INTO player_links (player_id, linked_cftools_id, confirmed, trusted)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(player_id, linked_cftools_id) DO UPDATE SET
                    confirmed = excluded.confirmed, trusted = excluded.trusted",
            )?;
            for link in links {
                stmt.execute(rusqlite::params![
                    player_id,
                    link.linked_cftools_id,
                    link.confirmed,
                    link.trusted,
                ])?;
            }
            Ok(())
        })
    }

    pub fn player_link_ids(&self, player_id: i64) -> Result<Vec<String>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT linked_cftools_id FROM player_links WHERE player_id = ?1 ORDER BY id",
            )?;
            let rows = stmt.query_map([player_id], |row| row.get(0))?;
            rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
        })
    }

    pub fn player_links(&self, player_id: i64) -> Result<Vec<PlayerLink>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT linked_cftools_id, confirmed, trusted
                 FROM player_links WHERE player_id = ?1 ORDER BY id",
            )?;
            let rows = stmt.query_map([player_id], |row| {
                Ok(PlayerLink {
                    linked_cftools_id: row.get(0)?,
                    confirmed: row.get(1)?,
                    trusted: row.get(2)?,
                })
            })?;
            rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
        })
    }
}
