//! Server association snapshot set, same replace semantics as links.

use serde::{Deserialize, Serialize};

use crate::{Database, DbError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerServer {
    pub cftools_server_id: String,
    pub identifier: String,
    pub game_type: i64,
}

impl Database {
    /// Replace the player's server association set with the given snapshot.
    pub fn replace_servers(
        &self,
        player_id: i64,
        servers: &[PlayerServer],
    ) -> Result<(), DbError> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM player_servers WHERE player_id = ?1", [player_id])?;
            let mut stmt = conn.prepare(
                "INSERT INTO player_servers (player_id, cftools_server_id, identifier, game_type)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(player_id, cftools_server_id) DO UPDATE SET
                    identifier = excluded.identifier, game_type = excluded.game_type",
            )?;
            for server in servers {
                stmt.execute(rusqlite::params![
                    player_id,
                    server.cftools_server_id,
                    server.identifier,
                    server.game_type,
                ])?;
            }
            Ok(())
        })
    }

    pub fn player_server_ids(&self, player_id: i64) -> Result<Vec<String>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT cftools_server_id FROM player_servers WHERE player_id = ?1 ORDER BY id",
            )?;
            let rows = stmt.query_map([player_id], |row| row.get(0))?;
            rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
        })
    }
}
