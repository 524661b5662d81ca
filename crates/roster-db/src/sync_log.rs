//! Append-only audit log of successful synchronizations.

use serde::{Deserialize, Serialize};

use crate::{Database, DbError, timefmt};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncLogEntry {
    pub player_id: i64,
    pub cftools_id: String,
    pub display_name: String,
    pub ts: String,
}

impl Database {
    pub fn log_sync(
        &self,
        player_id: i64,
        cftools_id: &str,
        display_name: &str,
    ) -> Result<(), DbError> {
        let now = timefmt::now();
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO sync_log (player_id, cftools_id, display_name, ts)
                 VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![player_id, cftools_id, display_name, now],
            )?;
            Ok(())
        })
    }

    /// Most recent sync-log entries, newest first.
    pub fn recent_syncs(&self, limit: i64) -> Result<Vec<SyncLogEntry>, DbError> {
        let limit = if limit <= 0 { 100 } else { limit };
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT player_id, cftools_id, display_name, ts
                 FROM sync_log ORDER BY id DESC LIMIT ?1",
            )?;
            let rows = stmt.query_map([limit], |row| {
                Ok(SyncLogEntry {
                    player_id: row.get(0)?,
                    cftools_id: row.get(1)?,
                    display_name: row.get(2)?,
                    ts: row.get(3)?,
                })
            })?;
            rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
        })
    }
}
