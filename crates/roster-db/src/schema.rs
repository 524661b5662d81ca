//! Database schema definitions and migrations.

use rusqlite::Connection;

use crate::DbError;

pub fn run_migrations(conn: &Connection) -> Result<(), DbError> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS players (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    cftools_id TEXT NOT NULL UNIQUE,
    display_name TEXT NOT NULL DEFAULT '',
    avatar TEXT NOT NULL DEFAULT '',
    is_bot INTEGER NOT NULL DEFAULT 0,
    account_status INTEGER NOT NULL DEFAULT 0,
    playtime_sec INTEGER NOT NULL DEFAULT 0,
    sessions_count INTEGER NOT NULL DEFAULT 0,
    bans_count INTEGER NOT NULL DEFAULT 0,
    linked_accounts_count INTEGER NOT NULL DEFAULT 0,
    last_activity_at TEXT,
    last_seen_at TEXT,
    online INTEGER NOT NULL DEFAULT 0,
    last_server_identifier TEXT NOT NULL DEFAULT '',
    raw_status TEXT NOT NULL DEFAULT '',
    raw_overview TEXT NOT NULL DEFAULT '',
    raw_structure TEXT NOT NULL DEFAULT '',
    raw_play_state TEXT NOT NULL DEFAULT '',
    raw_bans TEXT NOT NULL DEFAULT '',
    raw_battleye TEXT NOT NULL DEFAULT '',
    steam64 TEXT NOT NULL DEFAULT '',
    steam_avatar TEXT NOT NULL DEFAULT '',
    steam_persona TEXT NOT NULL DEFAULT '',
    steam_vac_bans INTEGER NOT NULL DEFAULT 0,
    steam_game_bans INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
CREATE INDEX IF NOT EXISTS idx_players_cftools_id ON players(cftools_id);
CREATE INDEX IF NOT EXISTS idx_players_display_name ON players(display_name);

CREATE TABLE IF NOT EXISTS nicknames (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    player_id INTEGER NOT NULL REFERENCES players(id) ON DELETE CASCADE,
    nickname TEXT NOT NULL,
    source TEXT NOT NULL DEFAULT 'display_name',
    first_seen_at TEXT NOT NULL,
    last_seen_at TEXT NOT NULL,
    UNIQUE(player_id, nickname)
);
CREATE INDEX IF NOT EXISTS idx_nicknames_nickname ON nicknames(nickname);
CREATE INDEX IF NOT EXISTS idx_nicknames_player_id ON nicknames(player_id);

CREATE TABLE IF NOT EXISTS player_links (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    player_id INTEGER NOT NULL REFERENCES players(id) ON DELETE CASCADE,
    linked_cftools_id TEXT NOT NULL,
    confirmed INTEGER NOT NULL DEFAULT 0,
    trusted INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    UNIQUE(player_id, linked_cftools_id)
);
CREATE INDEX IF NOT EXISTS idx_player_links_player_id ON player_links(player_id);

CREATE TABLE IF NOT EXISTS player_servers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    player_id INTEGER NOT NULL REFERENCES players(id) ON DELETE CASCADE,
    cftools_server_id TEXT NOT NULL,
    identifier TEXT NOT NULL DEFAULT '',
    game_type INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    UNIQUE(player_id, cftools_server_id)
);
CREATE INDEX IF NOT EXISTS idx_player_servers_player_id ON player_servers(player_id);

CREATE TABLE IF NOT EXISTS player_history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    player_id INTEGER NOT NULL REFERENCES players(id) ON DELETE CASCADE,
    ts TEXT NOT NULL,
    online INTEGER NOT NULL DEFAULT 0,
    server_name TEXT NOT NULL DEFAULT '',
    playtime_sec INTEGER NOT NULL DEFAULT 0,
    sessions_count INTEGER NOT NULL DEFAULT 0,
    display_name TEXT NOT NULL DEFAULT '',
    session_duration_sec INTEGER NOT NULL DEFAULT 0,
    offline_duration_sec INTEGER NOT NULL DEFAULT 0
);
CREATE INDEX IF NOT EXISTS idx_player_history_player_id ON player_history(player_id);
CREATE INDEX IF NOT EXISTS idx_player_history_ts ON player_history(ts);

CREATE TABLE IF NOT EXISTS watched_players (
    player_id INTEGER NOT NULL PRIMARY KEY REFERENCES players(id) ON DELETE CASCADE,
    added_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS sync_log (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    player_id INTEGER NOT NULL REFERENCES players(id) ON DELETE CASCADE,
    cftools_id TEXT NOT NULL,
    display_name TEXT NOT NULL DEFAULT '',
    ts TEXT NOT NULL DEFAULT (datetime('now'))
);
CREATE INDEX IF NOT EXISTS idx_sync_log_player_id ON sync_log(player_id);
"#;
