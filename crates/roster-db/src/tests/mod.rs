use crate::Database;
use crate::players::Player;

fn test_db() -> Database {
    Database::open_in_memory().expect("Failed to create test DB")
}

fn sample_player(cftools_id: &str) -> Player {
    Player {
        cftools_id: cftools_id.into(),
        display_name: "Raider99".into(),
        avatar: "https://cdn.example.com/a.png".into(),
        account_status: 1,
        playtime_sec: 3600,
        sessions_count: 12,
        bans_count: 1,
        linked_accounts_count: 2,
        online: true,
        last_server_identifier: "Chernarus One".into(),
        raw_status: "{}".into(),
        steam64: "76561198000000001".into(),
        steam_persona: "raider".into(),
        steam_vac_bans: 1,
        steam_game_bans: 0,
        ..Player::default()
    }
}

mod history;
mod nicknames;
mod players;
mod satellites;
mod watchlist;
