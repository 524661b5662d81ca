use super::{sample_player, test_db};
use crate::players::{ListOptions, Player, SortKey};

#[test]
fn upsert_assigns_stable_id() {
    let db = test_db();
    let id = db.upsert_player(&sample_player("a1b2c3d4e5f6a1b2c3d4e5f6")).unwrap();
    assert!(id > 0);

    let again = db.upsert_player(&sample_player("a1b2c3d4e5f6a1b2c3d4e5f6")).unwrap();
    assert_eq!(id, again);

    let other = db.upsert_player(&sample_player("ffffffffffffffffffffffff")).unwrap();
    assert_ne!(id, other);
}

#[test]
fn upsert_preserves_nonempty_fields_on_empty_update() {
    let db = test_db();
    let id = db.upsert_player(&sample_player("a1b2c3d4e5f6a1b2c3d4e5f6")).unwrap();

    // A later sync where most payloads failed: nearly everything is empty.
    let sparse = Player {
        cftools_id: "a1b2c3d4e5f6a1b2c3d4e5f6".into(),
        online: false,
        ..Player::default()
    };
    assert_eq!(db.upsert_player(&sparse).unwrap(), id);

    let p = db.get_player("a1b2c3d4e5f6a1b2c3d4e5f6").unwrap().unwrap();
    assert_eq!(p.display_name, "Raider99");
    assert_eq!(p.avatar, "https://cdn.example.com/a.png");
    assert_eq!(p.playtime_sec, 3600);
    assert_eq!(p.sessions_count, 12);
    assert_eq!(p.bans_count, 1);
    assert_eq!(p.last_server_identifier, "Chernarus One");
    assert_eq!(p.steam64, "76561198000000001");
    // The online flag is a real state, not an unknown: it does regress.
    assert!(!p.online);
}

#[test]
fn upsert_overwrites_with_fresh_values() {
    let db = test_db();
    db.upsert_player(&sample_player("a1b2c3d4e5f6a1b2c3d4e5f6")).unwrap();

    let renamed = Player {
        display_name: "NightOwl".into(),
        playtime_sec: 7200,
        ..sample_player("a1b2c3d4e5f6a1b2c3d4e5f6")
    };
    db.upsert_player(&renamed).unwrap();

    let p = db.get_player("a1b2c3d4e5f6a1b2c3d4e5f6").unwrap().unwrap();
    assert_eq!(p.display_name, "NightOwl");
    assert_eq!(p.playtime_sec, 7200);
}

#[test]
fn steam_ban_counts_only_overwritten_when_new_bans_present() {
    let db = test_db();
    db.upsert_player(&sample_player("a1b2c3d4e5f6a1b2c3d4e5f6")).unwrap();

    // Empty steam fetch: both counters zero. Previous counts must survive.
    let empty_steam = Player {
        steam_vac_bans: 0,
        steam_game_bans: 0,
        ..sample_player("a1b2c3d4e5f6a1b2c3d4e5f6")
    };
    db.upsert_player(&empty_steam).unwrap();
    let p = db.get_player("a1b2c3d4e5f6a1b2c3d4e5f6").unwrap().unwrap();
    assert_eq!(p.steam_vac_bans, 1);
    assert_eq!(p.steam_game_bans, 0);

    // Any nonzero count in the pair overwrites both.
    let new_bans = Player {
        steam_vac_bans: 0,
        steam_game_bans: 3,
        ..sample_player("a1b2c3d4e5f6a1b2c3d4e5f6")
    };
    db.upsert_player(&new_bans).unwrap();
    let p = db.get_player("a1b2c3d4e5f6a1b2c3d4e5f6").unwrap().unwrap();
    assert_eq!(p.steam_vac_bans, 0);
    assert_eq!(p.steam_game_bans, 3);
}

#[test]
fn get_player_missing_returns_none() {
    let db = test_db();
    assert!(db.get_player("ffffffffffffffffffffffff").unwrap().is_none());
}

#[test]
fn update_online_status_keeps_last_server_when_offline() {
    let db = test_db();
    let id = db.upsert_player(&sample_player("a1b2c3d4e5f6a1b2c3d4e5f6")).unwrap();

    db.update_online_status(id, true, "Livonia Two").unwrap();
    let p = db.get_player("a1b2c3d4e5f6a1b2c3d4e5f6").unwrap().unwrap();
    assert!(p.online);
    assert_eq!(p.last_server_identifier, "Livonia Two");
    assert!(p.last_seen_at.is_some());

    db.update_online_status(id, false, "").unwrap();
    let p = db.get_player("a1b2c3d4e5f6a1b2c3d4e5f6").unwrap().unwrap();
    assert!(!p.online);
    assert_eq!(p.last_server_identifier, "Livonia Two");
}

#[test]
fn list_and_count_with_filters() {
    let db = test_db();
    db.upsert_player(&sample_player("a1b2c3d4e5f6a1b2c3d4e5f6")).unwrap();
    let offline = Player {
        online: false,
        bans_count: 0,
        ..sample_player("ffffffffffffffffffffffff")
    };
    db.upsert_player(&offline).unwrap();

    assert_eq!(db.count_players(&ListOptions::default()).unwrap(), 2);

    let online_only = ListOptions {
        only_online: true,
        ..ListOptions::default()
    };
    let listed = db.list_players(&online_only).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].cftools_id, "a1b2c3d4e5f6a1b2c3d4e5f6");
    assert_eq!(db.count_players(&online_only).unwrap(), 1);

    let banned_only = ListOptions {
        only_banned: true,
        sort: SortKey::Bans,
        ..ListOptions::default()
    };
    assert_eq!(db.list_players(&banned_only).unwrap().len(), 1);
}

#[test]
fn search_matches_display_name_and_nicknames() {
    let db = test_db();
    let id = db.upsert_player(&sample_player("a1b2c3d4e5f6a1b2c3d4e5f6")).unwrap();
    db.upsert_nickname(id, "GhostWalker", "alias").unwrap();

    let by_display = db
        .search_by_nickname("raider", 0, &ListOptions::default())
        .unwrap();
    assert_eq!(by_display.len(), 1);

    let by_alias = db
        .search_by_nickname("ghost", 0, &ListOptions::default())
        .unwrap();
    assert_eq!(by_alias.len(), 1);
    assert_eq!(by_alias[0].cftools_id, "a1b2c3d4e5f6a1b2c3d4e5f6");

    let no_match = db
        .search_by_nickname("nobody", 0, &ListOptions::default())
        .unwrap();
    assert!(no_match.is_empty());
}

#[test]
fn wipe_clears_everything() {
    let db = test_db();
    let id = db.upsert_player(&sample_player("a1b2c3d4e5f6a1b2c3d4e5f6")).unwrap();
    db.upsert_nickname(id, "GhostWalker", "alias").unwrap();
    db.add_watched(id).unwrap();
    db.log_sync(id, "a1b2c3d4e5f6a1b2c3d4e5f6", "Raider99").unwrap();

    db.wipe_all_data().unwrap();
    assert_eq!(db.count_players(&ListOptions::default()).unwrap(), 0);
    assert!(db.watched_ids().unwrap().is_empty());
    assert!(db.recent_syncs(0).unwrap().is_empty());

    // Sequences reset: the next player starts from id 1 again.
    let fresh = db.upsert_player(&sample_player("ffffffffffffffffffffffff")).unwrap();
    assert_eq!(fresh, 1);
}
