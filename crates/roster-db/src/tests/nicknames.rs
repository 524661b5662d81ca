use super::{sample_player, test_db};

#[test]
fn nicknames_accumulate_and_bump_last_seen() {
    let db = test_db();
    let id = db.upsert_player(&sample_player("a1b2c3d4e5f6a1b2c3d4e5f6")).unwrap();

    db.upsert_nickname(id, "Raider99", "display_name").unwrap();
    db.upsert_nickname(id, "NightOwl", "alias").unwrap();
    assert_eq!(db.player_nicknames(id).unwrap(), vec!["Raider99", "NightOwl"]);

    // Re-observation adds no row, only bumps last_seen_at.
    let before = db.player_nickname_records(id).unwrap();
    db.upsert_nickname(id, "Raider99", "tracker").unwrap();
    let after = db.player_nickname_records(id).unwrap();
    assert_eq!(after.len(), 2);
    assert_eq!(after[0].source, "display_name");
    assert!(after[0].last_seen_at >= before[0].last_seen_at);
    assert_eq!(after[0].first_seen_at, before[0].first_seen_at);
}

#[test]
fn nicknames_are_unique_per_player_not_globally() {
    let db = test_db();
    let a = db.upsert_player(&sample_player("a1b2c3d4e5f6a1b2c3d4e5f6")).unwrap();
    let b = db.upsert_player(&sample_player("ffffffffffffffffffffffff")).unwrap();

    db.upsert_nickname(a, "Raider99", "display_name").unwrap();
    db.upsert_nickname(b, "Raider99", "display_name").unwrap();

    assert_eq!(db.player_nicknames(a).unwrap().len(), 1);
    assert_eq!(db.player_nicknames(b).unwrap().len(), 1);
}

#[test]
fn nicknames_cascade_with_player_wipe() {
    let db = test_db();
    let id = db.upsert_player(&sample_player("a1b2c3d4e5f6a1b2c3d4e5f6")).unwrap();
    db.upsert_nickname(id, "Raider99", "display_name").unwrap();

    db.wipe_all_data().unwrap();
    assert!(db.player_nicknames(id).unwrap().is_empty());
}
