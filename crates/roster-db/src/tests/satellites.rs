use super::{sample_player, test_db};
use crate::links::PlayerLink;
use crate::servers::PlayerServer;

fn link(id: &str, confirmed: bool) -> PlayerLink {
    PlayerLink {
        linked_cftools_id: id.into(),
        confirmed,
        trusted: false,
    }
}

#[test]
fn links_are_replaced_wholesale() {
    let db = test_db();
    let id = db.upsert_player(&sample_player("a1b2c3d4e5f6a1b2c3d4e5f6")).unwrap();

    db.replace_links(id, &[link("111111111111111111111111", true), link("222222222222222222222222", false)])
        .unwrap();
    assert_eq!(
        db.player_link_ids(id).unwrap(),
        vec!["111111111111111111111111", "222222222222222222222222"]
    );

    // The next snapshot no longer contains the second link: it is gone.
    db.replace_links(id, &[link("111111111111111111111111", true)]).unwrap();
    assert_eq!(db.player_link_ids(id).unwrap(), vec!["111111111111111111111111"]);

    let detailed = db.player_links(id).unwrap();
    assert_eq!(detailed.len(), 1);
    assert!(detailed[0].confirmed);
    assert!(!detailed[0].trusted);
}

#[test]
fn empty_snapshot_clears_links() {
    let db = test_db();
    let id = db.upsert_player(&sample_player("a1b2c3d4e5f6a1b2c3d4e5f6")).unwrap();
    db.replace_links(id, &[link("111111111111111111111111", false)]).unwrap();
    db.replace_links(id, &[]).unwrap();
    assert!(db.player_link_ids(id).unwrap().is_empty());
}

#[test]
fn servers_are_replaced_wholesale() {
    let db = test_db();
    let id = db.upsert_player(&sample_player("a1b2c3d4e5f6a1b2c3d4e5f6")).unwrap();

    let servers = vec![
        PlayerServer {
            cftools_server_id: "srv-1".into(),
            identifier: "Chernarus One".into(),
            game_type: 1,
        },
        PlayerServer {
            cftools_server_id: "srv-2".into(),
            identifier: "Livonia Two".into(),
            game_type: 1,
        },
    ];
    db.replace_servers(id, &servers).unwrap();
    assert_eq!(db.player_server_ids(id).unwrap(), vec!["srv-1", "srv-2"]);

    db.replace_servers(id, &servers[1..]).unwrap();
    assert_eq!(db.player_server_ids(id).unwrap(), vec!["srv-2"]);
}

#[test]
fn sync_log_appends() {
    let db = test_db();
    let id = db.upsert_player(&sample_player("a1b2c3d4e5f6a1b2c3d4e5f6")).unwrap();
    db.log_sync(id, "a1b2c3d4e5f6a1b2c3d4e5f6", "Raider99").unwrap();
    db.log_sync(id, "a1b2c3d4e5f6a1b2c3d4e5f6", "NightOwl").unwrap();

    let entries = db.recent_syncs(10).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].display_name, "NightOwl");
    assert_eq!(entries[1].display_name, "Raider99");
}
