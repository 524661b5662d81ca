use super::{sample_player, test_db};
use crate::DbError;
use crate::watchlist::WATCH_LIMIT;

fn seeded_ids(db: &crate::Database, n: usize) -> Vec<i64> {
    (0..n)
        .map(|i| {
            let cftools_id = format!("{i:024x}");
            db.upsert_player(&sample_player(&cftools_id)).unwrap()
        })
        .collect()
}

#[test]
fn add_fails_with_limit_error_when_full() {
    let db = test_db();
    let ids = seeded_ids(&db, WATCH_LIMIT + 1);

    for id in &ids[..WATCH_LIMIT] {
        db.add_watched(*id).unwrap();
    }

    let err = db.add_watched(ids[WATCH_LIMIT]).unwrap_err();
    assert!(matches!(err, DbError::WatchLimitReached(limit) if limit == WATCH_LIMIT));
    assert!(err.is_watch_limit());

    // The existing entries are unaffected.
    assert_eq!(db.watched_ids().unwrap().len(), WATCH_LIMIT);
}

#[test]
fn watched_ids_ordered_by_add_time() {
    let db = test_db();
    let ids = seeded_ids(&db, 3);

    db.add_watched(ids[2]).unwrap();
    db.add_watched(ids[0]).unwrap();
    db.add_watched(ids[1]).unwrap();

    let watched = db.watched_ids().unwrap();
    assert_eq!(
        watched,
        vec![format!("{:024x}", 2), format!("{:024x}", 0), format!("{:024x}", 1)]
    );
}

#[test]
fn remove_is_idempotent() {
    let db = test_db();
    let ids = seeded_ids(&db, 1);

    db.add_watched(ids[0]).unwrap();
    assert!(db.is_watched(ids[0]).unwrap());

    db.remove_watched(ids[0]).unwrap();
    assert!(!db.is_watched(ids[0]).unwrap());

    // Removing an absent entry is not an error.
    db.remove_watched(ids[0]).unwrap();
    db.remove_watched(9999).unwrap();
}

#[test]
fn readding_existing_entry_is_noop() {
    let db = test_db();
    let ids = seeded_ids(&db, 2);

    db.add_watched(ids[0]).unwrap();
    db.add_watched(ids[0]).unwrap();
    assert_eq!(db.watched_ids().unwrap().len(), 1);

    db.add_watched(ids[1]).unwrap();
    assert_eq!(db.watched_ids().unwrap().len(), 2);
}

#[test]
fn watched_players_are_hydrated() {
    let db = test_db();
    let ids = seeded_ids(&db, 2);
    db.add_watched(ids[0]).unwrap();
    db.upsert_nickname(ids[0], "GhostWalker", "alias").unwrap();

    let players = db.watched_players().unwrap();
    assert_eq!(players.len(), 1);
    assert_eq!(players[0].display_name, "Raider99");
    assert!(players[0].nicknames.contains(&"GhostWalker".to_string()));
}
