use chrono::{DateTime, TimeZone, Utc};

use super::{sample_player, test_db};
use crate::history::HistoryRecord;

fn t(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

fn record(online: bool, ts: DateTime<Utc>) -> HistoryRecord {
    HistoryRecord {
        ts,
        online,
        server_name: if online { "Chernarus One".into() } else { String::new() },
        playtime_sec: 0,
        sessions_count: 0,
        display_name: "Raider99".into(),
        session_duration_sec: 0,
        offline_duration_sec: 0,
    }
}

#[test]
fn last_history_returns_newest_entry() {
    let db = test_db();
    let id = db.upsert_player(&sample_player("a1b2c3d4e5f6a1b2c3d4e5f6")).unwrap();
    assert!(db.last_history(id).unwrap().is_none());

    db.append_history(id, &record(true, t(0))).unwrap();
    db.append_history(id, &record(false, t(90))).unwrap();

    let last = db.last_history(id).unwrap().unwrap();
    assert!(!last.online);
    assert_eq!(last.ts, t(90));
}

#[test]
fn history_is_returned_newest_first() {
    let db = test_db();
    let id = db.upsert_player(&sample_player("a1b2c3d4e5f6a1b2c3d4e5f6")).unwrap();

    for i in 0..4 {
        db.append_history(id, &record(i % 2 == 0, t(i * 60))).unwrap();
    }

    let all = db.player_history(id, 0).unwrap();
    assert_eq!(all.len(), 4);
    assert!(all[0].ts > all[3].ts);

    let limited = db.player_history(id, 2).unwrap();
    assert_eq!(limited.len(), 2);
    assert_eq!(limited[0].ts, t(180));
}

#[test]
fn durations_round_trip() {
    let db = test_db();
    let id = db.upsert_player(&sample_player("a1b2c3d4e5f6a1b2c3d4e5f6")).unwrap();

    let mut rec = record(false, t(0));
    rec.session_duration_sec = 5400;
    db.append_history(id, &rec).unwrap();

    let stored = db.last_history(id).unwrap().unwrap();
    assert_eq!(stored.session_duration_sec, 5400);
    assert_eq!(stored.offline_duration_sec, 0);
}
