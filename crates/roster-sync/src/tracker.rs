//! Background presence tracker over the watch-list.
//!
//! Two independently scheduled loops share one cancellation token: a fast
//! loop refreshing online/offline state and a slow loop refreshing
//! display names and nicknames. Each loop walks the watch-list strictly
//! sequentially with a small inter-player delay to stay under the external
//! source's implicit rate limits.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use cftools_client::CfClient;
use roster_db::history::HistoryRecord;
use roster_db::{Database, DbError};
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval, sleep};
use tokio_util::sync::CancellationToken;

use crate::normalize;

#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Fast loop: online/offline state refresh.
    pub play_state_interval: Duration,
    /// Slow loop: display name and nickname refresh.
    pub profile_interval: Duration,
    pub play_state_startup_delay: Duration,
    pub profile_startup_delay: Duration,
    pub play_state_player_delay: Duration,
    pub profile_player_delay: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            play_state_interval: Duration::from_secs(10),
            profile_interval: Duration::from_secs(5 * 60),
            play_state_startup_delay: Duration::from_secs(5),
            profile_startup_delay: Duration::from_secs(30),
            play_state_player_delay: Duration::from_millis(300),
            profile_player_delay: Duration::from_millis(500),
        }
    }
}

pub struct Tracker {
    client: Arc<CfClient>,
    db: Database,
    config: TrackerConfig,
    shutdown: CancellationToken,
}

impl Tracker {
    pub fn new(client: Arc<CfClient>, db: Database) -> Self {
        Self::with_config(client, db, TrackerConfig::default())
    }

    pub fn with_config(client: Arc<CfClient>, db: Database, config: TrackerConfig) -> Self {
        Self {
            client,
            db,
            config,
            shutdown: CancellationToken::new(),
        }
    }

    /// Spawn both loops. They run until [`Tracker::stop`] is called.
    pub fn start(&self) -> [JoinHandle<()>; 2] {
        tracing::info!(
            play_state_interval = ?self.config.play_state_interval,
            profile_interval = ?self.config.profile_interval,
            "Tracker started"
        );
        [
            tokio::spawn(play_state_loop(
                Arc::clone(&self.client),
                self.db.clone(),
                self.config.clone(),
                self.shutdown.clone(),
            )),
            tokio::spawn(profile_loop(
                Arc::clone(&self.client),
                self.db.clone(),
                self.config.clone(),
                self.shutdown.clone(),
            )),
        ]
    }

    /// Signal both loops to stop. They observe the signal between ticks
    /// and between players; an in-flight fetch finishes naturally.
    pub fn stop(&self) {
        self.shutdown.cancel();
    }
}

/// Returns true when the token was cancelled before the delay elapsed.
async fn sleep_or_cancel(token: &CancellationToken, duration: Duration) -> bool {
    tokio::select! {
        _ = token.cancelled() => true,
        _ = sleep(duration) => false,
    }
}

async fn play_state_loop(
    client: Arc<CfClient>,
    db: Database,
    config: TrackerConfig,
    shutdown: CancellationToken,
) {
    if sleep_or_cancel(&shutdown, config.play_state_startup_delay).await {
        tracing::info!("Play-state loop stopped (shutdown)");
        return;
    }

    // Delay (rather than burst) missed ticks: a pass that overruns the
    // interval triggers at most one immediate follow-up tick.
    let mut tick = interval(config.play_state_interval);
    tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                tracing::info!("Play-state loop stopped (shutdown)");
                return;
            }
            _ = tick.tick() => {}
        }
        play_state_pass(&client, &db, &config, &shutdown).await;
    }
}

async fn profile_loop(
    client: Arc<CfClient>,
    db: Database,
    config: TrackerConfig,
    shutdown: CancellationToken,
) {
    if sleep_or_cancel(&shutdown, config.profile_startup_delay).await {
        tracing::info!("Profile loop stopped (shutdown)");
        return;
    }

    let mut tick = interval(config.profile_interval);
    tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                tracing::info!("Profile loop stopped (shutdown)");
                return;
            }
            _ = tick.tick() => {}
        }
        profile_pass(&client, &db, &config, &shutdown).await;
    }
}

async fn play_state_pass(
    client: &CfClient,
    db: &Database,
    config: &TrackerConfig,
    shutdown: &CancellationToken,
) {
    let players = match db.watched_players() {
        Ok(players) => players,
        Err(e) => {
            tracing::warn!(error = %e, "play-state pass: watch list read failed");
            return;
        }
    };
    for player in players {
        update_play_state(client, db, player.id, &player.cftools_id, &player.display_name).await;
        if sleep_or_cancel(shutdown, config.play_state_player_delay).await {
            return;
        }
    }
}

async fn profile_pass(
    client: &CfClient,
    db: &Database,
    config: &TrackerConfig,
    shutdown: &CancellationToken,
) {
    let players = match db.watched_players() {
        Ok(players) => players,
        Err(e) => {
            tracing::warn!(error = %e, "profile pass: watch list read failed");
            return;
        }
    };
    for player in players {
        update_profile(client, db, player.id, &player.cftools_id).await;
        if sleep_or_cancel(shutdown, config.profile_player_delay).await {
            return;
        }
    }
}

async fn update_play_state(
    client: &CfClient,
    db: &Database,
    player_id: i64,
    cftools_id: &str,
    display_name: &str,
) {
    let bytes = match client.profile_play_state(cftools_id).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(cftools_id, error = %e, "play-state fetch failed");
            return;
        }
    };
    let (online, server_name) = normalize::parse_play_state(&bytes);

    if let Err(e) = db.update_online_status(player_id, online, &server_name) {
        tracing::warn!(cftools_id, error = %e, "online status update failed");
    }
    match record_presence(db, player_id, online, &server_name, display_name, Utc::now()) {
        Ok(true) => tracing::info!(cftools_id, online, "presence changed"),
        Ok(false) => {}
        Err(e) => tracing::warn!(cftools_id, error = %e, "history append failed"),
    }
}

async fn update_profile(client: &CfClient, db: &Database, player_id: i64, cftools_id: &str) {
    let status = match client.profile_status(cftools_id).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(cftools_id, error = %e, "status fetch failed");
            Vec::new()
        }
    };
    let overview = match client.profile_overview(cftools_id).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(cftools_id, error = %e, "overview fetch failed");
            Vec::new()
        }
    };

    let display_name = normalize::parse_display_name(&status);
    if !display_name.is_empty() {
        if let Err(e) = db.update_display_name(player_id, &display_name) {
            tracing::warn!(cftools_id, error = %e, "display name update failed");
        }
    }

    let mut nicknames = Vec::new();
    if normalize::is_nickname_candidate(&display_name, cftools_id) {
        nicknames.push(display_name);
    }
    nicknames.extend(normalize::parse_aliases(&overview, cftools_id));

    for nickname in nicknames {
        if let Err(e) = db.upsert_nickname(player_id, &nickname, "tracker") {
            tracing::warn!(cftools_id, nickname, error = %e, "nickname upsert failed");
        }
    }
}

/// Edge-triggered history append: a row is written only when the observed
/// online state differs from the last recorded entry. On a transition the
/// duration since that entry lands on the new row — as the offline gap
/// when coming online, as the session length when going offline. The very
/// first observation carries no duration at all.
///
/// Returns whether a row was appended.
pub fn record_presence(
    db: &Database,
    player_id: i64,
    online: bool,
    server_name: &str,
    display_name: &str,
    now: DateTime<Utc>,
) -> Result<bool, DbError> {
    let last = db.last_history(player_id)?;
    let changed = last.as_ref().map(|h| h.online != online).unwrap_or(true);
    if !changed {
        return Ok(false);
    }

    let mut session_duration_sec = 0;
    let mut offline_duration_sec = 0;
    if let Some(last) = &last {
        let elapsed = (now - last.ts).num_seconds();
        if online {
            offline_duration_sec = elapsed;
        } else {
            session_duration_sec = elapsed;
        }
    }

    db.append_history(
        player_id,
        &HistoryRecord {
            ts: now,
            online,
            server_name: server_name.to_string(),
            playtime_sec: 0,
            sessions_count: 0,
            display_name: display_name.to_string(),
            session_duration_sec,
            offline_duration_sec,
        },
    )?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use roster_db::players::Player;

    use super::*;

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn seeded(db: &Database) -> i64 {
        db.upsert_player(&Player {
            cftools_id: "a1b2c3d4e5f6a1b2c3d4e5f6".into(),
            display_name: "Raider99".into(),
            ..Player::default()
        })
        .unwrap()
    }

    #[test]
    fn only_state_changes_are_recorded() {
        let db = Database::open_in_memory().unwrap();
        let id = seeded(&db);

        let states = [true, true, false, false, true];
        for (i, online) in states.into_iter().enumerate() {
            record_presence(&db, id, online, "", "Raider99", t(i as i64 * 10)).unwrap();
        }

        // Five observations, three transitions, three rows.
        assert_eq!(db.player_history(id, 0).unwrap().len(), 3);
    }

    #[test]
    fn first_observation_has_no_durations() {
        let db = Database::open_in_memory().unwrap();
        let id = seeded(&db);

        assert!(record_presence(&db, id, true, "Chernarus One", "Raider99", t(0)).unwrap());
        let entry = db.last_history(id).unwrap().unwrap();
        assert!(entry.online);
        assert_eq!(entry.server_name, "Chernarus One");
        assert_eq!(entry.session_duration_sec, 0);
        assert_eq!(entry.offline_duration_sec, 0);
    }

    #[test]
    fn coming_online_derives_offline_duration() {
        let db = Database::open_in_memory().unwrap();
        let id = seeded(&db);

        record_presence(&db, id, false, "", "Raider99", t(0)).unwrap();
        record_presence(&db, id, true, "Chernarus One", "Raider99", t(420)).unwrap();

        let entry = db.last_history(id).unwrap().unwrap();
        assert!(entry.online);
        assert_eq!(entry.offline_duration_sec, 420);
        assert_eq!(entry.session_duration_sec, 0);
    }

    #[test]
    fn going_offline_derives_session_duration() {
        let db = Database::open_in_memory().unwrap();
        let id = seeded(&db);

        record_presence(&db, id, true, "Chernarus One", "Raider99", t(0)).unwrap();
        record_presence(&db, id, false, "", "Raider99", t(5400)).unwrap();

        let entry = db.last_history(id).unwrap().unwrap();
        assert!(!entry.online);
        assert_eq!(entry.session_duration_sec, 5400);
        assert_eq!(entry.offline_duration_sec, 0);
    }

    #[test]
    fn repeated_same_state_returns_false() {
        let db = Database::open_in_memory().unwrap();
        let id = seeded(&db);

        assert!(record_presence(&db, id, false, "", "Raider99", t(0)).unwrap());
        assert!(!record_presence(&db, id, false, "", "Raider99", t(10)).unwrap());
        assert!(!record_presence(&db, id, false, "", "Raider99", t(20)).unwrap());
        assert_eq!(db.player_history(id, 0).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn stop_cancels_promptly() {
        let shutdown = CancellationToken::new();
        shutdown.cancel();
        assert!(sleep_or_cancel(&shutdown, Duration::from_secs(3600)).await);
    }
}
