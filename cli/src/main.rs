//! Roster command-line entrypoint: wiring for synchronization, search,
//! watch-list management and the presence tracker. No business logic
//! lives here.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cftools_client::{CfClient, CfCredentials, CfSession};
use roster_db::Database;
use roster_sync::{SyncService, Tracker};

#[derive(Parser)]
#[command(
    name = "roster-cli",
    about = "CFTools roster synchronization and presence tracking"
)]
struct Cli {
    /// SQLite database path.
    #[arg(long, env = "ROSTER_DB_PATH", default_value = "roster.db")]
    db_path: PathBuf,

    #[command(flatten)]
    auth: AuthArgs,

    #[command(subcommand)]
    command: Command,
}

/// Either cookie-token auth (cdn-auth + friends, taken from a logged-in
/// browser session) or native login with identifier + password hash.
#[derive(Args)]
struct AuthArgs {
    #[arg(long, env = "CFTOOLS_CDN_AUTH", hide_env_values = true, default_value = "")]
    cdn_auth: String,

    #[arg(long, env = "CFTOOLS_CF_CLEARANCE", hide_env_values = true, default_value = "")]
    cf_clearance: String,

    #[arg(long, env = "CFTOOLS_SESSION", hide_env_values = true, default_value = "")]
    session: String,

    #[arg(long, env = "CFTOOLS_USER_INFO", hide_env_values = true, default_value = "")]
    user_info: String,

    #[arg(long, env = "CFTOOLS_ACSRF", hide_env_values = true, default_value = "")]
    acsrf: String,

    #[arg(long, env = "CFTOOLS_IDENTIFIER", default_value = "")]
    identifier: String,

    #[arg(long, env = "CFTOOLS_PASSWORD_HASH", hide_env_values = true, default_value = "")]
    password_hash: String,
}

#[derive(Subcommand)]
enum Command {
    /// Synchronize one or more players by external identifier.
    Sync {
        ids: Vec<String>,
        /// Skip the steam/ban/anti-cheat detail fetches.
        #[arg(long)]
        light: bool,
    },
    /// Free-text search against the external source, syncing every hit.
    Search {
        text: String,
        #[arg(long)]
        light: bool,
    },
    /// Manage the tracked watch-list.
    Watch {
        #[command(subcommand)]
        action: WatchAction,
    },
    /// Run the presence tracker until interrupted.
    Track,
    /// Delete all stored roster data.
    Wipe {
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum WatchAction {
    Add { id: String },
    Remove { id: String },
    List,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let db = Database::open(&cli.db_path)
        .with_context(|| format!("open database {}", cli.db_path.display()))?;

    match cli.command {
        Command::Sync { ids, light } => {
            let client = connect(&cli.auth).await?;
            let service = SyncService::new(client, db);
            let players = service.sync_batch(&ids, light).await;
            println!("{}", serde_json::to_string_pretty(&players)?);
        }
        Command::Search { text, light } => {
            let client = connect(&cli.auth).await?;
            let service = SyncService::new(client, db);
            let players = service.search_and_sync(&text, light).await?;
            println!("{}", serde_json::to_string_pretty(&players)?);
        }
        Command::Watch { action } => run_watch(&db, action)?,
        Command::Track => {
            let client = connect(&cli.auth).await?;
            let tracker = Tracker::new(client, db);
            let handles = tracker.start();
            tokio::signal::ctrl_c().await?;
            tracing::info!("Shutting down tracker");
            tracker.stop();
            for handle in handles {
                let _ = handle.await;
            }
        }
        Command::Wipe { yes } => {
            if !yes {
                bail!("refusing to wipe without --yes");
            }
            db.wipe_all_data()?;
            println!("all roster data deleted");
        }
    }

    Ok(())
}

async fn connect(auth: &AuthArgs) -> anyhow::Result<Arc<CfClient>> {
    let session = Arc::new(CfSession::new());
    session.update_auth(
        &auth.cdn_auth,
        &auth.cf_clearance,
        &auth.session,
        &auth.user_info,
        &auth.acsrf,
    );
    let client = Arc::new(CfClient::new(session));
    let credentials = CfCredentials {
        identifier: auth.identifier.clone(),
        password_hash: auth.password_hash.clone(),
    };
    client.login(&credentials).await.context("CFTools login failed")?;
    Ok(client)
}

fn run_watch(db: &Database, action: WatchAction) -> anyhow::Result<()> {
    match action {
        WatchAction::Add { id } => {
            let player = db
                .get_player(&id)?
                .with_context(|| format!("unknown player {id}: sync it first"))?;
            match db.add_watched(player.id) {
                Ok(()) => println!("watching {} ({})", player.display_name, player.cftools_id),
                Err(e) if e.is_watch_limit() => bail!("{e}"),
                Err(e) => return Err(e.into()),
            }
        }
        WatchAction::Remove { id } => {
            let player = db
                .get_player(&id)?
                .with_context(|| format!("unknown player {id}"))?;
            db.remove_watched(player.id)?;
            println!("no longer watching {}", player.cftools_id);
        }
        WatchAction::List => {
            for cftools_id in db.watched_ids()? {
                println!("{cftools_id}");
            }
        }
    }
    Ok(())
}
