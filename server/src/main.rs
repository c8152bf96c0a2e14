use clap::Parser;
use log::{info, warn};
use server::clock::SystemClock;
use server::counters::REQUEST_COUNTERS;
use server::directory::SessionDirectory;
use server::leaderboard::LeaderboardEngine;
use server::score_store::InMemoryScoreStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};

/// Main-method of the application.
/// Parses command-line arguments, then runs the housekeeping and telemetry
/// loops around the shared directory and leaderboard engine. The transport
/// layer attaches to the same handles to serve requests.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Command line arguments
    #[derive(Parser, Debug)]
    #[clap(author, version, about)]
    struct Args {
        /// Seconds a session may go without contact before being swept
        #[clap(short = 't', long, default_value_t = shared::SESSION_TIMEOUT_SECS)]
        session_timeout: u64,
        /// Seconds between housekeeping sweeps of the directory
        #[clap(long, default_value = "10")]
        housekeeping_interval: u64,
        /// Seconds between telemetry reports (statistics + request counters)
        #[clap(long, default_value = "60")]
        telemetry_interval: u64,
    }

    env_logger::init();
    let args = Args::parse();

    let clock = Arc::new(SystemClock);
    let directory = Arc::new(SessionDirectory::with_timeout(
        clock,
        Duration::from_secs(args.session_timeout),
    ));
    // The transport layer takes this handle alongside the directory.
    let _engine = Arc::new(LeaderboardEngine::new(InMemoryScoreStore::new()));

    info!(
        "Backend up (session timeout {}s, housekeeping every {}s)",
        args.session_timeout, args.housekeeping_interval
    );

    // Periodic sweep; bounds staleness while no requests are arriving.
    let housekeeping_handle = {
        let directory = Arc::clone(&directory);
        let mut tick = interval(Duration::from_secs(args.housekeeping_interval));
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tokio::spawn(async move {
            loop {
                tick.tick().await;
                let purged = directory.purge_expired();
                if purged > 0 {
                    info!("Housekeeping purged {} expired session(s)", purged);
                }
            }
        })
    };

    // Periodic telemetry report.
    let telemetry_handle = {
        let directory = Arc::clone(&directory);
        let mut tick = interval(Duration::from_secs(args.telemetry_interval));
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tokio::spawn(async move {
            loop {
                tick.tick().await;
                let stats = directory.statistics();
                let (game_api, website) = REQUEST_COUNTERS.drain_and_reset();
                info!(
                    "{} session(s), {} player(s) online; {} game API / {} website requests since last report",
                    stats.total_sessions, stats.total_members, game_api, website
                );
            }
        })
    };

    // Handle shutdown gracefully
    tokio::select! {
        result = housekeeping_handle => {
            if let Err(e) = result {
                warn!("Housekeeping task panicked: {}", e);
            }
        }
        result = telemetry_handle => {
            if let Err(e) = result {
                warn!("Telemetry task panicked: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down gracefully...");
        }
    }

    Ok(())
}
