//! Contest Calendar Binary
//!
//! Fetches the rolling contest window from clist.by and prints calendar-ready events.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release --bin contest_calendar                # per-day listing
//! cargo run --release --bin contest_calendar -- --upcoming  # next 5 contests
//! cargo run --release --bin contest_calendar -- --json      # full event list as JSON
//! ```
//!
//! ## Environment Variables
//!
//! - CLIST_USERNAME - clist.by account name (required)
//! - CLIST_API_KEY - clist.by API key (required)
//! - CLIST_BASE_URL - Contest endpoint (default: https://clist.by/api/v4/contest)
//! - CLIST_TIMEOUT_SECS - Request timeout (default: 15)
//! - CLIST_LIMIT - Result cap (default: 1000)
//! - CONTEST_PLATFORMS_PATH - JSON platform table replacing the built-in one (optional)
//! - RUST_LOG - Logging level (optional, default: info)

use std::env;

use chrono::Utc;
use contestflow::events::calendar::{group_by_day, upcoming_events, UPCOMING_SIDEBAR_LEN};
use contestflow::events::{EventService, NormalizedEvent};
use contestflow::ClistConfig;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq)]
enum OutputMode {
    ByDay,
    Upcoming,
    Json,
}

fn parse_mode_from_args() -> OutputMode {
    let args: Vec<String> = env::args().collect();
    if args.iter().any(|a| a == "--json") {
        OutputMode::Json
    } else if args.iter().any(|a| a == "--upcoming") {
        OutputMode::Upcoming
    } else {
        OutputMode::ByDay
    }
}

fn print_event(event: &NormalizedEvent) {
    // Marker windows are a fixed hour; the title already says Start:/End:
    if event.is_marker() {
        println!(
            "  {}  [{}] {} (multi-day)  {}",
            event.start.format("%H:%M"),
            event.platform,
            event.title,
            event.link
        );
        return;
    }
    println!(
        "  {} - {}  [{}] {}  {}",
        event.start.format("%H:%M"),
        event.end.format("%Y-%m-%d %H:%M"),
        event.platform,
        event.title,
        event.link
    );
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    dotenv::dotenv().ok();

    let mode = parse_mode_from_args();
    let config = ClistConfig::from_env()?;

    log::info!("🚀 Starting Contest Calendar");
    log::info!("   Endpoint: {}", config.base_url);
    log::info!("   Timeout: {}s", config.timeout.as_secs());
    log::info!("   Limit: {}", config.limit);

    let service = EventService::from_config(&config)?;
    log::info!(
        "   Platforms: {}",
        service.registry().allowed_hosts().join(", ")
    );

    let cancel = CancellationToken::new();
    let ctrl_c_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("Received Ctrl+C, cancelling fetch");
            ctrl_c_cancel.cancel();
        }
    });

    let events = service.fetch_events_cancellable(&cancel).await?;
    log::info!("✅ Fetched {} calendar events", events.len());

    match mode {
        OutputMode::Json => {
            println!("{}", serde_json::to_string_pretty(&events)?);
        }
        OutputMode::Upcoming => {
            for event in upcoming_events(&events, Utc::now(), UPCOMING_SIDEBAR_LEN) {
                println!("{}", event.start.format("%Y-%m-%d"));
                print_event(event);
            }
        }
        OutputMode::ByDay => {
            for (day, day_events) in group_by_day(&events) {
                println!("{}", day);
                for event in day_events {
                    print_event(event);
                }
            }
        }
    }

    Ok(())
}
