//! Background timers feeding reset requests into the engine queue.
//!
//! Both timers are independent, run for process lifetime, and stop only
//! when the engine side of the channel closes. A reset is an ordinary
//! event, serialized with everything else the engine processes.

use std::time::Duration;

use chrono::{DateTime, FixedOffset, Utc};
use tokio::sync::mpsc::UnboundedSender;
use tracing::info;

use super::{Event, ResetSource};
use crate::consts::{
    DAILY_RESET_HOUR, DAILY_RESET_MINUTE, FEED_TZ_OFFSET_HOURS, PERIODIC_RESET_INTERVAL,
};

/// Delay after a daily firing before the next occurrence is computed, so a
/// wake-up racing the target second cannot fire twice.
const DAILY_REFIRE_GUARD: Duration = Duration::from_secs(60);

/// Spawn both reset timers.
pub fn spawn_reset_timers(sender: UnboundedSender<Event>) {
    tokio::spawn(periodic_reset(sender.clone()));
    tokio::spawn(daily_reset(sender));
}

async fn periodic_reset(sender: UnboundedSender<Event>) {
    let mut interval = tokio::time::interval(PERIODIC_RESET_INTERVAL);
    // Skip the immediate first tick.
    interval.tick().await;
    loop {
        interval.tick().await;
        info!("Periodic reset timer fired");
        if sender.send(Event::Reset(ResetSource::Periodic)).is_err() {
            return;
        }
    }
}

async fn daily_reset(sender: UnboundedSender<Event>) {
    let feed_tz = FixedOffset::east_opt(FEED_TZ_OFFSET_HOURS * 3600)
        .expect("feed timezone offset is in range");
    loop {
        let wait = until_next_daily_reset(Utc::now().with_timezone(&feed_tz));
        info!(
            hours = format!("{:.1}", wait.as_secs_f64() / 3600.0),
            "Next daily reset scheduled"
        );
        tokio::time::sleep(wait).await;

        info!("Daily reset timer fired");
        if sender.send(Event::Reset(ResetSource::Daily)).is_err() {
            return;
        }
        tokio::time::sleep(DAILY_REFIRE_GUARD).await;
    }
}

/// Time remaining until the next daily reset instant, in the feed timezone.
fn until_next_daily_reset(now: DateTime<FixedOffset>) -> Duration {
    let today_reset = now
        .date_naive()
        .and_hms_opt(DAILY_RESET_HOUR, DAILY_RESET_MINUTE, 0)
        .expect("reset time is a valid wall-clock time")
        .and_local_timezone(*now.offset())
        .single()
        .expect("fixed offsets have no ambiguous local times");

    let target = if now >= today_reset {
        today_reset + chrono::Duration::days(1)
    } else {
        today_reset
    };
    (target - now).to_std().unwrap_or_default()
}
