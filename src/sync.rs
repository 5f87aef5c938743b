//! Periodic resync of the local mirror.
//!
//! Bookings and notifications each get their own thread, `App` (and so their
//! own cache connection and HTTP agent). A tick re-runs the same
//! fetch-and-overwrite read the screens use; a failed tick is logged and the
//! next one simply tries again.

use log::{debug, error, info, warn};
use rand::Rng;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::app::{App, AppError};
use crate::config::Config;
use crate::use_cases::{GetBookingsSortedByDate, GetNotifications, UseCaseError};

/// Upper bound of the random delay before a loop's first tick.
pub const MAX_START_JITTER: Duration = Duration::from_secs(5);

/// Outcome of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Synced(usize),
    NoUser,
    Offline,
}

pub fn sync_bookings_once(app: &App) -> Result<SyncOutcome, UseCaseError> {
    let user_id = app.session.current_user_id()?;
    if user_id.is_empty() {
        return Ok(SyncOutcome::NoUser);
    }
    if !app.is_network_available() {
        return Ok(SyncOutcome::Offline);
    }
    let bookings = GetBookingsSortedByDate::new(&app.bookings).execute(&user_id)?;
    Ok(SyncOutcome::Synced(bookings.len()))
}

pub fn sync_notifications_once(app: &App) -> Result<SyncOutcome, UseCaseError> {
    let user_id = app.session.current_user_id()?;
    if user_id.is_empty() {
        return Ok(SyncOutcome::NoUser);
    }
    if !app.is_network_available() {
        return Ok(SyncOutcome::Offline);
    }
    let notifications = GetNotifications::new(&app.notifications).execute(&user_id)?;
    Ok(SyncOutcome::Synced(notifications.len()))
}

/// Run `tick` every `interval` until `stop` is raised. Cadence is measured
/// from tick start so a slow tick does not push the schedule back.
pub fn run_loop<F>(name: &str, interval: Duration, stop: &AtomicBool, mut tick: F)
where
    F: FnMut() -> Result<SyncOutcome, UseCaseError>,
{
    while !stop.load(Ordering::Relaxed) {
        let tick_start = Instant::now();

        match tick() {
            Ok(SyncOutcome::Synced(n)) => info!("{name}: synced {n} item(s)"),
            Ok(SyncOutcome::NoUser) => debug!("{name}: nobody signed in, skipping"),
            Ok(SyncOutcome::Offline) => debug!("{name}: offline, skipping"),
            Err(e) => warn!("{name}: sync failed: {e}"),
        }

        let elapsed = tick_start.elapsed();
        if elapsed < interval && !stop.load(Ordering::Relaxed) {
            sleep_unless_stopped(interval - elapsed, stop);
        }
    }
    info!("{name}: stopped");
}

/// Sleep in short slices so a stop request is honoured promptly.
fn sleep_unless_stopped(total: Duration, stop: &AtomicBool) {
    const SLICE: Duration = Duration::from_millis(250);
    let deadline = Instant::now() + total;
    while !stop.load(Ordering::Relaxed) {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        thread::sleep((deadline - now).min(SLICE));
    }
}

fn start_jitter() -> Duration {
    let ms = rand::rng().random_range(0..=MAX_START_JITTER.as_millis() as u64);
    Duration::from_millis(ms)
}

/// Start both loops; each thread wires its own `App` from `config`.
pub fn spawn_loops(config: &Config, stop: Arc<AtomicBool>) -> Result<Vec<JoinHandle<()>>, AppError> {
    let loops: [(&'static str, Duration, fn(&App) -> Result<SyncOutcome, UseCaseError>); 2] = [
        ("booking-sync", config.booking_sync_interval, sync_bookings_once),
        ("notification-sync", config.notification_sync_interval, sync_notifications_once),
    ];

    let mut handles = Vec::with_capacity(loops.len());
    for (name, interval, tick) in loops {
        let config = config.clone();
        let stop = stop.clone();
        info!("Starting {name} loop: interval={}s", interval.as_secs());
        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                let app = match App::from_config(&config) {
                    Ok(app) => app,
                    Err(e) => {
                        error!("{name}: cannot start: {e}");
                        return;
                    }
                };
                sleep_unless_stopped(start_jitter(), &stop);
                run_loop(name, interval, &stop, || tick(&app));
            })
            .map_err(|source| AppError::Thread { name, source })?;
        handles.push(handle);
    }
    Ok(handles)
}
