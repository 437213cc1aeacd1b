//! Timers driving the interactive views.
//!
//! Both futures pend forever while idle, so they can sit in a
//! `tokio::select!` loop unconditionally.

use log::debug;
use rtd_view::state::PollingChange;
use std::future::pending;
use std::time::Duration;
use tokio::time::{interval_at, sleep_until, Instant, Interval, MissedTickBehavior};

/// Dashboard refresh timer, alive only while the dashboard is visible.
pub struct PollSchedule {
    period: Duration,
    interval: Option<Interval>,
}

impl PollSchedule {
    /// Idle until started.
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            interval: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.interval.is_some()
    }

    pub fn apply(&mut self, change: PollingChange) {
        match change {
            PollingChange::Start => {
                // first tick one full period after the view appears
                let mut interval = interval_at(Instant::now() + self.period, self.period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
                self.interval = Some(interval);
                debug!("Polling every {:?}", self.period);
            }
            PollingChange::Stop => {
                self.interval = None;
                debug!("Polling stopped");
            }
            PollingChange::Unchanged => {}
        }
    }

    /// Resolves at the next tick; never resolves while stopped.
    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => pending().await,
        }
    }
}

/// One-shot refresh after a run command.
///
/// The delay is a guess at when the backend has finished; the refreshed
/// view may still show the previous status.
#[derive(Debug, Default)]
pub struct DeferredRefresh {
    deadline: Option<Instant>,
}

impl DeferredRefresh {
    /// Arm (or re-arm) the refresh `delay` from now.
    pub fn schedule(&mut self, delay: Duration) {
        self.deadline = Some(Instant::now() + delay);
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Resolves once at the deadline and disarms; never resolves while
    /// disarmed.
    pub async fn fire(&mut self) {
        match self.deadline {
            Some(deadline) => {
                sleep_until(deadline).await;
                self.deadline = None;
            }
            None => pending().await,
        }
    }
}
