//! Alert deduplication state

use chrono::{DateTime, Duration, Utc};

/// Remembers which settlement instant was last alerted
pub trait AlertLedger: Send + Sync {
    /// Last settlement instant an alert went out for
    fn last_alerted(&self) -> Option<DateTime<Utc>>;

    /// Mark `instant` as alerted
    fn record(&mut self, instant: DateTime<Utc>);
}

/// Ledger that lives as long as the process
#[derive(Debug, Default, Clone)]
pub struct InMemoryAlertLedger {
    last_alert_time: Option<DateTime<Utc>>,
}

impl AlertLedger for InMemoryAlertLedger {
    fn last_alerted(&self) -> Option<DateTime<Utc>> {
        self.last_alert_time
    }

    fn record(&mut self, instant: DateTime<Utc>) {
        self.last_alert_time = Some(instant);
    }
}

/// What the loop should do about the upcoming settlement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertDecision {
    /// Inside the window and not yet alerted
    Send,
    /// Inside the window but already alerted for this instant
    AlreadySent,
    /// Settlement is not close enough
    OutsideWindow,
}

/// Alert when `next` is strictly closer than `window` to `now` and was not alerted before
pub fn decide(
    next: DateTime<Utc>,
    now: DateTime<Utc>,
    window: Duration,
    last_alerted: Option<DateTime<Utc>>,
) -> AlertDecision {
    let distance = (next - now).num_milliseconds().abs();
    if distance >= window.num_milliseconds() {
        AlertDecision::OutsideWindow
    } else if last_alerted == Some(next) {
        AlertDecision::AlreadySent
    } else {
        AlertDecision::Send
    }
}
