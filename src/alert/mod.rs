//! Alert formatting, delivery and the polling loop

pub mod formatter;
pub mod ledger;
pub mod service;
pub mod telegram;

pub use formatter::{format_alert, DEFAULT_TOP_N};
pub use ledger::{decide, AlertDecision, AlertLedger, InMemoryAlertLedger};
pub use service::{AlertService, CycleOutcome, FundingSummary};
pub use telegram::{Notifier, TelegramNotifier};
