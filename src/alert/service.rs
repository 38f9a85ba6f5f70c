//! Polling loop: fetch, merge, resolve, format, deliver

use super::{
    formatter::format_alert,
    ledger::{decide, AlertDecision, AlertLedger, InMemoryAlertLedger},
    telegram::{Notifier, TelegramNotifier},
};
use crate::{
    config::{AlertConfig, AlertSettings},
    connectors::{ConnectorFactory, Exchange, FundingRateSource},
    data::{FundingQuote, MergedQuote},
    strategy::{filter_at, merge_funding_rates, resolve_next_settlement},
    AlertError, Result,
};
use chrono::{DateTime, Duration, Utc};
use tracing::{error, info, warn};

/// Everything one polling cycle learned about the next settlement
#[derive(Debug, Clone)]
pub struct FundingSummary {
    /// Earliest upcoming settlement across both exchanges
    pub next_funding_time: DateTime<Utc>,
    /// Trading Binance quotes
    pub binance: Vec<FundingQuote>,
    /// Trading Gate quotes
    pub gate: Vec<FundingQuote>,
    /// Symbols listed on both exchanges
    pub merged: Vec<MergedQuote>,
    /// Merged symbols settling at `next_funding_time` on both exchanges
    pub filtered: Vec<MergedQuote>,
}

impl FundingSummary {
    /// Merge both tables and pick out the symbols settling next.
    ///
    /// Fails only when neither exchange reported a single contract.
    pub fn build(binance: Vec<FundingQuote>, gate: Vec<FundingQuote>) -> Result<Self> {
        let next_funding_time = resolve_next_settlement(&binance, &gate).ok_or_else(|| {
            AlertError::NoSettlement("both exchanges returned no trading contracts".to_string())
        })?;

        let merged = merge_funding_rates(&binance, &gate);
        let filtered = filter_at(&merged, next_funding_time);

        Ok(Self {
            next_funding_time,
            binance,
            gate,
            merged,
            filtered,
        })
    }

    /// Render the alert text
    pub fn format(&self, top_n: usize) -> String {
        format_alert(
            &self.binance,
            &self.gate,
            &self.merged,
            &self.filtered,
            self.next_funding_time,
            top_n,
        )
    }
}

/// Result of one polling cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Alert delivered
    Sent(DateTime<Utc>),
    /// Alert due but delivery failed; the instant still counts as alerted
    DeliveryFailed(DateTime<Utc>),
    /// Already alerted for this settlement
    AlreadySent(DateTime<Utc>),
    /// Next settlement is outside the alert window
    OutsideWindow(DateTime<Utc>),
}

/// Funding rate alert loop
pub struct AlertService {
    binance: Box<dyn FundingRateSource>,
    gate: Box<dyn FundingRateSource>,
    notifier: Box<dyn Notifier>,
    ledger: Box<dyn AlertLedger>,
    settings: AlertSettings,
}

impl AlertService {
    /// Assemble a service from its collaborators
    pub fn new(
        binance: Box<dyn FundingRateSource>,
        gate: Box<dyn FundingRateSource>,
        notifier: Box<dyn Notifier>,
        ledger: Box<dyn AlertLedger>,
        settings: AlertSettings,
    ) -> Self {
        Self {
            binance,
            gate,
            notifier,
            ledger,
            settings,
        }
    }

    /// Wire up the real exchanges, Telegram and an in-memory ledger
    pub fn from_config(config: &AlertConfig) -> Result<Self> {
        Ok(Self::new(
            ConnectorFactory::create_source(Exchange::Binance, config)?,
            ConnectorFactory::create_source(Exchange::Gate, config)?,
            Box::new(TelegramNotifier::new(&config.telegram)?),
            Box::new(InMemoryAlertLedger::default()),
            config.alert.clone(),
        ))
    }

    /// Fetch both exchanges and build the summary for the next settlement
    pub async fn summarize(&self) -> Result<FundingSummary> {
        let binance = self.binance.fetch_funding_rates().await?;
        let gate = self.gate.fetch_funding_rates().await?;

        if binance.is_empty() || gate.is_empty() {
            warn!(
                binance_contracts = binance.len(),
                gate_contracts = gate.len(),
                "One exchange returned no trading contracts"
            );
        }

        let summary = FundingSummary::build(binance, gate)?;

        crate::log_settlement!(
            info,
            summary.next_funding_time,
            summary.binance.len(),
            summary.gate.len(),
            summary.filtered.len(),
            "Funding summary ready"
        );
        if let Some(widest) = summary.filtered.first() {
            crate::log_rate_diff!(
                debug,
                widest.canonical_symbol,
                widest.binance_rate,
                widest.gate_rate,
                widest.rate_diff,
                "Largest differential at next settlement"
            );
        }

        Ok(summary)
    }

    /// One fetch-merge-resolve-format-deliver pass evaluated at `now`
    pub async fn run_cycle(&mut self, now: DateTime<Utc>) -> Result<CycleOutcome> {
        let window = alert_window(self.settings.alert_window_secs)?;
        let summary = self.summarize().await?;
        let next = summary.next_funding_time;

        match decide(next, now, window, self.ledger.last_alerted()) {
            AlertDecision::OutsideWindow => {
                info!("[WAIT] Outside alert window. Now: {}, next funding: {}", now, next);
                Ok(CycleOutcome::OutsideWindow(next))
            }
            AlertDecision::AlreadySent => {
                info!("[SKIP] Already alerted for {}", next);
                Ok(CycleOutcome::AlreadySent(next))
            }
            AlertDecision::Send => {
                let text = summary.format(self.settings.top_n);
                let outcome = match self.notifier.send(&text).await {
                    Ok(()) => {
                        info!("✅ Funding alert sent for {}", next);
                        CycleOutcome::Sent(next)
                    }
                    Err(e) => {
                        error!("❌ Failed to deliver funding alert for {}: {}", next, e);
                        CycleOutcome::DeliveryFailed(next)
                    }
                };
                self.ledger.record(next);
                Ok(outcome)
            }
        }
    }

    /// Run one cycle, containing any failure so the loop can carry on
    pub async fn tick(&mut self, now: DateTime<Utc>) -> Option<CycleOutcome> {
        match self.run_cycle(now).await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                error!("❌ Funding alert cycle failed: {:#}", e);
                None
            }
        }
    }

    /// Poll forever, sleeping the configured interval between cycles
    pub async fn run(&mut self) {
        info!(
            poll_interval_secs = self.settings.poll_interval_secs,
            alert_window_secs = self.settings.alert_window_secs,
            "📡 Starting funding rate alert loop"
        );
        let interval = std::time::Duration::from_secs(self.settings.poll_interval_secs);

        loop {
            self.tick(Utc::now()).await;
            tokio::time::sleep(interval).await;
        }
    }
}

fn alert_window(secs: u64) -> Result<Duration> {
    i64::try_from(secs)
        .ok()
        .and_then(Duration::try_seconds)
        .ok_or_else(|| AlertError::Config(format!("Alert window of {} seconds is out of range", secs)).into())
}
