//! Human-readable funding alert text

use crate::data::{FundingQuote, MergedQuote};
use crate::strategy::quotes_at;
use chrono::{DateTime, Utc};

/// Entries per ranking section unless configured otherwise
pub const DEFAULT_TOP_N: usize = 3;

const EMPTY_SECTION: &str = "(none)";

/// Render the alert sent ahead of `next_instant`.
///
/// The Binance and Gate sections re-filter their own table by `next_instant`; the
/// differential sections rank `filtered`. Every section lists at most `top_n` rows.
pub fn format_alert(
    binance: &[FundingQuote],
    gate: &[FundingQuote],
    merged: &[MergedQuote],
    filtered: &[MergedQuote],
    next_instant: DateTime<Utc>,
    top_n: usize,
) -> String {
    let gate_at = quotes_at(gate, next_instant);
    let binance_at = quotes_at(binance, next_instant);

    let quote_rate = |q: &FundingQuote| q.funding_rate;
    let diff = |m: &MergedQuote| m.rate_diff;

    let gate_top = rank(&gate_at, quote_rate, top_n, Order::Descending);
    let gate_bottom = rank(&gate_at, quote_rate, top_n, Order::Ascending);
    let binance_top = rank(&binance_at, quote_rate, top_n, Order::Descending);
    let binance_bottom = rank(&binance_at, quote_rate, top_n, Order::Ascending);
    let diff_top = rank(filtered, diff, top_n, Order::Descending);
    let diff_bottom = rank(filtered, diff, top_n, Order::Ascending);

    let quote_line = |q: &&FundingQuote| rate_line(&q.canonical_symbol, q.funding_rate);
    let diff_line = |m: &&MergedQuote| rate_line(&m.canonical_symbol, m.rate_diff);

    let mut msg = String::new();
    msg.push_str(&format!(
        "📊 Next funding settlement: {}\n\n",
        next_instant.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    msg.push_str(&format!("Gate: {} contracts\n", gate_at.len()));
    msg.push_str(&format!("Binance: {} contracts\n", binance_at.len()));
    msg.push_str(&format!("Listed on both: {} symbols\n", merged.len()));
    msg.push_str(&format!("Comparable (Gate ∩ Binance): {} symbols\n", filtered.len()));

    push_section(&mut msg, &format!("📈 Gate highest funding rates, top {}", top_n), gate_top.iter().map(quote_line));
    push_section(&mut msg, &format!("📉 Gate lowest funding rates, top {}", top_n), gate_bottom.iter().map(quote_line));
    push_section(&mut msg, &format!("📈 Binance highest funding rates, top {}", top_n), binance_top.iter().map(quote_line));
    push_section(&mut msg, &format!("📉 Binance lowest funding rates, top {}", top_n), binance_bottom.iter().map(quote_line));
    push_section(&mut msg, &format!("🆚 Binance - Gate largest differential, top {}", top_n), diff_top.iter().map(diff_line));
    push_section(&mut msg, &format!("🆚 Binance - Gate smallest differential, top {}", top_n), diff_bottom.iter().map(diff_line));

    msg.trim_end().to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Order {
    Descending,
    Ascending,
}

/// At most `top_n` rows ordered by `value`; equal values keep their input order
fn rank<T>(rows: &[T], value: impl Fn(&T) -> f64, top_n: usize, order: Order) -> Vec<&T> {
    let mut ranked: Vec<&T> = rows.iter().collect();
    ranked.sort_by(|a, b| {
        let (a, b) = (value(*a), value(*b));
        match order {
            Order::Descending => b.total_cmp(&a),
            Order::Ascending => a.total_cmp(&b),
        }
    });
    ranked.truncate(top_n);
    ranked
}

fn rate_line(symbol: &str, rate: f64) -> String {
    format!("{:<10} {:.4}%", symbol, rate * 100.0)
}

/// Section body goes in a code block so symbols are not read as Markdown
fn push_section(msg: &mut String, title: &str, lines: impl Iterator<Item = String>) {
    let lines: Vec<String> = lines.collect();
    msg.push_str(&format!("\n{}:\n", title));
    if lines.is_empty() {
        msg.push_str(EMPTY_SECTION);
        msg.push('\n');
    } else {
        msg.push_str("```\n");
        msg.push_str(&lines.join("\n"));
        msg.push_str("\n```\n");
    }
}
