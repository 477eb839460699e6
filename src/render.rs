//! Terminal rendering of a `PerformanceReport`.

use analytics::{Advice, BreakdownEntry, HistogramBin, PerformanceReport};
use chrono::Weekday;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{CellAlignment, ContentArrangement, Table};
use core_types::TradingSession;
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt::Write;

/// Shown wherever a metric is undefined for the data.
pub const NOT_APPLICABLE: &str = "n/a";

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const SPARK_WIDTH: usize = 60;
const HISTOGRAM_BAR_WIDTH: usize = 40;

/// Renders the whole dashboard as plain text.
pub fn render_report(report: &PerformanceReport, currency: &str) -> String {
    let money = |value: Decimal| format_money(value, currency);
    let opt_money = |value: Option<Decimal>| value.map_or_else(|| NOT_APPLICABLE.to_string(), money);
    let key = &report.key;
    let other = &report.additional;

    let mut out = String::new();

    let _ = writeln!(out, "Key Metrics");
    let mut table = metric_table();
    table.add_row(vec!["Total P&L".to_string(), money(key.total_pnl)]);
    table.add_row(vec!["Trades".to_string(), key.total_trades.to_string()]);
    table.add_row(vec![
        "Account Growth".to_string(),
        key.percentage_growth.map_or_else(na, |g| format!("{}%", signed(g))),
    ]);
    table.add_row(vec![
        "Average RRR".to_string(),
        key.average_risk_reward.map_or_else(na, two_places),
    ]);
    table.add_row(vec![
        "Win Rate".to_string(),
        key.win_rate_pct.map_or_else(na, |wr| format!("{}%", two_places(wr))),
    ]);
    table.add_row(vec![
        "Most Traded Day".to_string(),
        key.most_traded_weekday.map_or_else(na, |d| weekday_name(d).to_string()),
    ]);
    table.add_row(vec![
        "Most Traded Pair".to_string(),
        key.most_traded_symbol.clone().unwrap_or_else(na),
    ]);
    let _ = writeln!(out, "{table}\n");

    let _ = writeln!(out, "Other Key Metrics");
    let mut table = metric_table();
    table.add_row(vec![
        "Average Trade Duration".to_string(),
        other
            .average_trade_duration_minutes
            .map_or_else(na, |m| format!("{} mins", two_places(m))),
    ]);
    table.add_row(vec!["Max Drawdown".to_string(), opt_money(other.max_drawdown)]);
    table.add_row(vec!["Average Win".to_string(), opt_money(other.average_win)]);
    table.add_row(vec!["Average Loss".to_string(), opt_money(other.average_loss)]);
    table.add_row(vec!["Skipped Records".to_string(), report.skipped_records.to_string()]);
    let _ = writeln!(out, "{table}\n");

    let _ = writeln!(out, "Account Balance Growth");
    let _ = writeln!(out, "{}", sparkline(&report.smoothed_curve, SPARK_WIDTH));
    let _ = writeln!(
        out,
        "start {}  end {}\n",
        money(report.starting_balance),
        opt_money(key.final_balance)
    );

    let _ = writeln!(out, "Trading Session Performance");
    let _ = writeln!(out, "{}\n", breakdown_table("Session", &report.session_breakdown, money));

    let _ = writeln!(out, "Net Profit per Symbol");
    let _ = writeln!(out, "{}\n", breakdown_table("Symbol", &report.symbol_breakdown, money));

    let _ = writeln!(out, "Trade Duration Analysis (minutes)");
    out.push_str(&render_histogram(&report.duration_histogram));
    out.push('\n');

    out.push_str(&render_insights(report, currency));
    out
}

/// Shown instead of the dashboard when there are no usable trades.
pub fn render_placeholder(skipped_records: usize) -> String {
    let mut out = String::from("No trades to analyse: the trade export contains no usable records.\n");
    if skipped_records > 0 {
        let _ = writeln!(out, "{skipped_records} malformed record(s) were skipped.");
    }
    out
}

/// Lists the session assigned to every close hour.
pub fn render_session_map() -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Close Hour", "Session"]);
    for hour in 0..24 {
        table.add_row(vec![
            format!("{hour:02}:00"),
            TradingSession::from_hour(hour).to_string(),
        ]);
    }
    table.to_string()
}

fn render_insights(report: &PerformanceReport, currency: &str) -> String {
    let money = |value: Decimal| format_money(value, currency);
    let insights = &report.insights;
    let mut out = String::from("Insights and Advice\n");

    if let Some(best) = &insights.best_symbol {
        let _ = writeln!(out, "- Best Trading Pair: {} with a net profit of {}", best.key, money(best.net_profit));
    }
    if let Some(worst) = &insights.worst_symbol {
        let _ = writeln!(out, "- Worst Trading Pair: {} with a net loss of {}", worst.key, money(worst.net_profit.abs()));
    }
    if let Some(best) = &insights.best_session {
        let _ = writeln!(out, "- Best Trading Session: {} with a total of {}", best.key, money(best.net_profit));
    }
    if let Some(worst) = &insights.worst_session {
        let _ = writeln!(out, "- Worst Trading Session: {} with a total loss of {}", worst.key, money(worst.net_profit.abs()));
    }

    for advice in &insights.advice {
        let line = match advice {
            Advice::FocusOnSymbol { symbol } => {
                format!("Focus on trading the {symbol} pair for highest returns.")
            }
            Advice::ReviewUnderperformers => {
                "Review and refine strategies for pairs and sessions with lower performance.".to_string()
            }
            Advice::RaiseTargets { risk_reward, win_rate_pct } => format!(
                "Aim for at least a 2 RR ratio and a 50% win rate (currently {} RR, {} win rate).",
                risk_reward.map_or_else(na, two_places),
                win_rate_pct.map_or_else(na, |wr| format!("{}%", two_places(wr))),
            ),
            Advice::AvoidOutOfSession { avoidable_loss } => format!(
                "Consider only trading the London and New York sessions: staying out of session would have prevented a loss of {}.",
                money(*avoidable_loss)
            ),
        };
        let _ = writeln!(out, "  * {line}");
    }
    out
}

fn render_histogram(bins: &[HistogramBin]) -> String {
    let Some(max_count) = bins.iter().map(|b| b.count).max().filter(|&c| c > 0) else {
        return format!("{NOT_APPLICABLE}\n");
    };

    let mut out = String::new();
    for bin in bins {
        let bar = bin.count * HISTOGRAM_BAR_WIDTH / max_count;
        let _ = writeln!(
            out,
            "{:>9.1} - {:>9.1} | {:<width$} {}",
            bin.lower,
            bin.upper,
            "#".repeat(bar),
            bin.count,
            width = HISTOGRAM_BAR_WIDTH
        );
    }
    out
}

fn breakdown_table<K: ToString>(
    label: &str,
    entries: &[BreakdownEntry<K>],
    money: impl Fn(Decimal) -> String,
) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![label, "Net Profit"]);
    for entry in entries {
        table.add_row(vec![entry.key.to_string(), money(entry.net_profit)]);
    }
    if let Some(column) = table.column_mut(1) {
        column.set_cell_alignment(CellAlignment::Right);
    }
    table
}

fn metric_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Metric", "Value"]);
    table
}

/// Compresses a curve into a fixed-width line of block characters.
pub fn sparkline(values: &[f64], width: usize) -> String {
    if values.is_empty() || width == 0 {
        return NOT_APPLICABLE.to_string();
    }

    let samples: Vec<f64> = if values.len() <= width {
        values.to_vec()
    } else {
        (0..width)
            .map(|k| values[k * (values.len() - 1) / (width - 1).max(1)])
            .collect()
    };

    let low = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let high = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = high - low;

    samples
        .iter()
        .map(|v| {
            if span <= f64::EPSILON {
                SPARK_LEVELS[SPARK_LEVELS.len() / 2]
            } else {
                let level = ((v - low) / span * (SPARK_LEVELS.len() - 1) as f64).round() as usize;
                SPARK_LEVELS[level.min(SPARK_LEVELS.len() - 1)]
            }
        })
        .collect()
}

/// Formats money with thousands separators and two decimals, e.g. `-£1,250.50`.
pub fn format_money(value: Decimal, currency: &str) -> String {
    let rounded = value.round_dp(2);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    let digits = format!("{:.2}", rounded.abs());
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::new();
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}{currency}{grouped}.{fraction}")
}

/// Rounds half away from zero before padding to two places; `{:.2}` on a
/// `Decimal` alone truncates.
fn two_places(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        return "0.00".to_string();
    }
    format!("{rounded:.2}")
}

fn signed(value: Decimal) -> String {
    let text = two_places(value);
    if text.starts_with('-') || text == "0.00" {
        text
    } else {
        format!("+{text}")
    }
}

fn na() -> String {
    NOT_APPLICABLE.to_string()
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
