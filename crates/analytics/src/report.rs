use crate::histogram::HistogramBin;
use crate::insights::Insights;
use chrono::Weekday;
use core_types::TradingSession;
use rust_decimal::Decimal;
use serde::Serialize;

/// Headline figures shown at the top of the dashboard.
///
/// `None` means "not applicable": the metric is undefined for the given
/// trades, which is distinct from a computed value of zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyMetrics {
    pub total_pnl: Decimal,
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub win_rate_pct: Option<Decimal>, // Option<> for cases with 0 trades
    pub average_risk_reward: Option<Decimal>, // Option<> because there may be no losers or no winners
    pub percentage_growth: Option<Decimal>,
    pub final_balance: Option<Decimal>,
    pub most_traded_symbol: Option<String>,
    pub most_traded_weekday: Option<Weekday>,
}

impl KeyMetrics {
    /// The metrics of an empty trade set.
    pub fn empty() -> Self {
        Self {
            total_pnl: Decimal::ZERO,
            total_trades: 0,
            winning_trades: 0,
            losing_trades: 0,
            win_rate_pct: None,
            average_risk_reward: None,
            percentage_growth: None,
            final_balance: None,
            most_traded_symbol: None,
            most_traded_weekday: None,
        }
    }
}

/// Secondary statistics listed under "Other Key Metrics".
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AdditionalMetrics {
    /// Lowest balance reached minus the starting balance. Never positive.
    pub max_drawdown: Option<Decimal>,
    pub average_trade_duration_minutes: Option<Decimal>,
    pub average_win: Option<Decimal>,
    pub average_loss: Option<Decimal>,
}

/// Net profit attributed to one group (a symbol or a session).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakdownEntry<K> {
    pub key: K,
    pub net_profit: Decimal,
}

impl<K> BreakdownEntry<K> {
    pub fn new(key: K, net_profit: Decimal) -> Self {
        Self { key, net_profit }
    }
}

/// Net profit per symbol, ascending: worst performer first, best last.
pub type SymbolBreakdown = Vec<BreakdownEntry<String>>;

/// Net profit per session, descending: best session first.
pub type SessionBreakdown = Vec<BreakdownEntry<TradingSession>>;

/// Everything the dashboard renders, derived from one trade set.
///
/// All numeric metrics come from the raw balance series; `smoothed_curve`
/// exists for charting only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceReport {
    pub starting_balance: Decimal,
    /// Records dropped as malformed before any metric was computed.
    pub skipped_records: usize,

    pub key: KeyMetrics,
    pub additional: AdditionalMetrics,

    pub symbol_breakdown: SymbolBreakdown,
    pub session_breakdown: SessionBreakdown,

    pub balance_curve: Vec<Decimal>,
    pub smoothed_curve: Vec<f64>,
    pub duration_histogram: Vec<HistogramBin>,

    pub insights: Insights,
}
