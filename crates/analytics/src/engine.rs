use crate::error::AnalyticsError;
use crate::histogram::duration_histogram;
use crate::insights::derive_insights;
use crate::ranking::most_frequent;
use crate::report::{
    AdditionalMetrics, BreakdownEntry, KeyMetrics, PerformanceReport, SessionBreakdown,
    SymbolBreakdown,
};
use crate::smoothing::smooth_series;
use core_types::{TradeSet, TradingSession};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Number of samples in the smoothed balance curve.
pub const DEFAULT_SMOOTHING_POINTS: usize = 10_000;
/// Number of bars in the trade-duration histogram.
pub const DEFAULT_HISTOGRAM_BINS: usize = 30;

/// A stateless calculator for deriving performance metrics from closed trades.
///
/// Every method is a pure function of its arguments. The two fields only shape
/// presentation series and never influence a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyticsEngine {
    smoothing_points: usize,
    histogram_bins: usize,
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self {
            smoothing_points: DEFAULT_SMOOTHING_POINTS,
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
        }
    }
}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_presentation(smoothing_points: usize, histogram_bins: usize) -> Self {
        Self {
            smoothing_points,
            histogram_bins,
        }
    }

    /// The main entry point for building the dashboard report.
    ///
    /// # Arguments
    ///
    /// * `trades` - The chronologically ordered, validated trades.
    /// * `starting_balance` - The account balance before the first trade.
    ///
    /// # Returns
    ///
    /// The full `PerformanceReport`, or `AnalyticsError::InsufficientData` when
    /// there is nothing to report so the caller can show a placeholder.
    pub fn calculate(
        &self,
        trades: &TradeSet,
        starting_balance: Decimal,
    ) -> Result<PerformanceReport, AnalyticsError> {
        let balance_curve = self.cumulative_balance(trades, starting_balance)?;
        // Any subset total fits in a `Decimal` when the absolute total does.
        checked_sum(trades.iter().map(|t| t.profit.abs())).ok_or_else(|| {
            AnalyticsError::Calculation("trade profits exceed the decimal range".to_string())
        })?;

        let key = self.key_metrics(trades, starting_balance);
        let additional = self.additional_metrics(trades, starting_balance);
        let symbol_breakdown = self.symbol_breakdown(trades);
        let session_breakdown = self.session_breakdown(trades);
        let insights = derive_insights(trades, &symbol_breakdown, &session_breakdown, &key);

        let smoothed_curve = self.smooth_series(&balance_curve);
        let duration_histogram = duration_histogram(trades, self.histogram_bins);

        tracing::debug!(
            trades = key.total_trades,
            skipped = trades.skipped_count(),
            total_pnl = %key.total_pnl,
            "Performance report calculated"
        );

        Ok(PerformanceReport {
            starting_balance,
            skipped_records: trades.skipped_count(),
            key,
            additional,
            symbol_breakdown,
            session_breakdown,
            balance_curve,
            smoothed_curve,
            duration_histogram,
            insights,
        })
    }

    /// Maps a close hour to its trading session.
    pub fn classify_session(close_hour: u32) -> TradingSession {
        TradingSession::from_hour(close_hour)
    }

    /// Running account balance after each trade, in trade order.
    pub fn cumulative_balance(
        &self,
        trades: &TradeSet,
        starting_balance: Decimal,
    ) -> Result<Vec<Decimal>, AnalyticsError> {
        if trades.is_empty() {
            return Err(AnalyticsError::InsufficientData);
        }

        let mut balance = starting_balance;
        trades
            .iter()
            .map(|trade| {
                balance = balance.checked_add(trade.profit).ok_or_else(|| {
                    AnalyticsError::Calculation("cumulative balance overflowed".to_string())
                })?;
                Ok(balance)
            })
            .collect()
    }

    /// Resamples a balance series onto the configured number of chart points.
    pub fn smooth_series(&self, balance: &[Decimal]) -> Vec<f64> {
        smooth_series(balance, self.smoothing_points)
    }

    /// Calculates the headline metrics.
    ///
    /// Ratios that leave the `Decimal` range are reported as `None`. The total
    /// saturates; `calculate` rejects such trade sets before getting here.
    pub fn key_metrics(&self, trades: &TradeSet, starting_balance: Decimal) -> KeyMetrics {
        if trades.is_empty() {
            return KeyMetrics::empty();
        }

        let total_trades = trades.len();
        let total_pnl = trades
            .iter()
            .map(|t| t.profit)
            .fold(Decimal::ZERO, Decimal::saturating_add);
        let winning_trades = trades.iter().filter(|t| t.is_win()).count();
        let losing_trades = trades.iter().filter(|t| t.is_loss()).count();

        let win_rate_pct = Some(
            Decimal::from(winning_trades) / Decimal::from(total_trades) * Decimal::ONE_HUNDRED,
        );

        let average_win = mean(trades.iter().filter(|t| t.is_win()).map(|t| t.profit));
        let average_loss = mean(trades.iter().filter(|t| t.is_loss()).map(|t| t.profit));
        let average_risk_reward = match (average_win, average_loss) {
            (Some(win), Some(loss)) => win.abs().checked_div(loss.abs()),
            _ => None,
        };

        let final_balance = self
            .cumulative_balance(trades, starting_balance)
            .ok()
            .and_then(|curve| curve.last().copied());
        let percentage_growth = final_balance
            .filter(|_| !starting_balance.is_zero())
            .and_then(|end| {
                end.checked_sub(starting_balance)?
                    .checked_div(starting_balance)?
                    .checked_mul(Decimal::ONE_HUNDRED)
            });

        KeyMetrics {
            total_pnl,
            total_trades,
            winning_trades,
            losing_trades,
            win_rate_pct,
            average_risk_reward,
            percentage_growth,
            final_balance,
            most_traded_symbol: most_frequent(trades.iter().map(|t| t.symbol.clone())),
            most_traded_weekday: most_frequent(trades.iter().map(|t| t.close_weekday())),
        }
    }

    /// Calculates drawdown, duration and average win/loss.
    pub fn additional_metrics(
        &self,
        trades: &TradeSet,
        starting_balance: Decimal,
    ) -> AdditionalMetrics {
        // The drawdown is the lowest balance relative to the start, not the
        // deepest fall from a running peak.
        let max_drawdown = self
            .cumulative_balance(trades, starting_balance)
            .ok()
            .and_then(|curve| curve.into_iter().min())
            .and_then(|lowest| lowest.min(starting_balance).checked_sub(starting_balance));

        AdditionalMetrics {
            max_drawdown,
            average_trade_duration_minutes: mean(trades.iter().map(|t| t.duration_minutes())),
            average_win: mean(trades.iter().filter(|t| t.is_win()).map(|t| t.profit)),
            average_loss: mean(trades.iter().filter(|t| t.is_loss()).map(|t| t.profit)),
        }
    }

    /// Net profit per symbol, worst first.
    pub fn symbol_breakdown(&self, trades: &TradeSet) -> SymbolBreakdown {
        let mut totals: BTreeMap<&str, Decimal> = BTreeMap::new();
        for trade in trades {
            let total = totals.entry(trade.symbol.as_str()).or_default();
            *total = total.saturating_add(trade.profit);
        }

        let mut breakdown: SymbolBreakdown = totals
            .into_iter()
            .map(|(symbol, net)| BreakdownEntry::new(symbol.to_string(), net))
            .collect();
        // Stable sort, so equal totals stay in alphabetical order.
        breakdown.sort_by(|a, b| a.net_profit.cmp(&b.net_profit));
        breakdown
    }

    /// Net profit per trading session, best first.
    pub fn session_breakdown(&self, trades: &TradeSet) -> SessionBreakdown {
        let mut totals: BTreeMap<TradingSession, Decimal> = BTreeMap::new();
        for trade in trades {
            let total = totals.entry(trade.trading_session()).or_default();
            *total = total.saturating_add(trade.profit);
        }

        let mut breakdown: SessionBreakdown = totals
            .into_iter()
            .map(|(session, net)| BreakdownEntry::new(session, net))
            .collect();
        breakdown.sort_by(|a, b| b.net_profit.cmp(&a.net_profit));
        breakdown
    }
}

/// Sum of `values`, or `None` if it leaves the `Decimal` range.
fn checked_sum(mut values: impl Iterator<Item = Decimal>) -> Option<Decimal> {
    values.try_fold(Decimal::ZERO, |sum, v| sum.checked_add(v))
}

/// Arithmetic mean, or `None` for an empty selection or an out-of-range sum.
fn mean(mut values: impl Iterator<Item = Decimal>) -> Option<Decimal> {
    let (sum, count) = values.try_fold((Decimal::ZERO, 0u64), |(sum, n), v| {
        Some((sum.checked_add(v)?, n + 1))
    })?;
    if count == 0 {
        return None;
    }
    sum.checked_div(Decimal::from(count))
}
