use crate::report::{BreakdownEntry, KeyMetrics, SessionBreakdown, SymbolBreakdown};
use core_types::{TradeSet, TradingSession};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Risk-reward ratio the advice aims for.
pub const TARGET_RISK_REWARD: Decimal = dec!(2);
/// Win rate, in percent, the advice aims for.
pub const TARGET_WIN_RATE_PCT: Decimal = dec!(50);

/// The narrative "insights and advice" panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insights {
    pub best_symbol: Option<BreakdownEntry<String>>,
    /// The symbol with the largest net loss; `None` if no symbol lost money.
    pub worst_symbol: Option<BreakdownEntry<String>>,
    pub best_session: Option<BreakdownEntry<TradingSession>>,
    /// The session with the largest net loss; `None` if no session lost money.
    pub worst_session: Option<BreakdownEntry<TradingSession>>,
    /// Net result of every trade closed out of session.
    pub out_of_session_pnl: Decimal,
    pub advice: Vec<Advice>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advice {
    FocusOnSymbol { symbol: String },
    ReviewUnderperformers,
    RaiseTargets {
        risk_reward: Option<Decimal>,
        win_rate_pct: Option<Decimal>,
    },
    AvoidOutOfSession { avoidable_loss: Decimal },
}

/// Derives the insights panel from the breakdowns and headline metrics.
pub fn derive_insights(
    trades: &TradeSet,
    symbols: &SymbolBreakdown,
    sessions: &SessionBreakdown,
    key: &KeyMetrics,
) -> Insights {
    let best_symbol = symbols.last().cloned();
    let worst_symbol = symbols
        .first()
        .filter(|e| e.net_profit < Decimal::ZERO)
        .cloned();
    let best_session = sessions.first().cloned();
    let worst_session = sessions
        .last()
        .filter(|e| e.net_profit < Decimal::ZERO)
        .cloned();

    let out_of_session_pnl = trades
        .iter()
        .filter(|t| !t.trading_session().is_active())
        .map(|t| t.profit)
        .fold(Decimal::ZERO, Decimal::saturating_add);

    let mut advice = Vec::new();

    if let Some(best) = best_symbol.as_ref().filter(|e| e.net_profit > Decimal::ZERO) {
        advice.push(Advice::FocusOnSymbol {
            symbol: best.key.clone(),
        });
    }

    if worst_symbol.is_some() || worst_session.is_some() {
        advice.push(Advice::ReviewUnderperformers);
    }

    let rr_below = key.average_risk_reward.is_some_and(|rr| rr < TARGET_RISK_REWARD);
    let win_rate_below = key.win_rate_pct.is_some_and(|wr| wr < TARGET_WIN_RATE_PCT);
    if rr_below || win_rate_below {
        advice.push(Advice::RaiseTargets {
            risk_reward: key.average_risk_reward,
            win_rate_pct: key.win_rate_pct,
        });
    }

    if out_of_session_pnl < Decimal::ZERO {
        advice.push(Advice::AvoidOutOfSession {
            avoidable_loss: out_of_session_pnl.abs(),
        });
    }

    Insights {
        best_symbol,
        worst_symbol,
        best_session,
        worst_session,
        out_of_session_pnl,
        advice,
    }
}
