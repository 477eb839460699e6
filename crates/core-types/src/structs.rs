use crate::enums::TradingSession;
use crate::error::CoreError;
use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single closed trade as exported by the broker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub symbol: String,
    pub open_time: NaiveDateTime,
    pub close_time: NaiveDateTime,
    /// Signed profit in account currency.
    pub profit: Decimal,
    pub duration_seconds: i64,
}

impl TradeRecord {
    pub fn new(
        symbol: impl Into<String>,
        open_time: NaiveDateTime,
        close_time: NaiveDateTime,
        profit: Decimal,
        duration_seconds: i64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            open_time,
            close_time,
            profit,
            duration_seconds,
        }
    }

    /// Checks the record's basic invariants.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.symbol.trim().is_empty() {
            return Err(CoreError::EmptySymbol);
        }
        if self.duration_seconds < 0 {
            return Err(CoreError::NegativeDuration {
                symbol: self.symbol.clone(),
                seconds: self.duration_seconds,
            });
        }
        if self.close_time < self.open_time {
            return Err(CoreError::CloseBeforeOpen {
                symbol: self.symbol.clone(),
                open: self.open_time.to_string(),
                close: self.close_time.to_string(),
            });
        }
        Ok(())
    }

    /// The session this trade closed in.
    pub fn trading_session(&self) -> TradingSession {
        TradingSession::from_hour(self.close_time.hour())
    }

    pub fn close_weekday(&self) -> Weekday {
        self.close_time.weekday()
    }

    pub fn duration_minutes(&self) -> Decimal {
        Decimal::from(self.duration_seconds) / Decimal::from(60)
    }

    pub fn is_win(&self) -> bool {
        self.profit > Decimal::ZERO
    }

    pub fn is_loss(&self) -> bool {
        self.profit < Decimal::ZERO
    }
}

/// A record that was dropped while building a `TradeSet`, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRecord {
    /// Zero-based position of the record in the input sequence.
    pub index: usize,
    pub record: TradeRecord,
    pub reason: CoreError,
}

/// An immutable, chronologically ordered collection of valid trades.
///
/// Construction applies a reject-and-count policy: invalid records are moved
/// aside into `rejected` and never reach the metrics. Valid records are
/// stably sorted by close time, so an already sorted input keeps its order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TradeSet {
    trades: Vec<TradeRecord>,
    rejected: Vec<RejectedRecord>,
}

impl TradeSet {
    pub fn new(records: Vec<TradeRecord>) -> Self {
        let mut trades = Vec::with_capacity(records.len());
        let mut rejected = Vec::new();

        for (index, record) in records.into_iter().enumerate() {
            match record.validate() {
                Ok(()) => trades.push(record),
                Err(reason) => {
                    tracing::warn!(index, %reason, "Skipping malformed trade record");
                    rejected.push(RejectedRecord {
                        index,
                        record,
                        reason,
                    });
                }
            }
        }

        trades.sort_by_key(|t| t.close_time);

        Self { trades, rejected }
    }

    pub fn trades(&self) -> &[TradeRecord] {
        &self.trades
    }

    pub fn rejected(&self) -> &[RejectedRecord] {
        &self.rejected
    }

    pub fn skipped_count(&self) -> usize {
        self.rejected.len()
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TradeRecord> {
        self.trades.iter()
    }
}

impl FromIterator<TradeRecord> for TradeSet {
    fn from_iter<I: IntoIterator<Item = TradeRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a TradeSet {
    type Item = &'a TradeRecord;
    type IntoIter = std::slice::Iter<'a, TradeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.trades.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 9, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn sorts_by_close_time_and_keeps_ties_stable() {
        let set = TradeSet::new(vec![
            TradeRecord::new("GBPUSD", at(5, 9, 0), at(5, 10, 0), dec!(10), 3600),
            TradeRecord::new("EURUSD", at(4, 9, 0), at(4, 9, 30), dec!(-5), 1800),
            TradeRecord::new("USDJPY", at(5, 9, 30), at(5, 10, 0), dec!(7), 1800),
        ]);

        let symbols: Vec<_> = set.iter().map(|t| t.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["EURUSD", "GBPUSD", "USDJPY"]);
        assert_eq!(set.skipped_count(), 0);
    }

    #[test]
    fn malformed_records_are_rejected_and_counted() {
        let set = TradeSet::new(vec![
            TradeRecord::new("GBPUSD", at(5, 9, 0), at(5, 10, 0), dec!(10), 3600),
            TradeRecord::new("EURUSD", at(5, 9, 0), at(5, 10, 0), dec!(3), -1),
            TradeRecord::new("USDJPY", at(5, 11, 0), at(5, 10, 0), dec!(7), 0),
            TradeRecord::new("  ", at(5, 9, 0), at(5, 10, 0), dec!(1), 10),
        ]);

        assert_eq!(set.len(), 1);
        assert_eq!(set.skipped_count(), 3);
        assert_eq!(set.rejected()[0].index, 1);
        assert!(matches!(
            set.rejected()[0].reason,
            CoreError::NegativeDuration { seconds: -1, .. }
        ));
        assert!(matches!(
            set.rejected()[1].reason,
            CoreError::CloseBeforeOpen { .. }
        ));
        assert_eq!(set.rejected()[2].reason, CoreError::EmptySymbol);
    }

    #[test]
    fn derived_fields_come_from_close_time() {
        // 2023-09-08 is a Friday.
        let trade = TradeRecord::new("XAUUSD", at(8, 6, 50), at(8, 13, 5), dec!(1), 90);
        assert_eq!(trade.trading_session(), TradingSession::NewYork);
        assert_eq!(trade.close_weekday(), Weekday::Fri);
        assert_eq!(trade.duration_minutes(), dec!(1.5));
        assert!(trade.is_win());
        assert!(!trade.is_loss());
    }
}
