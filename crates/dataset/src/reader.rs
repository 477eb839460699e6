use crate::error::DatasetError;
use chrono::NaiveDateTime;
use core_types::{TradeRecord, TradeSet};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// Timestamp layout of the broker export, e.g. `21/09/2023 14:05`.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M";

pub const OPEN_COLUMN: &str = "Open";
pub const CLOSE_COLUMN: &str = "Close";
pub const SYMBOL_COLUMN: &str = "Symbol";
pub const PROFIT_COLUMN: &str = "Profit";
pub const DURATION_COLUMN: &str = "Trade duration in seconds";

const REQUIRED_COLUMNS: [&str; 5] = [
    OPEN_COLUMN,
    CLOSE_COLUMN,
    SYMBOL_COLUMN,
    PROFIT_COLUMN,
    DURATION_COLUMN,
];

/// One row as it appears in the file. Fields stay textual so that parse
/// failures can be reported with the row and column they came from.
#[derive(Debug, Deserialize)]
struct RawTradeRow {
    #[serde(rename = "Open")]
    open: String,
    #[serde(rename = "Close")]
    close: String,
    #[serde(rename = "Symbol")]
    symbol: String,
    #[serde(rename = "Profit")]
    profit: String,
    #[serde(rename = "Trade duration in seconds")]
    duration_seconds: String,
}

/// Loads a broker trade export into a validated, chronologically ordered `TradeSet`.
///
/// Columns other than the five the dashboard needs are ignored.
#[derive(Debug, Clone)]
pub struct TradeCsvReader {
    timestamp_format: String,
}

impl Default for TradeCsvReader {
    fn default() -> Self {
        Self::new(DEFAULT_TIMESTAMP_FORMAT)
    }
}

impl TradeCsvReader {
    pub fn new(timestamp_format: impl Into<String>) -> Self {
        Self {
            timestamp_format: timestamp_format.into(),
        }
    }

    /// Reads the export at `path`.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<TradeSet, DatasetError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!(path = %path.display(), "Loading trade export");
        self.read_from(file)
    }

    /// Reads an export from any byte source.
    pub fn read_from<R: Read>(&self, reader: R) -> Result<TradeSet, DatasetError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(DatasetError::MissingColumn(column.to_string()));
            }
        }

        let mut records = Vec::new();
        for (index, result) in csv_reader.deserialize::<RawTradeRow>().enumerate() {
            let row = index + 1;
            records.push(self.parse_row(row, result?)?);
        }

        let trades = TradeSet::new(records);
        tracing::info!(
            loaded = trades.len(),
            skipped = trades.skipped_count(),
            "Trade export parsed"
        );
        Ok(trades)
    }

    fn parse_row(&self, row: usize, raw: RawTradeRow) -> Result<TradeRecord, DatasetError> {
        Ok(TradeRecord {
            open_time: self.parse_timestamp(row, OPEN_COLUMN, &raw.open)?,
            close_time: self.parse_timestamp(row, CLOSE_COLUMN, &raw.close)?,
            profit: parse_decimal(row, &raw.profit)?,
            duration_seconds: parse_seconds(row, &raw.duration_seconds)?,
            symbol: raw.symbol,
        })
    }

    fn parse_timestamp(
        &self,
        row: usize,
        column: &'static str,
        value: &str,
    ) -> Result<NaiveDateTime, DatasetError> {
        NaiveDateTime::parse_from_str(value, &self.timestamp_format).map_err(|e| {
            DatasetError::Parse {
                row,
                column,
                value: value.to_string(),
                reason: e.to_string(),
            }
        })
    }
}

fn parse_decimal(row: usize, value: &str) -> Result<Decimal, DatasetError> {
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .map_err(|e| DatasetError::Parse {
            row,
            column: PROFIT_COLUMN,
            value: value.to_string(),
            reason: e.to_string(),
        })
}

fn parse_seconds(row: usize, value: &str) -> Result<i64, DatasetError> {
    value.parse::<i64>().map_err(|e| DatasetError::Parse {
        row,
        column: DURATION_COLUMN,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    const EXPORT: &str = "\
Ticket,Open,Type,Volume,Symbol,Close,Profit,Trade duration in seconds
1001,21/09/2023 13:02,buy,1.0,EURUSD,21/09/2023 14:10,125.40,4080
1002,20/09/2023 07:15,sell,0.5,GBPUSD,20/09/2023 08:45,-60.10,5400
1003,22/09/2023 21:00,buy,2.0,XAUUSD,22/09/2023 22:30,1.5e1,5400
";

    #[test]
    fn parses_the_broker_layout_and_sorts_by_close() {
        let trades = TradeCsvReader::default().read_from(EXPORT.as_bytes()).unwrap();

        assert_eq!(trades.len(), 3);
        assert_eq!(trades.skipped_count(), 0);
        let symbols: Vec<_> = trades.iter().map(|t| t.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["GBPUSD", "EURUSD", "XAUUSD"]);

        let first = &trades.trades()[0];
        assert_eq!(first.profit, dec!(-60.10));
        assert_eq!(first.duration_seconds, 5400);
        assert_eq!(first.close_time.to_string(), "2023-09-20 08:45:00");
        assert_eq!(trades.trades()[2].profit, dec!(15));
    }

    #[test]
    fn bad_values_report_row_and_column() {
        let csv = "\
Open,Close,Symbol,Profit,Trade duration in seconds
21/09/2023 13:02,21/09/2023 14:10,EURUSD,12.5,60
21/09/2023 13:02,2023-09-21 14:10,EURUSD,12.5,60
";
        let err = TradeCsvReader::default().read_from(csv.as_bytes()).unwrap_err();
        match err {
            DatasetError::Parse { row, column, value, .. } => {
                assert_eq!(row, 2);
                assert_eq!(column, CLOSE_COLUMN);
                assert_eq!(value, "2023-09-21 14:10");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let csv = "\
Open,Close,Symbol,Profit,Trade duration in seconds
21/09/2023 13:02,21/09/2023 14:10,EURUSD,lots,60
";
        let err = TradeCsvReader::default().read_from(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DatasetError::Parse { row: 1, column: PROFIT_COLUMN, .. }));
    }

    #[test]
    fn missing_column_is_reported() {
        let csv = "Open,Close,Symbol,Profit\n21/09/2023 13:02,21/09/2023 14:10,EURUSD,12.5\n";
        let err = TradeCsvReader::default().read_from(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DatasetError::MissingColumn(ref c) if c == DURATION_COLUMN));
    }

    #[test]
    fn malformed_rows_are_skipped_and_counted() {
        let csv = "\
Open,Close,Symbol,Profit,Trade duration in seconds
21/09/2023 13:02,21/09/2023 14:10,EURUSD,12.5,60
21/09/2023 15:00,21/09/2023 14:10,EURUSD,3,60
21/09/2023 13:02,21/09/2023 14:10,GBPUSD,-4,-5
";
        let trades = TradeCsvReader::default().read_from(csv.as_bytes()).unwrap();
        assert_eq!(trades.len(), 1);
        assert_eq!(trades.skipped_count(), 2);
    }

    #[test]
    fn custom_timestamp_format() {
        let csv = "\
Open,Close,Symbol,Profit,Trade duration in seconds
2023-09-21 13:02,2023-09-21 14:10,EURUSD,12.5,4080
";
        let trades = TradeCsvReader::new("%Y-%m-%d %H:%M")
            .read_from(csv.as_bytes())
            .unwrap();
        assert_eq!(trades.len(), 1);
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(EXPORT.as_bytes()).unwrap();

        let trades = TradeCsvReader::default().load(file.path()).unwrap();
        assert_eq!(trades.len(), 3);

        let err = TradeCsvReader::default()
            .load(file.path().with_extension("missing"))
            .unwrap_err();
        assert!(matches!(err, DatasetError::Io { .. }));
    }
}
