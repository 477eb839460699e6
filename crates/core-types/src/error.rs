use thiserror::Error;

/// Reasons a single trade record fails basic validity checks.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Trade on {symbol} has a negative duration of {seconds}s")]
    NegativeDuration { symbol: String, seconds: i64 },

    #[error("Trade on {symbol} closes at {close} before it opens at {open}")]
    CloseBeforeOpen {
        symbol: String,
        open: String,
        close: String,
    },

    #[error("Trade record has an empty symbol")]
    EmptySymbol,
}
