use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("Not enough data to perform calculation: the trade set is empty")]
    InsufficientData,

    #[error("Error in calculation: {0}")]
    Calculation(String),
}
