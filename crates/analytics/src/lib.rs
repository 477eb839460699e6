//! # Tradelens Analytics Engine
//!
//! This crate turns a set of closed trades into the figures behind the
//! performance dashboard: headline metrics, drawdown, per-symbol and
//! per-session breakdowns, the balance curve and its smoothed chart series.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of files,
//!   terminals or configuration sources. It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** The `AnalyticsEngine` is a stateless calculator. It takes
//!   a `TradeSet` and a starting balance and produces a `PerformanceReport`.
//! - **Explicit "not applicable":** Metrics that are undefined for the input (no trades,
//!   no winners, no losers) are `None`, never a silent zero.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: The main struct that contains the calculation logic.
//! - `PerformanceReport`, `KeyMetrics`, `AdditionalMetrics`: The report structs.
//! - `smooth_series`: Cubic spline resampling for the balance chart.
//! - `AnalyticsError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod histogram;
pub mod insights;
pub mod ranking;
pub mod report;
pub mod smoothing;

// Re-export the key components to create a clean, public-facing API.
pub use engine::{AnalyticsEngine, DEFAULT_HISTOGRAM_BINS, DEFAULT_SMOOTHING_POINTS};
pub use error::AnalyticsError;
pub use histogram::HistogramBin;
pub use insights::{Advice, Insights};
pub use report::{
    AdditionalMetrics, BreakdownEntry, KeyMetrics, PerformanceReport, SessionBreakdown,
    SymbolBreakdown,
};
pub use smoothing::smooth_series;
