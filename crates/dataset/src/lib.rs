//! # Tradelens Dataset Crate
//!
//! This crate reads the broker's CSV trade export and hands the rest of the
//! application a validated `TradeSet`.
//!
//! ## Architectural Principles
//!
//! - **Layer 2 Adapter:** All file-format knowledge (column names, timestamp layout,
//!   number parsing) lives here. The analytics crate never sees a CSV row.
//! - **Fail Loudly on Unreadable Rows:** A value that cannot be parsed is an error naming
//!   the row and column. Rows that parse but break a trade invariant are skipped and
//!   counted by `TradeSet`.
//!
//! ## Public API
//!
//! - `TradeCsvReader`: Loads an export from a path or any reader.
//! - `DatasetError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod error;
pub mod reader;

// Re-export the key components to create a clean, public-facing API.
pub use error::DatasetError;
pub use reader::{DEFAULT_TIMESTAMP_FORMAT, TradeCsvReader};
