use core_types::TradeSet;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

/// One bar of the trade-duration histogram, in minutes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Buckets trade durations (in minutes) into `bins` equal-width bins over
/// the observed range. Every bin is half-open except the last, which also
/// takes the maximum. When all durations are equal the range is widened to
/// `[v - 0.5, v + 0.5]`.
pub fn duration_histogram(trades: &TradeSet, bins: usize) -> Vec<HistogramBin> {
    if trades.is_empty() || bins == 0 {
        return Vec::new();
    }

    let minutes: Vec<f64> = trades
        .iter()
        .filter_map(|t| {
            let minutes = t.duration_minutes().to_f64();
            if minutes.is_none() {
                tracing::warn!(symbol = %t.symbol, "Trade duration left out of the histogram");
            }
            minutes
        })
        .collect();
    if minutes.is_empty() {
        return Vec::new();
    }

    let mut low = minutes.iter().copied().fold(f64::INFINITY, f64::min);
    let mut high = minutes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if low == high {
        low -= 0.5;
        high += 0.5;
    }

    let width = (high - low) / bins as f64;
    let mut histogram: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: low + i as f64 * width,
            upper: if i == bins - 1 { high } else { low + (i + 1) as f64 * width },
            count: 0,
        })
        .collect();

    for value in minutes {
        let index = (((value - low) / width).floor() as usize).min(bins - 1);
        histogram[index].count += 1;
    }

    histogram
}
