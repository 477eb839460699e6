use serde::{Deserialize, Serialize};
use std::fmt;

/// The time-of-day bucket a trade belongs to, derived from its close hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TradingSession {
    #[serde(rename = "New York")]
    NewYork,
    London,
    #[serde(rename = "Out of Session")]
    OutOfSession,
}

impl TradingSession {
    /// All sessions in their fixed reporting order.
    pub const ALL: [TradingSession; 3] = [
        TradingSession::NewYork,
        TradingSession::London,
        TradingSession::OutOfSession,
    ];

    /// Maps a close hour (0-23) to its session.
    ///
    /// The windows are half-open: New York is `[12, 17)` and London is `[7, 10)`.
    /// Hours 10 and 11 fall between the two and count as out of session.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            12..=16 => TradingSession::NewYork,
            7..=9 => TradingSession::London,
            _ => TradingSession::OutOfSession,
        }
    }

    /// Returns true for the two sessions the dashboard treats as "in session".
    pub fn is_active(&self) -> bool {
        !matches!(self, TradingSession::OutOfSession)
    }

    pub fn label(&self) -> &'static str {
        match self {
            TradingSession::NewYork => "New York",
            TradingSession::London => "London",
            TradingSession::OutOfSession => "Out of Session",
        }
    }
}

impl fmt::Display for TradingSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_hour_maps_to_exactly_one_session() {
        for hour in 0..24 {
            let session = TradingSession::from_hour(hour);
            assert!(TradingSession::ALL.contains(&session));
            assert_eq!(session, TradingSession::from_hour(hour));
        }
    }

    #[test]
    fn session_boundaries_are_half_open() {
        assert_eq!(TradingSession::from_hour(6), TradingSession::OutOfSession);
        assert_eq!(TradingSession::from_hour(7), TradingSession::London);
        assert_eq!(TradingSession::from_hour(9), TradingSession::London);
        assert_eq!(TradingSession::from_hour(10), TradingSession::OutOfSession);
        assert_eq!(TradingSession::from_hour(11), TradingSession::OutOfSession);
        assert_eq!(TradingSession::from_hour(12), TradingSession::NewYork);
        assert_eq!(TradingSession::from_hour(16), TradingSession::NewYork);
        assert_eq!(TradingSession::from_hour(17), TradingSession::OutOfSession);
        assert_eq!(TradingSession::from_hour(0), TradingSession::OutOfSession);
        assert_eq!(TradingSession::from_hour(23), TradingSession::OutOfSession);
    }

    #[test]
    fn display_uses_dashboard_labels() {
        assert_eq!(TradingSession::NewYork.to_string(), "New York");
        assert_eq!(TradingSession::OutOfSession.to_string(), "Out of Session");
        assert!(TradingSession::London.is_active());
        assert!(!TradingSession::OutOfSession.is_active());
    }
}
