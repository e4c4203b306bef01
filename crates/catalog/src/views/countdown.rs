//! Remaining-time display for express meals.

use std::fmt;

use chrono::{DateTime, Utc};

/// Label shown once an express deal is over.
pub const EXPIRED_LABEL: &str = "Expirado";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    Remaining { minutes: i64, seconds: i64 },
    Expired,
}

impl Countdown {
    /// Time left until `expires_at`, truncated to whole seconds.
    pub fn until(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let millis = (expires_at - now).num_milliseconds();
        if millis <= 0 {
            return Countdown::Expired;
        }
        Countdown::Remaining {
            minutes: millis / 60_000,
            seconds: (millis % 60_000) / 1_000,
        }
    }

    pub fn is_expired(self) -> bool {
        matches!(self, Countdown::Expired)
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Countdown::Remaining { minutes, seconds } => write!(f, "{minutes}:{seconds:02}"),
            Countdown::Expired => f.write_str(EXPIRED_LABEL),
        }
    }
}

/// `"M:SS"` while time remains, [`EXPIRED_LABEL`] afterwards.
pub fn countdown_label(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    Countdown::until(expires_at, now).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap() + Duration::seconds(seconds)
    }

    #[test]
    fn test_remaining_is_formatted_with_padded_seconds() {
        assert_eq!(countdown_label(at(125), at(0)), "2:05");
        assert_eq!(countdown_label(at(59), at(0)), "0:59");
        assert_eq!(countdown_label(at(3_600), at(0)), "60:00");
    }

    #[test]
    fn test_partial_seconds_truncate() {
        let expires = at(10) + Duration::milliseconds(999);
        assert_eq!(countdown_label(expires, at(0)), "0:10");
    }

    #[test]
    fn test_deadline_reached_is_expired() {
        assert_eq!(countdown_label(at(0), at(0)), EXPIRED_LABEL);
        assert_eq!(countdown_label(at(0), at(30)), EXPIRED_LABEL);
        assert!(Countdown::until(at(0), at(1)).is_expired());
    }
}
