//! Retention policy for time-bounded records.

use chrono::{DateTime, TimeDelta, Utc};
use std::time::Duration;

/// Fixed retention window applied to every stored record.
///
/// A record expires strictly after `uploaded_at + window`; a record sitting
/// exactly at its expiry instant is still valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    window: TimeDelta,
}

impl RetentionPolicy {
    /// Create a policy with the given retention window.
    ///
    /// Windows too large for chrono arithmetic are clamped, which in
    /// practice means the record never expires.
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window: TimeDelta::from_std(window).unwrap_or(TimeDelta::MAX),
        }
    }

    /// The configured retention window.
    #[must_use]
    pub fn window(&self) -> TimeDelta {
        self.window
    }

    /// Compute the expiry instant for a record uploaded at `uploaded_at`.
    ///
    /// Always exactly `uploaded_at + window`, independent of when this is
    /// called.
    #[must_use]
    pub fn expires_at(&self, uploaded_at: DateTime<Utc>) -> DateTime<Utc> {
        uploaded_at
            .checked_add_signed(self.window)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

impl Default for RetentionPolicy {
    /// Default: 24 hour retention.
    fn default() -> Self {
        Self::new(Duration::from_secs(24 * 60 * 60))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_is_exactly_upload_plus_window() {
        let policy = RetentionPolicy::new(Duration::from_secs(60 * 60));
        let uploaded_at = Utc::now();

        let expires_at = policy.expires_at(uploaded_at);

        assert_eq!(expires_at - uploaded_at, TimeDelta::hours(1));
    }

    #[test]
    fn default_window_is_24_hours() {
        let policy = RetentionPolicy::default();
        assert_eq!(policy.window(), TimeDelta::hours(24));
    }

    #[test]
    fn oversize_window_saturates_instead_of_panicking() {
        let policy = RetentionPolicy::new(Duration::from_secs(u64::MAX));
        let expires_at = policy.expires_at(Utc::now());
        assert!(expires_at > Utc::now());
    }
}
