//! # Nest settings.
//!
//! Provides [`Settings`] centralized, immutable settings for a [`Nest`](crate::Nest).
//!
//! ## Sentinel values
//! - `error_tolerance = 0` → a client is evicted on its first failed write
//! - `bus_capacity = 0` → clamped to 1 by [`Settings::bus_capacity_clamped`]

/// Settings shared by every operation of one nest.
///
/// ## Field semantics
/// - `error_tolerance`: failed writes a client may accumulate; one more evicts it
/// - `bus_capacity`: event bus ring buffer size (min 1; clamped by Bus)
///
/// Settings are read-only once the nest is built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Maximum number of failed writes before a client becomes eligible for eviction.
    ///
    /// A client is evicted once its error count is **strictly greater** than this value,
    /// so the default of 5 evicts on the sixth failure.
    pub error_tolerance: usize,

    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Receivers that lag behind more than `bus_capacity` events observe `Lagged`
    /// and skip older items.
    pub bus_capacity: usize,
}

impl Settings {
    /// Returns settings with the given error tolerance and default everything else.
    pub fn with_error_tolerance(error_tolerance: usize) -> Self {
        Self {
            error_tolerance,
            ..Self::default()
        }
    }

    /// Returns true if a client with `errors` failures must be evicted.
    #[inline]
    pub fn exceeds_tolerance(&self, errors: usize) -> bool {
        errors > self.error_tolerance
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Settings {
    /// Default settings:
    ///
    /// - `error_tolerance = 5`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            error_tolerance: 5,
            bus_capacity: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tolerance_is_five() {
        let s = Settings::default();
        assert_eq!(s.error_tolerance, 5);
        assert!(!s.exceeds_tolerance(5));
        assert!(s.exceeds_tolerance(6));
    }

    #[test]
    fn test_zero_tolerance_evicts_on_first_failure() {
        let s = Settings::with_error_tolerance(0);
        assert!(!s.exceeds_tolerance(0));
        assert!(s.exceeds_tolerance(1));
    }

    #[test]
    fn test_bus_capacity_clamped() {
        let s = Settings {
            bus_capacity: 0,
            ..Settings::default()
        };
        assert_eq!(s.bus_capacity_clamped(), 1);
    }
}
