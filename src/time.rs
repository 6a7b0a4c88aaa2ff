//! Timekeeping for edge capture.
//!
//! Every edge is stamped with [`Clock::now`] before anything else happens on the capture path.
//! Data read after the stamp (the line level) may lag the physical edge by scheduling delay; the
//! stamp must not.

use core::fmt;
use core::time::Duration;

/// A point on a monotonic timeline, in nanoseconds since the clock's origin.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instant {
    nanos: u64,
}

impl Instant {
    #[inline]
    pub const fn from_nanos(nanos: u64) -> Self {
        Self { nanos }
    }

    #[inline]
    pub const fn as_nanos(self) -> u64 {
        self.nanos
    }

    /// Time elapsed from `earlier` to `self`, or `None` if `earlier` is later.
    #[inline]
    pub const fn checked_duration_since(self, earlier: Instant) -> Option<Duration> {
        match self.nanos.checked_sub(earlier.nanos) {
            Some(d) => Some(Duration::from_nanos(d)),
            None => None,
        }
    }

    /// Time elapsed from `earlier` to `self`, saturating at zero.
    #[inline]
    pub const fn duration_since(self, earlier: Instant) -> Duration {
        Duration::from_nanos(self.nanos.saturating_sub(earlier.nanos))
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:09}",
            self.nanos / 1_000_000_000,
            self.nanos % 1_000_000_000
        )
    }
}

/// Monotonic time source used to stamp edges.
///
/// `now` is called from the capture path and must not block or fail. A clock that cannot be
/// read at all should report `ready() == false`, which fails session start instead.
pub trait Clock {
    /// Current time.
    fn now(&self) -> Instant;

    /// The clock's resolution.
    fn resolution(&self) -> Duration;

    /// Whether the clock can be read.
    fn ready(&self) -> bool {
        true
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    #[inline]
    fn now(&self) -> Instant {
        (**self).now()
    }

    #[inline]
    fn resolution(&self) -> Duration {
        (**self).resolution()
    }

    #[inline]
    fn ready(&self) -> bool {
        (**self).ready()
    }
}

/// [`Clock`] backed by `std::time::Instant`, counting from its construction.
#[cfg(feature = "std")]
#[derive(Copy, Clone, Debug)]
pub struct StdClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl StdClock {
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Clock for StdClock {
    #[inline]
    fn now(&self) -> Instant {
        // u64 nanoseconds cover ~584 years of uptime.
        Instant::from_nanos(self.origin.elapsed().as_nanos() as u64)
    }

    fn resolution(&self) -> Duration {
        Duration::from_nanos(1)
    }
}

#[cfg(test)]
mod tests {
    use super::Instant;
    use core::time::Duration;
    use std::string::ToString;

    #[test]
    fn duration_since_saturates() {
        let a = Instant::from_nanos(1_500);
        let b = Instant::from_nanos(2_000);

        assert_eq!(b.duration_since(a), Duration::from_nanos(500));
        assert_eq!(a.duration_since(b), Duration::ZERO);
        assert_eq!(a.checked_duration_since(b), None);
    }

    #[test]
    fn displays_seconds_and_nanos() {
        let t = Instant::from_nanos(3_000_000_042);
        assert_eq!(t.to_string(), "3.000000042");
    }

    #[cfg(feature = "std")]
    #[test]
    fn std_clock_is_monotonic() {
        use super::{Clock, StdClock};

        let clock = StdClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
        assert!(clock.ready());
    }
}
