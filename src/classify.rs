//! Edge classification.
//!
//! The host only says that *an* edge happened. When both edges are enabled, which one it was is
//! re-derived here from the level sampled after the timestamp: the line sits at the level the
//! edge moved it to.

use crate::config::LinePolarityConfig;
use crate::line::LogicLevel;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// The configured on-time edge.
    Assert,
    /// The complementary edge, reported only with clear capture enabled.
    Clear,
    /// The complementary edge with clear capture disabled. Never forwarded.
    Ignored,
}

impl EventKind {
    #[inline]
    pub const fn is_reported(self) -> bool {
        !matches!(self, EventKind::Ignored)
    }
}

/// Classify an edge from the level observed after it.
#[inline]
pub const fn classify(level: LogicLevel, polarity: &LinePolarityConfig) -> EventKind {
    let assert_level = if polarity.assert_on_falling {
        LogicLevel::Low
    } else {
        LogicLevel::High
    };

    if level as u8 == assert_level as u8 {
        EventKind::Assert
    } else if polarity.capture_clear_edge {
        EventKind::Clear
    } else {
        EventKind::Ignored
    }
}

#[cfg(test)]
mod tests {
    use super::{EventKind, classify};
    use crate::config::LinePolarityConfig;
    use crate::line::LogicLevel::{self, High, Low};

    #[test]
    fn full_polarity_table() {
        use EventKind::{Assert, Clear, Ignored};

        // (assert_on_falling, capture_clear_edge, level) -> kind
        let table: [(bool, bool, LogicLevel, EventKind); 8] = [
            (false, false, High, Assert),
            (false, false, Low, Ignored),
            (false, true, High, Assert),
            (false, true, Low, Clear),
            (true, false, Low, Assert),
            (true, false, High, Ignored),
            (true, true, Low, Assert),
            (true, true, High, Clear),
        ];

        for (falling, clear, level, want) in table {
            let p = LinePolarityConfig::new(falling, clear);
            assert_eq!(
                classify(level, &p),
                want,
                "assert_on_falling={falling} capture_clear_edge={clear} level={level:?}"
            );
        }
    }

    #[test]
    fn assert_level_always_asserts() {
        for clear in [false, true] {
            let rising = LinePolarityConfig::new(false, clear);
            let falling = LinePolarityConfig::new(true, clear);
            assert_eq!(classify(High, &rising), EventKind::Assert);
            assert_eq!(classify(Low, &falling), EventKind::Assert);
        }
    }

    #[test]
    fn only_ignored_is_unreported() {
        assert!(EventKind::Assert.is_reported());
        assert!(EventKind::Clear.is_reported());
        assert!(!EventKind::Ignored.is_reported());
    }
}
