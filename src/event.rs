use crate::classify::{EventKind, classify};
use crate::config::LinePolarityConfig;
use crate::line::{LevelReader, LogicLevel};
use crate::time::{Clock, Instant};

/// One captured edge. Built, classified and dispatched or dropped within a single notification.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CaptureEvent {
    pub timestamp: Instant,
    pub observed_level: LogicLevel,
    pub kind: EventKind,
}

impl CaptureEvent {
    /// Stamp, sample and classify an edge. The clock is read before the line.
    #[inline]
    pub fn capture<C, R>(clock: &C, reader: &R, polarity: &LinePolarityConfig) -> Self
    where
        C: Clock + ?Sized,
        R: LevelReader + ?Sized,
    {
        let timestamp = clock.now();
        Self::from_stamp(timestamp, reader, polarity)
    }

    /// Finish an event whose timestamp was already taken.
    #[inline]
    pub fn from_stamp<R>(timestamp: Instant, reader: &R, polarity: &LinePolarityConfig) -> Self
    where
        R: LevelReader + ?Sized,
    {
        let observed_level = reader.level();
        Self {
            timestamp,
            observed_level,
            kind: classify(observed_level, polarity),
        }
    }
}
