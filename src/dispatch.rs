//! Forwarding classified events to the consumer.
//!
//! The consumer sits behind [`EventSink`]. Publishing must not block the capture path: a sink
//! either overwrites its own storage or refuses the event. A refused event is lost; a missed
//! pulse cannot be reconstructed, so nothing is retried.

use crate::classify::EventKind;
use crate::config::LinePolarityConfig;
use crate::error::ConsumerUnavailable;
use crate::event::CaptureEvent;
use crate::time::Instant;

/// Receiver of timing events. Only `Assert` and `Clear` are ever published.
pub trait EventSink {
    fn publish(&self, timestamp: Instant, kind: EventKind) -> Result<(), ConsumerUnavailable>;
}

impl<S: EventSink + ?Sized> EventSink for &S {
    #[inline]
    fn publish(&self, timestamp: Instant, kind: EventKind) -> Result<(), ConsumerUnavailable> {
        (**self).publish(timestamp, kind)
    }
}

/// What happened to one edge.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The sink accepted the event.
    Forwarded(CaptureEvent),
    /// Nothing to report for this edge.
    Ignored(CaptureEvent),
    /// The sink refused the event.
    Dropped(CaptureEvent),
    /// The session was not active; the edge was stamped and discarded.
    Inactive,
}

impl DispatchOutcome {
    pub fn event(&self) -> Option<&CaptureEvent> {
        match self {
            DispatchOutcome::Forwarded(ev)
            | DispatchOutcome::Ignored(ev)
            | DispatchOutcome::Dropped(ev) => Some(ev),
            DispatchOutcome::Inactive => None,
        }
    }
}

/// Forward `event` to `sink` according to `polarity`.
#[inline]
pub fn dispatch<S>(sink: &S, event: CaptureEvent, polarity: &LinePolarityConfig) -> DispatchOutcome
where
    S: EventSink + ?Sized,
{
    let report = match event.kind {
        EventKind::Assert => true,
        EventKind::Clear => polarity.capture_clear_edge,
        EventKind::Ignored => false,
    };
    if !report {
        return DispatchOutcome::Ignored(event);
    }

    match sink.publish(event.timestamp, event.kind) {
        Ok(()) => DispatchOutcome::Forwarded(event),
        Err(ConsumerUnavailable) => DispatchOutcome::Dropped(event),
    }
}

#[cfg(test)]
mod tests {
    use super::{DispatchOutcome, EventSink, dispatch};
    use crate::classify::EventKind;
    use crate::config::LinePolarityConfig;
    use crate::error::ConsumerUnavailable;
    use crate::event::CaptureEvent;
    use crate::line::LogicLevel;
    use crate::time::Instant;
    use core::cell::{Cell, RefCell};
    use std::vec::Vec;

    #[derive(Default)]
    struct Recorder {
        seen: RefCell<Vec<(Instant, EventKind)>>,
        refuse: Cell<bool>,
    }

    impl EventSink for Recorder {
        fn publish(&self, timestamp: Instant, kind: EventKind) -> Result<(), ConsumerUnavailable> {
            if self.refuse.get() {
                return Err(ConsumerUnavailable);
            }
            self.seen.borrow_mut().push((timestamp, kind));
            Ok(())
        }
    }

    fn event(kind: EventKind) -> CaptureEvent {
        CaptureEvent {
            timestamp: Instant::from_nanos(10),
            observed_level: LogicLevel::High,
            kind,
        }
    }

    #[test]
    fn assert_is_forwarded() {
        let sink = Recorder::default();
        let ev = event(EventKind::Assert);
        let out = dispatch(&sink, ev, &LinePolarityConfig::new(false, false));

        assert_eq!(out, DispatchOutcome::Forwarded(ev));
        assert_eq!(
            &sink.seen.borrow()[..],
            &[(Instant::from_nanos(10), EventKind::Assert)]
        );
    }

    #[test]
    fn clear_needs_clear_capture() {
        let sink = Recorder::default();
        let ev = event(EventKind::Clear);

        let out = dispatch(&sink, ev, &LinePolarityConfig::new(false, false));
        assert_eq!(out, DispatchOutcome::Ignored(ev));
        assert!(sink.seen.borrow().is_empty());

        let out = dispatch(&sink, ev, &LinePolarityConfig::new(false, true));
        assert_eq!(out, DispatchOutcome::Forwarded(ev));
        assert_eq!(sink.seen.borrow().len(), 1);
    }

    #[test]
    fn ignored_never_reaches_sink() {
        let sink = Recorder::default();
        let ev = event(EventKind::Ignored);
        let out = dispatch(&sink, ev, &LinePolarityConfig::new(true, true));

        assert_eq!(out, DispatchOutcome::Ignored(ev));
        assert!(sink.seen.borrow().is_empty());
    }

    #[test]
    fn refused_event_is_dropped() {
        let sink = Recorder::default();
        sink.refuse.set(true);
        let ev = event(EventKind::Assert);

        let out = dispatch(&sink, ev, &LinePolarityConfig::default());
        assert_eq!(out, DispatchOutcome::Dropped(ev));
        assert_eq!(out.event(), Some(&ev));
    }
}
