//! Capture session for one monitored line.
//!
//! # Lifecycle
//! A session is Active from a successful [`CaptureSession::start`] until [`stop`], an
//! unrecoverable loss of the notification channel, or drop. Then it is Inactive for good and
//! holds no host resources. There is no suspended state.
//!
//! # Capture path
//! The host calls [`on_edge`] once per edge, in arrival order. The call stamps the edge first,
//! then checks the state, samples the line, classifies and publishes. It never locks: the
//! polarity is immutable, counters are atomics, and the sink is required not to block. Host
//! resources sit behind a spin lock that only the deactivating call ever takes.
//!
//! [`stop`]: CaptureSession::stop
//! [`on_edge`]: CaptureSession::on_edge

use log::{debug, error, info, warn};

use crate::atomic::{AtomicU8, AtomicU32, Ordering};
use crate::classify::EventKind;
use crate::config::{LinePolarityConfig, SessionConfig};
use crate::dispatch::{DispatchOutcome, EventSink, dispatch};
use crate::error::{ConfigError, Resource, ResourceUnavailable, StartError};
use crate::event::CaptureEvent;
use crate::line::{LineId, LineProvider};
use crate::time::Clock;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum SessionState {
    Inactive = 0,
    Active = 1,
}

/// Per-session event counters.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub asserts: u32,
    pub clears: u32,
    pub ignored: u32,
    /// Events the consumer refused.
    pub dropped: u32,
}

#[derive(Default)]
struct Counters {
    asserts: AtomicU32,
    clears: AtomicU32,
    ignored: AtomicU32,
    dropped: AtomicU32,
}

impl Counters {
    #[inline]
    fn note(&self, outcome: &DispatchOutcome) {
        let counter = match outcome {
            DispatchOutcome::Forwarded(ev) => match ev.kind {
                EventKind::Assert => &self.asserts,
                _ => &self.clears,
            },
            DispatchOutcome::Ignored(_) => &self.ignored,
            DispatchOutcome::Dropped(_) => &self.dropped,
            DispatchOutcome::Inactive => return,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> SessionStats {
        SessionStats {
            asserts: self.asserts.load(Ordering::Relaxed),
            clears: self.clears.load(Ordering::Relaxed),
            ignored: self.ignored.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
        }
    }
}

/// Host resources held while Active.
struct Held<P: LineProvider> {
    provider: P,
    claim: P::Claim,
    registration: P::Registration,
}

impl<P: LineProvider> Held<P> {
    fn release(self) {
        let Held {
            mut provider,
            claim,
            registration,
        } = self;
        provider.cancel_edges(registration);
        provider.release(claim);
    }
}

pub struct CaptureSession<P, C, S>
where
    P: LineProvider,
    C: Clock,
    S: EventSink,
{
    line: LineId,
    polarity: LinePolarityConfig,
    clock: C,
    sink: S,
    reader: P::Reader,
    state: AtomicU8,
    counters: Counters,
    held: spin::Mutex<Option<Held<P>>>,
}

impl<P, C, S> CaptureSession<P, C, S>
where
    P: LineProvider,
    C: Clock,
    S: EventSink,
{
    /// Validate `config`, acquire the line from `provider` and register for its edges.
    ///
    /// The primary edge is always requested; the complementary edge only with clear capture.
    /// On error nothing stays acquired: every completed step is undone before returning.
    pub fn start(
        config: SessionConfig<'_>,
        mut provider: P,
        clock: C,
        sink: S,
    ) -> Result<Self, StartError> {
        let line = config.line;
        let polarity = config.validate().inspect_err(|e| {
            warn!("line {line}: invalid configuration: {e}");
        })?;
        if !clock.ready() {
            warn!("line {line}: clock source is unavailable");
            return Err(ConfigError::ClockUnavailable.into());
        }

        let claim = provider
            .claim(line, config.label)
            .map_err(|e| unavailable(line, Resource::Line, e))?;
        debug!("line {line}: claimed as {:?}", config.label);

        let reader = match provider.configure_input(&claim) {
            Ok(reader) => reader,
            Err(e) => {
                provider.release(claim);
                return Err(unavailable(line, Resource::InputDirection, e).into());
            }
        };

        let edges = polarity.trigger_edges();
        let registration = match provider.request_edges(&claim, edges, config.label) {
            Ok(registration) => registration,
            Err(e) => {
                provider.release(claim);
                return Err(unavailable(line, Resource::EdgeNotification, e).into());
            }
        };

        info!(
            "registered line {line} ({}) as PPS source, assert on {:?}, clear capture {}",
            config.label,
            polarity.assert_edge(),
            if polarity.capture_clear_edge { "on" } else { "off" },
        );

        Ok(Self {
            line,
            polarity,
            clock,
            sink,
            reader,
            state: AtomicU8::new(SessionState::Active as u8),
            counters: Counters::default(),
            held: spin::Mutex::new(Some(Held {
                provider,
                claim,
                registration,
            })),
        })
    }

    /// Handle one edge notification.
    ///
    /// Always returns; a refused event is counted and logged, and the session keeps running.
    #[inline]
    pub fn on_edge(&self) -> DispatchOutcome {
        let timestamp = self.clock.now();

        if !self.is_active() {
            return DispatchOutcome::Inactive;
        }

        let event = CaptureEvent::from_stamp(timestamp, &self.reader, &self.polarity);
        let outcome = dispatch(&self.sink, event, &self.polarity);
        self.counters.note(&outcome);

        if let DispatchOutcome::Dropped(ev) = outcome {
            warn!(
                "line {}: consumer unavailable, {:?} at {} dropped",
                self.line, ev.kind, ev.timestamp
            );
        }
        outcome
    }

    /// Stop capturing and release the line. Safe to call any number of times.
    pub fn stop(&self) {
        if self.deactivate() {
            info!("removed line {} as PPS source", self.line);
        }
    }

    /// The host lost the notification channel. Deactivates and releases like `stop`.
    pub fn notification_lost(&self) {
        if self.deactivate() {
            error!(
                "line {}: edge notification channel lost, session stopped",
                self.line
            );
        }
    }

    fn deactivate(&self) -> bool {
        let prev = self
            .state
            .swap(SessionState::Inactive as u8, Ordering::AcqRel);
        if prev != SessionState::Active as u8 {
            return false;
        }
        if let Some(held) = self.held.lock().take() {
            held.release();
        }
        true
    }

    #[inline]
    pub fn state(&self) -> SessionState {
        if self.is_active() {
            SessionState::Active
        } else {
            SessionState::Inactive
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.state.load(Ordering::Acquire) == SessionState::Active as u8
    }

    pub fn line(&self) -> LineId {
        self.line
    }

    pub fn polarity(&self) -> &LinePolarityConfig {
        &self.polarity
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn stats(&self) -> SessionStats {
        self.counters.snapshot()
    }
}

impl<P, C, S> Drop for CaptureSession<P, C, S>
where
    P: LineProvider,
    C: Clock,
    S: EventSink,
{
    fn drop(&mut self) {
        self.stop();
    }
}

fn unavailable<E: core::fmt::Debug>(
    line: LineId,
    resource: Resource,
    err: E,
) -> ResourceUnavailable {
    warn!("line {line}: failed to acquire {resource}: {err:?}");
    ResourceUnavailable { line, resource }
}
