//! Pulse-per-second edge capture for no-std embedded targets.
//!
//! # Highlights
//! - Stamps every edge of a PPS line before doing anything else.
//! - Classifies edges as assert or clear from the line level and a fixed polarity policy.
//! - Lock-free capture path: no allocation, no locks, no blocking on the consumer.
//! - A lock-free overwrite ring ([`EventRing`]) as a ready-made consumer sink.
//!
//! # Quick start
//! ```
//! use core::time::Duration;
//! use ph_pps::{
//!     CaptureSession, Clock, EventKind, EventRing, Instant, LevelReader, LineId, LineProvider,
//!     LogicLevel, SessionConfig, TriggerEdges,
//! };
//!
//! struct Pin;
//! impl LevelReader for Pin {
//!     fn level(&self) -> LogicLevel { LogicLevel::High }
//! }
//!
//! struct Host;
//! impl LineProvider for Host {
//!     type Claim = ();
//!     type Reader = Pin;
//!     type Registration = ();
//!     type Error = ();
//!     fn claim(&mut self, _: LineId, _: &str) -> Result<(), ()> { Ok(()) }
//!     fn configure_input(&mut self, _: &()) -> Result<Pin, ()> { Ok(Pin) }
//!     fn request_edges(&mut self, _: &(), _: TriggerEdges, _: &str) -> Result<(), ()> { Ok(()) }
//!     fn cancel_edges(&mut self, _: ()) {}
//!     fn release(&mut self, _: ()) {}
//! }
//!
//! struct Uptime;
//! impl Clock for Uptime {
//!     fn now(&self) -> Instant { Instant::from_nanos(1_000) }
//!     fn resolution(&self) -> Duration { Duration::from_nanos(1) }
//! }
//!
//! let ring = EventRing::<8>::new();
//! let consumer = ring.consumer();
//! let config = SessionConfig::new(LineId(18)).capture_clear_edge(true);
//! let session = CaptureSession::start(config, Host, Uptime, ring.producer()).unwrap();
//!
//! // Called by the host's edge notification.
//! session.on_edge();
//!
//! let assert = consumer.fetch().assert.unwrap();
//! assert_eq!(assert.kind, EventKind::Assert);
//! assert_eq!(assert.sequence, 1);
//! ```
//!
//! # No-std
//! The crate is `#![no_std]`. Tests require `std`; the `std` feature adds `StdClock`.
//!
//! # Semantics
//! - The assert edge is always reported; the clear edge only with clear capture enabled.
//!   Otherwise the edge is `Ignored`, which is not an error.
//! - A consumer refusing an event loses that event only. It is logged, counted, never retried.
//! - A failed start holds no host resources. `stop` is idempotent.
#![no_std]

#[cfg(any(test, feature = "std"))]
extern crate std;

mod atomic;

pub mod classify;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod event_ring;
pub mod line;
pub mod session;
pub mod time;

pub use classify::{EventKind, classify};
pub use config::{DEFAULT_LABEL, LinePolarityConfig, MAX_LABEL_LEN, SessionConfig};
pub use dispatch::{DispatchOutcome, EventSink, dispatch};
pub use error::{ConfigError, ConsumerUnavailable, Resource, ResourceUnavailable, StartError};
pub use event::CaptureEvent;
pub use event_ring::{EventRing, PollStats, PpsFetch, PpsRecord, RingConsumer, RingProducer};
pub use line::{Edge, LevelReader, LineId, LineProvider, LogicLevel, TriggerEdges};
pub use session::{CaptureSession, SessionState, SessionStats};
#[cfg(feature = "std")]
pub use time::StdClock;
pub use time::{Clock, Instant};
