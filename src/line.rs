//! Host interface to the monitored input line.
//!
//! The host owns the hardware. A capture session only asks it to claim a line, configure it as an
//! input, deliver edge notifications, and read the current level. Acquisition is split into the
//! same steps a GPIO driver goes through so that a failure at any step can unwind the earlier
//! ones.

use core::fmt;

/// Identifier of a digital input line (a GPIO number on most hosts).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct LineId(pub u32);

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LogicLevel {
    Low,
    High,
}

impl From<bool> for LogicLevel {
    #[inline]
    fn from(high: bool) -> Self {
        if high { LogicLevel::High } else { LogicLevel::Low }
    }
}

/// A physical transition of the line.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Edge {
    Rising,
    Falling,
}

impl Edge {
    #[inline]
    pub const fn opposite(self) -> Edge {
        match self {
            Edge::Rising => Edge::Falling,
            Edge::Falling => Edge::Rising,
        }
    }
}

/// Set of edges a notification registration fires on.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TriggerEdges {
    pub rising: bool,
    pub falling: bool,
}

impl TriggerEdges {
    pub const NONE: TriggerEdges = TriggerEdges {
        rising: false,
        falling: false,
    };

    #[inline]
    pub const fn only(edge: Edge) -> Self {
        Self::NONE.with(edge)
    }

    #[inline]
    pub const fn with(self, edge: Edge) -> Self {
        match edge {
            Edge::Rising => TriggerEdges {
                rising: true,
                ..self
            },
            Edge::Falling => TriggerEdges {
                falling: true,
                ..self
            },
        }
    }

    #[inline]
    pub const fn contains(self, edge: Edge) -> bool {
        match edge {
            Edge::Rising => self.rising,
            Edge::Falling => self.falling,
        }
    }

    #[inline]
    pub const fn is_both(self) -> bool {
        self.rising && self.falling
    }
}

/// Reads the current level of a configured input line.
///
/// Called on the capture path right after the timestamp, so it must not block.
pub trait LevelReader {
    fn level(&self) -> LogicLevel;
}

impl<R: LevelReader + ?Sized> LevelReader for &R {
    #[inline]
    fn level(&self) -> LogicLevel {
        (**self).level()
    }
}

/// Host-side acquisition and release of a line and its edge notifications.
///
/// A session calls `claim`, `configure_input` and `request_edges` in that order at start, and
/// `cancel_edges` then `release` when it stops. If a step fails, every step that succeeded is
/// undone in reverse order before the error is returned.
///
/// The host invokes [`CaptureSession::on_edge`](crate::CaptureSession::on_edge) for every edge
/// matching the requested [`TriggerEdges`]. It is not told which edge fired.
pub trait LineProvider {
    /// Proof of exclusive ownership of a line.
    type Claim;
    /// Level reader handed to the capture path.
    type Reader: LevelReader;
    /// An active edge-notification registration.
    type Registration;
    /// Host error, reported in logs and mapped to a resource failure.
    type Error: fmt::Debug;

    fn claim(&mut self, line: LineId, label: &str) -> Result<Self::Claim, Self::Error>;

    fn configure_input(&mut self, claim: &Self::Claim) -> Result<Self::Reader, Self::Error>;

    fn request_edges(
        &mut self,
        claim: &Self::Claim,
        edges: TriggerEdges,
        label: &str,
    ) -> Result<Self::Registration, Self::Error>;

    fn cancel_edges(&mut self, registration: Self::Registration);

    fn release(&mut self, claim: Self::Claim);
}
