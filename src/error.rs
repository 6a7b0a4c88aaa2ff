use core::fmt;

use thiserror::Error;

use crate::line::LineId;

/// Invalid or missing session configuration. Fatal to that start attempt only.
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("polarity configuration is missing")]
    MissingPolarity,
    #[error("line label is empty")]
    EmptyLabel,
    #[error("line label is {len} bytes, limit is {max}")]
    LabelTooLong { len: usize, max: usize },
    #[error("clock source is unavailable")]
    ClockUnavailable,
}

/// Which acquisition step failed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Resource {
    Line,
    InputDirection,
    EdgeNotification,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Resource::Line => "line",
            Resource::InputDirection => "input direction",
            Resource::EdgeNotification => "edge notification",
        })
    }
}

/// The host could not provide a line or its notification channel.
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
#[error("{resource} unavailable for line {line}")]
pub struct ResourceUnavailable {
    pub line: LineId,
    pub resource: Resource,
}

/// The consumer sink could not take an event. Isolated to that event.
#[derive(Copy, Clone, Debug, Default, Error, PartialEq, Eq)]
#[error("consumer unavailable")]
pub struct ConsumerUnavailable;

/// Failure to start a capture session. No resources are held when this is returned.
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
pub enum StartError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Resource(#[from] ResourceUnavailable),
}
