//! Polarity policy and per-session configuration.
//!
//! Both are fixed when a session starts and read without locking for the session's lifetime.

use crate::error::ConfigError;
use crate::line::{Edge, LineId, TriggerEdges};

/// Label used when claiming a line if none is given.
pub const DEFAULT_LABEL: &str = "pps-gpio";

/// Longest accepted label, matching the PPS source-name limit.
pub const MAX_LABEL_LEN: usize = 32;

/// Which transition is the on-time edge, and whether the other one is reported too.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct LinePolarityConfig {
    /// The falling transition is the assert edge; otherwise the rising one is.
    pub assert_on_falling: bool,
    /// Also report the complementary (clear) edge.
    pub capture_clear_edge: bool,
}

impl LinePolarityConfig {
    #[inline]
    pub const fn new(assert_on_falling: bool, capture_clear_edge: bool) -> Self {
        Self {
            assert_on_falling,
            capture_clear_edge,
        }
    }

    #[inline]
    pub const fn assert_edge(&self) -> Edge {
        if self.assert_on_falling {
            Edge::Falling
        } else {
            Edge::Rising
        }
    }

    #[inline]
    pub const fn clear_edge(&self) -> Option<Edge> {
        if self.capture_clear_edge {
            Some(self.assert_edge().opposite())
        } else {
            None
        }
    }

    /// Edges the host must notify on: the assert edge always, the clear edge only when captured.
    pub const fn trigger_edges(&self) -> TriggerEdges {
        let edges = TriggerEdges::only(self.assert_edge());
        match self.clear_edge() {
            Some(clear) => edges.with(clear),
            None => edges,
        }
    }
}

/// Everything needed to start a capture session on one line.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig<'a> {
    pub line: LineId,
    pub label: &'a str,
    pub polarity: Option<LinePolarityConfig>,
}

impl<'a> SessionConfig<'a> {
    /// Configuration for `line` with the default label and no polarity set yet.
    pub const fn new(line: LineId) -> Self {
        Self {
            line,
            label: DEFAULT_LABEL,
            polarity: None,
        }
    }

    pub const fn label(mut self, label: &'a str) -> Self {
        self.label = label;
        self
    }

    pub const fn polarity(mut self, polarity: LinePolarityConfig) -> Self {
        self.polarity = Some(polarity);
        self
    }

    pub const fn assert_on_falling(mut self, yes: bool) -> Self {
        let mut p = self.polarity_or_default();
        p.assert_on_falling = yes;
        self.polarity = Some(p);
        self
    }

    pub const fn capture_clear_edge(mut self, yes: bool) -> Self {
        let mut p = self.polarity_or_default();
        p.capture_clear_edge = yes;
        self.polarity = Some(p);
        self
    }

    const fn polarity_or_default(&self) -> LinePolarityConfig {
        match self.polarity {
            Some(p) => p,
            None => LinePolarityConfig::new(false, false),
        }
    }

    /// Check the configuration and return the polarity it carries.
    pub fn validate(&self) -> Result<LinePolarityConfig, ConfigError> {
        if self.label.is_empty() {
            return Err(ConfigError::EmptyLabel);
        }
        if self.label.len() > MAX_LABEL_LEN {
            return Err(ConfigError::LabelTooLong {
                len: self.label.len(),
                max: MAX_LABEL_LEN,
            });
        }
        self.polarity.ok_or(ConfigError::MissingPolarity)
    }
}

#[cfg(test)]
mod tests {
    use super::{LinePolarityConfig, MAX_LABEL_LEN, SessionConfig};
    use crate::error::ConfigError;
    use crate::line::{Edge, LineId, TriggerEdges};

    #[test]
    fn rising_assert_without_clear_triggers_rising_only() {
        let p = LinePolarityConfig::new(false, false);
        assert_eq!(p.trigger_edges(), TriggerEdges::only(Edge::Rising));
        assert_eq!(p.clear_edge(), None);
    }

    #[test]
    fn falling_assert_with_clear_triggers_both() {
        let p = LinePolarityConfig::new(true, true);
        assert_eq!(p.assert_edge(), Edge::Falling);
        assert_eq!(p.clear_edge(), Some(Edge::Rising));
        assert!(p.trigger_edges().is_both());
    }

    #[test]
    fn missing_polarity_is_rejected() {
        let cfg = SessionConfig::new(LineId(4));
        assert_eq!(cfg.validate(), Err(ConfigError::MissingPolarity));
    }

    #[test]
    fn label_limits() {
        let cfg = SessionConfig::new(LineId(4))
            .capture_clear_edge(true)
            .label("");
        assert_eq!(cfg.validate(), Err(ConfigError::EmptyLabel));

        let long = "x".repeat(MAX_LABEL_LEN + 1);
        let cfg = cfg.label(&long);
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::LabelTooLong {
                len: MAX_LABEL_LEN + 1,
                max: MAX_LABEL_LEN
            })
        );
    }

    #[test]
    fn builder_sets_fields_independently() {
        let cfg = SessionConfig::new(LineId(17))
            .assert_on_falling(true)
            .capture_clear_edge(true)
            .label("gps0");

        assert_eq!(cfg.validate(), Ok(LinePolarityConfig::new(true, true)));
        assert_eq!(cfg.label, "gps0");
    }
}
