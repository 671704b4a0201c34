#![forbid(unsafe_code)]

//! Events pushed by the host into the engine.

use core::time::Duration;

use crate::dom::ElementId;

/// Canonical host event.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// Pointer entered the element a hover listener is bound to.
    PointerEnter(ElementId),

    /// Pointer left the element a hover listener is bound to.
    PointerLeave(ElementId),

    /// Viewport intersection report for an observed element.
    Intersection(IntersectionEntry),

    /// Render-loop frame callback with its monotonic timestamp.
    Frame(Duration),
}

/// One intersection report, mirroring `IntersectionObserverEntry`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    /// The observed element.
    pub target: ElementId,
    /// Visible fraction of the element, 0.0–1.0.
    pub ratio: f64,
    /// Host's own intersecting flag.
    pub is_intersecting: bool,
}

impl IntersectionEntry {
    /// Build an entry from a ratio alone; intersecting iff the ratio is positive.
    #[must_use]
    pub fn from_ratio(target: ElementId, ratio: f64) -> Self {
        Self {
            target,
            ratio,
            is_intersecting: ratio > 0.0,
        }
    }

    /// Whether this report counts as entering at `threshold`.
    #[must_use]
    pub fn entered(&self, threshold: f64) -> bool {
        self.is_intersecting && self.ratio >= threshold
    }
}

/// Convert a `requestAnimationFrame` timestamp (milliseconds) to a [`Duration`].
///
/// Negative and non-finite inputs clamp to zero.
#[must_use]
pub fn frame_timestamp(ms: f64) -> Duration {
    if ms.is_finite() && ms > 0.0 {
        millis(ms)
    } else {
        Duration::ZERO
    }
}

/// Convert host milliseconds to a `Duration`, saturating at both ends.
#[must_use]
pub fn millis(ms: f64) -> Duration {
    if ms.is_nan() || ms <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(ms / 1000.0).unwrap_or(Duration::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entered_requires_threshold_and_flag() {
        let el = ElementId(3);
        assert!(IntersectionEntry::from_ratio(el, 0.15).entered(0.15));
        assert!(!IntersectionEntry::from_ratio(el, 0.1).entered(0.15));
        let exiting = IntersectionEntry {
            target: el,
            ratio: 0.5,
            is_intersecting: false,
        };
        assert!(!exiting.entered(0.15));
    }

    #[test]
    fn frame_timestamp_clamps() {
        assert_eq!(frame_timestamp(-4.0), Duration::ZERO);
        assert_eq!(frame_timestamp(f64::NAN), Duration::ZERO);
        assert_eq!(frame_timestamp(16.0), Duration::from_millis(16));
        assert_eq!(frame_timestamp(1e25), Duration::MAX);
        assert_eq!(frame_timestamp(f64::INFINITY), Duration::ZERO);
    }

    #[test]
    fn millis_saturates() {
        assert_eq!(millis(250.0), Duration::from_millis(250));
        assert_eq!(millis(-1.0), Duration::ZERO);
        assert_eq!(millis(1e25), Duration::MAX);
        assert_eq!(millis(f64::INFINITY), Duration::MAX);
    }
}
