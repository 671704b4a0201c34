#![forbid(unsafe_code)]

//! Document and viewport capabilities supplied by the host.
//!
//! # Design Notes
//!
//! - Lookups return [`Option`]; "element not present" is a modeled outcome that
//!   every call site handles explicitly.
//! - Inline style values use the DOM convention: the empty string means the
//!   property is unset, and setting it to `""` removes it.
//! - Element handles are opaque and issued by the host. A handle may outlive
//!   the element it names; [`Document::is_connected`] reports whether it is
//!   still attached to the render tree.

use crate::geometry::BoxSize;
use crate::style::StyleProp;

/// Opaque handle to an element in the host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Read/write access to the host document.
///
/// Implemented by the web adapter over `web-sys` and by the in-memory
/// harness document used in tests.
pub trait Document {
    /// All elements matching a CSS selector list, in document order.
    fn query_all(&self, selector: &str) -> Vec<ElementId>;

    /// First element matching `selector`, if any.
    fn query(&self, selector: &str) -> Option<ElementId> {
        self.query_all(selector).into_iter().next()
    }

    /// Nearest inclusive ancestor of `element` matching `selector`.
    fn closest(&self, element: ElementId, selector: &str) -> Option<ElementId>;

    /// Whether `element` is still attached to the render tree.
    fn is_connected(&self, element: ElementId) -> bool;

    /// Serialized inner markup, or `None` for an unknown handle.
    fn inner_markup(&self, element: ElementId) -> Option<String>;

    /// Replace the element's content with `markup`.
    fn set_inner_markup(&mut self, element: ElementId, markup: &str);

    /// Current rendered border-box size, or `None` if the host cannot measure.
    fn bounding_size(&self, element: ElementId) -> Option<BoxSize>;

    /// Inline style value (`""` when unset).
    fn style(&self, element: ElementId, prop: StyleProp) -> String;

    /// Set an inline style value (`""` removes it).
    fn set_style(&mut self, element: ElementId, prop: StyleProp, value: &str);

    /// Attribute value, `None` when absent.
    fn attribute(&self, element: ElementId, name: &str) -> Option<String>;

    /// Set an attribute value.
    fn set_attribute(&mut self, element: ElementId, name: &str, value: &str);

    /// Whether the attribute is present (possibly with an empty value).
    fn has_attribute(&self, element: ElementId, name: &str) -> bool {
        self.attribute(element, name).is_some()
    }
}

/// Viewport-intersection notifier supplied by the host.
///
/// After [`observe`](ViewportObserver::observe), the host reports crossings of
/// `threshold` back as [`HostEvent::Intersection`](crate::event::HostEvent).
pub trait ViewportObserver {
    /// Start reporting intersections for `element` at `threshold` (0.0–1.0).
    fn observe(&mut self, element: ElementId, threshold: f64);

    /// Stop reporting intersections for `element`.
    fn unobserve(&mut self, element: ElementId);
}
