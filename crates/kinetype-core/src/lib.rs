#![forbid(unsafe_code)]

//! Core: the host capability model shared by every kinetype crate.
//!
//! The engine never talks to a browser directly. Everything it needs from the
//! embedding environment is expressed here as small traits and plain types:
//!
//! - [`dom::Document`]: element lookup, markup, inline styles, attributes.
//! - [`dom::ViewportObserver`]: arm/disarm intersection reporting.
//! - [`event::HostEvent`]: what the host pushes back (pointer, intersection, frame).
//! - [`clock::DeterministicClock`]: host-advanced monotonic time.

pub mod clock;
pub mod dom;
pub mod event;
pub mod geometry;
pub mod logging;
pub mod style;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, trace, warn};

pub use dom::{Document, ElementId, ViewportObserver};
pub use event::{HostEvent, IntersectionEntry};
pub use geometry::BoxSize;
pub use style::{StyleProp, StyleSnapshot};
