#![forbid(unsafe_code)]

//! Inline style properties touched by the effects and the box-lock snapshot.

use crate::dom::{Document, ElementId};
use crate::geometry::BoxSize;

/// Inline style properties the engine reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleProp {
    Width,
    Height,
    MinWidth,
    MinHeight,
    Overflow,
    Opacity,
}

impl StyleProp {
    /// The four sizing properties plus overflow, in restore order.
    pub const BOX: [StyleProp; 5] = [
        StyleProp::Width,
        StyleProp::Height,
        StyleProp::MinWidth,
        StyleProp::MinHeight,
        StyleProp::Overflow,
    ];

    /// CSS property name (kebab-case).
    #[must_use]
    pub const fn css_name(self) -> &'static str {
        match self {
            Self::Width => "width",
            Self::Height => "height",
            Self::MinWidth => "min-width",
            Self::MinHeight => "min-height",
            Self::Overflow => "overflow",
            Self::Opacity => "opacity",
        }
    }
}

/// Saved inline values of the [`StyleProp::BOX`] properties.
///
/// Captured before any mutation and written back verbatim, so a property that
/// was unset before the lock is unset again afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleSnapshot {
    values: [String; 5],
}

impl StyleSnapshot {
    /// Capture the current inline box styles of `element`.
    pub fn capture(doc: &dyn Document, element: ElementId) -> Self {
        let values = StyleProp::BOX.map(|prop| doc.style(element, prop));
        Self { values }
    }

    /// Saved value for one of the box properties.
    #[must_use]
    pub fn get(&self, prop: StyleProp) -> Option<&str> {
        StyleProp::BOX
            .iter()
            .position(|p| *p == prop)
            .map(|idx| self.values[idx].as_str())
    }

    /// Write the saved values back onto `element`.
    pub fn restore(&self, doc: &mut dyn Document, element: ElementId) {
        for (prop, value) in StyleProp::BOX.iter().zip(self.values.iter()) {
            doc.set_style(element, *prop, value);
        }
        crate::trace!(element = element.0, "box styles restored");
    }
}

/// Pin `element` to `size` and clip overflow.
///
/// Sets width, height, min-width and min-height to the measured pixel values
/// and `overflow: hidden`, so content changes cannot reflow the box.
pub fn lock_box(doc: &mut dyn Document, element: ElementId, size: BoxSize) {
    let width = size.width_px();
    let height = size.height_px();
    doc.set_style(element, StyleProp::Width, &width);
    doc.set_style(element, StyleProp::Height, &height);
    doc.set_style(element, StyleProp::MinWidth, &width);
    doc.set_style(element, StyleProp::MinHeight, &height);
    doc.set_style(element, StyleProp::Overflow, "hidden");
    crate::trace!(
        element = element.0,
        width = size.width,
        height = size.height,
        "box locked"
    );
}

/// Remove every inline box override, returning the element to natural flow.
pub fn clear_box(doc: &mut dyn Document, element: ElementId) {
    for prop in StyleProp::BOX {
        doc.set_style(element, prop, "");
    }
}
