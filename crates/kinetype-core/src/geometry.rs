#![forbid(unsafe_code)]

//! Box geometry as reported by the host layout engine.

/// Rendered size of an element's border box, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoxSize {
    /// Width in CSS pixels.
    pub width: f64,
    /// Height in CSS pixels.
    pub height: f64,
}

impl BoxSize {
    /// Create a new box size.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether the box has no area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Width formatted as a CSS length (`"120.5px"`).
    pub fn width_px(&self) -> String {
        css_px(self.width)
    }

    /// Height formatted as a CSS length.
    pub fn height_px(&self) -> String {
        css_px(self.height)
    }
}

/// Format a pixel value the way `element.style.width = `${n}px`` would.
///
/// Integral values print without a fractional part.
pub fn css_px(value: f64) -> String {
    format!("{}px", css_number(value))
}

/// Format a pixel value without a unit, as `${n}` would.
pub fn css_number(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Parse a CSS pixel length back into a number. Accepts a bare number too.
pub fn parse_px(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    let number = trimmed.strip_suffix("px").unwrap_or(trimmed);
    number.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
