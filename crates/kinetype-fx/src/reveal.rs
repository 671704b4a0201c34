#![forbid(unsafe_code)]

//! Viewport trigger: scramble an element once, the first time it scrolls in.
//!
//! Armed elements are hidden (`opacity: 0`) with their natural box recorded.
//! The first intersection report at or above the threshold unobserves the
//! element, pins the recorded box, makes it visible and runs a long session.
//! When that session completes the stored markup is written back and every
//! inline sizing property is cleared.

use core::time::Duration;

use kinetype_core::geometry::css_number;
use kinetype_core::style::{clear_box, lock_box};
use kinetype_core::{BoxSize, Document, ElementId, IntersectionEntry, StyleProp, ViewportObserver};
use kinetype_text::extract_text;
use tracing::{debug, trace};

use crate::animator::{ScrambleHandle, ScrambleOptions, Scrambler, SessionEnd, SessionOutcome, Trigger};
use crate::config::EffectsConfig;

/// Mirror attributes written at arm time. Sizes are bare CSS pixel numbers.
pub const ORIG_WIDTH_ATTR: &str = "data-orig-width";
pub const ORIG_HEIGHT_ATTR: &str = "data-orig-height";
pub const FINAL_TEXT_ATTR: &str = "data-final-text";

/// Per-element reveal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    /// Hidden and observed.
    Armed,
    Running(ScrambleHandle),
    /// Fired; never fires again.
    Done,
}

/// What was stored for one armed element.
#[derive(Debug, Clone, PartialEq)]
pub struct RevealEntry {
    pub element: ElementId,
    /// Text the session scrambles towards.
    pub text: String,
    /// Markup written back on completion.
    pub original_markup: String,
    /// Box measured at arm time.
    pub size: Option<BoxSize>,
    pub state: RevealState,
}

/// Reveal strategy state for a page.
#[derive(Debug, Clone)]
pub struct RevealScramble {
    override_attr: String,
    threshold: f64,
    duration: Duration,
    entries: Vec<RevealEntry>,
}

impl RevealScramble {
    #[must_use]
    pub fn new(override_attr: &str, threshold: f64, duration: Duration) -> Self {
        Self {
            override_attr: override_attr.to_string(),
            threshold,
            duration,
            entries: Vec::new(),
        }
    }

    #[must_use]
    pub fn from_config(config: &EffectsConfig) -> Self {
        Self::new(
            &config.reveal_attr,
            config.reveal_threshold,
            config.reveal_duration(),
        )
    }

    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Hide and observe every element matching `selector`.
    ///
    /// Returns how many were armed. Elements with no text, and elements
    /// already armed, are skipped.
    pub fn arm(
        &mut self,
        doc: &mut dyn Document,
        viewport: &mut dyn ViewportObserver,
        selector: &str,
    ) -> usize {
        let mut armed = 0;
        for element in doc.query_all(selector) {
            if self.entry(element).is_some() {
                continue;
            }
            let Some(original_markup) = doc.inner_markup(element) else {
                continue;
            };
            let text = match doc.attribute(element, &self.override_attr) {
                Some(value) if !value.is_empty() => value,
                _ => extract_text(&original_markup).trim().to_string(),
            };
            if text.is_empty() {
                trace!(element = element.0, "reveal skipped: no text");
                continue;
            }

            let size = doc.bounding_size(element);
            if let Some(size) = size {
                doc.set_attribute(element, ORIG_WIDTH_ATTR, &css_number(size.width));
                doc.set_attribute(element, ORIG_HEIGHT_ATTR, &css_number(size.height));
            }
            doc.set_attribute(element, FINAL_TEXT_ATTR, &text);
            doc.set_style(element, StyleProp::Opacity, "0");
            viewport.observe(element, self.threshold);

            self.entries.push(RevealEntry {
                element,
                text,
                original_markup,
                size,
                state: RevealState::Armed,
            });
            armed += 1;
        }
        debug!(selector, armed, threshold = self.threshold, "reveal armed");
        armed
    }

    /// Handle an intersection report. Returns the started session, if any.
    ///
    /// Reports below the threshold, for unknown elements, or for elements
    /// that already fired are ignored.
    pub fn on_intersection(
        &mut self,
        doc: &mut dyn Document,
        viewport: &mut dyn ViewportObserver,
        scrambler: &mut Scrambler,
        entry: &IntersectionEntry,
    ) -> Option<ScrambleHandle> {
        if !entry.entered(self.threshold) {
            return None;
        }
        let duration = self.duration;
        let reveal = self
            .entries
            .iter_mut()
            .find(|e| e.element == entry.target && e.state == RevealState::Armed)?;
        let element = reveal.element;

        viewport.unobserve(element);
        if let Some(size) = reveal.size {
            lock_box(doc, element, size);
        }
        doc.set_style(element, StyleProp::Opacity, "1");

        let original = reveal.original_markup.clone();
        let handle = scrambler.run(
            doc,
            element,
            &reveal.text,
            ScrambleOptions::new()
                .duration(duration)
                .trigger(Trigger::Reveal)
                .on_complete(move |doc| {
                    if !original.is_empty() {
                        doc.set_inner_markup(element, &original);
                    }
                    clear_box(doc, element);
                }),
        );
        reveal.state = RevealState::Running(handle);
        debug!(element = element.0, ratio = entry.ratio, "reveal fired");
        Some(handle)
    }

    /// A reveal session ended; the element is done for good.
    ///
    /// Sessions that did not complete skip the completion hook, so the stored
    /// markup and the natural box are put back here instead.
    pub fn session_finished(&mut self, doc: &mut dyn Document, outcome: &SessionOutcome) -> bool {
        let Some(entry) = self
            .entries
            .iter_mut()
            .find(|e| e.state == RevealState::Running(outcome.handle))
        else {
            return false;
        };
        entry.state = RevealState::Done;
        if outcome.end != SessionEnd::Completed {
            if !entry.original_markup.is_empty() {
                doc.set_inner_markup(entry.element, &entry.original_markup);
            }
            clear_box(doc, entry.element);
            trace!(element = entry.element.0, end = ?outcome.end, "reveal box released");
        }
        true
    }

    #[must_use]
    pub fn state(&self, element: ElementId) -> Option<RevealState> {
        self.entry(element).map(|e| e.state)
    }

    #[must_use]
    pub fn entry(&self, element: ElementId) -> Option<&RevealEntry> {
        self.entries.iter().find(|e| e.element == element)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
