#![forbid(unsafe_code)]

//! Hover trigger: scramble while the pointer is over an element.
//!
//! Each bound element moves `Idle -> Animating -> Idle`. Pointer events are
//! delivered to a *listener* element, which is the nearest interactive
//! ancestor (link, button, card) when there is one. Several text elements
//! may share a listener; an event on it drives all of them.

use core::time::Duration;

use kinetype_core::{Document, ElementId};
use kinetype_text::extract_text;
use tracing::{debug, trace};

use crate::animator::{ScrambleHandle, ScrambleOptions, Scrambler, SessionOutcome, Trigger};
use crate::config::EffectsConfig;

/// Per-element hover state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverState {
    Idle,
    Animating(ScrambleHandle),
}

#[derive(Debug, Clone)]
struct HoverTarget {
    element: ElementId,
    listener: ElementId,
    state: HoverState,
}

/// Hover strategy state for a page.
#[derive(Debug, Clone)]
pub struct HoverScramble {
    ancestors: String,
    cache_attr: String,
    duration: Duration,
    targets: Vec<HoverTarget>,
}

impl HoverScramble {
    /// Strategy with explicit listener ancestors and cache attribute.
    #[must_use]
    pub fn new(ancestors: &str, cache_attr: &str, duration: Duration) -> Self {
        Self {
            ancestors: ancestors.to_string(),
            cache_attr: cache_attr.to_string(),
            duration,
            targets: Vec::new(),
        }
    }

    #[must_use]
    pub fn from_config(config: &EffectsConfig) -> Self {
        Self::new(
            &config.interactive_ancestors,
            &config.cache_attr,
            config.hover_duration(),
        )
    }

    /// Bind every element matching `selector`. Returns how many were newly bound.
    pub fn attach(&mut self, doc: &dyn Document, selector: &str) -> usize {
        let mut bound = 0;
        for element in doc.query_all(selector) {
            if self.targets.iter().any(|t| t.element == element) {
                continue;
            }
            let listener = doc.closest(element, &self.ancestors).unwrap_or(element);
            trace!(element = element.0, listener = listener.0, "hover bound");
            self.targets.push(HoverTarget {
                element,
                listener,
                state: HoverState::Idle,
            });
            bound += 1;
        }
        debug!(selector, bound, "hover attach");
        bound
    }

    /// Elements the host must deliver pointer enter/leave for, deduplicated.
    #[must_use]
    pub fn listen_targets(&self) -> Vec<ElementId> {
        let mut out: Vec<ElementId> = Vec::new();
        for target in &self.targets {
            if !out.contains(&target.listener) {
                out.push(target.listener);
            }
        }
        out
    }

    /// Whether `element` is a listener.
    #[must_use]
    pub fn is_listener(&self, element: ElementId) -> bool {
        self.targets.iter().any(|t| t.listener == element)
    }

    /// Pointer entered `listener`. Returns the elements whose session started.
    ///
    /// Elements already animating are left alone. The text is read once and
    /// cached in the cache attribute so a later activation never scrambles
    /// towards a half-scrambled frame.
    pub fn pointer_enter(
        &mut self,
        doc: &mut dyn Document,
        scrambler: &mut Scrambler,
        listener: ElementId,
    ) -> Vec<ElementId> {
        let mut started = Vec::new();
        for target in self.targets.iter_mut().filter(|t| t.listener == listener) {
            if target.state != HoverState::Idle {
                continue;
            }
            let text = match doc.attribute(target.element, &self.cache_attr) {
                Some(cached) => cached,
                None => {
                    let Some(markup) = doc.inner_markup(target.element) else {
                        continue;
                    };
                    let text = extract_text(&markup).trim().to_string();
                    doc.set_attribute(target.element, &self.cache_attr, &text);
                    text
                }
            };
            if text.is_empty() {
                continue;
            }
            let handle = scrambler.run(
                doc,
                target.element,
                &text,
                ScrambleOptions::new()
                    .duration(self.duration)
                    .trigger(Trigger::Hover),
            );
            target.state = HoverState::Animating(handle);
            started.push(target.element);
        }
        started
    }

    /// Pointer left `listener`; cancels its running sessions.
    pub fn pointer_leave(
        &mut self,
        doc: &mut dyn Document,
        scrambler: &mut Scrambler,
        listener: ElementId,
    ) -> Vec<SessionOutcome> {
        let mut canceled = Vec::new();
        for target in self.targets.iter_mut().filter(|t| t.listener == listener) {
            if let HoverState::Animating(handle) = target.state {
                canceled.extend(scrambler.cancel(doc, handle));
                target.state = HoverState::Idle;
            }
        }
        canceled
    }

    /// A session ended on its own; the owning element goes back to idle.
    pub fn session_finished(&mut self, handle: ScrambleHandle) -> bool {
        match self
            .targets
            .iter_mut()
            .find(|t| t.state == HoverState::Animating(handle))
        {
            Some(target) => {
                target.state = HoverState::Idle;
                true
            }
            None => false,
        }
    }

    /// State of a bound element.
    #[must_use]
    pub fn state(&self, element: ElementId) -> Option<HoverState> {
        self.targets
            .iter()
            .find(|t| t.element == element)
            .map(|t| t.state)
    }

    /// Listener that drives `element`.
    #[must_use]
    pub fn listener_of(&self, element: ElementId) -> Option<ElementId> {
        self.targets
            .iter()
            .find(|t| t.element == element)
            .map(|t| t.listener)
    }

    /// Number of bound elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
