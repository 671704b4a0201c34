#![forbid(unsafe_code)]

//! Page-level effects context.
//!
//! [`PageEffects`] owns the animator, both trigger strategies and the event
//! bus. The embedder constructs one per page, calls [`PageEffects::init`] once
//! the document is ready and then forwards every [`HostEvent`].

use kinetype_core::{Document, ElementId, HostEvent, ViewportObserver};
use tracing::{debug, info};

use crate::animator::{ScrambleHandle, ScrambleOptions, Scrambler, SessionOutcome, Trigger};
use crate::bus::{EffectEvent, EffectObserver, EventBus, SubscriberId};
use crate::config::{ConfigError, EffectsConfig};
use crate::hover::HoverScramble;
use crate::reveal::RevealScramble;

/// Attribute set on the root element once setup is done.
pub const PHASE_ATTR: &str = "data-phase";

/// Glyph seed used when the configuration does not fix one.
const DEFAULT_SEED: u64 = 0x6b69_6e65_7479_7065;

/// Summary of [`PageEffects::init`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InitReport {
    /// Elements that received the hover attribute automatically.
    pub auto_tagged: usize,
    pub hover_bound: usize,
    pub reveal_armed: usize,
    /// Whether the root element was found and marked ready.
    pub root_marked: bool,
    pub reduced_motion: bool,
}

/// Scramble effects for one page.
pub struct PageEffects {
    config: EffectsConfig,
    scrambler: Scrambler,
    hover: HoverScramble,
    reveal: RevealScramble,
    bus: EventBus,
}

impl std::fmt::Debug for PageEffects {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageEffects")
            .field("scrambler", &self.scrambler)
            .field("hover", &self.hover.len())
            .field("reveal", &self.reveal.len())
            .field("bus", &self.bus)
            .finish()
    }
}

impl PageEffects {
    /// Validate `config` and build the context.
    pub fn new(config: EffectsConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let alphabet = config.alphabet()?;
        let scrambler = Scrambler::new(alphabet, config.seed.unwrap_or(DEFAULT_SEED));
        Ok(Self {
            hover: HoverScramble::from_config(&config),
            reveal: RevealScramble::from_config(&config),
            scrambler,
            bus: EventBus::new(),
            config,
        })
    }

    #[must_use]
    pub fn config(&self) -> &EffectsConfig {
        &self.config
    }

    #[must_use]
    pub fn scrambler(&self) -> &Scrambler {
        &self.scrambler
    }

    #[must_use]
    pub fn hover(&self) -> &HoverScramble {
        &self.hover
    }

    #[must_use]
    pub fn reveal(&self) -> &RevealScramble {
        &self.reveal
    }

    pub fn subscribe(&mut self, observer: Box<dyn EffectObserver>) -> SubscriberId {
        self.bus.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// One-time page setup.
    ///
    /// Tags the well-known link labels for hover, binds hover listeners, arms
    /// reveal elements and finally marks the root element ready. With reduced
    /// motion only the ready mark happens.
    pub fn init(
        &mut self,
        doc: &mut dyn Document,
        viewport: &mut dyn ViewportObserver,
    ) -> InitReport {
        let mut report = InitReport {
            reduced_motion: self.config.reduced_motion,
            ..InitReport::default()
        };

        if !self.config.reduced_motion {
            report.auto_tagged = self.auto_tag(doc);
            report.hover_bound = self
                .hover
                .attach(&*doc, &attr_selector(&self.config.hover_attr));
            report.reveal_armed =
                self.reveal
                    .arm(doc, viewport, &attr_selector(&self.config.reveal_attr));
        }

        if let Some(root) = doc.query(&self.config.root_selector) {
            doc.set_attribute(root, PHASE_ATTR, "ready");
            report.root_marked = true;
        }
        self.bus.publish(&EffectEvent::Ready);

        info!(
            auto_tagged = report.auto_tagged,
            hover_bound = report.hover_bound,
            reveal_armed = report.reveal_armed,
            reduced_motion = report.reduced_motion,
            "page effects ready"
        );
        report
    }

    fn auto_tag(&self, doc: &mut dyn Document) -> usize {
        let mut tagged = 0;
        for selector in &self.config.auto_tag_selectors {
            for element in doc.query_all(selector) {
                if doc.has_attribute(element, &self.config.hover_attr)
                    || doc.has_attribute(element, &self.config.reveal_attr)
                {
                    continue;
                }
                doc.set_attribute(element, &self.config.hover_attr, "");
                tagged += 1;
            }
        }
        tagged
    }

    /// Dispatch one host event. Returns the events published while handling it.
    pub fn handle_event(
        &mut self,
        doc: &mut dyn Document,
        viewport: &mut dyn ViewportObserver,
        event: &HostEvent,
    ) -> Vec<EffectEvent> {
        let mut events = Vec::new();
        match *event {
            HostEvent::PointerEnter(listener) => {
                if self.hover.is_listener(listener) {
                    events.push(EffectEvent::HoverEnter { element: listener });
                }
                for element in self.hover.pointer_enter(doc, &mut self.scrambler, listener) {
                    events.push(EffectEvent::ScrambleStarted {
                        element,
                        trigger: Trigger::Hover,
                    });
                }
            }
            HostEvent::PointerLeave(listener) => {
                for outcome in self.hover.pointer_leave(doc, &mut self.scrambler, listener) {
                    events.push(EffectEvent::from_outcome(&outcome));
                }
            }
            HostEvent::Intersection(entry) => {
                if self
                    .reveal
                    .on_intersection(doc, viewport, &mut self.scrambler, &entry)
                    .is_some()
                {
                    events.push(EffectEvent::ScrambleStarted {
                        element: entry.target,
                        trigger: Trigger::Reveal,
                    });
                }
            }
            HostEvent::Frame(now) => {
                for outcome in self.scrambler.on_frame(doc, now) {
                    self.session_ended(doc, &outcome);
                    events.push(EffectEvent::from_outcome(&outcome));
                }
            }
        }
        for event in &events {
            self.bus.publish(event);
        }
        events
    }

    fn session_ended(&mut self, doc: &mut dyn Document, outcome: &SessionOutcome) {
        let updated = match outcome.trigger {
            Trigger::Hover => self.hover.session_finished(outcome.handle),
            Trigger::Reveal => self.reveal.session_finished(doc, outcome),
            Trigger::Direct => false,
        };
        debug!(
            element = outcome.element.0,
            end = ?outcome.end,
            updated,
            "session ended"
        );
    }

    /// Options preloaded with the configured default duration.
    #[must_use]
    pub fn options(&self) -> ScrambleOptions {
        ScrambleOptions::new().duration(self.config.default_duration())
    }

    /// Scramble `element` towards `text` on behalf of page code.
    pub fn scramble(
        &mut self,
        doc: &mut dyn Document,
        element: ElementId,
        text: &str,
        options: ScrambleOptions,
    ) -> ScrambleHandle {
        let handle = self.scrambler.run(doc, element, text, options);
        let trigger = self.scrambler.trigger(handle).unwrap_or(Trigger::Direct);
        self.bus
            .publish(&EffectEvent::ScrambleStarted { element, trigger });
        handle
    }

    /// Cancel a session started through this page. Returns false if it had
    /// already finished.
    pub fn cancel(&mut self, doc: &mut dyn Document, handle: ScrambleHandle) -> bool {
        match self.scrambler.cancel(doc, handle) {
            Some(outcome) => {
                self.session_ended(doc, &outcome);
                self.bus.publish(&EffectEvent::from_outcome(&outcome));
                true
            }
            None => false,
        }
    }

    /// Whether the host should schedule another frame.
    #[must_use]
    pub fn wants_frame(&self) -> bool {
        self.scrambler.wants_frame()
    }

    /// Elements the host must deliver pointer enter/leave events for.
    #[must_use]
    pub fn hover_listeners(&self) -> Vec<ElementId> {
        self.hover.listen_targets()
    }
}

fn attr_selector(attr: &str) -> String {
    format!("[{attr}]")
}
