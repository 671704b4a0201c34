#![forbid(unsafe_code)]

//! Typed effect event bus.
//!
//! Lifecycle and interaction events are published to observers in
//! subscription order. The bus is synchronous: `publish` returns after every
//! observer has seen the event.

use kinetype_core::ElementId;

use crate::animator::{SessionEnd, SessionOutcome, Trigger};

/// Events announced by the page effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectEvent {
    ScrambleStarted { element: ElementId, trigger: Trigger },
    ScrambleCompleted { element: ElementId, trigger: Trigger },
    ScrambleCanceled { element: ElementId, trigger: Trigger },
    ScrambleDetached { element: ElementId, trigger: Trigger },
    /// Pointer entered a hover listener target.
    HoverEnter { element: ElementId },
    /// Page setup finished.
    Ready,
}

impl EffectEvent {
    /// Event announcing how a session ended.
    #[must_use]
    pub fn from_outcome(outcome: &SessionOutcome) -> Self {
        let (element, trigger) = (outcome.element, outcome.trigger);
        match outcome.end {
            SessionEnd::Completed => Self::ScrambleCompleted { element, trigger },
            SessionEnd::Canceled => Self::ScrambleCanceled { element, trigger },
            SessionEnd::Detached => Self::ScrambleDetached { element, trigger },
        }
    }

    /// Element the event concerns, if any.
    #[must_use]
    pub const fn element(&self) -> Option<ElementId> {
        match *self {
            Self::ScrambleStarted { element, .. }
            | Self::ScrambleCompleted { element, .. }
            | Self::ScrambleCanceled { element, .. }
            | Self::ScrambleDetached { element, .. }
            | Self::HoverEnter { element } => Some(element),
            Self::Ready => None,
        }
    }
}

/// Receives effect events.
pub trait EffectObserver {
    fn on_event(&mut self, event: &EffectEvent);
}

impl<F: FnMut(&EffectEvent)> EffectObserver for F {
    fn on_event(&mut self, event: &EffectEvent) {
        self(event);
    }
}

/// Token returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

/// Ordered list of observers.
#[derive(Default)]
pub struct EventBus {
    observers: Vec<(SubscriberId, Box<dyn EffectObserver>)>,
    next_id: u64,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an observer at the end of the delivery order.
    pub fn subscribe(&mut self, observer: Box<dyn EffectObserver>) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    /// Remove an observer. Returns false if it was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    /// Deliver `event` to every observer.
    pub fn publish(&mut self, event: &EffectEvent) {
        tracing::trace!(?event, observers = self.observers.len(), "publish");
        for (_, observer) in &mut self.observers {
            observer.on_event(event);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}
