#![forbid(unsafe_code)]

//! The scramble animator: runs any number of sessions off one frame loop.
//!
//! [`Scrambler::run`] is the `scrambleText(element, text, options)` entry
//! point. It locks the element's box immediately and returns a
//! [`ScrambleHandle`]; the host then feeds frame timestamps through
//! [`Scrambler::on_frame`] for as long as [`Scrambler::wants_frame`] says so.
//!
//! # Invariants
//!
//! 1. A completion callback runs only after the session's markup and inline
//!    styles have been restored, and only for natural completion.
//! 2. [`Scrambler::cancel`] restores synchronously and is a no-op for a
//!    handle that already finished.
//! 3. Sessions are driven in start order within a frame.
//!
//! The animator does not serialize sessions per element: two concurrent runs
//! on the same element would fight over its content. Trigger strategies keep
//! at most one session per element.

use core::time::Duration;

use kinetype_core::{Document, ElementId};
use kinetype_text::Alphabet;
use tracing::debug;

use crate::rng::GlyphRng;
use crate::scramble::{FrameOutcome, ScrambleSession};

/// Default duration for direct calls.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(800);

/// Callback run after a session completes naturally and has been restored.
pub type CompletionFn = Box<dyn FnOnce(&mut dyn Document)>;

/// What started a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// Pointer hover strategy.
    Hover,
    /// Viewport-entry strategy.
    Reveal,
    /// Direct call from page code.
    Direct,
}

/// Identifies one session started by a [`Scrambler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScrambleHandle(u64);

impl ScrambleHandle {
    #[cfg(test)]
    pub(crate) const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Raw numeric id, unique per [`Scrambler`].
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Options for [`Scrambler::run`].
pub struct ScrambleOptions {
    duration: Duration,
    alphabet: Option<Alphabet>,
    on_complete: Option<CompletionFn>,
    trigger: Trigger,
    seed: Option<u64>,
}

impl std::fmt::Debug for ScrambleOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrambleOptions")
            .field("duration", &self.duration)
            .field("alphabet_len", &self.alphabet.as_ref().map(Alphabet::len))
            .field("on_complete", &self.on_complete.is_some())
            .field("trigger", &self.trigger)
            .field("seed", &self.seed)
            .finish()
    }
}

impl Default for ScrambleOptions {
    fn default() -> Self {
        Self {
            duration: DEFAULT_DURATION,
            alphabet: None,
            on_complete: None,
            trigger: Trigger::Direct,
            seed: None,
        }
    }
}

impl ScrambleOptions {
    /// Options with the default 800ms duration and the animator's alphabet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the duration.
    #[must_use]
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Set the duration in milliseconds.
    #[must_use]
    pub fn duration_ms(self, ms: u64) -> Self {
        self.duration(Duration::from_millis(ms))
    }

    /// Draw substitutes from `alphabet` instead of the animator default.
    #[must_use]
    pub fn alphabet(mut self, alphabet: Alphabet) -> Self {
        self.alphabet = Some(alphabet);
        self
    }

    /// Run `f` after natural completion, once the element is restored.
    #[must_use]
    pub fn on_complete(mut self, f: impl FnOnce(&mut dyn Document) + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }

    /// Tag the session with what started it.
    #[must_use]
    pub fn trigger(mut self, trigger: Trigger) -> Self {
        self.trigger = trigger;
        self
    }

    /// Fix the glyph seed for this session.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Completed,
    Canceled,
    Detached,
}

/// Report of a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOutcome {
    pub handle: ScrambleHandle,
    pub element: ElementId,
    pub trigger: Trigger,
    pub end: SessionEnd,
}

struct ActiveSession {
    handle: ScrambleHandle,
    trigger: Trigger,
    session: ScrambleSession,
    on_complete: Option<CompletionFn>,
}

/// Registry driving every in-flight scramble from the host frame loop.
pub struct Scrambler {
    active: Vec<ActiveSession>,
    next_id: u64,
    alphabet: Alphabet,
    seeds: GlyphRng,
}

impl std::fmt::Debug for Scrambler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scrambler")
            .field("active", &self.active.len())
            .field("next_id", &self.next_id)
            .field("alphabet_len", &self.alphabet.len())
            .finish()
    }
}

impl Default for Scrambler {
    fn default() -> Self {
        Self::new(Alphabet::default(), 0)
    }
}

impl Scrambler {
    /// Create an animator with a default alphabet and a seed for glyph draws.
    #[must_use]
    pub fn new(alphabet: Alphabet, seed: u64) -> Self {
        Self {
            active: Vec::new(),
            next_id: 1,
            alphabet,
            seeds: GlyphRng::new(seed),
        }
    }

    /// Alphabet used when options do not name one.
    #[must_use]
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Start scrambling `element` towards `text`.
    ///
    /// The box is measured and locked before this returns; the first frame
    /// delivered to [`on_frame`](Self::on_frame) fixes the start time.
    pub fn run(
        &mut self,
        doc: &mut dyn Document,
        element: ElementId,
        text: &str,
        options: ScrambleOptions,
    ) -> ScrambleHandle {
        let handle = ScrambleHandle(self.next_id);
        self.next_id += 1;

        let seed = options.seed.unwrap_or_else(|| self.seeds.next_u64());
        let alphabet = options.alphabet.unwrap_or_else(|| self.alphabet.clone());
        let session = ScrambleSession::begin(
            doc,
            element,
            text,
            options.duration,
            alphabet,
            GlyphRng::new(seed),
        );
        debug!(
            handle = handle.0,
            element = element.0,
            trigger = ?options.trigger,
            duration_ms = options.duration.as_millis() as u64,
            "scramble started"
        );

        self.active.push(ActiveSession {
            handle,
            trigger: options.trigger,
            session,
            on_complete: options.on_complete,
        });
        handle
    }

    /// Cancel a session and restore its element immediately.
    ///
    /// Returns `None` if the handle already finished (or never existed); the
    /// document is not touched in that case.
    pub fn cancel(
        &mut self,
        doc: &mut dyn Document,
        handle: ScrambleHandle,
    ) -> Option<SessionOutcome> {
        let idx = self.active.iter().position(|a| a.handle == handle)?;
        let mut entry = self.active.remove(idx);
        entry.session.cancel(doc);
        debug!(
            handle = handle.0,
            element = entry.session.element().0,
            revealed = entry.session.revealed(),
            "scramble canceled"
        );
        Some(SessionOutcome {
            handle,
            element: entry.session.element(),
            trigger: entry.trigger,
            end: SessionEnd::Canceled,
        })
    }

    /// Render one frame of every active session at host time `now`.
    ///
    /// Returns the sessions that finished during this frame, in start order.
    pub fn on_frame(&mut self, doc: &mut dyn Document, now: Duration) -> Vec<SessionOutcome> {
        let mut finished = Vec::new();
        self.active.retain_mut(|entry| {
            let end = match entry.session.frame(doc, now) {
                FrameOutcome::Running { .. } => return true,
                FrameOutcome::Completed => SessionEnd::Completed,
                FrameOutcome::Detached => SessionEnd::Detached,
                FrameOutcome::Finished => return false,
            };
            let element = entry.session.element();
            match end {
                SessionEnd::Completed => {
                    debug!(handle = entry.handle.0, element = element.0, "scramble completed");
                    if let Some(on_complete) = entry.on_complete.take() {
                        on_complete(doc);
                    }
                }
                _ => {
                    debug!(
                        handle = entry.handle.0,
                        element = element.0,
                        "scramble target detached mid-session"
                    );
                }
            }
            finished.push(SessionOutcome {
                handle: entry.handle,
                element,
                trigger: entry.trigger,
                end,
            });
            false
        });
        finished
    }

    /// Whether any session still needs frames.
    #[must_use]
    pub fn wants_frame(&self) -> bool {
        !self.active.is_empty()
    }

    /// Whether `handle` is still running.
    #[must_use]
    pub fn is_active(&self, handle: ScrambleHandle) -> bool {
        self.active.iter().any(|a| a.handle == handle)
    }

    /// Number of in-flight sessions.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Read-only view of an in-flight session.
    #[must_use]
    pub fn session(&self, handle: ScrambleHandle) -> Option<&ScrambleSession> {
        self.active
            .iter()
            .find(|a| a.handle == handle)
            .map(|a| &a.session)
    }

    /// Trigger of an in-flight session.
    #[must_use]
    pub fn trigger(&self, handle: ScrambleHandle) -> Option<Trigger> {
        self.active
            .iter()
            .find(|a| a.handle == handle)
            .map(|a| a.trigger)
    }

    /// Handle of the in-flight session animating `element`, if any.
    #[must_use]
    pub fn handle_for(&self, element: ElementId) -> Option<ScrambleHandle> {
        self.active
            .iter()
            .find(|a| a.session.element() == element)
            .map(|a| a.handle)
    }
}
