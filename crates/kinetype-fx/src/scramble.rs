#![forbid(unsafe_code)]

//! One scramble run as a state machine.
//!
//! # Frame math
//!
//! ```text
//! progress = clamp((now - start) / duration, 0, 1)
//! revealed = floor(progress * len(target))        // len in chars
//! glyph[i] = target[i]            if target[i] is ' ' or '\n'
//!          = target[i]            if i < revealed
//!          = random(alphabet)     otherwise
//! ```
//!
//! `start` is the timestamp of the first frame, so the first frame always
//! renders fully scrambled text (unless the duration is zero).
//!
//! # Invariants
//!
//! 1. The box is measured and locked before any content is written; every
//!    intermediate frame renders inside exactly that box.
//! 2. `revealed` never decreases, even if the host hands out a timestamp
//!    older than the previous one.
//! 3. Spaces and newlines are never substituted.
//! 4. Every exit path (completion, cancellation, detachment) writes the saved
//!    markup and the saved inline box styles back.
//! 5. Once finished, the session never touches the document again.

use core::time::Duration;

use kinetype_core::style::lock_box;
use kinetype_core::{BoxSize, Document, ElementId, StyleSnapshot};
use kinetype_text::{serialize_to_markup, Alphabet};
use tracing::trace;

use crate::rng::GlyphRng;

/// Reveal progress for `elapsed` out of `duration`, in `[0, 1]`.
///
/// A zero duration is immediately complete.
#[must_use]
pub fn reveal_progress(elapsed: Duration, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    (elapsed.as_nanos() as f64 / duration.as_nanos() as f64).clamp(0.0, 1.0)
}

/// Number of leading characters shown for real at `progress`.
#[must_use]
pub fn revealed_count(progress: f64, len: usize) -> usize {
    let count = (progress.clamp(0.0, 1.0) * len as f64).floor() as usize;
    count.min(len)
}

/// Whether `c` always renders as itself.
#[inline]
#[must_use]
pub fn is_passthrough(c: char) -> bool {
    c == ' ' || c == '\n'
}

/// Render one frame of `target` with the first `revealed` characters settled.
///
/// Each unsettled, non-whitespace position gets an independent uniform draw.
pub fn scramble_frame(
    target: &[char],
    revealed: usize,
    alphabet: &Alphabet,
    rng: &mut GlyphRng,
) -> String {
    target
        .iter()
        .enumerate()
        .map(|(idx, &c)| {
            if is_passthrough(c) || idx < revealed {
                c
            } else {
                rng.pick(alphabet)
            }
        })
        .collect()
}

/// Lifecycle of a [`ScrambleSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Box locked, waiting for the first frame.
    Pending,
    /// At least one frame rendered.
    Running,
    /// Reached progress 1 and restored.
    Completed,
    /// Stopped by the caller and restored.
    Canceled,
    /// Element left the render tree; restored onto the stale handle.
    Detached,
}

impl SessionState {
    /// Whether the session has reached a terminal state.
    #[must_use]
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Completed | Self::Canceled | Self::Detached)
    }
}

/// Result of [`ScrambleSession::frame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Frame rendered; another frame is needed.
    Running { revealed: usize },
    /// Final frame reached; markup and styles restored.
    Completed,
    /// Element was detached; markup and styles restored.
    Detached,
    /// Session had already finished; nothing was done.
    Finished,
}

/// A single scramble run bound to one element.
#[derive(Debug, Clone)]
pub struct ScrambleSession {
    element: ElementId,
    target: Vec<char>,
    duration: Duration,
    alphabet: Alphabet,
    rng: GlyphRng,
    start: Option<Duration>,
    last_now: Duration,
    revealed: usize,
    frame_text: String,
    original_markup: String,
    styles: StyleSnapshot,
    locked: Option<BoxSize>,
    state: SessionState,
}

impl ScrambleSession {
    /// Capture `element` and lock its box. No content is written yet.
    ///
    /// If the host cannot measure the element nothing is locked and the
    /// session still runs.
    pub fn begin(
        doc: &mut dyn Document,
        element: ElementId,
        target: &str,
        duration: Duration,
        alphabet: Alphabet,
        rng: GlyphRng,
    ) -> Self {
        let styles = StyleSnapshot::capture(doc, element);
        let original_markup = doc.inner_markup(element).unwrap_or_default();
        let locked = doc.bounding_size(element);
        if let Some(size) = locked {
            lock_box(doc, element, size);
        }
        trace!(
            element = element.0,
            chars = target.chars().count(),
            duration_ms = duration.as_millis() as u64,
            locked = locked.is_some(),
            "scramble session begun"
        );

        Self {
            element,
            target: target.chars().collect(),
            duration,
            alphabet,
            rng,
            start: None,
            last_now: Duration::ZERO,
            revealed: 0,
            frame_text: String::new(),
            original_markup,
            styles,
            locked,
            state: SessionState::Pending,
        }
    }

    /// Advance to `now` and render.
    pub fn frame(&mut self, doc: &mut dyn Document, now: Duration) -> FrameOutcome {
        if self.state.is_finished() {
            return FrameOutcome::Finished;
        }
        if !doc.is_connected(self.element) {
            self.restore(doc);
            self.state = SessionState::Detached;
            return FrameOutcome::Detached;
        }

        let start = *self.start.get_or_insert(now);
        let now = now.max(self.last_now).max(start);
        self.last_now = now;

        let progress = reveal_progress(now - start, self.duration);
        self.revealed = self
            .revealed
            .max(revealed_count(progress, self.target.len()));
        self.frame_text = scramble_frame(&self.target, self.revealed, &self.alphabet, &mut self.rng);

        if progress < 1.0 {
            doc.set_inner_markup(self.element, &serialize_to_markup(&self.frame_text));
            self.state = SessionState::Running;
            FrameOutcome::Running {
                revealed: self.revealed,
            }
        } else {
            self.restore(doc);
            self.state = SessionState::Completed;
            FrameOutcome::Completed
        }
    }

    /// Stop early and restore. Returns `false` if already finished.
    pub fn cancel(&mut self, doc: &mut dyn Document) -> bool {
        if self.state.is_finished() {
            return false;
        }
        self.restore(doc);
        self.state = SessionState::Canceled;
        true
    }

    fn restore(&self, doc: &mut dyn Document) {
        doc.set_inner_markup(self.element, &self.original_markup);
        self.styles.restore(doc, self.element);
    }

    /// Element this session animates.
    #[must_use]
    pub const fn element(&self) -> ElementId {
        self.element
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Characters settled so far.
    #[must_use]
    pub const fn revealed(&self) -> usize {
        self.revealed
    }

    /// Length of the target in characters.
    #[must_use]
    pub fn target_len(&self) -> usize {
        self.target.len()
    }

    /// Plain text of the most recent frame (the target itself once complete).
    #[must_use]
    pub fn frame_text(&self) -> &str {
        &self.frame_text
    }

    /// Box the element was pinned to, if it could be measured.
    #[must_use]
    pub const fn locked_size(&self) -> Option<BoxSize> {
        self.locked
    }

    /// Markup that will be restored.
    #[must_use]
    pub fn original_markup(&self) -> &str {
        &self.original_markup
    }

    /// Configured duration.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinetype_core::StyleProp;
    use kinetype_harness::MemoryDocument;
    use pretty_assertions::assert_eq;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn doc_with(markup: &str) -> (MemoryDocument, ElementId) {
        let mut doc = MemoryDocument::new();
        let el = doc.append(doc.body(), "h2");
        doc.set_markup(el, markup);
        (doc, el)
    }

    fn x_session(doc: &mut MemoryDocument, el: ElementId, text: &str, millis: u64) -> ScrambleSession {
        ScrambleSession::begin(
            doc,
            el,
            text,
            ms(millis),
            Alphabet::new("X").unwrap(),
            GlyphRng::new(0),
        )
    }

    #[test]
    fn progress_and_count_math() {
        assert_eq!(reveal_progress(ms(50), ms(100)), 0.5);
        assert_eq!(reveal_progress(ms(250), ms(100)), 1.0);
        assert_eq!(reveal_progress(ms(5), Duration::ZERO), 1.0);
        assert_eq!(revealed_count(0.0, 11), 0);
        assert_eq!(revealed_count(0.5, 11), 5);
        assert_eq!(revealed_count(1.0, 11), 11);
        assert_eq!(revealed_count(0.999, 3), 2);
    }

    #[test]
    fn frame_keeps_whitespace() {
        let target: Vec<char> = "AB C\nD".chars().collect();
        let alphabet = Alphabet::new("X").unwrap();
        let frame = scramble_frame(&target, 0, &alphabet, &mut GlyphRng::new(3));
        assert_eq!(frame, "XX X\nX");
    }

    #[test]
    fn hello_world_halfway() {
        let (mut doc, el) = doc_with("HELLO<br>WORLD");
        let mut session = x_session(&mut doc, el, "HELLO\nWORLD", 100);

        assert_eq!(session.frame(&mut doc, ms(1000)), FrameOutcome::Running { revealed: 0 });
        assert_eq!(doc.inner_markup(el).unwrap(), "XXXXX<br>XXXXX");

        assert_eq!(session.frame(&mut doc, ms(1050)), FrameOutcome::Running { revealed: 5 });
        assert_eq!(session.frame_text(), "HELLO\nXXXXX");
        assert_eq!(doc.inner_markup(el).unwrap(), "HELLO<br>XXXXX");

        assert_eq!(session.frame(&mut doc, ms(1100)), FrameOutcome::Completed);
        assert_eq!(session.frame_text(), "HELLO\nWORLD");
        assert_eq!(doc.inner_markup(el).unwrap(), "HELLO<br>WORLD");
        assert!(doc.inline_styles(el).is_empty());
    }

    #[test]
    fn rich_markup_comes_back_verbatim() {
        let original = "Fast <em>by</em> default";
        let (mut doc, el) = doc_with(original);
        let mut session = x_session(&mut doc, el, "Fast by default", 10);
        session.frame(&mut doc, ms(0));
        assert_eq!(doc.text(el), "XXXX XX XXXXXXX");
        session.frame(&mut doc, ms(10));
        assert_eq!(doc.inner_markup(el).as_deref(), Some(original));
    }

    #[test]
    fn box_locked_before_first_frame() {
        let (mut doc, el) = doc_with("AB");
        let session = x_session(&mut doc, el, "AB", 100);
        assert_eq!(session.state(), SessionState::Pending);
        assert_eq!(session.locked_size(), Some(BoxSize::new(16.0, 16.0)));
        assert_eq!(doc.style(el, StyleProp::Width), "16px");
        assert_eq!(doc.style(el, StyleProp::MinHeight), "16px");
        assert_eq!(doc.style(el, StyleProp::Overflow), "hidden");
        assert_eq!(doc.markup_writes(el), 0);
    }

    #[test]
    fn prior_inline_styles_are_restored() {
        let (mut doc, el) = doc_with("AB");
        doc.set_style(el, StyleProp::Width, "50%");
        doc.set_style(el, StyleProp::Opacity, "0.5");
        let mut session = x_session(&mut doc, el, "AB", 100);
        session.frame(&mut doc, ms(0));
        assert!(session.cancel(&mut doc));
        assert_eq!(
            doc.inline_styles(el),
            vec![("opacity", "0.5".to_string()), ("width", "50%".to_string())]
        );
    }

    #[test]
    fn unmeasurable_element_runs_unlocked() {
        let (mut doc, el) = doc_with("AB");
        let ghost = ElementId(404);
        let mut session = x_session(&mut doc, ghost, "AB", 100);
        assert_eq!(session.locked_size(), None);
        // Unknown handles are not connected, so the first frame detaches.
        assert_eq!(session.frame(&mut doc, ms(0)), FrameOutcome::Detached);
        assert_eq!(doc.style_writes(el), 0);
    }

    #[test]
    fn stale_timestamps_never_unreveal() {
        let (mut doc, el) = doc_with("ABCDEFGHIJ");
        let mut session = x_session(&mut doc, el, "ABCDEFGHIJ", 100);
        session.frame(&mut doc, ms(0));
        session.frame(&mut doc, ms(60));
        assert_eq!(session.revealed(), 6);
        session.frame(&mut doc, ms(20));
        assert_eq!(session.revealed(), 6);
        assert_eq!(doc.text(el), "ABCDEFXXXX");
    }

    #[test]
    fn zero_duration_completes_on_first_frame() {
        let (mut doc, el) = doc_with("Hi");
        let mut session = x_session(&mut doc, el, "Hi", 0);
        assert_eq!(session.frame(&mut doc, ms(7)), FrameOutcome::Completed);
        assert_eq!(doc.markup_writes(el), 1);
    }

    #[test]
    fn cancel_is_idempotent_after_completion() {
        let (mut doc, el) = doc_with("Hi");
        let mut session = x_session(&mut doc, el, "Hi", 10);
        session.frame(&mut doc, ms(0));
        session.frame(&mut doc, ms(10));
        let markup_writes = doc.markup_writes(el);
        let style_writes = doc.style_writes(el);

        assert!(!session.cancel(&mut doc));
        assert_eq!(session.frame(&mut doc, ms(20)), FrameOutcome::Finished);
        assert_eq!(doc.markup_writes(el), markup_writes);
        assert_eq!(doc.style_writes(el), style_writes);
        assert_eq!(session.state(), SessionState::Completed);
    }

    #[test]
    fn detachment_restores_and_stops() {
        let (mut doc, el) = doc_with("Hello");
        let mut session = x_session(&mut doc, el, "Hello", 100);
        session.frame(&mut doc, ms(0));
        doc.detach(el);
        assert_eq!(session.frame(&mut doc, ms(30)), FrameOutcome::Detached);
        assert_eq!(session.state(), SessionState::Detached);
        assert_eq!(doc.inner_markup(el).as_deref(), Some("Hello"));
        assert!(doc.inline_styles(el).is_empty());
        assert!(!session.cancel(&mut doc));
    }
}
