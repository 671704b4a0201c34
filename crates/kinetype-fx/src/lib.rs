#![forbid(unsafe_code)]

//! Scramble-text effects.
//!
//! A scramble reveals a target string left to right over a fixed duration,
//! rendering every not-yet-revealed, non-whitespace position as a random glyph.
//! The element's box is pinned to its pre-animation size for the whole run
//! and its original markup and inline styles come back verbatim at the end.
//!
//! - [`scramble`]: one session as a state machine, plus the pure frame math.
//! - [`animator`]: [`Scrambler`], the registry that drives sessions per frame.
//! - [`hover`] / [`reveal`]: trigger strategies (pointer hover, viewport entry).
//! - [`bus`]: typed effect events for observers such as a sound layer.
//! - [`page`]: [`PageEffects`], the context object wiring it all together.
//! - [`config`]: [`EffectsConfig`], JSON-loadable settings.
//!
//! # Host loop
//!
//! ```ignore
//! let mut page = PageEffects::new(EffectsConfig::default())?;
//! page.init(&mut doc, &mut viewport);
//!
//! // From the host's event listeners and requestAnimationFrame callback:
//! page.handle_event(&mut doc, &mut viewport, &HostEvent::PointerEnter(link));
//! while page.wants_frame() {
//!     page.handle_event(&mut doc, &mut viewport, &HostEvent::Frame(now));
//! }
//! ```

pub mod animator;
pub mod bus;
pub mod config;
pub mod hover;
pub mod page;
pub mod reveal;
pub mod rng;
pub mod scramble;

pub use animator::{ScrambleHandle, ScrambleOptions, Scrambler, SessionEnd, SessionOutcome, Trigger};
pub use bus::{EffectEvent, EffectObserver, EventBus, SubscriberId};
pub use config::{ConfigError, EffectsConfig};
pub use hover::{HoverScramble, HoverState};
pub use page::{InitReport, PageEffects};
pub use reveal::{RevealScramble, RevealState};
pub use rng::GlyphRng;
pub use scramble::{FrameOutcome, ScrambleSession, SessionState};
