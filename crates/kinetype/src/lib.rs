#![forbid(unsafe_code)]

//! Kinetype public facade crate.
//!
//! Re-exports the host model, text helpers and effects under one roof, plus
//! a prelude for embedders wiring [`PageEffects`] into a page.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use kinetype_core::clock::DeterministicClock;
pub use kinetype_core::event::frame_timestamp;
pub use kinetype_core::{
    BoxSize, Document, ElementId, HostEvent, IntersectionEntry, StyleProp, StyleSnapshot,
    ViewportObserver,
};

// --- Text re-exports -------------------------------------------------------

pub use kinetype_text::{Alphabet, AlphabetError, GlyphSet, extract_text, serialize_to_markup};

// --- Effect re-exports -----------------------------------------------------

pub use kinetype_fx::{
    ConfigError, EffectEvent, EffectObserver, EffectsConfig, EventBus, GlyphRng, HoverScramble,
    InitReport, PageEffects, RevealScramble, ScrambleHandle, ScrambleOptions, ScrambleSession,
    Scrambler, SessionEnd, SessionOutcome, Trigger,
};

// --- Harness re-exports ----------------------------------------------------

#[cfg(feature = "harness")]
pub use kinetype_harness::{MemoryDocument, MemoryViewport};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for kinetype setup.
#[derive(Debug)]
pub enum Error {
    /// Effect configuration was rejected.
    Config(ConfigError),
    /// Glyph alphabet could not be built.
    Alphabet(AlphabetError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Alphabet(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Alphabet(err) => Some(err),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<AlphabetError> for Error {
    fn from(err: AlphabetError) -> Self {
        Self::Alphabet(err)
    }
}

/// Standard result type for kinetype APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Build a page context from a JSON configuration string.
pub fn page_from_json(json: &str) -> Result<PageEffects> {
    Ok(PageEffects::new(EffectsConfig::from_json(json)?)?)
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Alphabet, Document, EffectEvent, EffectsConfig, ElementId, Error, HostEvent,
        PageEffects, Result, ScrambleOptions, Scrambler, Trigger, ViewportObserver,
    };

    pub use crate::{core, fx, text};
}

pub use kinetype_core as core;
pub use kinetype_fx as fx;
pub use kinetype_text as text;
