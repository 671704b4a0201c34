#![forbid(unsafe_code)]

//! Text primitives for scramble effects.
//!
//! - [`markup`]: a lenient HTML fragment tokenizer, plain-text projection
//!   (`<br>` becomes `\n`) and the inverse serialization used for frames.
//! - [`alphabet`]: substitution glyph sets.

pub mod alphabet;
pub mod markup;

pub use alphabet::{Alphabet, AlphabetError, GlyphSet};
pub use markup::{decode_entities, extract_text, serialize_to_markup, Token, Tokenizer};
