//! Substitution glyph sets for scrambled positions.

use std::str::FromStr;
use std::sync::Arc;

/// Katakana.
pub const JAPANESE: &str = "アイウエオカキクケコサシスセソタチツテトナニヌネノハヒフヘホマミムメモヤユヨラリルレロワヲン";

/// Frequent hanzi.
pub const CHINESE: &str = "的一是不了人我在有他这为之大来以个中上们到说国和地也子时道出而要于就下得可你年生自会那后能对着事其里所去行过家十用发天如然作方成者多日都三小军二无同主经长儿母";

/// Punctuation-like symbols.
pub const SYMBOLS: &str = "#$%&*+=-";

/// Decimal digits.
pub const NUMBERS: &str = "0123456789";

/// Uppercase Latin letters.
pub const LATIN: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Error building an [`Alphabet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlphabetError {
    /// No glyphs to draw from.
    Empty,
    /// A set name that [`GlyphSet::from_name`] does not know.
    UnknownSet(String),
}

impl std::fmt::Display for AlphabetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "alphabet must contain at least one glyph"),
            Self::UnknownSet(name) => write!(f, "unknown glyph set '{name}'"),
        }
    }
}

impl std::error::Error for AlphabetError {}

/// Named built-in glyph sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlyphSet {
    Japanese,
    Chinese,
    Symbols,
    Numbers,
    Latin,
}

impl GlyphSet {
    /// Sets making up [`Alphabet::default`]. Digits are not included.
    pub const DEFAULT: [GlyphSet; 4] = [
        GlyphSet::Japanese,
        GlyphSet::Chinese,
        GlyphSet::Symbols,
        GlyphSet::Latin,
    ];

    /// Glyphs of this set, in order.
    #[must_use]
    pub const fn glyphs(self) -> &'static str {
        match self {
            Self::Japanese => JAPANESE,
            Self::Chinese => CHINESE,
            Self::Symbols => SYMBOLS,
            Self::Numbers => NUMBERS,
            Self::Latin => LATIN,
        }
    }

    /// Look up a set by lowercase name (`"japanese"`, `"latin"`, ...).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "japanese" | "katakana" => Some(Self::Japanese),
            "chinese" | "hanzi" => Some(Self::Chinese),
            "symbols" => Some(Self::Symbols),
            "numbers" | "digits" => Some(Self::Numbers),
            "latin" => Some(Self::Latin),
            _ => None,
        }
    }
}

/// Ordered, non-empty sequence of substitution glyphs.
///
/// Cheap to clone; sessions share the glyph buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    glyphs: Arc<[char]>,
}

impl Alphabet {
    /// Build an alphabet from the characters of `glyphs`, in order.
    ///
    /// Duplicates are kept, so repeating a glyph weights it.
    pub fn new(glyphs: &str) -> Result<Self, AlphabetError> {
        if glyphs.is_empty() {
            return Err(AlphabetError::Empty);
        }
        Ok(Self {
            glyphs: glyphs.chars().collect(),
        })
    }

    /// Concatenate built-in sets in the given order.
    pub fn from_sets(sets: &[GlyphSet]) -> Result<Self, AlphabetError> {
        let joined: String = sets.iter().map(|set| set.glyphs()).collect();
        Self::new(&joined)
    }

    /// Concatenate sets given by name, e.g. from configuration.
    pub fn from_set_names<S: AsRef<str>>(names: &[S]) -> Result<Self, AlphabetError> {
        let sets = names
            .iter()
            .map(|name| {
                GlyphSet::from_name(name.as_ref())
                    .ok_or_else(|| AlphabetError::UnknownSet(name.as_ref().to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_sets(&sets)
    }

    /// Number of glyphs (never zero).
    #[must_use]
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Glyph at `idx`, wrapping around the alphabet length.
    #[must_use]
    pub fn glyph(&self, idx: usize) -> char {
        self.glyphs[idx % self.glyphs.len()]
    }

    /// All glyphs in order.
    #[must_use]
    pub fn as_slice(&self) -> &[char] {
        &self.glyphs
    }

    /// Whether `c` can be drawn from this alphabet.
    #[must_use]
    pub fn contains(&self, c: char) -> bool {
        self.glyphs.contains(&c)
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        let joined: String = GlyphSet::DEFAULT.iter().map(|set| set.glyphs()).collect();
        Self {
            glyphs: joined.chars().collect(),
        }
    }
}

impl FromStr for Alphabet {
    type Err = AlphabetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl std::fmt::Display for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for c in self.glyphs.iter() {
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_alphabet_is_rejected() {
        assert_eq!(Alphabet::new(""), Err(AlphabetError::Empty));
        assert_eq!(Alphabet::from_sets(&[]), Err(AlphabetError::Empty));
    }

    #[test]
    fn default_excludes_digits() {
        let alphabet = Alphabet::default();
        assert!(alphabet.contains('ア'));
        assert!(alphabet.contains('的'));
        assert!(alphabet.contains('#'));
        assert!(alphabet.contains('Q'));
        assert!(!alphabet.contains('7'));
        assert_eq!(
            alphabet.len(),
            JAPANESE.chars().count()
                + CHINESE.chars().count()
                + SYMBOLS.len()
                + LATIN.len()
        );
    }

    #[test]
    fn default_order_is_japanese_first() {
        let alphabet = Alphabet::default();
        assert_eq!(alphabet.glyph(0), 'ア');
        assert_eq!(alphabet.glyph(alphabet.len() - 1), 'Z');
    }

    #[test]
    fn glyph_counts_chars_not_bytes() {
        let alphabet = Alphabet::new("アイ").unwrap();
        assert_eq!(alphabet.len(), 2);
        assert_eq!(alphabet.glyph(1), 'イ');
        assert_eq!(alphabet.glyph(2), 'ア');
    }

    #[test]
    fn set_names_resolve() {
        let alphabet = Alphabet::from_set_names(&["Latin", "digits"]).unwrap();
        assert_eq!(alphabet.len(), 36);
        assert_eq!(
            Alphabet::from_set_names(&["klingon"]),
            Err(AlphabetError::UnknownSet("klingon".into()))
        );
    }

    #[test]
    fn display_round_trips() {
        let alphabet: Alphabet = "XYZ".parse().unwrap();
        assert_eq!(alphabet.to_string(), "XYZ");
    }
}
