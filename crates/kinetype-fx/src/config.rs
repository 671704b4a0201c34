#![forbid(unsafe_code)]

//! Page effect configuration.
//!
//! Every field has a default, so a partial JSON object (or `{}`) is a valid
//! configuration:
//!
//! ```
//! use kinetype_fx::EffectsConfig;
//!
//! let config = EffectsConfig::from_json(r#"{ "hover_duration_ms": 200 }"#).unwrap();
//! assert_eq!(config.hover_duration_ms, 200);
//! assert_eq!(config.reveal_duration_ms, 900);
//! ```

use core::time::Duration;

use kinetype_text::{Alphabet, AlphabetError};
use serde::{Deserialize, Serialize};

/// Selectors auto-tagged with the hover attribute during setup.
pub const AUTO_TAG_SELECTORS: [&str; 6] = [
    ".card-link .link-text",
    ".footer-link span",
    ".example-link span",
    ".install-links a",
    ".slot-button span",
    ".action-links a span",
];

/// Ancestors that receive hover listeners in place of the text element.
pub const INTERACTIVE_ANCESTORS: &str = "a, button, .feature-card, .step, .showcase-card, .tab";

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    /// JSON was malformed or had the wrong shape.
    Json(serde_json::Error),
    /// Reveal threshold outside `[0, 1]`.
    InvalidThreshold(f64),
    /// A selector or attribute field was empty.
    EmptySelector(&'static str),
    /// Alphabet could not be built.
    Alphabet(AlphabetError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid effects config: {err}"),
            Self::InvalidThreshold(t) => {
                write!(f, "reveal threshold {t} is outside 0.0..=1.0")
            }
            Self::EmptySelector(field) => write!(f, "config field `{field}` is empty"),
            Self::Alphabet(err) => write!(f, "invalid alphabet: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::Alphabet(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<AlphabetError> for ConfigError {
    fn from(err: AlphabetError) -> Self {
        Self::Alphabet(err)
    }
}

/// Tunables for [`PageEffects`](crate::PageEffects).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    /// Hover session length.
    pub hover_duration_ms: u64,
    /// Viewport reveal session length.
    pub reveal_duration_ms: u64,
    /// Length used by [`PageEffects::scramble`](crate::PageEffects::scramble).
    pub default_duration_ms: u64,
    /// Visible fraction at which a reveal fires.
    pub reveal_threshold: f64,
    /// Marker attribute for hover elements.
    pub hover_attr: String,
    /// Marker attribute for reveal elements; a non-empty value overrides the text.
    pub reveal_attr: String,
    /// Attribute caching an element's hover text after first activation.
    pub cache_attr: String,
    pub auto_tag_selectors: Vec<String>,
    pub interactive_ancestors: String,
    /// Literal glyphs; wins over `glyph_sets` when set.
    pub alphabet: Option<String>,
    /// Built-in glyph set names (`japanese`, `chinese`, `symbols`, `numbers`, `latin`).
    pub glyph_sets: Vec<String>,
    /// Fixed glyph seed for reproducible runs.
    pub seed: Option<u64>,
    /// Skip all setup apart from marking the page ready.
    pub reduced_motion: bool,
    /// Element receiving `data-phase="ready"`.
    pub root_selector: String,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            hover_duration_ms: 350,
            reveal_duration_ms: 900,
            default_duration_ms: 800,
            reveal_threshold: 0.15,
            hover_attr: "data-scramble".to_string(),
            reveal_attr: "data-scramble-reveal".to_string(),
            cache_attr: "data-original-text".to_string(),
            auto_tag_selectors: AUTO_TAG_SELECTORS.iter().map(|s| s.to_string()).collect(),
            interactive_ancestors: INTERACTIVE_ANCESTORS.to_string(),
            alphabet: None,
            glyph_sets: vec![
                "japanese".to_string(),
                "chinese".to_string(),
                "symbols".to_string(),
                "latin".to_string(),
            ],
            seed: None,
            reduced_motion: false,
            root_selector: "body".to_string(),
        }
    }
}

impl EffectsConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize back to JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check ranges and required fields.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.reveal_threshold) {
            return Err(ConfigError::InvalidThreshold(self.reveal_threshold));
        }
        let required = [
            ("hover_attr", self.hover_attr.as_str()),
            ("reveal_attr", self.reveal_attr.as_str()),
            ("cache_attr", self.cache_attr.as_str()),
            ("interactive_ancestors", self.interactive_ancestors.as_str()),
            ("root_selector", self.root_selector.as_str()),
        ];
        if let Some((field, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(ConfigError::EmptySelector(*field));
        }
        if self.auto_tag_selectors.iter().any(|s| s.trim().is_empty()) {
            return Err(ConfigError::EmptySelector("auto_tag_selectors"));
        }
        self.alphabet()?;
        Ok(())
    }

    /// Build the configured alphabet.
    pub fn alphabet(&self) -> Result<Alphabet, ConfigError> {
        Ok(match &self.alphabet {
            Some(glyphs) => Alphabet::new(glyphs)?,
            None => Alphabet::from_set_names(self.glyph_sets.as_slice())?,
        })
    }

    /// Set the hover duration.
    #[must_use]
    pub fn with_hover_duration_ms(mut self, ms: u64) -> Self {
        self.hover_duration_ms = ms;
        self
    }

    /// Set the reveal duration.
    #[must_use]
    pub fn with_reveal_duration_ms(mut self, ms: u64) -> Self {
        self.reveal_duration_ms = ms;
        self
    }

    /// Use a literal alphabet.
    #[must_use]
    pub fn with_alphabet(mut self, glyphs: impl Into<String>) -> Self {
        self.alphabet = Some(glyphs.into());
        self
    }

    /// Fix the glyph seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Toggle reduced motion.
    #[must_use]
    pub fn with_reduced_motion(mut self, reduced: bool) -> Self {
        self.reduced_motion = reduced;
        self
    }

    #[must_use]
    pub fn hover_duration(&self) -> Duration {
        Duration::from_millis(self.hover_duration_ms)
    }

    #[must_use]
    pub fn reveal_duration(&self) -> Duration {
        Duration::from_millis(self.reveal_duration_ms)
    }

    #[must_use]
    pub fn default_duration(&self) -> Duration {
        Duration::from_millis(self.default_duration_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_object_is_default() {
        assert_eq!(EffectsConfig::from_json("{}").unwrap(), EffectsConfig::default());
    }

    #[test]
    fn default_alphabet_excludes_digits() {
        let alphabet = EffectsConfig::default().alphabet().unwrap();
        assert!(alphabet.contains('ア'));
        assert!(alphabet.contains('Z'));
        assert!(!alphabet.contains('7'));
    }

    #[test]
    fn literal_alphabet_wins_over_sets() {
        let config = EffectsConfig::default().with_alphabet("01");
        assert_eq!(config.alphabet().unwrap().as_slice(), &['0', '1']);
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let err = EffectsConfig::from_json(r#"{"reveal_threshold": 1.5}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidThreshold(t) if t == 1.5));
    }

    #[test]
    fn rejects_empty_selectors() {
        let err = EffectsConfig::from_json(r#"{"root_selector": " "}"#).unwrap_err();
        assert_eq!(err.to_string(), "config field `root_selector` is empty");
        let err = EffectsConfig::from_json(r#"{"auto_tag_selectors": [""]}"#).unwrap_err();
        assert!(matches!(err, ConfigError::EmptySelector("auto_tag_selectors")));
    }

    #[test]
    fn rejects_bad_alphabets() {
        let err = EffectsConfig::from_json(r#"{"alphabet": ""}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Alphabet(AlphabetError::Empty)));
        let err = EffectsConfig::from_json(r#"{"glyph_sets": ["runes"]}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Alphabet(AlphabetError::UnknownSet(_))));
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = EffectsConfig::from_json("{ nope").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn json_round_trip_preserves_overrides() {
        let config = EffectsConfig::default()
            .with_hover_duration_ms(200)
            .with_seed(42)
            .with_reduced_motion(true);
        let json = config.to_json().unwrap();
        assert_eq!(EffectsConfig::from_json(&json).unwrap(), config);
    }
}
