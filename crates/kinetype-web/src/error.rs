#![forbid(unsafe_code)]

//! Errors raised while wiring effects into a browser page.

use kinetype_fx::ConfigError;

/// Browser host errors.
#[derive(Debug)]
pub enum WebHostError {
    /// No global `window` (e.g. running in a worker).
    NoWindow,
    /// `window.document` is missing.
    NoDocument,
    /// Options passed from JS did not form a valid configuration.
    Config(ConfigError),
    /// A DOM call threw; carries the stringified exception.
    Js(String),
}

impl std::fmt::Display for WebHostError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoWindow => write!(f, "no global window"),
            Self::NoDocument => write!(f, "window has no document"),
            Self::Config(err) => write!(f, "{err}"),
            Self::Js(msg) => write!(f, "DOM call failed: {msg}"),
        }
    }
}

impl std::error::Error for WebHostError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for WebHostError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Parse the JSON options object handed to the page constructor.
///
/// `None` or an empty string means defaults.
pub fn parse_options(json: Option<&str>) -> Result<kinetype_fx::EffectsConfig, WebHostError> {
    match json.map(str::trim) {
        None | Some("") => Ok(kinetype_fx::EffectsConfig::default()),
        Some(json) => Ok(kinetype_fx::EffectsConfig::from_json(json)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_options_mean_defaults() {
        assert_eq!(
            parse_options(None).unwrap(),
            kinetype_fx::EffectsConfig::default()
        );
        assert_eq!(
            parse_options(Some("  ")).unwrap(),
            kinetype_fx::EffectsConfig::default()
        );
    }

    #[test]
    fn config_errors_are_wrapped() {
        let err = parse_options(Some(r#"{"reveal_threshold": 2}"#)).unwrap_err();
        assert!(matches!(err, WebHostError::Config(ConfigError::InvalidThreshold(_))));
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.to_string(), "reveal threshold 2 is outside 0.0..=1.0");
    }
}
