#![forbid(unsafe_code)]

//! Logging support.
//!
//! Re-exports tracing macros when the `tracing` feature is enabled. When the
//! feature is disabled, no-op macros with the same names are provided so call
//! sites compile either way.

#[cfg(feature = "tracing")]
pub use tracing::{debug, trace, warn};

#[cfg(not(feature = "tracing"))]
mod noop_macros {
    /// No-op debug macro when tracing is disabled.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }

    /// No-op trace macro when tracing is disabled.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }

    /// No-op warn macro when tracing is disabled.
    #[macro_export]
    macro_rules! warn {
        ($($arg:tt)*) => {};
    }
}

// Note: Macros are exported at crate root via #[macro_export],
// so we don't need to re-export noop_macros::* here.
