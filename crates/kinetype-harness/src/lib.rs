#![forbid(unsafe_code)]

//! Headless host for kinetype.
//!
//! - [`MemoryDocument`]: an in-memory element tree implementing
//!   [`Document`](kinetype_core::Document), with a tiny layout model so box
//!   locking is observable.
//! - [`MemoryViewport`]: records `observe`/`unobserve` calls.
//! - [`selector`]: the CSS selector subset both understand.
//!
//! # Quick Start
//!
//! ```
//! use kinetype_core::Document;
//! use kinetype_harness::MemoryDocument;
//!
//! let mut doc = MemoryDocument::new();
//! let link = doc.append(doc.body(), "a");
//! let label = doc.append(link, "span");
//! doc.set_attribute(label, "data-scramble", "");
//! doc.set_markup(label, "Docs");
//!
//! assert_eq!(doc.query_all("[data-scramble]"), vec![label]);
//! assert_eq!(doc.closest(label, "a, button"), Some(link));
//! ```

pub mod document;
pub mod selector;
pub mod viewport;

pub use document::{LayoutMetrics, MemoryDocument};
pub use selector::{SelectorError, SelectorList};
pub use viewport::{MemoryViewport, ViewportCall};
