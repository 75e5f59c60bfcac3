//! Publication style definitions for Pubstyle.
//!
//! This crate provides:
//! - [`StyleDefinition`]: typography, layout and citation settings of a style
//! - [`StyleRegistry`]: the ordered, read-only set of styles served by the
//!   process, seeded with IEEE, Nature and APA
//! - [`validate_document`]: structural checks for style documents
//!
//! # Quick Start
//!
//! ```
//! use pubstyle_styles::StyleRegistry;
//!
//! let registry = StyleRegistry::builtin().unwrap();
//! let ieee = registry.get("ieee").unwrap();
//! assert_eq!(ieee.layout.column_count, 2);
//! ```

mod builtin;
mod error;
mod registry;
mod style;
mod validate;

pub use error::StyleError;
pub use registry::StyleRegistry;
pub use style::{
    CaptionStyle, Captions, CitationStyle, Layout, Margins, StyleDefinition, StyleSource,
    StyleSummary, TextBlockStyle, Typography,
};
pub use validate::{StyleValidation, validate_document};
