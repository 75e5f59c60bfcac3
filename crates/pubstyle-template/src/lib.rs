//! Template processing for Pubstyle.
//!
//! Applies a registered publication style to document content: resolves
//! style attributes from the style defaults and request overrides, splits the
//! content into sections, and extracts citations, equations and
//! cross-references.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//!
//! use pubstyle_styles::StyleRegistry;
//! use pubstyle_template::{TemplateProcessor, TemplateRequest};
//!
//! let registry = Arc::new(StyleRegistry::builtin().unwrap());
//! let processor = TemplateProcessor::new(registry);
//!
//! let request = TemplateRequest::new("ieee", "# Abstract\nStyles [1].")
//!     .with_override("column_count", serde_json::json!(1));
//! let result = processor.apply(&request).unwrap();
//!
//! assert_eq!(result.attributes.column_count, 1);
//! assert_eq!(result.citations.total_citations, 1);
//! ```

mod analysis;
mod error;
mod overrides;
mod processor;
mod request;
mod sections;
mod template;

pub use analysis::{Citation, CrossReference, Equation, EquationKind, ReferenceKind};
pub use error::TemplateError;
pub use overrides::SUPPORTED_OVERRIDES;
pub use processor::TemplateProcessor;
pub use request::{
    CitationSummary, ContentStatistics, ContentType, FormattedSection, SectionValidation,
    StyleAttributes, TemplateRequest, TemplateResult, TocEntry,
};
pub use template::{TemplateType, template, templates};
