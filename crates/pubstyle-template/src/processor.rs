//! Applying a style to content.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use pubstyle_styles::StyleRegistry;
use uuid::Uuid;

use crate::analysis::{extract_citations, extract_equations, extract_references};
use crate::error::TemplateError;
use crate::overrides;
use crate::request::{
    CitationSummary, ContentStatistics, FormattedSection, SectionValidation, TemplateRequest,
    TemplateResult, TocEntry,
};
use crate::sections::{self, Sections, section_title};
use crate::template::{TemplateType, template};

/// Applies registered styles to document content.
///
/// Pure and synchronous: no I/O, and a failure for a given request is
/// always the same failure.
#[derive(Debug, Clone)]
pub struct TemplateProcessor {
    registry: Arc<StyleRegistry>,
}

impl TemplateProcessor {
    pub fn new(registry: Arc<StyleRegistry>) -> Self {
        Self { registry }
    }

    /// Style registry used for lookups.
    pub fn registry(&self) -> &StyleRegistry {
        &self.registry
    }

    /// Apply the requested style to the request content.
    ///
    /// Every check runs before any output is built, so a request either
    /// yields a fully styled result or an error.
    pub fn apply(&self, request: &TemplateRequest) -> Result<TemplateResult, TemplateError> {
        if request.style_key.is_empty() {
            return Err(TemplateError::MissingStyle);
        }
        let style = self
            .registry
            .get(&request.style_key)
            .map_err(|_| TemplateError::UnknownStyle(request.style_key.clone()))?;
        let template = template(&request.template_type)
            .ok_or_else(|| TemplateError::UnknownTemplate(request.template_type.clone()))?;
        if request.content.trim().is_empty() {
            return Err(TemplateError::EmptyContent);
        }

        let (attributes, warnings) = overrides::resolve(&style, &request.overrides)?;
        let sections = sections::parse(&request.content, request.content_type)?;

        let formatted = format_sections(&sections);
        let validation = validate_sections(&sections, template);
        let table_of_contents = table_of_contents(&formatted, template);
        let citations = summarize_citations(&formatted, &attributes.citation_style);
        let statistics = statistics(&formatted);

        tracing::debug!(
            style = %style.key,
            template = template.key,
            sections = formatted.len(),
            warnings = warnings.len(),
            "Applied style"
        );

        Ok(TemplateResult {
            style_key: style.key.clone(),
            template_type: template.key.to_owned(),
            attributes,
            sections: formatted,
            table_of_contents,
            citations,
            validation,
            statistics,
            warnings,
            processing_id: Uuid::new_v4(),
        })
    }
}

fn format_sections(sections: &Sections) -> Vec<FormattedSection> {
    sections
        .iter()
        .map(|(name, text)| FormattedSection {
            name: name.to_owned(),
            title: section_title(name),
            content: text.to_owned(),
            word_count: text.split_whitespace().count(),
            citations: extract_citations(text),
            equations: extract_equations(text),
            references: extract_references(text),
        })
        .collect()
}

fn validate_sections(sections: &Sections, template: &TemplateType) -> SectionValidation {
    let mut validation = SectionValidation {
        valid: true,
        ..SectionValidation::default()
    };

    for required in template.required_sections {
        if !sections.contains(required) {
            validation.valid = false;
            validation.missing_required.push((*required).to_owned());
            validation
                .errors
                .push(format!("Missing required section: {required}"));
        }
    }

    for (name, _) in sections.iter() {
        if !template.sections.contains(&name) {
            validation.unexpected_sections.push(name.to_owned());
            validation
                .warnings
                .push(format!("Unexpected section: {name}"));
        }
    }

    if let Some(text) = sections.get("abstract") {
        let words = text.split_whitespace().count();
        if words > template.max_abstract_words {
            validation.warnings.push(format!(
                "Abstract exceeds maximum word count: {words}/{}",
                template.max_abstract_words
            ));
        }
    }

    validation
}

fn table_of_contents(sections: &[FormattedSection], template: &TemplateType) -> Vec<TocEntry> {
    template
        .sections
        .iter()
        .enumerate()
        .filter_map(|(i, name)| {
            let section = sections.iter().find(|s| s.name == *name)?;
            Some(TocEntry {
                section: section.name.clone(),
                title: section.title.clone(),
                order: i + 1,
                word_count: section.word_count,
            })
        })
        .collect()
}

fn summarize_citations(sections: &[FormattedSection], citation_style: &str) -> CitationSummary {
    let mut seen = HashSet::new();
    let mut keys = Vec::new();
    let mut total = 0;

    for citation in sections.iter().flat_map(|s| &s.citations) {
        total += 1;
        for key in citation.keys() {
            if seen.insert(key.clone()) {
                keys.push(key);
            }
        }
    }

    CitationSummary {
        total_citations: total,
        unique_citations: keys.len(),
        citation_style: citation_style.to_owned(),
        keys,
    }
}

fn statistics(sections: &[FormattedSection]) -> ContentStatistics {
    ContentStatistics {
        total_words: sections.iter().map(|s| s.word_count).sum(),
        total_sections: sections.len(),
        total_citations: sections.iter().map(|s| s.citations.len()).sum(),
        total_equations: sections.iter().map(|s| s.equations.len()).sum(),
        total_references: sections.iter().map(|s| s.references.len()).sum(),
        section_breakdown: sections
            .iter()
            .map(|s| (s.name.clone(), s.word_count))
            .collect::<BTreeMap<_, _>>(),
    }
}
