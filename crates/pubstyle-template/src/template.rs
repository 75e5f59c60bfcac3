//! Document template types.

use serde::Serialize;

/// Section layout expected for a kind of document.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct TemplateType {
    pub key: &'static str,
    pub name: &'static str,
    /// Sections the template knows about, in document order.
    pub sections: &'static [&'static str],
    /// Sections that must be present.
    pub required_sections: &'static [&'static str],
    /// Whether sections are expected in template order.
    pub section_order: bool,
    pub max_abstract_words: usize,
    /// Reference list format, `numeric` or `author_year`.
    pub reference_format: &'static str,
}

static TEMPLATES: [TemplateType; 4] = [
    TemplateType {
        key: "article",
        name: "Research Article",
        sections: &[
            "title",
            "authors",
            "abstract",
            "keywords",
            "introduction",
            "methodology",
            "results",
            "discussion",
            "conclusion",
            "references",
        ],
        required_sections: &["title", "authors", "abstract"],
        section_order: true,
        max_abstract_words: 250,
        reference_format: "numeric",
    },
    TemplateType {
        key: "conference_paper",
        name: "Conference Paper",
        sections: &[
            "title",
            "authors",
            "abstract",
            "keywords",
            "introduction",
            "approach",
            "experiments",
            "results",
            "conclusion",
            "references",
        ],
        required_sections: &["title", "authors", "abstract"],
        section_order: true,
        max_abstract_words: 150,
        reference_format: "numeric",
    },
    TemplateType {
        key: "technical_report",
        name: "Technical Report",
        sections: &[
            "title",
            "authors",
            "executive_summary",
            "introduction",
            "background",
            "analysis",
            "findings",
            "recommendations",
            "appendices",
        ],
        required_sections: &["title", "authors", "executive_summary"],
        section_order: false,
        max_abstract_words: 500,
        reference_format: "author_year",
    },
    TemplateType {
        key: "thesis",
        name: "Thesis/Dissertation",
        sections: &[
            "title_page",
            "abstract",
            "acknowledgments",
            "table_of_contents",
            "introduction",
            "literature_review",
            "methodology",
            "results",
            "discussion",
            "conclusion",
            "references",
            "appendices",
        ],
        required_sections: &["title_page", "abstract", "introduction"],
        section_order: true,
        max_abstract_words: 350,
        reference_format: "author_year",
    },
];

/// Look up a template type by key.
pub fn template(key: &str) -> Option<&'static TemplateType> {
    TEMPLATES.iter().find(|t| t.key == key)
}

/// All template types.
pub fn templates() -> &'static [TemplateType] {
    &TEMPLATES
}
