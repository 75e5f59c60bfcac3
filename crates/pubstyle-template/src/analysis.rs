//! Extraction of citations, equations and cross-references from section text.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Numeric citations: `[1]`, `[2, 3]`.
static NUMERIC_CITATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(\d+(?:,\s*\d+)*)\]").unwrap());

/// Author-year citations: `(Smith, 2020)`, `(Smith et al. 2019)`.
static AUTHOR_YEAR_CITATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(([A-Za-z]+(?:\s+et\s+al\.)?),?\s+(\d{4})\)").unwrap()
});

/// Display math first so `$$x$$` is not also read as inline `$x$`.
static EQUATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\$([^$]+)\$\$|\$([^$]+)\$").unwrap());

static REFERENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(Figure|Table|Equation)\s+(\d+)").unwrap());

/// A citation found in the text. `position` is a byte span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Citation {
    Numeric {
        text: String,
        numbers: Vec<u32>,
        position: (usize, usize),
    },
    AuthorYear {
        text: String,
        author: String,
        year: u16,
        position: (usize, usize),
    },
}

impl Citation {
    /// Keys identifying the cited works (`"3"`, `"Smith_2020"`).
    pub fn keys(&self) -> Vec<String> {
        match self {
            Self::Numeric { numbers, .. } => numbers.iter().map(u32::to_string).collect(),
            Self::AuthorYear { author, year, .. } => vec![format!("{author}_{year}")],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquationKind {
    Inline,
    Display,
}

/// A `$...$` or `$$...$$` equation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equation {
    pub kind: EquationKind,
    pub content: String,
    pub position: (usize, usize),
    /// Identifier unique within the section, e.g. `eq_display_1`.
    pub id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Figure,
    Table,
    Equation,
}

/// A textual reference such as `Figure 2`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossReference {
    pub kind: ReferenceKind,
    pub number: u32,
    pub text: String,
    pub position: (usize, usize),
}

pub(crate) fn extract_citations(text: &str) -> Vec<Citation> {
    let numeric = NUMERIC_CITATION_RE.captures_iter(text).map(|caps| {
        let whole = &caps[0];
        let span = caps.get(0).map_or((0, 0), |m| (m.start(), m.end()));
        Citation::Numeric {
            text: whole.to_owned(),
            numbers: caps[1]
                .split(',')
                .filter_map(|n| n.trim().parse().ok())
                .collect(),
            position: span,
        }
    });

    let author_year = AUTHOR_YEAR_CITATION_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let span = caps.get(0).map_or((0, 0), |m| (m.start(), m.end()));
            Some(Citation::AuthorYear {
                text: caps[0].to_owned(),
                author: caps[1].to_owned(),
                year: caps[2].parse().ok()?,
                position: span,
            })
        });

    numeric.chain(author_year).collect()
}

pub(crate) fn extract_equations(text: &str) -> Vec<Equation> {
    let mut inline = 0;
    let mut display = 0;

    EQUATION_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let span = caps.get(0).map(|m| (m.start(), m.end()))?;
            let (kind, content, id) = if let Some(m) = caps.get(1) {
                display += 1;
                (EquationKind::Display, m.as_str(), format!("eq_display_{display}"))
            } else {
                inline += 1;
                (EquationKind::Inline, caps.get(2)?.as_str(), format!("eq_inline_{inline}"))
            };
            Some(Equation {
                kind,
                content: content.to_owned(),
                position: span,
                id,
            })
        })
        .collect()
}

pub(crate) fn extract_references(text: &str) -> Vec<CrossReference> {
    REFERENCE_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let kind = match &caps[1] {
                "Figure" => ReferenceKind::Figure,
                "Table" => ReferenceKind::Table,
                _ => ReferenceKind::Equation,
            };
            let span = caps.get(0).map(|m| (m.start(), m.end()))?;
            Some(CrossReference {
                kind,
                number: caps[2].parse().ok()?,
                text: caps[0].to_owned(),
                position: span,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_numeric_citations() {
        let citations = extract_citations("Prior work [1] and [2, 3] agrees.");

        assert_eq!(
            citations,
            vec![
                Citation::Numeric {
                    text: "[1]".to_owned(),
                    numbers: vec![1],
                    position: (11, 14),
                },
                Citation::Numeric {
                    text: "[2, 3]".to_owned(),
                    numbers: vec![2, 3],
                    position: (19, 25),
                },
            ]
        );
    }

    #[test]
    fn test_author_year_citations() {
        let citations = extract_citations("As shown (Smith et al., 2020) and (Jones 2018).");

        let keys: Vec<_> = citations.iter().flat_map(Citation::keys).collect();
        assert_eq!(keys, vec!["Smith et al._2020", "Jones_2018"]);
    }

    #[test]
    fn test_display_equation_not_counted_as_inline() {
        let equations = extract_equations("Energy $$E = mc^2$$ and speed $v$.");

        assert_eq!(equations.len(), 2);
        assert_eq!(equations[0].kind, EquationKind::Display);
        assert_eq!(equations[0].content, "E = mc^2");
        assert_eq!(equations[0].id, "eq_display_1");
        assert_eq!(equations[1].kind, EquationKind::Inline);
        assert_eq!(equations[1].content, "v");
        assert_eq!(equations[1].id, "eq_inline_1");
    }

    #[test]
    fn test_cross_references() {
        let references = extract_references("See Figure 2, Table 1 and Equation 3.");

        let found: Vec<_> = references.iter().map(|r| (r.kind, r.number)).collect();
        assert_eq!(
            found,
            vec![
                (ReferenceKind::Figure, 2),
                (ReferenceKind::Table, 1),
                (ReferenceKind::Equation, 3)
            ]
        );
    }

    #[test]
    fn test_citation_serializes_with_type_tag() {
        let citation = Citation::Numeric {
            text: "[4]".to_owned(),
            numbers: vec![4],
            position: (0, 3),
        };

        let json = serde_json::to_value(&citation).unwrap();

        assert_eq!(json["type"], "numeric");
        assert_eq!(json["position"], serde_json::json!([0, 3]));
    }
}
