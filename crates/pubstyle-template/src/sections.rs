//! Splitting content into named sections.

use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use serde_json::Value;

use crate::error::TemplateError;
use crate::request::ContentType;

/// Section used for text that precedes any heading.
const LEADING_SECTION: &str = "introduction";

/// Raw section text keyed by normalized name, in document order.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct Sections(Vec<(String, String)>);

impl Sections {
    /// Append text to a section, creating it on first use.
    fn push(&mut self, name: String, text: &str) {
        let text = tidy(text);
        if text.is_empty() {
            return;
        }
        if let Some((_, existing)) = self.0.iter_mut().find(|(n, _)| *n == name) {
            existing.push('\n');
            existing.push_str(&text);
        } else {
            self.0.push((name, text));
        }
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|(n, _)| n == name)
    }

    pub(crate) fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, text)| text.as_str())
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, t)| (n.as_str(), t.as_str()))
    }
}

/// Parse content according to its declared type.
pub(crate) fn parse(content: &str, content_type: ContentType) -> Result<Sections, TemplateError> {
    match content_type {
        ContentType::Markdown => Ok(parse_markdown(content)),
        ContentType::Text => {
            let mut sections = Sections::default();
            sections.push(LEADING_SECTION.to_owned(), content);
            Ok(sections)
        }
        ContentType::Json => parse_json(content),
    }
}

/// Split markdown at headings, keeping the raw body text between them.
fn parse_markdown(content: &str) -> Sections {
    let mut sections = Sections::default();
    let mut current = LEADING_SECTION.to_owned();
    let mut body_start = 0;
    let mut heading: Option<(usize, String)> = None;

    for (event, range) in Parser::new(content).into_offset_iter() {
        match event {
            Event::Start(Tag::Heading { .. }) => {
                sections.push(current.clone(), &content[body_start..range.start]);
                heading = Some((range.start, String::new()));
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, title)) = heading.as_mut() {
                    title.push_str(&text);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((_, title)) = heading.take() {
                    current = normalize_section_name(&title);
                }
                body_start = range.end;
            }
            _ => {}
        }
    }
    sections.push(current, &content[body_start..]);

    sections
}

/// Parse a JSON object of section name to section text.
fn parse_json(content: &str) -> Result<Sections, TemplateError> {
    let malformed = |reason: String| TemplateError::MalformedContent {
        content_type: ContentType::Json,
        reason,
    };

    let value: Value = serde_json::from_str(content).map_err(|e| malformed(e.to_string()))?;
    let Value::Object(map) = value else {
        return Err(malformed("expected an object of sections".to_owned()));
    };

    let mut sections = Sections::default();
    for (name, text) in map {
        let Value::String(text) = text else {
            return Err(malformed(format!("section {name} must be a string")));
        };
        sections.push(normalize_section_name(&name), &text);
    }

    if sections.0.is_empty() {
        return Err(TemplateError::EmptyContent);
    }
    Ok(sections)
}

/// Trim lines and drop blank ones.
fn tidy(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Map heading text to a canonical section name.
pub(crate) fn normalize_section_name(heading: &str) -> String {
    let lowered = heading.trim().to_lowercase();
    let canonical = match lowered.as_str() {
        "methods" => "methodology",
        "experimental setup" => "experiments",
        "literature review" => "literature_review",
        "conclusions" => "conclusion",
        "bibliography" => "references",
        "acknowledgements" => "acknowledgments",
        "appendix" => "appendices",
        "author" => "authors",
        _ => return lowered.split_whitespace().collect::<Vec<_>>().join("_"),
    };
    canonical.to_owned()
}

/// Display title for a section name: `literature_review` -> `Literature Review`.
pub(crate) fn section_title(name: &str) -> String {
    name.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}
