//! Export formats.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ExportError;

/// Document format a target is asked to produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Pdf,
    Docx,
    Html,
    Latex,
    Markdown,
}

impl ExportFormat {
    pub const ALL: [Self; 5] = [
        Self::Pdf,
        Self::Docx,
        Self::Html,
        Self::Latex,
        Self::Markdown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Html => "html",
            Self::Latex => "latex",
            Self::Markdown => "markdown",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Self::Html => "text/html",
            Self::Latex => "text/x-tex",
            Self::Markdown => "text/markdown",
        }
    }

    /// Styles known to render well in this format.
    pub fn compatible_styles(self) -> &'static [&'static str] {
        match self {
            Self::Pdf | Self::Docx | Self::Latex => &["ieee", "nature", "apa"],
            Self::Html => &["ieee", "nature", "apa", "web"],
            Self::Markdown => &["github", "basic"],
        }
    }

    /// Warning for a style outside [`Self::compatible_styles`].
    pub(crate) fn compatibility_warning(self, style_key: &str) -> Option<String> {
        (!self.compatible_styles().contains(&style_key))
            .then(|| format!("Style {style_key} may not be compatible with format {self}"))
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| ExportError::Validation(format!("Unsupported export format: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("latex".parse::<ExportFormat>().unwrap(), ExportFormat::Latex);
        let err = "rtf".parse::<ExportFormat>().unwrap_err();
        assert_eq!(err.to_string(), "Unsupported export format: rtf");
    }

    #[test]
    fn test_compatibility_warning() {
        assert_eq!(ExportFormat::Pdf.compatibility_warning("ieee"), None);
        assert_eq!(
            ExportFormat::Markdown.compatibility_warning("apa").as_deref(),
            Some("Style apa may not be compatible with format markdown")
        );
    }
}
