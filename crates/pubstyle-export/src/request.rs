//! Export request and dispatch payload types.

use std::collections::BTreeMap;
use std::time::Duration;

use pubstyle_styles::StyleDefinition;
use pubstyle_template::{ContentType, TemplateRequest, TemplateResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::format::ExportFormat;

fn default_format() -> String {
    ExportFormat::default().as_str().to_owned()
}

fn default_template_type() -> String {
    "article".to_owned()
}

/// A request to export content in a style to several targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportRequest {
    #[serde(default, alias = "style")]
    pub style_key: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, alias = "target_services")]
    pub targets: Vec<TargetSpec>,
    /// Format name; checked against [`ExportFormat`] during validation.
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default = "default_template_type")]
    pub template_type: String,
    #[serde(default)]
    pub content_type: ContentType,
    #[serde(default)]
    pub overrides: BTreeMap<String, Value>,
    /// Opaque options forwarded to every target.
    #[serde(default, alias = "options")]
    pub export_options: BTreeMap<String, Value>,
}

impl ExportRequest {
    /// Create a PDF export of markdown article content.
    pub fn new(
        style_key: impl Into<String>,
        content: impl Into<String>,
        targets: Vec<TargetSpec>,
    ) -> Self {
        Self {
            style_key: style_key.into(),
            content: content.into(),
            targets,
            format: default_format(),
            template_type: default_template_type(),
            content_type: ContentType::default(),
            overrides: BTreeMap::new(),
            export_options: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    #[must_use]
    pub fn with_override(mut self, option: impl Into<String>, value: Value) -> Self {
        self.overrides.insert(option.into(), value);
        self
    }

    #[must_use]
    pub fn with_export_option(mut self, option: impl Into<String>, value: Value) -> Self {
        self.export_options.insert(option.into(), value);
        self
    }

    pub(crate) fn template_request(&self) -> TemplateRequest {
        TemplateRequest {
            style_key: self.style_key.clone(),
            content: self.content.clone(),
            content_type: self.content_type,
            template_type: self.template_type.clone(),
            overrides: self.overrides.clone(),
        }
    }
}

/// An export target as written in a request.
///
/// Either the name of a configured sibling service or a fully described
/// endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TargetSpec {
    Service(String),
    Explicit {
        name: String,
        base_url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timeout_ms: Option<u64>,
    },
}

impl TargetSpec {
    pub fn name(&self) -> &str {
        match self {
            Self::Service(name) | Self::Explicit { name, .. } => name,
        }
    }
}

impl From<&str> for TargetSpec {
    fn from(name: &str) -> Self {
        Self::Service(name.to_owned())
    }
}

/// A target ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub name: String,
    pub base_url: String,
    /// Deadline for the whole dispatch call.
    pub timeout: Duration,
}

/// Body sent to every target of an export.
#[derive(Debug, Clone, Serialize)]
pub struct ExportPayload {
    pub export_id: Uuid,
    pub style_key: String,
    pub format: ExportFormat,
    pub style: StyleDefinition,
    pub document: TemplateResult,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub export_options: BTreeMap<String, Value>,
}
