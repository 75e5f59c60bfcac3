//! Export outcome types and aggregation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::format::ExportFormat;

/// Result of dispatching to one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TargetStatus {
    Succeeded,
    Failed { reason: String },
    TimedOut,
}

impl TargetStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

/// Per-target entry of an [`ExportOutcome`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetOutcome {
    pub name: String,
    #[serde(flatten)]
    pub status: TargetStatus,
    /// Wall time from dispatch to resolution.
    pub elapsed_ms: u64,
}

/// Status of a whole export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AggregateStatus {
    AllSucceeded,
    PartialSuccess,
    AllFailed,
}

/// Derive the export status from target statuses.
///
/// Timed out targets count as not succeeded.
pub fn aggregate(targets: &[TargetOutcome]) -> AggregateStatus {
    let succeeded = targets.iter().filter(|t| t.status.is_success()).count();
    if succeeded == 0 {
        AggregateStatus::AllFailed
    } else if succeeded == targets.len() {
        AggregateStatus::AllSucceeded
    } else {
        AggregateStatus::PartialSuccess
    }
}

/// Result of a coordinated export, one entry per requested target in
/// request order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportOutcome {
    pub export_id: Uuid,
    pub style_key: String,
    pub format: ExportFormat,
    pub status: AggregateStatus,
    pub targets: Vec<TargetOutcome>,
    pub warnings: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}
