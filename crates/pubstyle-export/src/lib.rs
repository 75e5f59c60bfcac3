//! Export coordination for Pubstyle.
//!
//! An export formats content with a registered style and hands the result to
//! several sibling services at once. Each target runs as its own task with
//! its own deadline; one slow or failing target never holds up another, and
//! the outcome reports every target individually:
//!
//! ```text
//! ExportRequest ──► validate ──► TemplateProcessor ──► ExportPayload
//!                                                          │
//!                       ┌──────────────────┬───────────────┤
//!                       ▼                  ▼               ▼
//!                  target task        target task     target task
//!                  (timeout)          (timeout)       (timeout)
//!                       └──────────────────┴───────────────┤
//!                                                          ▼
//!                                   ExportOutcome (all-succeeded |
//!                                   partial-success | all-failed)
//! ```
//!
//! The network is reached through [`TargetDispatcher`]; [`HttpDispatcher`]
//! posts the payload as JSON. The same seam probes each configured service's
//! health endpoint for [`ExportCoordinator::service_status`].

mod coordinator;
mod dispatch;
mod error;
mod format;
mod health;
mod outcome;
mod request;

pub use coordinator::{CoordinatorSettings, ExportCoordinator, Service};
pub use dispatch::{HttpDispatcher, TargetDispatcher};
pub use error::{DispatchError, ExportError};
pub use format::ExportFormat;
pub use health::{ServiceHealth, ServiceStatusReport};
pub use outcome::{AggregateStatus, ExportOutcome, TargetOutcome, TargetStatus, aggregate};
pub use request::{ExportPayload, ExportRequest, ResolvedTarget, TargetSpec};
