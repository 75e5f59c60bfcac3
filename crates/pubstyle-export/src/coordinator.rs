//! Concurrent dispatch of one export to many targets.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use pubstyle_styles::StyleRegistry;
use pubstyle_template::TemplateProcessor;
use serde::Serialize;
use tokio::task::JoinSet;
use tokio::time::{Instant, timeout};
use uuid::Uuid;

use crate::dispatch::TargetDispatcher;
use crate::error::{DispatchError, ExportError};
use crate::format::ExportFormat;
use crate::health::{ServiceHealth, ServiceStatusReport};
use crate::outcome::{ExportOutcome, TargetOutcome, TargetStatus, aggregate};
use crate::request::{ExportPayload, ExportRequest, ResolvedTarget, TargetSpec};

/// A sibling service that can be named as an export target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Service {
    pub base_url: String,
    /// Deadline for this service, overriding the coordinator default.
    #[serde(rename = "timeout_ms", serialize_with = "serialize_ms")]
    pub timeout: Option<Duration>,
    /// Path probed by [`ExportCoordinator::service_status`].
    pub health_path: String,
}

impl Service {
    fn health_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.health_path)
    }
}

#[allow(clippy::ref_option)]
fn serialize_ms<S: serde::Serializer>(
    timeout: &Option<Duration>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match timeout {
        Some(t) => serializer.serialize_some(&duration_ms(*t)),
        None => serializer.serialize_none(),
    }
}

/// Coordinator settings.
#[derive(Debug, Clone)]
pub struct CoordinatorSettings {
    /// Deadline for targets with no more specific timeout.
    pub default_timeout: Duration,
    /// Configured sibling services, keyed by name.
    pub services: BTreeMap<String, Service>,
}

impl Default for CoordinatorSettings {
    fn default() -> Self {
        Self {
            default_timeout: Duration::from_secs(10),
            services: BTreeMap::new(),
        }
    }
}

/// Fans an export out to its targets and gathers one outcome per target.
///
/// Every call is independent: targets, outcomes and the export id are owned
/// by the call. Dropping the future returned by [`Self::coordinate`] aborts
/// any target call still in flight.
#[derive(Debug)]
pub struct ExportCoordinator<D> {
    processor: TemplateProcessor,
    dispatcher: Arc<D>,
    settings: CoordinatorSettings,
}

impl<D: TargetDispatcher> ExportCoordinator<D> {
    pub fn new(registry: Arc<StyleRegistry>, dispatcher: D, settings: CoordinatorSettings) -> Self {
        Self {
            processor: TemplateProcessor::new(registry),
            dispatcher: Arc::new(dispatcher),
            settings,
        }
    }

    /// Configured sibling services.
    pub fn services(&self) -> &BTreeMap<String, Service> {
        &self.settings.services
    }

    /// Validate the request, dispatch it to all targets concurrently and
    /// aggregate the results.
    ///
    /// Returns an error only if the request is rejected before dispatch.
    /// Target failures and timeouts are reported in the outcome.
    pub async fn coordinate(&self, request: ExportRequest) -> Result<ExportOutcome, ExportError> {
        let started_at = Utc::now();
        let (format, payload, warnings) = self.prepare(&request)?;
        let payload = Arc::new(payload);

        tracing::info!(
            export_id = %payload.export_id,
            style = %payload.style_key,
            %format,
            targets = request.targets.len(),
            "Dispatching export"
        );

        let mut slots: Vec<Option<TargetOutcome>> = vec![None; request.targets.len()];
        let mut tasks = JoinSet::new();
        let mut task_index = HashMap::new();

        for (index, spec) in request.targets.iter().enumerate() {
            let target = match self.resolve(spec) {
                Ok(target) => target,
                Err(e) => {
                    tracing::warn!(service = spec.name(), "Export target is not configured");
                    slots[index] = Some(TargetOutcome {
                        name: spec.name().to_owned(),
                        status: TargetStatus::Failed {
                            reason: e.to_string(),
                        },
                        elapsed_ms: 0,
                    });
                    continue;
                }
            };

            let dispatcher = Arc::clone(&self.dispatcher);
            let payload = Arc::clone(&payload);
            let handle = tasks.spawn(async move {
                let started = Instant::now();
                let status =
                    match timeout(target.timeout, dispatcher.dispatch(&target, &payload)).await {
                        Ok(Ok(())) => TargetStatus::Succeeded,
                        Ok(Err(e)) => TargetStatus::Failed {
                            reason: e.to_string(),
                        },
                        Err(_) => TargetStatus::TimedOut,
                    };
                let elapsed_ms = duration_ms(started.elapsed());
                tracing::debug!(service = %target.name, ?status, elapsed_ms, "Export target resolved");
                TargetOutcome {
                    name: target.name,
                    status,
                    elapsed_ms,
                }
            });
            task_index.insert(handle.id(), index);
        }

        while let Some(joined) = tasks.join_next_with_id().await {
            let (id, outcome) = match joined {
                Ok((id, outcome)) => (id, outcome),
                Err(e) => {
                    let reason = format!("dispatch task failed: {e}");
                    (e.id(), failed_outcome(&request.targets, &task_index, e.id(), reason))
                }
            };
            if let Some(&index) = task_index.get(&id) {
                slots[index] = Some(outcome);
            }
        }

        let targets: Vec<TargetOutcome> = slots.into_iter().flatten().collect();
        let status = aggregate(&targets);

        tracing::info!(export_id = %payload.export_id, ?status, "Export resolved");

        Ok(ExportOutcome {
            export_id: payload.export_id,
            style_key: payload.style_key.clone(),
            format,
            status,
            targets,
            warnings,
            started_at,
            completed_at: Utc::now(),
        })
    }

    /// Probe the health endpoint of every configured service concurrently.
    ///
    /// Each probe is bounded by the service's deadline. Services are reported
    /// in name order.
    pub async fn service_status(&self) -> ServiceStatusReport {
        let mut slots: Vec<ServiceHealth> = self
            .settings
            .services
            .iter()
            .map(|(name, service)| {
                ServiceHealth::unreachable(
                    name.clone(),
                    service.base_url.clone(),
                    "health check task failed".to_owned(),
                )
            })
            .collect();
        let mut tasks = JoinSet::new();

        for (index, (name, service)) in self.settings.services.iter().enumerate() {
            let dispatcher = Arc::clone(&self.dispatcher);
            let name = name.clone();
            let base_url = service.base_url.clone();
            let url = service.health_url();
            let deadline = service.timeout.unwrap_or(self.settings.default_timeout);
            tasks.spawn(async move {
                let started = Instant::now();
                let result = timeout(deadline, dispatcher.check_health(&url)).await;
                let elapsed_ms = duration_ms(started.elapsed());
                let health = match result {
                    Ok(Ok(status)) => ServiceHealth::responded(name, base_url, status, elapsed_ms),
                    Ok(Err(e)) => ServiceHealth::unreachable(name, base_url, e.to_string()),
                    Err(_) => ServiceHealth::unreachable(
                        name,
                        base_url,
                        format!("timed out after {}ms", duration_ms(deadline)),
                    ),
                };
                (index, health)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, health)) => slots[index] = health,
                Err(e) => tracing::error!(error = %e, "Health check task failed"),
            }
        }

        let report = ServiceStatusReport::new(slots);
        tracing::debug!(
            total = report.total_services,
            healthy = report.healthy_services,
            "Checked service health"
        );
        report
    }

    /// Run every pre-dispatch check and build the shared payload.
    fn prepare(
        &self,
        request: &ExportRequest,
    ) -> Result<(ExportFormat, ExportPayload, Vec<String>), ExportError> {
        if request.style_key.is_empty() {
            return Err(ExportError::Validation("Style key is required".to_owned()));
        }
        let style = self
            .processor
            .registry()
            .get(&request.style_key)
            .map_err(|_| ExportError::UnknownStyle(request.style_key.clone()))?;
        if request.content.trim().is_empty() {
            return Err(ExportError::Validation("Content is required".to_owned()));
        }
        if request.targets.is_empty() {
            return Err(ExportError::Validation(
                "At least one target is required".to_owned(),
            ));
        }
        let format: ExportFormat = request.format.parse()?;

        let document = self.processor.apply(&request.template_request())?;

        let mut warnings: Vec<String> = format
            .compatibility_warning(&style.key)
            .into_iter()
            .collect();
        warnings.extend(document.warnings.iter().cloned());

        let payload = ExportPayload {
            export_id: Uuid::new_v4(),
            style_key: style.key.clone(),
            format,
            style: (*style).clone(),
            document,
            export_options: request.export_options.clone(),
        };
        Ok((format, payload, warnings))
    }

    /// Resolve a target; the deadline is the most specific timeout given.
    fn resolve(&self, spec: &TargetSpec) -> Result<ResolvedTarget, DispatchError> {
        match spec {
            TargetSpec::Service(name) => {
                let service = self
                    .settings
                    .services
                    .get(name)
                    .ok_or(DispatchError::NotConfigured)?;
                Ok(ResolvedTarget {
                    name: name.clone(),
                    base_url: service.base_url.clone(),
                    timeout: service.timeout.unwrap_or(self.settings.default_timeout),
                })
            }
            TargetSpec::Explicit {
                name,
                base_url,
                timeout_ms,
            } => {
                let configured = self.settings.services.get(name).and_then(|s| s.timeout);
                Ok(ResolvedTarget {
                    name: name.clone(),
                    base_url: base_url.clone(),
                    timeout: timeout_ms
                        .map(Duration::from_millis)
                        .or(configured)
                        .unwrap_or(self.settings.default_timeout),
                })
            }
        }
    }
}

fn failed_outcome(
    targets: &[TargetSpec],
    task_index: &HashMap<tokio::task::Id, usize>,
    id: tokio::task::Id,
    reason: String,
) -> TargetOutcome {
    let name = task_index
        .get(&id)
        .and_then(|&i| targets.get(i))
        .map_or_else(String::new, |t| t.name().to_owned());
    tracing::error!(service = %name, %reason, "Export target task failed");
    TargetOutcome {
        name,
        status: TargetStatus::Failed { reason },
        elapsed_ms: 0,
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
