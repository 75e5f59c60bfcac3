//! Sibling service health reporting.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Result of probing one service's health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceHealth {
    pub name: String,
    pub base_url: String,
    /// The service answered with a 2xx status.
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    /// Round trip time; absent when no response arrived.
    pub response_time_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ServiceHealth {
    pub(crate) fn responded(
        name: String,
        base_url: String,
        status_code: u16,
        response_time_ms: u64,
    ) -> Self {
        Self {
            name,
            base_url,
            healthy: (200..300).contains(&status_code),
            status_code: Some(status_code),
            response_time_ms: Some(response_time_ms),
            error: None,
        }
    }

    pub(crate) fn unreachable(name: String, base_url: String, error: String) -> Self {
        Self {
            name,
            base_url,
            healthy: false,
            status_code: None,
            response_time_ms: None,
            error: Some(error),
        }
    }
}

/// Health of every configured service at one point in time.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatusReport {
    pub services: Vec<ServiceHealth>,
    pub total_services: usize,
    pub healthy_services: usize,
    pub checked_at: DateTime<Utc>,
}

impl ServiceStatusReport {
    pub(crate) fn new(services: Vec<ServiceHealth>) -> Self {
        Self {
            total_services: services.len(),
            healthy_services: services.iter().filter(|s| s.healthy).count(),
            services,
            checked_at: Utc::now(),
        }
    }
}
