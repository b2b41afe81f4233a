//! Audit trail of successful mutations.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use innkeep_shared::types::UserId;
use uuid::Uuid;

use crate::authz::ResourceKind;

/// One successful mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// Who did it.
    pub actor: UserId,
    /// Operation name, e.g. `attach_service`.
    pub action: &'static str,
    /// Kind of the primary resource touched.
    pub resource: ResourceKind,
    /// ID of the primary resource touched.
    pub resource_id: Uuid,
    /// Short human-readable detail.
    pub detail: String,
    /// When it was committed.
    pub at: DateTime<Utc>,
}

/// Receives one event per committed mutation.
pub trait AuditSink: Send + Sync {
    /// Records an event. Must not fail the operation.
    fn record(&self, event: AuditEvent);
}

/// Emits each event as a structured `tracing` record on `innkeep::audit`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, event: AuditEvent) {
        tracing::info!(
            target: "innkeep::audit",
            actor = %event.actor,
            action = event.action,
            resource = event.resource.as_str(),
            resource_id = %event.resource_id,
            at = %event.at,
            "{}",
            event.detail
        );
    }
}

/// Keeps events in memory.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    events: Mutex<Vec<AuditEvent>>,
}

impl MemoryAuditSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the recorded events.
    pub fn events(&self) -> Vec<AuditEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, event: AuditEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_keeps_order() {
        let sink = MemoryAuditSink::new();
        for action in ["create_reservation", "attach_service"] {
            sink.record(AuditEvent {
                actor: UserId::new(),
                action,
                resource: ResourceKind::Reservation,
                resource_id: Uuid::nil(),
                detail: String::new(),
                at: Utc::now(),
            });
        }
        let actions: Vec<_> = sink.events().iter().map(|e| e.action).collect();
        assert_eq!(actions, vec!["create_reservation", "attach_service"]);
    }
}
