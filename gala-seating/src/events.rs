//! Board notifications
//!
//! Everything a user should see (failures, warnings, confirmations) is
//! published here. Subscribers that fall behind lose the oldest events.

use serde::Serialize;
use shared::error::ErrorCode;
use std::time::Duration;

use crate::command::{OperationId, OperationKind};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoardEvent {
    /// Empty tables created for an event
    Initialized { event_id: i64, table_count: u32 },
    /// Guests and customizations replaced from the server
    Loaded { event_id: i64, guest_count: usize },
    /// Fetch failed; the previous state is still shown
    LoadFailed { event_id: i64, message: String },
    OperationApplied {
        id: OperationId,
        kind: OperationKind,
    },
    OperationCommitted {
        id: OperationId,
        kind: OperationKind,
    },
    /// Local change reverted after a server rejection or network failure
    OperationRolledBack {
        id: OperationId,
        kind: OperationKind,
        code: ErrorCode,
        message: String,
    },
    /// Refused before any local change
    OperationRejected {
        kind: OperationKind,
        code: ErrorCode,
        message: String,
    },
    /// Still waiting on the server; the change may not have persisted
    SlowUpdate {
        id: OperationId,
        kind: OperationKind,
        #[serde(with = "millis")]
        elapsed: Duration,
    },
}

impl BoardEvent {
    /// Whether this event reports a failure the user must see
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            BoardEvent::LoadFailed { .. }
                | BoardEvent::OperationRolledBack { .. }
                | BoardEvent::OperationRejected { .. }
        )
    }
}

mod millis {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_shape() {
        let event = BoardEvent::SlowUpdate {
            id: uuid::Uuid::nil(),
            kind: OperationKind::Assign,
            elapsed: Duration::from_millis(750),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "slow_update");
        assert_eq!(json["kind"], "assign");
        assert_eq!(json["elapsed"], 750);
        assert!(!event.is_error());
    }

    #[test]
    fn test_error_events() {
        let event = BoardEvent::OperationRolledBack {
            id: uuid::Uuid::nil(),
            kind: OperationKind::Unassign,
            code: ErrorCode::NetworkError,
            message: "connection refused".into(),
        };
        assert!(event.is_error());
        assert_eq!(serde_json::to_value(&event).unwrap()["code"], 9101);
    }
}
