//! The platform's push-dispatch interface.
//!
//! Delivery is owned by the external platform: the notifier hands over a
//! target selector and a data payload and gets a one-shot result back. The
//! platform cannot push to queries joined with session records, so targets
//! are always resolved to installation UUIDs first and addressed with a
//! contained-in selector.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::PushError;
use crate::models::{Event, ObjectId};

/// Selector for the installations a push is addressed to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PushTarget {
    /// Exact match on one installation UUID.
    InstallationId(String),
    /// Contained-in match over installation UUIDs.
    InstallationIds(Vec<String>),
}

impl PushTarget {
    /// The installation UUIDs this target addresses.
    pub fn installation_ids(&self) -> Vec<&str> {
        match self {
            PushTarget::InstallationId(id) => vec![id.as_str()],
            PushTarget::InstallationIds(ids) => ids.iter().map(String::as_str).collect(),
        }
    }
}

/// Structured payload for an event notification push.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPush {
    /// Intent action the receiving app dispatches on.
    pub action: String,
    /// Object id of the origin device's session.
    pub user_session_id: ObjectId,
    /// Installation UUID of the origin device.
    pub installation_id: String,
    /// The full event record.
    pub event: Event,
    /// Human-readable notification text.
    pub alert: String,
}

/// The data payload of a push.
#[derive(Debug, Clone, PartialEq)]
pub enum PushData {
    /// Structured event notification.
    Event(EventPush),
    /// Verbatim payload, forwarded untouched.
    Raw(serde_json::Value),
}

impl PushData {
    /// The payload as the JSON value handed to the platform.
    pub fn to_value(&self) -> Result<serde_json::Value, PushError> {
        match self {
            PushData::Event(push) => {
                serde_json::to_value(push).map_err(|e| PushError::Dispatch(e.to_string()))
            }
            PushData::Raw(value) => Ok(value.clone()),
        }
    }
}

/// One outbound push request.
#[derive(Debug, Clone, PartialEq)]
pub struct PushRequest {
    pub target: PushTarget,
    pub data: PushData,
}

/// The platform's push service.
#[async_trait]
pub trait PushSender: Send + Sync {
    /// Request asynchronous delivery to the target installations.
    async fn send(&self, request: PushRequest) -> Result<(), PushError>;
}

/// Push sender that records every request instead of delivering.
///
/// Test double, also handy for local development. Can be armed to fail.
#[derive(Debug, Clone, Default)]
pub struct RecordingSender {
    sent: Arc<RwLock<Vec<PushRequest>>>,
    fail_with: Arc<RwLock<Option<String>>>,
}

impl RecordingSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every request received so far, in order.
    pub async fn sent(&self) -> Vec<PushRequest> {
        self.sent.read().await.clone()
    }

    /// Make subsequent sends fail with the given reason.
    pub async fn fail_with(&self, reason: impl Into<String>) {
        *self.fail_with.write().await = Some(reason.into());
    }
}

#[async_trait]
impl PushSender for RecordingSender {
    async fn send(&self, request: PushRequest) -> Result<(), PushError> {
        if let Some(reason) = self.fail_with.read().await.clone() {
            return Err(PushError::Dispatch(reason));
        }
        self.sent.write().await.push(request);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::EventValue;

    fn sample_event_push() -> EventPush {
        EventPush {
            action: "com.parse.anydevice.EVENT".to_string(),
            user_session_id: ObjectId::from("sess1"),
            installation_id: "uuid-1".to_string(),
            event: Event {
                object_id: ObjectId::from("evt1"),
                installation_id: Some(ObjectId::from("i1")),
                value: EventValue::new("ringing"),
                created_at: Utc::now(),
            },
            alert: "Device Pixel 7 is ringing".to_string(),
        }
    }

    #[test]
    fn test_event_push_serializes_with_camel_case_fields() {
        let value = PushData::Event(sample_event_push()).to_value().unwrap();
        assert_eq!(value["action"], "com.parse.anydevice.EVENT");
        assert_eq!(value["userSessionId"], "sess1");
        assert_eq!(value["installationId"], "uuid-1");
        assert_eq!(value["alert"], "Device Pixel 7 is ringing");
        assert_eq!(value["event"]["objectId"], "evt1");
    }

    #[test]
    fn test_raw_data_passes_through_unchanged() {
        let payload = serde_json::json!({"alert": "beep", "ttl": 60});
        let value = PushData::Raw(payload.clone()).to_value().unwrap();
        assert_eq!(value, payload);
    }

    #[test]
    fn test_target_installation_ids() {
        let single = PushTarget::InstallationId("a".to_string());
        assert_eq!(single.installation_ids(), vec!["a"]);

        let many = PushTarget::InstallationIds(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(many.installation_ids(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_recording_sender_records_in_order() {
        let sender = RecordingSender::new();
        for id in ["a", "b"] {
            sender
                .send(PushRequest {
                    target: PushTarget::InstallationId(id.to_string()),
                    data: PushData::Raw(serde_json::json!({})),
                })
                .await
                .unwrap();
        }

        let sent = sender.sent().await;
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].target, PushTarget::InstallationId("a".to_string()));
    }

    #[tokio::test]
    async fn test_recording_sender_armed_failure() {
        let sender = RecordingSender::new();
        sender.fail_with("service unavailable").await;

        let err = sender
            .send(PushRequest {
                target: PushTarget::InstallationId("a".to_string()),
                data: PushData::Raw(serde_json::json!({})),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, PushError::Dispatch(_)));
        assert!(sender.sent().await.is_empty());
    }
}
