//! Integration tests from the platform's perspective.
//!
//! These tests exercise the trigger flows end to end without a hosting
//! platform: records go into the in-memory store, after-save triggers are
//! dispatched through the registry, and pushes land in a recording sender.
//!
//! Run: `cargo test --test notifier_journeys`

use std::sync::Arc;

use chrono::Utc;
use devicecast::config::NotifierConfig;
use devicecast::models::{DeviceType, Event, EventValue, Installation, Message, ObjectId, Session};
use devicecast::push::{PushTarget, RecordingSender};
use devicecast::store::MemoryStore;
use devicecast::triggers::{PairingNotifier, SavedRecord, TriggerContext, TriggerRegistry};

struct Platform {
    store: Arc<MemoryStore>,
    push: Arc<RecordingSender>,
    notifier: Arc<PairingNotifier<MemoryStore, RecordingSender>>,
    registry: TriggerRegistry,
    user: ObjectId,
}

impl Platform {
    async fn bootstrap() -> Self {
        let store = Arc::new(MemoryStore::new());
        let push = Arc::new(RecordingSender::new());
        let notifier = Arc::new(PairingNotifier::new(
            Arc::clone(&store),
            Arc::clone(&push),
            NotifierConfig::default(),
        ));
        let registry = TriggerRegistry::new();
        notifier
            .register_triggers(&registry)
            .await
            .expect("fresh registry accepts both triggers");

        Self {
            store,
            push,
            notifier,
            registry,
            user: ObjectId::from("alice"),
        }
    }

    async fn add_installation(
        &self,
        object_id: &str,
        uuid: &str,
        device_type: DeviceType,
        device_name: &str,
        logged_in: bool,
    ) {
        self.store
            .insert_installation(Installation {
                object_id: ObjectId::from(object_id),
                installation_id: uuid.to_string(),
                device_type,
                device_name: device_name.to_string(),
                owner: self.user.clone(),
                latest_event: None,
            })
            .await;
        if logged_in {
            self.store
                .insert_session(Session {
                    object_id: ObjectId::from(format!("session-{object_id}")),
                    user: self.user.clone(),
                    installation_id: uuid.to_string(),
                })
                .await;
        }
    }

    fn ctx(&self) -> TriggerContext {
        TriggerContext {
            user: self.user.clone(),
        }
    }
}

fn event(object_id: &str, installation: Option<&str>, state: &str) -> Event {
    Event {
        object_id: ObjectId::from(object_id),
        installation_id: installation.map(ObjectId::from),
        value: EventValue::new(state),
        created_at: Utc::now(),
    }
}

// ============================================================================
// 1. Event Fanout Journey
// ============================================================================
mod event_fanout {
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn test_board_event_reaches_logged_in_phones_only() {
        let platform = Platform::bootstrap().await;
        platform
            .add_installation("board", "board-uuid", DeviceType::Embedded, "Pixel 7", true)
            .await;
        platform
            .add_installation("phone-a", "phone-a-uuid", DeviceType::Android, "Phone A", true)
            .await;
        platform
            .add_installation("phone-b", "phone-b-uuid", DeviceType::Ios, "Phone B", false)
            .await;

        platform
            .registry
            .dispatch(
                SavedRecord::Event(event("evt1", Some("board"), "ringing")),
                platform.ctx(),
            )
            .await;

        let sent = platform.push.sent().await;
        assert_eq!(sent.len(), 1, "exactly one fanout push");
        assert_eq!(
            sent[0].target,
            PushTarget::InstallationIds(vec!["phone-a-uuid".to_string()]),
            "logged-out phone is excluded"
        );

        let payload = sent[0].data.to_value().unwrap();
        assert_eq!(payload["alert"], "Device Pixel 7 is ringing");
        assert_eq!(payload["action"], "com.parse.anydevice.EVENT");
        assert_eq!(payload["installationId"], "board-uuid");
        assert_eq!(payload["userSessionId"], "session-board");
        assert_eq!(payload["event"]["objectId"], "evt1");
    }

    #[tokio::test]
    async fn test_blink_state_is_humanized_in_alert_only() {
        let platform = Platform::bootstrap().await;
        platform
            .add_installation("board", "board-uuid", DeviceType::Embedded, "Board", true)
            .await;
        platform
            .add_installation("phone", "phone-uuid", DeviceType::Android, "Phone", true)
            .await;

        platform
            .registry
            .dispatch(
                SavedRecord::Event(event("evt1", Some("board"), "blink")),
                platform.ctx(),
            )
            .await;

        let payload = platform.push.sent().await[0].data.to_value().unwrap();
        assert_eq!(payload["alert"], "Device Board is blinking");
        assert_eq!(
            payload["event"]["value"]["state"], "blink",
            "the forwarded event record keeps the raw state"
        );
    }

    #[tokio::test]
    async fn test_latest_event_back_reference_tracks_newest_event() {
        let platform = Platform::bootstrap().await;
        platform
            .add_installation("board", "board-uuid", DeviceType::Embedded, "Board", true)
            .await;

        for id in ["evt1", "evt2"] {
            platform
                .registry
                .dispatch(
                    SavedRecord::Event(event(id, Some("board"), "ringing")),
                    platform.ctx(),
                )
                .await;
        }

        use devicecast::store::{AccessScope, RecordStore};
        let board = platform
            .store
            .installation_by_object_id(AccessScope::Elevated, &ObjectId::from("board"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(board.latest_event, Some(ObjectId::from("evt2")));
    }

    #[tokio::test]
    async fn test_event_without_installation_id_is_a_quiet_no_op() {
        let platform = Platform::bootstrap().await;
        platform
            .add_installation("board", "board-uuid", DeviceType::Embedded, "Board", true)
            .await;

        platform
            .registry
            .dispatch(
                SavedRecord::Event(event("evt1", None, "ringing")),
                platform.ctx(),
            )
            .await;

        assert!(platform.push.sent().await.is_empty());
    }
}

// ============================================================================
// 2. Message Forwarding Journey
// ============================================================================
mod message_forwarding {
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn test_phone_message_is_forwarded_verbatim_to_one_device() {
        let platform = Platform::bootstrap().await;
        let value = serde_json::json!({"alert": "turn light on", "pin": 13});

        platform
            .registry
            .dispatch(
                SavedRecord::Message(Message {
                    object_id: ObjectId::from("msg1"),
                    installation_id: Some("board-uuid".to_string()),
                    value: value.clone(),
                    owner: Some(platform.user.clone()),
                    format: Some(devicecast::models::FORMAT_JSON.to_string()),
                }),
                platform.ctx(),
            )
            .await;

        let sent = platform.push.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(
            sent[0].target,
            PushTarget::InstallationId("board-uuid".to_string())
        );
        assert_eq!(sent[0].data.to_value().unwrap(), value);
    }

    #[tokio::test]
    async fn test_message_without_installation_id_sends_nothing() {
        let platform = Platform::bootstrap().await;

        platform
            .registry
            .dispatch(
                SavedRecord::Message(Message {
                    object_id: ObjectId::from("msg1"),
                    installation_id: None,
                    value: serde_json::json!({"alert": "x"}),
                    owner: None,
                    format: None,
                }),
                platform.ctx(),
            )
            .await;

        assert!(platform.push.sent().await.is_empty());
    }
}

// ============================================================================
// 3. Degraded-Platform Journey
// ============================================================================
mod degraded_platform {
    use devicecast::triggers::{EventOutcome, MessageOutcome};
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn test_unregistered_device_event_is_surfaced_not_errored() {
        let platform = Platform::bootstrap().await;

        let outcome = platform
            .notifier
            .handle_event_created(&event("evt1", Some("ghost"), "ringing"), &platform.user)
            .await
            .unwrap();

        assert_eq!(outcome, EventOutcome::InstallationNotFound);
        assert!(platform.push.sent().await.is_empty());
    }

    #[tokio::test]
    async fn test_push_outage_never_reaches_the_originating_client() {
        let platform = Platform::bootstrap().await;
        platform
            .add_installation("board", "board-uuid", DeviceType::Embedded, "Board", true)
            .await;
        platform
            .add_installation("phone", "phone-uuid", DeviceType::Android, "Phone", true)
            .await;
        platform.push.fail_with("push service outage").await;

        let event_outcome = platform
            .notifier
            .handle_event_created(&event("evt1", Some("board"), "ringing"), &platform.user)
            .await
            .expect("push outage is not a trigger error");
        assert_eq!(event_outcome, EventOutcome::PushFailed);

        let message_outcome = platform
            .notifier
            .handle_message_created(&Message {
                object_id: ObjectId::from("msg1"),
                installation_id: Some("board-uuid".to_string()),
                value: serde_json::json!({}),
                owner: None,
                format: None,
            })
            .await
            .expect("push outage is not a trigger error");
        assert_eq!(message_outcome, MessageOutcome::PushFailed);
    }

    #[tokio::test]
    async fn test_lonely_user_gets_no_push() {
        let platform = Platform::bootstrap().await;
        platform
            .add_installation("board", "board-uuid", DeviceType::Embedded, "Board", true)
            .await;

        let outcome = platform
            .notifier
            .handle_event_created(&event("evt1", Some("board"), "ringing"), &platform.user)
            .await
            .unwrap();

        assert_eq!(outcome, EventOutcome::NoPairedDevices);
        assert!(platform.push.sent().await.is_empty());
    }
}
