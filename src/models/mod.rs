//! Record types owned and persisted by the external platform.
//!
//! This crate never persists anything itself; these types mirror the
//! platform's wire shapes (camelCase field names) and are read-only to the
//! triggers, with one exception: `Installation.latestEvent` is updated by
//! the event trigger, last-write-wins.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How long after creation an event still counts as recent.
const RECENT_EVENT_WINDOW_DAYS: i64 = 3;

/// A platform record id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    /// Generate a fresh id. Used by the in-memory store; real ids come from
    /// the platform.
    pub fn new() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ObjectId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ObjectId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Platform a given installation runs on.
///
/// The platform stores free-form strings; unknown values deserialize into
/// [`DeviceType::Other`] rather than failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeviceType {
    Ios,
    Android,
    Embedded,
    Other(String),
}

impl From<String> for DeviceType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "ios" => DeviceType::Ios,
            "android" => DeviceType::Android,
            "embedded" => DeviceType::Embedded,
            _ => DeviceType::Other(value),
        }
    }
}

impl From<DeviceType> for String {
    fn from(value: DeviceType) -> Self {
        value.to_string()
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceType::Ios => write!(f, "ios"),
            DeviceType::Android => write!(f, "android"),
            DeviceType::Embedded => write!(f, "embedded"),
            DeviceType::Other(value) => f.write_str(value),
        }
    }
}

/// The status payload a device attaches to an event.
///
/// Always carries a `state` key ("ringing", "blink", ...); devices may add
/// arbitrary extra fields which are preserved verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventValue {
    pub state: String,
    #[serde(flatten, default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl EventValue {
    pub fn new(state: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            extra: serde_json::Map::new(),
        }
    }
}

/// A status report saved by a device ("the light is on").
///
/// `installation_id` references the origin [`Installation`]'s object id;
/// absence means "no action", not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub object_id: ObjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installation_id: Option<ObjectId>,
    pub value: EventValue,
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// Whether this event was created within the recency window (3 days).
    pub fn is_recent(&self) -> bool {
        self.created_at > Utc::now() - Duration::days(RECENT_EVENT_WINDOW_DAYS)
    }
}

/// MIME type phones use for JSON message payloads.
pub const FORMAT_JSON: &str = "text/json";

/// A command saved by a phone, addressed to one device ("turn the light on").
///
/// `value` is forwarded verbatim as the push payload; `installation_id`
/// holds the target device's installation UUID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub object_id: ObjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installation_id: Option<String>,
    pub value: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// One app install on one device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Installation {
    pub object_id: ObjectId,
    /// The installation UUID assigned by the platform client SDK.
    pub installation_id: String,
    pub device_type: DeviceType,
    pub device_name: String,
    /// The owning user.
    pub owner: ObjectId,
    /// Back-reference to the newest event from this installation.
    /// Maintained by the event trigger, last-write-wins.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_event: Option<ObjectId>,
}

/// An authenticated login binding a user to an installation.
///
/// Installations without a live session are logged out and excluded from
/// push fanout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub object_id: ObjectId,
    pub user: ObjectId,
    pub installation_id: String,
}
