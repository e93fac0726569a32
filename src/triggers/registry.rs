//! After-save trigger registration and dispatch.
//!
//! The platform persists a record, then hands it to the registry along with
//! the acting user's context. The registry routes it to the handler
//! registered for the record's class; handler outcomes are logged and
//! otherwise ignored, matching the platform's fire-and-forget contract.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::TriggerError;
use crate::models::{Event, Message, ObjectId};
use crate::push::PushSender;
use crate::store::RecordStore;
use crate::triggers::PairingNotifier;

/// Record class name for events.
pub const EVENT_CLASS: &str = "Event";
/// Record class name for messages.
pub const MESSAGE_CLASS: &str = "Message";

/// Context the platform supplies alongside a saved record.
#[derive(Debug, Clone)]
pub struct TriggerContext {
    /// The user whose session saved the record.
    pub user: ObjectId,
}

/// A record the platform just persisted.
#[derive(Debug, Clone)]
pub enum SavedRecord {
    Event(Event),
    Message(Message),
}

impl SavedRecord {
    /// The record's class name, used for handler routing.
    pub fn class_name(&self) -> &'static str {
        match self {
            SavedRecord::Event(_) => EVENT_CLASS,
            SavedRecord::Message(_) => MESSAGE_CLASS,
        }
    }
}

/// An after-save trigger handler.
///
/// Invoked once per saved record of the registered class. The platform
/// ignores the result, so implementations log their own outcomes.
#[async_trait]
pub trait AfterSaveHandler: Send + Sync {
    async fn after_save(&self, record: SavedRecord, ctx: TriggerContext);
}

/// Routes saved records to the handler registered for their class.
pub struct TriggerRegistry {
    handlers: RwLock<HashMap<String, Arc<dyn AfterSaveHandler>>>,
}

impl TriggerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
        }
    }

    /// Register a handler for a record class.
    pub async fn register(
        &self,
        class: impl Into<String>,
        handler: Arc<dyn AfterSaveHandler>,
    ) -> Result<(), TriggerError> {
        let class = class.into();
        let mut handlers = self.handlers.write().await;
        if handlers.contains_key(&class) {
            return Err(TriggerError::AlreadyRegistered { class });
        }
        handlers.insert(class, handler);
        Ok(())
    }

    /// Dispatch a saved record to its handler. Records of classes with no
    /// registered handler are a logged no-op.
    pub async fn dispatch(&self, record: SavedRecord, ctx: TriggerContext) {
        let class = record.class_name();
        let handler = self.handlers.read().await.get(class).cloned();
        match handler {
            Some(handler) => handler.after_save(record, ctx).await,
            None => tracing::debug!(class, "no after-save handler registered"),
        }
    }
}

impl Default for TriggerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// After-save handler for the Event class.
pub struct EventTrigger<S, P> {
    notifier: Arc<PairingNotifier<S, P>>,
}

#[async_trait]
impl<S, P> AfterSaveHandler for EventTrigger<S, P>
where
    S: RecordStore + 'static,
    P: PushSender + 'static,
{
    async fn after_save(&self, record: SavedRecord, ctx: TriggerContext) {
        let event = match record {
            SavedRecord::Event(event) => event,
            other => {
                tracing::warn!(class = other.class_name(), "event trigger got wrong class");
                return;
            }
        };
        match self.notifier.handle_event_created(&event, &ctx.user).await {
            Ok(outcome) => tracing::debug!(?outcome, "event trigger finished"),
            Err(err) => tracing::error!(error = %err, "event trigger failed"),
        }
    }
}

/// After-save handler for the Message class.
pub struct MessageTrigger<S, P> {
    notifier: Arc<PairingNotifier<S, P>>,
}

#[async_trait]
impl<S, P> AfterSaveHandler for MessageTrigger<S, P>
where
    S: RecordStore + 'static,
    P: PushSender + 'static,
{
    async fn after_save(&self, record: SavedRecord, _ctx: TriggerContext) {
        let message = match record {
            SavedRecord::Message(message) => message,
            other => {
                tracing::warn!(
                    class = other.class_name(),
                    "message trigger got wrong class"
                );
                return;
            }
        };
        match self.notifier.handle_message_created(&message).await {
            Ok(outcome) => tracing::debug!(?outcome, "message trigger finished"),
            Err(err) => tracing::error!(error = %err, "message trigger failed"),
        }
    }
}

impl<S, P> PairingNotifier<S, P>
where
    S: RecordStore + 'static,
    P: PushSender + 'static,
{
    /// Register this notifier's Event and Message triggers.
    pub async fn register_triggers(
        self: &Arc<Self>,
        registry: &TriggerRegistry,
    ) -> Result<(), TriggerError> {
        registry
            .register(
                EVENT_CLASS,
                Arc::new(EventTrigger {
                    notifier: Arc::clone(self),
                }),
            )
            .await?;
        registry
            .register(
                MESSAGE_CLASS,
                Arc::new(MessageTrigger {
                    notifier: Arc::clone(self),
                }),
            )
            .await
    }
}
