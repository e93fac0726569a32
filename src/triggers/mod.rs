//! The Device Pairing Notifier and its after-save triggers.
//!
//! The hosting platform invokes a trigger once per saved record, fire and
//! forget: return values are ignored, nothing is retried, and no failure
//! reaches the client that saved the record. Each handler is a single
//! sequential best-effort pipeline — each stage awaits the previous one,
//! logs its own failures, and halts instead of propagating.

mod event;
mod message;
mod registry;

use std::sync::Arc;

pub use event::EventOutcome;
pub use message::MessageOutcome;
pub use registry::{
    AfterSaveHandler, EVENT_CLASS, EventTrigger, MESSAGE_CLASS, MessageTrigger, SavedRecord,
    TriggerContext, TriggerRegistry,
};

use crate::config::NotifierConfig;
use crate::push::PushSender;
use crate::store::RecordStore;

/// Translates a newly created Event or Message into zero or more outbound
/// push notifications to paired devices.
///
/// Holds no state beyond its collaborator handles; every record it touches
/// is owned by the platform and may be concurrently modified by other
/// trigger runs.
pub struct PairingNotifier<S, P> {
    pub(crate) store: Arc<S>,
    pub(crate) push: Arc<P>,
    pub(crate) config: NotifierConfig,
}

impl<S: RecordStore, P: PushSender> PairingNotifier<S, P> {
    /// Create a notifier over the given store and push service.
    pub fn new(store: Arc<S>, push: Arc<P>, config: NotifierConfig) -> Self {
        Self {
            store,
            push,
            config,
        }
    }
}
