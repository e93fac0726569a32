//! After-save handler for Message records.

use crate::error::TriggerError;
use crate::models::Message;
use crate::push::{PushData, PushRequest, PushSender, PushTarget};
use crate::store::RecordStore;
use crate::triggers::PairingNotifier;

/// How a message trigger run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageOutcome {
    /// The message carried no `installationId`. Expected, not an error.
    Skipped,
    /// The message value was forwarded to the target installation.
    Sent,
    /// Push dispatch failed; logged, not propagated.
    PushFailed,
}

impl<S: RecordStore, P: PushSender> PairingNotifier<S, P> {
    /// Handle a newly saved Message.
    ///
    /// Forwards the message's `value` verbatim as a push to the single
    /// installation named by its `installationId`. No lookups, no
    /// transformation, no filtering.
    pub async fn handle_message_created(
        &self,
        message: &Message,
    ) -> Result<MessageOutcome, TriggerError> {
        let Some(installation_id) = message.installation_id.as_deref() else {
            tracing::debug!(message = %message.object_id, "message has no installationId, skipping");
            return Ok(MessageOutcome::Skipped);
        };

        let request = PushRequest {
            target: PushTarget::InstallationId(installation_id.to_string()),
            data: PushData::Raw(message.value.clone()),
        };

        match self.push.send(request).await {
            Ok(()) => {
                tracing::info!(installation = installation_id, "sent message push to device");
                Ok(MessageOutcome::Sent)
            }
            Err(err) => {
                tracing::error!(error = %err, "message push dispatch failed");
                Ok(MessageOutcome::PushFailed)
            }
        }
    }
}
