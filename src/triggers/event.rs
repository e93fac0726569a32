//! After-save handler for Event records.

use crate::error::{StoreError, TriggerError};
use crate::models::{Event, ObjectId};
use crate::push::{EventPush, PushData, PushRequest, PushSender, PushTarget};
use crate::store::{AccessScope, RecordStore};
use crate::triggers::PairingNotifier;

/// How an event trigger run ended.
///
/// Every variant is a successful trigger completion from the platform's
/// point of view; the distinctions exist for logs and tests.
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    /// The event carried no `installationId`. Expected, not an error.
    Skipped,
    /// No installation matched the event's `installationId`.
    InstallationNotFound,
    /// The acting user has no session on the origin installation.
    SessionNotFound,
    /// No other logged-in paired phone to notify.
    NoPairedDevices,
    /// A push was dispatched to these installation UUIDs.
    Notified { targets: Vec<String> },
    /// Targets were resolved but the push dispatch failed.
    PushFailed,
    /// A store operation failed mid-pipeline; logged, not propagated.
    Halted { stage: &'static str },
}

impl<S: RecordStore, P: PushSender> PairingNotifier<S, P> {
    /// Handle a newly saved Event.
    ///
    /// Looks up the origin installation, points its `latestEvent` at the new
    /// event (best-effort), resolves the acting user's logged-in paired
    /// phones, and pushes a "Device {name} is {state}" notification to them.
    ///
    /// The only `Err` this returns is a scope violation, which indicates a
    /// bug in how the store was wired up. Observable platform failures are
    /// logged and folded into the outcome.
    pub async fn handle_event_created(
        &self,
        event: &Event,
        acting_user: &ObjectId,
    ) -> Result<EventOutcome, TriggerError> {
        let Some(installation_object_id) = event.installation_id.as_ref() else {
            tracing::debug!(event = %event.object_id, "event has no installationId, skipping");
            return Ok(EventOutcome::Skipped);
        };

        // The originating device's own scope cannot see the phones' session
        // records, so the whole pipeline runs elevated.
        let scope = AccessScope::Elevated;

        let installation = match self
            .store
            .installation_by_object_id(scope, installation_object_id)
            .await
        {
            Ok(Some(installation)) => installation,
            Ok(None) => {
                tracing::warn!(
                    installation = %installation_object_id,
                    event = %event.object_id,
                    "no installation matches event, stopping"
                );
                return Ok(EventOutcome::InstallationNotFound);
            }
            Err(err) => return self.store_failure("installation-lookup", err),
        };

        // Best-effort back-reference update; failure never aborts the run.
        if let Err(err) = self
            .store
            .set_latest_event(scope, &installation.object_id, &event.object_id)
            .await
        {
            tracing::error!(
                installation = %installation.object_id,
                error = %err,
                "failed to save latest event"
            );
        }

        let session = match self
            .store
            .session_for_installation(scope, acting_user, &installation.installation_id)
            .await
        {
            Ok(Some(session)) => session,
            Ok(None) => {
                tracing::warn!(
                    user = %acting_user,
                    installation = %installation.installation_id,
                    "no session for origin installation, stopping"
                );
                return Ok(EventOutcome::SessionNotFound);
            }
            Err(err) => return self.store_failure("session-lookup", err),
        };

        let paired = match self
            .store
            .paired_installations(scope, &session.user, &self.config.paired_device_types)
            .await
        {
            Ok(paired) => paired,
            Err(err) => return self.store_failure("paired-installations", err),
        };

        if paired.is_empty() {
            tracing::debug!(user = %session.user, "no logged-in paired devices, nothing to push");
            return Ok(EventOutcome::NoPairedDevices);
        }

        let targets: Vec<String> = paired.into_iter().map(|i| i.installation_id).collect();
        let alert = format!(
            "Device {} is {}",
            installation.device_name,
            self.config.display_state(&event.value.state)
        );

        let request = PushRequest {
            target: PushTarget::InstallationIds(targets.clone()),
            data: PushData::Event(EventPush {
                action: self.config.event_action.clone(),
                user_session_id: session.object_id,
                installation_id: installation.installation_id,
                event: event.clone(),
                alert,
            }),
        };

        match self.push.send(request).await {
            Ok(()) => {
                tracing::info!(targets = targets.len(), "sent event push to paired phones");
                Ok(EventOutcome::Notified { targets })
            }
            Err(err) => {
                tracing::error!(error = %err, "event push dispatch failed");
                Ok(EventOutcome::PushFailed)
            }
        }
    }

    /// Fold a store failure into the outcome, except scope violations which
    /// surface as errors.
    fn store_failure(
        &self,
        stage: &'static str,
        err: StoreError,
    ) -> Result<EventOutcome, TriggerError> {
        if matches!(err, StoreError::ScopeDenied { .. }) {
            return Err(TriggerError::Store(err));
        }
        tracing::error!(stage, error = %err, "store operation failed, halting event trigger");
        Ok(EventOutcome::Halted { stage })
    }
}
