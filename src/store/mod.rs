//! The platform's record-query interface.
//!
//! All records live in the external platform's store; this crate only reads
//! them (and updates a single back-reference) through [`RecordStore`]. Every
//! read may be stale and every write is best-effort — the store gives no
//! ordering guarantee between concurrent trigger runs.

mod memory;

use async_trait::async_trait;

pub use memory::MemoryStore;

use crate::error::StoreError;
use crate::models::{DeviceType, Installation, ObjectId, Session};

/// Read-access scope for a store operation.
///
/// A device's own session is restricted and cannot see other installations'
/// session records. The notifier escalates to [`AccessScope::Elevated`]
/// before the session-joining queries, mirroring the platform's master-key
/// mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessScope {
    Restricted,
    Elevated,
}

/// Typed queries over the platform's records.
///
/// The platform's generic query language supports exact-match, contained-in,
/// and matches-key-in-sub-query filters; the operations here are the fixed
/// shapes the notifier needs.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Exact-match lookup of an installation by its record id, first result.
    async fn installation_by_object_id(
        &self,
        scope: AccessScope,
        object_id: &ObjectId,
    ) -> Result<Option<Installation>, StoreError>;

    /// Point the installation's `latestEvent` back-reference at `event`.
    /// Last-write-wins; no ordering guarantee beyond save order.
    async fn set_latest_event(
        &self,
        scope: AccessScope,
        installation: &ObjectId,
        event: &ObjectId,
    ) -> Result<(), StoreError>;

    /// The session binding `user` to the given installation UUID, if any.
    /// Requires [`AccessScope::Elevated`].
    async fn session_for_installation(
        &self,
        scope: AccessScope,
        user: &ObjectId,
        installation_id: &str,
    ) -> Result<Option<Session>, StoreError>;

    /// Installations owned by `user` whose device type is contained in
    /// `device_types` and whose installation UUID matches a live session of
    /// that user (matches-key-in-sub-query over sessions). Logged-out
    /// installations are excluded. Requires [`AccessScope::Elevated`].
    async fn paired_installations(
        &self,
        scope: AccessScope,
        user: &ObjectId,
        device_types: &[DeviceType],
    ) -> Result<Vec<Installation>, StoreError>;
}
