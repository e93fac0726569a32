//! After-save trigger handlers for a "find my device" style backend.
//!
//! When a device saves an [`Event`](models::Event) (e.g. "ringing",
//! "blinking") or a phone saves a [`Message`](models::Message), the hosting
//! platform invokes the registered after-save triggers. The
//! [`PairingNotifier`] then resolves which other installations belong to the
//! same logged-in user and asks the platform's push service to notify them.
//!
//! The crate owns no state of its own: records live in the platform's store
//! (behind [`store::RecordStore`]) and delivery happens through the
//! platform's push service (behind [`push::PushSender`]). Every external
//! operation is best-effort — failures are logged, never retried, and never
//! surfaced to the client that saved the record.

pub mod config;
pub mod error;
pub mod models;
pub mod push;
pub mod store;
pub mod triggers;

pub use config::NotifierConfig;
pub use error::Error;
pub use triggers::PairingNotifier;

/// Initialize tracing output for hosts that don't bring their own subscriber.
///
/// Respects `RUST_LOG`, defaulting to `info`. Safe to call more than once;
/// later calls are no-ops.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
