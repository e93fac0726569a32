//! Error types for devicecast.

/// Top-level error type for the crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Push error: {0}")]
    Push(#[from] PushError),

    #[error("Trigger error: {0}")]
    Trigger(#[from] TriggerError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Record-store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Elevated access required for {operation}")]
    ScopeDenied { operation: String },

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Save failed: {0}")]
    Save(String),

    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Push-dispatch errors.
#[derive(Debug, thiserror::Error)]
pub enum PushError {
    #[error("Push dispatch failed: {0}")]
    Dispatch(String),

    #[error("Invalid push target: {0}")]
    InvalidTarget(String),
}

/// Trigger errors.
///
/// Platform failures observed inside a trigger pipeline (a lookup or push
/// that fails) are logged and folded into the trigger's outcome, not raised
/// here. These variants cover genuinely exceptional conditions only.
#[derive(Debug, thiserror::Error)]
pub enum TriggerError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("After-save handler already registered for class {class}")]
    AlreadyRegistered { class: String },
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}
