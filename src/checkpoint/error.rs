//! Errors raised while saving or restoring session checkpoints.

use thiserror::Error;

/// Why a session checkpoint could not be written, read or restored.
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// Encoding the machines and undo history failed
    #[error("Could not encode session checkpoint: {0}")]
    SerializationFailed(String),

    /// Input is not a session checkpoint in the expected encoding
    #[error("Could not decode session checkpoint: {0}")]
    DeserializationFailed(String),

    /// Written by an incompatible release of the checkpoint format
    #[error("Session checkpoint has format version {found}, this build reads {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// Names actors, machine types or states the target session does not have
    #[error("Session checkpoint does not fit this session: {0}")]
    ValidationFailed(String),
}
