//! Checkpoints of an interaction session.
//!
//! A checkpoint captures where every state machine stands together with the
//! undo and redo history, so a host can persist a session and resume it
//! later with undo still working. Side-effect executors and custom actors
//! are not part of a checkpoint; they are re-attached by the host.

use crate::core::{ActorId, GroupEventId, ObjectEventId, StateId};
use crate::operation::OperationEvent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Position of one state machine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineSnapshot {
    pub actor: ActorId,
    pub machine_type: String,
    pub state: StateId,
    pub undo_enabled: bool,
}

/// Serializable checkpoint of a session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionCheckpoint {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: Uuid,

    /// When checkpoint was created
    pub timestamp: DateTime<Utc>,

    pub machines: Vec<MachineSnapshot>,

    /// Undo history, oldest first
    pub history: Vec<OperationEvent>,

    /// Redo list, next-to-redo last
    pub redo: Vec<OperationEvent>,

    /// Last ids minted by the session's allocator
    pub last_object_event_id: ObjectEventId,
    pub last_group_event_id: GroupEventId,
}

impl SessionCheckpoint {
    pub fn new(
        machines: Vec<MachineSnapshot>,
        history: Vec<OperationEvent>,
        redo: Vec<OperationEvent>,
        last_object_event_id: ObjectEventId,
        last_group_event_id: GroupEventId,
    ) -> Self {
        Self {
            version: CHECKPOINT_VERSION,
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            machines,
            history,
            redo,
            last_object_event_id,
            last_group_event_id,
        }
    }

    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        let checkpoint: Self = serde_json::from_str(json)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.check_version()?;
        Ok(checkpoint)
    }

    /// Compact binary encoding.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CheckpointError> {
        let checkpoint: Self = bincode::deserialize(bytes)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.check_version()?;
        Ok(checkpoint)
    }

    pub fn check_version(&self) -> Result<(), CheckpointError> {
        if self.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            });
        }
        Ok(())
    }
}
