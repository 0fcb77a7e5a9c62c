//! Session configuration.

use crate::undo::UndoConfig;
use serde::{Deserialize, Serialize};

/// Settings for an `InteractionSession`.
///
/// # Example
///
/// ```rust
/// use retrace::session::SessionConfig;
///
/// let config = SessionConfig::from_json(r#"{ "undo": { "max_history": 50 } }"#).unwrap();
/// assert_eq!(config.undo.max_history, Some(50));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub undo: UndoConfig,
}

impl SessionConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
