//! Undo history configuration.

use serde::{Deserialize, Serialize};

/// Entries kept by default before the oldest ones are evicted.
pub const DEFAULT_MAX_HISTORY: usize = 1000;

/// How much history an `UndoController` retains.
///
/// History is a single linear sequence ("limited linear undo"). When the
/// bound is exceeded the oldest entry is dropped, one entry at a time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UndoConfig {
    /// Maximum number of retained entries; `None` keeps everything.
    pub max_history: Option<usize>,
}

impl Default for UndoConfig {
    fn default() -> Self {
        Self {
            max_history: Some(DEFAULT_MAX_HISTORY),
        }
    }
}

impl UndoConfig {
    pub fn bounded(max_history: usize) -> Self {
        Self {
            max_history: Some(max_history),
        }
    }

    pub fn unbounded() -> Self {
        Self { max_history: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_bounded() {
        assert_eq!(UndoConfig::default().max_history, Some(DEFAULT_MAX_HISTORY));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: UndoConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, UndoConfig::default());
    }

    #[test]
    fn null_bound_means_unbounded() {
        let config: UndoConfig = serde_json::from_str(r#"{ "max_history": null }"#).unwrap();
        assert_eq!(config, UndoConfig::unbounded());
    }
}
