//! Dispatch settings - thresholds, defaults, and compliance toggles
//!
//! A single configuration record consumed by the workflow engine. The
//! settings collaborator reads it from a YAML file at startup and writes it
//! back wholesale on save; there is no history or versioning.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::core::events::{DispatchEvent, EventKind};
use crate::entities::arrival::Destination;

/// Errors that can occur loading or saving settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to parse settings YAML: {message}")]
    Yaml { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Dispatch configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchSettings {
    /// Derive a projected ready date from the delivery milestone
    pub auto_calculate_eta: bool,

    /// Days past the pickup milestone before a paid vehicle is flagged
    pub overdue_alert_days: u32,

    /// Destination assigned to newly created arrivals
    pub default_destination: Destination,

    /// Gate the Delivered transition on keys being present
    pub require_keys_for_delivery: bool,

    /// Gate the Ready to Sell transition on the title being on hand
    pub require_title_for_ready: bool,

    /// Reconditioning time in days, used for the projected ready date
    pub standard_prep_time: u32,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl DispatchSettings {
    /// Create settings with sensible defaults
    pub fn with_defaults() -> Self {
        Self {
            auto_calculate_eta: true,
            overdue_alert_days: 3,
            default_destination: Destination::MainLot,
            require_keys_for_delivery: true,
            require_title_for_ready: true,
            standard_prep_time: 7,
        }
    }

    /// Load settings from a YAML file, falling back to defaults when the
    /// file does not exist yet
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok(Self::with_defaults());
        }
        let contents = std::fs::read_to_string(path)?;
        serde_yml::from_str(&contents).map_err(|e| SettingsError::Yaml {
            message: e.to_string(),
        })
    }

    /// Save settings wholesale and notify the settings collaborator
    pub fn save(&self, path: &Path) -> Result<DispatchEvent, SettingsError> {
        let contents = serde_yml::to_string(self).map_err(|e| SettingsError::Yaml {
            message: e.to_string(),
        })?;
        std::fs::write(path, contents)?;
        info!(path = %path.display(), "dispatch settings saved");
        Ok(DispatchEvent::now(EventKind::SettingsSaved))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let settings = DispatchSettings::with_defaults();
        assert!(settings.auto_calculate_eta);
        assert_eq!(settings.overdue_alert_days, 3);
        assert_eq!(settings.default_destination, Destination::MainLot);
        assert!(settings.require_keys_for_delivery);
        assert!(settings.require_title_for_ready);
        assert_eq!(settings.standard_prep_time, 7);
    }

    #[test]
    fn test_load_missing_file_falls_back_to_defaults() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("dispatch.yaml");

        let settings = DispatchSettings::load(&path).unwrap();
        assert_eq!(settings, DispatchSettings::with_defaults());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("dispatch.yaml");

        let mut settings = DispatchSettings::with_defaults();
        settings.overdue_alert_days = 10;
        settings.default_destination = Destination::ServiceCenter;
        settings.require_keys_for_delivery = false;

        let event = settings.save(&path).unwrap();
        assert_eq!(event.description(), "dispatch settings saved");

        let loaded = DispatchSettings::load(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("dispatch.yaml");
        std::fs::write(&path, "overdue_alert_days: 14\n").unwrap();

        let settings = DispatchSettings::load(&path).unwrap();
        assert_eq!(settings.overdue_alert_days, 14);
        assert_eq!(settings.standard_prep_time, 7);
    }

    #[test]
    fn test_unknown_destination_rejected() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("dispatch.yaml");
        std::fs::write(&path, "default_destination: moon_base\n").unwrap();

        let err = DispatchSettings::load(&path).unwrap_err();
        assert!(matches!(err, SettingsError::Yaml { .. }));
    }
}
