//! Configuration for the settings store.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SettingsError};

/// What an export does when a record with the same kind and name already exists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportPolicy {
    /// Rebuild the existing record in place.
    #[default]
    Overwrite,
    /// Leave the file untouched and report the export as skipped.
    KeepExisting,
}

/// Store configuration. Every field has a default, so partial JSON is accepted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsConfig {
    /// Directory holding the settings files.
    pub data_dir: PathBuf,
    /// Extension (without dot) of settings files, matched case-insensitively.
    pub file_extension: String,
    /// Pretty-print written documents.
    pub indent: bool,
    pub overwrite: ExportPolicy,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("ExpansionTools/DynamicBoneCopy/Datas"),
            file_extension: "xml".to_string(),
            indent: true,
            overwrite: ExportPolicy::Overwrite,
        }
    }
}

impl SettingsConfig {
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn with_policy(mut self, policy: ExportPolicy) -> Self {
        self.overwrite = policy;
        self
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let cfg: SettingsConfig =
            serde_json::from_str(s).map_err(|e| SettingsError::InvalidConfig {
                reason: e.to_string(),
            })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        let ext = self.file_extension.trim();
        if ext.is_empty() {
            return Err(SettingsError::InvalidConfig {
                reason: "file_extension must not be empty".into(),
            });
        }
        if ext.starts_with('.') {
            return Err(SettingsError::InvalidConfig {
                reason: "file_extension must not start with '.'".into(),
            });
        }
        Ok(())
    }

    /// Path of the settings file named `file_stem` inside the data directory.
    pub fn record_path(&self, file_stem: &str) -> PathBuf {
        self.data_dir
            .join(format!("{}.{}", file_stem, self.file_extension))
    }

    /// True when `path` carries the configured extension.
    pub fn is_settings_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case(&self.file_extension))
            .unwrap_or(false)
    }
}
