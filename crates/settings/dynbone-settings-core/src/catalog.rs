//! Record catalog: point-in-time listing of the records stored in a directory
//! of settings files, for presentation in a selection menu.
//!
//! Nothing is cached; every call rescans the directory, so results reflect
//! files added, removed or edited since the previous call.

use std::fs;
use std::path::{Path, PathBuf};

use log::warn;
use serde::Serialize;

use crate::config::SettingsConfig;
use crate::document::{RecordKind, SettingsDocument};
use crate::error::{Result, SettingsError};

/// One named record found in a settings file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RecordEntry {
    pub path: PathBuf,
    pub kind: RecordKind,
    pub name: String,
}

impl RecordEntry {
    /// Menu key, unique per (file, kind, name). Collider keys carry a
    /// `__Collider__` infix; bone keys are `<path>__<name>`.
    pub fn key(&self) -> String {
        match self.kind {
            RecordKind::Bone => format!("{}__{}", self.path.display(), self.name),
            RecordKind::Collider => format!("{}__Collider__{}", self.path.display(), self.name),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Catalog {
    config: SettingsConfig,
}

impl Catalog {
    pub fn new(config: SettingsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SettingsConfig {
        &self.config
    }

    /// Records of `kind` in the configured data directory.
    pub fn scan(&self, kind: RecordKind) -> Result<Vec<RecordEntry>> {
        self.scan_dir(&self.config.data_dir, kind)
    }

    /// Records of `kind` in every settings file of `dir`, ordered by file path
    /// then document order. A missing directory yields an empty list; files
    /// that fail to parse are skipped with a warning.
    pub fn scan_dir(&self, dir: &Path, kind: RecordKind) -> Result<Vec<RecordEntry>> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(SettingsError::io(dir, e)),
        };

        let mut files = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| SettingsError::io(dir, e))?.path();
            if path.is_file() && self.config.is_settings_file(&path) {
                files.push(path);
            }
        }
        files.sort();

        let mut records = Vec::new();
        for path in files {
            let doc = match SettingsDocument::load(&path) {
                Ok(doc) => doc,
                Err(e) if e.is_data_error() => {
                    warn!("skipping unreadable settings file: {e}");
                    continue;
                }
                Err(e) => return Err(e),
            };
            records.extend(doc.record_names(kind).into_iter().map(|name| RecordEntry {
                path: path.clone(),
                kind,
                name,
            }));
        }
        Ok(records)
    }

    /// Whether `path` already holds a record of `kind` named `name`. Used to
    /// ask for confirmation before an export overwrites it.
    pub fn exists(&self, path: &Path, kind: RecordKind, name: &str) -> Result<bool> {
        if !path.exists() {
            return Ok(false);
        }
        Ok(SettingsDocument::load(path)?.contains(kind, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_BONES: &str = "<DynamicBones>\
        <Bone><Name>hair</Name><DataVersion>1.0</DataVersion></Bone>\
        <Collider><Name>head</Name><DataVersion>1.0</DataVersion></Collider>\
        <Bone><Name>skirt</Name><DataVersion>1.0</DataVersion></Bone>\
        </DynamicBones>";

    #[test]
    fn scan_lists_records_per_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.xml"), TWO_BONES).unwrap();
        fs::write(
            dir.path().join("a.XML"),
            "<DynamicBones><Bone><Name>tail</Name></Bone></DynamicBones>",
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "<DynamicBones/>").unwrap();
        fs::write(dir.path().join("broken.xml"), "<DynamicBones><Bone>").unwrap();

        let catalog = Catalog::default();
        let bones = catalog.scan_dir(dir.path(), RecordKind::Bone).unwrap();
        let names: Vec<_> = bones.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["tail", "hair", "skirt"]);
        assert_eq!(bones[1].path, dir.path().join("b.xml"));
        assert_eq!(
            bones[1].key(),
            format!("{}__hair", dir.path().join("b.xml").display())
        );

        let colliders = catalog.scan_dir(dir.path(), RecordKind::Collider).unwrap();
        assert_eq!(colliders.len(), 1);
        assert_eq!(colliders[0].name, "head");
        assert_eq!(
            colliders[0].key(),
            format!("{}__Collider__head", dir.path().join("b.xml").display())
        );
    }

    #[test]
    fn scan_of_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = Catalog::new(SettingsConfig::default().with_data_dir(dir.path().join("nope")));
        assert!(catalog.scan(RecordKind::Bone).unwrap().is_empty());
    }

    #[test]
    fn exists_checks_kind_and_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("b.xml");
        let catalog = Catalog::default();
        assert!(!catalog.exists(&path, RecordKind::Bone, "hair").unwrap());

        fs::write(&path, TWO_BONES).unwrap();
        assert!(catalog.exists(&path, RecordKind::Bone, "hair").unwrap());
        assert!(!catalog.exists(&path, RecordKind::Collider, "hair").unwrap());
        assert!(!catalog.exists(&path, RecordKind::Bone, "Hair").unwrap());
    }
}
