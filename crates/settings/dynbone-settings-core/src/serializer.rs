//! Export and import of one target's settings to and from a settings file.
//!
//! Export: load or create the document, locate or create the record, rebuild
//! its parameter block from the schema's declared fields, rewrite the file.
//! Import: load the document, locate the record, decode its parameters and
//! apply them to the target. A missing record is a no-op.

use std::marker::PhantomData;
use std::path::Path;

use log::{debug, warn};

use crate::bone::BoneSettings;
use crate::codec::{apply_params, encode_settings};
use crate::collider::ColliderSettings;
use crate::config::{ExportPolicy, SettingsConfig};
use crate::document::{
    data_version, read_block, reset_block, validate_record_name, SettingsDocument, DATA_VERSION,
};
use crate::error::Result;
use crate::schema::Settings;

/// Result of a successful export call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportOutcome {
    /// A new record was appended.
    Created,
    /// An existing record with the same name was rebuilt.
    Overwritten,
    /// The record exists and the policy forbids overwriting; nothing was written.
    Skipped,
}

impl ExportOutcome {
    #[inline]
    pub fn is_written(&self) -> bool {
        !matches!(self, ExportOutcome::Skipped)
    }
}

/// Result of a successful import call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImportOutcome {
    /// The record was found; `fields` values were written onto the target.
    Applied { fields: usize },
    /// No record with that name; the target is unchanged.
    NoSuchRecord,
}

/// Serializer for one target type. See [`BoneSettingSerializer`] and
/// [`ColliderSettingSerializer`].
#[derive(Debug, Clone)]
pub struct SettingSerializer<T> {
    policy: ExportPolicy,
    indent: bool,
    _target: PhantomData<fn() -> T>,
}

pub type BoneSettingSerializer = SettingSerializer<BoneSettings>;
pub type ColliderSettingSerializer = SettingSerializer<ColliderSettings>;

impl<T: Settings> Default for SettingSerializer<T> {
    fn default() -> Self {
        Self::new(ExportPolicy::default(), true)
    }
}

impl<T: Settings> SettingSerializer<T> {
    pub fn new(policy: ExportPolicy, indent: bool) -> Self {
        Self {
            policy,
            indent,
            _target: PhantomData,
        }
    }

    pub fn from_config(config: &SettingsConfig) -> Self {
        Self::new(config.overwrite, config.indent)
    }

    pub fn with_policy(mut self, policy: ExportPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Write `target` under `name` into `doc`. Returns true when the record
    /// was created rather than rebuilt.
    pub fn export_into(&self, doc: &mut SettingsDocument, target: &T, name: &str) -> Result<bool> {
        let kind = T::record_kind();
        let created = !doc.contains(kind, name);
        let record = doc.locate_or_create(kind, name)?;
        let block = reset_block(record)?;
        encode_settings(target, block)?;
        Ok(created)
    }

    /// Apply the record named `name` from `doc` onto `target`.
    pub fn import_from(
        &self,
        doc: &SettingsDocument,
        name: &str,
        target: &mut T,
    ) -> Result<ImportOutcome> {
        let kind = T::record_kind();
        let Some(record) = doc.locate(kind, name) else {
            debug!("no {} record named '{}'", kind.element_name(), name);
            return Ok(ImportOutcome::NoSuchRecord);
        };

        match data_version(record) {
            Some(version) if version == DATA_VERSION => {}
            other => warn!(
                "{} record '{}' has data version {:?} (expected {}); applying anyway",
                kind.element_name(),
                name,
                other,
                DATA_VERSION
            ),
        }

        let fields = apply_params(read_block(record), target)?;
        Ok(ImportOutcome::Applied { fields })
    }

    /// Export `target` under `name` to the file at `path`, creating the file if
    /// needed. An existing file that does not parse is reported and left as is.
    pub fn export(&self, target: &T, name: &str, path: &Path) -> Result<ExportOutcome> {
        let kind = T::record_kind();
        validate_record_name(name)?;
        let mut doc = SettingsDocument::load_or_new(path)?;

        if self.policy == ExportPolicy::KeepExisting && doc.contains(kind, name) {
            debug!(
                "{} record '{}' already exists in {}; not overwriting",
                kind.element_name(),
                name,
                path.display()
            );
            return Ok(ExportOutcome::Skipped);
        }

        let created = self.export_into(&mut doc, target, name)?;
        doc.save(path, self.indent)?;

        let outcome = if created {
            ExportOutcome::Created
        } else {
            ExportOutcome::Overwritten
        };
        debug!(
            "exported {} record '{}' to {} ({:?})",
            kind.element_name(),
            name,
            path.display(),
            outcome
        );
        Ok(outcome)
    }

    /// Import the record named `name` from the file at `path` onto `target`.
    /// Any error leaves `target` unmodified.
    pub fn import(&self, path: &Path, name: &str, target: &mut T) -> Result<ImportOutcome> {
        let doc = SettingsDocument::load(path)?;
        let outcome = self.import_from(&doc, name, target)?;
        debug!(
            "imported {} record '{}' from {}: {:?}",
            T::record_kind().element_name(),
            name,
            path.display(),
            outcome
        );
        Ok(outcome)
    }
}

/// A versioned on-disk settings format.
pub trait SettingsFormat {
    /// Version stamped on records this format creates.
    fn data_version(&self) -> &'static str;

    fn export_bone(&self, target: &BoneSettings, name: &str, path: &Path)
        -> Result<ExportOutcome>;

    fn export_collider(
        &self,
        target: &ColliderSettings,
        name: &str,
        path: &Path,
    ) -> Result<ExportOutcome>;

    fn import_bone(&self, path: &Path, name: &str, target: &mut BoneSettings)
        -> Result<ImportOutcome>;

    fn import_collider(
        &self,
        path: &Path,
        name: &str,
        target: &mut ColliderSettings,
    ) -> Result<ImportOutcome>;
}

/// Format version 1.0.
#[derive(Debug, Clone, Default)]
pub struct SettingsFormatV1 {
    bones: BoneSettingSerializer,
    colliders: ColliderSettingSerializer,
}

impl SettingsFormatV1 {
    pub fn new(config: &SettingsConfig) -> Self {
        Self {
            bones: SettingSerializer::from_config(config),
            colliders: SettingSerializer::from_config(config),
        }
    }

    pub fn bones(&self) -> &BoneSettingSerializer {
        &self.bones
    }

    pub fn colliders(&self) -> &ColliderSettingSerializer {
        &self.colliders
    }
}

impl SettingsFormat for SettingsFormatV1 {
    fn data_version(&self) -> &'static str {
        DATA_VERSION
    }

    fn export_bone(&self, target: &BoneSettings, name: &str, path: &Path) -> Result<ExportOutcome> {
        self.bones.export(target, name, path)
    }

    fn export_collider(
        &self,
        target: &ColliderSettings,
        name: &str,
        path: &Path,
    ) -> Result<ExportOutcome> {
        self.colliders.export(target, name, path)
    }

    fn import_bone(
        &self,
        path: &Path,
        name: &str,
        target: &mut BoneSettings,
    ) -> Result<ImportOutcome> {
        self.bones.import(path, name, target)
    }

    fn import_collider(
        &self,
        path: &Path,
        name: &str,
        target: &mut ColliderSettings,
    ) -> Result<ImportOutcome> {
        self.colliders.import(path, name, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{element_text, RecordKind};
    use crate::value::Vec3;

    #[test]
    fn export_into_rebuilds_block_in_declared_order() {
        let serializer = BoneSettingSerializer::default();
        let mut doc = SettingsDocument::new();
        let mut bone = BoneSettings::default();

        assert!(serializer.export_into(&mut doc, &bone, "hair").unwrap());
        bone.gravity = Vec3::new(0.0, -1.0, 0.0);
        assert!(!serializer.export_into(&mut doc, &bone, "hair").unwrap());

        let record = doc.locate(RecordKind::Bone, "hair").unwrap();
        let names: Vec<_> = read_block(record)
            .iter()
            .map(|p| p.attributes["name"].clone())
            .collect();
        let declared: Vec<_> = BoneSettings::schema().names().collect();
        assert_eq!(names, declared);
        let gravity = read_block(record)[14];
        assert_eq!(element_text(gravity.get_child("y").unwrap()), "-1");
    }

    #[test]
    fn import_from_missing_record_is_noop() {
        let serializer = ColliderSettingSerializer::default();
        let doc = SettingsDocument::new();
        let mut collider = ColliderSettings::default();
        let outcome = serializer.import_from(&doc, "absent", &mut collider).unwrap();
        assert_eq!(outcome, ImportOutcome::NoSuchRecord);
        assert_eq!(collider, ColliderSettings::default());
    }

    #[test]
    fn document_roundtrip_applies_every_field() {
        let serializer = ColliderSettingSerializer::default();
        let mut doc = SettingsDocument::new();
        let source = ColliderSettings {
            radius: 0.05,
            height: 0.3,
            ..Default::default()
        };
        serializer.export_into(&mut doc, &source, "c").unwrap();

        let mut target = ColliderSettings::default();
        let outcome = serializer.import_from(&doc, "c", &mut target).unwrap();
        assert_eq!(outcome, ImportOutcome::Applied { fields: 5 });
        assert_eq!(target, source);
    }
}
