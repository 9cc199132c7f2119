//! dynbone-settings-core: copy, paste, export and import DynamicBone and
//! DynamicBoneCollider settings through an XML settings store.
//!
//! Each target type registers a [`Schema`] table (field name, declared kind,
//! getter/setter). The [`codec`] turns field values into `<Param>` elements and
//! back, the [`document`] module locates records and rebuilds their parameter
//! blocks, and [`SettingSerializer`] ties both to files on disk.
//!
//! ```no_run
//! use std::path::Path;
//! use dynbone_settings::{BoneSettings, SettingsConfig, SettingsFormat, SettingsFormatV1};
//!
//! let format = SettingsFormatV1::new(&SettingsConfig::default());
//! let hair = BoneSettings { damping: 0.2, ..Default::default() };
//! format.export_bone(&hair, "hair", Path::new("Datas/bones.xml"))?;
//!
//! let mut other = BoneSettings::default();
//! format.import_bone(Path::new("Datas/bones.xml"), "hair", &mut other)?;
//! # Ok::<(), dynbone_settings::SettingsError>(())
//! ```

pub mod bone;
pub mod catalog;
pub mod codec;
pub mod collider;
pub mod config;
pub mod copy;
pub mod document;
pub mod error;
pub mod schema;
pub mod serializer;
pub mod symbols;
pub mod value;

pub use bone::{BoneSettings, FreezeAxis, UpdateMode};
pub use catalog::{Catalog, RecordEntry};
pub use collider::{Bound, ColliderSettings, Direction};
pub use config::{ExportPolicy, SettingsConfig};
pub use copy::copy_settings;
pub use document::{RecordKind, SettingsDocument, DATA_VERSION};
pub use error::{Result, SettingsError};
pub use schema::{FieldDescriptor, Schema, Settings};
pub use serializer::{
    BoneSettingSerializer, ColliderSettingSerializer, ExportOutcome, ImportOutcome,
    SettingSerializer, SettingsFormat, SettingsFormatV1,
};
pub use symbols::{EnumSymbols, SymbolicEnum};
pub use value::{Curve, FieldKind, FieldValue, Keyframe, ValueKind, Vec3, WrapMode};
