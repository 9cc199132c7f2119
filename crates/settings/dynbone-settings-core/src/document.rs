//! Settings document: the on-disk XML tree, record lookup and parameter blocks.
//!
//! ```text
//! <DynamicBones>
//!   <Bone>
//!     <Name>hair</Name>
//!     <DataVersion>1.0</DataVersion>
//!     <Params><Param name="m_UpdateRate">60</Param>...</Params>
//!   </Bone>
//!   <Collider>...</Collider>
//! </DynamicBones>
//! ```

use std::borrow::Cow;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use xmltree::{Element, EmitterConfig, XMLNode};

use crate::error::{Result, SettingsError};

pub const ROOT_ELEMENT: &str = "DynamicBones";
pub const NAME_ELEMENT: &str = "Name";
pub const DATA_VERSION_ELEMENT: &str = "DataVersion";
pub const PARAMS_ELEMENT: &str = "Params";
pub const PARAM_ELEMENT: &str = "Param";
pub const NAME_ATTRIBUTE: &str = "name";

/// Version stamped on newly created records. Existing stamps are never rewritten.
pub const DATA_VERSION: &str = "1.0";

const DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Kind of a top-level record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    Bone,
    Collider,
}

impl RecordKind {
    pub fn element_name(self) -> &'static str {
        match self {
            RecordKind::Bone => "Bone",
            RecordKind::Collider => "Collider",
        }
    }
}

/// Iterate the element children of `parent`, skipping text and comments.
pub(crate) fn child_elements(parent: &Element) -> impl Iterator<Item = &Element> {
    parent.children.iter().filter_map(|node| match node {
        XMLNode::Element(e) => Some(e),
        _ => None,
    })
}

pub(crate) fn text_element(name: &str, text: impl Into<String>) -> Element {
    let mut e = Element::new(name);
    e.children.push(XMLNode::Text(text.into()));
    e
}

pub(crate) fn element_text(e: &Element) -> Cow<'_, str> {
    e.get_text().unwrap_or(Cow::Borrowed(""))
}

/// Name of a record, or `None` when it has no `<Name>` child.
pub fn record_name(record: &Element) -> Option<Cow<'_, str>> {
    record.get_child(NAME_ELEMENT).map(element_text)
}

/// Data version stamp of a record.
pub fn data_version(record: &Element) -> Option<Cow<'_, str>> {
    record.get_child(DATA_VERSION_ELEMENT).map(element_text)
}

fn is_record(e: &Element, kind: RecordKind, name: &str) -> bool {
    e.name == kind.element_name() && record_name(e).as_deref() == Some(name)
}

/// Check that `name` can address a record after the document is reloaded.
pub fn validate_record_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(SettingsError::InvalidRecordName {
            name: name.to_string(),
        });
    }
    Ok(())
}

fn new_record(kind: RecordKind, name: &str) -> Element {
    let mut record = Element::new(kind.element_name());
    record
        .children
        .push(XMLNode::Element(text_element(NAME_ELEMENT, name)));
    record
        .children
        .push(XMLNode::Element(text_element(DATA_VERSION_ELEMENT, DATA_VERSION)));
    record
}

/// Clear the record's parameter block and return it, attaching an empty one
/// if the record has none. Extra `<Params>` siblings are dropped so exactly
/// one block remains.
pub fn reset_block(record: &mut Element) -> Result<&mut Element> {
    let mut seen = false;
    record.children.retain(|node| match node {
        XMLNode::Element(e) if e.name == PARAMS_ELEMENT => !std::mem::replace(&mut seen, true),
        _ => true,
    });
    if !seen {
        record
            .children
            .push(XMLNode::Element(Element::new(PARAMS_ELEMENT)));
    }

    let field = record_name(record).map(Cow::into_owned).unwrap_or_default();
    let block = record
        .get_mut_child(PARAMS_ELEMENT)
        .ok_or(SettingsError::MissingElement {
            field,
            element: PARAMS_ELEMENT,
        })?;
    block.children.clear();
    Ok(block)
}

/// `<Param>` entries of the record's parameter block, in document order.
pub fn read_block(record: &Element) -> Vec<&Element> {
    record
        .get_child(PARAMS_ELEMENT)
        .map(|block| {
            child_elements(block)
                .filter(|e| e.name == PARAM_ELEMENT)
                .collect()
        })
        .unwrap_or_default()
}

/// In-memory settings document.
#[derive(Clone, Debug, PartialEq)]
pub struct SettingsDocument {
    root: Element,
}

impl Default for SettingsDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsDocument {
    /// Fresh document holding only the root container.
    pub fn new() -> Self {
        Self {
            root: Element::new(ROOT_ELEMENT),
        }
    }

    /// Parse document bytes. `origin` names the source in errors.
    pub fn parse(bytes: &[u8], origin: &Path) -> Result<Self> {
        let root = Element::parse(bytes).map_err(|e| SettingsError::MalformedDocument {
            path: origin.to_path_buf(),
            reason: e.to_string(),
        })?;
        if root.name != ROOT_ELEMENT {
            return Err(SettingsError::UnexpectedRoot {
                path: origin.to_path_buf(),
                expected: ROOT_ELEMENT,
                found: root.name,
            });
        }
        Ok(Self { root })
    }

    pub fn parse_str(text: &str, origin: &Path) -> Result<Self> {
        Self::parse(text.as_bytes(), origin)
    }

    /// Read and parse an existing file.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|e| SettingsError::io(path, e))?;
        Self::parse(&bytes, path)
    }

    /// Like [`load`](Self::load), but a missing file yields a fresh document.
    pub fn load_or_new(path: &Path) -> Result<Self> {
        match fs::read(path) {
            Ok(bytes) => Self::parse(&bytes, path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("{} does not exist; starting a new document", path.display());
                Ok(Self::new())
            }
            Err(e) => Err(SettingsError::io(path, e)),
        }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Records of `kind` in document order.
    pub fn records(&self, kind: RecordKind) -> impl Iterator<Item = &Element> {
        child_elements(&self.root).filter(move |e| e.name == kind.element_name())
    }

    /// Names of all named records of `kind`, in document order.
    pub fn record_names(&self, kind: RecordKind) -> Vec<String> {
        self.records(kind)
            .filter_map(record_name)
            .map(Cow::into_owned)
            .collect()
    }

    /// First record of `kind` whose name matches exactly.
    pub fn locate(&self, kind: RecordKind, name: &str) -> Option<&Element> {
        self.records(kind).find(|e| is_record(e, kind, name))
    }

    pub fn contains(&self, kind: RecordKind, name: &str) -> bool {
        self.locate(kind, name).is_some()
    }

    fn locate_mut(&mut self, kind: RecordKind, name: &str) -> Option<&mut Element> {
        self.root.children.iter_mut().find_map(|node| match node {
            XMLNode::Element(e) if is_record(e, kind, name) => Some(e),
            _ => None,
        })
    }

    /// First record of `kind` named `name`, appending a new one stamped with
    /// [`DATA_VERSION`] when none exists. Names that are empty or only
    /// whitespace are rejected; they do not survive a reload.
    pub fn locate_or_create(&mut self, kind: RecordKind, name: &str) -> Result<&mut Element> {
        validate_record_name(name)?;
        if !self.contains(kind, name) {
            debug!("creating {} record '{}'", kind.element_name(), name);
            self.root
                .children
                .push(XMLNode::Element(new_record(kind, name)));
        }
        self.locate_mut(kind, name)
            .ok_or_else(|| SettingsError::InvalidRecordName {
                name: name.to_string(),
            })
    }

    /// Serialize with the standard XML declaration.
    pub fn to_xml_string(&self, indent: bool) -> Result<String> {
        let config = EmitterConfig::new()
            .perform_indent(indent)
            .indent_string("  ")
            .write_document_declaration(false);
        let mut body = Vec::new();
        self.root
            .write_with_config(&mut body, config)
            .map_err(|e| SettingsError::Emit {
                reason: e.to_string(),
            })?;
        let body = String::from_utf8(body).map_err(|e| SettingsError::Emit {
            reason: e.to_string(),
        })?;
        Ok(format!("{DECLARATION}\n{body}\n"))
    }

    /// Replace the file at `path` with this document. The text is written to a
    /// temporary file in the same directory and renamed over the target, so a
    /// failed write leaves the previous content in place.
    pub fn save(&self, path: &Path, indent: bool) -> Result<()> {
        let text = self.to_xml_string(indent)?;
        write_atomic(path, text.as_bytes())
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir: PathBuf = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir).map_err(|e| SettingsError::io(&dir, e))?;

    // The temp file starts owner-only; give it the mode the target has (or
    // would get from a plain create) before it replaces the target.
    let permissions = match fs::metadata(path) {
        Ok(meta) => Some(meta.permissions()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => new_file_permissions(),
        Err(e) => return Err(SettingsError::io(path, e)),
    };

    let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| SettingsError::io(&dir, e))?;
    tmp.write_all(bytes)
        .map_err(|e| SettingsError::io(tmp.path(), e))?;
    if let Some(permissions) = permissions {
        tmp.as_file()
            .set_permissions(permissions)
            .map_err(|e| SettingsError::io(tmp.path(), e))?;
    }
    tmp.as_file()
        .sync_all()
        .map_err(|e| SettingsError::io(tmp.path(), e))?;
    tmp.persist(path)
        .map_err(|e| SettingsError::io(path, e.error))?;
    Ok(())
}

#[cfg(unix)]
fn new_file_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<fs::Permissions> {
    None
}
