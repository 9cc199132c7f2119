use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    documents: HashMap<String, DocumentEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DocumentEntry {
    Path(String),
    Detailed {
        path: String,
        #[serde(default)]
        bones: Vec<String>,
        #[serde(default)]
        colliders: Vec<String>,
    },
}

impl DocumentEntry {
    fn as_path(&self) -> &str {
        match self {
            DocumentEntry::Path(path) => path,
            DocumentEntry::Detailed { path, .. } => path,
        }
    }
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn lookup<'a, T>(map: &'a HashMap<String, T>, kind: &str, name: &str) -> Result<&'a T> {
    map.get(name)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

/// XML settings documents.
pub mod documents {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.documents.keys().cloned().collect()
    }

    pub fn xml(name: &str) -> Result<String> {
        let entry = lookup(&MANIFEST.documents, "document", name)?;
        read_to_string(entry.as_path())
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        let entry = lookup(&MANIFEST.documents, "document", name)?;
        Ok(resolve_path(entry.as_path()))
    }

    /// Bone record names the manifest declares for `name`, in document order.
    pub fn bone_names(name: &str) -> Result<Vec<String>> {
        match lookup(&MANIFEST.documents, "document", name)? {
            DocumentEntry::Detailed { bones, .. } => Ok(bones.clone()),
            DocumentEntry::Path(_) => Ok(Vec::new()),
        }
    }

    /// Collider record names the manifest declares for `name`, in document order.
    pub fn collider_names(name: &str) -> Result<Vec<String>> {
        match lookup(&MANIFEST.documents, "document", name)? {
            DocumentEntry::Detailed { colliders, .. } => Ok(colliders.clone()),
            DocumentEntry::Path(_) => Ok(Vec::new()),
        }
    }

    /// Copy the fixture into `dir` (keeping its file name) so tests can
    /// modify it. Returns the new path.
    pub fn copy_to(name: &str, dir: &Path) -> Result<PathBuf> {
        let src = path(name)?;
        let file_name = src
            .file_name()
            .ok_or_else(|| anyhow!("fixture '{name}' has no file name"))?;
        let dst = dir.join(file_name);
        fs::copy(&src, &dst).with_context(|| {
            format!("failed to copy fixture {} to {}", src.display(), dst.display())
        })?;
        Ok(dst)
    }
}
