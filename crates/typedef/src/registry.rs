// SPDX-License-Identifier: MIT

//! Type registry: discovers `.fbt`/implementation-marker pairs on disk.

use crate::error::RegistryError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Implementation marker suffix paired with each `.fbt` definition file.
/// The behavior itself is resolved by type name through
/// `fbrt_behavior::BehaviorRegistry`; this marker file only exists so the
/// hot-reload watcher has an mtime to poll.
pub const IMPL_SUFFIX: &str = ".rs";
pub const DEFINITION_SUFFIX: &str = ".fbt";

/// Immutable `fb_type -> directory` map, built once at startup.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: HashMap<String, PathBuf>,
}

impl TypeRegistry {
    /// Walk `root` recursively, pairing every `.fbt` file with a sibling
    /// implementation marker of the same basename. Unpaired `.fbt` files are
    /// skipped with a warning, not an error.
    pub fn discover(root: &Path) -> Result<Self, RegistryError> {
        let mut types = HashMap::new();
        if root.exists() {
            walk(root, &mut types)?;
        }
        Ok(Self { types })
    }

    pub fn resolve(&self, fb_type: &str) -> Result<&Path, RegistryError> {
        self.types
            .get(fb_type)
            .map(|p| p.as_path())
            .ok_or_else(|| RegistryError::UnknownType(fb_type.to_string()))
    }

    pub fn definition_path(&self, fb_type: &str) -> Result<PathBuf, RegistryError> {
        Ok(self.resolve(fb_type)?.join(format!("{fb_type}{DEFINITION_SUFFIX}")))
    }

    pub fn implementation_path(&self, fb_type: &str) -> Result<PathBuf, RegistryError> {
        Ok(self.resolve(fb_type)?.join(format!("{fb_type}{IMPL_SUFFIX}")))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

fn walk(dir: &Path, types: &mut HashMap<String, PathBuf>) -> Result<(), RegistryError> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            walk(&path, types)?;
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(fb_type) = file_name.strip_suffix(DEFINITION_SUFFIX) else {
            continue;
        };
        let impl_path = path.with_file_name(format!("{fb_type}{IMPL_SUFFIX}"));
        if impl_path.exists() {
            types.insert(fb_type.to_string(), dir.to_path_buf());
        } else {
            tracing::warn!(
                fb_type,
                definition = %path.display(),
                "discovered .fbt but no matching implementation file, skipping"
            );
        }
    }
    Ok(())
}
