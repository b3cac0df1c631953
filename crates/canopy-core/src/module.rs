//! Module handles: the unit a hierarchy is built from.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Capability a hierarchy needs from a module.
///
/// Implementors must provide stable equality/hashing (usually by key) and an
/// absolute base directory. How the module was constructed is irrelevant to
/// the hierarchy.
pub trait ProjectModule: Clone + Eq + Hash {
    /// Stable identity. Also used to order children deterministically.
    fn key(&self) -> &str;

    /// Absolute base directory of the module.
    fn base_dir(&self) -> &Path;
}

#[derive(Debug)]
struct ModuleData {
    key: String,
    name: String,
    description: Option<String>,
    base_dir: PathBuf,
}

/// A project or module taking part in a scan.
///
/// Clones share the same allocation, so handles can be stored in several
/// maps at once. Two handles are equal when their keys are equal.
#[derive(Debug, Clone)]
pub struct InputModule {
    inner: Arc<ModuleData>,
}

impl InputModule {
    pub fn new(key: impl Into<String>, base_dir: impl Into<PathBuf>) -> Self {
        let key = key.into();
        Self {
            inner: Arc::new(ModuleData {
                name: key.clone(),
                key,
                description: None,
                base_dir: base_dir.into(),
            }),
        }
    }

    /// Same as [`InputModule::new`] with an explicit display name and description.
    pub fn with_details(
        key: impl Into<String>,
        name: impl Into<String>,
        description: Option<String>,
        base_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            inner: Arc::new(ModuleData {
                key: key.into(),
                name: name.into(),
                description,
                base_dir: base_dir.into(),
            }),
        }
    }

    pub fn key(&self) -> &str {
        &self.inner.key
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn description(&self) -> Option<&str> {
        self.inner.description.as_deref()
    }

    pub fn base_dir(&self) -> &Path {
        &self.inner.base_dir
    }
}

impl ProjectModule for InputModule {
    fn key(&self) -> &str {
        InputModule::key(self)
    }

    fn base_dir(&self) -> &Path {
        InputModule::base_dir(self)
    }
}

impl PartialEq for InputModule {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner) || self.inner.key == other.inner.key
    }
}

impl Eq for InputModule {}

impl Hash for InputModule {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.key.hash(state);
    }
}

impl fmt::Display for InputModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
