//! Turns a nested project definition into a module hierarchy.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::config::ProjectDefinition;
use crate::error::ReactorError;
use crate::hierarchy::ModuleHierarchy;
use crate::module::InputModule;
use crate::path_resolver::{absolutize, normalize, relativize};

/// Letters, digits, `-`, `_`, `.` and `:`, with at least one non-digit.
static KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_.:-]*[A-Za-z_.:-][A-Za-z0-9_.:-]*$").unwrap()
});

/// Whether `key` is acceptable as a project or module key.
pub fn is_valid_key(key: &str) -> bool {
    KEY_RE.is_match(key)
}

/// Resolve `declared` against `parent_dir`; absolute paths are kept as-is.
fn resolve_dir(parent_dir: &Path, declared: Option<&Path>, fallback: &str) -> PathBuf {
    let joined = match declared {
        Some(dir) if dir.is_absolute() => dir.to_path_buf(),
        Some(dir) => parent_dir.join(dir),
        None => parent_dir.join(fallback),
    };
    normalize(&joined)
}

fn to_module(def: &ProjectDefinition, key: String, base_dir: PathBuf) -> InputModule {
    let name = def.name.clone().unwrap_or_else(|| def.key.clone());
    InputModule::with_details(key, name, def.description.clone(), base_dir)
}

/// Build the hierarchy declared by `definition`.
///
/// The root's base directory is `project_dir` joined with its declared
/// `base_dir`; a relative `project_dir` is taken from the current working
/// directory, so every module carries an absolute base directory. A module
/// without `base_dir` lives in `<parent dir>/<key>`. Module keys are
/// prefixed with their parent's key (`shop:api`).
///
/// The tree shape comes from the nesting of the definition, so the result
/// always satisfies [`ModuleHierarchy::validate`].
pub fn build_hierarchy(
    definition: &ProjectDefinition,
    project_dir: &Path,
) -> Result<ModuleHierarchy<InputModule>, ReactorError> {
    if !is_valid_key(&definition.key) {
        return Err(ReactorError::InvalidKey {
            key: definition.key.clone(),
        });
    }

    let project_dir = absolutize(project_dir);
    let root_dir = match &definition.base_dir {
        Some(dir) => resolve_dir(&project_dir, Some(dir), ""),
        None => project_dir,
    };
    let root = to_module(definition, definition.key.clone(), root_dir);

    let mut seen: HashSet<String> = HashSet::new();
    seen.insert(root.key().to_string());
    let mut parents: HashMap<InputModule, InputModule> = HashMap::new();

    let mut stack: Vec<(&ProjectDefinition, InputModule)> = definition
        .modules
        .iter()
        .rev()
        .map(|m| (m, root.clone()))
        .collect();

    while let Some((def, parent)) = stack.pop() {
        if !is_valid_key(&def.key) {
            return Err(ReactorError::InvalidKey {
                key: def.key.clone(),
            });
        }
        let key = format!("{}:{}", parent.key(), def.key);
        if !seen.insert(key.clone()) {
            return Err(ReactorError::DuplicateKey { key });
        }

        let base_dir = resolve_dir(parent.base_dir(), def.base_dir.as_deref(), &def.key);
        if relativize(parent.base_dir(), &base_dir).is_none() {
            log::warn!(
                "Module '{}' at {} is not nested under '{}' at {}",
                key,
                base_dir.display(),
                parent.key(),
                parent.base_dir().display()
            );
        }
        log::debug!("Resolved module '{}' at {}", key, base_dir.display());

        let module = to_module(def, key, base_dir);
        for child in def.modules.iter().rev() {
            stack.push((child, module.clone()));
        }
        parents.insert(module, parent);
    }

    Ok(ModuleHierarchy::from_pairs(root, parents))
}
