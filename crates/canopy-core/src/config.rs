//! Project definitions and scan settings.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::path_resolver::{absolutize, normalize};

/// A project or module as declared in a project definition file.
///
/// Modules nest arbitrarily deep. `base_dir` is resolved against the
/// enclosing module's base directory when relative; when omitted a module
/// lives in a directory named after its key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDefinition {
    pub key: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub base_dir: Option<PathBuf>,
    #[serde(default)]
    pub modules: Vec<ProjectDefinition>,
}

impl ProjectDefinition {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    /// Parse a definition from JSON text.
    pub fn from_json_str(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Read and parse a definition file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Number of declared modules, this one included.
    pub fn module_count(&self) -> usize {
        1 + self.modules.iter().map(Self::module_count).sum::<usize>()
    }
}

/// Settings for one hierarchy run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    #[serde(default)]
    pub project_file: PathBuf,
    pub output_path: Option<PathBuf>,
    #[serde(default = "default_validate")]
    pub validate: bool,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub quiet: bool,
}

fn default_validate() -> bool {
    true
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            project_file: PathBuf::new(),
            output_path: None,
            validate: default_validate(),
            verbose: false,
            quiet: false,
        }
    }
}

impl ScanConfig {
    /// Absolute directory the project file lives in; base directories
    /// resolve from here. A relative project file is taken from the current
    /// working directory.
    pub fn project_dir(&self) -> PathBuf {
        let dir = match self.project_file.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        absolutize(dir)
    }
}
