//! JSON report of a module hierarchy.

use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::hierarchy::ModuleHierarchy;
use crate::module::InputModule;

/// Report of a hierarchy run, as written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HierarchyReport {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub stats: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub modules: Vec<ModuleOutput>,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl Default for HierarchyReport {
    fn default() -> Self {
        Self {
            version: default_version(),
            metadata: HashMap::new(),
            stats: HashMap::new(),
            modules: Vec::new(),
        }
    }
}

/// One module in the report. Paths that cannot be expressed are `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleOutput {
    pub key: String,
    pub name: String,
    pub description: Option<String>,
    pub base_dir: String,
    pub parent: Option<String>,
    #[serde(default)]
    pub children: Vec<String>,
    pub depth: usize,
    pub relative_path: Option<String>,
    pub relative_path_to_root: Option<String>,
}

fn module_output(h: &ModuleHierarchy<InputModule>, module: &InputModule) -> ModuleOutput {
    ModuleOutput {
        key: module.key().to_string(),
        name: module.name().to_string(),
        description: module.description().map(String::from),
        base_dir: module.base_dir().to_string_lossy().replace('\\', "/"),
        parent: h.parent(module).map(|p| p.key().to_string()),
        children: h
            .children(module)
            .iter()
            .map(|c| c.key().to_string())
            .collect(),
        depth: h.depth(module).unwrap_or(0),
        relative_path: h.relative_path(module),
        relative_path_to_root: h.relative_path_to_root(module),
    }
}

/// Build the report for `hierarchy`, root first.
pub fn build_report(
    hierarchy: &ModuleHierarchy<InputModule>,
    timings: &HashMap<String, f64>,
    total_ms: f64,
) -> HierarchyReport {
    let modules: Vec<ModuleOutput> = hierarchy
        .modules()
        .map(|m| module_output(hierarchy, m))
        .collect();

    let mut metadata = HashMap::new();
    metadata.insert(
        "root_key".to_string(),
        serde_json::Value::String(hierarchy.root().key().to_string()),
    );
    metadata.insert(
        "root_dir".to_string(),
        serde_json::Value::String(hierarchy.root().base_dir().to_string_lossy().to_string()),
    );
    metadata.insert(
        "generated_at".to_string(),
        serde_json::Value::String(Utc::now().to_rfc3339()),
    );
    metadata.insert(
        "canopy_version".to_string(),
        serde_json::Value::String(env!("CARGO_PKG_VERSION").to_string()),
    );

    let max_depth = modules.iter().map(|m| m.depth).max().unwrap_or(0);
    let not_nested = modules
        .iter()
        .filter(|m| m.relative_path.is_none())
        .count();
    let leaves = modules.iter().filter(|m| m.children.is_empty()).count();

    let mut stats = HashMap::new();
    stats.insert("modules".to_string(), serde_json::json!(modules.len()));
    stats.insert("max_depth".to_string(), serde_json::json!(max_depth));
    stats.insert("leaves".to_string(), serde_json::json!(leaves));
    stats.insert("not_nested".to_string(), serde_json::json!(not_nested));

    let mut report = HierarchyReport {
        version: default_version(),
        metadata,
        stats,
        modules,
    };
    report.record_timings(timings, total_ms);
    report
}

impl HierarchyReport {
    /// Replace the `duration_ms` and `phase_timings` metadata.
    pub fn record_timings(&mut self, timings: &HashMap<String, f64>, total_ms: f64) {
        self.metadata.insert(
            "duration_ms".to_string(),
            serde_json::json!(((total_ms * 10.0).round() / 10.0)),
        );
        self.metadata.insert(
            "phase_timings".to_string(),
            serde_json::to_value(timings).unwrap_or_default(),
        );
    }
}

/// Write the report as pretty-printed JSON.
pub fn write_output(report: &HierarchyReport, output_path: &std::path::Path) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(output_path, json)
}
