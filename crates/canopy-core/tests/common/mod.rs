//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use canopy_core::config::ScanConfig;
use canopy_core::pipeline::{run_pipeline, PipelineOutput};
use canopy_core::{InputModule, ModuleHierarchy, PipelineError};

// ---------------------------------------------------------------------------
// Fixture path resolution
// ---------------------------------------------------------------------------

/// Resolve `tests/fixtures/{name}` relative to the workspace root.
pub fn fixture_path(name: &str) -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    Path::new(manifest_dir)
        .join("../../tests/fixtures")
        .join(name)
        .canonicalize()
        .unwrap_or_else(|_| {
            Path::new(manifest_dir)
                .join("../../tests/fixtures")
                .join(name)
        })
}

/// Scan config pointing at `tests/fixtures/{name}/canopy.json`.
pub fn fixture_config(name: &str) -> ScanConfig {
    ScanConfig {
        project_file: fixture_path(name).join("canopy.json"),
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Runners
// ---------------------------------------------------------------------------

pub fn try_run_fixture(name: &str) -> Result<PipelineOutput, PipelineError> {
    run_pipeline(&fixture_config(name), None)
}

pub fn run_fixture(name: &str) -> PipelineOutput {
    try_run_fixture(name).expect("fixture should build")
}

// ---------------------------------------------------------------------------
// Extractors
// ---------------------------------------------------------------------------

pub fn module<'a>(h: &'a ModuleHierarchy<InputModule>, key: &str) -> &'a InputModule {
    h.modules()
        .find(|m| m.key() == key)
        .unwrap_or_else(|| panic!("no module '{key}'"))
}

pub fn keys<'a>(modules: impl IntoIterator<Item = &'a InputModule>) -> Vec<String> {
    modules.into_iter().map(|m| m.key().to_string()).collect()
}
