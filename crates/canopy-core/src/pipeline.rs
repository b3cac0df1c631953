//! Sequential phase orchestrator with timing.

use std::collections::HashMap;
use std::time::Instant;

use crate::config::{ProjectDefinition, ScanConfig};
use crate::error::PipelineError;
use crate::hierarchy::ModuleHierarchy;
use crate::module::InputModule;
use crate::output::{build_report, write_output, HierarchyReport};
use crate::reactor::build_hierarchy;

/// Phase labels for progress reporting.
const PHASE_LABELS: &[(&str, &str)] = &[
    ("load", "Reading project definition"),
    ("build", "Building module hierarchy"),
    ("validate", "Validating module tree"),
    ("report", "Building report"),
];

/// Progress callback type: (phase_name, label).
pub type ProgressCallback = Box<dyn FnMut(&str, &str)>;

/// Everything a run produces.
#[derive(Debug)]
pub struct PipelineOutput {
    pub hierarchy: ModuleHierarchy<InputModule>,
    pub report: HierarchyReport,
}

struct Timer {
    callback: Option<ProgressCallback>,
    timings: HashMap<String, f64>,
}

impl Timer {
    fn phase<T>(&mut self, name: &str, f: impl FnOnce() -> T) -> T {
        if let Some(ref mut cb) = self.callback {
            let label = PHASE_LABELS
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, l)| *l)
                .unwrap_or(name);
            cb(name, label);
        }
        let start = Instant::now();
        let out = f();
        self.timings
            .insert(name.to_string(), start.elapsed().as_secs_f64());
        out
    }
}

/// Load the project definition named by `config`, build its hierarchy and
/// report it.
pub fn run_pipeline(
    config: &ScanConfig,
    progress_callback: Option<ProgressCallback>,
) -> Result<PipelineOutput, PipelineError> {
    let total_start = Instant::now();
    let mut timer = Timer {
        callback: progress_callback,
        timings: HashMap::new(),
    };

    let definition = timer.phase("load", || ProjectDefinition::load(&config.project_file))?;
    log::debug!(
        "Loaded '{}' declaring {} module(s)",
        definition.key,
        definition.module_count()
    );

    let project_dir = config.project_dir();
    let hierarchy = timer.phase("build", || build_hierarchy(&definition, &project_dir))?;

    if config.validate {
        timer.phase("validate", || hierarchy.validate())?;
    }

    let mut report = timer.phase("report", || {
        build_report(&hierarchy, &HashMap::new(), 0.0)
    });
    let total_ms = total_start.elapsed().as_secs_f64() * 1000.0;
    report.record_timings(&timer.timings, total_ms);

    if let Some(path) = &config.output_path {
        write_output(&report, path).map_err(|source| PipelineError::Output {
            path: path.clone(),
            source,
        })?;
        log::info!("Report written to {}", path.display());
    }

    Ok(PipelineOutput { hierarchy, report })
}
