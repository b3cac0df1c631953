//! Canopy CLI — inspect the module hierarchy of a multi-module project.

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

use canopy_core::config::ScanConfig;
use canopy_core::pipeline;
use canopy_core::{InputModule, ModuleHierarchy};

#[derive(Parser)]
#[command(
    name = "canopy",
    about = "Canopy - Map how the modules of a project nest inside each other"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the module hierarchy declared by a project definition
    Modules {
        /// Path to the project definition (JSON)
        project_file: PathBuf,

        /// Write the hierarchy report to this JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip the tree consistency check
        #[arg(long)]
        no_validate: bool,

        /// Show debug logging and per-phase timings
        #[arg(long)]
        verbose: bool,

        /// Suppress all output except errors
        #[arg(long)]
        quiet: bool,
    },
}

fn init_logging(verbose: bool, quiet: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Modules {
            project_file,
            output,
            no_validate,
            verbose,
            quiet,
        } => {
            init_logging(verbose, quiet);

            let project_file = project_file.canonicalize().unwrap_or(project_file);
            let config = ScanConfig {
                project_file,
                output_path: output,
                validate: !no_validate,
                verbose,
                quiet,
            };
            run(&config);
        }
    }
}

fn run(config: &ScanConfig) {
    let start = Instant::now();
    let out = match pipeline::run_pipeline(config, None) {
        Ok(out) => out,
        Err(e) => {
            eprintln!("{} {e}", style("error:").red().bold());
            std::process::exit(1);
        }
    };

    if config.quiet {
        return;
    }

    let h = &out.hierarchy;
    println!(
        "\n{}  Canopy Modules: {}",
        style("✓").green().bold(),
        style(h.root().name()).bold()
    );
    println!();
    print_tree(h, h.root(), 1);

    println!();
    println!("  {:<14} {}", "Modules:", h.len());
    println!(
        "  {:<14} {}",
        "Max depth:",
        out.report
            .stats
            .get("max_depth")
            .unwrap_or(&serde_json::json!(0))
    );
    println!(
        "  {:<14} {:.1}ms",
        "Duration:",
        start.elapsed().as_secs_f64() * 1000.0
    );

    if config.verbose {
        if let Some(serde_json::Value::Object(timings)) = out.report.metadata.get("phase_timings")
        {
            println!("\n  Phase Timings:");
            for (phase, secs) in timings {
                if let Some(val) = secs.as_f64() {
                    println!("    {:<14} {:.3}ms", phase, val * 1000.0);
                }
            }
        }
    }

    if let Some(path) = &config.output_path {
        println!(
            "\n  {} {}",
            style("Output written to:").green(),
            path.display()
        );
    }
}

fn print_tree(h: &ModuleHierarchy<InputModule>, module: &InputModule, indent: usize) {
    let path = match h.relative_path(module) {
        Some(p) if p.is_empty() => style(".".to_string()).dim(),
        Some(p) => style(p).cyan(),
        None => style("<not nested>".to_string()).yellow(),
    };
    let name = if module.name() == module.key() {
        String::new()
    } else {
        format!(" {}", style(format!("({})", module.name())).dim())
    };
    println!("{}{}{}  {}", "  ".repeat(indent), module.key(), name, path);

    for child in h.children(module) {
        print_tree(h, child, indent + 1);
    }
}
