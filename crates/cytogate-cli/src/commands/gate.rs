use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use cytogate_core::config::{run_gates, GateConfig};
use cytogate_core::io::ExportFormat;
use cytogate_core::service::create_backend;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use crate::summary::{print_gate_config, print_gate_report};

#[derive(Args)]
pub struct GateArgs {
    /// Gate config file (TOML)
    pub config: PathBuf,

    /// Override the input FCS file
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Override the output path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override the export format (csv, xlsx, parquet)
    #[arg(short, long)]
    pub format: Option<ExportFormat>,

    /// Also write <output>_metadata.json
    #[arg(long)]
    pub metadata: bool,
}

pub fn run(args: &GateArgs) -> Result<()> {
    let mut config = GateConfig::load(&args.config)
        .with_context(|| format!("Failed to read config {}", args.config.display()))?;
    if let Some(ref input) = args.input {
        config.input = input.clone();
    }
    if let Some(ref output) = args.output {
        config.output = output.clone();
    }
    if args.format.is_some() {
        config.format = args.format;
    }
    config.export_metadata |= args.metadata;

    let backend = create_backend();
    debug!(
        backend = backend.name(),
        gates = config.gates.len(),
        "Starting gate run"
    );
    print_gate_config(&config, backend.name());

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg:20} [{bar:40}] {pos}%")?
            .progress_chars("=> "),
    );

    let report = run_gates(&config, backend.as_ref(), |stage, progress| {
        pb.set_message(stage.to_string());
        pb.set_position((progress * 100.0) as u64);
    })
    .with_context(|| format!("Gating {} failed", config.input.display()))?;

    pb.finish_with_message("Done");
    print_gate_report(&report);

    Ok(())
}
