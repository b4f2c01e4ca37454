//! bravais run command - execute a generation config file.

use std::path::Path;

use anyhow::{Context, Result};
use bravais_mesh::{GenerationConfig, GridDims};
use colored::Colorize;
use tracing::info;

use super::{MeshDump, MeshSummary};
use crate::{Cli, OutputFormat, output};

pub fn run(config_path: &Path, out: Option<&Path>, cli: &Cli) -> Result<()> {
    let config = GenerationConfig::load(config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;
    let generated = config.run()?;

    let grid = GridDims::from(config.grid);
    let report = generated.report();
    let summary = MeshSummary::new(config.family, grid, &report);

    if let Some(path) = out {
        output::write_json(
            &MeshDump::new(
                config.family,
                grid,
                &generated.mesh,
                generated.major_axes.as_deref(),
            ),
            path,
        )?;
        info!(path = %path.display(), "Wrote mesh");
    }

    match cli.format {
        OutputFormat::Json => {
            output::print(&summary, cli.format, cli.quiet);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                let title = config.name.as_deref().unwrap_or("Generation Run");
                summary.print_text(title);
                if let Some(ref description) = config.description {
                    println!("  {}: {}", "Description".cyan(), description);
                }
                if let Some(ref axes) = generated.major_axes {
                    println!("  {}: {}", "Major axes".cyan(), axes.len());
                }
                if let Some(path) = out {
                    println!("  {}: {}", "Written".green(), path.display());
                }
            }
        }
    }

    Ok(())
}
