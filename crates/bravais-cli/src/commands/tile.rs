//! bravais tile command - replicate a unit cell across a grid.

use std::path::Path;

use anyhow::Result;
use bravais_mesh::{GridDims, LatticeBuilder};
use colored::Colorize;
use tracing::info;

use super::{MeshDump, MeshSummary};
use crate::{Cli, LatticeArgs, OutputFormat, output};

pub fn run(lattice: &LatticeArgs, grid: GridDims, out: Option<&Path>, cli: &Cli) -> Result<()> {
    let generated = LatticeBuilder::new(lattice.family)
        .parameters(lattice.cell_parameters())
        .num_elems(lattice.num_elems)
        .grid_dims(grid)
        .build()?;

    let report = generated.report();
    let summary = MeshSummary::new(lattice.family, grid, &report);

    if let Some(path) = out {
        output::write_json(
            &MeshDump::new(lattice.family, grid, &generated.mesh, None),
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
                summary.print_text("Tiled Lattice");
                if let Some(path) = out {
                    println!("  {}: {}", "Written".green(), path.display());
                }
            }
        }
    }

    Ok(())
}
