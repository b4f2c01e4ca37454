//! bravais axes command - per-element major axes of a tiled lattice.

use std::path::Path;

use anyhow::Result;
use bravais_mesh::{GridDims, LatticeBuilder};
use colored::Colorize;
use serde::Serialize;
use tracing::info;

use super::MeshDump;
use crate::{Cli, LatticeArgs, OutputFormat, output};

/// How many axes text mode prints before eliding the rest.
const TEXT_PREVIEW: usize = 10;

#[derive(Serialize)]
struct AxesResult {
    family: String,
    elements: usize,
    roll: f64,
    major_axes: Vec<[f64; 3]>,
}

pub fn run(
    lattice: &LatticeArgs,
    grid: GridDims,
    roll: f64,
    out: Option<&Path>,
    cli: &Cli,
) -> Result<()> {
    let roll = lattice.angle(roll);
    let generated = LatticeBuilder::new(lattice.family)
        .parameters(lattice.cell_parameters())
        .num_elems(lattice.num_elems)
        .grid_dims(grid)
        .roll(roll)
        .build()?;

    let axes = generated.major_axes.unwrap_or_default();

    if let Some(path) = out {
        output::write_json(
            &MeshDump::new(lattice.family, grid, &generated.mesh, Some(&axes)),
            path,
        )?;
        info!(path = %path.display(), "Wrote mesh with axes");
    }

    let result = AxesResult {
        family: lattice.family.to_string(),
        elements: generated.mesh.element_count(),
        roll,
        major_axes: axes.iter().map(|v| [v.x, v.y, v.z]).collect(),
    };

    match cli.format {
        OutputFormat::Json => {
            output::print(&result, cli.format, cli.quiet);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                println!("{}", "Major Axes".bold().underline());
                println!("  {}: {}", "Family".cyan(), result.family);
                println!("  {}: {}", "Elements".cyan(), result.elements);
                println!("  {}: {:.4} rad", "Roll".cyan(), result.roll);
                for (i, axis) in result.major_axes.iter().take(TEXT_PREVIEW).enumerate() {
                    let Some((p, q)) = generated.mesh.element_endpoints(i) else {
                        continue;
                    };
                    println!(
                        "  {:>4}: ({:.3}, {:.3}, {:.3}) -> ({:.3}, {:.3}, {:.3})  axis [{:>7.4} {:>7.4} {:>7.4}]",
                        i, p.x, p.y, p.z, q.x, q.y, q.z, axis[0], axis[1], axis[2]
                    );
                }
                if result.major_axes.len() > TEXT_PREVIEW {
                    println!(
                        "  ... {} more (use --format json or -o for all)",
                        result.major_axes.len() - TEXT_PREVIEW
                    );
                }
                if let Some(path) = out {
                    println!("  {}: {}", "Written".green(), path.display());
                }
            }
        }
    }

    Ok(())
}
