//! bravais cell command - build and describe one unit cell.

use anyhow::Result;
use bravais_mesh::{GridDims, UnitCell, validate_mesh};
use colored::Colorize;
use serde::Serialize;

use super::MeshSummary;
use crate::{Cli, LatticeArgs, OutputFormat, output};

#[derive(Serialize)]
struct CellInfo {
    #[serde(flatten)]
    summary: MeshSummary,
    parameters: ParameterInfo,
    num_elems: usize,
    volume_factor: f64,
    cell_volume: f64,
    transform: [[f64; 3]; 3],
}

#[derive(Serialize)]
struct ParameterInfo {
    a: f64,
    b: f64,
    c: f64,
    alpha: f64,
    beta: f64,
    gamma: f64,
}

pub fn run(lattice: &LatticeArgs, cli: &Cli) -> Result<()> {
    let cell = UnitCell::new(lattice.family, &lattice.cell_parameters(), lattice.num_elems)?;
    let report = validate_mesh(cell.mesh());

    let p = cell.definition().parameters();
    let t = cell.transform();
    let m = t.matrix();
    let info = CellInfo {
        summary: MeshSummary::new(cell.family(), GridDims::unit(), &report),
        parameters: ParameterInfo {
            a: p.a,
            b: p.b,
            c: p.c,
            alpha: p.alpha,
            beta: p.beta,
            gamma: p.gamma,
        },
        num_elems: p.num_elems,
        volume_factor: t.volume_factor(),
        cell_volume: t.cell_volume(),
        transform: [
            [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
            [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
            [m[(2, 0)], m[(2, 1)], m[(2, 2)]],
        ],
    };

    match cli.format {
        OutputFormat::Json => {
            output::print(&info, cli.format, cli.quiet);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                info.summary.print_text("Unit Cell");
                let pi = &info.parameters;
                println!(
                    "  {}: a={:.4} b={:.4} c={:.4}",
                    "Lengths".cyan(),
                    pi.a,
                    pi.b,
                    pi.c
                );
                println!(
                    "  {}: alpha={:.2}° beta={:.2}° gamma={:.2}°",
                    "Angles".cyan(),
                    pi.alpha.to_degrees(),
                    pi.beta.to_degrees(),
                    pi.gamma.to_degrees()
                );
                println!("  {}: {}", "Elements per strut".cyan(), info.num_elems);
                println!("  {}: {:.6}", "Volume factor".cyan(), info.volume_factor);
                println!("  {}: {:.6}", "Cell volume".cyan(), info.cell_volume);
                println!("  {}:", "Transform".cyan());
                for row in &info.transform {
                    println!("    [{:>10.6} {:>10.6} {:>10.6}]", row[0], row[1], row[2]);
                }
            }
        }
    }

    Ok(())
}
