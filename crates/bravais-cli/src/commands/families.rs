//! bravais families command - list the lattice families.

use anyhow::Result;
use bravais_mesh::LatticeFamily;
use colored::Colorize;
use serde::Serialize;

use crate::{Cli, OutputFormat, output};

#[derive(Serialize)]
struct FamilyInfo {
    name: &'static str,
    display: String,
    required_parameters: &'static [&'static str],
    basis_points: usize,
    basis_struts: usize,
}

pub fn run(cli: &Cli) -> Result<()> {
    let families: Vec<FamilyInfo> = LatticeFamily::ALL
        .iter()
        .map(|&family| FamilyInfo {
            name: family.name(),
            display: family.to_string(),
            required_parameters: family.required_parameters(),
            basis_points: family.basis_point_count(),
            basis_struts: family.basis_strut_count(),
        })
        .collect();

    match cli.format {
        OutputFormat::Json => {
            output::print(&families, cli.format, cli.quiet);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                println!("{}", "Lattice Families".bold().underline());
                for f in &families {
                    println!(
                        "  {:<28} {:<30} {:>2} points, {:>2} struts",
                        f.name.cyan(),
                        f.required_parameters.join(", "),
                        f.basis_points,
                        f.basis_struts
                    );
                }
            }
        }
    }

    Ok(())
}
