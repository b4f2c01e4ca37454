//! bravais-cli: Command-line interface for Bravais lattice mesh generation.
//!
//! Builds unit cells, tiles them into global meshes and assigns per-element
//! major axes, suitable for scripting percolation studies.
//!
//! # Logging
//!
//! Set the `RUST_LOG` environment variable to control log output:
//! - `RUST_LOG=bravais_mesh=info` - Basic operation logging
//! - `RUST_LOG=bravais_mesh=debug` - Per-stage node and element counts
//! - `RUST_LOG=bravais_mesh::timing=debug` - Performance timing
//! - `RUST_LOG=debug` - All debug output
//!
//! # Example
//!
//! ```bash
//! # 10x10x10 BCC block written to JSON
//! bravais tile bcc --a 1.0 --grid 10 10 10 -o bcc.json
//!
//! # Major axes for a hexagonal lattice, angles in degrees
//! RUST_LOG=bravais_mesh=info bravais axes hexagonal --a 1 --c 1.6 --grid 2 2 2 --roll 30 --degrees
//! ```

use std::path::PathBuf;

use anyhow::Result;
use bravais_mesh::{CellParameters, GridDims, LatticeFamily};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod commands;
mod output;

use commands::{axes, cell, families, run, tile};

/// bravais - Generate node/strut meshes of the 14 Bravais lattices.
#[derive(Parser)]
#[command(name = "bravais")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format for results
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Suppress all non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Increase output verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for scripting
    Json,
}

/// Lattice family and cell constants shared by the generating subcommands.
#[derive(Args)]
pub struct LatticeArgs {
    /// Lattice family (e.g. simple_cubic, fcc, bcc, hexagonal, triclinic)
    #[arg(value_parser = parse_family)]
    family: LatticeFamily,

    /// Edge length a
    #[arg(long)]
    a: Option<f64>,

    /// Edge length b
    #[arg(long)]
    b: Option<f64>,

    /// Edge length c
    #[arg(long)]
    c: Option<f64>,

    /// Angle between b and c
    #[arg(long)]
    alpha: Option<f64>,

    /// Angle between a and c
    #[arg(long)]
    beta: Option<f64>,

    /// Angle between a and b
    #[arg(long)]
    gamma: Option<f64>,

    /// Angles (including --roll) are given in degrees instead of radians
    #[arg(long)]
    degrees: bool,

    /// Elements per basis strut
    #[arg(long, default_value = "1")]
    num_elems: usize,
}

impl LatticeArgs {
    /// Cell constants with angles in radians.
    pub fn cell_parameters(&self) -> CellParameters {
        let cell = CellParameters {
            a: self.a,
            b: self.b,
            c: self.c,
            alpha: self.alpha,
            beta: self.beta,
            gamma: self.gamma,
        };
        if self.degrees {
            cell.angles_from_degrees()
        } else {
            cell
        }
    }

    /// Convert a user-supplied angle to radians.
    pub fn angle(&self, value: f64) -> f64 {
        if self.degrees {
            value.to_radians()
        } else {
            value
        }
    }
}

fn parse_family(s: &str) -> Result<LatticeFamily, String> {
    LatticeFamily::from_name(s).ok_or_else(|| {
        let names: Vec<&str> = LatticeFamily::ALL.iter().map(|f| f.name()).collect();
        format!("unknown lattice family `{}`; expected one of: {}", s, names.join(", "))
    })
}

#[derive(Subcommand)]
enum Commands {
    /// List the lattice families with their parameters and basis sizes
    Families,

    /// Build a single unit cell and show its statistics
    Cell {
        #[command(flatten)]
        lattice: LatticeArgs,
    },

    /// Tile a unit cell across a grid
    Tile {
        #[command(flatten)]
        lattice: LatticeArgs,

        /// Cells along each lattice vector
        #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], default_values_t = [1, 1, 1])]
        grid: Vec<usize>,

        /// Write nodes and elements to this JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compute per-element major axes for a tiled lattice
    Axes {
        #[command(flatten)]
        lattice: LatticeArgs,

        /// Cells along each lattice vector
        #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], default_values_t = [1, 1, 1])]
        grid: Vec<usize>,

        /// Roll angle about each element's axis
        #[arg(long, default_value = "0.0", allow_negative_numbers = true)]
        roll: f64,

        /// Write nodes, elements and axes to this JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run a generation config file (TOML, or JSON by extension)
    Run {
        /// Config file
        config: PathBuf,

        /// Write the generated mesh to this JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn grid_dims(grid: &[usize]) -> GridDims {
    match grid {
        [x, y, z] => GridDims::new(*x, *y, *z),
        _ => GridDims::unit(),
    }
}

/// Initialize the tracing subscriber based on verbosity level.
fn init_tracing(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    // RUST_LOG wins over -v flags
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "warn",
            1 => "bravais_mesh=info",
            2 => "bravais_mesh=debug",
            _ => "trace",
        };
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    // Nicer panic reports in development
    #[cfg(debug_assertions)]
    miette::set_panic_hook();

    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Commands::Families => families::run(&cli),
        Commands::Cell { lattice } => cell::run(lattice, &cli),
        Commands::Tile {
            lattice,
            grid,
            output,
        } => tile::run(lattice, grid_dims(grid), output.as_deref(), &cli),
        Commands::Axes {
            lattice,
            grid,
            roll,
            output,
        } => axes::run(lattice, grid_dims(grid), *roll, output.as_deref(), &cli),
        Commands::Run { config, output } => run::run(config, output.as_deref(), &cli),
    };

    if let Err(e) = &result {
        if !cli.quiet {
            if let Some(lattice_err) = e.downcast_ref::<bravais_mesh::LatticeError>() {
                eprintln!("{}: {}", "Error".red().bold(), lattice_err);
                eprintln!("  {}: {}", "Code".cyan(), lattice_err.code());
                eprintln!(
                    "  {}: {}",
                    "Suggestion".green(),
                    lattice_err.recovery_suggestion()
                );
                if let Some(location) = lattice_err.location() {
                    eprintln!("  {}: {}", "Location".yellow(), location);
                }
            } else {
                eprintln!("{}: {}", "Error".red().bold(), e);
                for cause in e.chain().skip(1) {
                    eprintln!("  {}: {}", "Caused by".yellow(), cause);
                }
            }
        }
        std::process::exit(1);
    }

    Ok(())
}
