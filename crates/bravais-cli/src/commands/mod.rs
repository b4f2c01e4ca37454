//! Subcommand implementations.

pub mod axes;
pub mod cell;
pub mod families;
pub mod run;
pub mod tile;

use bravais_mesh::{GridDims, LatticeFamily, LatticeReport, Mesh};
use nalgebra::Vector3;
use serde::Serialize;

/// Serialized form of a generated mesh, written by `-o`.
#[derive(Serialize)]
pub struct MeshDump {
    pub family: String,
    pub grid: [usize; 3],
    pub nodes: Vec<[f64; 3]>,
    pub elements: Vec<[u32; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub major_axes: Option<Vec<[f64; 3]>>,
}

impl MeshDump {
    pub fn new(
        family: LatticeFamily,
        grid: GridDims,
        mesh: &Mesh,
        major_axes: Option<&[Vector3<f64>]>,
    ) -> Self {
        Self {
            family: family.name().to_string(),
            grid: [grid.x, grid.y, grid.z],
            nodes: mesh.nodes().iter().map(|p| [p.x, p.y, p.z]).collect(),
            elements: mesh.elements().to_vec(),
            major_axes: major_axes.map(|axes| axes.iter().map(|v| [v.x, v.y, v.z]).collect()),
        }
    }
}

/// Summary of a generated mesh, shared by `cell`, `tile` and `run`.
#[derive(Serialize)]
pub struct MeshSummary {
    pub family: String,
    pub grid: [usize; 3],
    pub nodes: usize,
    pub elements: usize,
    pub distinct_elements: usize,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_node_spacing: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<BoundsInfo>,
}

#[derive(Serialize)]
pub struct BoundsInfo {
    pub min: [f64; 3],
    pub max: [f64; 3],
    pub dimensions: [f64; 3],
}

impl MeshSummary {
    pub fn new(family: LatticeFamily, grid: GridDims, report: &LatticeReport) -> Self {
        let bounds = report.bounds.map(|(min, max)| {
            let dims = max - min;
            BoundsInfo {
                min: [min.x, min.y, min.z],
                max: [max.x, max.y, max.z],
                dimensions: [dims.x, dims.y, dims.z],
            }
        });
        Self {
            family: family.to_string(),
            grid: [grid.x, grid.y, grid.z],
            nodes: report.node_count,
            elements: report.element_count,
            distinct_elements: report.unique_element_count(),
            valid: report.is_valid(),
            min_node_spacing: report.min_node_spacing,
            bounds,
        }
    }

    /// Text-mode rendering.
    pub fn print_text(&self, title: &str) {
        use colored::Colorize;

        println!("{}", title.bold().underline());
        println!("  {}: {}", "Family".cyan(), self.family);
        println!(
            "  {}: {} x {} x {}",
            "Grid".cyan(),
            self.grid[0],
            self.grid[1],
            self.grid[2]
        );
        println!("  {}: {}", "Nodes".cyan(), self.nodes);
        println!(
            "  {}: {} ({} distinct)",
            "Elements".cyan(),
            self.elements,
            self.distinct_elements
        );
        if let Some(spacing) = self.min_node_spacing {
            println!("  {}: {:.4}", "Min node spacing".cyan(), spacing);
        }
        if let Some(ref b) = self.bounds {
            println!(
                "  {}: {:.3} x {:.3} x {:.3}",
                "Dimensions".cyan(),
                b.dimensions[0],
                b.dimensions[1],
                b.dimensions[2]
            );
        }
        if self.valid {
            println!("  {}: {}", "Status".cyan(), "Valid".green().bold());
        } else {
            println!("  {}: {}", "Status".cyan(), "Issues found".red().bold());
        }
    }
}
