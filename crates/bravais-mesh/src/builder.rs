//! Fluent builder for lattice generation.
//!
//! Chains the whole pipeline: resolve cell constants, build the unit cell, tile
//! it across a grid and optionally assign major axes.
//!
//! # Example
//!
//! ```
//! use bravais_mesh::{LatticeBuilder, LatticeFamily};
//!
//! let lattice = LatticeBuilder::new(LatticeFamily::Bcc)
//!     .a(1.0)
//!     .num_elems(2)
//!     .grid(3, 3, 3)
//!     .roll(0.0)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(lattice.unit_cell.mesh().node_count(), 9 + 20);
//! assert_eq!(lattice.major_axes.as_ref().unwrap().len(), lattice.mesh.element_count());
//! ```

use nalgebra::Vector3;
use tracing::info;

use crate::axes::assign_major_axes;
use crate::basis::UnitCell;
use crate::error::LatticeResult;
use crate::lattice::{CellParameters, LatticeFamily};
use crate::tiling::{GridDims, tile};
use crate::types::Mesh;
use crate::validate::{LatticeReport, validate_mesh};

/// Output of [`LatticeBuilder::build`].
#[derive(Debug, Clone)]
pub struct GeneratedLattice {
    /// The unit cell the mesh was tiled from.
    pub unit_cell: UnitCell,
    /// Grid the unit cell was tiled across.
    pub grid: GridDims,
    /// The tiled global mesh.
    pub mesh: Mesh,
    /// Major axis per element, when a roll angle was given.
    pub major_axes: Option<Vec<Vector3<f64>>>,
}

impl GeneratedLattice {
    /// Validate the tiled mesh.
    pub fn report(&self) -> LatticeReport {
        validate_mesh(&self.mesh)
    }
}

/// Fluent builder for a tiled lattice mesh.
#[derive(Debug, Clone)]
pub struct LatticeBuilder {
    family: LatticeFamily,
    cell: CellParameters,
    num_elems: usize,
    grid: GridDims,
    roll: Option<f64>,
}

impl LatticeBuilder {
    /// Start a builder for `family` with no cell constants, one element per
    /// strut, a single-cell grid and no axis assignment.
    pub fn new(family: LatticeFamily) -> Self {
        Self {
            family,
            cell: CellParameters::new(),
            num_elems: 1,
            grid: GridDims::unit(),
            roll: None,
        }
    }

    /// Edge length `a`.
    pub fn a(mut self, a: f64) -> Self {
        self.cell.a = Some(a);
        self
    }

    /// Edge length `b`.
    pub fn b(mut self, b: f64) -> Self {
        self.cell.b = Some(b);
        self
    }

    /// Edge length `c`.
    pub fn c(mut self, c: f64) -> Self {
        self.cell.c = Some(c);
        self
    }

    /// Angle `alpha`, radians.
    pub fn alpha(mut self, alpha: f64) -> Self {
        self.cell.alpha = Some(alpha);
        self
    }

    /// Angle `beta`, radians.
    pub fn beta(mut self, beta: f64) -> Self {
        self.cell.beta = Some(beta);
        self
    }

    /// Angle `gamma`, radians.
    pub fn gamma(mut self, gamma: f64) -> Self {
        self.cell.gamma = Some(gamma);
        self
    }

    /// Replace all cell constants at once.
    pub fn parameters(mut self, cell: CellParameters) -> Self {
        self.cell = cell;
        self
    }

    /// Elements per basis strut.
    pub fn num_elems(mut self, n: usize) -> Self {
        self.num_elems = n;
        self
    }

    /// Cells along each lattice vector.
    pub fn grid(mut self, x: usize, y: usize, z: usize) -> Self {
        self.grid = GridDims::new(x, y, z);
        self
    }

    /// Cells along each lattice vector.
    pub fn grid_dims(mut self, grid: GridDims) -> Self {
        self.grid = grid;
        self
    }

    /// Assign major axes with this roll angle (radians).
    pub fn roll(mut self, roll: f64) -> Self {
        self.roll = Some(roll);
        self
    }

    /// The family being built.
    pub fn family(&self) -> LatticeFamily {
        self.family
    }

    /// Run the pipeline.
    pub fn build(self) -> LatticeResult<GeneratedLattice> {
        self.grid.validate()?;
        let unit_cell = UnitCell::new(self.family, &self.cell, self.num_elems)?;
        let mesh = tile(&unit_cell, self.grid)?;
        let major_axes = self
            .roll
            .map(|roll| assign_major_axes(&mesh, roll))
            .transpose()?;

        info!(
            family = %self.family,
            grid = %self.grid,
            nodes = mesh.node_count(),
            elements = mesh.element_count(),
            axes = major_axes.is_some(),
            "Generated lattice"
        );

        Ok(GeneratedLattice {
            unit_cell,
            grid: self.grid,
            mesh,
            major_axes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LatticeError;

    #[test]
    fn test_build_simple() {
        let lattice = LatticeBuilder::new(LatticeFamily::SimpleCubic)
            .a(1.0)
            .grid(2, 2, 2)
            .build()
            .unwrap();
        assert_eq!(lattice.mesh.node_count(), 27);
        assert!(lattice.major_axes.is_none());
        assert!(lattice.report().is_valid());
    }

    #[test]
    fn test_build_with_axes() {
        let lattice = LatticeBuilder::new(LatticeFamily::PrimitiveMonoclinic)
            .a(1.0)
            .b(1.5)
            .c(2.0)
            .beta(1.9)
            .grid(2, 1, 1)
            .roll(0.3)
            .build()
            .unwrap();
        let axes = lattice.major_axes.unwrap();
        assert_eq!(axes.len(), 24);
        for axis in axes {
            assert!((axis.norm() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_build_missing_parameter() {
        let err = LatticeBuilder::new(LatticeFamily::Triclinic)
            .a(1.0)
            .build()
            .unwrap_err();
        assert!(matches!(err, LatticeError::MissingParameter { name: "b", .. }));
    }

    #[test]
    fn test_build_bad_grid() {
        let err = LatticeBuilder::new(LatticeFamily::Bcc)
            .a(1.0)
            .grid(0, 1, 1)
            .build()
            .unwrap_err();
        assert!(matches!(err, LatticeError::InvalidGrid { .. }));
    }
}
