//! Periodic tiling of a unit cell across an integer grid.
//!
//! The unit cell is replicated at every anchor `(i, j, k)` of the grid. Nodes are
//! translated in fractional space, where an anchor offset is a whole number and
//! neighbouring cells produce bit-identical coordinates on their shared faces.
//! The combined point soup is consolidated and indexed once, then mapped to
//! Cartesian space, so `T·(f + n)` lands every shared site on a single node.
//!
//! Elements are not merged: a strut lying on a face shared by two cells appears
//! once per cell.

use nalgebra::{Point3, Vector3};
use rayon::prelude::*;
use tracing::info;

use crate::basis::UnitCell;
use crate::consolidate::{consolidate_and_index, ensure_distinct};
use crate::error::{LatticeError, LatticeResult};
use crate::metric::MetricTransform;
use crate::tracing_ext::{OperationTimer, log_mesh_stats};
use crate::types::Mesh;

/// Number of unit cells along each lattice vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridDims {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl GridDims {
    /// Create grid dimensions.
    pub fn new(x: usize, y: usize, z: usize) -> Self {
        Self { x, y, z }
    }

    /// A single cell.
    pub fn unit() -> Self {
        Self::new(1, 1, 1)
    }

    /// Check every dimension is at least 1 and the cell count fits in `usize`.
    pub fn validate(&self) -> LatticeResult<()> {
        if self.x == 0 || self.y == 0 || self.z == 0 {
            return Err(self.invalid("every dimension must be at least 1"));
        }
        if self.checked_cell_count().is_none() {
            return Err(self.invalid("cell count overflows"));
        }
        Ok(())
    }

    /// Total number of cells, saturating at `usize::MAX` for grids that fail
    /// [`validate`](Self::validate).
    pub fn cell_count(&self) -> usize {
        self.checked_cell_count().unwrap_or(usize::MAX)
    }

    fn checked_cell_count(&self) -> Option<usize> {
        self.x.checked_mul(self.y)?.checked_mul(self.z)
    }

    fn invalid(&self, reason: &'static str) -> LatticeError {
        LatticeError::InvalidGrid {
            x: self.x,
            y: self.y,
            z: self.z,
            reason,
        }
    }

    /// Anchors in row-major `(i, j, k)` order, `k` varying fastest.
    pub fn anchors(&self) -> Vec<Anchor> {
        let (ny, nz) = (self.y, self.z);
        (0..self.x)
            .flat_map(|i| {
                (0..ny).flat_map(move |j| {
                    (0..nz).map(move |k| Anchor::new(i as i64, j as i64, k as i64))
                })
            })
            .collect()
    }
}

impl Default for GridDims {
    fn default() -> Self {
        Self::unit()
    }
}

impl From<[usize; 3]> for GridDims {
    fn from([x, y, z]: [usize; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl std::fmt::Display for GridDims {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} x {} x {}", self.x, self.y, self.z)
    }
}

/// Integer grid position of one unit cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Anchor {
    pub i: i64,
    pub j: i64,
    pub k: i64,
}

impl Anchor {
    /// Create an anchor.
    pub fn new(i: i64, j: i64, k: i64) -> Self {
        Self { i, j, k }
    }

    /// Offset in fractional coordinates.
    #[inline]
    pub fn to_fractional(&self) -> Vector3<f64> {
        Vector3::new(self.i as f64, self.j as f64, self.k as f64)
    }

    /// Offset in Cartesian coordinates.
    #[inline]
    pub fn translation(&self, transform: &MetricTransform) -> Vector3<f64> {
        transform.translation(*self)
    }
}

/// Tile `cell` across `grid` and return the global mesh.
///
/// Element order follows anchor order, then unit-cell element order. A `1×1×1`
/// grid returns the unit-cell mesh unchanged.
pub fn tile(cell: &UnitCell, grid: GridDims) -> LatticeResult<Mesh> {
    grid.validate()?;

    let unit = cell.mesh();
    let indexable = grid
        .cell_count()
        .checked_mul(unit.node_count())
        .is_some_and(|n| n <= u32::MAX as usize);
    if !indexable {
        return Err(grid.invalid("too many nodes for 32-bit node indices"));
    }

    let _timer = OperationTimer::with_context("tile", unit.node_count(), unit.element_count());

    let fractional = cell.fractional_nodes();
    let anchors = grid.anchors();

    let per_anchor: Vec<(Vec<Point3<f64>>, Vec<[Point3<f64>; 2]>)> = anchors
        .par_iter()
        .map(|anchor| {
            let offset = anchor.to_fractional();
            let nodes: Vec<Point3<f64>> = fractional.iter().map(|p| p + offset).collect();
            let elements = unit
                .elements()
                .iter()
                .map(|&[a, b]| [nodes[a as usize], nodes[b as usize]])
                .collect();
            (nodes, elements)
        })
        .collect();

    let mut raw_nodes = Vec::with_capacity(anchors.len() * fractional.len());
    let mut raw_elements = Vec::with_capacity(anchors.len() * unit.element_count());
    for (nodes, elements) in per_anchor {
        raw_nodes.extend(nodes);
        raw_elements.extend(elements);
    }

    let (nodes, elements) = consolidate_and_index(&raw_nodes, &raw_elements)?;

    let transform = cell.transform();
    let cartesian: Vec<Point3<f64>> = nodes.par_iter().map(|p| transform.to_cartesian(p)).collect();
    ensure_distinct(&cartesian, &elements)?;

    info!(
        family = %cell.family(),
        grid = %grid,
        raw_nodes = raw_nodes.len(),
        nodes = cartesian.len(),
        elements = elements.len(),
        "Tiled lattice"
    );

    let mesh = Mesh::from_indexed(cartesian, elements);
    log_mesh_stats(&mesh, "tiled");
    Ok(mesh)
}
