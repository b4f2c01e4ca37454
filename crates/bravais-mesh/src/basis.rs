//! Unit-cell mesh construction.
//!
//! Each basis strut is split into `num_elems` equal sub-elements. The raw
//! per-strut points are consolidated and indexed in fractional space, then
//! mapped through the metric transform to give the Cartesian unit cell.

use nalgebra::Point3;
use rayon::prelude::*;
use tracing::debug;

use crate::consolidate::{consolidate_and_index, ensure_distinct};
use crate::error::LatticeResult;
use crate::lattice::{CellParameters, LatticeDefinition, LatticeFamily};
use crate::metric::MetricTransform;
use crate::tracing_ext::{OperationTimer, log_mesh_stats};
use crate::types::Mesh;

/// `n + 1` evenly spaced points from `start` to `end`, both inclusive.
///
/// Point `i` is `start + i·(end − start)/n`; the last point is `end` exactly.
pub fn linspace(start: &Point3<f64>, end: &Point3<f64>, n: usize) -> Vec<Point3<f64>> {
    let n = n.max(1);
    let step = (end - start) / n as f64;
    let mut points: Vec<Point3<f64>> = (0..n).map(|i| start + step * i as f64).collect();
    points.push(*end);
    points
}

/// Subdivide one strut into `n` elements.
///
/// Returns the `n + 1` raw points and the `n` elements as coordinate pairs,
/// ordered from `start` to `end`.
pub fn subdivide_strut(
    start: &Point3<f64>,
    end: &Point3<f64>,
    n: usize,
) -> (Vec<Point3<f64>>, Vec<[Point3<f64>; 2]>) {
    let points = linspace(start, end, n);
    let elements = points.windows(2).map(|w| [w[0], w[1]]).collect();
    (points, elements)
}

/// A single unit cell: definition, transform, and its consolidated mesh.
#[derive(Debug, Clone)]
pub struct UnitCell {
    definition: LatticeDefinition,
    transform: MetricTransform,
    fractional_nodes: Vec<Point3<f64>>,
    mesh: Mesh,
}

impl UnitCell {
    /// Resolve parameters for `family` and build its unit cell.
    pub fn new(
        family: LatticeFamily,
        cell: &CellParameters,
        num_elems: usize,
    ) -> LatticeResult<Self> {
        build_unit_cell(LatticeDefinition::new(family, cell, num_elems)?)
    }

    /// The lattice definition.
    pub fn definition(&self) -> &LatticeDefinition {
        &self.definition
    }

    /// Lattice family tag.
    pub fn family(&self) -> LatticeFamily {
        self.definition.family()
    }

    /// The fractional-to-Cartesian transform.
    pub fn transform(&self) -> &MetricTransform {
        &self.transform
    }

    /// Node coordinates in fractional space, in node-ID order.
    pub fn fractional_nodes(&self) -> &[Point3<f64>] {
        &self.fractional_nodes
    }

    /// The Cartesian unit-cell mesh.
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Consume the cell, returning its mesh.
    pub fn into_mesh(self) -> Mesh {
        self.mesh
    }
}

/// Build the unit-cell mesh for a lattice definition.
///
/// Fails if the cell constants give a singular or degenerate transform, or if
/// distinct basis sites land on the same Cartesian point.
pub fn build_unit_cell(definition: LatticeDefinition) -> LatticeResult<UnitCell> {
    let _timer = OperationTimer::new("build_unit_cell");

    let transform = MetricTransform::new(definition.parameters())?;
    let n = definition.num_elems();
    let points = definition.basis_points();
    let struts = definition.basis_struts();

    let per_strut: Vec<_> = struts
        .par_iter()
        .map(|&[i, j]| subdivide_strut(&points[i], &points[j], n))
        .collect();

    let mut raw_nodes = Vec::with_capacity(struts.len() * (n + 1));
    let mut raw_elements = Vec::with_capacity(struts.len() * n);
    for (nodes, elements) in per_strut {
        raw_nodes.extend(nodes);
        raw_elements.extend(elements);
    }

    let (fractional_nodes, elements) = consolidate_and_index(&raw_nodes, &raw_elements)?;

    debug!(
        family = %definition.family(),
        struts = struts.len(),
        raw_nodes = raw_nodes.len(),
        nodes = fractional_nodes.len(),
        elements = elements.len(),
        "Built unit cell"
    );

    let cartesian: Vec<Point3<f64>> = fractional_nodes
        .iter()
        .map(|p| transform.to_cartesian(p))
        .collect();
    ensure_distinct(&cartesian, &elements)?;
    let mesh = Mesh::from_indexed(cartesian, elements);
    log_mesh_stats(&mesh, "unit_cell");

    Ok(UnitCell {
        definition,
        transform,
        fractional_nodes,
        mesh,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linspace_endpoints() {
        let start = Point3::new(0.0, 0.0, 0.0);
        let end = Point3::new(1.0, 0.5, 0.0);
        let pts = linspace(&start, &end, 3);
        assert_eq!(pts.len(), 4);
        assert_eq!(pts[0], start);
        assert_eq!(pts[3], end);
        assert_relative_eq!(pts[1].x, 1.0 / 3.0);
        assert_relative_eq!(pts[2].y, 1.0 / 3.0);
    }

    #[test]
    fn test_subdivide_counts() {
        for n in 1..6 {
            let (pts, elems) =
                subdivide_strut(&Point3::origin(), &Point3::new(0.0, 0.0, 1.0), n);
            assert_eq!(pts.len(), n + 1);
            assert_eq!(elems.len(), n);
            assert_eq!(elems[0][0], Point3::origin());
            assert_eq!(elems[n - 1][1], Point3::new(0.0, 0.0, 1.0));
        }
    }

    #[test]
    fn test_simple_cubic_cell() {
        let cell = UnitCell::new(
            LatticeFamily::SimpleCubic,
            &CellParameters::new().with_a(2.0),
            1,
        )
        .unwrap();
        let mesh = cell.mesh();
        assert_eq!(mesh.node_count(), 8);
        assert_eq!(mesh.element_count(), 12);
        for i in 0..mesh.element_count() {
            assert_relative_eq!(mesh.element_length(i).unwrap(), 2.0);
        }
        let (min, max) = mesh.bounds().unwrap();
        assert_eq!(min, Point3::origin());
        assert_eq!(max, Point3::new(2.0, 2.0, 2.0));
    }

    #[test]
    fn test_subdivided_bcc_cell() {
        let n = 4;
        let cell =
            UnitCell::new(LatticeFamily::Bcc, &CellParameters::new().with_a(1.0), n).unwrap();
        let mesh = cell.mesh();
        // 9 basis points plus n - 1 interior points on each of 20 struts.
        assert_eq!(mesh.node_count(), 9 + 20 * (n - 1));
        assert_eq!(mesh.element_count(), 20 * n);
        assert_eq!(cell.fractional_nodes().len(), mesh.node_count());
    }

    #[test]
    fn test_cartesian_matches_transform() {
        let params = CellParameters::new().with_a(1.0).with_c(2.0);
        let cell = UnitCell::new(LatticeFamily::Hexagonal, &params, 2).unwrap();
        for (f, x) in cell.fractional_nodes().iter().zip(cell.mesh().nodes()) {
            assert_eq!(cell.transform().to_cartesian(f), *x);
        }
    }
}
