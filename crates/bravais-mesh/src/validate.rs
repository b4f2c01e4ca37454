//! Lattice mesh validation and reporting.

use hashbrown::{HashMap, HashSet};
use nalgebra::Point3;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::consolidate::NodeKey;
use crate::tracing_ext::log_validation_result;
use crate::types::Mesh;

/// Validation report for a lattice mesh.
#[derive(Debug, Clone)]
pub struct LatticeReport {
    /// Total node count.
    pub node_count: usize,

    /// Total element count.
    pub element_count: usize,

    /// Nodes whose exact coordinates repeat an earlier node.
    pub duplicate_nodes: usize,

    /// Elements referencing a node index out of range.
    pub invalid_elements: usize,

    /// Elements whose endpoints are the same node or the same point.
    pub degenerate_elements: usize,

    /// Elements joining the same node pair as an earlier element (either direction).
    /// Struts on faces shared by neighbouring cells show up here.
    pub coincident_elements: usize,

    /// Smallest distance between two distinct nodes.
    pub min_node_spacing: Option<f64>,

    /// Shortest element.
    pub min_element_length: Option<f64>,

    /// Longest element.
    pub max_element_length: Option<f64>,

    /// Bounding box as (min_corner, max_corner).
    pub bounds: Option<(Point3<f64>, Point3<f64>)>,

    /// Dimensions (x, y, z).
    pub dimensions: Option<(f64, f64, f64)>,
}

impl LatticeReport {
    /// Check if the mesh upholds the node and element invariants.
    pub fn is_valid(&self) -> bool {
        self.node_count > 0
            && self.duplicate_nodes == 0
            && self.invalid_elements == 0
            && self.degenerate_elements == 0
    }

    /// Number of distinct struts.
    pub fn unique_element_count(&self) -> usize {
        self.element_count - self.coincident_elements
    }
}

impl std::fmt::Display for LatticeReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Lattice Report:")?;
        writeln!(f, "  Nodes: {}", self.node_count)?;
        writeln!(
            f,
            "  Elements: {} ({} distinct)",
            self.element_count,
            self.unique_element_count()
        )?;

        if let Some((min, max)) = &self.bounds {
            writeln!(
                f,
                "  Bounds: [{:.3}, {:.3}, {:.3}] to [{:.3}, {:.3}, {:.3}]",
                min.x, min.y, min.z, max.x, max.y, max.z
            )?;
        }

        if let Some((dx, dy, dz)) = &self.dimensions {
            writeln!(f, "  Dimensions: {:.3} x {:.3} x {:.3}", dx, dy, dz)?;
        }

        if let (Some(lo), Some(hi)) = (self.min_element_length, self.max_element_length) {
            writeln!(f, "  Element length: {:.4} to {:.4}", lo, hi)?;
        }

        if let Some(spacing) = self.min_node_spacing {
            writeln!(f, "  Min node spacing: {:.4}", spacing)?;
        }

        writeln!(f, "  Duplicate nodes: {}", self.duplicate_nodes)?;
        writeln!(f, "  Invalid elements: {}", self.invalid_elements)?;
        writeln!(f, "  Degenerate elements: {}", self.degenerate_elements)?;
        writeln!(
            f,
            "  Valid: {}",
            if self.is_valid() { "yes" } else { "NO" }
        )?;

        Ok(())
    }
}

/// Validate a lattice mesh and return a report.
pub fn validate_mesh(mesh: &Mesh) -> LatticeReport {
    let nodes = mesh.nodes();
    let node_count = nodes.len();

    let mut seen_nodes = HashSet::with_capacity(node_count);
    let duplicate_nodes = nodes
        .iter()
        .filter(|p| !seen_nodes.insert(NodeKey::from_point(p)))
        .count();

    let mut invalid_elements = 0;
    let mut degenerate_elements = 0;
    let mut coincident_elements = 0;
    let mut min_len = f64::INFINITY;
    let mut max_len = 0.0_f64;
    let mut seen_pairs = HashSet::with_capacity(mesh.element_count());

    for &[a, b] in mesh.elements() {
        if a as usize >= node_count || b as usize >= node_count {
            invalid_elements += 1;
            continue;
        }
        let len = (nodes[b as usize] - nodes[a as usize]).norm();
        if a == b || len == 0.0 {
            degenerate_elements += 1;
        }
        if !seen_pairs.insert((a.min(b), a.max(b))) {
            coincident_elements += 1;
        }
        min_len = min_len.min(len);
        max_len = max_len.max(len);
    }

    let has_lengths = min_len.is_finite();
    let min_element_length = has_lengths.then_some(min_len);
    let max_element_length = has_lengths.then_some(max_len);

    let min_node_spacing = if duplicate_nodes > 0 {
        Some(0.0)
    } else {
        min_element_length
            .filter(|&h| h > 0.0)
            .and_then(|h| min_spacing(nodes, h))
    };

    let bounds = mesh.bounds();
    let dimensions = bounds.map(|(min, max)| (max.x - min.x, max.y - min.y, max.z - min.z));

    let report = LatticeReport {
        node_count,
        element_count: mesh.element_count(),
        duplicate_nodes,
        invalid_elements,
        degenerate_elements,
        coincident_elements,
        min_node_spacing,
        min_element_length,
        max_element_length,
        bounds,
        dimensions,
    };

    if duplicate_nodes > 0 {
        warn!("Lattice has {} duplicate nodes", duplicate_nodes);
    }
    if invalid_elements > 0 {
        warn!(
            "Lattice has {} elements with out-of-range nodes",
            invalid_elements
        );
    }
    if degenerate_elements > 0 {
        warn!("Lattice has {} zero-length elements", degenerate_elements);
    }

    debug!("{}", report);
    log_validation_result(&report);

    report
}

fn pos_to_cell(p: &Point3<f64>, cell_size: f64) -> [i64; 3] {
    [
        (p.x / cell_size).floor() as i64,
        (p.y / cell_size).floor() as i64,
        (p.z / cell_size).floor() as i64,
    ]
}

/// Smallest distance between distinct nodes, searching a spatial hash with cell
/// size `cell_size`.
///
/// Exact whenever some pair of nodes lies within `cell_size` of each other,
/// which holds when `cell_size` is the length of an existing element.
fn min_spacing(nodes: &[Point3<f64>], cell_size: f64) -> Option<f64> {
    if nodes.len() < 2 {
        return None;
    }

    let mut spatial_hash: HashMap<[i64; 3], Vec<u32>> = HashMap::new();
    for (idx, p) in nodes.iter().enumerate() {
        spatial_hash
            .entry(pos_to_cell(p, cell_size))
            .or_default()
            .push(idx as u32);
    }

    let best = nodes
        .par_iter()
        .enumerate()
        .map(|(idx, p)| {
            let cell = pos_to_cell(p, cell_size);
            let mut best = f64::INFINITY;
            for dx in -1..=1 {
                for dy in -1..=1 {
                    for dz in -1..=1 {
                        let neighbor = [cell[0] + dx, cell[1] + dy, cell[2] + dz];
                        let Some(candidates) = spatial_hash.get(&neighbor) else {
                            continue;
                        };
                        for &other in candidates {
                            if other as usize <= idx {
                                continue;
                            }
                            best = best.min((nodes[other as usize] - p).norm());
                        }
                    }
                }
            }
            best
        })
        .reduce(|| f64::INFINITY, f64::min);

    best.is_finite().then_some(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::{CellParameters, LatticeFamily};
    use crate::tiling::{GridDims, tile};
    use crate::UnitCell;
    use approx::assert_relative_eq;

    #[test]
    fn test_valid_unit_cell() {
        let cell =
            UnitCell::new(LatticeFamily::Fcc, &CellParameters::new().with_a(2.0), 1).unwrap();
        let report = validate_mesh(cell.mesh());
        assert!(report.is_valid());
        assert_eq!(report.node_count, 14);
        assert_eq!(report.element_count, 36);
        assert_eq!(report.coincident_elements, 0);
        // Face center to corner: a / sqrt(2).
        assert_relative_eq!(report.min_node_spacing.unwrap(), 2f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(report.max_element_length.unwrap(), 2.0);
    }

    #[test]
    fn test_tiled_shared_struts() {
        let cell = UnitCell::new(
            LatticeFamily::SimpleCubic,
            &CellParameters::new().with_a(1.0),
            1,
        )
        .unwrap();
        let mesh = tile(&cell, GridDims::new(2, 2, 2)).unwrap();
        let report = validate_mesh(&mesh);
        assert!(report.is_valid());
        assert_eq!(report.duplicate_nodes, 0);
        // 3 x 3 x 3 sites have 3 * 3 * 3 * 2 = 54 distinct struts.
        assert_eq!(report.unique_element_count(), 54);
        assert_eq!(report.min_node_spacing, Some(1.0));
    }

    #[test]
    fn test_detects_problems() {
        let mesh = Mesh::from_parts(
            vec![
                Point3::origin(),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
            ],
            vec![[0, 1], [1, 0], [1, 2]],
        )
        .unwrap();
        let report = validate_mesh(&mesh);
        assert!(!report.is_valid());
        assert_eq!(report.duplicate_nodes, 1);
        assert_eq!(report.coincident_elements, 1);
        assert_eq!(report.degenerate_elements, 1);
        assert_eq!(report.min_node_spacing, Some(0.0));
        assert!(format!("{}", report).contains("Valid: NO"));
    }

    #[test]
    fn test_empty_mesh() {
        let report = validate_mesh(&Mesh::default());
        assert!(!report.is_valid());
        assert!(report.min_node_spacing.is_none());
        assert!(report.bounds.is_none());
    }
}
