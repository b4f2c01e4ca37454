//! Core mesh data types.

use nalgebra::{Point3, Vector3};

use crate::error::{LatticeError, LatticeResult};

/// Magnitude below which coordinate and matrix components are snapped to exactly zero.
pub const SNAP_TOLERANCE: f64 = 1e-15;

/// Snap a scalar to zero when its magnitude is below [`SNAP_TOLERANCE`].
#[inline]
pub fn snap(value: f64) -> f64 {
    if value.abs() < SNAP_TOLERANCE {
        0.0
    } else {
        value
    }
}

/// Snap every component of a point.
#[inline]
pub(crate) fn snap_point(p: Point3<f64>) -> Point3<f64> {
    Point3::new(snap(p.x), snap(p.y), snap(p.z))
}

/// A strut mesh: lattice sites as nodes, bonds as two-node line elements.
///
/// The node index is the node ID. Elements are ordered pairs of node IDs; the
/// order fixes the bond direction used for local axes.
///
/// A `Mesh` is produced whole by a generation stage and only exposes read access.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    nodes: Vec<Point3<f64>>,
    elements: Vec<[u32; 2]>,
}

impl Mesh {
    /// Assemble a mesh from parts, checking that every element references two
    /// distinct, in-range nodes.
    pub fn from_parts(nodes: Vec<Point3<f64>>, elements: Vec<[u32; 2]>) -> LatticeResult<Self> {
        let node_count = nodes.len();
        for (element_index, &[a, b]) in elements.iter().enumerate() {
            for node_index in [a, b] {
                if node_index as usize >= node_count {
                    return Err(LatticeError::InvalidElement {
                        element_index,
                        node_index,
                        node_count,
                    });
                }
            }
            if a == b {
                return Err(LatticeError::degenerate_element(element_index, [a, b]));
            }
        }
        Ok(Self { nodes, elements })
    }

    /// Assemble a mesh whose connectivity was produced by the indexer.
    pub(crate) fn from_indexed(nodes: Vec<Point3<f64>>, elements: Vec<[u32; 2]>) -> Self {
        debug_assert!(
            elements
                .iter()
                .all(|&[a, b]| a != b && (a as usize) < nodes.len() && (b as usize) < nodes.len())
        );
        Self { nodes, elements }
    }

    /// Node coordinates, indexed by node ID.
    #[inline]
    pub fn nodes(&self) -> &[Point3<f64>] {
        &self.nodes
    }

    /// Element connectivity as pairs of node IDs.
    #[inline]
    pub fn elements(&self) -> &[[u32; 2]] {
        &self.elements
    }

    /// Number of nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of elements.
    #[inline]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Check if the mesh has no nodes or no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() || self.elements.is_empty()
    }

    /// Consume the mesh, returning `(nodes, elements)`.
    pub fn into_parts(self) -> (Vec<Point3<f64>>, Vec<[u32; 2]>) {
        (self.nodes, self.elements)
    }

    /// Endpoint coordinates of an element.
    pub fn element_endpoints(&self, element_index: usize) -> Option<(Point3<f64>, Point3<f64>)> {
        self.elements.get(element_index).map(|&[a, b]| {
            (self.nodes[a as usize], self.nodes[b as usize])
        })
    }

    /// Direction vector of an element, from its first node to its second.
    pub fn element_vector(&self, element_index: usize) -> Option<Vector3<f64>> {
        self.element_endpoints(element_index).map(|(p, q)| q - p)
    }

    /// Length of an element.
    pub fn element_length(&self, element_index: usize) -> Option<f64> {
        self.element_vector(element_index).map(|v| v.norm())
    }

    /// Compute the axis-aligned bounding box.
    /// Returns (min_corner, max_corner) or None if mesh has no nodes.
    pub fn bounds(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = self.nodes.first()?;
        let mut min = *first;
        let mut max = *first;

        for p in &self.nodes[1..] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }

        Some((min, max))
    }

    /// Total strut length over all elements.
    pub fn total_length(&self) -> f64 {
        self.elements
            .iter()
            .map(|&[a, b]| (self.nodes[b as usize] - self.nodes[a as usize]).norm())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_square() -> Mesh {
        Mesh::from_parts(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1], [1, 2], [2, 3], [3, 0]],
        )
        .unwrap()
    }

    #[test]
    fn test_from_parts_valid() {
        let mesh = unit_square();
        assert_eq!(mesh.node_count(), 4);
        assert_eq!(mesh.element_count(), 4);
        assert!(!mesh.is_empty());
    }

    #[test]
    fn test_from_parts_out_of_range() {
        let err = Mesh::from_parts(vec![Point3::origin()], vec![[0, 3]]).unwrap_err();
        match err {
            LatticeError::InvalidElement {
                element_index,
                node_index,
                node_count,
            } => {
                assert_eq!(element_index, 0);
                assert_eq!(node_index, 3);
                assert_eq!(node_count, 1);
            }
            other => panic!("Expected InvalidElement, got {:?}", other),
        }
    }

    #[test]
    fn test_from_parts_repeated_index() {
        let err = Mesh::from_parts(
            vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)],
            vec![[0, 1], [1, 1]],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            LatticeError::DegenerateElement {
                element_index: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_bounds_and_lengths() {
        let mesh = unit_square();
        let (min, max) = mesh.bounds().unwrap();
        assert_eq!(min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(max, Point3::new(1.0, 1.0, 0.0));
        assert_relative_eq!(mesh.element_length(1).unwrap(), 1.0);
        assert_relative_eq!(mesh.total_length(), 4.0);
        assert!(mesh.element_length(4).is_none());
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = Mesh::default();
        assert!(mesh.is_empty());
        assert!(mesh.bounds().is_none());
    }

    #[test]
    fn test_snap() {
        assert_eq!(snap(1e-16), 0.0);
        assert_eq!(snap(-9e-16), 0.0);
        assert_eq!(snap(1e-14), 1e-14);
        assert_eq!(snap(6.123233995736766e-17), 0.0);
    }
}
