//! Node consolidation and connectivity indexing.
//!
//! Raw meshes come out of subdivision and tiling as coordinate soups: every
//! strut carries its own copy of each endpoint. [`consolidate_nodes`] collapses
//! them to a sorted unique set and [`NodeIndex`] maps each coordinate back to its
//! position in that set, so element endpoints can be rewritten as node IDs.
//!
//! Equality is exact: two coordinates are the same node only if all three
//! components compare bit-equal (with `-0.0` folded onto `0.0`). Callers keep
//! coordinates exact up to this point by consolidating in fractional space,
//! where subdivision points and integer anchor offsets are exactly representable
//! or identically rounded.

use hashbrown::HashMap;
use nalgebra::Point3;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::error::{LatticeError, LatticeResult};

/// Exact hash key for a coordinate triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey([u64; 3]);

impl NodeKey {
    /// Key for a point.
    #[inline]
    pub fn from_point(p: &Point3<f64>) -> Self {
        Self([
            canonical_zero(p.x).to_bits(),
            canonical_zero(p.y).to_bits(),
            canonical_zero(p.z).to_bits(),
        ])
    }
}

#[inline]
fn canonical_zero(c: f64) -> f64 {
    if c == 0.0 { 0.0 } else { c }
}

fn lexicographic(p: &Point3<f64>, q: &Point3<f64>) -> std::cmp::Ordering {
    p.x.total_cmp(&q.x)
        .then(p.y.total_cmp(&q.y))
        .then(p.z.total_cmp(&q.z))
}

/// Remove duplicate coordinates, returning the unique set in lexicographic
/// `(x, y, z)` order.
///
/// Runs in O(n log n). The result does not depend on input order, and
/// consolidating an already unique list returns it sorted and otherwise unchanged.
pub fn consolidate_nodes(points: &[Point3<f64>]) -> Vec<Point3<f64>> {
    let mut unique: Vec<Point3<f64>> = points
        .iter()
        .map(|p| p.map(canonical_zero))
        .collect();
    unique.par_sort_unstable_by(lexicographic);
    unique.dedup_by_key(|p| NodeKey::from_point(p));

    debug!(
        input = points.len(),
        unique = unique.len(),
        "Consolidated nodes"
    );
    unique
}

/// Hash index from exact coordinate to node ID.
#[derive(Debug, Clone, Default)]
pub struct NodeIndex {
    ids: HashMap<NodeKey, u32>,
}

impl NodeIndex {
    /// Index a consolidated node list. Node ID = position in `nodes`.
    ///
    /// If `nodes` still holds duplicates, the last occurrence wins.
    pub fn new(nodes: &[Point3<f64>]) -> Self {
        let mut ids = HashMap::with_capacity(nodes.len());
        for (i, p) in nodes.iter().enumerate() {
            ids.insert(NodeKey::from_point(p), i as u32);
        }
        if ids.len() != nodes.len() {
            warn!(
                nodes = nodes.len(),
                distinct = ids.len(),
                "Indexing a node list that was not consolidated"
            );
        }
        Self { ids }
    }

    /// Node ID for a coordinate, if present.
    #[inline]
    pub fn get(&self, p: &Point3<f64>) -> Option<u32> {
        self.ids.get(&NodeKey::from_point(p)).copied()
    }

    /// Number of indexed nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if the index is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Rewrite coordinate-pair elements as node-ID pairs.
    ///
    /// Fails with [`LatticeError::LookupFailure`] if an endpoint is not indexed
    /// and with [`LatticeError::DegenerateElement`] if both endpoints resolve to
    /// the same node. Element order is preserved.
    pub fn index_elements(&self, raw: &[[Point3<f64>; 2]]) -> LatticeResult<Vec<[u32; 2]>> {
        raw.par_iter()
            .enumerate()
            .map(|(element_index, [p, q])| {
                let lookup = |endpoint: usize, pt: &Point3<f64>| {
                    self.get(pt).ok_or_else(|| {
                        LatticeError::lookup_failure(element_index, endpoint, [pt.x, pt.y, pt.z])
                    })
                };
                let a = lookup(0, p)?;
                let b = lookup(1, q)?;
                if a == b {
                    return Err(LatticeError::degenerate_element(element_index, [a, b]));
                }
                Ok([a, b])
            })
            .collect()
    }
}

/// Consolidate `nodes` and index `raw_elements` against the result in one pass.
pub fn consolidate_and_index(
    nodes: &[Point3<f64>],
    raw_elements: &[[Point3<f64>; 2]],
) -> LatticeResult<(Vec<Point3<f64>>, Vec<[u32; 2]>)> {
    let unique = consolidate_nodes(nodes);
    let index = NodeIndex::new(&unique);
    let elements = index.index_elements(raw_elements)?;
    Ok((unique, elements))
}

/// Check that mapped nodes are still pairwise distinct and that no element has
/// collapsed to zero length.
///
/// Consolidation runs on exact fractional coordinates, but the Cartesian map can
/// still merge sites when one lattice constant is so much larger than another
/// that rounding absorbs the difference. Elements are checked first, so a
/// collapsed strut reports [`LatticeError::DegenerateElement`]; any remaining
/// merged pair reports [`LatticeError::CoincidentNodes`].
pub(crate) fn ensure_distinct(nodes: &[Point3<f64>], elements: &[[u32; 2]]) -> LatticeResult<()> {
    let collapsed = elements.par_iter().enumerate().find_first(|(_, [a, b])| {
        NodeKey::from_point(&nodes[*a as usize]) == NodeKey::from_point(&nodes[*b as usize])
    });
    if let Some((element_index, &nodes_pair)) = collapsed {
        return Err(LatticeError::degenerate_element(element_index, nodes_pair));
    }

    let mut seen: HashMap<NodeKey, u32> = HashMap::with_capacity(nodes.len());
    for (i, p) in nodes.iter().enumerate() {
        if let Some(&first) = seen.get(&NodeKey::from_point(p)) {
            return Err(LatticeError::CoincidentNodes {
                first,
                second: i as u32,
                coordinate: [p.x, p.y, p.z],
            });
        }
        seen.insert(NodeKey::from_point(p), i as u32);
    }
    Ok(())
}
