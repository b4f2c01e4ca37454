//! Node/strut meshes of the 14 three-dimensional Bravais lattices.
//!
//! This crate builds finite-element style meshes for percolation network
//! geometries: lattice sites become nodes, bonds become two-node line elements.
//!
//! # Pipeline
//!
//! 1. [`LatticeDefinition`]: one of 14 [`LatticeFamily`] entries with its cell
//!    constants resolved and validated
//! 2. [`MetricTransform`]: fractional-to-Cartesian matrix for those constants
//! 3. [`build_unit_cell`]: subdivides each basis strut into `num_elems` elements
//!    and consolidates the result into a [`UnitCell`]
//! 4. [`tile`]: replicates the unit cell across a [`GridDims`] grid and merges
//!    shared sites into one global [`Mesh`]
//! 5. [`assign_major_axes`] / [`element_frames`]: local frame per element for a
//!    given roll angle
//!
//! # Coordinate System
//!
//! Right-handed. The first lattice vector lies along +x, the second in the
//! xy-plane. Coordinate components with magnitude below [`SNAP_TOLERANCE`] are
//! stored as exactly zero.
//!
//! # Quick Start
//!
//! ```
//! use bravais_mesh::{CellParameters, GridDims, LatticeFamily, UnitCell, tile, validate_mesh};
//!
//! let cell = UnitCell::new(LatticeFamily::SimpleCubic, &CellParameters::new().with_a(1.0), 1)?;
//! let mesh = tile(&cell, GridDims::new(2, 2, 2))?;
//! assert_eq!(mesh.node_count(), 27);
//!
//! let report = validate_mesh(&mesh);
//! assert_eq!(report.min_node_spacing, Some(1.0));
//! # Ok::<(), bravais_mesh::LatticeError>(())
//! ```
//!
//! # Builder
//!
//! ```
//! use bravais_mesh::{LatticeBuilder, LatticeFamily};
//!
//! let lattice = LatticeBuilder::new(LatticeFamily::Hexagonal)
//!     .a(1.0)
//!     .c(1.6)
//!     .grid(4, 4, 2)
//!     .roll(0.0)
//!     .build()?;
//! println!("{}", lattice.report());
//! # Ok::<(), bravais_mesh::LatticeError>(())
//! ```
//!
//! # Features
//!
//! - `config`: serde support and [`GenerationConfig`] loading from TOML/JSON
//!
//! # Logging
//!
//! All stages emit `tracing` events; see [`tracing_ext`] for targets.

mod builder;
mod error;
pub mod tracing_ext;
mod types;

pub mod axes;
pub mod basis;
pub mod consolidate;
pub mod lattice;
pub mod metric;
pub mod tiling;
pub mod validate;

#[cfg(feature = "config")]
pub mod config;

// Re-export core types at crate root
pub use error::{
    ErrorCode, ErrorKind, ErrorLocation, LatticeError, LatticeResult, RecoverySuggestion,
};
pub use types::{Mesh, SNAP_TOLERANCE, snap};

pub use axes::{
    AlignmentAngles, LocalFrame, alignment_angles, assign_major_axes, element_frame,
    element_frames, major_axis, rotate_coords,
};
pub use basis::{UnitCell, build_unit_cell, linspace, subdivide_strut};
pub use consolidate::{NodeIndex, NodeKey, consolidate_and_index, consolidate_nodes};
pub use lattice::{CellParameters, Centering, LatticeDefinition, LatticeFamily, LatticeParameters};
pub use metric::MetricTransform;
pub use tiling::{Anchor, GridDims, tile};
pub use validate::{LatticeReport, validate_mesh};

// Builder API
pub use builder::{GeneratedLattice, LatticeBuilder};

#[cfg(feature = "config")]
pub use config::{AngleUnit, GenerationConfig};
