//! Per-element local frames.
//!
//! Each element gets a right-handed orthonormal frame whose first axis runs
//! along the bond, from its first node to its second. The third axis is the
//! *major axis* used to orient cross-sectional bond properties; the caller's
//! roll angle turns the frame about the bond.
//!
//! The frame is built from two alignment angles (rotation about global y, then
//! about global z) plus the roll about local x, combined as `Rx·Ry·Rz`. The rows
//! of that matrix are the local axes.

use std::f64::consts::FRAC_PI_2;

use nalgebra::{Matrix3, Point3, Vector3};
use rayon::prelude::*;
use tracing::debug;

use crate::error::{LatticeError, LatticeResult};
use crate::tracing_ext::OperationTimer;
use crate::types::{Mesh, snap};

/// Rotations that align global x with a direction vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignmentAngles {
    /// Rotation about y, radians. Positive when the direction points up (+z).
    pub yrot: f64,
    /// Rotation about z, radians.
    pub zrot: f64,
}

/// Alignment angles for direction `v`.
///
/// Returns `None` for a zero-length or non-finite vector. A vector parallel to
/// global z gets `zrot = 0` and `yrot = ±π/2`.
pub fn alignment_angles(v: &Vector3<f64>) -> Option<AlignmentAngles> {
    let len = v.norm();
    if !len.is_finite() || len == 0.0 {
        return None;
    }
    let xy = (v.x * v.x + v.y * v.y).sqrt();

    let (mut yrot, mut zrot) = if xy == 0.0 {
        let yrot = if v.x < 0.0 { -FRAC_PI_2 } else { FRAC_PI_2 };
        (yrot, 0.0)
    } else {
        let zrot = -(v.x / xy).clamp(-1.0, 1.0).acos();
        // Can exceed 1 by rounding for vectors in the xy-plane.
        let val = ((v.x * v.x + v.y * v.y) / (xy * len)).clamp(-1.0, 1.0);
        (val.acos(), zrot)
    };

    if v.y < 0.0 {
        zrot = -zrot;
    }
    if v.z < 0.0 {
        yrot = -yrot;
    }
    Some(AlignmentAngles { yrot, zrot })
}

/// Right-handed rotation about global x.
pub fn rotation_x(theta: f64) -> Matrix3<f64> {
    let (s, c) = theta.sin_cos();
    Matrix3::new(1.0, 0.0, 0.0, 0.0, c, -s, 0.0, s, c)
}

/// Right-handed rotation about global y.
pub fn rotation_y(theta: f64) -> Matrix3<f64> {
    let (s, c) = theta.sin_cos();
    Matrix3::new(c, 0.0, s, 0.0, 1.0, 0.0, -s, 0.0, c)
}

/// Right-handed rotation about global z.
pub fn rotation_z(theta: f64) -> Matrix3<f64> {
    let (s, c) = theta.sin_cos();
    Matrix3::new(c, -s, 0.0, s, c, 0.0, 0.0, 0.0, 1.0)
}

/// Combined rotation `Rx(xrot)·Ry(yrot)·Rz(zrot)` with near-zero entries snapped.
pub fn rotate_coords(xrot: f64, yrot: f64, zrot: f64) -> Matrix3<f64> {
    (rotation_x(xrot) * rotation_y(yrot) * rotation_z(zrot)).map(snap)
}

/// An orthonormal local frame. Columns are the local x, y, z axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalFrame {
    axes: Matrix3<f64>,
}

impl LocalFrame {
    /// Frame from a rotation whose rows are the local axes.
    pub fn from_rotation(rotation: Matrix3<f64>) -> Self {
        Self {
            axes: rotation.transpose(),
        }
    }

    /// Local axes as matrix columns.
    #[inline]
    pub fn axes(&self) -> &Matrix3<f64> {
        &self.axes
    }

    /// Rotation taking global components to local ones. Rows are the local axes.
    pub fn rotation(&self) -> Matrix3<f64> {
        self.axes.transpose()
    }

    /// Local x: unit vector along the bond.
    pub fn bond_axis(&self) -> Vector3<f64> {
        self.axes.column(0).into_owned()
    }

    /// Local y.
    pub fn minor_axis(&self) -> Vector3<f64> {
        self.axes.column(1).into_owned()
    }

    /// Local z, the major axis.
    pub fn major_axis(&self) -> Vector3<f64> {
        self.axes.column(2).into_owned()
    }
}

/// Local frame for a bond from `p1` to `p2`.
///
/// Returns `None` when the endpoints coincide.
pub fn element_frame(p1: &Point3<f64>, p2: &Point3<f64>, roll: f64) -> Option<LocalFrame> {
    let angles = alignment_angles(&(p2 - p1))?;
    Some(LocalFrame::from_rotation(rotate_coords(
        roll,
        angles.yrot,
        angles.zrot,
    )))
}

/// Major axis for a bond from `p1` to `p2`.
pub fn major_axis(p1: &Point3<f64>, p2: &Point3<f64>, roll: f64) -> Option<Vector3<f64>> {
    element_frame(p1, p2, roll).map(|frame| frame.major_axis())
}

/// Local frames for every element of `mesh`, in element order.
///
/// Fails with [`LatticeError::DegenerateElement`] on the first zero-length element.
pub fn element_frames(mesh: &Mesh, roll: f64) -> LatticeResult<Vec<LocalFrame>> {
    let _timer =
        OperationTimer::with_context("element_frames", mesh.node_count(), mesh.element_count());
    let nodes = mesh.nodes();

    let frames = mesh
        .elements()
        .par_iter()
        .enumerate()
        .map(|(i, &[a, b])| {
            element_frame(&nodes[a as usize], &nodes[b as usize], roll)
                .ok_or_else(|| LatticeError::degenerate_element(i, [a, b]))
        })
        .collect::<LatticeResult<Vec<_>>>()?;

    debug!(elements = frames.len(), roll, "Computed element frames");
    Ok(frames)
}

/// Major axis for every element of `mesh`, in element order.
pub fn assign_major_axes(mesh: &Mesh, roll: f64) -> LatticeResult<Vec<Vector3<f64>>> {
    Ok(element_frames(mesh, roll)?
        .into_iter()
        .map(|frame| frame.major_axis())
        .collect())
}
