//! Fractional-to-Cartesian metric transform.
//!
//! The transform uses the standard crystallographic decomposition with the
//! first lattice vector along global x and the second in the xy-plane:
//!
//! ```text
//! | a   b·cosγ   c·cosβ                    |
//! | 0   b·sinγ   c·(cosα − cosβ·cosγ)/sinγ |
//! | 0   0        c·V/sinγ                  |
//! ```
//!
//! where `V = sqrt(1 − cos²α − cos²β − cos²γ + 2·cosα·cosβ·cosγ)` is the volume
//! factor. Matrix entries below [`SNAP_TOLERANCE`](crate::SNAP_TOLERANCE) are
//! zeroed, so a cubic cell maps to an exactly diagonal matrix.

use nalgebra::{Matrix3, Point3, Vector3};
use tracing::debug;

use crate::error::{LatticeError, LatticeResult};
use crate::lattice::LatticeParameters;
use crate::tiling::Anchor;
use crate::types::{SNAP_TOLERANCE, snap, snap_point};

/// The 3×3 matrix taking fractional lattice coordinates to Cartesian ones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricTransform {
    matrix: Matrix3<f64>,
    volume_factor: f64,
    cell_volume: f64,
}

impl MetricTransform {
    /// Build the transform for a set of cell constants.
    ///
    /// Fails with [`LatticeError::SingularMetric`] when `sin(gamma)` vanishes,
    /// with [`LatticeError::DegenerateCell`] when the angles do not span a volume
    /// and with [`LatticeError::CollapsedCell`] when snapping leaves a singular matrix.
    pub fn new(params: &LatticeParameters) -> LatticeResult<Self> {
        let LatticeParameters {
            a,
            b,
            c,
            alpha,
            beta,
            gamma,
            ..
        } = *params;

        let (cos_a, cos_b, cos_g) = (alpha.cos(), beta.cos(), gamma.cos());
        let sin_g = gamma.sin();

        if !sin_g.is_finite() || sin_g.abs() < SNAP_TOLERANCE {
            return Err(LatticeError::SingularMetric {
                gamma,
                sin_gamma: sin_g,
            });
        }

        let volume_factor_squared =
            1.0 - cos_a * cos_a - cos_b * cos_b - cos_g * cos_g + 2.0 * cos_a * cos_b * cos_g;
        if !(volume_factor_squared > 0.0) {
            return Err(LatticeError::DegenerateCell {
                volume_factor_squared,
            });
        }
        let volume_factor = volume_factor_squared.sqrt();

        let raw = Matrix3::new(
            a,
            b * cos_g,
            c * cos_b,
            0.0,
            b * sin_g,
            c * (cos_a - cos_b * cos_g) / sin_g,
            0.0,
            0.0,
            c * volume_factor / sin_g,
        );
        let matrix = raw.map(snap);

        // Tiny lengths snap to zero and fold every site onto a plane or a point.
        let determinant = matrix.determinant();
        if !(determinant.abs() > 0.0) {
            return Err(LatticeError::CollapsedCell { determinant });
        }

        debug!(volume_factor, det = determinant, "Built metric transform");

        Ok(Self {
            matrix,
            volume_factor,
            cell_volume: a * b * c * volume_factor,
        })
    }

    /// The transform matrix. Columns are the three lattice vectors.
    #[inline]
    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.matrix
    }

    /// Dimensionless volume factor `V`.
    #[inline]
    pub fn volume_factor(&self) -> f64 {
        self.volume_factor
    }

    /// Unit cell volume, `a·b·c·V`.
    #[inline]
    pub fn cell_volume(&self) -> f64 {
        self.cell_volume
    }

    /// Lattice vector `i` (0 = a, 1 = b, 2 = c) in Cartesian space.
    pub fn lattice_vector(&self, i: usize) -> Vector3<f64> {
        self.matrix.column(i).into_owned()
    }

    /// Map a fractional point to Cartesian space, snapping near-zero components.
    #[inline]
    pub fn to_cartesian(&self, fractional: &Point3<f64>) -> Point3<f64> {
        snap_point(Point3::from(self.matrix * fractional.coords))
    }

    /// Cartesian translation for a grid anchor.
    pub fn translation(&self, anchor: Anchor) -> Vector3<f64> {
        (self.matrix * anchor.to_fractional()).map(snap)
    }
}
