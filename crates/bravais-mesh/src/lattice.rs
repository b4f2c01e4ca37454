//! Bravais lattice families and their unit-cell definitions.
//!
//! Every family is one row of a static table: which cell constants the caller
//! supplies, how the remaining ones are fixed, and which basis points and basis
//! struts make up the unit cell. All basis coordinates are fractional, inside
//! `[0, 1]³`.
//!
//! # Families
//!
//! | Family | Supplied | Basis points |
//! |--------|----------|--------------|
//! | SimpleCubic, FCC, BCC | a | 8, 14, 9 |
//! | Hexagonal | a, c | 8 |
//! | Rhombohedral | a, alpha | 8 |
//! | Primitive / body-centered tetragonal | a, c | 8 / 9 |
//! | Primitive / body / base / face-centered orthorhombic | a, b, c | 8 / 9 / 10 / 14 |
//! | Primitive / base-centered monoclinic | a, b, c, beta | 8 / 10 |
//! | Triclinic | a, b, c, alpha, beta, gamma | 8 |
//!
//! # Example
//!
//! ```
//! use bravais_mesh::{CellParameters, LatticeDefinition, LatticeFamily};
//!
//! let params = CellParameters::new().with_a(2.0).with_c(3.0);
//! let def = LatticeDefinition::new(LatticeFamily::Hexagonal, &params, 1).unwrap();
//! assert_eq!(def.parameters().b, 2.0);
//! assert_eq!(def.basis_points().len(), 8);
//! assert_eq!(def.basis_struts().len(), 14);
//! ```

use std::f64::consts::{FRAC_PI_2, FRAC_PI_3, PI};

use nalgebra::Point3;

use crate::error::{LatticeError, LatticeResult};

/// The 14 three-dimensional Bravais lattice families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "config",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum LatticeFamily {
    /// Simple (primitive) cubic.
    SimpleCubic,
    /// Face-centered cubic.
    Fcc,
    /// Body-centered cubic.
    Bcc,
    /// Hexagonal.
    Hexagonal,
    /// Rhombohedral (trigonal).
    Rhombohedral,
    /// Primitive tetragonal.
    PrimitiveTetragonal,
    /// Body-centered tetragonal.
    BodyCenteredTetragonal,
    /// Primitive orthorhombic.
    PrimitiveOrthorhombic,
    /// Body-centered orthorhombic.
    BodyCenteredOrthorhombic,
    /// Base-centered orthorhombic.
    BaseCenteredOrthorhombic,
    /// Face-centered orthorhombic.
    FaceCenteredOrthorhombic,
    /// Primitive monoclinic.
    PrimitiveMonoclinic,
    /// Base-centered monoclinic.
    BaseCenteredMonoclinic,
    /// Triclinic.
    Triclinic,
}

impl LatticeFamily {
    /// All families, in table order.
    pub const ALL: [LatticeFamily; 14] = [
        LatticeFamily::SimpleCubic,
        LatticeFamily::Fcc,
        LatticeFamily::Bcc,
        LatticeFamily::Hexagonal,
        LatticeFamily::Rhombohedral,
        LatticeFamily::PrimitiveTetragonal,
        LatticeFamily::BodyCenteredTetragonal,
        LatticeFamily::PrimitiveOrthorhombic,
        LatticeFamily::BodyCenteredOrthorhombic,
        LatticeFamily::BaseCenteredOrthorhombic,
        LatticeFamily::FaceCenteredOrthorhombic,
        LatticeFamily::PrimitiveMonoclinic,
        LatticeFamily::BaseCenteredMonoclinic,
        LatticeFamily::Triclinic,
    ];

    fn entry(self) -> &'static FamilyEntry {
        // Table rows follow `ALL` order.
        &FAMILY_TABLE[self as usize]
    }

    /// Short machine name (`simple_cubic`, `fcc`, ...).
    pub fn name(self) -> &'static str {
        self.entry().name
    }

    /// Parse a family from its machine name. Case-insensitive; `-` and `_` are interchangeable.
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = name.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL.into_iter().find(|f| f.name() == wanted)
    }

    /// Centering type of the unit cell.
    pub fn centering(self) -> Centering {
        self.entry().centering
    }

    /// Cell constants the caller must supply for this family.
    pub fn required_parameters(self) -> &'static [&'static str] {
        self.entry().constraint.required()
    }

    /// Number of basis points in the unit cell.
    pub fn basis_point_count(self) -> usize {
        CORNERS.len() + self.centering().extra_points().len()
    }

    /// Number of basis struts in the unit cell.
    pub fn basis_strut_count(self) -> usize {
        CUBE_EDGES.len() + self.centering().extra_struts().len()
    }
}

impl std::fmt::Display for LatticeFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.entry().display)
    }
}

/// How the unit cell is centered, which fixes the extra basis points and struts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Centering {
    /// Corners only.
    Primitive,
    /// Corners plus the body center, joined to all 8 corners.
    Body,
    /// Corners plus the 6 face centers, each joined to the 4 corners of its face.
    Face,
    /// Corners plus the two `c`-face centers, each joined to the 4 corners of its face.
    Base,
    /// Corners only, plus one diagonal strut on each `c`-face.
    HexagonalDiagonals,
}

impl Centering {
    fn extra_points(self) -> &'static [[f64; 3]] {
        match self {
            Centering::Primitive | Centering::HexagonalDiagonals => &[],
            Centering::Body => &BODY_POINTS,
            Centering::Face => &FACE_POINTS,
            Centering::Base => &BASE_POINTS,
        }
    }

    fn extra_struts(self) -> &'static [[usize; 2]] {
        match self {
            Centering::Primitive => &[],
            Centering::Body => &BODY_STRUTS,
            Centering::Face => &FACE_STRUTS,
            Centering::Base => &BASE_STRUTS,
            Centering::HexagonalDiagonals => &HEXAGONAL_STRUTS,
        }
    }
}

/// Which cell constants are supplied and how the rest are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Constraint {
    /// a = b = c, all angles π/2.
    Cubic,
    /// a = b, α = β = π/2, γ = π/3.
    Hexagonal,
    /// a = b = c, α = β = γ.
    Rhombohedral,
    /// a = b, all angles π/2.
    Tetragonal,
    /// All angles π/2.
    Orthorhombic,
    /// α = γ = π/2.
    Monoclinic,
    /// Nothing fixed.
    Triclinic,
}

impl Constraint {
    fn required(self) -> &'static [&'static str] {
        match self {
            Constraint::Cubic => &["a"],
            Constraint::Hexagonal | Constraint::Tetragonal => &["a", "c"],
            Constraint::Rhombohedral => &["a", "alpha"],
            Constraint::Orthorhombic => &["a", "b", "c"],
            Constraint::Monoclinic => &["a", "b", "c", "beta"],
            Constraint::Triclinic => &["a", "b", "c", "alpha", "beta", "gamma"],
        }
    }
}

struct FamilyEntry {
    name: &'static str,
    display: &'static str,
    centering: Centering,
    constraint: Constraint,
}

#[rustfmt::skip]
static FAMILY_TABLE: [FamilyEntry; 14] = [
    FamilyEntry { name: "simple_cubic", display: "SimpleCubic", centering: Centering::Primitive, constraint: Constraint::Cubic },
    FamilyEntry { name: "fcc", display: "FCC", centering: Centering::Face, constraint: Constraint::Cubic },
    FamilyEntry { name: "bcc", display: "BCC", centering: Centering::Body, constraint: Constraint::Cubic },
    FamilyEntry { name: "hexagonal", display: "Hexagonal", centering: Centering::HexagonalDiagonals, constraint: Constraint::Hexagonal },
    FamilyEntry { name: "rhombohedral", display: "Rhombohedral", centering: Centering::Primitive, constraint: Constraint::Rhombohedral },
    FamilyEntry { name: "primitive_tetragonal", display: "PrimitiveTetragonal", centering: Centering::Primitive, constraint: Constraint::Tetragonal },
    FamilyEntry { name: "body_centered_tetragonal", display: "BodyCenteredTetragonal", centering: Centering::Body, constraint: Constraint::Tetragonal },
    FamilyEntry { name: "primitive_orthorhombic", display: "PrimitiveOrthorhombic", centering: Centering::Primitive, constraint: Constraint::Orthorhombic },
    FamilyEntry { name: "body_centered_orthorhombic", display: "BodyCenteredOrthorhombic", centering: Centering::Body, constraint: Constraint::Orthorhombic },
    FamilyEntry { name: "base_centered_orthorhombic", display: "BaseCenteredOrthorhombic", centering: Centering::Base, constraint: Constraint::Orthorhombic },
    FamilyEntry { name: "face_centered_orthorhombic", display: "FaceCenteredOrthorhombic", centering: Centering::Face, constraint: Constraint::Orthorhombic },
    FamilyEntry { name: "primitive_monoclinic", display: "PrimitiveMonoclinic", centering: Centering::Primitive, constraint: Constraint::Monoclinic },
    FamilyEntry { name: "base_centered_monoclinic", display: "BaseCenteredMonoclinic", centering: Centering::Base, constraint: Constraint::Monoclinic },
    FamilyEntry { name: "triclinic", display: "Triclinic", centering: Centering::Primitive,constraint: Constraint::Triclinic },
];

/// The 8 cell corners, always basis points 0..8.
const CORNERS: [[f64; 3]; 8] = [
    [0.0, 0.0, 0.0],
    [0.0, 0.0, 1.0],
    [0.0, 1.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 1.0],
    [1.0, 0.0, 1.0],
    [1.0, 1.0, 0.0],
    [1.0, 1.0, 1.0],
];

/// The 12 cell edges between corners.
const CUBE_EDGES: [[usize; 2]; 12] = [
    [0, 1], [0, 2], [0, 3], [1, 4], [1, 5], [2, 4],
    [2, 6], [3, 5], [3, 6], [4, 7], [5, 7], [6, 7],
];

const BODY_POINTS: [[f64; 3]; 1] = [[0.5, 0.5, 0.5]];

const BODY_STRUTS: [[usize; 2]; 8] = [
    [0, 8], [1, 8], [2, 8], [3, 8], [4, 8], [5, 8], [6, 8], [7, 8],
];

const FACE_POINTS: [[f64; 3]; 6] = [
    [0.0, 0.5, 0.5],
    [0.5, 0.0, 0.5],
    [0.5, 0.5, 0.0],
    [1.0, 0.5, 0.5],
    [0.5, 1.0, 0.5],
    [0.5, 0.5, 1.0],
];

const FACE_STRUTS: [[usize; 2]; 24] = [
    [0, 8], [1, 8], [2, 8], [4, 8],
    [0, 9], [1, 9], [3, 9], [5, 9],
    [0, 10], [2, 10], [3, 10], [6, 10],
    [3, 11], [5, 11], [6, 11], [7, 11],
    [2, 12], [4, 12], [6, 12], [7, 12],
    [1, 13], [4, 13], [5, 13], [7, 13],
];

const BASE_POINTS: [[f64; 3]; 2] = [[0.5, 0.5, 0.0], [0.5, 0.5, 1.0]];

const BASE_STRUTS: [[usize; 2]; 8] = [
    [0, 8], [2, 8], [3, 8], [6, 8],
    [1, 9], [4, 9], [5, 9], [7, 9],
];

const HEXAGONAL_STRUTS: [[usize; 2]; 2] = [[2, 3], [4, 5]];

/// Cell constants as supplied by a caller. Unset fields are derived from the
/// family's constraints; angles are in radians.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
pub struct CellParameters {
    #[cfg_attr(feature = "config", serde(default, skip_serializing_if = "Option::is_none"))]
    pub a: Option<f64>,
    #[cfg_attr(feature = "config", serde(default, skip_serializing_if = "Option::is_none"))]
    pub b: Option<f64>,
    #[cfg_attr(feature = "config", serde(default, skip_serializing_if = "Option::is_none"))]
    pub c: Option<f64>,
    #[cfg_attr(feature = "config", serde(default, skip_serializing_if = "Option::is_none"))]
    pub alpha: Option<f64>,
    #[cfg_attr(feature = "config", serde(default, skip_serializing_if = "Option::is_none"))]
    pub beta: Option<f64>,
    #[cfg_attr(feature = "config", serde(default, skip_serializing_if = "Option::is_none"))]
    pub gamma: Option<f64>,
}

impl CellParameters {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set edge length `a`.
    pub fn with_a(mut self, a: f64) -> Self {
        self.a = Some(a);
        self
    }

    /// Set edge length `b`.
    pub fn with_b(mut self, b: f64) -> Self {
        self.b = Some(b);
        self
    }

    /// Set edge length `c`.
    pub fn with_c(mut self, c: f64) -> Self {
        self.c = Some(c);
        self
    }

    /// Set angle `alpha` (between b and c), radians.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = Some(alpha);
        self
    }

    /// Set angle `beta` (between a and c), radians.
    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = Some(beta);
        self
    }

    /// Set angle `gamma` (between a and b), radians.
    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = Some(gamma);
        self
    }

    /// Convert all supplied angles from degrees to radians.
    pub fn angles_from_degrees(self) -> Self {
        Self {
            alpha: self.alpha.map(f64::to_radians),
            beta: self.beta.map(f64::to_radians),
            gamma: self.gamma.map(f64::to_radians),
            ..self
        }
    }

    fn get(&self, name: &str) -> Option<f64> {
        match name {
            "a" => self.a,
            "b" => self.b,
            "c" => self.c,
            "alpha" => self.alpha,
            "beta" => self.beta,
            "gamma" => self.gamma,
            _ => None,
        }
    }
}

const PARAMETER_NAMES: [&str; 6] = ["a", "b", "c", "alpha", "beta", "gamma"];

/// Fully resolved cell constants plus the strut subdivision count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeParameters {
    /// Edge length along the first lattice vector.
    pub a: f64,
    /// Edge length along the second lattice vector.
    pub b: f64,
    /// Edge length along the third lattice vector.
    pub c: f64,
    /// Angle between b and c, radians.
    pub alpha: f64,
    /// Angle between a and c, radians.
    pub beta: f64,
    /// Angle between a and b, radians.
    pub gamma: f64,
    /// Number of linear elements each basis strut is split into (at least 1).
    pub num_elems: usize,
}

impl LatticeParameters {
    /// Check lengths, angles and subdivision count.
    ///
    /// The volume factor is checked by [`crate::MetricTransform::new`].
    pub fn validate(&self) -> LatticeResult<()> {
        for (name, value) in [("a", self.a), ("b", self.b), ("c", self.c)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(LatticeError::invalid_parameter(
                    name,
                    value,
                    "edge length must be finite and positive",
                ));
            }
        }
        for (name, value) in [
            ("alpha", self.alpha),
            ("beta", self.beta),
            ("gamma", self.gamma),
        ] {
            if !value.is_finite() || value <= 0.0 || value >= PI {
                return Err(LatticeError::invalid_parameter(
                    name,
                    value,
                    "angle must lie strictly between 0 and pi",
                ));
            }
        }
        if self.num_elems == 0 {
            return Err(LatticeError::invalid_parameter(
                "num_elems",
                0.0,
                "each strut needs at least one element",
            ));
        }
        Ok(())
    }
}

/// An immutable description of one lattice: family, resolved constants, basis.
#[derive(Debug, Clone, PartialEq)]
pub struct LatticeDefinition {
    family: LatticeFamily,
    parameters: LatticeParameters,
}

impl LatticeDefinition {
    /// Resolve `cell` against the family constraints and validate the result.
    ///
    /// Fails when a required constant is missing, when a constant the family
    /// fixes is supplied, or when any value is out of its domain.
    pub fn new(
        family: LatticeFamily,
        cell: &CellParameters,
        num_elems: usize,
    ) -> LatticeResult<Self> {
        let constraint = family.entry().constraint;
        let required = constraint.required();

        for name in required {
            if cell.get(name).is_none() {
                return Err(LatticeError::MissingParameter { family, name });
            }
        }
        for name in PARAMETER_NAMES {
            if !required.contains(&name) && cell.get(name).is_some() {
                return Err(LatticeError::UnexpectedParameter { family, name });
            }
        }

        let req = |name: &str| cell.get(name).unwrap_or_default();
        let a = req("a");
        let (b, c, alpha, beta, gamma) = match constraint {
            Constraint::Cubic => (a, a, FRAC_PI_2, FRAC_PI_2, FRAC_PI_2),
            Constraint::Hexagonal => (a, req("c"), FRAC_PI_2, FRAC_PI_2, FRAC_PI_3),
            Constraint::Rhombohedral => {
                let alpha = req("alpha");
                (a, a, alpha, alpha, alpha)
            }
            Constraint::Tetragonal => (a, req("c"), FRAC_PI_2, FRAC_PI_2, FRAC_PI_2),
            Constraint::Orthorhombic => (req("b"), req("c"), FRAC_PI_2, FRAC_PI_2, FRAC_PI_2),
            Constraint::Monoclinic => (req("b"), req("c"), FRAC_PI_2, req("beta"), FRAC_PI_2),
            Constraint::Triclinic => (req("b"), req("c"), req("alpha"), req("beta"), req("gamma")),
        };

        let parameters = LatticeParameters {
            a,
            b,
            c,
            alpha,
            beta,
            gamma,
            num_elems,
        };
        parameters.validate()?;

        Ok(Self { family, parameters })
    }

    /// Lattice family tag.
    #[inline]
    pub fn family(&self) -> LatticeFamily {
        self.family
    }

    /// Resolved cell constants.
    #[inline]
    pub fn parameters(&self) -> &LatticeParameters {
        &self.parameters
    }

    /// Number of elements per basis strut.
    #[inline]
    pub fn num_elems(&self) -> usize {
        self.parameters.num_elems
    }

    /// Fractional basis points; index = basis point ID.
    pub fn basis_points(&self) -> Vec<Point3<f64>> {
        CORNERS
            .iter()
            .chain(self.family.centering().extra_points())
            .map(|&[x, y, z]| Point3::new(x, y, z))
            .collect()
    }

    /// Basis struts as pairs of basis point IDs.
    pub fn basis_struts(&self) -> Vec<[usize; 2]> {
        CUBE_EDGES
            .iter()
            .chain(self.family.centering().extra_struts())
            .copied()
            .collect()
    }
}
