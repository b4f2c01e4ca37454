//! Error types for lattice generation with rich diagnostics.
//!
//! This module provides error handling with:
//! - Machine-readable error codes for programmatic handling
//! - Rich context (which parameter, which element, which coordinate)
//! - Recovery suggestions for common issues
//! - Terminal display via miette
//!
//! # Error Codes
//!
//! Each error has a unique code in the format `LATTICE-XXXX`:
//! - `LATTICE-1xxx`: Parameter errors (lattice constants, grid, subdivision)
//! - `LATTICE-2xxx`: Mesh invariant errors (indexing, connectivity)
//! - `LATTICE-3xxx`: Geometry errors (degenerate elements)
//! - `LATTICE-4xxx`: Configuration errors (reading and parsing config files)
//!
//! Every failure is permanent: all operations are deterministic, so nothing is
//! ever retried.
//!
//! # Example
//!
//! ```
//! use bravais_mesh::{ErrorCode, ErrorKind, LatticeError};
//!
//! let err = LatticeError::invalid_parameter("alpha", 4.0, "angle must lie strictly between 0 and pi");
//! assert_eq!(err.code(), ErrorCode::InvalidParameter);
//! assert_eq!(err.kind(), ErrorKind::InvalidParameters);
//! assert_eq!(err.code().as_str(), "LATTICE-1001");
//! ```

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

use crate::lattice::LatticeFamily;

/// Result type alias for lattice operations.
pub type LatticeResult<T> = Result<T, LatticeError>;

/// Machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Parameter errors (1xxx)
    /// LATTICE-1001: A parameter value is out of its valid domain
    InvalidParameter = 1001,
    /// LATTICE-1002: A parameter required by the lattice family is missing
    MissingParameter = 1002,
    /// LATTICE-1003: A parameter the lattice family fixes was supplied
    UnexpectedParameter = 1003,
    /// LATTICE-1004: The cell volume factor is not a positive real
    DegenerateCell = 1004,
    /// LATTICE-1005: sin(gamma) is zero
    SingularMetric = 1005,
    /// LATTICE-1006: A grid dimension is zero or the grid is too large
    InvalidGrid = 1006,
    /// LATTICE-1007: The snapped metric transform has zero determinant
    CollapsedCell = 1007,

    // Mesh invariant errors (2xxx)
    /// LATTICE-2001: An element endpoint is absent from the node list
    LookupFailure = 2001,
    /// LATTICE-2002: An element references a node index out of range
    InvalidElement = 2002,

    // Geometry errors (3xxx)
    /// LATTICE-3001: An element's endpoints coincide
    DegenerateElement = 3001,
    /// LATTICE-3002: Two distinct lattice sites map to the same Cartesian point
    CoincidentNodes = 3002,

    // Configuration errors (4xxx)
    /// LATTICE-4001: Failed to read a configuration file
    ConfigRead = 4001,
    /// LATTICE-4002: Failed to parse a configuration file
    ConfigParse = 4002,
    /// LATTICE-4003: Failed to write a configuration file
    ConfigWrite = 4003,
}

impl ErrorCode {
    /// Returns the error code as a string in the format `LATTICE-XXXX`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidParameter => "LATTICE-1001",
            ErrorCode::MissingParameter => "LATTICE-1002",
            ErrorCode::UnexpectedParameter => "LATTICE-1003",
            ErrorCode::DegenerateCell => "LATTICE-1004",
            ErrorCode::SingularMetric => "LATTICE-1005",
            ErrorCode::InvalidGrid => "LATTICE-1006",
            ErrorCode::CollapsedCell => "LATTICE-1007",
            ErrorCode::LookupFailure => "LATTICE-2001",
            ErrorCode::InvalidElement => "LATTICE-2002",
            ErrorCode::DegenerateElement => "LATTICE-3001",
            ErrorCode::CoincidentNodes => "LATTICE-3002",
            ErrorCode::ConfigRead => "LATTICE-4001",
            ErrorCode::ConfigParse => "LATTICE-4002",
            ErrorCode::ConfigWrite => "LATTICE-4003",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Coarse classification of failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad input: angle out of range, degenerate cell, missing parameter, bad grid.
    InvalidParameters,
    /// A broken invariant between mesh building and indexing. Always a logic defect.
    LookupFailure,
    /// An element or a pair of sites that collapse onto the same point.
    DegenerateElement,
    /// A configuration file could not be read, parsed or written.
    Configuration,
}

/// Recovery suggestions for lattice errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoverySuggestion {
    /// Adjust parameters for the operation.
    AdjustParameters { parameters: Vec<(String, String)> },
    /// Supply the parameters the lattice family requires.
    SupplyParameters { names: Vec<String> },
    /// Drop parameters the lattice family fixes itself.
    RemoveParameters { names: Vec<String> },
    /// Check the configuration source.
    CheckConfig { checks: Vec<String> },
    /// The failure indicates a defect rather than bad input.
    ReportDefect { description: String },
}

impl std::fmt::Display for RecoverySuggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecoverySuggestion::AdjustParameters { parameters } => {
                let params: Vec<String> = parameters
                    .iter()
                    .map(|(k, v)| format!("{} = {}", k, v))
                    .collect();
                write!(f, "Try adjusting: {}", params.join(", "))
            }
            RecoverySuggestion::SupplyParameters { names } => {
                write!(f, "Supply the required parameters: {}", names.join(", "))
            }
            RecoverySuggestion::RemoveParameters { names } => {
                write!(
                    f,
                    "Remove parameters fixed by the lattice family: {}",
                    names.join(", ")
                )
            }
            RecoverySuggestion::CheckConfig { checks } => {
                write!(f, "Check the configuration for: {}", checks.join(", "))
            }
            RecoverySuggestion::ReportDefect { description } => {
                write!(f, "{}", description)
            }
        }
    }
}

/// Location information for lattice errors.
#[derive(Debug, Clone)]
pub enum ErrorLocation {
    /// Error at a pair of nodes.
    Nodes { first: u32, second: u32 },
    /// Error at a specific element.
    Element {
        index: usize,
        nodes: Option<[u32; 2]>,
    },
    /// Error at a named lattice parameter.
    Parameter { name: &'static str },
    /// Error in a file.
    File { path: PathBuf },
}

impl std::fmt::Display for ErrorLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorLocation::Element { index, nodes } => {
                if let Some([a, b]) = nodes {
                    write!(f, "element {} with nodes [{}, {}]", index, a, b)
                } else {
                    write!(f, "element {}", index)
                }
            }
            ErrorLocation::Nodes { first, second } => write!(f, "nodes {} and {}", first, second),
            ErrorLocation::Parameter { name } => write!(f, "parameter `{}`", name),
            ErrorLocation::File { path } => write!(f, "{}", path.display()),
        }
    }
}

/// Errors that can occur while generating lattice meshes.
#[derive(Debug, Error, Diagnostic)]
pub enum LatticeError {
    /// A parameter is outside its valid domain.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    #[diagnostic(
        code(lattice::params::invalid),
        help("Lengths must be finite and positive, angles strictly between 0 and pi radians.")
    )]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// A parameter required by the family was not supplied.
    #[error("{family} lattice requires parameter `{name}`")]
    #[diagnostic(code(lattice::params::missing))]
    MissingParameter {
        family: LatticeFamily,
        name: &'static str,
    },

    /// A parameter fixed by the family was supplied.
    #[error("{family} lattice fixes parameter `{name}`; it cannot be supplied")]
    #[diagnostic(code(lattice::params::unexpected))]
    UnexpectedParameter {
        family: LatticeFamily,
        name: &'static str,
    },

    /// The volume factor is not a positive real.
    #[error(
        "degenerate cell: 1 - cos²α - cos²β - cos²γ + 2cosα·cosβ·cosγ = {volume_factor_squared:e} is not positive"
    )]
    #[diagnostic(
        code(lattice::params::degenerate_cell),
        help("The three cell angles do not span a volume. Each angle must be smaller than the sum of the other two.")
    )]
    DegenerateCell { volume_factor_squared: f64 },

    /// sin(gamma) vanishes, so the metric transform divides by zero.
    #[error("singular metric transform: sin(gamma) = {sin_gamma:e} for gamma = {gamma}")]
    #[diagnostic(code(lattice::params::singular_metric))]
    SingularMetric { gamma: f64, sin_gamma: f64 },

    /// A grid dimension is zero, or the grid holds more cells or nodes than can be indexed.
    #[error("invalid grid {x} x {y} x {z}: {reason}")]
    #[diagnostic(code(lattice::params::grid))]
    InvalidGrid {
        x: usize,
        y: usize,
        z: usize,
        reason: &'static str,
    },

    /// Lattice vectors vanish once entries below the snapping tolerance are zeroed.
    #[error("collapsed cell: metric transform determinant is {determinant:e} after snapping")]
    #[diagnostic(
        code(lattice::params::collapsed_cell),
        help("Matrix entries below 1e-15 are stored as zero, so edge lengths that small leave no cell. Scale the lattice constants up.")
    )]
    CollapsedCell { determinant: f64 },

    /// An element endpoint coordinate is not in the consolidated node list.
    #[error(
        "lookup failure: endpoint {endpoint} of element {element_index} at {coordinate:?} is not in the node list"
    )]
    #[diagnostic(
        code(lattice::mesh::lookup),
        help("Every element endpoint must come from the node set it is indexed against. This is a defect, not bad input.")
    )]
    LookupFailure {
        element_index: usize,
        endpoint: usize,
        coordinate: [f64; 3],
    },

    /// An element references a node index that does not exist.
    #[error(
        "invalid element: element {element_index} references node {node_index}, but mesh only has {node_count} nodes"
    )]
    #[diagnostic(code(lattice::mesh::element_index))]
    InvalidElement {
        element_index: usize,
        node_index: u32,
        node_count: usize,
    },

    /// An element's two endpoints are the same node or the same point.
    #[error("degenerate element {element_index}: endpoints {nodes:?} coincide")]
    #[diagnostic(
        code(lattice::geometry::degenerate_element),
        help("A zero-length strut has no direction, so no local frame exists for it.")
    )]
    DegenerateElement {
        element_index: usize,
        nodes: [u32; 2],
    },

    /// Two distinct lattice sites land on the same Cartesian point.
    #[error("coincident nodes {first} and {second} at {coordinate:?}")]
    #[diagnostic(
        code(lattice::geometry::coincident_nodes),
        help("Distinct sites merged under floating point rounding. Keep the lattice constants within a few orders of magnitude of each other.")
    )]
    CoincidentNodes {
        first: u32,
        second: u32,
        coordinate: [f64; 3],
    },

    /// Failed to read a configuration file.
    #[error("failed to read configuration from {path}")]
    #[diagnostic(code(lattice::config::read))]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a configuration file.
    #[error("failed to write configuration to {path}")]
    #[diagnostic(code(lattice::config::write))]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse or serialize a configuration.
    #[error("failed to parse configuration{}: {details}", source_suffix(.path))]
    #[diagnostic(code(lattice::config::parse))]
    ConfigParse {
        path: Option<PathBuf>,
        details: String,
    },
}

fn source_suffix(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" from {}", p.display()))
        .unwrap_or_default()
}

impl LatticeError {
    /// Returns the machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            LatticeError::InvalidParameter { .. } => ErrorCode::InvalidParameter,
            LatticeError::MissingParameter { .. } => ErrorCode::MissingParameter,
            LatticeError::UnexpectedParameter { .. } => ErrorCode::UnexpectedParameter,
            LatticeError::DegenerateCell { .. } => ErrorCode::DegenerateCell,
            LatticeError::SingularMetric { .. } => ErrorCode::SingularMetric,
            LatticeError::InvalidGrid { .. } => ErrorCode::InvalidGrid,
            LatticeError::CollapsedCell { .. } => ErrorCode::CollapsedCell,
            LatticeError::LookupFailure { .. } => ErrorCode::LookupFailure,
            LatticeError::InvalidElement { .. } => ErrorCode::InvalidElement,
            LatticeError::DegenerateElement { .. } => ErrorCode::DegenerateElement,
            LatticeError::CoincidentNodes { .. } => ErrorCode::CoincidentNodes,
            LatticeError::ConfigRead { .. } => ErrorCode::ConfigRead,
            LatticeError::ConfigParse { .. } => ErrorCode::ConfigParse,
            LatticeError::ConfigWrite { .. } => ErrorCode::ConfigWrite,
        }
    }

    /// Returns the coarse failure classification.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LatticeError::InvalidParameter { .. }
            | LatticeError::MissingParameter { .. }
            | LatticeError::UnexpectedParameter { .. }
            | LatticeError::DegenerateCell { .. }
            | LatticeError::SingularMetric { .. }
            | LatticeError::InvalidGrid { .. }
            | LatticeError::CollapsedCell { .. } => ErrorKind::InvalidParameters,
            LatticeError::LookupFailure { .. } | LatticeError::InvalidElement { .. } => {
                ErrorKind::LookupFailure
            }
            LatticeError::DegenerateElement { .. } | LatticeError::CoincidentNodes { .. } => {
                ErrorKind::DegenerateElement
            }
            LatticeError::ConfigRead { .. }
            | LatticeError::ConfigParse { .. }
            | LatticeError::ConfigWrite { .. } => ErrorKind::Configuration,
        }
    }

    /// Returns a recovery suggestion for this error.
    pub fn recovery_suggestion(&self) -> RecoverySuggestion {
        match self {
            LatticeError::InvalidParameter { name, .. } => RecoverySuggestion::AdjustParameters {
                parameters: vec![((*name).into(), "use a value inside the valid domain".into())],
            },
            LatticeError::MissingParameter { family, .. } => RecoverySuggestion::SupplyParameters {
                names: family
                    .required_parameters()
                    .iter()
                    .map(|s| (*s).to_string())
                    .collect(),
            },
            LatticeError::UnexpectedParameter { name, .. } => RecoverySuggestion::RemoveParameters {
                names: vec![(*name).into()],
            },
            LatticeError::DegenerateCell { .. } => RecoverySuggestion::AdjustParameters {
                parameters: vec![
                    ("alpha, beta, gamma".into(), "keep each below the sum of the others".into()),
                ],
            },
            LatticeError::SingularMetric { .. } => RecoverySuggestion::AdjustParameters {
                parameters: vec![("gamma".into(), "move away from 0 and pi".into())],
            },
            LatticeError::InvalidGrid { .. } => RecoverySuggestion::AdjustParameters {
                parameters: vec![(
                    "grid".into(),
                    "use at least 1 cell per axis and fewer than 2^32 nodes in total".into(),
                )],
            },
            LatticeError::CollapsedCell { .. } => RecoverySuggestion::AdjustParameters {
                parameters: vec![("a, b, c".into(), "use lengths well above 1e-15".into())],
            },
            LatticeError::LookupFailure { .. } | LatticeError::InvalidElement { .. } => {
                RecoverySuggestion::ReportDefect {
                    description: "Element connectivity no longer matches its node list; this is a bug in mesh construction".into(),
                }
            }
            LatticeError::DegenerateElement { .. } | LatticeError::CoincidentNodes { .. } => {
                RecoverySuggestion::AdjustParameters {
                    parameters: vec![(
                        "a, b, c".into(),
                        "keep the edge lengths within a few orders of magnitude of each other"
                            .into(),
                    )],
                }
            }
            LatticeError::ConfigRead { .. } => RecoverySuggestion::CheckConfig {
                checks: vec!["file exists".into(), "file permissions".into()],
            },
            LatticeError::ConfigParse { .. } => RecoverySuggestion::CheckConfig {
                checks: vec!["field names".into(), "value types".into()],
            },
            LatticeError::ConfigWrite { .. } => RecoverySuggestion::CheckConfig {
                checks: vec!["target directory exists".into(), "write permissions".into()],
            },
        }
    }

    /// Returns location information if available.
    pub fn location(&self) -> Option<ErrorLocation> {
        match self {
            LatticeError::InvalidParameter { name, .. }
            | LatticeError::MissingParameter { name, .. }
            | LatticeError::UnexpectedParameter { name, .. } => {
                Some(ErrorLocation::Parameter { name: *name })
            }
            LatticeError::SingularMetric { .. } => Some(ErrorLocation::Parameter { name: "gamma" }),
            LatticeError::LookupFailure { element_index, .. }
            | LatticeError::InvalidElement { element_index, .. } => Some(ErrorLocation::Element {
                index: *element_index,
                nodes: None,
            }),
            LatticeError::DegenerateElement {
                element_index,
                nodes,
            } => Some(ErrorLocation::Element {
                index: *element_index,
                nodes: Some(*nodes),
            }),
            LatticeError::CoincidentNodes { first, second, .. } => Some(ErrorLocation::Nodes {
                first: *first,
                second: *second,
            }),
            LatticeError::ConfigRead { path, .. } | LatticeError::ConfigWrite { path, .. } => {
                Some(ErrorLocation::File { path: path.clone() })
            }
            LatticeError::ConfigParse { path, .. } => {
                path.as_ref().map(|p| ErrorLocation::File { path: p.clone() })
            }
            LatticeError::DegenerateCell { .. }
            | LatticeError::CollapsedCell { .. }
            | LatticeError::InvalidGrid { .. } => None,
        }
    }

    // Constructor helpers for common error patterns

    /// Create an InvalidParameter error.
    pub fn invalid_parameter(name: &'static str, value: f64, reason: &'static str) -> Self {
        LatticeError::InvalidParameter {
            name,
            value,
            reason,
        }
    }

    /// Create a LookupFailure error.
    pub fn lookup_failure(element_index: usize, endpoint: usize, coordinate: [f64; 3]) -> Self {
        LatticeError::LookupFailure {
            element_index,
            endpoint,
            coordinate,
        }
    }

    /// Create a DegenerateElement error.
    pub fn degenerate_element(element_index: usize, nodes: [u32; 2]) -> Self {
        LatticeError::DegenerateElement {
            element_index,
            nodes,
        }
    }

    /// Create a ConfigParse error.
    pub fn config_parse(path: Option<PathBuf>, details: impl Into<String>) -> Self {
        LatticeError::ConfigParse {
            path,
            details: details.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = LatticeError::lookup_failure(3, 1, [0.5, 0.5, 0.5]);
        assert_eq!(err.code(), ErrorCode::LookupFailure);
        assert_eq!(err.code().as_str(), "LATTICE-2001");
        assert_eq!(err.kind(), ErrorKind::LookupFailure);
    }

    #[test]
    fn test_kinds() {
        assert_eq!(
            LatticeError::DegenerateCell {
                volume_factor_squared: -0.1
            }
            .kind(),
            ErrorKind::InvalidParameters
        );
        assert_eq!(
            LatticeError::degenerate_element(0, [1, 1]).kind(),
            ErrorKind::DegenerateElement
        );
        assert_eq!(
            LatticeError::config_parse(None, "bad").kind(),
            ErrorKind::Configuration
        );
    }

    #[test]
    fn test_missing_parameter_suggestion() {
        let err = LatticeError::MissingParameter {
            family: LatticeFamily::Hexagonal,
            name: "c",
        };
        match err.recovery_suggestion() {
            RecoverySuggestion::SupplyParameters { names } => {
                assert_eq!(names, vec!["a".to_string(), "c".to_string()]);
            }
            other => panic!("Expected SupplyParameters, got {:?}", other),
        }
    }

    #[test]
    fn test_coincident_nodes() {
        let err = LatticeError::CoincidentNodes {
            first: 4,
            second: 9,
            coordinate: [1.0, 0.0, 0.0],
        };
        assert_eq!(err.code().as_str(), "LATTICE-3002");
        assert_eq!(err.kind(), ErrorKind::DegenerateElement);
        match err.location() {
            Some(ErrorLocation::Nodes { first, second }) => {
                assert_eq!((first, second), (4, 9));
            }
            other => panic!("Expected Nodes location, got {:?}", other),
        }
    }

    #[test]
    fn test_location_info() {
        let err = LatticeError::degenerate_element(7, [2, 2]);
        match err.location() {
            Some(ErrorLocation::Element { index, nodes }) => {
                assert_eq!(index, 7);
                assert_eq!(nodes, Some([2, 2]));
            }
            other => panic!("Expected Element location, got {:?}", other),
        }
    }

    #[test]
    fn test_error_display() {
        let err = LatticeError::InvalidGrid {
            x: 2,
            y: 0,
            z: 1,
            reason: "every dimension must be at least 1",
        };
        let display = format!("{}", err);
        assert!(display.contains("2 x 0 x 1"));
        assert!(display.contains("at least 1"));

        let err = LatticeError::MissingParameter {
            family: LatticeFamily::Triclinic,
            name: "gamma",
        };
        let display = format!("{}", err);
        assert!(display.contains("Triclinic"));
        assert!(display.contains("gamma"));
    }
}
