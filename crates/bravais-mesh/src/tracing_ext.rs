//! Tracing extensions for lattice generation.
//!
//! Every generation stage emits structured events through `tracing`:
//!
//! - **Timing**: [`OperationTimer`] logs each stage's duration when dropped
//! - **Mesh state**: node/element counts and extents after each stage
//! - **Validation**: summary of a [`LatticeReport`](crate::LatticeReport)
//!
//! # Usage
//!
//! Install a subscriber in the application:
//!
//! ```rust,ignore
//! use tracing_subscriber::{fmt, prelude::*, EnvFilter};
//!
//! tracing_subscriber::registry()
//!     .with(fmt::layer())
//!     .with(EnvFilter::from_default_env())
//!     .init();
//!
//! // RUST_LOG=bravais_mesh=debug for per-stage output
//! ```
//!
//! # Targets
//!
//! - `bravais_mesh::timing`: stage start/finish with elapsed time
//! - `bravais_mesh::mesh_state`: mesh dimensions between stages
//! - `bravais_mesh::validation`: validation summaries

use std::time::Instant;
use tracing::{Span, debug, info, trace, warn};

use crate::types::Mesh;
use crate::validate::LatticeReport;

/// A performance timer that logs duration on drop.
///
/// ```rust,ignore
/// fn tile_grid() {
///     let _timer = OperationTimer::new("tile");
///     // ... work ...
/// } // duration logged here
/// ```
pub struct OperationTimer {
    name: &'static str,
    start: Instant,
    span: Span,
}

impl OperationTimer {
    /// Create a new operation timer.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!("lattice_operation", operation = name);
        debug!(target: "bravais_mesh::timing", operation = name, "Starting operation");
        Self {
            name,
            start: Instant::now(),
            span,
        }
    }

    /// Create a timer recording the input size of the stage.
    pub fn with_context(name: &'static str, node_count: usize, element_count: usize) -> Self {
        let span = tracing::info_span!(
            "lattice_operation",
            operation = name,
            nodes = node_count,
            elements = element_count
        );
        debug!(
            target: "bravais_mesh::timing",
            operation = name,
            nodes = node_count,
            elements = element_count,
            "Starting operation"
        );
        Self {
            name,
            start: Instant::now(),
            span,
        }
    }

    /// Get the elapsed time.
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    /// Get the span for this timer.
    pub fn span(&self) -> &Span {
        &self.span
    }
}

impl Drop for OperationTimer {
    fn drop(&mut self) {
        let elapsed_ms = self.elapsed_ms();
        info!(
            target: "bravais_mesh::timing",
            operation = self.name,
            elapsed_ms = format!("{:.2}", elapsed_ms),
            "Operation completed"
        );
    }
}

/// Log mesh statistics at debug level.
pub fn log_mesh_stats(mesh: &Mesh, context: &str) {
    let (min_bounds, max_bounds) = mesh.bounds().unwrap_or_default();
    let dims = max_bounds - min_bounds;

    debug!(
        target: "bravais_mesh::mesh_state",
        context = context,
        nodes = mesh.node_count(),
        elements = mesh.element_count(),
        dimensions = format!("{:.3} x {:.3} x {:.3}", dims.x, dims.y, dims.z),
        "Mesh state"
    );

    trace!(
        target: "bravais_mesh::mesh_state",
        context = context,
        min = format!("{:.4?}", min_bounds.coords.as_slice()),
        max = format!("{:.4?}", max_bounds.coords.as_slice()),
        total_length = format!("{:.4}", mesh.total_length()),
        "Detailed mesh state"
    );
}

/// Log a validation result.
pub fn log_validation_result(report: &LatticeReport) {
    if report.is_valid() {
        info!(
            target: "bravais_mesh::validation",
            nodes = report.node_count,
            elements = report.element_count,
            coincident_elements = report.coincident_elements,
            "Lattice validation passed"
        );
    } else {
        warn!(
            target: "bravais_mesh::validation",
            duplicate_nodes = report.duplicate_nodes,
            invalid_elements = report.invalid_elements,
            degenerate_elements = report.degenerate_elements,
            "Lattice validation found issues"
        );
    }
}
