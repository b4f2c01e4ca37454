//! End-to-end integration tests for bravais-mesh.
//!
//! These tests exercise the full pipeline from lattice definition -> unit cell ->
//! tiling -> axes -> validation for every lattice family.

use approx::assert_relative_eq;
use bravais_mesh::{
    CellParameters, ErrorKind, GridDims, LatticeBuilder, LatticeError, LatticeFamily, Mesh,
    UnitCell, assign_major_axes, element_frames, tile, validate_mesh,
};
use nalgebra::Point3;

/// Cell constants valid for every family, restricted to the ones `family` accepts.
fn params_for(family: LatticeFamily) -> CellParameters {
    let mut cell = CellParameters::new();
    for name in family.required_parameters() {
        match *name {
            "a" => cell.a = Some(1.0),
            "b" => cell.b = Some(1.3),
            "c" => cell.c = Some(1.7),
            "alpha" => cell.alpha = Some(1.3),
            "beta" => cell.beta = Some(1.4),
            "gamma" => cell.gamma = Some(1.5),
            other => panic!("unknown parameter {}", other),
        }
    }
    cell
}

fn unit_cell(family: LatticeFamily, num_elems: usize) -> UnitCell {
    UnitCell::new(family, &params_for(family), num_elems).unwrap()
}

/// O(n²) minimum pairwise distance, for cross-checking on small meshes.
fn brute_force_min_distance(nodes: &[Point3<f64>]) -> f64 {
    let mut best = f64::INFINITY;
    for i in 0..nodes.len() {
        for j in (i + 1)..nodes.len() {
            best = best.min((nodes[i] - nodes[j]).norm());
        }
    }
    best
}

// =============================================================================
// Unit cells
// =============================================================================

#[test]
fn test_unit_cell_node_counts() {
    use LatticeFamily::*;
    let expected = [
        (SimpleCubic, 8),
        (Fcc, 14),
        (Bcc, 9),
        (Hexagonal, 8),
        (Rhombohedral, 8),
        (PrimitiveTetragonal, 8),
        (BodyCenteredTetragonal, 9),
        (PrimitiveOrthorhombic, 8),
        (BodyCenteredOrthorhombic, 9),
        (BaseCenteredOrthorhombic, 10),
        (FaceCenteredOrthorhombic, 14),
        (PrimitiveMonoclinic, 8),
        (BaseCenteredMonoclinic, 10),
        (Triclinic, 8),
    ];
    for (family, count) in expected {
        let cell = unit_cell(family, 1);
        assert_eq!(cell.mesh().node_count(), count, "{}", family);
        assert_eq!(
            cell.mesh().element_count(),
            family.basis_strut_count(),
            "{}",
            family
        );
    }
}

#[test]
fn test_element_count_scales_with_subdivision() {
    for family in LatticeFamily::ALL {
        for n in 1..=4 {
            let cell = unit_cell(family, n);
            assert_eq!(
                cell.mesh().element_count(),
                family.basis_strut_count() * n,
                "{} n={}",
                family,
                n
            );
            assert!(validate_mesh(cell.mesh()).is_valid(), "{} n={}", family, n);
        }
    }
}

#[test]
fn test_unit_cell_nodes_are_unique_and_sorted() {
    for family in LatticeFamily::ALL {
        let cell = unit_cell(family, 3);
        let nodes = cell.fractional_nodes();
        for pair in nodes.windows(2) {
            let (p, q) = (pair[0], pair[1]);
            assert!(
                (p.x, p.y, p.z) < (q.x, q.y, q.z),
                "{}: {:?} !< {:?}",
                family,
                p,
                q
            );
        }
    }
}

#[test]
fn test_cell_volume_matches_determinant() {
    for family in LatticeFamily::ALL {
        let cell = unit_cell(family, 1);
        let t = cell.transform();
        assert_relative_eq!(t.matrix().determinant(), t.cell_volume(), epsilon = 1e-12);
    }
}

// =============================================================================
// Tiling
// =============================================================================

#[test]
fn test_unit_grid_reproduces_unit_cell() {
    for family in LatticeFamily::ALL {
        let cell = unit_cell(family, 2);
        let mesh = tile(&cell, GridDims::unit()).unwrap();
        assert_eq!(&mesh, cell.mesh(), "{}", family);
    }
}

#[test]
fn test_simple_cubic_2x2x2_spacing() {
    let cell = UnitCell::new(
        LatticeFamily::SimpleCubic,
        &CellParameters::new().with_a(1.0),
        1,
    )
    .unwrap();
    let mesh = tile(&cell, GridDims::new(2, 2, 2)).unwrap();

    assert_eq!(mesh.node_count(), 27);
    let report = validate_mesh(&mesh);
    assert_eq!(report.duplicate_nodes, 0);
    assert_eq!(brute_force_min_distance(mesh.nodes()), 1.0);
    assert_eq!(report.min_node_spacing, Some(1.0));
}

#[test]
fn test_tiled_site_counts() {
    let cases = [
        // corners only
        (LatticeFamily::Hexagonal, [3, 2, 2], 4 * 3 * 3),
        // corners + one body center per cell
        (LatticeFamily::Bcc, [3, 2, 1], 4 * 3 * 2 + 6),
        // corners + centers on every c-face plane
        (LatticeFamily::BaseCenteredOrthorhombic, [2, 2, 2], 27 + 3 * 4),
        // corners + face centers on all three plane families
        (LatticeFamily::Fcc, [2, 2, 2], 27 + 3 * 12),
    ];
    for (family, [x, y, z], sites) in cases {
        let mesh = tile(&unit_cell(family, 1), GridDims::new(x, y, z)).unwrap();
        assert_eq!(mesh.node_count(), sites, "{}", family);
        assert_eq!(
            mesh.element_count(),
            x * y * z * family.basis_strut_count(),
            "{}",
            family
        );
    }
}

#[test]
fn test_tiling_has_no_near_duplicates() {
    for family in LatticeFamily::ALL {
        let cell = unit_cell(family, 2);
        let mesh = tile(&cell, GridDims::new(2, 2, 2)).unwrap();
        let report = validate_mesh(&mesh);
        assert!(report.is_valid(), "{}:\n{}", family, report);

        let min = brute_force_min_distance(mesh.nodes());
        assert!(min > 1e-6, "{}: nodes only {} apart", family, min);
        assert_relative_eq!(report.min_node_spacing.unwrap(), min, epsilon = 1e-12);
    }
}

#[test]
fn test_tiling_is_deterministic() {
    let cell = unit_cell(LatticeFamily::Triclinic, 3);
    let a = tile(&cell, GridDims::new(3, 2, 2)).unwrap();
    let b = tile(&cell, GridDims::new(3, 2, 2)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_tiled_bounds() {
    let cell = UnitCell::new(
        LatticeFamily::PrimitiveOrthorhombic,
        &CellParameters::new().with_a(1.0).with_b(2.0).with_c(3.0),
        1,
    )
    .unwrap();
    let mesh = tile(&cell, GridDims::new(4, 3, 2)).unwrap();
    let (min, max) = mesh.bounds().unwrap();
    assert_eq!(min, Point3::origin());
    assert_eq!(max, Point3::new(4.0, 6.0, 6.0));
}

// =============================================================================
// Axes
// =============================================================================

#[test]
fn test_axes_for_tiled_mesh() {
    let cell = unit_cell(LatticeFamily::Triclinic, 2);
    let mesh = tile(&cell, GridDims::new(2, 2, 1)).unwrap();
    let frames = element_frames(&mesh, 0.4).unwrap();
    assert_eq!(frames.len(), mesh.element_count());

    for (i, frame) in frames.iter().enumerate() {
        let dir = mesh.element_vector(i).unwrap().normalize();
        assert_relative_eq!(frame.bond_axis(), dir, epsilon = 1e-12);
        assert_relative_eq!(frame.major_axis().dot(&dir), 0.0, epsilon = 1e-12);
    }

    let axes = assign_major_axes(&mesh, 0.4).unwrap();
    for (axis, frame) in axes.iter().zip(&frames) {
        assert_eq!(*axis, frame.major_axis());
    }
}

#[test]
fn test_axes_reject_zero_length_element() {
    let mesh = Mesh::from_parts(
        vec![Point3::new(1.0, 1.0, 1.0), Point3::new(1.0, 1.0, 1.0)],
        vec![[0, 1]],
    )
    .unwrap();
    let err = assign_major_axes(&mesh, 0.0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DegenerateElement);
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn test_degenerate_triclinic_cell() {
    let err = LatticeBuilder::new(LatticeFamily::Triclinic)
        .a(1.0)
        .b(1.0)
        .c(1.0)
        .alpha(2.8)
        .beta(0.5)
        .gamma(0.5)
        .build()
        .unwrap_err();
    assert!(matches!(err, LatticeError::DegenerateCell { .. }));
    assert_eq!(err.kind(), ErrorKind::InvalidParameters);
    assert_eq!(err.code().as_str(), "LATTICE-1004");
}

#[test]
fn test_lengths_below_snapping_tolerance_rejected() {
    let err = UnitCell::new(
        LatticeFamily::SimpleCubic,
        &CellParameters::new().with_a(1e-16),
        1,
    )
    .unwrap_err();
    assert!(matches!(err, LatticeError::CollapsedCell { .. }));
    assert_eq!(err.kind(), ErrorKind::InvalidParameters);
    assert_eq!(err.code().as_str(), "LATTICE-1007");

    let err = LatticeBuilder::new(LatticeFamily::PrimitiveOrthorhombic)
        .a(1.0)
        .b(1.0)
        .c(5e-16)
        .grid(2, 2, 2)
        .build()
        .unwrap_err();
    assert!(matches!(err, LatticeError::CollapsedCell { .. }));
}

#[test]
fn test_rounding_collapse_reported_as_degenerate_element() {
    // c·cos(beta) ~ 5.4e16 swallows a = 1 in the x component, so the cube
    // edges along a on the top face shrink to zero length.
    let err = UnitCell::new(
        LatticeFamily::PrimitiveMonoclinic,
        &CellParameters::new()
            .with_a(1.0)
            .with_b(1.0)
            .with_c(1e17)
            .with_beta(1.0),
        1,
    )
    .unwrap_err();
    assert!(matches!(err, LatticeError::DegenerateElement { .. }));
    assert_eq!(err.kind(), ErrorKind::DegenerateElement);
    assert!(err.location().is_some());
}

#[test]
fn test_missing_and_unexpected_parameters() {
    let err = UnitCell::new(
        LatticeFamily::PrimitiveTetragonal,
        &CellParameters::new().with_a(1.0),
        1,
    )
    .unwrap_err();
    assert!(matches!(err, LatticeError::MissingParameter { name: "c", .. }));

    let err = UnitCell::new(
        LatticeFamily::Rhombohedral,
        &CellParameters::new().with_a(1.0).with_alpha(1.0).with_beta(1.0),
        1,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        LatticeError::UnexpectedParameter { name: "beta", .. }
    ));
}
