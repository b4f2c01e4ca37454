//! Generation config file round-trips.

use bravais_mesh::{
    AngleUnit, CellParameters, ErrorKind, GenerationConfig, LatticeError, LatticeFamily,
};
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

const FCC_TOML: &str = r#"
name = "fcc-block"
description = "2x2x2 FCC block, two elements per strut"
family = "fcc"
num_elems = 2
grid = [2, 2, 2]
roll = 45.0
angle_unit = "degrees"

[parameters]
a = 1.5
"#;

#[test]
fn test_load_toml_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(FCC_TOML.as_bytes()).unwrap();

    let config = GenerationConfig::from_toml_file(file.path()).unwrap();
    assert_eq!(config.name.as_deref(), Some("fcc-block"));
    assert_eq!(config.family, LatticeFamily::Fcc);
    assert_eq!(config.angle_unit, AngleUnit::Degrees);
    assert_eq!(config.grid, [2, 2, 2]);

    let lattice = config.run().unwrap();
    assert_eq!(lattice.unit_cell.mesh().element_count(), 36 * 2);
    assert_eq!(lattice.mesh.element_count(), 8 * 36 * 2);
    assert_eq!(
        lattice.major_axes.as_ref().map(Vec::len),
        Some(lattice.mesh.element_count())
    );
    assert!(lattice.report().is_valid());
}

#[test]
fn test_load_dispatches_on_extension() {
    let dir = TempDir::new().unwrap();
    let config = GenerationConfig::new(
        LatticeFamily::BaseCenteredMonoclinic,
        CellParameters::new()
            .with_a(1.0)
            .with_b(1.2)
            .with_c(1.4)
            .with_beta(1.8),
    );

    let json_path = dir.path().join("mono.json");
    std::fs::write(&json_path, config.to_json().unwrap()).unwrap();
    assert_eq!(GenerationConfig::load(&json_path).unwrap(), config);

    let saved_json = dir.path().join("saved.json");
    config.save_json(&saved_json).unwrap();
    assert_eq!(GenerationConfig::load(&saved_json).unwrap(), config);

    let toml_path = dir.path().join("mono.toml");
    config.save_toml(&toml_path).unwrap();
    assert_eq!(GenerationConfig::load(&toml_path).unwrap(), config);
}

#[test]
fn test_toml_roundtrip_keeps_optional_fields() {
    let original = GenerationConfig::from_toml(FCC_TOML).unwrap();
    let text = original.to_toml().unwrap();
    let reparsed = GenerationConfig::from_toml(&text).unwrap();
    assert_eq!(original, reparsed);
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = GenerationConfig::from_toml_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, LatticeError::ConfigRead { .. }));
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert!(err.location().is_some());
}

#[test]
fn test_write_failure_is_reported_as_write() {
    let dir = TempDir::new().unwrap();
    let config = GenerationConfig::new(
        LatticeFamily::SimpleCubic,
        CellParameters::new().with_a(1.0),
    );
    let target = dir.path().join("missing").join("cubic.toml");

    let err = config.save_toml(&target).unwrap_err();
    assert!(matches!(err, LatticeError::ConfigWrite { .. }));
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert_eq!(err.code().as_str(), "LATTICE-4003");
    assert!(err.to_string().contains("write"));

    let err = config.save_json(target.with_extension("json")).unwrap_err();
    assert!(matches!(err, LatticeError::ConfigWrite { .. }));
}

#[test]
fn test_parse_error_has_path() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"family = 3").unwrap();

    let err = GenerationConfig::from_toml_file(file.path()).unwrap_err();
    match err {
        LatticeError::ConfigParse { path, .. } => {
            assert_eq!(path.as_deref(), Some(file.path()));
        }
        other => panic!("Expected ConfigParse, got {:?}", other),
    }
}

#[test]
fn test_parameters_checked_on_run() {
    let config = GenerationConfig::from_toml(
        r#"
        family = "simple_cubic"
        [parameters]
        a = 1.0
        c = 2.0
        "#,
    )
    .unwrap();
    let err = config.run().unwrap_err();
    assert!(matches!(
        err,
        LatticeError::UnexpectedParameter { name: "c", .. }
    ));
}
