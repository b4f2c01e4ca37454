//! Serializable lattice generation configs.
//!
//! A [`GenerationConfig`] captures one full generation run so it can be stored
//! next to its results and replayed. Configs load from TOML or JSON:
//!
//! ```toml
//! name = "bcc-block"
//! family = "bcc"
//! angle_unit = "degrees"
//! num_elems = 2
//! grid = [4, 4, 4]
//! roll = 30.0
//!
//! [parameters]
//! a = 1.0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::builder::{GeneratedLattice, LatticeBuilder};
use crate::error::{LatticeError, LatticeResult};
use crate::lattice::{CellParameters, LatticeFamily};
use crate::tiling::GridDims;

/// Unit for the angles in a config.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AngleUnit {
    #[default]
    Radians,
    Degrees,
}

impl AngleUnit {
    /// Convert an angle in this unit to radians.
    pub fn to_radians(self, angle: f64) -> f64 {
        match self {
            AngleUnit::Radians => angle,
            AngleUnit::Degrees => angle.to_radians(),
        }
    }
}

fn default_num_elems() -> usize {
    1
}

fn default_grid() -> [usize; 3] {
    [1, 1, 1]
}

/// One lattice generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Name of this run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Lattice family.
    pub family: LatticeFamily,

    /// Unit of `alpha`, `beta`, `gamma` and `roll`.
    #[serde(default)]
    pub angle_unit: AngleUnit,

    /// Elements per basis strut.
    #[serde(default = "default_num_elems")]
    pub num_elems: usize,

    /// Cells along each lattice vector.
    #[serde(default = "default_grid")]
    pub grid: [usize; 3],

    /// Roll angle for major axes; axes are skipped when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roll: Option<f64>,

    /// Cell constants. Only the ones the family requires may be set.
    #[serde(default)]
    pub parameters: CellParameters,
}

impl GenerationConfig {
    /// Create a config with defaults for everything but family and constants.
    pub fn new(family: LatticeFamily, parameters: CellParameters) -> Self {
        Self {
            name: None,
            description: None,
            family,
            angle_unit: AngleUnit::Radians,
            num_elems: default_num_elems(),
            grid: default_grid(),
            roll: None,
            parameters,
        }
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> LatticeResult<Self> {
        toml::from_str(toml_str).map_err(|e| LatticeError::config_parse(None, e.to_string()))
    }

    /// Load configuration from a JSON string.
    pub fn from_json(json_str: &str) -> LatticeResult<Self> {
        serde_json::from_str(json_str).map_err(|e| LatticeError::config_parse(None, e.to_string()))
    }

    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> LatticeResult<Self> {
        let path = path.as_ref();
        let contents = read(path)?;
        toml::from_str(&contents)
            .map_err(|e| LatticeError::config_parse(Some(path.to_path_buf()), e.to_string()))
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> LatticeResult<Self> {
        let path = path.as_ref();
        let contents = read(path)?;
        serde_json::from_str(&contents)
            .map_err(|e| LatticeError::config_parse(Some(path.to_path_buf()), e.to_string()))
    }

    /// Load a `.json` file as JSON and anything else as TOML.
    pub fn load(path: impl AsRef<Path>) -> LatticeResult<Self> {
        let path = path.as_ref();
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_file(path)
        } else {
            Self::from_toml_file(path)
        }
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> LatticeResult<String> {
        toml::to_string_pretty(self).map_err(|e| LatticeError::config_parse(None, e.to_string()))
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> LatticeResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| LatticeError::config_parse(None, e.to_string()))
    }

    /// Save configuration to a TOML file.
    pub fn save_toml(&self, path: impl AsRef<Path>) -> LatticeResult<()> {
        write(path.as_ref(), self.to_toml()?)
    }

    /// Save configuration to a JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> LatticeResult<()> {
        write(path.as_ref(), self.to_json()?)
    }

    /// Cell constants with angles converted to radians.
    pub fn parameters_in_radians(&self) -> CellParameters {
        match self.angle_unit {
            AngleUnit::Radians => self.parameters,
            AngleUnit::Degrees => self.parameters.angles_from_degrees(),
        }
    }

    /// Translate into a builder.
    pub fn to_builder(&self) -> LatticeBuilder {
        let mut builder = LatticeBuilder::new(self.family)
            .parameters(self.parameters_in_radians())
            .num_elems(self.num_elems)
            .grid_dims(GridDims::from(self.grid));
        if let Some(roll) = self.roll {
            builder = builder.roll(self.angle_unit.to_radians(roll));
        }
        builder
    }

    /// Run the configured generation.
    pub fn run(&self) -> LatticeResult<GeneratedLattice> {
        info!(
            name = self.name.as_deref().unwrap_or("unnamed"),
            family = %self.family,
            "Running generation config"
        );
        self.to_builder().build()
    }
}

fn write(path: &Path, contents: String) -> LatticeResult<()> {
    debug!(path = %path.display(), "Writing config");
    std::fs::write(path, contents).map_err(|source| LatticeError::ConfigWrite {
        path: path.to_path_buf(),
        source,
    })
}

fn read(path: &Path) -> LatticeResult<String> {
    debug!(path = %path.display(), "Reading config");
    std::fs::read_to_string(path).map_err(|source| LatticeError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })
}
