//! Load options, optionally read from a TOML file.
//!
//! ```toml
//! synthesize_normals = true
//! flip_v = false
//! degenerate_uv = "skip"   # or "fail"
//! resolve_materials = true
//! ```

use std::{fmt, io, path::Path, str::FromStr};

use serde::Deserialize;
use thiserror::Error;

/// What the tangent pass does with a triangle whose UV deltas are collinear
/// (zero determinant, e.g. a mesh without texture coordinates).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DegenerateUvPolicy {
    /// The triangle contributes nothing to its vertices' tangent frames.
    #[default]
    Skip,
    /// The load fails with `MeshError::DegenerateTexcoords`.
    Fail,
}

impl FromStr for DegenerateUvPolicy {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "skip" => Ok(DegenerateUvPolicy::Skip),
            "fail" => Ok(DegenerateUvPolicy::Fail),
            other => Err(OptionsError::InvalidValue {
                field: "degenerate_uv",
                value: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for DegenerateUvPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DegenerateUvPolicy::Skip => "skip",
            DegenerateUvPolicy::Fail => "fail",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadOptions {
    /// Compute smooth normals when the source has no `vn` records.
    pub synthesize_normals: bool,
    /// Store `1 - v` for every texcoord (top-left texture origin).
    pub flip_v: bool,
    pub degenerate_uv: DegenerateUvPolicy,
    /// Follow `mtllib` references next to the OBJ file (path loads only).
    pub resolve_materials: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            synthesize_normals: true,
            flip_v: false,
            degenerate_uv: DegenerateUvPolicy::Skip,
            resolve_materials: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("cannot read options file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("cannot parse load options: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value '{value}' for {field}")]
    InvalidValue { field: &'static str, value: String },
}

impl LoadOptions {
    pub fn from_toml_str(contents: &str) -> Result<Self, OptionsError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, OptionsError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| OptionsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let options = Self::from_toml_str(&contents)?;
        log::debug!("Load options from {}: {:?}", path.display(), options);
        Ok(options)
    }
}
