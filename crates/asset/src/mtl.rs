//! Minimal MTL reader: material names plus diffuse and normal texture paths.
//!
//! Texture decoding is left to the renderer; only paths are resolved here.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use crate::error::{MeshError, MeshResult};
use crate::record::{read_line_lossy, strip_comment};

/// Name given to maps declared before any `newmtl`.
pub const DEFAULT_MATERIAL: &str = "default";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Material {
    pub name: String,
    /// `map_Kd`, joined onto the OBJ file's directory.
    pub diffuse_map: Option<PathBuf>,
    /// `map_Bump` / `bump` / `norm`, joined onto the OBJ file's directory.
    pub normal_map: Option<PathBuf>,
}

impl Material {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// One classified MTL line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MtlRecord {
    NewMaterial(String),
    DiffuseMap(String),
    NormalMap(String),
    Ignored,
}

pub fn classify_mtl(line: &str, line_no: usize) -> MeshResult<MtlRecord> {
    let mut parts = strip_comment(line).split_whitespace();
    let Some(keyword) = parts.next() else {
        return Ok(MtlRecord::Ignored);
    };

    let record = match keyword {
        "newmtl" => {
            let name = parts
                .next()
                .ok_or_else(|| MeshError::malformed(line_no, "newmtl without a name"))?;
            MtlRecord::NewMaterial(name.to_owned())
        }
        "map_Kd" => MtlRecord::DiffuseMap(map_path(parts, line_no, keyword)?),
        "map_Bump" | "map_bump" | "bump" | "norm" => {
            MtlRecord::NormalMap(map_path(parts, line_no, keyword)?)
        }
        _ => MtlRecord::Ignored,
    };

    Ok(record)
}

// Map statements may carry options (`-bm 0.5 normal.png`); the file is last.
fn map_path<'a>(
    parts: impl Iterator<Item = &'a str>,
    line_no: usize,
    keyword: &str,
) -> MeshResult<String> {
    parts
        .last()
        .map(str::to_owned)
        .ok_or_else(|| MeshError::malformed(line_no, format!("{} without a texture path", keyword)))
}

/// Parse an MTL stream; texture paths are joined onto `base_dir`.
pub fn parse_mtl<R: BufRead>(reader: R, base_dir: &Path) -> MeshResult<Vec<Material>> {
    parse_mtl_from(reader, base_dir, "<reader>")
}

/// Load an MTL file. Texture paths are joined onto `base_dir`, the directory
/// of the OBJ that named the library (not the library's own directory).
pub fn load_mtl_from_path(path: impl AsRef<Path>, base_dir: &Path) -> MeshResult<Vec<Material>> {
    let path = path.as_ref();
    let origin = path.display().to_string();
    let file = File::open(path).map_err(|source| MeshError::FileUnreadable {
        origin: origin.clone(),
        source,
    })?;
    let materials = parse_mtl_from(BufReader::new(file), base_dir, &origin)?;
    log::debug!("Loaded {} material(s) from {}", materials.len(), origin);
    Ok(materials)
}

fn parse_mtl_from<R: BufRead>(
    mut reader: R,
    base_dir: &Path,
    origin: &str,
) -> MeshResult<Vec<Material>> {
    let mut materials: Vec<Material> = Vec::new();
    let mut buf = Vec::new();
    let mut line_no = 0;

    loop {
        let line = match read_line_lossy(&mut reader, &mut buf) {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(source) => {
                return Err(MeshError::FileUnreadable {
                    origin: origin.to_owned(),
                    source,
                });
            }
        };
        line_no += 1;

        match classify_mtl(&line, line_no)? {
            MtlRecord::NewMaterial(name) => materials.push(Material::named(name)),
            MtlRecord::DiffuseMap(file) => {
                current(&mut materials).diffuse_map = Some(base_dir.join(file));
            }
            MtlRecord::NormalMap(file) => {
                current(&mut materials).normal_map = Some(base_dir.join(file));
            }
            MtlRecord::Ignored => {}
        }
    }

    Ok(materials)
}

fn current(materials: &mut Vec<Material>) -> &mut Material {
    if materials.is_empty() {
        materials.push(Material::named(DEFAULT_MATERIAL));
    }
    let last = materials.len() - 1;
    &mut materials[last]
}
