//! OBJ loader: scan records, fill pools, dedup + fan faces, then derive
//! normals (when absent) and the tangent frame.

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use crate::error::{MeshError, MeshResult};
use crate::face::decode_face;
use crate::indexer::VertexIndexer;
use crate::mesh::IndexedMesh;
use crate::mtl::{Material, load_mtl_from_path};
use crate::normals::synthesize_normals;
use crate::options::LoadOptions;
use crate::pools::AttributePools;
use crate::record::{Record, RecordScanner, ScannedRecord};
use crate::tangents::compute_tangent_space;

/// A loaded mesh plus the material references found next to it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjModel {
    pub mesh: IndexedMesh,
    /// `mtllib` names in declaration order.
    pub material_libraries: Vec<String>,
    /// `usemtl` names in first-use order, without repeats.
    pub material_uses: Vec<String>,
    /// Materials read from the libraries (path loads with
    /// `resolve_materials` only).
    pub materials: Vec<Material>,
}

/// Everything a single load owns while it runs. Dropped (with any partial
/// geometry) if the load fails.
///
/// Once an `ingest` call fails the context is poisoned: later records and
/// [`IngestContext::finish`] are rejected.
#[derive(Debug, Default)]
pub struct IngestContext {
    options: LoadOptions,
    pools: AttributePools,
    indexer: VertexIndexer,
    material_libraries: Vec<String>,
    material_uses: Vec<String>,
    faces: usize,
    failed_at: Option<usize>,
}

impl IngestContext {
    pub fn new(options: LoadOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Feed one scanned record through the pipeline.
    pub fn ingest(&mut self, scanned: ScannedRecord) -> MeshResult<()> {
        self.check_not_failed()?;
        let line = scanned.line;
        let result = self.apply(scanned);
        if result.is_err() {
            self.failed_at = Some(line);
        }
        result
    }

    fn check_not_failed(&self) -> MeshResult<()> {
        match self.failed_at {
            Some(line) => Err(MeshError::InvalidMesh {
                reason: format!("ingestion already failed at line {}", line),
            }),
            None => Ok(()),
        }
    }

    fn apply(&mut self, scanned: ScannedRecord) -> MeshResult<()> {
        let ScannedRecord { line, record } = scanned;
        match record {
            Record::Position(position) => {
                self.pools.append_position(position);
            }
            Record::Texcoord(mut uv) => {
                if self.options.flip_v {
                    uv.y = 1.0 - uv.y;
                }
                self.pools.append_texcoord(uv);
            }
            Record::Normal(normal) => {
                self.pools.append_normal(normal);
            }
            Record::Face(tokens) => {
                let corners = decode_face(tokens.as_slice(), self.pools.counts(), line)?;
                self.indexer.push_face(&corners, &self.pools, line)?;
                self.faces += 1;
            }
            Record::MaterialLib(names) => self.material_libraries.extend(names),
            Record::MaterialUse(name) => {
                if !self.material_uses.contains(&name) {
                    self.material_uses.push(name);
                }
            }
            Record::Ignored => {}
        }
        Ok(())
    }

    pub fn pools(&self) -> &AttributePools {
        &self.pools
    }

    /// Number of `f` records ingested so far.
    pub fn face_count(&self) -> usize {
        self.faces
    }

    /// Run the post-passes and freeze the mesh.
    pub fn finish(self) -> MeshResult<ObjModel> {
        self.check_not_failed()?;
        let counts = self.pools.counts();
        let (mut vertices, indices) = self.indexer.finish();

        if indices.is_empty() {
            log::warn!("OBJ contained no faces ({} positions declared)", counts.positions);
        }

        if counts.normals == 0 && self.options.synthesize_normals && !indices.is_empty() {
            let degenerate = synthesize_normals(&mut vertices, &indices);
            log::debug!(
                "Synthesized normals for {} vertices ({} zero-area triangles)",
                vertices.len(),
                degenerate
            );
        }

        let report = compute_tangent_space(&mut vertices, &indices, self.options.degenerate_uv)?;
        if report.skipped > 0 {
            log::debug!(
                "Tangent frame: skipped {} of {} triangles with degenerate UVs",
                report.skipped,
                report.triangles
            );
        }

        let mesh = IndexedMesh::new(vertices, indices)?;
        log::debug!(
            "Ingested {} faces -> {} vertices, {} triangles",
            self.faces,
            mesh.vertex_count(),
            mesh.triangle_count()
        );

        Ok(ObjModel {
            mesh,
            material_libraries: self.material_libraries,
            material_uses: self.material_uses,
            materials: Vec::new(),
        })
    }
}

/// Load an OBJ mesh from a file path. Material libraries are not followed.
pub fn load_obj_from_path(path: impl AsRef<Path>) -> MeshResult<IndexedMesh> {
    let options = LoadOptions {
        resolve_materials: false,
        ..LoadOptions::default()
    };
    load_obj_model_from_path(path, &options).map(|model| model.mesh)
}

/// Load an OBJ mesh from a [`BufRead`] implementation.
pub fn load_obj_from_reader<R: BufRead>(reader: R) -> MeshResult<IndexedMesh> {
    load_obj_with_options(reader, &LoadOptions::default())
}

/// Convenience helper to parse an OBJ string literal.
pub fn load_obj_from_str(contents: &str) -> MeshResult<IndexedMesh> {
    load_obj_from_reader(io::Cursor::new(contents))
}

pub fn load_obj_with_options<R: BufRead>(
    reader: R,
    options: &LoadOptions,
) -> MeshResult<IndexedMesh> {
    ingest(RecordScanner::new(reader), options).map(|model| model.mesh)
}

/// Load an OBJ file and, if enabled, the materials its `mtllib` lines name.
///
/// A missing or unreadable material library is logged and skipped; it never
/// fails the mesh load.
pub fn load_obj_model_from_path(
    path: impl AsRef<Path>,
    options: &LoadOptions,
) -> MeshResult<ObjModel> {
    let path = path.as_ref();
    let origin = path.display().to_string();
    let file = File::open(path).map_err(|source| MeshError::FileUnreadable {
        origin: origin.clone(),
        source,
    })?;

    let mut model = ingest(RecordScanner::with_origin(BufReader::new(file), origin), options)?;

    if options.resolve_materials {
        let dir = path.parent().unwrap_or_else(|| Path::new(""));
        model.materials = resolve_materials(dir, &model.material_libraries);
    }

    log::info!(
        "Loaded OBJ {}: {} vertices, {} triangles, {} material(s)",
        path.display(),
        model.mesh.vertex_count(),
        model.mesh.triangle_count(),
        model.materials.len()
    );
    Ok(model)
}

fn ingest<R: BufRead>(scanner: RecordScanner<R>, options: &LoadOptions) -> MeshResult<ObjModel> {
    let mut context = IngestContext::new(options.clone());
    for record in scanner {
        context.ingest(record?)?;
    }
    context.finish()
}

fn resolve_materials(dir: &Path, libraries: &[String]) -> Vec<Material> {
    let mut materials = Vec::new();
    for name in libraries {
        match load_mtl_from_path(dir.join(name), dir) {
            Ok(mut found) => materials.append(&mut found),
            Err(err) => log::warn!("Skipping material library '{}': {}", name, err),
        }
    }
    materials
}
