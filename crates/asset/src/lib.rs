//! Asset loading: OBJ meshes into deduplicated, indexed, tangent-space
//! vertex buffers.
//!
//! Pipeline (one synchronous pass per load):
//! record scan -> attribute pools / face decode -> dedup + fan triangulation
//! -> normal synthesis (only without `vn`) -> tangent frame -> [`IndexedMesh`].

pub mod error;
pub mod face;
pub mod indexer;
pub mod mesh;
pub mod mtl;
pub mod normals;
pub mod obj;
pub mod options;
pub mod pools;
pub mod record;
pub mod tangents;
pub mod triangulate;

pub use error::{AttributeKind, MeshError, MeshResult};
pub use mesh::{IndexedMesh, Vertex};
pub use mtl::Material;
pub use obj::{
    IngestContext, ObjModel, load_obj_from_path, load_obj_from_reader, load_obj_from_str,
    load_obj_model_from_path, load_obj_with_options,
};
pub use options::{DegenerateUvPolicy, LoadOptions, OptionsError};
