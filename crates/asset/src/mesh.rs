//! CPU-side mesh representation produced by the OBJ pipeline.

use bytemuck::{Pod, Zeroable};

use crate::error::{MeshError, MeshResult};

/// Merged vertex: one per distinct corner key. Values are in object space.
///
/// Layout is `#[repr(C)]`, 14 x f32 with no padding, so a vertex slice can be
/// uploaded as-is.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub texcoord: [f32; 2],
    pub normal: [f32; 3],
    pub tangent: [f32; 3],
    pub bitangent: [f32; 3],
}

impl Vertex {
    /// Tangent frame starts at zero; it is accumulated after indexing.
    pub fn new(position: [f32; 3], texcoord: [f32; 2], normal: [f32; 3]) -> Self {
        Self {
            position,
            texcoord,
            normal,
            tangent: [0.0; 3],
            bitangent: [0.0; 3],
        }
    }
}

/// Indexed triangle mesh with tightly-packed, deduplicated vertices.
///
/// Always satisfies `indices.len() % 3 == 0` and `index < vertices.len()`.
/// There is no mutating API: once built, the mesh is frozen.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IndexedMesh {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl IndexedMesh {
    /// Build a mesh, rejecting index lists that break the invariants.
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> MeshResult<Self> {
        let mesh = Self { vertices, indices };
        mesh.validate()?;
        Ok(mesh)
    }

    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Returns `true` if the mesh has no triangles.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterate triangles as vertex-slot triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Vertex buffer contents for GPU upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index buffer contents (u32) for GPU upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    pub fn into_parts(self) -> (Vec<Vertex>, Vec<u32>) {
        (self.vertices, self.indices)
    }

    /// Check the index-list invariants.
    pub fn validate(&self) -> MeshResult<()> {
        if self.indices.len() % 3 != 0 {
            return Err(MeshError::InvalidMesh {
                reason: format!(
                    "index count {} is not a multiple of 3",
                    self.indices.len()
                ),
            });
        }

        let vertex_count = self.vertices.len();
        if let Some((at, &index)) = self
            .indices
            .iter()
            .enumerate()
            .find(|&(_, &index)| index as usize >= vertex_count)
        {
            return Err(MeshError::InvalidMesh {
                reason: format!(
                    "index {} at position {} exceeds vertex count {}",
                    index, at, vertex_count
                ),
            });
        }

        Ok(())
    }
}
