//! Per-vertex tangent space (tangent + bitangent) from positions and UVs.

use corelib::{Vec2, Vec3, geometry::triangle_tangents};

use crate::error::{MeshError, MeshResult};
use crate::mesh::Vertex;
use crate::options::DegenerateUvPolicy;

/// Outcome of a tangent pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TangentReport {
    pub triangles: usize,
    /// Triangles with a degenerate UV determinant (only with `Skip`).
    pub skipped: usize,
}

/// Accumulate per-triangle tangents/bitangents over all triangles, then
/// normalize each vertex once.
///
/// Vertices touched only by skipped triangles keep a zero frame. With
/// [`DegenerateUvPolicy::Fail`] the first degenerate triangle aborts the pass
/// before any vertex is written.
pub fn compute_tangent_space(
    vertices: &mut [Vertex],
    indices: &[u32],
    policy: DegenerateUvPolicy,
) -> MeshResult<TangentReport> {
    let mut tangents = vec![Vec3::ZERO; vertices.len()];
    let mut bitangents = vec![Vec3::ZERO; vertices.len()];
    let mut report = TangentReport::default();

    for (triangle, tri) in indices.chunks_exact(3).enumerate() {
        report.triangles += 1;
        let corners = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let positions = corners.map(|i| Vec3::from(vertices[i].position));
        let uvs = corners.map(|i| Vec2::from(vertices[i].texcoord));

        match triangle_tangents(positions, uvs) {
            Some(pair) => {
                for i in corners {
                    tangents[i] += pair.tangent;
                    bitangents[i] += pair.bitangent;
                }
            }
            None => match policy {
                DegenerateUvPolicy::Skip => report.skipped += 1,
                DegenerateUvPolicy::Fail => {
                    return Err(MeshError::DegenerateTexcoords { triangle });
                }
            },
        }
    }

    for ((vertex, tangent), bitangent) in vertices.iter_mut().zip(tangents).zip(bitangents) {
        vertex.tangent = tangent.normalize_or_zero().to_array();
        vertex.bitangent = bitangent.normalize_or_zero().to_array();
    }

    Ok(report)
}
