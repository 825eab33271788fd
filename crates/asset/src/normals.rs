//! Smooth vertex normals for sources without any `vn` records.

use corelib::{Vec3, geometry::face_normal};

use crate::mesh::Vertex;

/// Area-independent average of adjacent face normals.
///
/// Every existing normal is overwritten. Zero-area triangles contribute
/// nothing and a vertex with no usable neighbour keeps a zero normal.
/// Returns the number of zero-area triangles.
///
/// `indices` must reference `vertices` (guaranteed by the indexer).
pub fn synthesize_normals(vertices: &mut [Vertex], indices: &[u32]) -> usize {
    let mut sums = vec![Vec3::ZERO; vertices.len()];
    let mut degenerate = 0;

    for tri in indices.chunks_exact(3) {
        let corners = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let [p0, p1, p2] = corners.map(|i| Vec3::from(vertices[i].position));
        let normal = face_normal(p0, p1, p2);
        if normal == Vec3::ZERO {
            degenerate += 1;
            continue;
        }
        for i in corners {
            sums[i] += normal;
        }
    }

    for (vertex, sum) in vertices.iter_mut().zip(sums) {
        vertex.normal = sum.normalize_or_zero().to_array();
    }

    degenerate
}
