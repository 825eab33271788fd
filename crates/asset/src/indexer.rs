//! Corner deduplication: one [`Vertex`] per distinct [`CornerKey`], slots
//! assigned in first-seen order.

use std::collections::HashMap;

use corelib::{Vec2, Vec3};

use crate::error::{MeshError, MeshResult};
use crate::face::CornerKey;
use crate::mesh::Vertex;
use crate::pools::AttributePools;
use crate::triangulate::{fan, triangle_count};

#[derive(Debug, Default)]
pub struct VertexIndexer {
    slots: HashMap<CornerKey, u32>,
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl VertexIndexer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot of `key`, materializing a new vertex on first sight.
    pub fn resolve(
        &mut self,
        key: CornerKey,
        pools: &AttributePools,
        line: usize,
    ) -> MeshResult<u32> {
        if let Some(&slot) = self.slots.get(&key) {
            return Ok(slot);
        }
        let vertex = materialize(key, pools, line)?;
        self.insert(key, vertex)
    }

    /// Resolve every corner of a face and append its fan triangles.
    /// Returns the number of triangles emitted.
    ///
    /// All-or-nothing: every new corner is looked up before any vertex is
    /// added, so a failing face leaves the indexer untouched.
    pub fn push_face(
        &mut self,
        corners: &[CornerKey],
        pools: &AttributePools,
        line: usize,
    ) -> MeshResult<usize> {
        let base = self.vertices.len();
        let mut pending: Vec<(CornerKey, Vertex)> = Vec::new();
        let mut face = Vec::with_capacity(corners.len());
        for &key in corners {
            let slot = match self.slots.get(&key) {
                Some(&slot) => slot as usize,
                None => match pending.iter().position(|(k, _)| *k == key) {
                    Some(i) => base + i,
                    None => {
                        pending.push((key, materialize(key, pools, line)?));
                        base + pending.len() - 1
                    }
                },
            };
            face.push(u32::try_from(slot).map_err(|_| MeshError::TooManyVertices)?);
        }

        for (key, vertex) in pending {
            self.insert(key, vertex)?;
        }

        let triangles = triangle_count(face.len());
        self.indices.reserve(triangles * 3);
        self.indices.extend(fan(&face).flatten());
        Ok(triangles)
    }

    fn insert(&mut self, key: CornerKey, vertex: Vertex) -> MeshResult<u32> {
        let slot = u32::try_from(self.vertices.len()).map_err(|_| MeshError::TooManyVertices)?;
        self.vertices.push(vertex);
        self.slots.insert(key, slot);
        Ok(slot)
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn finish(self) -> (Vec<Vertex>, Vec<u32>) {
        (self.vertices, self.indices)
    }
}

/// Texcoord defaults to `(0, 0)` and normal to `(0, 0, 0)` when the corner
/// omits them.
fn materialize(key: CornerKey, pools: &AttributePools, line: usize) -> MeshResult<Vertex> {
    let position = pools.position(key.position).map_err(|e| e.at_line(line))?;
    let texcoord = match key.texcoord {
        Some(i) => pools.texcoord(i).map_err(|e| e.at_line(line))?,
        None => Vec2::ZERO,
    };
    let normal = match key.normal {
        Some(i) => pools.normal(i).map_err(|e| e.at_line(line))?,
        None => Vec3::ZERO,
    };
    Ok(Vertex::new(
        position.to_array(),
        texcoord.to_array(),
        normal.to_array(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AttributeKind;

    fn pools() -> AttributePools {
        let mut pools = AttributePools::new();
        pools.append_position(Vec3::ZERO);
        pools.append_position(Vec3::X);
        pools.append_position(Vec3::Y);
        pools.append_position(Vec3::ONE);
        pools.append_texcoord(Vec2::new(0.25, 0.75));
        pools.append_normal(Vec3::Z);
        pools
    }

    fn key(position: usize, texcoord: Option<usize>, normal: Option<usize>) -> CornerKey {
        CornerKey {
            position,
            texcoord,
            normal,
        }
    }

    #[test]
    fn identical_keys_share_a_slot() {
        let pools = pools();
        let mut indexer = VertexIndexer::new();
        let a = indexer.resolve(key(1, Some(0), Some(0)), &pools, 1).unwrap();
        let b = indexer.resolve(key(2, Some(0), Some(0)), &pools, 1).unwrap();
        let again = indexer.resolve(key(1, Some(0), Some(0)), &pools, 2).unwrap();
        assert_eq!((a, b, again), (0, 1, 0));
        assert_eq!(indexer.vertex_count(), 2);
    }

    #[test]
    fn keys_differing_in_one_component_stay_distinct() {
        let pools = pools();
        let mut indexer = VertexIndexer::new();
        let slots: Vec<u32> = [
            key(0, None, None),
            key(0, Some(0), None),
            key(0, None, Some(0)),
            key(0, Some(0), Some(0)),
        ]
        .into_iter()
        .map(|k| indexer.resolve(k, &pools, 1).unwrap())
        .collect();
        assert_eq!(slots, vec![0, 1, 2, 3]);
    }

    #[test]
    fn omitted_attributes_use_defaults() {
        let pools = pools();
        let mut indexer = VertexIndexer::new();
        indexer.resolve(key(3, None, None), &pools, 1).unwrap();
        indexer.resolve(key(1, Some(0), Some(0)), &pools, 1).unwrap();
        let (vertices, _) = indexer.finish();
        assert_eq!(vertices[0].position, [1.0, 1.0, 1.0]);
        assert_eq!(vertices[0].texcoord, [0.0, 0.0]);
        assert_eq!(vertices[0].normal, [0.0, 0.0, 0.0]);
        assert_eq!(vertices[1].texcoord, [0.25, 0.75]);
        assert_eq!(vertices[1].normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn undeclared_attribute_is_index_out_of_range() {
        let pools = pools();
        let mut indexer = VertexIndexer::new();
        let err = indexer.resolve(key(0, Some(1), None), &pools, 11).unwrap_err();
        assert!(matches!(
            err,
            MeshError::IndexOutOfRange {
                line: 11,
                attribute: AttributeKind::Texcoord,
                index: 2,
                len: 1,
            }
        ));
        assert_eq!(indexer.vertex_count(), 0);
    }

    #[test]
    fn quad_face_is_fanned() {
        let pools = pools();
        let mut indexer = VertexIndexer::new();
        let quad = [
            key(0, None, None),
            key(1, None, None),
            key(3, None, None),
            key(2, None, None),
        ];
        assert_eq!(indexer.push_face(&quad, &pools, 1).unwrap(), 2);
        assert_eq!(indexer.index_count(), 6);
        let (_, indices) = indexer.finish();
        assert_eq!(indices, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn failing_face_adds_no_vertices() {
        let pools = pools();
        let mut indexer = VertexIndexer::new();
        let triangle = [key(0, None, None), key(1, None, None), key(2, None, None)];
        indexer.push_face(&triangle, &pools, 1).unwrap();

        // Two new corners resolve, the last one does not.
        let face = [key(3, None, None), key(0, Some(0), None), key(9, None, None)];
        let err = indexer.push_face(&face, &pools, 2).unwrap_err();
        assert!(matches!(
            err,
            MeshError::IndexOutOfRange {
                line: 2,
                attribute: AttributeKind::Position,
                index: 10,
                ..
            }
        ));
        assert_eq!(indexer.vertex_count(), 3);
        assert_eq!(indexer.index_count(), 3);

        // Corners that resolved before the failure were never assigned.
        let slot = indexer.resolve(key(3, None, None), &pools, 4).unwrap();
        assert_eq!(slot, 3);
    }

    #[test]
    fn repeated_new_corner_in_one_face_gets_one_slot() {
        let pools = pools();
        let mut indexer = VertexIndexer::new();
        let face = [key(0, None, None), key(1, None, None), key(0, None, None)];
        indexer.push_face(&face, &pools, 1).unwrap();
        assert_eq!(indexer.vertex_count(), 2);
        let (_, indices) = indexer.finish();
        assert_eq!(indices, vec![0, 1, 0]);
    }
}
