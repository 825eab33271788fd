//! Append-only attribute pools filled while scanning (`v`, `vt`, `vn`).

use corelib::{Vec2, Vec3};

use crate::error::{AttributeKind, MeshError};

/// Raw attributes in declaration order, 0-based.
#[derive(Clone, Debug, Default)]
pub struct AttributePools {
    positions: Vec<Vec3>,
    texcoords: Vec<Vec2>,
    normals: Vec<Vec3>,
}

/// Snapshot of the pool lengths at some point of the scan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolCounts {
    pub positions: usize,
    pub texcoords: usize,
    pub normals: usize,
}

impl PoolCounts {
    pub fn of(self, kind: AttributeKind) -> usize {
        match kind {
            AttributeKind::Position => self.positions,
            AttributeKind::Texcoord => self.texcoords,
            AttributeKind::Normal => self.normals,
        }
    }
}

/// Lookup past the end of a pool. Converted to
/// [`MeshError::IndexOutOfRange`] once the source line is known.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutOfRange {
    pub attribute: AttributeKind,
    pub index: usize,
    pub len: usize,
}

impl OutOfRange {
    pub fn at_line(self, line: usize) -> MeshError {
        MeshError::IndexOutOfRange {
            line,
            attribute: self.attribute,
            index: self.index as i64 + 1,
            len: self.len,
        }
    }
}

impl AttributePools {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the slot assigned to the new position.
    pub fn append_position(&mut self, position: Vec3) -> usize {
        self.positions.push(position);
        self.positions.len() - 1
    }

    pub fn append_texcoord(&mut self, texcoord: Vec2) -> usize {
        self.texcoords.push(texcoord);
        self.texcoords.len() - 1
    }

    pub fn append_normal(&mut self, normal: Vec3) -> usize {
        self.normals.push(normal);
        self.normals.len() - 1
    }

    pub fn position(&self, index: usize) -> Result<Vec3, OutOfRange> {
        lookup(&self.positions, index, AttributeKind::Position)
    }

    pub fn texcoord(&self, index: usize) -> Result<Vec2, OutOfRange> {
        lookup(&self.texcoords, index, AttributeKind::Texcoord)
    }

    pub fn normal(&self, index: usize) -> Result<Vec3, OutOfRange> {
        lookup(&self.normals, index, AttributeKind::Normal)
    }

    pub fn counts(&self) -> PoolCounts {
        PoolCounts {
            positions: self.positions.len(),
            texcoords: self.texcoords.len(),
            normals: self.normals.len(),
        }
    }
}

fn lookup<T: Copy>(pool: &[T], index: usize, attribute: AttributeKind) -> Result<T, OutOfRange> {
    pool.get(index).copied().ok_or(OutOfRange {
        attribute,
        index,
        len: pool.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_are_monotonic_per_pool() {
        let mut pools = AttributePools::new();
        assert_eq!(pools.append_position(Vec3::ZERO), 0);
        assert_eq!(pools.append_position(Vec3::X), 1);
        assert_eq!(pools.append_texcoord(Vec2::ONE), 0);
        assert_eq!(pools.append_normal(Vec3::Z), 0);
        assert_eq!(pools.append_position(Vec3::Y), 2);
        assert_eq!(
            pools.counts(),
            PoolCounts {
                positions: 3,
                texcoords: 1,
                normals: 1,
            }
        );
        assert_eq!(pools.position(1), Ok(Vec3::X));
    }

    #[test]
    fn lookup_past_end_is_out_of_range() {
        let mut pools = AttributePools::new();
        pools.append_texcoord(Vec2::ZERO);
        let err = pools.texcoord(1).unwrap_err();
        assert_eq!(
            err,
            OutOfRange {
                attribute: AttributeKind::Texcoord,
                index: 1,
                len: 1,
            }
        );
        match err.at_line(9) {
            MeshError::IndexOutOfRange { line, index, len, .. } => {
                assert_eq!((line, index, len), (9, 2, 1));
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(pools.normal(0).is_err());
    }
}
