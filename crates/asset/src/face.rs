//! Face corner decoding: `p`, `p/t`, `p//n`, `p/t/n` -> 0-based [`CornerKey`].

use crate::error::{AttributeKind, MeshError, MeshResult};
use crate::pools::PoolCounts;

/// Deduplication key of one face corner (0-based pool slots).
///
/// The derived `Hash` covers the whole triple, so keys differing in any one
/// component never collapse into one vertex.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CornerKey {
    pub position: usize,
    pub texcoord: Option<usize>,
    pub normal: Option<usize>,
}

/// Decode the corner tokens of one `f` record, preserving source order.
///
/// Negative indices are resolved against `counts` (the pools as they are
/// when the face is read). Upper bounds of positive indices are checked when
/// the key is materialized against the pools.
pub fn decode_face<S: AsRef<str>>(
    tokens: &[S],
    counts: PoolCounts,
    line: usize,
) -> MeshResult<Vec<CornerKey>> {
    if tokens.len() < 3 {
        return Err(MeshError::DegenerateFace {
            line,
            corners: tokens.len(),
        });
    }

    tokens
        .iter()
        .map(|token| decode_corner(token.as_ref(), counts, line))
        .collect()
}

pub fn decode_corner(token: &str, counts: PoolCounts, line: usize) -> MeshResult<CornerKey> {
    let unsupported = || MeshError::UnsupportedCornerSyntax {
        line,
        token: token.to_owned(),
    };

    let mut fields = token.split('/');
    let Some(position) = fields.next() else {
        return Err(unsupported());
    };
    let texcoord = fields.next();
    let normal = fields.next();
    if position.is_empty() || fields.next().is_some() {
        return Err(unsupported());
    }

    let (texcoord, normal) = match (texcoord, normal) {
        // p
        (None, None) => (None, None),
        // p/t
        (Some(t), None) if !t.is_empty() => (Some(t), None),
        // p//n
        (Some(""), Some(n)) if !n.is_empty() => (None, Some(n)),
        // p/t/n
        (Some(t), Some(n)) if !t.is_empty() && !n.is_empty() => (Some(t), Some(n)),
        _ => return Err(unsupported()),
    };

    Ok(CornerKey {
        position: resolve_index(position, AttributeKind::Position, counts, line)?,
        texcoord: texcoord
            .map(|t| resolve_index(t, AttributeKind::Texcoord, counts, line))
            .transpose()?,
        normal: normal
            .map(|n| resolve_index(n, AttributeKind::Normal, counts, line))
            .transpose()?,
    })
}

/// 1-based (or negative, relative) source index -> 0-based slot.
fn resolve_index(
    text: &str,
    attribute: AttributeKind,
    counts: PoolCounts,
    line: usize,
) -> MeshResult<usize> {
    let raw = text.parse::<i64>().map_err(|_| {
        MeshError::malformed(line, format!("invalid {} index '{}'", attribute, text))
    })?;

    let len = counts.of(attribute);
    let out_of_range = || MeshError::IndexOutOfRange {
        line,
        attribute,
        index: raw,
        len,
    };

    if raw > 0 {
        usize::try_from(raw - 1).map_err(|_| out_of_range())
    } else if raw < 0 {
        let idx = len as i64 + raw;
        usize::try_from(idx).map_err(|_| out_of_range())
    } else {
        // OBJ indices are 1-based; 0 never names an attribute.
        Err(out_of_range())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COUNTS: PoolCounts = PoolCounts {
        positions: 4,
        texcoords: 2,
        normals: 1,
    };

    fn key(position: usize, texcoord: Option<usize>, normal: Option<usize>) -> CornerKey {
        CornerKey {
            position,
            texcoord,
            normal,
        }
    }

    #[test]
    fn decodes_all_four_forms() {
        assert_eq!(decode_corner("3", COUNTS, 1).unwrap(), key(2, None, None));
        assert_eq!(decode_corner("3/2", COUNTS, 1).unwrap(), key(2, Some(1), None));
        assert_eq!(decode_corner("3//1", COUNTS, 1).unwrap(), key(2, None, Some(0)));
        assert_eq!(
            decode_corner("3/2/1", COUNTS, 1).unwrap(),
            key(2, Some(1), Some(0))
        );
    }

    #[test]
    fn negative_indices_are_relative_to_current_pools() {
        assert_eq!(
            decode_corner("-1/-2/-1", COUNTS, 1).unwrap(),
            key(3, Some(0), Some(0))
        );
        let err = decode_corner("-5", COUNTS, 6).unwrap_err();
        assert!(matches!(
            err,
            MeshError::IndexOutOfRange {
                line: 6,
                attribute: AttributeKind::Position,
                index: -5,
                len: 4,
            }
        ));
    }

    #[test]
    fn zero_index_is_out_of_range() {
        let err = decode_corner("1/0", COUNTS, 2).unwrap_err();
        assert!(matches!(
            err,
            MeshError::IndexOutOfRange {
                attribute: AttributeKind::Texcoord,
                index: 0,
                ..
            }
        ));
    }

    #[test]
    fn rejects_unsupported_shapes() {
        for token in ["", "/1", "1/", "1/2/", "1//", "1/2/3/4", "//1"] {
            let err = decode_corner(token, COUNTS, 5).unwrap_err();
            assert!(
                matches!(err, MeshError::UnsupportedCornerSyntax { line: 5, .. }),
                "token {token:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn non_numeric_index_is_malformed() {
        let err = decode_corner("1/a/1", COUNTS, 8).unwrap_err();
        assert!(matches!(err, MeshError::MalformedRecord { line: 8, .. }));
    }

    #[test]
    fn face_needs_three_corners_and_keeps_order() {
        let err = decode_face(&["1", "2"], COUNTS, 4).unwrap_err();
        assert!(matches!(err, MeshError::DegenerateFace { line: 4, corners: 2 }));

        let corners = decode_face(&["4", "1", "2", "3"], COUNTS, 4).unwrap();
        let positions: Vec<usize> = corners.iter().map(|c| c.position).collect();
        assert_eq!(positions, vec![3, 0, 1, 2]);
    }
}
