//! Fan triangulation of polygon faces.
//!
//! Correct for convex, planar polygons only. Non-convex faces still produce a
//! structurally valid (but geometrically wrong) triangle list.

/// Triangles `[c0, ci, ci+1]` for `i = 1..n-1`; `n - 2` in total.
pub fn fan<T: Copy>(corners: &[T]) -> impl Iterator<Item = [T; 3]> + '_ {
    let first = corners.first().copied();
    corners
        .windows(2)
        .skip(1)
        .filter_map(move |edge| first.map(|c0| [c0, edge[0], edge[1]]))
}

/// Number of triangles a face with `corners` corners expands to.
#[inline]
pub fn triangle_count(corners: usize) -> usize {
    corners.saturating_sub(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_passes_through() {
        assert_eq!(fan(&[7u32, 8, 9]).collect::<Vec<_>>(), vec![[7, 8, 9]]);
    }

    #[test]
    fn quad_splits_on_first_corner() {
        assert_eq!(
            fan(&[0u32, 1, 2, 3]).collect::<Vec<_>>(),
            vec![[0, 1, 2], [0, 2, 3]]
        );
    }

    #[test]
    fn n_gon_yields_n_minus_two_triangles() {
        for n in 3..12u32 {
            let corners: Vec<u32> = (0..n).collect();
            let tris: Vec<_> = fan(&corners).collect();
            assert_eq!(tris.len(), triangle_count(n as usize));
            assert!(tris.iter().all(|t| t[0] == 0));
        }
    }

    #[test]
    fn fewer_than_three_corners_yield_nothing() {
        assert_eq!(fan::<u32>(&[]).count(), 0);
        assert_eq!(fan(&[1u32, 2]).count(), 0);
        assert_eq!(triangle_count(2), 0);
    }
}
