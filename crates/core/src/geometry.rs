//! Per-triangle geometry kernels: face normal and UV-derived tangent frame.

use crate::{Vec2, Vec3};

/// UV determinants with a smaller magnitude are treated as unsolvable.
pub const UV_DETERMINANT_EPSILON: f32 = 1e-12;

/// Unit normal of the triangle `(p0, p1, p2)` from the edges `p0→p1` and
/// `p0→p2` (counter-clockwise winding faces +normal).
///
/// Zero-area triangles give `Vec3::ZERO` instead of NaN.
#[inline]
pub fn face_normal(p0: Vec3, p1: Vec3, p2: Vec3) -> Vec3 {
    (p1 - p0).cross(p2 - p0).normalize_or_zero()
}

/// Unnormalized tangent/bitangent of a single triangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TangentPair {
    pub tangent: Vec3,
    pub bitangent: Vec3,
}

/// Solve the 2x2 UV system of one triangle for its tangent and bitangent.
///
/// Returns `None` when the UV deltas are (numerically) collinear, i.e. the
/// determinant is ~0 and `1/det` is undefined, or when the result is not
/// finite.
pub fn triangle_tangents(positions: [Vec3; 3], uvs: [Vec2; 3]) -> Option<TangentPair> {
    let e1 = positions[1] - positions[0];
    let e2 = positions[2] - positions[0];
    let d1 = uvs[1] - uvs[0];
    let d2 = uvs[2] - uvs[0];

    let det = d1.x * d2.y - d1.y * d2.x;
    if !det.is_finite() || det.abs() < UV_DETERMINANT_EPSILON {
        return None;
    }
    let r = det.recip();

    let tangent = (e1 * d2.y - e2 * d1.y) * r;
    let bitangent = (e2 * d1.x - e1 * d2.x) * r;
    if !(tangent.is_finite() && bitangent.is_finite()) {
        return None;
    }

    Some(TangentPair { tangent, bitangent })
}
