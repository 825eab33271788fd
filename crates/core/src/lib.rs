//! Core shared math (renderer-agnostic): glam re-exports + triangle kernels
//! used by the mesh pipeline.

pub use glam::{Vec2, Vec3, vec2, vec3};

pub mod geometry;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reexports_match_glam_layout() {
        let v = vec3(1.0, 2.0, 3.0);
        assert_eq!(v.to_array(), [1.0, 2.0, 3.0]);
        assert_eq!(Vec2::from([0.5, 0.25]), vec2(0.5, 0.25));
    }
}
