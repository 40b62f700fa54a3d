//! Core math and animation types shared by the demos (renderer-agnostic):
//! glam re-exports, Transform, Camera, the arcball controller and the
//! keyframe interpolator.

pub use glam::{EulerRot, Mat4, Quat, Vec2, Vec3, vec2, vec3};

pub mod arcball;
pub mod camera;
pub mod keyframe;
pub mod transform;

pub use arcball::Arcball;
pub use camera::Camera;
pub use keyframe::{Clip, ClipError, Keyframe};
pub use transform::Transform;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_transform_is_identity_matrix() {
        let t = Transform::identity();
        assert_eq!(t.matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn camera_pv_is_finite() {
        let cam = Camera::new_perspective(
            vec3(0.0, 0.0, 4.0),
            vec3(0.0, 0.0, 0.0),
            Vec3::Y,
            60f32.to_radians(),
            0.1,
            100.0,
            16.0 / 9.0,
        );
        let pv = cam.proj_view();
        let a = pv.to_cols_array();
        assert!(a.iter().all(|f| f.is_finite()));
    }

    #[test]
    fn arcball_matrix_stays_orthonormal() {
        let mut ball = Arcball::new(640, 480, 0.8);
        ball.begin_drag(320.0, 240.0);
        ball.drag_to(500.0, 100.0);
        ball.end_drag();
        let m = ball.matrix();
        // Rotation matrices preserve length.
        let v = m.transform_vector3(vec3(1.0, 2.0, 3.0));
        assert!((v.length() - vec3(1.0, 2.0, 3.0).length()).abs() < 1e-4);
    }
}
