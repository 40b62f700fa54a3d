use crate::{EulerRot, Mat4, Quat, Vec3};

/// Rigid transform with non-uniform scale. Rotation is a unit quaternion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    #[inline]
    pub const fn identity() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    #[inline]
    pub fn from_trs(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    /// Euler XYZ angles in radians, for call sites that think in angles.
    #[inline]
    pub fn from_euler_xyz(translation: Vec3, rotation_euler: Vec3, scale: Vec3) -> Self {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            rotation_euler.x,
            rotation_euler.y,
            rotation_euler.z,
        );
        Self::from_trs(translation, rotation, scale)
    }

    /// Build matrix = T * R * S (column-major Mat4 per glam).
    #[inline]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// Blend two transforms: lerp translation/scale, slerp rotation.
    /// `t` is not clamped; callers own the time domain.
    pub fn blend(a: &Self, b: &Self, t: f32) -> Self {
        Self {
            translation: a.translation.lerp(b.translation, t),
            rotation: a.rotation.slerp(b.rotation, t),
            scale: a.scale.lerp(b.scale, t),
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec3;

    #[test]
    fn translate_then_scale_matrix() {
        let t = Transform::from_trs(
            vec3(1.0, 2.0, 3.0),
            Quat::IDENTITY,
            vec3(2.0, 2.0, 2.0),
        );
        // Last column = translation, diagonal = scale when rotation is identity.
        let m = t.matrix().to_cols_array();
        assert!((m[12] - 1.0).abs() < 1e-6);
        assert!((m[13] - 2.0).abs() < 1e-6);
        assert!((m[14] - 3.0).abs() < 1e-6);
        assert!((m[0] - 2.0).abs() < 1e-6);
        assert!((m[5] - 2.0).abs() < 1e-6);
        assert!((m[10] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn euler_constructor_matches_quat() {
        let e = Transform::from_euler_xyz(Vec3::ZERO, vec3(0.0, 0.5, 0.0), Vec3::ONE);
        let q = Transform::from_trs(Vec3::ZERO, Quat::from_rotation_y(0.5), Vec3::ONE);
        assert!(e.rotation.abs_diff_eq(q.rotation, 1e-6));
    }

    #[test]
    fn blend_midpoint() {
        let a = Transform::from_trs(Vec3::ZERO, Quat::IDENTITY, Vec3::ONE);
        let b = Transform::from_trs(
            vec3(2.0, 0.0, 0.0),
            Quat::from_rotation_y(core::f32::consts::FRAC_PI_2),
            vec3(3.0, 3.0, 3.0),
        );
        let mid = Transform::blend(&a, &b, 0.5);
        assert!(mid.translation.abs_diff_eq(vec3(1.0, 0.0, 0.0), 1e-6));
        assert!(mid.scale.abs_diff_eq(vec3(2.0, 2.0, 2.0), 1e-6));
        let expected = Quat::from_rotation_y(core::f32::consts::FRAC_PI_4);
        assert!(mid.rotation.abs_diff_eq(expected, 1e-5));
    }
}
