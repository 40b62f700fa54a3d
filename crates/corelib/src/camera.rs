use crate::{Mat4, Vec3};

/// Simple perspective camera (right-handed).
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_rad: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub aspect: f32,
}

impl Camera {
    #[allow(clippy::too_many_arguments)]
    pub fn new_perspective(
        eye: Vec3,
        target: Vec3,
        up: Vec3,
        fov_y_rad: f32,
        z_near: f32,
        z_far: f32,
        aspect: f32,
    ) -> Self {
        Self {
            eye,
            target,
            up,
            fov_y_rad,
            z_near,
            z_far,
            aspect,
        }
    }

    #[inline]
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// glam's perspective_rh already maps depth to [0,1], matching wgpu.
    #[inline]
    pub fn proj(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y_rad,
            self.aspect.max(1e-6),
            self.z_near,
            self.z_far,
        )
    }

    #[inline]
    pub fn proj_view(&self) -> Mat4 {
        self.proj() * self.view()
    }

    #[inline]
    pub fn with_aspect(mut self, aspect: f32) -> Self {
        self.aspect = aspect;
        self
    }

    /// Move the eye along the view ray (positive = toward the target).
    /// The eye never crosses the target; distance is floored at z_near.
    pub fn dolly(&mut self, amount: f32) {
        let to_target = self.target - self.eye;
        let dist = to_target.length();
        if dist <= 1e-6 {
            return;
        }
        let new_dist = (dist - amount).max(self.z_near.max(1e-3));
        self.eye = self.target - to_target / dist * new_dist;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec3;

    fn cam() -> Camera {
        Camera::new_perspective(
            vec3(0.0, 0.0, 4.0),
            Vec3::ZERO,
            Vec3::Y,
            60f32.to_radians(),
            0.1,
            100.0,
            16.0 / 9.0,
        )
    }

    #[test]
    fn dolly_moves_along_view_ray() {
        let mut c = cam();
        c.dolly(1.0);
        assert!(c.eye.abs_diff_eq(vec3(0.0, 0.0, 3.0), 1e-6));
    }

    #[test]
    fn dolly_never_crosses_target() {
        let mut c = cam();
        c.dolly(100.0);
        let dist = (c.target - c.eye).length();
        assert!(dist >= c.z_near - 1e-6);
        assert!(c.eye.z > 0.0);
    }
}
