//! Arcball rotation controller: maps mouse drags over a virtual sphere
//! spanning the viewport to an accumulated rotation quaternion.

use crate::{Mat4, Quat, Vec3};

const EPS_AXIS: f32 = 1e-10;

#[derive(Clone, Copy, Debug)]
struct Drag {
    /// Sphere vector captured at button press.
    from: Vec3,
    /// Accumulated rotation captured at button press.
    base: Quat,
}

/// Maps 2D cursor motion to a rotation: each cursor position is projected
/// onto a virtual unit sphere centered in the viewport, and the great-circle
/// arc between the press point and the current point becomes an incremental
/// rotation composed onto the rotation held when the drag started.
#[derive(Clone, Copy, Debug)]
pub struct Arcball {
    width: f32,
    height: f32,
    speed: f32,
    rotation: Quat,
    drag: Option<Drag>,
}

impl Arcball {
    pub fn new(width: u32, height: u32, speed: f32) -> Self {
        Self {
            width: width.max(1) as f32,
            height: height.max(1) as f32,
            speed,
            rotation: Quat::IDENTITY,
            drag: None,
        }
    }

    /// Keep the virtual sphere matched to the window after a resize.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.width = width.max(1) as f32;
        self.height = height.max(1) as f32;
    }

    /// Back to identity, cancelling any drag in progress.
    pub fn reset(&mut self) {
        self.rotation = Quat::IDENTITY;
        self.drag = None;
    }

    pub fn begin_drag(&mut self, x: f32, y: f32) {
        self.drag = Some(Drag {
            from: self.sphere_vector(x, y),
            base: self.rotation,
        });
    }

    /// Update the rotation for the cursor now being at (x, y).
    /// Returns whether the rotation changed (no-op when not dragging).
    pub fn drag_to(&mut self, x: f32, y: f32) -> bool {
        let Some(drag) = self.drag else {
            return false;
        };
        let to = self.sphere_vector(x, y);
        let rotation = arc_rotation(drag.from, to, self.speed) * drag.base;
        let changed = rotation != self.rotation;
        self.rotation = rotation;
        changed
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    #[inline]
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    #[inline]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_quat(self.rotation)
    }

    /// Project a cursor position (pixels, origin top-left) onto the unit
    /// sphere. Inside the sphere z = sqrt(1 - x^2 - y^2); outside, the point
    /// is pushed to the equator so dragging past the edge stays stable.
    fn sphere_vector(&self, x: f32, y: f32) -> Vec3 {
        let px = (2.0 * x - self.width) / self.width;
        let py = (self.height - 2.0 * y) / self.height;
        let d2 = px * px + py * py;
        if d2 <= 1.0 {
            Vec3::new(px, py, (1.0 - d2).sqrt())
        } else {
            Vec3::new(px, py, 0.0).normalize()
        }
    }
}

/// Rotation carrying `from` to `to` along their great circle, with the angle
/// scaled by `speed`. Parallel vectors produce the identity.
fn arc_rotation(from: Vec3, to: Vec3, speed: f32) -> Quat {
    let axis = from.cross(to);
    if axis.length_squared() < EPS_AXIS {
        return Quat::IDENTITY;
    }
    let angle = from.dot(to).clamp(-1.0, 1.0).acos() * speed;
    Quat::from_axis_angle(axis.normalize(), angle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f32::consts::FRAC_PI_2;

    fn ball() -> Arcball {
        Arcball::new(800, 600, 1.0)
    }

    #[test]
    fn center_maps_to_pole() {
        let b = ball();
        let v = b.sphere_vector(400.0, 300.0);
        assert!(v.abs_diff_eq(Vec3::Z, 1e-6));
    }

    #[test]
    fn outside_points_land_on_equator() {
        let b = ball();
        let v = b.sphere_vector(0.0, 0.0); // top-left corner, d2 = 2
        assert!((v.length() - 1.0).abs() < 1e-6);
        assert!(v.z.abs() < 1e-6);
    }

    #[test]
    fn quarter_drag_rotates_pole_to_equator() {
        let mut b = ball();
        b.begin_drag(400.0, 300.0); // center: +Z
        assert!(b.drag_to(800.0, 300.0)); // right edge: +X
        let rotated = b.rotation() * Vec3::Z;
        assert!(rotated.abs_diff_eq(Vec3::X, 1e-5));
        let angle = b.rotation().to_axis_angle().1;
        assert!((angle - FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn speed_scales_the_angle() {
        let mut b = Arcball::new(800, 600, 0.5);
        b.begin_drag(400.0, 300.0);
        b.drag_to(800.0, 300.0);
        let angle = b.rotation().to_axis_angle().1;
        assert!((angle - FRAC_PI_2 * 0.5).abs() < 1e-5);
    }

    #[test]
    fn drags_accumulate_across_releases() {
        let mut b = ball();
        b.begin_drag(400.0, 300.0);
        b.drag_to(600.0, 300.0);
        b.end_drag();
        let first = b.rotation();

        b.begin_drag(400.0, 300.0);
        b.drag_to(600.0, 300.0);
        b.end_drag();

        // Second drag composes onto the first, not replaces it.
        let two_step = b.rotation();
        let expected = first * first;
        assert!(two_step.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn motion_without_drag_is_ignored() {
        let mut b = ball();
        assert!(!b.drag_to(100.0, 100.0));
        assert_eq!(b.rotation(), Quat::IDENTITY);
    }

    #[test]
    fn degenerate_drag_keeps_rotation() {
        let mut b = ball();
        b.begin_drag(400.0, 300.0);
        assert!(!b.drag_to(400.0, 300.0));
        assert_eq!(b.rotation(), Quat::IDENTITY);
    }

    #[test]
    fn reset_restores_identity_mid_drag() {
        let mut b = ball();
        b.begin_drag(400.0, 300.0);
        b.drag_to(700.0, 200.0);
        b.reset();
        assert_eq!(b.rotation(), Quat::IDENTITY);
        assert!(!b.is_dragging());
    }
}
