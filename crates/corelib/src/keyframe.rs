//! Keyframe animation clips and time-domain sampling.
//!
//! A clip is a sorted list of time-stamped TRS poses. Sampling finds the
//! bracketing pair for a query time and blends: linear for translation and
//! scale, spherical-linear for rotation. Key times and the clip duration are
//! in ticks; playback converts seconds to ticks and wraps modulo duration.

use thiserror::Error;

use crate::transform::Transform;

/// Fallback when the source file carries no tick rate (assimp convention).
pub const DEFAULT_TICKS_PER_SECOND: f32 = 25.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keyframe {
    /// Key time in ticks.
    pub time: f32,
    pub transform: Transform,
}

impl Keyframe {
    pub fn new(time: f32, transform: Transform) -> Self {
        Self { time, transform }
    }
}

#[derive(Debug, Error)]
pub enum ClipError {
    #[error("clip has no keyframes")]
    Empty,
    #[error("keyframe times must be non-decreasing (key {index} at t={time})")]
    Unsorted { index: usize, time: f32 },
    #[error("clip duration must be positive and finite, got {0}")]
    BadDuration(f32),
}

/// A single animation clip.
#[derive(Clone, Debug)]
pub struct Clip {
    keys: Vec<Keyframe>,
    duration: f32,
    ticks_per_second: f32,
}

impl Clip {
    /// Validates key ordering and duration. A non-positive
    /// `ticks_per_second` falls back to [`DEFAULT_TICKS_PER_SECOND`].
    pub fn new(keys: Vec<Keyframe>, duration: f32, ticks_per_second: f32) -> Result<Self, ClipError> {
        if keys.is_empty() {
            return Err(ClipError::Empty);
        }
        for (i, pair) in keys.windows(2).enumerate() {
            if pair[1].time < pair[0].time {
                return Err(ClipError::Unsorted {
                    index: i + 1,
                    time: pair[1].time,
                });
            }
        }
        if !(duration > 0.0) || !duration.is_finite() {
            return Err(ClipError::BadDuration(duration));
        }
        let ticks_per_second = if ticks_per_second > 0.0 {
            ticks_per_second
        } else {
            DEFAULT_TICKS_PER_SECOND
        };
        Ok(Self {
            keys,
            duration,
            ticks_per_second,
        })
    }

    #[inline]
    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    /// Clip length in ticks.
    #[inline]
    pub fn duration(&self) -> f32 {
        self.duration
    }

    #[inline]
    pub fn ticks_per_second(&self) -> f32 {
        self.ticks_per_second
    }

    /// Clip length in seconds.
    #[inline]
    pub fn duration_seconds(&self) -> f32 {
        self.duration / self.ticks_per_second
    }

    /// Sample the pose at a tick time. Queries before the first key or after
    /// the last clamp to that key; a zero-span bracket returns its earlier
    /// key.
    pub fn sample(&self, ticks: f32) -> Transform {
        let first = &self.keys[0];
        let last = &self.keys[self.keys.len() - 1];
        if ticks <= first.time {
            return first.transform;
        }
        if ticks >= last.time {
            return last.transform;
        }

        // Index of the first key strictly after `ticks`; in 1..len here.
        let next = self.keys.partition_point(|k| k.time <= ticks);
        let prev = &self.keys[next - 1];
        let next = &self.keys[next];

        let span = next.time - prev.time;
        if span <= f32::EPSILON {
            return prev.transform;
        }
        let factor = (ticks - prev.time) / span;
        Transform::blend(&prev.transform, &next.transform, factor)
    }

    /// Playback entry point: wall-clock seconds to ticks, wrapped modulo the
    /// clip duration so the animation loops.
    pub fn sample_seconds(&self, seconds: f32) -> Transform {
        let ticks = (seconds * self.ticks_per_second).rem_euclid(self.duration);
        self.sample(ticks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Quat, Vec3, vec3};
    use core::f32::consts::{FRAC_PI_2, FRAC_PI_4};

    fn key(time: f32, x: f32) -> Keyframe {
        Keyframe::new(
            time,
            Transform::from_trs(vec3(x, 0.0, 0.0), Quat::IDENTITY, Vec3::ONE),
        )
    }

    fn two_key_clip() -> Clip {
        Clip::new(vec![key(0.0, 0.0), key(10.0, 5.0)], 10.0, 25.0).unwrap()
    }

    #[test]
    fn rejects_empty_and_unsorted() {
        assert!(matches!(Clip::new(vec![], 1.0, 25.0), Err(ClipError::Empty)));
        let err = Clip::new(vec![key(2.0, 0.0), key(1.0, 0.0)], 10.0, 25.0);
        assert!(matches!(err, Err(ClipError::Unsorted { index: 1, .. })));
        let err = Clip::new(vec![key(0.0, 0.0)], 0.0, 25.0);
        assert!(matches!(err, Err(ClipError::BadDuration(_))));
    }

    #[test]
    fn zero_tick_rate_defaults() {
        let clip = Clip::new(vec![key(0.0, 0.0)], 10.0, 0.0).unwrap();
        assert_eq!(clip.ticks_per_second(), DEFAULT_TICKS_PER_SECOND);
    }

    #[test]
    fn midpoint_lerps_translation() {
        let clip = two_key_clip();
        let pose = clip.sample(5.0);
        assert!(pose.translation.abs_diff_eq(vec3(2.5, 0.0, 0.0), 1e-6));
    }

    #[test]
    fn rotation_slerps_along_shortest_arc() {
        let a = Keyframe::new(
            0.0,
            Transform::from_trs(Vec3::ZERO, Quat::IDENTITY, Vec3::ONE),
        );
        let b = Keyframe::new(
            4.0,
            Transform::from_trs(Vec3::ZERO, Quat::from_rotation_y(FRAC_PI_2), Vec3::ONE),
        );
        let clip = Clip::new(vec![a, b], 4.0, 25.0).unwrap();
        let pose = clip.sample(2.0);
        assert!(pose.rotation.abs_diff_eq(Quat::from_rotation_y(FRAC_PI_4), 1e-5));
    }

    #[test]
    fn clamps_outside_key_range() {
        let clip = two_key_clip();
        assert!(clip.sample(-3.0).translation.abs_diff_eq(Vec3::ZERO, 1e-6));
        assert!(
            clip.sample(99.0)
                .translation
                .abs_diff_eq(vec3(5.0, 0.0, 0.0), 1e-6)
        );
    }

    #[test]
    fn single_key_clip_is_constant() {
        let clip = Clip::new(vec![key(3.0, 1.0)], 10.0, 25.0).unwrap();
        for t in [0.0, 3.0, 10.0] {
            assert!(clip.sample(t).translation.abs_diff_eq(vec3(1.0, 0.0, 0.0), 1e-6));
        }
    }

    #[test]
    fn duplicate_key_times_form_a_step() {
        let clip = Clip::new(
            vec![key(0.0, 0.0), key(5.0, 1.0), key(5.0, 9.0), key(10.0, 9.0)],
            10.0,
            25.0,
        )
        .unwrap();
        // Approaching the step from below blends toward the pre-step key.
        let before = clip.sample(4.999);
        assert!(before.translation.x <= 1.0 + 1e-3);
        // At and past the step time, the post-step key wins.
        assert!((clip.sample(5.0).translation.x - 9.0).abs() < 1e-6);
        assert!((clip.sample(5.001).translation.x - 9.0).abs() < 1e-3);
    }

    #[test]
    fn playback_wraps_modulo_duration() {
        // 25 ticks/s, 10-tick clip: 0.6 s -> 15 ticks -> wraps to 5 ticks.
        let clip = two_key_clip();
        let wrapped = clip.sample_seconds(0.6);
        let direct = clip.sample(5.0);
        assert!(wrapped.translation.abs_diff_eq(direct.translation, 1e-6));
        // Exactly one period lands back on the start.
        let period = clip.sample_seconds(clip.duration_seconds());
        assert!(period.translation.abs_diff_eq(Vec3::ZERO, 1e-5));
    }
}
