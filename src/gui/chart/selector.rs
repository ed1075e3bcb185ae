//! Per-category corner selection with eased rotation.

use super::{BASE_CORNER_ANGLES, SELECTOR_ANIMATION_MS};
use crate::geometry::{ease_out_cubic, lerp, mod_360, shortest_angle_delta};
use std::time::Instant;
use strum::{EnumIter, FromRepr};

/// One of the three selectable options of a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, FromRepr)]
#[repr(usize)]
pub enum Corner {
    First = 0,
    Second = 1,
    Third = 2,
}

impl Corner {
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::from_repr(index)
    }

    fn base_angle(self) -> f64 {
        BASE_CORNER_ANGLES[self.index()]
    }
}

/// Monotonic millisecond clock shared by all selectors, so the state
/// machines stay testable with explicit times.
#[derive(Debug)]
pub struct AnimationClock {
    start: Instant,
}

impl AnimationClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn now_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Default for AnimationClock {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy)]
struct Animation {
    start: f64,
    end: f64,
    t0: f64,
    duration: f64,
}

/// Rotation/selection state of one category's corner widget. Settled while
/// `animation` is empty, animating otherwise. Rotation is continuous degrees,
/// reduced modulo 360 only for comparisons.
#[derive(Debug)]
pub struct CornerSelector {
    /// Fixed placement of the widget, facing the chart center.
    pub placement_deg: f64,
    pub rotation: f64,
    pub active: Corner,
    pub print_mode: bool,
    animation: Option<Animation>,
}

impl CornerSelector {
    pub fn new(placement_deg: f64) -> Self {
        Self {
            placement_deg,
            rotation: 0.0,
            active: Corner::First,
            print_mode: false,
            animation: None,
        }
    }

    /// Absolute angles (degrees) of the three corner anchors.
    pub fn anchor_angles(&self) -> [f64; 3] {
        BASE_CORNER_ANGLES
            .map(|base| self.placement_deg + self.rotation + base)
    }

    /// Rotation delta that brings corner `c` into the resting orientation,
    /// along the shortest signed path.
    fn alignment_delta(&self, c: Corner) -> f64 {
        shortest_angle_delta(-c.base_angle(), self.rotation)
    }

    /// Starts an eased rotation toward corner `c`. Retargeting an in-flight
    /// animation continues from the current interpolated rotation, so
    /// successive selections compose without jumps.
    pub fn select_corner(&mut self, c: Corner, now_ms: f64) {
        self.active = c;
        let end = self.rotation + self.alignment_delta(c);
        self.animation = Some(Animation {
            start: self.rotation,
            end,
            t0: now_ms,
            duration: SELECTOR_ANIMATION_MS,
        });
    }

    /// Sets the selection immediately, bypassing animation. Used for
    /// programmatic restore only, never for user interaction.
    pub fn restore(&mut self, c: Corner) {
        self.active = c;
        self.rotation = mod_360(self.rotation + self.alignment_delta(c));
        self.animation = None;
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Advances the animation. Returns true while still animating. On
    /// completion the rotation snaps to the exact end value to avoid
    /// floating drift.
    pub fn update(&mut self, now_ms: f64) -> bool {
        let Some(anim) = self.animation else {
            return false;
        };

        let t = ((now_ms - anim.t0) / anim.duration).clamp(0.0, 1.0);
        self.rotation = lerp(anim.start, anim.end, ease_out_cubic(t));

        if t >= 1.0 {
            self.rotation = mod_360(anim.end);
            self.animation = None;
        }

        self.animation.is_some()
    }
}
