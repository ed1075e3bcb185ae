use std::f64::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_squared(&self, other: Point) -> f64 {
        let (dx, dy) = (self.x - other.x, self.y - other.y);
        dx * dx + dy * dy
    }

    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Angle of a category axis. Category 0 points up (-90 degrees) and
/// categories proceed clockwise, evenly spaced.
pub fn category_angle(index: usize, count: usize) -> f64 {
    let step = 2.0 * PI / count as f64;
    (PI * 3.0 / 2.0 + index as f64 * step).rem_euclid(2.0 * PI)
}

/// Screen position of a normalized value on an axis.
pub fn point_on_axis(center: Point, angle: f64, value: f64, radius: f64) -> Point {
    Point::new(
        center.x + radius * value * angle.cos(),
        center.y + radius * value * angle.sin(),
    )
}

/// Drawable chart radius, leaving a margin for the corner selector widgets
/// placed just outside the outermost ring. May be non-positive on tiny
/// surfaces; callers draw nothing in that case.
pub fn graph_radius(width: f64, height: f64, category_ui_size: f64) -> f64 {
    width.min(height) / 2.0 - category_ui_size * 2.0
}

/// Projects `p` onto the closed segment from `center` to the point at
/// distance `radius` along `angle`, returning the normalized position `t`
/// clamped to [0, 1]. `radius` must be positive.
pub fn project_on_axis(center: Point, angle: f64, radius: f64, p: Point) -> f64 {
    let (abx, aby) = (radius * angle.cos(), radius * angle.sin());
    let (apx, apy) = (p.x - center.x, p.y - center.y);
    let t = (apx * abx + apy * aby) / (abx * abx + aby * aby);
    t.clamp(0.0, 1.0)
}

pub fn deg_to_rad(d: f64) -> f64 {
    d * PI / 180.0
}

pub fn rad_to_deg(r: f64) -> f64 {
    r * 180.0 / PI
}

pub fn mod_360(n: f64) -> f64 {
    n.rem_euclid(360.0)
}

/// Signed angular difference `to - from`, wrapped into (-180, 180].
pub fn shortest_angle_delta(to: f64, from: f64) -> f64 {
    let raw = mod_360(to) - mod_360(from);
    if raw > 180.0 {
        raw - 360.0
    } else if raw < -180.0 {
        raw + 360.0
    } else {
        raw
    }
}

pub fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}

pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

pub fn lerp_point(a: Point, b: Point, t: f64) -> Point {
    Point::new(lerp(a.x, b.x, t), lerp(a.y, b.y, t))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn category_angles_evenly_spaced() {
        for count in 1..=12 {
            let step = 2.0 * PI / count as f64;
            for i in 1..count {
                let a = category_angle(i - 1, count);
                let b = category_angle(i, count);
                let diff = (b - a).rem_euclid(2.0 * PI);
                assert!((diff - step).abs() < EPS, "count={count} i={i}");
            }
        }
    }

    #[test]
    fn category_zero_points_up() {
        let a = category_angle(0, 5);
        assert!((a - PI * 3.0 / 2.0).abs() < EPS);
        // up in screen coordinates: cos ~ 0, sin = -1
        assert!(a.cos().abs() < EPS);
        assert!((a.sin() + 1.0).abs() < EPS);
    }

    #[test]
    fn category_angles_wrap_into_full_turn() {
        for i in 0..7 {
            let a = category_angle(i, 7);
            assert!((0.0..2.0 * PI).contains(&a));
        }
    }

    #[test]
    fn point_on_axis_stays_within_radius() {
        let center = Point::new(100.0, 80.0);
        for i in 0..=10 {
            let value = i as f64 / 10.0;
            let p = point_on_axis(center, 1.3, value, 50.0);
            assert!(p.distance(center) <= 50.0 + EPS);
        }
        let origin = point_on_axis(center, 2.0, 0.0, 50.0);
        assert_eq!(origin, center);
    }

    #[test]
    fn projection_is_idempotent_under_clamping() {
        let center = Point::new(0.0, 0.0);
        let angle = category_angle(2, 5);
        let radius = 200.0;
        for i in 0..=10 {
            let t = i as f64 / 10.0;
            let p = point_on_axis(center, angle, t, radius);
            let back = project_on_axis(center, angle, radius, p);
            assert!((back - t).abs() < EPS, "t={t} back={back}");
        }
    }

    #[test]
    fn projection_clamps_out_of_range_points() {
        let center = Point::new(50.0, 50.0);
        let angle = 0.0;
        // beyond the segment end
        let far = Point::new(center.x + 500.0, center.y);
        assert_eq!(project_on_axis(center, angle, 100.0, far), 1.0);
        // behind the center
        let behind = Point::new(center.x - 30.0, center.y);
        assert_eq!(project_on_axis(center, angle, 100.0, behind), 0.0);
    }

    #[test]
    fn projection_ignores_off_axis_offset() {
        let center = Point::new(0.0, 0.0);
        // perpendicular offset does not change t
        let p = Point::new(60.0, 25.0);
        let t = project_on_axis(center, 0.0, 100.0, p);
        assert!((t - 0.6).abs() < EPS);
    }

    #[test]
    fn graph_radius_reserves_selector_margin() {
        assert_eq!(graph_radius(1000.0, 800.0, 100.0), 200.0);
        // degenerate surface may go non-positive, never panics
        assert!(graph_radius(10.0, 10.0, 100.0) < 0.0);
    }

    #[test]
    fn shortest_delta_takes_short_way_round() {
        assert_eq!(shortest_angle_delta(10.0, 350.0), 20.0);
        assert_eq!(shortest_angle_delta(350.0, 10.0), -20.0);
        assert_eq!(shortest_angle_delta(0.0, 180.0), 180.0);
        assert_eq!(shortest_angle_delta(-120.0, 0.0), -120.0);
        assert_eq!(shortest_angle_delta(90.0, 90.0), 0.0);
    }

    #[test]
    fn ease_out_cubic_endpoints() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert!(ease_out_cubic(0.5) > 0.5);
    }
}
