//! Background ring construction: concentric scale levels interpolated
//! between a straight-edged polygon and a circle.

use crate::geometry::{Point, lerp, lerp_point};
use std::f64::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ring {
    pub radius: f64,
    pub main: bool,
}

/// Scale levels from the outer ring inward: radii `outer * (n - i) / n`,
/// every `scale_step`-th ring drawn thicker.
pub fn rings(outer: f64, scale_size: usize, scale_step: usize) -> Vec<Ring> {
    (0..scale_size)
        .map(|i| Ring {
            radius: outer * (scale_size - i) as f64 / scale_size as f64,
            main: scale_step > 0 && i % scale_step == 0,
        })
        .collect()
}

/// Sampling density per category edge. Grows with smoothing intensity and
/// category count, floored at 3.
pub fn samples_per_edge(category_count: usize, smoothing: f64) -> usize {
    let base = 8_i64;
    let extra = (24.0 * smoothing).round() as i64;
    let density = (category_count as f64 / 3.0).round() as i64;
    (base + extra + density).max(3) as usize
}

/// Builds one closed ring path. Every edge between adjacent category angles
/// is sampled, each sample lerping between the straight chord and the true
/// circular arc point by the clamped smoothing factor (0 = polygon,
/// 1 = circle). The returned points start at the first vertex; the caller
/// closes the path.
pub fn ring_path(center: Point, radius: f64, angles: &[f64], smoothing: f64) -> Vec<Point> {
    if angles.is_empty() {
        return Vec::new();
    }

    let circle_point =
        |angle: f64| Point::new(center.x + angle.cos() * radius, center.y + angle.sin() * radius);

    let smoothing = smoothing.clamp(0.0, 1.0);
    let samples = samples_per_edge(angles.len(), smoothing);
    let vertices: Vec<Point> = angles.iter().map(|&a| circle_point(a)).collect();

    let mut path = Vec::with_capacity(1 + angles.len() * samples);
    path.push(vertices[0]);

    for i in 0..angles.len() {
        let vertex_a = vertices[i];
        let vertex_b = vertices[(i + 1) % angles.len()];

        let angle_a = angles[i];
        let mut angle_b = angles[(i + 1) % angles.len()];
        if angle_b <= angle_a {
            angle_b += 2.0 * PI;
        }

        for j in 1..=samples {
            let s = j as f64 / samples as f64;
            let chord = lerp_point(vertex_a, vertex_b, s);
            let arc = circle_point(lerp(angle_a, angle_b, s));
            path.push(lerp_point(chord, arc, smoothing));
        }
    }

    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::category_angle;

    const EPS: f64 = 1e-9;

    fn angles(count: usize) -> Vec<f64> {
        (0..count).map(|i| category_angle(i, count)).collect()
    }

    #[test]
    fn ring_radii_descend_evenly() {
        let rings = rings(100.0, 4, 1);
        let radii: Vec<f64> = rings.iter().map(|r| r.radius).collect();
        assert_eq!(radii, vec![100.0, 75.0, 50.0, 25.0]);
        assert!(rings.iter().all(|r| r.main));
    }

    #[test]
    fn main_rings_follow_scale_step() {
        let rings = rings(100.0, 6, 3);
        let mains: Vec<bool> = rings.iter().map(|r| r.main).collect();
        assert_eq!(mains, vec![true, false, false, true, false, false]);
    }

    #[test]
    fn sample_density_grows_with_smoothing_and_count() {
        assert_eq!(samples_per_edge(3, 0.0), 9);
        assert_eq!(samples_per_edge(3, 1.0), 33);
        assert!(samples_per_edge(30, 0.0) > samples_per_edge(3, 0.0));
        // floor even for degenerate inputs
        assert!(samples_per_edge(0, 0.0) >= 3);
    }

    #[test]
    fn zero_smoothing_yields_pure_polygon() {
        let center = Point::new(0.0, 0.0);
        let angles = angles(5);
        let path = ring_path(center, 100.0, &angles, 0.0);

        // every sample lies on a chord, so strictly inside the circle except
        // at the vertices
        for p in &path {
            assert!(p.distance(center) <= 100.0 + EPS);
        }
        // edge midpoints are strictly inside
        let samples = samples_per_edge(5, 0.0);
        let mid = path[1 + samples / 2 - 1];
        assert!(mid.distance(center) < 100.0 - 1.0);
    }

    #[test]
    fn full_smoothing_yields_pure_circle() {
        let center = Point::new(10.0, -5.0);
        let angles = angles(4);
        let path = ring_path(center, 80.0, &angles, 1.0);
        for p in &path {
            assert!((p.distance(center) - 80.0).abs() < EPS);
        }
    }

    #[test]
    fn path_starts_and_ends_at_first_vertex() {
        let center = Point::new(0.0, 0.0);
        let angles = angles(6);
        let path = ring_path(center, 50.0, &angles, 0.3);
        let first = path.first().unwrap();
        let last = path.last().unwrap();
        assert!(first.distance(*last) < EPS);
    }

    #[test]
    fn smoothing_is_clamped() {
        let center = Point::new(0.0, 0.0);
        let angles = angles(4);
        let over = ring_path(center, 80.0, &angles, 3.0);
        let exact = ring_path(center, 80.0, &angles, 1.0);
        assert_eq!(over, exact);
    }

    #[test]
    fn empty_category_set_draws_nothing() {
        assert!(ring_path(Point::default(), 100.0, &[], 0.5).is_empty());
    }
}
