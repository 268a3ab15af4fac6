//! Shape generation for 2D primitives
//!
//! Everything is emitted as a triangle list in whatever uniform 2D space the
//! caller works in.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Two triangles covering the quad `a b c d` (in winding order)
fn push_quad(vertices: &mut Vec<Vertex>, a: Vec2, b: Vec2, c: Vec2, d: Vec2, color: [f32; 4]) {
    vertices.push(Vertex::new(a.x, a.y, color));
    vertices.push(Vertex::new(b.x, b.y, color));
    vertices.push(Vertex::new(c.x, c.y, color));

    vertices.push(Vertex::new(a.x, a.y, color));
    vertices.push(Vertex::new(c.x, c.y, color));
    vertices.push(Vertex::new(d.x, d.y, color));
}

/// Axis-aligned filled rectangle
pub fn rect(min: Vec2, max: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(6);
    push_quad(
        &mut vertices,
        min,
        Vec2::new(max.x, min.y),
        max,
        Vec2::new(min.x, max.y),
        color,
    );
    vertices
}

/// Thick line segment as a quad
///
/// Degenerate (zero-length) segments produce nothing.
pub fn line(p1: Vec2, p2: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(6);
    push_line(&mut vertices, p1, p2, width, color);
    vertices
}

fn push_line(vertices: &mut Vec<Vertex>, p1: Vec2, p2: Vec2, width: f32, color: [f32; 4]) {
    let dir = (p2 - p1).normalize_or_zero();
    if dir == Vec2::ZERO {
        return;
    }
    // Perpendicular for width
    let perp = Vec2::new(-dir.y, dir.x) * (width * 0.5);
    push_quad(vertices, p1 - perp, p2 - perp, p2 + perp, p1 + perp, color);
}

/// Dashed line: `dash` drawn, `gap` skipped, repeating from `p1`
pub fn dashed_line(
    p1: Vec2,
    p2: Vec2,
    width: f32,
    dash: f32,
    gap: f32,
    color: [f32; 4],
) -> Vec<Vertex> {
    let total = (p2 - p1).length();
    let period = dash + gap;
    if total <= 0.0 || dash <= 0.0 || period <= 0.0 {
        return Vec::new();
    }
    let dir = (p2 - p1) / total;

    let dashes = (total / period).ceil() as usize;
    let mut vertices = Vec::with_capacity(dashes * 6);
    let mut t = 0.0;
    while t < total {
        let end = (t + dash).min(total);
        push_line(&mut vertices, p1 + dir * t, p1 + dir * end, width, color);
        t += period;
    }
    vertices
}

/// Connected line segments through `points`
pub fn polyline(points: &[Vec2], width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(points.len().saturating_sub(1) * 6);
    for pair in points.windows(2) {
        push_line(&mut vertices, pair[0], pair[1], width, color);
    }
    vertices
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Clip a segment to an axis-aligned box
///
/// Slab method: each axis narrows the `[t_enter, t_exit]` window along the
/// segment. Returns `None` when nothing of the segment is inside.
pub fn clip_segment(p1: Vec2, p2: Vec2, min: Vec2, max: Vec2) -> Option<(Vec2, Vec2)> {
    let d = p2 - p1;
    let mut t_enter = 0.0_f32;
    let mut t_exit = 1.0_f32;

    for (start, delta, lo, hi) in [(p1.x, d.x, min.x, max.x), (p1.y, d.y, min.y, max.y)] {
        if delta == 0.0 {
            if start < lo || start > hi {
                return None;
            }
            continue;
        }
        let t0 = (lo - start) / delta;
        let t1 = (hi - start) / delta;
        let (near, far) = if t0 < t1 { (t0, t1) } else { (t1, t0) };
        t_enter = t_enter.max(near);
        t_exit = t_exit.min(far);
        if t_enter > t_exit {
            return None;
        }
    }

    Some((p1 + d * t_enter, p1 + d * t_exit))
}

#[cfg(test)]
mod tests {
    use super::*;

    const C: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

    #[test]
    fn test_rect_and_line_vertex_counts() {
        assert_eq!(rect(Vec2::ZERO, Vec2::ONE, C).len(), 6);
        assert_eq!(line(Vec2::ZERO, Vec2::X, 0.1, C).len(), 6);
        assert!(line(Vec2::ONE, Vec2::ONE, 0.1, C).is_empty());
        assert_eq!(circle(Vec2::ZERO, 1.0, C, 12).len(), 36);
    }

    #[test]
    fn test_line_width_is_perpendicular() {
        let v = line(Vec2::ZERO, Vec2::new(2.0, 0.0), 0.5, C);
        let ys: Vec<f32> = v.iter().map(|v| v.position[1]).collect();
        assert!(ys.iter().all(|y| (y.abs() - 0.25).abs() < 1e-6));
    }

    #[test]
    fn test_dashed_line_splits_into_dashes() {
        // 10 units, period 2 -> 5 dashes
        let v = dashed_line(Vec2::ZERO, Vec2::new(10.0, 0.0), 0.1, 1.0, 1.0, C);
        assert_eq!(v.len(), 5 * 6);
        assert!(v.iter().all(|v| v.position[0] <= 10.0 + 1e-5));
        assert!(dashed_line(Vec2::ZERO, Vec2::ZERO, 0.1, 1.0, 1.0, C).is_empty());
    }

    #[test]
    fn test_polyline_segments() {
        let pts = [Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::Y];
        assert_eq!(polyline(&pts, 0.1, C).len(), 3 * 6);
        assert!(polyline(&pts[..1], 0.1, C).is_empty());
    }

    #[test]
    fn test_clip_segment() {
        let min = Vec2::new(-1.0, -1.0);
        let max = Vec2::new(1.0, 1.0);

        // Fully inside
        let (a, b) = clip_segment(Vec2::ZERO, Vec2::new(0.5, 0.5), min, max).unwrap();
        assert_eq!((a, b), (Vec2::ZERO, Vec2::new(0.5, 0.5)));

        // Crosses the right edge
        let (a, b) = clip_segment(Vec2::ZERO, Vec2::new(4.0, 0.0), min, max).unwrap();
        assert_eq!(a, Vec2::ZERO);
        assert!((b - Vec2::new(1.0, 0.0)).length() < 1e-6);

        // Passes through diagonally
        let (a, b) = clip_segment(Vec2::new(-3.0, -3.0), Vec2::new(3.0, 3.0), min, max).unwrap();
        assert!((a - min).length() < 1e-6);
        assert!((b - max).length() < 1e-6);

        // Entirely outside
        assert!(clip_segment(Vec2::new(2.0, 2.0), Vec2::new(3.0, 5.0), min, max).is_none());
        assert!(clip_segment(Vec2::new(-3.0, 2.0), Vec2::new(3.0, 2.0), min, max).is_none());
    }
}
