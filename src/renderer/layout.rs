//! Scene layout: top-down view on the left, projected view on the right
//!
//! Geometry is produced in "view space": a uniform 2D space where the shorter
//! screen axis spans `[-1, 1]`. `RenderState` maps view space to NDC.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::settings::WallStyle;
use crate::sim::{BoundaryCurve, FrameResult};

/// World window shown in the top-down view
pub const TOP_VIEW_MIN: Vec2 = Vec2::new(-20.0, -10.0);
pub const TOP_VIEW_MAX: Vec2 = Vec2::new(20.0, 20.0);
/// Samples used to draw the curve across the top view
pub const CURVE_SAMPLES: usize = 100;
/// Vertical window of the projected view (`-15..15`)
pub const PLAYER_VIEW_HALF_HEIGHT: f32 = 15.0;

/// Spacing of the faint grid in the top view (world units)
const GRID_SPACING: f32 = 5.0;
const MARGIN: f32 = 0.04;

// Sizes in view-space units
const CURVE_WIDTH: f32 = 0.008;
const RAY_WIDTH: f32 = 0.003;
const GRID_WIDTH: f32 = 0.002;
const DASH: f32 = 0.02;
const DASH_GAP: f32 = 0.015;
const VIEWER_RADIUS: f32 = 0.02;
const HIT_RADIUS: f32 = 0.007;
const HORIZON_WIDTH: f32 = 0.004;

/// Display options for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneStyle {
    pub wall_style: WallStyle,
    pub show_miss_rays: bool,
}

impl Default for SceneStyle {
    fn default() -> Self {
        Self {
            wall_style: WallStyle::default(),
            show_miss_rays: true,
        }
    }
}

impl From<&crate::Settings> for SceneStyle {
    fn from(settings: &crate::Settings) -> Self {
        Self {
            wall_style: settings.wall_style,
            show_miss_rays: settings.show_miss_rays,
        }
    }
}

/// Half extents of view space for a surface aspect ratio (width / height)
pub fn view_half_extents(aspect: f32) -> Vec2 {
    if aspect >= 1.0 {
        Vec2::new(aspect, 1.0)
    } else {
        Vec2::new(1.0, 1.0 / aspect)
    }
}

/// Linear map from a world window to a screen rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Panel {
    pub world_min: Vec2,
    pub world_max: Vec2,
    pub screen_min: Vec2,
    pub screen_max: Vec2,
}

impl Panel {
    /// Stretch the world window over the whole screen rectangle
    pub fn stretched(
        world_min: Vec2,
        world_max: Vec2,
        screen_min: Vec2,
        screen_max: Vec2,
    ) -> Self {
        Self {
            world_min,
            world_max,
            screen_min,
            screen_max,
        }
    }

    /// Largest centered rectangle inside `screen_min..screen_max` that keeps
    /// one world unit the same size on both axes
    pub fn equal_aspect(
        world_min: Vec2,
        world_max: Vec2,
        screen_min: Vec2,
        screen_max: Vec2,
    ) -> Self {
        let world = world_max - world_min;
        let screen = screen_max - screen_min;
        let scale = (screen.x / world.x).min(screen.y / world.y);
        let size = world * scale;
        let center = (screen_min + screen_max) * 0.5;
        Self {
            world_min,
            world_max,
            screen_min: center - size * 0.5,
            screen_max: center + size * 0.5,
        }
    }

    pub fn to_screen(&self, p: Vec2) -> Vec2 {
        let t = (p - self.world_min) / (self.world_max - self.world_min);
        self.screen_min + t * (self.screen_max - self.screen_min)
    }

    pub fn contains_world(&self, p: Vec2) -> bool {
        p.cmpge(self.world_min).all() && p.cmple(self.world_max).all()
    }

    fn background(&self, color: [f32; 4]) -> Vec<Vertex> {
        shapes::rect(self.screen_min, self.screen_max, color)
    }
}

/// Left and right panel rectangles for a given aspect ratio
pub fn split_panels(aspect: f32) -> (Panel, Panel) {
    let half = view_half_extents(aspect);
    let top = Panel::equal_aspect(
        TOP_VIEW_MIN,
        TOP_VIEW_MAX,
        Vec2::new(-half.x + MARGIN, -half.y + MARGIN),
        Vec2::new(-MARGIN, half.y - MARGIN),
    );
    let player = Panel::stretched(
        Vec2::new(0.0, -PLAYER_VIEW_HALF_HEIGHT),
        Vec2::new(1.0, PLAYER_VIEW_HALF_HEIGHT),
        Vec2::new(MARGIN, -half.y + MARGIN),
        Vec2::new(half.x - MARGIN, half.y - MARGIN),
    );
    (top, player)
}

/// Top-down view: curve, viewer, rays and hit points in world coordinates
pub fn top_view<C: BoundaryCurve + ?Sized>(
    frame: &FrameResult,
    curve: &C,
    panel: &Panel,
    style: &SceneStyle,
) -> Vec<Vertex> {
    let mut vertices = panel.background(colors::TOP_VIEW_BG);
    let (wmin, wmax) = (panel.world_min, panel.world_max);

    // Grid
    let mut gx = (wmin.x / GRID_SPACING).ceil() * GRID_SPACING;
    while gx <= wmax.x {
        vertices.extend(shapes::line(
            panel.to_screen(Vec2::new(gx, wmin.y)),
            panel.to_screen(Vec2::new(gx, wmax.y)),
            GRID_WIDTH,
            colors::GRID,
        ));
        gx += GRID_SPACING;
    }
    let mut gy = (wmin.y / GRID_SPACING).ceil() * GRID_SPACING;
    while gy <= wmax.y {
        vertices.extend(shapes::line(
            panel.to_screen(Vec2::new(wmin.x, gy)),
            panel.to_screen(Vec2::new(wmax.x, gy)),
            GRID_WIDTH,
            colors::GRID,
        ));
        gy += GRID_SPACING;
    }

    // Curve, sampled across the window and clipped piecewise
    let samples: Vec<Vec2> = (0..CURVE_SAMPLES)
        .map(|i| {
            let t = i as f64 / (CURVE_SAMPLES - 1) as f64;
            let x = wmin.x as f64 + t * (wmax.x - wmin.x) as f64;
            Vec2::new(x as f32, curve.height(x) as f32)
        })
        .collect();
    let mut run: Vec<Vec2> = Vec::new();
    for pair in samples.windows(2) {
        match shapes::clip_segment(pair[0], pair[1], wmin, wmax) {
            Some((a, b)) => {
                let a = panel.to_screen(a);
                // A clipped segment that doesn't start where the run ended opens a new run
                if !run.last().is_some_and(|p| p.distance_squared(a) < 1e-10) {
                    vertices.extend(shapes::polyline(&run, CURVE_WIDTH, colors::CURVE));
                    run.clear();
                    run.push(a);
                }
                run.push(panel.to_screen(b));
            }
            None => {
                vertices.extend(shapes::polyline(&run, CURVE_WIDTH, colors::CURVE));
                run.clear();
            }
        }
    }
    vertices.extend(shapes::polyline(&run, CURVE_WIDTH, colors::CURVE));

    // Rays
    let origin = frame.origin().as_vec2();
    for record in frame.records() {
        let hit = record.outcome.is_hit();
        if !hit && !style.show_miss_rays {
            continue;
        }
        let end = frame.ray_end(record).as_vec2();
        let Some((a, b)) = shapes::clip_segment(origin, end, wmin, wmax) else {
            continue;
        };
        let (a, b) = (panel.to_screen(a), panel.to_screen(b));
        if hit {
            vertices.extend(shapes::line(a, b, RAY_WIDTH, colors::RAY_HIT));
        } else {
            vertices.extend(shapes::dashed_line(
                a,
                b,
                RAY_WIDTH,
                DASH,
                DASH_GAP,
                colors::RAY_MISS,
            ));
        }
    }

    // Hit points
    for point in frame.records().iter().filter_map(|r| r.outcome.point()) {
        let point = point.as_vec2();
        if panel.contains_world(point) {
            vertices.extend(shapes::circle(
                panel.to_screen(point),
                HIT_RADIUS,
                colors::HIT_POINT,
                8,
            ));
        }
    }

    // Viewer on top
    if panel.contains_world(origin) {
        vertices.extend(shapes::circle(
            panel.to_screen(origin),
            VIEWER_RADIUS,
            colors::VIEWER,
            16,
        ));
    }

    vertices
}

/// Projected view: one wall column per ray, first ray on the right
pub fn player_view(frame: &FrameResult, panel: &Panel, style: &SceneStyle) -> Vec<Vertex> {
    let mut vertices = panel.background(colors::PLAYER_VIEW_BG);
    let n = frame.len();
    if n > 0 {
        let slot_width = 1.0 / n as f32;
        for (i, height) in frame.heights().enumerate() {
            if height <= 0.0 {
                continue;
            }
            let (bottom, top) = style.wall_style.extent(height as f32);
            let bottom = bottom.max(-PLAYER_VIEW_HALF_HEIGHT);
            let top = top.min(PLAYER_VIEW_HALF_HEIGHT);

            let slot = (n - 1 - i) as f32;
            let min = panel.to_screen(Vec2::new(slot * slot_width, bottom));
            let max = panel.to_screen(Vec2::new((slot + 1.0) * slot_width, top));
            vertices.extend(shapes::rect(min, max, colors::WALL));
        }
    }

    vertices.extend(shapes::line(
        panel.to_screen(Vec2::new(0.0, 0.0)),
        panel.to_screen(Vec2::new(1.0, 0.0)),
        HORIZON_WIDTH,
        colors::HORIZON,
    ));
    vertices
}

/// Both views for one frame, in view space
pub fn build_scene<C: BoundaryCurve + ?Sized>(
    frame: &FrameResult,
    curve: &C,
    style: &SceneStyle,
    aspect: f32,
) -> Vec<Vertex> {
    let (top, player) = split_panels(aspect);
    let mut vertices = top_view(frame, curve, &top, style);
    vertices.extend(player_view(frame, &player, style));
    vertices
}

/// One-line status for the HUD
pub fn hud_summary(frame: &FrameResult) -> String {
    let origin = frame.origin();
    let nearest = frame
        .nearest_hit()
        .and_then(|r| r.outcome.distance())
        .map(|d| format!("{:.2}", d))
        .unwrap_or_else(|| "-".to_string());
    format!(
        "Pos: ({:.1}, {:.1})  hits {}/{}  nearest {}",
        origin.x,
        origin.y,
        frame.hit_count(),
        frame.len(),
        nearest
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{
        AngleSamples, FrameSolver, NewtonSolver, Polynomial, ViewConfig, ViewportState,
    };
    use glam::DVec2;
    use std::f64::consts::FRAC_PI_2;

    /// Floor at y = 0 seen from (0, -5): first ray hits at 5, second misses
    fn two_ray_frame() -> (FrameResult, Polynomial) {
        let curve = Polynomial::line(0.0, 0.0);
        let angles = AngleSamples::new(vec![FRAC_PI_2, -FRAC_PI_2]);
        let cfg = ViewConfig::new(angles, 20.0, 10.0, 0.5).unwrap();
        let state = ViewportState::new(DVec2::new(0.0, -5.0), cfg);
        let frame = FrameSolver::<NewtonSolver>::default().solve(&state, &curve);
        (frame, curve)
    }

    #[test]
    fn test_equal_aspect_panel_keeps_units_square() {
        let panel = Panel::equal_aspect(
            TOP_VIEW_MIN,
            TOP_VIEW_MAX,
            Vec2::new(-1.0, -1.0),
            Vec2::new(1.0, 1.0),
        );
        let a = panel.to_screen(Vec2::new(0.0, 0.0));
        let bx = panel.to_screen(Vec2::new(1.0, 0.0));
        let by = panel.to_screen(Vec2::new(0.0, 1.0));
        assert!(((bx - a).x - (by - a).y).abs() < 1e-6);
        // 40 x 30 window is width-limited in a square
        assert!((panel.screen_max.x - panel.screen_min.x - 2.0).abs() < 1e-6);
        assert!((panel.screen_max.y - panel.screen_min.y - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_view_half_extents() {
        assert_eq!(view_half_extents(2.0), Vec2::new(2.0, 1.0));
        assert_eq!(view_half_extents(0.5), Vec2::new(1.0, 2.0));
    }

    #[test]
    fn test_player_view_mirrors_columns_and_skips_misses() {
        let (frame, _) = two_ray_frame();
        assert_eq!(frame.records()[0].height, 2.0);
        assert_eq!(frame.records()[1].height, 0.0);

        let panel = Panel::stretched(
            Vec2::new(0.0, -PLAYER_VIEW_HALF_HEIGHT),
            Vec2::new(1.0, PLAYER_VIEW_HALF_HEIGHT),
            Vec2::new(0.0, -1.0),
            Vec2::new(2.0, 1.0),
        );
        let style = SceneStyle {
            wall_style: WallStyle::Symmetric,
            show_miss_rays: true,
        };
        let v = player_view(&frame, &panel, &style);
        // background + one column + horizon
        assert_eq!(v.len(), 6 * 3);

        let column = &v[6..12];
        let xs: Vec<f32> = column.iter().map(|v| v.position[0]).collect();
        // Record 0 sits in the right-hand slot
        assert!(xs.iter().all(|x| *x >= 1.0 - 1e-6 && *x <= 2.0 + 1e-6));
        let ys: Vec<f32> = column.iter().map(|v| v.position[1]).collect();
        let top = ys.iter().cloned().fold(f32::MIN, f32::max);
        let bottom = ys.iter().cloned().fold(f32::MAX, f32::min);
        assert!((top - 2.0 / 15.0).abs() < 1e-6);
        assert!((bottom + 2.0 / 15.0).abs() < 1e-6);
        assert!(column.iter().all(|v| v.color == colors::WALL));
    }

    #[test]
    fn test_raised_walls_are_clamped_to_window() {
        let (frame, _) = two_ray_frame();
        let panel = Panel::stretched(
            Vec2::new(0.0, -PLAYER_VIEW_HALF_HEIGHT),
            Vec2::new(1.0, PLAYER_VIEW_HALF_HEIGHT),
            Vec2::new(0.0, -1.0),
            Vec2::new(1.0, 1.0),
        );
        let v = player_view(&frame, &panel, &SceneStyle::default());
        let column = &v[6..12];
        let top = column.iter().map(|v| v.position[1]).fold(f32::MIN, f32::max);
        // Raised: 2h = 4 -> 4/15 of the half height
        assert!((top - 4.0 / 15.0).abs() < 1e-6);
        assert!(v.iter().all(|v| v.position[1].abs() <= 1.0 + 1e-6));
    }

    #[test]
    fn test_top_view_stays_inside_panel() {
        let state = ViewportState::default();
        let curve = Polynomial::parabola(0.1);
        let frame = FrameSolver::<NewtonSolver>::default().solve(&state, &curve);
        let (panel, _) = split_panels(16.0 / 9.0);

        let v = top_view(&frame, &curve, &panel, &SceneStyle::default());
        assert!(!v.is_empty());
        assert_eq!(v.len() % 3, 0);
        // Line width and markers may poke out by a hair
        let slack = 0.03;
        for vertex in &v {
            let [x, y] = vertex.position;
            assert!(x >= panel.screen_min.x - slack && x <= panel.screen_max.x + slack);
            assert!(y >= panel.screen_min.y - slack && y <= panel.screen_max.y + slack);
        }
        assert!(v.iter().any(|v| v.color == colors::VIEWER));
        assert!(v.iter().any(|v| v.color == colors::HIT_POINT));
    }

    #[test]
    fn test_curve_is_drawn_as_clipped_runs() {
        let (frame, _) = two_ray_frame();
        let (panel, _) = split_panels(1.0);
        let curve_vertices = |curve: &Polynomial| {
            top_view(&frame, curve, &panel, &SceneStyle::default())
                .iter()
                .filter(|v| v.color == colors::CURVE)
                .count()
        };

        // Floor fully inside the window: every sample pair is one segment
        assert_eq!(curve_vertices(&Polynomial::line(0.0, 0.0)), (CURVE_SAMPLES - 1) * 6);
        // Entirely above the window: nothing drawn
        assert_eq!(curve_vertices(&Polynomial::line(0.0, 50.0)), 0);
        // Parabola leaves through the top on both sides
        let parabola = curve_vertices(&Polynomial::parabola(0.1));
        assert!(parabola > 0 && parabola < (CURVE_SAMPLES - 1) * 6);
    }

    #[test]
    fn test_hiding_miss_rays_drops_dashes() {
        let (frame, curve) = two_ray_frame();
        let (panel, _) = split_panels(1.0);
        let with = top_view(&frame, &curve, &panel, &SceneStyle::default());
        let without = top_view(
            &frame,
            &curve,
            &panel,
            &SceneStyle {
                show_miss_rays: false,
                ..Default::default()
            },
        );
        assert!(with.iter().any(|v| v.color == colors::RAY_MISS));
        assert!(!without.iter().any(|v| v.color == colors::RAY_MISS));
        assert!(without.iter().any(|v| v.color == colors::RAY_HIT));
    }

    #[test]
    fn test_build_scene_and_hud() {
        let (frame, curve) = two_ray_frame();
        let v = build_scene(&frame, &curve, &SceneStyle::default(), 16.0 / 9.0);
        assert_eq!(v.len() % 3, 0);
        assert!(v.iter().any(|v| v.color == colors::PLAYER_VIEW_BG));
        assert!(v.iter().any(|v| v.color == colors::TOP_VIEW_BG));

        let hud = hud_summary(&frame);
        assert_eq!(hud, "Pos: (0.0, -5.0)  hits 1/2  nearest 5.00");
    }
}
