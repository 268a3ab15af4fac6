//! Frame solver: one ray per angle sample, classified and projected
//!
//! A frame is a full, independent recomputation. Nothing is cached between
//! calls, so the same viewport and curve always give the same `FrameResult`.

use glam::DVec2;

use super::curve::BoundaryCurve;
use super::solver::{NewtonSolver, RayIntersector, RayOutcome, RayQuery};
use super::state::ViewportState;
use crate::polar_to_cartesian;

/// Inverse-distance wall height for a hit at distance `r`
///
/// Distances under `min_safe_radius` are clamped so the wall cannot blow up
/// as the viewer walks into the curve.
#[inline]
pub fn projected_height(r: f64, projection_constant: f64, min_safe_radius: f64) -> f64 {
    projection_constant / r.max(min_safe_radius)
}

/// Result for one angle sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayRecord {
    pub angle: f64,
    pub outcome: RayOutcome,
    /// Projected wall height, zero for a miss
    pub height: f64,
}

impl RayRecord {
    fn miss(angle: f64) -> Self {
        Self {
            angle,
            outcome: RayOutcome::Miss,
            height: 0.0,
        }
    }
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameResult {
    origin: DVec2,
    max_scan_length: f64,
    records: Vec<RayRecord>,
}

impl FrameResult {
    /// Viewpoint the rays were cast from
    #[inline]
    pub fn origin(&self) -> DVec2 {
        self.origin
    }

    #[inline]
    pub fn max_scan_length(&self) -> f64 {
        self.max_scan_length
    }

    /// Records in angle-sample order
    #[inline]
    pub fn records(&self) -> &[RayRecord] {
        &self.records
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Projected heights in angle-sample order, 0 for misses
    pub fn heights(&self) -> impl Iterator<Item = f64> + '_ {
        self.records.iter().map(|r| r.height)
    }

    pub fn hit_count(&self) -> usize {
        self.records.iter().filter(|r| r.outcome.is_hit()).count()
    }

    /// Closest hit, if any ray hit at all
    pub fn nearest_hit(&self) -> Option<&RayRecord> {
        self.records
            .iter()
            .filter(|r| r.outcome.is_hit())
            .min_by(|a, b| {
                let da = a.outcome.distance().unwrap_or(f64::INFINITY);
                let db = b.outcome.distance().unwrap_or(f64::INFINITY);
                da.total_cmp(&db)
            })
    }

    /// Where the drawn ray for `record` ends: the hit point or the scan limit
    pub fn ray_end(&self, record: &RayRecord) -> DVec2 {
        record.outcome.point().unwrap_or_else(|| {
            polar_to_cartesian(self.origin, self.max_scan_length, record.angle)
        })
    }
}

/// Casts the whole ray fan for a viewport
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameSolver<I = NewtonSolver> {
    intersector: I,
}

impl<I: RayIntersector> FrameSolver<I> {
    pub fn new(intersector: I) -> Self {
        Self { intersector }
    }

    /// Solve every angle of the viewport, in order
    pub fn solve<C: BoundaryCurve + ?Sized>(
        &self,
        state: &ViewportState,
        curve: &C,
    ) -> FrameResult {
        let config = state.config();
        let origin = state.position();
        let max_scan = config.max_scan_length();

        let records: Vec<RayRecord> = config
            .angles()
            .iter()
            .map(|angle| {
                let query = RayQuery::new(origin, angle);
                match self.intersector.intersect(curve, query) {
                    RayOutcome::Hit { distance, point }
                        if distance > 0.0 && distance <= max_scan =>
                    {
                        RayRecord {
                            angle,
                            outcome: RayOutcome::Hit { distance, point },
                            height: projected_height(
                                distance,
                                config.projection_constant(),
                                config.min_safe_radius(),
                            ),
                        }
                    }
                    RayOutcome::Hit { distance, .. } => {
                        log::trace!("ray at {:.4} rad: hit at {} is out of range", angle, distance);
                        RayRecord::miss(angle)
                    }
                    RayOutcome::Miss => RayRecord::miss(angle),
                }
            })
            .collect();

        let frame = FrameResult {
            origin,
            max_scan_length: max_scan,
            records,
        };
        log::debug!(
            "frame at ({:.2}, {:.2}): {}/{} hits",
            origin.x,
            origin.y,
            frame.hit_count(),
            frame.len()
        );
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::curve::Polynomial;
    use crate::sim::state::{AngleSamples, ViewConfig};
    use proptest::prelude::*;
    use std::f64::consts::FRAC_PI_2;

    fn viewport(angles: Vec<f64>) -> ViewportState {
        let cfg = ViewConfig::new(AngleSamples::new(angles), 20.0, 10.0, 0.5).unwrap();
        ViewportState::new(DVec2::new(0.0, -5.0), cfg)
    }

    #[test]
    fn test_straight_up_projects_height_two() {
        let state = viewport(vec![FRAC_PI_2]);
        let frame = FrameSolver::<NewtonSolver>::default().solve(&state, &Polynomial::parabola(0.1));

        assert_eq!(frame.len(), 1);
        let rec = frame.records()[0];
        let distance = rec.outcome.distance().expect("should hit");
        assert!((distance - 5.0).abs() < 1e-9);
        assert!((rec.height - 2.0).abs() < 1e-9);
        let p = rec.outcome.point().unwrap();
        assert!(p.length() < 1e-9);
    }

    #[test]
    fn test_horizontal_ray_never_hits_beyond_scan() {
        let state = viewport(vec![0.0]);
        let frame = FrameSolver::<NewtonSolver>::default().solve(&state, &Polynomial::parabola(0.1));
        // 0.1 x^2 + 5 has no real root along this ray
        let rec = frame.records()[0];
        assert_eq!(rec.outcome, RayOutcome::Miss);
        assert_eq!(rec.height, 0.0);
        assert_eq!(frame.ray_end(&rec), DVec2::new(20.0, -5.0));
    }

    #[test]
    fn test_out_of_range_hit_becomes_miss() {
        // Ceiling at y = 30, viewer at y = -5: true distance is 35
        let state = viewport(vec![FRAC_PI_2]);
        let curve = Polynomial::line(0.0, 30.0);
        let frame = FrameSolver::<NewtonSolver>::default().solve(&state, &curve);
        assert_eq!(frame.records()[0].outcome, RayOutcome::Miss);
        assert_eq!(frame.records()[0].height, 0.0);
        assert_eq!(frame.hit_count(), 0);
        assert!(frame.nearest_hit().is_none());
    }

    #[test]
    fn test_height_clamps_inside_safe_radius() {
        assert_eq!(projected_height(0.1, 10.0, 0.5), 20.0);
        assert_eq!(projected_height(0.5, 10.0, 0.5), 20.0);
        assert_eq!(projected_height(5.0, 10.0, 0.5), 2.0);
    }

    #[test]
    fn test_default_fan_around_start() {
        let state = ViewportState::default();
        let frame = FrameSolver::<NewtonSolver>::default().solve(&state, &Polynomial::parabola(0.1));

        assert_eq!(frame.len(), 180);
        assert!(frame.hit_count() > 0);
        for (rec, angle) in frame.records().iter().zip(state.config().angles().iter()) {
            assert_eq!(rec.angle, angle);
            assert_eq!(rec.height == 0.0, !rec.outcome.is_hit());
            assert!(rec.height <= state.config().max_height());
        }
        // Looking down and away from the bowl sees nothing
        let down = &frame.records()[135];
        assert!(!down.outcome.is_hit());

        let nearest = frame.nearest_hit().unwrap();
        assert!((nearest.outcome.distance().unwrap() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_solve_is_idempotent() {
        let state = ViewportState::default();
        let solver = FrameSolver::<NewtonSolver>::default();
        let curve = Polynomial::parabola(0.1);
        assert_eq!(solver.solve(&state, &curve), solver.solve(&state, &curve));
    }

    proptest! {
        #[test]
        fn frame_shape_holds_for_any_viewpoint(
            x in -1.0e3f64..1.0e3,
            y in -1.0e3f64..1.0e3,
            count in 1usize..64,
        ) {
            let cfg = ViewConfig::new(AngleSamples::full_turn(count), 20.0, 10.0, 0.5).unwrap();
            let state = ViewportState::new(DVec2::new(x, y), cfg);
            let frame = FrameSolver::<NewtonSolver>::default().solve(&state, &Polynomial::parabola(0.1));

            prop_assert_eq!(frame.len(), count);
            for (rec, angle) in frame.records().iter().zip(state.config().angles().iter()) {
                prop_assert_eq!(rec.angle, angle);
                match rec.outcome {
                    RayOutcome::Hit { distance, .. } => {
                        prop_assert!(distance > 0.0 && distance <= 20.0);
                        prop_assert!(rec.height > 0.0 && rec.height <= 20.0);
                    }
                    RayOutcome::Miss => prop_assert_eq!(rec.height, 0.0),
                }
            }
        }

        #[test]
        fn height_decreases_beyond_safe_radius(
            r1 in 0.5f64..100.0,
            delta in 1e-6f64..50.0,
        ) {
            let near = projected_height(r1, 10.0, 0.5);
            let far = projected_height(r1 + delta, 10.0, 0.5);
            prop_assert!(far < near);
        }

        #[test]
        fn height_is_capped_inside_safe_radius(r in 1e-9f64..0.5) {
            prop_assert_eq!(projected_height(r, 10.0, 0.5), 10.0 / 0.5);
        }
    }
}
