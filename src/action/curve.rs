//! Path curve construction.
//!
//! A `Path` step carries a handful of control points. Playback needs two
//! things from them:
//!
//! 1. a smooth polyline approximating a clamped, uniform cubic B-spline
//!    through the control polygon ([`sample_bspline`]), and
//! 2. a compact table of [`Waypoint`]s whose cumulative distances have been
//!    rescaled to seconds, so elapsed time maps straight to a position
//!    ([`PathTable`]).
//!
//! Dense samples that lie on a nearly straight run are collapsed by
//! [`reduce_collinear`] before the table is built, keeping the waypoint count
//! small without visible error under linear interpolation.

use glam::Vec2;
use log::warn;

/// Dense samples generated per control point.
pub const DEFAULT_SAMPLES_PER_POINT: usize = 16;
/// Minimum cosine between consecutive directions for a sample to be dropped.
pub const DEFAULT_COLLINEAR_THRESHOLD: f32 = 0.999;

const SPLINE_DEGREE: usize = 3;
/// Paths shorter than this collapse onto their first control point.
const MIN_PATH_LENGTH: f32 = 1e-4;
/// Dense samples closer than this are merged before reduction.
const MIN_SEGMENT_LENGTH: f32 = 1e-3;
/// Merge tolerance relative to the largest coordinate of the path.
const RELATIVE_SEGMENT_LENGTH: f32 = 2e-4;

/// Tunables for curve construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurveSettings {
    /// Dense samples per control point (`count * samples_per_point` in total).
    pub samples_per_point: usize,
    /// A dense sample becomes a waypoint when the dot product between its
    /// outgoing direction and the running direction drops below this value.
    pub collinear_threshold: f32,
}

impl Default for CurveSettings {
    fn default() -> Self {
        Self {
            samples_per_point: DEFAULT_SAMPLES_PER_POINT,
            collinear_threshold: DEFAULT_COLLINEAR_THRESHOLD,
        }
    }
}

/// How the control points of a path are joined.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Interpolation {
    /// Clamped uniform cubic B-spline.
    #[default]
    BSpline,
    /// Straight segments through the control points.
    Linear,
}

impl Interpolation {
    /// Map the numeric script parameter to an interpolation kind.
    ///
    /// Unknown values fall back to [`Interpolation::BSpline`].
    pub fn from_param(value: f32) -> Self {
        match value as i32 {
            0 => Interpolation::BSpline,
            1 => Interpolation::Linear,
            other => {
                warn!("Unknown path interpolation kind {}, using B-spline", other);
                Interpolation::BSpline
            }
        }
    }
}

/// A point on a path with its cumulative distance from the start.
///
/// Once a [`PathTable`] is built the distance is expressed in seconds of
/// playback rather than world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Waypoint {
    pub position: Vec2,
    pub distance: f32,
}

/// De Boor evaluation of a uniform B-spline.
///
/// At `depth == 0` returns the control point at `index`, clamped to the valid
/// range so the curve is anchored to its first and last points. At higher
/// depths blends the evaluations at `index - 1` and `index` with
/// `alpha = (x - index) / (degree + 1 - depth)`.
///
/// `depth` is capped at `degree`. Returns `Vec2::ZERO` for an empty point
/// list.
pub fn evaluate(depth: usize, degree: usize, index: i32, x: f32, points: &[Vec2]) -> Vec2 {
    let Some(last) = points.len().checked_sub(1) else {
        return Vec2::ZERO;
    };
    let depth = depth.min(degree);
    if depth == 0 {
        return points[index.clamp(0, last as i32) as usize];
    }
    let alpha = (x - index as f32) / (degree + 1 - depth) as f32;
    let before = evaluate(depth - 1, degree, index - 1, x, points);
    let after = evaluate(depth - 1, degree, index, x, points);
    before * (1.0 - alpha) + after * alpha
}

/// Sample a clamped cubic B-spline at `num_segments` evenly spaced parameters.
///
/// `num_segments` is raised to at least the control point count. The final
/// sample is pinned to the last control point.
pub fn sample_bspline(points: &[Vec2], num_segments: usize) -> Vec<Vec2> {
    let Some(&last) = points.last() else {
        return Vec::new();
    };
    let num_segments = num_segments.max(points.len()).max(2);
    let span = (points.len() + 1) as f32;
    let denominator = (num_segments - 1) as f32;

    let mut samples: Vec<Vec2> = (0..num_segments)
        .map(|i| {
            let x = (i as f32 / denominator) * span + 1.0;
            evaluate(SPLINE_DEGREE, SPLINE_DEGREE, x.floor() as i32, x, points)
        })
        .collect();
    if let Some(end) = samples.last_mut() {
        *end = last;
    }
    samples
}

/// Drop samples lying on nearly straight runs.
///
/// Samples closer than a small tolerance to the previous one are merged
/// first, since the direction of a sub-tolerance step is mostly rounding
/// noise. The running direction is then measured from the last kept sample
/// to the current one; the current sample is kept when the direction of its
/// outgoing segment deviates from it (dot product below `threshold`).
/// First and last samples are always kept.
pub fn reduce_collinear(samples: &[Vec2], threshold: f32) -> Vec<Vec2> {
    let (Some(&first), Some(&last)) = (samples.first(), samples.last()) else {
        return Vec::new();
    };
    if samples.len() == 1 {
        return vec![first];
    }

    let tolerance = segment_tolerance(samples);
    let mut distinct = vec![first];
    for &point in &samples[1..samples.len() - 1] {
        if distinct
            .last()
            .is_some_and(|&prev| prev.distance(point) > tolerance)
        {
            distinct.push(point);
        }
    }
    while distinct.len() > 1 && distinct.last().is_some_and(|p| p.distance(last) <= tolerance) {
        distinct.pop();
    }
    distinct.push(last);

    let mut kept = vec![first];
    let mut anchor = first;
    for pair in distinct.windows(2).skip(1) {
        let (current, next) = (pair[0], pair[1]);
        let Some(heading) = (next - current).try_normalize() else {
            continue;
        };
        let Some(running) = (current - anchor).try_normalize() else {
            continue;
        };
        if heading.dot(running) < threshold {
            kept.push(current);
            anchor = current;
        }
    }
    kept.push(last);
    kept
}

/// Shortest step whose direction is trusted, scaled with the coordinates so
/// f32 rounding stays well below the collinearity threshold.
fn segment_tolerance(samples: &[Vec2]) -> f32 {
    let extent = samples
        .iter()
        .fold(0.0_f32, |acc, p| acc.max(p.abs().max_element()));
    MIN_SEGMENT_LENGTH.max(extent * RELATIVE_SEGMENT_LENGTH)
}

/// Time-indexed waypoint table for path playback.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathTable {
    waypoints: Vec<Waypoint>,
}

impl PathTable {
    /// Build a table from control points.
    ///
    /// The result is empty only when `control_points` is empty.
    pub fn build(
        control_points: &[Vec2],
        duration: f32,
        interpolation: Interpolation,
        settings: &CurveSettings,
    ) -> Self {
        let mut table = Self::default();
        table.rebuild(control_points, duration, interpolation, settings);
        table
    }

    /// Rebuild in place, reusing the waypoint buffer.
    pub fn rebuild(
        &mut self,
        control_points: &[Vec2],
        duration: f32,
        interpolation: Interpolation,
        settings: &CurveSettings,
    ) {
        let reduced = match interpolation {
            Interpolation::BSpline => {
                let dense = sample_bspline(
                    control_points,
                    control_points.len() * settings.samples_per_point,
                );
                reduce_collinear(&dense, settings.collinear_threshold)
            }
            Interpolation::Linear => {
                reduce_collinear(control_points, settings.collinear_threshold)
            }
        };
        self.waypoints.clear();
        if let Some(&anchor) = control_points.first() {
            self.fill(&reduced, anchor, duration);
        }
    }

    /// Assign cumulative distances and rescale them to `[0, duration]`.
    ///
    /// `anchor` is where a zero-length path is held.
    fn fill(&mut self, points: &[Vec2], anchor: Vec2, duration: f32) {
        let duration = duration.max(0.0);

        let mut total = 0.0;
        if let Some(&origin) = points.first() {
            self.waypoints.push(Waypoint {
                position: origin,
                distance: 0.0,
            });
        }
        for pair in points.windows(2) {
            total += pair[0].distance(pair[1]);
            self.waypoints.push(Waypoint {
                position: pair[1],
                distance: total,
            });
        }

        if self.waypoints.len() < 2 || total <= MIN_PATH_LENGTH {
            // zero-length path: hold the first control point for the whole step
            self.waypoints.clear();
            self.waypoints.push(Waypoint {
                position: anchor,
                distance: 0.0,
            });
            self.waypoints.push(Waypoint {
                position: anchor,
                distance: duration,
            });
            return;
        }

        let scale = duration / total;
        for waypoint in &mut self.waypoints {
            waypoint.distance *= scale;
        }
        if let Some(end) = self.waypoints.last_mut() {
            end.distance = duration;
        }
    }

    pub fn clear(&mut self) {
        self.waypoints.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Playback length in seconds.
    pub fn duration(&self) -> f32 {
        self.waypoints.last().map_or(0.0, |w| w.distance)
    }

    /// Index of the waypoint ending the segment that contains `time`.
    fn segment_end(&self, time: f32) -> usize {
        self.waypoints
            .partition_point(|w| w.distance <= time)
            .clamp(1, self.waypoints.len() - 1)
    }

    /// Position at `time` seconds into the path.
    ///
    /// Clamps to the first waypoint before the start and to the last one
    /// once the duration is reached. `None` for an empty table.
    pub fn sample(&self, time: f32) -> Option<Vec2> {
        let first = self.waypoints.first()?;
        let last = self.waypoints.last()?;
        // a zero-duration table ends on its last point
        if time >= last.distance {
            return Some(last.position);
        }
        if time <= first.distance {
            return Some(first.position);
        }
        let end = self.segment_end(time);
        let (a, b) = (self.waypoints[end - 1], self.waypoints[end]);
        let span = b.distance - a.distance;
        if span <= 0.0 {
            return Some(b.position);
        }
        Some(a.position.lerp(b.position, (time - a.distance) / span))
    }

    /// Unit direction of travel at `time`, if the segment has a length.
    pub fn heading(&self, time: f32) -> Option<Vec2> {
        if self.waypoints.len() < 2 {
            return None;
        }
        let end = self.segment_end(time);
        (self.waypoints[end].position - self.waypoints[end - 1].position).try_normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn vec_approx_eq(a: Vec2, b: Vec2) -> bool {
        approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
    }

    fn arc() -> Vec<Vec2> {
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(100.0, -100.0),
            Vec2::new(200.0, 0.0),
            Vec2::new(300.0, 100.0),
        ]
    }

    // ==================== DE BOOR TESTS ====================

    #[test]
    fn test_evaluate_depth_zero_clamps_index() {
        let points = arc();
        assert_eq!(evaluate(0, 3, -5, 0.0, &points), points[0]);
        assert_eq!(evaluate(0, 3, 2, 0.0, &points), points[2]);
        assert_eq!(evaluate(0, 3, 99, 0.0, &points), points[3]);
    }

    #[test]
    fn test_evaluate_empty_points_is_zero() {
        assert_eq!(evaluate(3, 3, 1, 1.0, &[]), Vec2::ZERO);
    }

    #[test]
    fn test_evaluate_integer_knot_uses_one_four_one_weights() {
        let points = arc();
        // at knot x = 3 the uniform cubic blends P0, P1, P2 with 1/6, 4/6, 1/6
        let expected = (points[0] + points[1] * 4.0 + points[2]) / 6.0;
        let value = evaluate(3, 3, 3, 3.0, &points);
        assert!(vec_approx_eq(value, expected), "{value:?} != {expected:?}");
    }

    #[test]
    fn test_evaluate_is_anchored_to_endpoints() {
        let points = arc();
        assert!(vec_approx_eq(evaluate(3, 3, 1, 1.0, &points), points[0]));
        let end = (points.len() + 2) as f32;
        assert!(vec_approx_eq(
            evaluate(3, 3, end as i32, end, &points),
            points[3]
        ));
    }

    #[test]
    fn test_evaluate_caps_depth_at_degree() {
        let points = arc();
        assert_eq!(
            evaluate(9, 3, 3, 3.5, &points),
            evaluate(3, 3, 3, 3.5, &points)
        );
    }

    // ==================== SAMPLING TESTS ====================

    #[test]
    fn test_sample_bspline_count_and_endpoints() {
        let points = arc();
        let samples = sample_bspline(&points, points.len() * 16);
        assert_eq!(samples.len(), 64);
        assert!(vec_approx_eq(samples[0], points[0]));
        assert_eq!(*samples.last().unwrap(), points[3]);
    }

    #[test]
    fn test_sample_bspline_raises_segment_count() {
        let points = arc();
        let samples = sample_bspline(&points, 1);
        assert_eq!(samples.len(), points.len());
    }

    #[test]
    fn test_sample_bspline_empty() {
        assert!(sample_bspline(&[], 16).is_empty());
    }

    // ==================== REDUCTION TESTS ====================

    #[test]
    fn test_reduce_collinear_three_points_gives_two() {
        let points = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(50.0, 0.0),
            Vec2::new(100.0, 0.0),
        ];
        let dense = sample_bspline(&points, points.len() * 16);
        let reduced = reduce_collinear(&dense, DEFAULT_COLLINEAR_THRESHOLD);
        assert_eq!(reduced.len(), 2);
        assert!(vec_approx_eq(reduced[0], points[0]));
        assert_eq!(reduced[1], points[2]);
    }

    #[test]
    fn test_reduce_collinear_sloped_uneven_line_gives_two() {
        let points = [
            Vec2::new(259.0, 250.0),
            Vec2::new(289.0, 290.0),
            Vec2::new(292.0, 294.0),
        ];
        let dense = sample_bspline(&points, 48);
        assert_eq!(
            reduce_collinear(&dense, DEFAULT_COLLINEAR_THRESHOLD),
            vec![dense[0], points[2]]
        );

        let step = Vec2::new(3.0, 4.0);
        for o in 0..11 {
            let origin = Vec2::new(o as f32 * 29.0 - 100.0, o as f32 * 25.0 - 50.0);
            for k in 1..=11 {
                for m in 1..=11 {
                    let points = [
                        origin,
                        origin + step * k as f32,
                        origin + step * (k + m) as f32,
                    ];
                    let dense = sample_bspline(&points, 48);
                    let reduced = reduce_collinear(&dense, DEFAULT_COLLINEAR_THRESHOLD);
                    assert_eq!(reduced.len(), 2, "{points:?} -> {reduced:?}");
                }
            }
        }
    }

    #[test]
    fn test_path_table_collinear_points_give_two_waypoints() {
        let mut rng = fastrand::Rng::with_seed(0x5eed);
        let mut built = 0;
        while built < 500 {
            let start = Vec2::new(rng.f32(), rng.f32()) * 1000.0 - 500.0;
            let end = Vec2::new(rng.f32(), rng.f32()) * 1000.0 - 500.0;
            if start.distance(end) < 10.0 {
                continue;
            }
            let t = 0.1 + rng.f32() * 0.8;
            let points = [start, start.lerp(end, t), end];
            let table = PathTable::build(
                &points,
                1.0,
                Interpolation::BSpline,
                &CurveSettings::default(),
            );
            assert_eq!(table.waypoints().len(), 2, "{points:?}");
            built += 1;
        }
    }

    #[test]
    fn test_reduce_collinear_keeps_corner() {
        let samples = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(20.0, 0.0),
            Vec2::new(20.0, 10.0),
            Vec2::new(20.0, 20.0),
        ];
        let reduced = reduce_collinear(&samples, DEFAULT_COLLINEAR_THRESHOLD);
        assert_eq!(
            reduced,
            vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(20.0, 0.0),
                Vec2::new(20.0, 20.0)
            ]
        );
    }

    #[test]
    fn test_reduce_collinear_catches_gradual_curvature() {
        // a quarter circle in small steps: each local turn is under the
        // threshold but the chord from the last kept point drifts away
        let samples: Vec<Vec2> = (0..=90)
            .map(|deg| {
                let r = (deg as f32).to_radians();
                Vec2::new(r.cos(), r.sin()) * 100.0
            })
            .collect();
        let reduced = reduce_collinear(&samples, DEFAULT_COLLINEAR_THRESHOLD);
        assert!(reduced.len() > 2);
        assert!(reduced.len() < samples.len());
    }

    #[test]
    fn test_reduce_collinear_degenerate_inputs() {
        assert!(reduce_collinear(&[], 0.999).is_empty());
        let single = [Vec2::new(1.0, 1.0)];
        assert_eq!(reduce_collinear(&single, 0.999), vec![single[0]]);
        let pair = [Vec2::new(1.0, 1.0), Vec2::new(2.0, 2.0)];
        assert_eq!(reduce_collinear(&pair, 0.999), pair.to_vec());
        let repeated = [Vec2::ONE; 5];
        assert_eq!(reduce_collinear(&repeated, 0.999).len(), 2);
    }

    // ==================== PATH TABLE TESTS ====================

    #[test]
    fn test_path_table_distances_span_duration() {
        let table = PathTable::build(
            &arc(),
            2.0,
            Interpolation::BSpline,
            &CurveSettings::default(),
        );
        let waypoints = table.waypoints();
        assert!(waypoints.len() >= 2);
        assert!(approx_eq(waypoints[0].distance, 0.0));
        assert!(approx_eq(table.duration(), 2.0));
        for pair in waypoints.windows(2) {
            assert!(pair[1].distance > pair[0].distance);
        }
    }

    #[test]
    fn test_path_table_sample_endpoints() {
        let points = arc();
        let table = PathTable::build(
            &points,
            1.5,
            Interpolation::BSpline,
            &CurveSettings::default(),
        );
        assert!(vec_approx_eq(table.sample(0.0).unwrap(), points[0]));
        assert_eq!(table.sample(1.5).unwrap(), points[3]);
        assert_eq!(table.sample(10.0).unwrap(), points[3]);
        assert!(vec_approx_eq(table.sample(-1.0).unwrap(), points[0]));
    }

    #[test]
    fn test_path_table_sample_continuous_at_waypoints() {
        let table = PathTable::build(
            &arc(),
            1.0,
            Interpolation::BSpline,
            &CurveSettings::default(),
        );
        for waypoint in &table.waypoints()[1..table.waypoints().len() - 1] {
            let before = table.sample(waypoint.distance - 1e-5).unwrap();
            let at = table.sample(waypoint.distance).unwrap();
            let after = table.sample(waypoint.distance + 1e-5).unwrap();
            assert!(before.distance(at) < 0.05);
            assert!(after.distance(at) < 0.05);
            assert!(vec_approx_eq(at, waypoint.position));
        }
    }

    #[test]
    fn test_path_table_linear_interpolation_midpoint() {
        let points = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(100.0, 0.0),
            Vec2::new(100.0, 100.0),
        ];
        let table = PathTable::build(
            &points,
            2.0,
            Interpolation::Linear,
            &CurveSettings::default(),
        );
        assert_eq!(table.waypoints().len(), 3);
        assert!(vec_approx_eq(table.sample(1.0).unwrap(), points[1]));
        assert!(vec_approx_eq(
            table.sample(0.5).unwrap(),
            Vec2::new(50.0, 0.0)
        ));
        assert!(vec_approx_eq(
            table.sample(1.5).unwrap(),
            Vec2::new(100.0, 50.0)
        ));
    }

    #[test]
    fn test_path_table_zero_length_collapses_to_first_point() {
        let points = [Vec2::new(5.0, 5.0); 3];
        let table = PathTable::build(
            &points,
            1.0,
            Interpolation::BSpline,
            &CurveSettings::default(),
        );
        assert_eq!(table.waypoints().len(), 2);
        for t in [0.0, 0.3, 1.0, 4.0] {
            let p = table.sample(t).unwrap();
            assert!(p.is_finite());
            assert_eq!(p, points[0]);
        }
    }

    #[test]
    fn test_path_table_zero_duration_holds_last_point() {
        let points = [
            Vec2::new(0.0, 0.0),
            Vec2::new(50.0, 50.0),
            Vec2::new(100.0, 0.0),
        ];
        let table = PathTable::build(
            &points,
            0.0,
            Interpolation::BSpline,
            &CurveSettings::default(),
        );
        assert_eq!(table.sample(0.0), Some(points[2]));
        assert_eq!(table.sample(0.5), Some(points[2]));
    }

    #[test]
    fn test_path_table_empty_samples_none() {
        let table = PathTable::build(&[], 1.0, Interpolation::BSpline, &CurveSettings::default());
        assert!(table.is_empty());
        assert!(table.sample(0.5).is_none());
        assert!(table.heading(0.5).is_none());
    }

    #[test]
    fn test_path_table_heading_follows_segment() {
        let points = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(100.0, 0.0),
            Vec2::new(100.0, 100.0),
        ];
        let table = PathTable::build(
            &points,
            2.0,
            Interpolation::Linear,
            &CurveSettings::default(),
        );
        assert!(vec_approx_eq(table.heading(0.5).unwrap(), Vec2::X));
        assert!(vec_approx_eq(table.heading(1.5).unwrap(), Vec2::Y));
        assert!(vec_approx_eq(table.heading(5.0).unwrap(), Vec2::Y));
    }

    #[test]
    fn test_interpolation_from_param() {
        assert_eq!(Interpolation::from_param(0.0), Interpolation::BSpline);
        assert_eq!(Interpolation::from_param(1.0), Interpolation::Linear);
        assert_eq!(Interpolation::from_param(7.0), Interpolation::BSpline);
    }
}
