//! Dense enemy route built from sparse waypoints.

use glam::Vec2;

/// Expands consecutive waypoint pairs into evenly subdivided traversal points.
///
/// Each segment is split into `ceil(max(|dx|, |dy|) / step_size)` increments,
/// computed independently per segment, so spacing is at most `step_size` and
/// only exactly `step_size` when the segment length is a multiple of it. Both
/// endpoints of every segment are emitted, which means consecutive segments
/// share (and duplicate) their boundary point. Zero-length segments yield
/// their point twice. Fewer than two waypoints produce an empty route.
#[must_use]
pub fn generate_path(waypoints: &[Vec2], step_size: f32) -> Vec<Vec2> {
    let mut path = Vec::new();
    if !(step_size > 0.0) {
        return path;
    }

    for segment in waypoints.windows(2) {
        let (start, end) = (segment[0], segment[1]);
        let delta = end - start;
        let span = delta.x.abs().max(delta.y.abs());
        let steps = (span / step_size).ceil().max(1.0) as u32;
        let increment = delta / steps as f32;

        path.reserve(steps as usize + 1);
        for step in 0..steps {
            path.push(start + increment * step as f32);
        }
        path.push(end);
    }

    path
}
