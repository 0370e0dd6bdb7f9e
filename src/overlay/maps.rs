use vello_cpu::kurbo::{Affine, BezPath, Circle, Shape, Stroke};

use crate::foundation::core::Point;
use crate::geo::project::{local_zoom_range, project_global, project_local};
use crate::overlay::style::{
    MARKER_COLOR, RADAR_BACKGROUND, RADAR_BORDER, Rgba, TRAIL_AHEAD_COLOR, TRAIL_BEHIND_COLOR,
};
use crate::telemetry::series::{GeoBounds, GeoPoint};

/// Flattening tolerance for circles.
const CIRCLE_TOLERANCE: f64 = 0.1;

fn paint(ctx: &mut vello_cpu::RenderContext, color: Rgba) {
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
        color[0], color[1], color[2], color[3],
    ));
}

fn fill_dot(ctx: &mut vello_cpu::RenderContext, center: Point, radius: f64, color: Rgba) {
    paint(ctx, color);
    ctx.fill_path(&Circle::new((center.x, center.y), radius).to_path(CIRCLE_TOLERANCE));
}

fn stroke_polyline(ctx: &mut vello_cpu::RenderContext, path: &BezPath, width: f64, color: Rgba) {
    if path.elements().is_empty() {
        return;
    }
    paint(ctx, color);
    ctx.set_stroke(Stroke::new(width));
    ctx.stroke_path(path);
}

/// Squared-distance circle membership test.
pub(crate) fn point_in_circle(x: f64, y: f64, cx: f64, cy: f64, radius: f64) -> bool {
    let dx = x - cx;
    let dy = y - cy;
    dx * dx + dy * dy <= radius * radius
}

/// Polyline through every fix of `trail`, projected onto the global map.
///
/// Gaps in the trail do not break the line; the polyline connects the fixes
/// on either side of a dropout.
fn global_trail_path(
    trail: &[Option<GeoPoint>],
    bounds: &GeoBounds,
    map_x: f64,
    map_y: f64,
    map_size: f64,
) -> BezPath {
    let mut path = BezPath::new();
    let mut started = false;
    for fix in trail.iter().filter_map(|f| *f) {
        let p = project_global(fix, bounds, map_size);
        let (x, y) = (map_x + p.x, map_y + p.y);
        if started {
            path.line_to((x, y));
        } else {
            path.move_to((x, y));
            started = true;
        }
    }
    path
}

/// Draw the global route map: the full trail, the traveled prefix redrawn
/// dimmer and thicker, and dots on the start and current positions.
pub(crate) fn draw_route_map(
    ctx: &mut vello_cpu::RenderContext,
    trail: &[Option<GeoPoint>],
    bounds: &GeoBounds,
    current_index: usize,
    map_x: f64,
    map_y: f64,
    map_size: f64,
) {
    if trail.is_empty() {
        return;
    }
    ctx.set_transform(Affine::IDENTITY);

    let ahead_width = (map_size * 0.008).max(3.0);
    let behind_width = (map_size * 0.012).max(5.0);
    let dot_radius = (map_size * 0.02).max(12.0);

    let full = global_trail_path(trail, bounds, map_x, map_y, map_size);
    stroke_polyline(ctx, &full, ahead_width, TRAIL_AHEAD_COLOR);

    let prefix_end = (current_index + 1).min(trail.len());
    let behind = global_trail_path(&trail[..prefix_end], bounds, map_x, map_y, map_size);
    stroke_polyline(ctx, &behind, behind_width, TRAIL_BEHIND_COLOR);

    if let Some(Some(start)) = trail.first() {
        let p = project_global(*start, bounds, map_size);
        fill_dot(
            ctx,
            Point::new(map_x + p.x, map_y + p.y),
            dot_radius,
            MARKER_COLOR,
        );
    }
    if let Some(Some(current)) = trail.get(current_index) {
        let p = project_global(*current, bounds, map_size);
        fill_dot(
            ctx,
            Point::new(map_x + p.x, map_y + p.y),
            dot_radius,
            MARKER_COLOR,
        );
    }
}

/// Draw the radar map: a circularly masked local view recentered on the
/// current position every frame.
///
/// A trail segment is drawn only when both endpoints sit inside the degree
/// window and inside the circular mask; a segment is dropped, never clipped,
/// so no chord is drawn across an exit/re-entry gap. The current position is
/// a fixed dot at the exact center; the border ring goes on last.
pub(crate) fn draw_radar_map(
    ctx: &mut vello_cpu::RenderContext,
    trail: &[Option<GeoPoint>],
    current_index: usize,
    map_x: f64,
    map_y: f64,
    map_size: f64,
    window_meters: f64,
) {
    if trail.is_empty() || current_index >= trail.len() {
        return;
    }
    let Some(center) = trail[current_index] else {
        // No fix right now, nothing to recenter on.
        return;
    };
    ctx.set_transform(Affine::IDENTITY);

    let zoom_range = local_zoom_range(window_meters);
    let radius = map_size / 2.0;
    let cx = map_x + radius;
    let cy = map_y + radius;

    let disc = Circle::new((cx, cy), radius).to_path(CIRCLE_TOLERANCE);
    paint(ctx, RADAR_BACKGROUND);
    ctx.fill_path(&disc);

    let line_width = (map_size * 0.01).max(2.0);
    let dot_radius = (map_size * 0.03).max(6.0);

    let mut behind = BezPath::new();
    let mut ahead = BezPath::new();
    let mut prev: Option<(f64, f64)> = None;
    for (i, fix) in trail.iter().enumerate() {
        let Some(p) = fix else {
            prev = None;
            continue;
        };
        let in_window =
            (p.lat - center.lat).abs() <= zoom_range && (p.lon - center.lon).abs() <= zoom_range;
        if !in_window {
            prev = None;
            continue;
        }
        let px = project_local(*p, Some(center), zoom_range, map_size);
        let (x, y) = (map_x + px.x, map_y + px.y);
        if !point_in_circle(x, y, cx, cy, radius) {
            prev = None;
            continue;
        }
        if let Some((ox, oy)) = prev {
            let path = if i <= current_index { &mut behind } else { &mut ahead };
            path.move_to((ox, oy));
            path.line_to((x, y));
        }
        prev = Some((x, y));
    }
    stroke_polyline(ctx, &behind, line_width, TRAIL_BEHIND_COLOR);
    stroke_polyline(ctx, &ahead, line_width, TRAIL_AHEAD_COLOR);

    fill_dot(ctx, Point::new(cx, cy), dot_radius, MARKER_COLOR);

    paint(ctx, RADAR_BORDER);
    ctx.set_stroke(Stroke::new(2.0));
    ctx.stroke_path(&disc);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_is_always_in_circle() {
        assert!(point_in_circle(50.0, 50.0, 50.0, 50.0, 30.0));
    }

    #[test]
    fn beyond_radius_is_out() {
        assert!(!point_in_circle(81.0, 50.0, 50.0, 50.0, 30.0));
        assert!(point_in_circle(80.0, 50.0, 50.0, 50.0, 30.0));
    }

    #[test]
    fn boundary_is_inclusive() {
        // Exactly on the rim counts as inside (<=, squared distances).
        assert!(point_in_circle(0.0, 40.0, 0.0, 0.0, 40.0));
    }

    #[test]
    fn empty_trail_draws_nothing() {
        let mut ctx = vello_cpu::RenderContext::new(64, 64);
        let bounds = GeoBounds {
            lat_min: 0.0,
            lat_max: 0.0,
            lon_min: 0.0,
            lon_max: 0.0,
            coord_range: 0.0,
        };
        draw_route_map(&mut ctx, &[], &bounds, 0, 0.0, 0.0, 32.0);
        draw_radar_map(&mut ctx, &[], 0, 0.0, 0.0, 32.0, 100.0);
    }

    #[test]
    fn radar_without_current_fix_draws_nothing() {
        let mut ctx = vello_cpu::RenderContext::new(64, 64);
        let trail = [Some(GeoPoint { lat: 40.0, lon: -75.0 }), None];
        draw_radar_map(&mut ctx, &trail, 1, 0.0, 0.0, 32.0, 100.0);
    }
}
