use super::types::Point;
use std::f64::consts::PI;

pub fn distance(a: Point, b: Point) -> f64 {
  distance_sq(a, b).sqrt()
}

pub fn distance_sq(a: Point, b: Point) -> f64 {
  let dx = a.x - b.x;
  let dy = a.y - b.y;
  dx * dx + dy * dy
}

/// Wraps an angle into (-PI, PI].
pub fn normalize_angle(angle: f64) -> f64 {
  if !angle.is_finite() {
    return 0.0;
  }
  let mut wrapped = angle % (PI * 2.0);
  if wrapped > PI {
    wrapped -= PI * 2.0;
  } else if wrapped <= -PI {
    wrapped += PI * 2.0;
  }
  wrapped
}

/// Signed shortest rotation from `from` to `to`.
pub fn angle_diff(from: f64, to: f64) -> f64 {
  normalize_angle(to - from)
}

pub fn angle_to(from: Point, to: Point) -> f64 {
  (to.y - from.y).atan2(to.x - from.x)
}

pub fn step_along(origin: Point, angle: f64, dist: f64) -> Point {
  Point {
    x: origin.x + angle.cos() * dist,
    y: origin.y + angle.sin() * dist,
  }
}

pub fn out_of_bounds(point: Point, half_world: f64) -> bool {
  point.x.abs() > half_world || point.y.abs() > half_world
}

/// Distance from the point to the nearest wall of the arena.
pub fn wall_distance(point: Point, half_world: f64) -> f64 {
  (half_world - point.x.abs()).min(half_world - point.y.abs())
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
  let factor = 10f64.powi(decimals);
  (value * factor).round() / factor
}
