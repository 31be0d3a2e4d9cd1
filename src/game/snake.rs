use super::config::GameConfig;
use super::constants::{
    BASE_BODY_WIDTH, HEAD_RADIUS_PADDING, MAX_EXTRA_BODY_WIDTH, MAX_SPEED_PENALTY,
    MAX_TURN_PENALTY, SPAWN_PROTECTION_SECS, SPEED_PENALTY_SCORE, TURN_PENALTY_SCORE,
};
use super::math::{distance, step_along};
use super::types::{Owner, Point, Snake, SnakeId};
use std::collections::VecDeque;

pub struct SnakeSpec {
    pub id: SnakeId,
    pub name: String,
    pub skin: usize,
    pub accessory: u8,
    pub owner: Owner,
}

impl Snake {
    pub fn target_length(&self, config: &GameConfig) -> usize {
        target_length_for_score(self.score, config)
    }

    pub fn body_width(&self, config: &GameConfig) -> f64 {
        BASE_BODY_WIDTH + (self.score as f64 * config.width_per_score).min(MAX_EXTRA_BODY_WIDTH)
    }

    pub fn head_radius(&self, config: &GameConfig) -> f64 {
        self.body_width(config) / 2.0 + HEAD_RADIUS_PADDING
    }

    /// Larger snakes are slightly slower; boosting multiplies the result.
    pub fn speed(&self, config: &GameConfig) -> f64 {
        let penalty = (self.score as f64 / SPEED_PENALTY_SCORE).min(MAX_SPEED_PENALTY);
        let base = config.base_speed * (1.0 - penalty);
        if self.boosting {
            base * config.boost_multiplier
        } else {
            base
        }
    }

    /// Radians per second.
    pub fn turn_rate(&self, config: &GameConfig) -> f64 {
        let penalty = (self.score as f64 / TURN_PENALTY_SCORE).min(MAX_TURN_PENALTY);
        config.base_turn_rate * (1.0 - penalty)
    }

    pub fn can_boost(&self, config: &GameConfig) -> bool {
        self.score >= config.boost_min_score
    }
}

pub fn target_length_for_score(score: u32, config: &GameConfig) -> usize {
    config.base_length + (score as f64 * config.length_per_score).floor() as usize
}

/// Lays `len` segments in a straight line trailing behind `heading`.
pub fn create_body(head: Point, heading: f64, len: usize, spacing: f64) -> VecDeque<Point> {
    let mut body = VecDeque::with_capacity(len);
    for index in 0..len {
        body.push_back(step_along(head, heading, -(index as f64) * spacing));
    }
    body
}

pub fn create_snake(spec: SnakeSpec, head: Point, heading: f64, config: &GameConfig) -> Snake {
    let brain = match spec.owner {
        Owner::Bot(_) => Some(super::bot::BotBrain::new(head)),
        Owner::Human(_) => None,
    };
    Snake {
        id: spec.id,
        name: spec.name,
        skin: spec.skin,
        accessory: spec.accessory,
        owner: spec.owner,
        body: create_body(head, heading, config.base_length, config.segment_spacing),
        heading,
        target_heading: heading,
        alive: true,
        score: 0,
        boosting: false,
        boost_clock: 0.0,
        spawn_protection: SPAWN_PROTECTION_SECS,
        respawn_grace: 0.0,
        brain,
    }
}

/// Single relaxation pass: each segment further than `spacing` from its
/// predecessor is pulled back onto the circle of radius `spacing`.
pub fn apply_follow(body: &mut VecDeque<Point>, spacing: f64) {
    for index in 1..body.len() {
        let prev = body[index - 1];
        let current = body[index];
        let dist = distance(prev, current);
        if dist > spacing {
            let ratio = spacing / dist;
            body[index] = Point {
                x: prev.x + (current.x - prev.x) * ratio,
                y: prev.y + (current.y - prev.y) * ratio,
            };
        }
    }
}

/// Grows by cloning the tail while under `target`, otherwise trims while
/// over `target + hysteresis`.
pub fn reconcile_length(body: &mut VecDeque<Point>, target: usize, hysteresis: usize) {
    let Some(&tail) = body.back() else { return };
    if body.len() < target {
        while body.len() < target {
            body.push_back(tail);
        }
        return;
    }
    while body.len() > target + hysteresis {
        body.pop_back();
    }
}

pub fn remove_tail_segment(body: &mut VecDeque<Point>, min_length: usize) -> Option<Point> {
    if body.len() <= min_length.max(1) {
        return None;
    }
    body.pop_back()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight_body(len: usize, spacing: f64) -> VecDeque<Point> {
        create_body(Point::new(0.0, 0.0), 0.0, len, spacing)
    }

    #[test]
    fn create_body_trails_behind_heading() {
        let body = create_body(Point::new(10.0, 0.0), std::f64::consts::FRAC_PI_2, 4, 5.0);
        assert_eq!(body.len(), 4);
        assert!((body[3].x - 10.0).abs() < 1e-9);
        assert!((body[3].y + 15.0).abs() < 1e-9);
    }

    #[test]
    fn follow_pulls_stretched_segments_to_spacing() {
        let mut body = straight_body(5, 5.0);
        body[0] = Point::new(9.0, 3.0);
        apply_follow(&mut body, 5.0);
        for index in 1..body.len() {
            assert!(distance(body[index - 1], body[index]) <= 5.0 + 1e-9);
        }
    }

    #[test]
    fn follow_leaves_compressed_segments_alone() {
        let mut body = straight_body(3, 5.0);
        body[1] = Point::new(-2.0, 0.0);
        let before = body[1];
        apply_follow(&mut body, 5.0);
        assert_eq!(body[1], before);
    }

    #[test]
    fn reconcile_grows_by_cloning_tail() {
        let mut body = straight_body(3, 5.0);
        let tail = *body.back().expect("tail");
        reconcile_length(&mut body, 6, 5);
        assert_eq!(body.len(), 6);
        assert_eq!(body[5], tail);
    }

    #[test]
    fn reconcile_keeps_length_inside_hysteresis_band() {
        let mut body = straight_body(14, 5.0);
        reconcile_length(&mut body, 10, 5);
        assert_eq!(body.len(), 14);

        let mut body = straight_body(20, 5.0);
        reconcile_length(&mut body, 10, 5);
        assert_eq!(body.len(), 15);
    }

    #[test]
    fn tail_removal_respects_minimum() {
        let mut body = straight_body(3, 5.0);
        assert!(remove_tail_segment(&mut body, 3).is_none());
        assert!(remove_tail_segment(&mut body, 2).is_some());
        assert_eq!(body.len(), 2);
    }
}
