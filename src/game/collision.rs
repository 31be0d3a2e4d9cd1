use super::config::GameConfig;
use super::constants::{
    COLLISION_PREFILTER_MARGIN, COLLISION_SKIP_SEGMENTS, EAT_BUFFER, KILL_CREDIT_RATIO,
};
use super::math::distance_sq;
use super::types::{Food, Point, Snake, SnakeId};
use std::collections::HashSet;

/// Frozen view of one snake, captured when the collision phase starts so
/// that every test in the phase reads the same positions.
#[derive(Debug, Clone)]
pub struct CollisionBody {
    pub id: SnakeId,
    pub protected: bool,
    pub score: u32,
    pub head_radius: f64,
    pub half_width: f64,
    pub segments: Vec<Point>,
}

impl CollisionBody {
    pub fn capture(snake: &Snake, config: &GameConfig) -> Self {
        Self {
            id: snake.id,
            protected: snake.is_protected(),
            score: snake.score,
            head_radius: snake.head_radius(config),
            half_width: snake.body_width(config) / 2.0,
            segments: snake.body.iter().copied().collect(),
        }
    }

    fn head(&self) -> Option<Point> {
        self.segments.first().copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fatality {
    /// Head ran into the body of `by`.
    Body { by: SnakeId },
    /// Lost a head-on meeting with `against`.
    HeadOn { against: SnakeId },
}

#[derive(Debug, Default)]
pub struct CollisionOutcome {
    /// Victims in evaluation order.
    pub deaths: Vec<(SnakeId, Fatality)>,
    /// Score awarded to surviving killers.
    pub credits: Vec<(SnakeId, u32)>,
}

/// Removes every food item within reach of the head and credits the snake.
/// Returns how many items were eaten.
pub fn consume_food(snake: &mut Snake, foods: &mut Vec<Food>, config: &GameConfig) -> usize {
    if !snake.alive || snake.body.is_empty() {
        return 0;
    }
    let head = snake.head();
    let reach = snake.head_radius(config) + config.food_radius + EAT_BUFFER;
    let before = foods.len();
    foods.retain(|food| {
        let limit = reach + food.radius;
        distance_sq(head, food.position) >= limit * limit
    });
    let eaten = before - foods.len();
    snake.score = snake
        .score
        .saturating_add(config.food_value.saturating_mul(eaten as u32));
    eaten
}

/// Returns the snake whose body `tester`'s head hits, ignoring each opponent's
/// first few segments.
pub fn find_body_hit(
    tester: &CollisionBody,
    others: &[CollisionBody],
    config: &GameConfig,
) -> Option<SnakeId> {
    let head = tester.head()?;
    for other in others {
        if other.id == tester.id || !within_reach(head, other, config) {
            continue;
        }
        let limit = tester.head_radius + other.half_width;
        let limit_sq = limit * limit;
        let hit = other
            .segments
            .iter()
            .skip(COLLISION_SKIP_SEGMENTS)
            .any(|segment| distance_sq(head, *segment) < limit_sq);
        if hit {
            return Some(other.id);
        }
    }
    None
}

/// Returns an opponent whose head overlaps `tester`'s and is at least as long.
pub fn find_head_on_loss(
    tester: &CollisionBody,
    others: &[CollisionBody],
    config: &GameConfig,
) -> Option<SnakeId> {
    let head = tester.head()?;
    for other in others {
        if other.id == tester.id || !within_reach(head, other, config) {
            continue;
        }
        let Some(other_head) = other.head() else { continue };
        let limit = tester.head_radius + other.head_radius;
        if distance_sq(head, other_head) < limit * limit
            && tester.segments.len() <= other.segments.len()
        {
            return Some(other.id);
        }
    }
    None
}

fn within_reach(head: Point, other: &CollisionBody, config: &GameConfig) -> bool {
    let Some(other_head) = other.head() else { return false };
    let reach = other.segments.len() as f64 * config.segment_spacing + COLLISION_PREFILTER_MARGIN;
    distance_sq(head, other_head) <= reach * reach
}

/// Resolves lethal contacts for every snake in `snapshot`, in slice order.
/// Body hits are found first for everyone; head-on meetings are only judged
/// between snakes that survived the body pass. Protected snakes are never
/// tested, though they still act as obstacles.
pub fn resolve_collisions(snapshot: &[CollisionBody], config: &GameConfig) -> CollisionOutcome {
    let mut outcome = CollisionOutcome::default();
    let mut dead: HashSet<SnakeId> = HashSet::new();
    let mut killers: Vec<(SnakeId, u32)> = Vec::new();

    for tester in snapshot {
        if tester.protected {
            continue;
        }
        if let Some(by) = find_body_hit(tester, snapshot, config) {
            dead.insert(tester.id);
            outcome.deaths.push((tester.id, Fatality::Body { by }));
            killers.push((by, kill_credit(tester.score)));
        }
    }

    let survivors: Vec<CollisionBody> = snapshot
        .iter()
        .filter(|body| !dead.contains(&body.id))
        .cloned()
        .collect();
    for tester in &survivors {
        if tester.protected {
            continue;
        }
        if let Some(against) = find_head_on_loss(tester, &survivors, config) {
            dead.insert(tester.id);
            outcome.deaths.push((tester.id, Fatality::HeadOn { against }));
        }
    }

    outcome.credits = killers
        .into_iter()
        .filter(|(killer, _)| !dead.contains(killer))
        .collect();
    outcome
}

pub fn kill_credit(score: u32) -> u32 {
    (score as f64 * KILL_CREDIT_RATIO).floor() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(id: SnakeId, segments: Vec<Point>, score: u32) -> CollisionBody {
        CollisionBody {
            id,
            protected: false,
            score,
            head_radius: 5.5,
            half_width: 4.0,
            segments,
        }
    }

    fn line(start_x: f64, y: f64, len: usize, step: f64) -> Vec<Point> {
        (0..len)
            .map(|index| Point::new(start_x + index as f64 * step, y))
            .collect()
    }

    #[test]
    fn head_into_body_kills_tester_and_credits_owner() {
        let config = GameConfig::default();
        let victim_segments = {
            let mut segments = vec![Point::new(25.0, 0.0)];
            segments.extend(line(25.0, 10.0, 9, 5.0).into_iter().skip(1));
            segments
        };
        let victim = body(1, victim_segments, 100);
        let owner = body(2, line(0.0, 0.0, 12, 5.0), 10);

        let outcome = resolve_collisions(&[victim, owner], &config);

        assert_eq!(outcome.deaths, vec![(1, Fatality::Body { by: 2 })]);
        assert_eq!(outcome.credits, vec![(2, 15)]);
    }

    #[test]
    fn first_segments_near_opponent_head_are_ignored() {
        let config = GameConfig::default();
        let tester = body(1, line(10.0, 20.0, 10, 5.0), 0);
        let other = body(2, line(0.0, 20.0 + 9.0, 3, 5.0), 0);
        assert!(find_body_hit(&tester, &[other], &config).is_none());
    }

    #[test]
    fn protected_snakes_are_not_tested() {
        let config = GameConfig::default();
        let mut tester = body(1, vec![Point::new(25.0, 0.0), Point::new(25.0, 5.0)], 50);
        tester.protected = true;
        let owner = body(2, line(0.0, 0.0, 12, 5.0), 0);
        let outcome = resolve_collisions(&[tester, owner], &config);
        assert!(outcome.deaths.is_empty());
    }

    #[test]
    fn head_on_shorter_body_dies_even_with_higher_score() {
        let config = GameConfig::default();
        let short = body(1, line(0.0, 0.0, 4, -5.0), 900);
        let mut long_segments = vec![Point::new(3.0, 0.0)];
        long_segments.extend(line(3.0, 30.0, 19, 5.0));
        let long = body(2, long_segments, 3);
        let outcome = resolve_collisions(&[short, long], &config);
        assert_eq!(outcome.deaths, vec![(1, Fatality::HeadOn { against: 2 })]);
        assert!(outcome.credits.is_empty());
    }

    #[test]
    fn mutual_body_hits_kill_both_without_credit() {
        let config = GameConfig::default();
        // Each head sits on the other's fourth segment.
        let a = vec![
            Point::new(0.0, 20.0),
            Point::new(0.0, 25.0),
            Point::new(0.0, 30.0),
            Point::new(20.0, 0.0),
        ];
        let b = vec![
            Point::new(20.0, 0.0),
            Point::new(25.0, 0.0),
            Point::new(30.0, 0.0),
            Point::new(0.0, 20.0),
        ];
        let outcome = resolve_collisions(&[body(1, a, 40), body(2, b, 40)], &config);
        assert_eq!(outcome.deaths.len(), 2);
        assert!(outcome.credits.is_empty());
    }

    #[test]
    fn outcome_does_not_depend_on_snapshot_order() {
        let config = GameConfig::default();
        let owner = body(2, line(0.0, 0.0, 12, 5.0), 10);
        let first_victim = {
            let mut segments = vec![Point::new(25.0, 0.0)];
            segments.extend(line(25.0, 10.0, 9, 5.0).into_iter().skip(1));
            body(1, segments, 100)
        };
        let second_victim = {
            let mut segments = vec![Point::new(45.0, 0.0)];
            segments.extend((2..10).map(|index| Point::new(45.0, index as f64 * -5.0)));
            body(3, segments, 70)
        };
        let short = body(4, line(500.0, 500.0, 4, -5.0), 0);
        let mut long_segments = vec![Point::new(503.0, 500.0)];
        long_segments.extend(line(503.0, 530.0, 9, 5.0));
        let long = body(5, long_segments, 0);

        let forward = vec![owner, first_victim, second_victim, short, long];
        let mut reversed = forward.clone();
        reversed.reverse();
        let mut rotated = forward.clone();
        rotated.rotate_left(2);

        let settle = |snapshot: &[CollisionBody]| {
            let mut outcome = resolve_collisions(snapshot, &config);
            outcome.deaths.sort_by_key(|(id, _)| *id);
            outcome.credits.sort_unstable();
            outcome
        };
        let expected = settle(&forward);
        assert_eq!(
            expected.deaths,
            vec![
                (1, Fatality::Body { by: 2 }),
                (3, Fatality::Body { by: 2 }),
                (4, Fatality::HeadOn { against: 5 }),
            ]
        );
        assert_eq!(expected.credits, vec![(2, 10), (2, 15)]);
        for snapshot in [reversed, rotated] {
            let outcome = settle(&snapshot);
            assert_eq!(outcome.deaths, expected.deaths);
            assert_eq!(outcome.credits, expected.credits);
        }
    }

    #[test]
    fn kill_credit_rounds_down() {
        assert_eq!(kill_credit(0), 0);
        assert_eq!(kill_credit(6), 0);
        assert_eq!(kill_credit(7), 1);
        assert_eq!(kill_credit(101), 15);
    }
}
