use super::config::GameConfig;
use super::math::{angle_diff, angle_to, distance, distance_sq, normalize_angle, step_along, wall_distance};
use super::types::{Food, FoodId, Point, Snake, SnakeMap};
use rand::Rng;
use std::f64::consts::{FRAC_PI_2, FRAC_PI_3, FRAC_PI_4, PI};

const STUCK_SPEED: f64 = 30.0;
const STUCK_LIMIT_SECS: f64 = 1.0;
const STUCK_REVERSAL: f64 = PI * 0.7;
const STUCK_REVERSAL_SPREAD: f64 = 0.6;
const STUCK_BACKOFF_SECS: f64 = 0.5;
const STUCK_COOLDOWN_SECS: f64 = 0.5;
const BACKOFF_COOLDOWN_SECS: f64 = 0.1;

const WALL_FLEE_DISTANCE: f64 = 200.0;
const WALL_BOOST_DISTANCE: f64 = 100.0;
const WALL_COOLDOWN_SECS: f64 = 0.2;

const LOOK_AHEAD_MIN: f64 = 110.0;
const LOOK_AHEAD_SPEED_SECS: f64 = 0.75;
const PROBE_SAMPLES: usize = 8;
const PROBE_SKIP_SEGMENTS: usize = 2;
const PROBE_PREFILTER_MARGIN: f64 = 60.0;
const PROBE_CLEARANCE: f64 = 10.0;
const OBSTACLE_BOOST_DISTANCE: f64 = 35.0;
const OBSTACLE_COOLDOWN_SECS: f64 = 0.25;
const OBSTACLE_CAUTION_SECS: f64 = 0.5;
const CAUTION_COOLDOWN_SECS: f64 = 0.1;

const DANGER_MARGIN: f64 = 28.0;
const DANGER_PREFILTER_MARGIN: f64 = 90.0;
const DANGER_COOLDOWN_SECS: f64 = 0.15;
const DANGER_CAUTION_SECS: f64 = 0.4;

const FOOD_SEARCH_RANGE: f64 = 300.0;
const CIRCLE_RADIUS_FACTOR: f64 = 1.6;
const CIRCLE_CLOSE_DISTANCE: f64 = 35.0;
const REJECT_BACKOFF_SECS: f64 = 0.3;
const REJECT_COOLDOWN_SECS: f64 = 0.1;
const MAX_REJECTED: usize = 4;
const DECISION_COOLDOWN_MIN_SECS: f64 = 0.3;
const DECISION_COOLDOWN_SPREAD_SECS: f64 = 0.3;
const WANDER_SPREAD: f64 = 0.6;

const SAFE_TURN_PROBE_MIN: f64 = 90.0;
const SAFE_TURN_PROBE_SPEED_SECS: f64 = 0.65;
const SAFE_TURN_OFFSETS: [f64; 14] = [
    0.0, 0.3, -0.3, 0.6, -0.6, 0.95, -0.95, 1.3, -1.3, 1.7, -1.7, 2.2, -2.2, PI,
];

/// What a bot is doing this tick. Reflexes are checked in declaration order
/// (after stuck detection, which lands in `Backoff`) and pre-empt the
/// cooldown-gated `Seeking`/`Wandering` decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotMode {
    Backoff,
    Fleeing,
    AvoidingObstacle,
    Evading,
    Seeking,
    Wandering,
}

#[derive(Debug, Clone)]
pub struct BotBrain {
    pub mode: BotMode,
    pub cooldown: f64,
    pub stuck_time: f64,
    pub backoff: f64,
    /// Seconds left after an avoidance reflex during which the bot holds a
    /// safe heading instead of picking food.
    pub caution: f64,
    /// Food the bot committed to; preferred over a nearer item while it lasts.
    pub food_target: Option<FoodId>,
    pub rejected: Vec<FoodId>,
    pub last_position: Point,
}

impl BotBrain {
    pub fn new(position: Point) -> Self {
        Self {
            mode: BotMode::Wandering,
            cooldown: 0.0,
            stuck_time: 0.0,
            backoff: 0.0,
            caution: 0.0,
            food_target: None,
            rejected: Vec::new(),
            last_position: position,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BotIntent {
    pub heading: f64,
    pub boost: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct Obstacle {
    pub point: Point,
    /// Distance along the probe at which the obstacle was met.
    pub distance: f64,
}

/// Runs one tick of the bot's decision model and returns its steering intent.
/// `me` must be the bot's own (alive) snake; `snakes` may contain it.
pub fn think<R: Rng>(
    brain: &mut BotBrain,
    me: &Snake,
    snakes: &SnakeMap,
    foods: &[Food],
    config: &GameConfig,
    dt: f64,
    rng: &mut R,
) -> BotIntent {
    let head = me.head();
    let mut intent = BotIntent {
        heading: me.target_heading,
        boost: false,
    };

    brain.cooldown -= dt;
    brain.backoff = (brain.backoff - dt).max(0.0);
    brain.caution = (brain.caution - dt).max(0.0);

    if let Some(target) = brain.food_target {
        if !foods.iter().any(|food| food.id == target) {
            brain.food_target = None;
        }
    }

    let moved = distance(head, brain.last_position);
    if moved < STUCK_SPEED * dt {
        brain.stuck_time += dt;
    } else {
        brain.stuck_time = 0.0;
    }
    brain.last_position = head;

    if brain.stuck_time > STUCK_LIMIT_SECS {
        let spread = (rng.gen::<f64>() - 0.5) * STUCK_REVERSAL_SPREAD;
        intent.heading = normalize_angle(me.heading + STUCK_REVERSAL + spread);
        brain.stuck_time = 0.0;
        brain.food_target = None;
        brain.cooldown = STUCK_COOLDOWN_SECS;
        brain.backoff = STUCK_BACKOFF_SECS;
        brain.mode = BotMode::Backoff;
        return intent;
    }

    if brain.backoff > 0.0 {
        intent.heading = safe_turn(me, me.heading, snakes, config);
        brain.cooldown = BACKOFF_COOLDOWN_SECS;
        brain.mode = BotMode::Backoff;
        return intent;
    }

    let wall = wall_distance(head, config.half_world());
    if wall < WALL_FLEE_DISTANCE {
        let flee = angle_to(head, Point::new(0.0, 0.0));
        intent.heading = safe_turn(me, flee, snakes, config);
        // Boosting while still pointed outward would widen the turn.
        let heading_inward = angle_diff(me.heading, flee).abs() < FRAC_PI_2;
        intent.boost = wall < WALL_BOOST_DISTANCE && heading_inward && me.can_boost(config);
        brain.cooldown = WALL_COOLDOWN_SECS;
        brain.food_target = None;
        brain.mode = BotMode::Fleeing;
        return intent;
    }

    let look_ahead = LOOK_AHEAD_MIN.max(me.speed(config) * LOOK_AHEAD_SPEED_SECS);
    if let Some(obstacle) = probe_ahead(me, head, me.heading, look_ahead, snakes, config) {
        let away = angle_to(obstacle.point, head);
        intent.heading = safe_turn(me, away, snakes, config);
        intent.boost = obstacle.distance < OBSTACLE_BOOST_DISTANCE && me.can_boost(config);
        brain.cooldown = OBSTACLE_COOLDOWN_SECS;
        brain.food_target = None;
        brain.caution = OBSTACLE_CAUTION_SECS;
        brain.mode = BotMode::AvoidingObstacle;
        return intent;
    }

    let danger_radius = me.body_width(config) / 2.0 + DANGER_MARGIN;
    if let Some((segment, dist)) = closest_foreign_segment(me, snakes, config) {
        if dist < danger_radius {
            let away = angle_to(segment, head);
            intent.heading = safe_turn(me, away, snakes, config);
            intent.boost = dist < danger_radius * 0.5 && me.can_boost(config);
            brain.cooldown = DANGER_COOLDOWN_SECS;
            brain.food_target = None;
            brain.caution = DANGER_CAUTION_SECS;
            brain.mode = BotMode::Evading;
            return intent;
        }
    }

    if brain.cooldown > 0.0 {
        return intent;
    }

    if brain.caution > 0.0 {
        intent.heading = safe_turn(me, me.heading, snakes, config);
        brain.cooldown = CAUTION_COOLDOWN_SECS;
        brain.food_target = None;
        brain.mode = BotMode::Wandering;
        return intent;
    }

    let nearest = committed_food(head, FOOD_SEARCH_RANGE, brain, foods)
        .or_else(|| nearest_food(head, FOOD_SEARCH_RANGE, &brain.rejected, foods));
    if let Some(food) = nearest {
        if would_circle(me, food.position, config) {
            brain.rejected.push(food.id);
            intent.heading = safe_turn(me, me.heading, snakes, config);
            brain.backoff = REJECT_BACKOFF_SECS;
            brain.cooldown = REJECT_COOLDOWN_SECS;
            brain.mode = BotMode::Backoff;
            return intent;
        }
        brain.food_target = Some(food.id);
        intent.heading = safe_turn(me, angle_to(head, food.position), snakes, config);
        brain.mode = BotMode::Seeking;
    } else {
        let wander = me.heading + (rng.gen::<f64>() - 0.5) * WANDER_SPREAD;
        intent.heading = safe_turn(me, wander, snakes, config);
        brain.food_target = None;
        brain.mode = BotMode::Wandering;
    }
    brain.cooldown = DECISION_COOLDOWN_MIN_SECS + rng.gen::<f64>() * DECISION_COOLDOWN_SPREAD_SECS;
    if brain.rejected.len() > MAX_REJECTED {
        brain.rejected.clear();
    }
    intent
}

/// Samples points along `angle` out to `dist` and reports the first foreign
/// body segment that would brush the bot.
pub fn probe_ahead(
    me: &Snake,
    origin: Point,
    angle: f64,
    dist: f64,
    snakes: &SnakeMap,
    config: &GameConfig,
) -> Option<Obstacle> {
    let step = dist / PROBE_SAMPLES as f64;
    let own_half_width = me.body_width(config) / 2.0;
    for sample in 1..=PROBE_SAMPLES {
        let along = step * sample as f64;
        let point = step_along(origin, angle, along);
        for other in snakes.values() {
            if other.id == me.id || !other.alive || other.body.is_empty() {
                continue;
            }
            let reach = other.body.len() as f64 * config.segment_spacing + PROBE_PREFILTER_MARGIN;
            if distance(point, other.head()) > reach {
                continue;
            }
            let clearance = other.body_width(config) / 2.0 + own_half_width + PROBE_CLEARANCE;
            let clearance_sq = clearance * clearance;
            let hit = other
                .body
                .iter()
                .skip(PROBE_SKIP_SEGMENTS)
                .find(|segment| distance_sq(point, **segment) < clearance_sq);
            if let Some(segment) = hit {
                return Some(Obstacle {
                    point: *segment,
                    distance: along,
                });
            }
        }
    }
    None
}

/// Probes offsets from `base` outward, alternating sides, and returns the
/// first clear heading. Falls back to a full reversal, so a heading is always
/// produced.
pub fn safe_turn(me: &Snake, base: f64, snakes: &SnakeMap, config: &GameConfig) -> f64 {
    let head = me.head();
    let probe = SAFE_TURN_PROBE_MIN.max(me.speed(config) * SAFE_TURN_PROBE_SPEED_SECS);
    for offset in SAFE_TURN_OFFSETS {
        let angle = normalize_angle(base + offset);
        if probe_ahead(me, head, angle, probe, snakes, config).is_none() {
            return angle;
        }
    }
    normalize_angle(base + PI)
}

/// Whether chasing `target` would leave the bot orbiting it because the
/// target sits inside its turning circle.
pub fn would_circle(me: &Snake, target: Point, config: &GameConfig) -> bool {
    let head = me.head();
    let dist = distance(head, target);
    let off_axis = angle_diff(me.heading, angle_to(head, target)).abs();
    let turn_radius = me.speed(config) / me.turn_rate(config);
    if dist < turn_radius * CIRCLE_RADIUS_FACTOR && off_axis > FRAC_PI_3 {
        return true;
    }
    dist < CIRCLE_CLOSE_DISTANCE && off_axis > FRAC_PI_4
}

pub fn nearest_food<'a>(
    origin: Point,
    range: f64,
    rejected: &[FoodId],
    foods: &'a [Food],
) -> Option<&'a Food> {
    let mut best: Option<&Food> = None;
    let mut best_dist = range * range;
    for food in foods {
        if rejected.contains(&food.id) {
            continue;
        }
        let dist = distance_sq(origin, food.position);
        if dist < best_dist {
            best_dist = dist;
            best = Some(food);
        }
    }
    best
}

fn committed_food<'a>(origin: Point, range: f64, brain: &BotBrain, foods: &'a [Food]) -> Option<&'a Food> {
    let target = brain.food_target?;
    if brain.rejected.contains(&target) {
        return None;
    }
    foods
        .iter()
        .find(|food| food.id == target)
        .filter(|food| distance_sq(origin, food.position) < range * range)
}

fn closest_foreign_segment(me: &Snake, snakes: &SnakeMap, config: &GameConfig) -> Option<(Point, f64)> {
    let head = me.head();
    let mut closest: Option<(Point, f64)> = None;
    for other in snakes.values() {
        if other.id == me.id || !other.alive || other.body.is_empty() {
            continue;
        }
        let reach = other.body.len() as f64 * config.segment_spacing + DANGER_PREFILTER_MARGIN;
        if distance(head, other.head()) > reach {
            continue;
        }
        for segment in other.body.iter().skip(PROBE_SKIP_SEGMENTS) {
            let dist = distance(head, *segment);
            match closest {
                Some((_, best)) if dist >= best => {}
                _ => closest = Some((*segment, dist)),
            }
        }
    }
    closest
}
