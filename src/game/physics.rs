use super::config::GameConfig;
use super::constants::{BOOST_EPSILON, BOOST_SHED_JITTER, BOOST_SHED_MARGIN};
use super::math::{angle_diff, normalize_angle, out_of_bounds, step_along};
use super::snake::{apply_follow, reconcile_length, remove_tail_segment};
use super::types::{Point, Snake};
use rand::Rng;

#[derive(Debug, Default)]
pub struct MoveReport {
    /// Jittered positions of tail segments shed while boosting.
    pub shed: Vec<Point>,
    pub left_world: bool,
}

/// Advances one snake by `dt` seconds: boost drain, steering, translation,
/// boundary check, follow pass and length reconciliation, in that order.
/// A snake that leaves the world is reported and otherwise left untouched
/// past the head move; the caller owns the kill.
pub fn advance<R: Rng>(snake: &mut Snake, dt: f64, config: &GameConfig, rng: &mut R) -> MoveReport {
    let mut report = MoveReport::default();
    if !snake.alive || snake.body.is_empty() {
        return report;
    }

    tick_timers(snake, dt);
    drain_boost(snake, dt, config, rng, &mut report.shed);
    steer(snake, dt, config);

    let speed = snake.speed(config);
    let head = step_along(snake.head(), snake.heading, speed * dt);
    snake.body[0] = head;
    if out_of_bounds(head, config.half_world()) {
        report.left_world = true;
        return report;
    }

    apply_follow(&mut snake.body, config.segment_spacing);
    let target = snake.target_length(config);
    reconcile_length(&mut snake.body, target, config.length_hysteresis);
    report
}

fn tick_timers(snake: &mut Snake, dt: f64) {
    if snake.spawn_protection > 0.0 {
        snake.spawn_protection = (snake.spawn_protection - dt).max(0.0);
    }
    if snake.respawn_grace > 0.0 {
        snake.respawn_grace = (snake.respawn_grace - dt).max(0.0);
    }
}

fn drain_boost<R: Rng>(
    snake: &mut Snake,
    dt: f64,
    config: &GameConfig,
    rng: &mut R,
    shed: &mut Vec<Point>,
) {
    if !snake.boosting {
        snake.boost_clock = 0.0;
        return;
    }
    if !snake.can_boost(config) {
        snake.boosting = false;
        snake.boost_clock = 0.0;
        return;
    }

    let interval = config.boost_drain_interval();
    snake.boost_clock += dt;
    while snake.boost_clock + BOOST_EPSILON >= interval {
        snake.boost_clock = (snake.boost_clock - interval).max(0.0);
        snake.score = snake.score.saturating_sub(1);

        if snake.body.len() > snake.target_length(config) + BOOST_SHED_MARGIN {
            if let Some(tail) = remove_tail_segment(&mut snake.body, 1) {
                shed.push(Point {
                    x: tail.x + (rng.gen::<f64>() - 0.5) * BOOST_SHED_JITTER,
                    y: tail.y + (rng.gen::<f64>() - 0.5) * BOOST_SHED_JITTER,
                });
            }
        }

        if !snake.can_boost(config) {
            snake.boosting = false;
            snake.boost_clock = 0.0;
            break;
        }
    }
}

fn steer(snake: &mut Snake, dt: f64, config: &GameConfig) {
    let diff = angle_diff(snake.heading, snake.target_heading);
    let max_step = snake.turn_rate(config) * dt;
    if diff.abs() <= max_step {
        snake.heading = normalize_angle(snake.target_heading);
    } else {
        snake.heading = normalize_angle(snake.heading + diff.signum() * max_step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::math::distance;
    use crate::game::snake::{create_snake, SnakeSpec};
    use crate::game::types::Owner;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn make_snake(head: Point, heading: f64, config: &GameConfig) -> Snake {
        let mut snake = create_snake(
            SnakeSpec {
                id: 1,
                name: "Test".to_string(),
                skin: 0,
                accessory: 0,
                owner: Owner::Human(1),
            },
            head,
            heading,
            config,
        );
        snake.spawn_protection = 0.0;
        snake
    }

    #[test]
    fn steering_is_clamped_to_turn_rate() {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut snake = make_snake(Point::new(0.0, 0.0), 0.0, &config);
        snake.target_heading = std::f64::consts::FRAC_PI_2;
        advance(&mut snake, 0.05, &config, &mut rng);
        let expected = config.base_turn_rate * 0.05;
        assert!((snake.heading - expected).abs() < 1e-9);
    }

    #[test]
    fn small_heading_error_snaps_to_target() {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut snake = make_snake(Point::new(0.0, 0.0), 0.0, &config);
        snake.target_heading = 0.01;
        advance(&mut snake, 0.05, &config, &mut rng);
        assert!((snake.heading - 0.01).abs() < 1e-12);
    }

    #[test]
    fn head_moves_by_speed_times_dt() {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(2);
        let mut snake = make_snake(Point::new(0.0, 0.0), 0.0, &config);
        advance(&mut snake, 0.05, &config, &mut rng);
        assert!((snake.head().x - config.base_speed * 0.05).abs() < 1e-9);
        assert!(snake.head().y.abs() < 1e-9);
    }

    #[test]
    fn leaving_the_world_is_reported() {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        let mut snake = make_snake(Point::new(config.half_world() - 1.0, 0.0), 0.0, &config);
        let report = advance(&mut snake, 0.05, &config, &mut rng);
        assert!(report.left_world);
    }

    #[test]
    fn body_spacing_and_length_hold_after_a_step() {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(4);
        let mut snake = make_snake(Point::new(0.0, 0.0), 0.0, &config);
        snake.score = 30;
        snake.target_heading = 2.5;
        for _ in 0..40 {
            advance(&mut snake, 0.05, &config, &mut rng);
            let target = snake.target_length(&config);
            assert!(snake.body.len() >= target);
            assert!(snake.body.len() <= target + config.length_hysteresis);
            for index in 1..snake.body.len() {
                let gap = distance(snake.body[index - 1], snake.body[index]);
                assert!(gap <= config.segment_spacing + 1e-9);
            }
        }
    }

    #[test]
    fn boost_drains_one_point_and_sheds_one_segment_per_interval() {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(5);
        let mut snake = make_snake(Point::new(0.0, 0.0), 0.0, &config);
        snake.score = 40;
        let tail = *snake.body.back().expect("tail");
        while snake.body.len() < 40 {
            snake.body.push_back(tail);
        }
        snake.boosting = true;

        let report = advance(&mut snake, 1.0, &config, &mut rng);

        assert_eq!(snake.score, 32);
        assert_eq!(report.shed.len(), 8);
        assert!(snake.boosting);
    }

    #[test]
    fn boost_accumulates_fractional_time_across_ticks() {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(6);
        let mut snake = make_snake(Point::new(0.0, 0.0), 0.0, &config);
        snake.score = 200;
        snake.boosting = true;
        for _ in 0..100 {
            advance(&mut snake, 0.05, &config, &mut rng);
        }
        // 5 seconds at 8 points per second.
        assert_eq!(snake.score, 160);
    }

    #[test]
    fn boost_turns_off_below_minimum() {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        let mut snake = make_snake(Point::new(0.0, 0.0), 0.0, &config);
        snake.score = config.boost_min_score + 1;
        snake.boosting = true;

        advance(&mut snake, 0.5, &config, &mut rng);

        assert_eq!(snake.score, config.boost_min_score - 1);
        assert!(!snake.boosting);
    }

    #[test]
    fn boosting_without_minimum_score_is_cancelled() {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(8);
        let mut snake = make_snake(Point::new(0.0, 0.0), 0.0, &config);
        snake.score = 5;
        snake.boosting = true;
        advance(&mut snake, 0.05, &config, &mut rng);
        assert!(!snake.boosting);
        assert_eq!(snake.score, 5);
    }
}
