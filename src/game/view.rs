use super::config::GameConfig;
use super::constants::LEADERBOARD_SIZE;
use super::math::{distance_sq, round_to};
use super::types::{Food, Point, Snake, SnakeId, SnakeMap};
use crate::protocol::{LeaderboardEntry, StateFrame, VisibleSnake};
use std::cmp::Reverse;

const COORD_DECIMALS: i32 = 1;
const HEADING_DECIMALS: i32 = 2;
const SEGMENT_STRIDE: usize = 2;

/// Top living snakes by score. Ties keep the older snake first.
pub fn build_leaderboard(snakes: &SnakeMap) -> Vec<LeaderboardEntry> {
    let mut ranked: Vec<&Snake> = snakes.values().filter(|snake| snake.alive).collect();
    ranked.sort_by_key(|snake| (Reverse(snake.score), snake.id));
    ranked
        .into_iter()
        .take(LEADERBOARD_SIZE)
        .map(|snake| LeaderboardEntry {
            name: snake.name.clone(),
            score: snake.score,
        })
        .collect()
}

/// A snake is sent when any part of it could be on screen: its head lies
/// within the view radius padded by the body's nominal length.
pub fn is_snake_visible(snake: &Snake, center: Point, config: &GameConfig) -> bool {
    if !snake.alive || snake.body.is_empty() {
        return false;
    }
    let reach = config.view_radius + snake.body.len() as f64 * config.segment_spacing;
    distance_sq(snake.head(), center) <= reach * reach
}

pub fn is_food_visible(food: &Food, center: Point, config: &GameConfig) -> bool {
    distance_sq(food.position, center) <= config.view_radius * config.view_radius
}

pub fn build_state_frame(
    viewer: Option<SnakeId>,
    center: Point,
    snakes: &SnakeMap,
    foods: &[Food],
    leaderboard: &[LeaderboardEntry],
    config: &GameConfig,
) -> StateFrame {
    let visible_snakes = snakes
        .values()
        .filter(|snake| is_snake_visible(snake, center, config))
        .map(visible_snake)
        .collect();

    let mut food = Vec::new();
    for item in foods.iter().filter(|item| is_food_visible(item, center, config)) {
        food.push(round_to(item.position.x, COORD_DECIMALS));
        food.push(round_to(item.position.y, COORD_DECIMALS));
        food.push(round_to(item.radius, COORD_DECIMALS));
    }

    StateFrame {
        pid: viewer.unwrap_or(0),
        snakes: visible_snakes,
        food,
        lb: leaderboard.to_vec(),
    }
}

fn visible_snake(snake: &Snake) -> VisibleSnake {
    VisibleSnake {
        id: snake.id,
        name: snake.name.clone(),
        skin: snake.skin,
        accessory: snake.accessory,
        heading: round_to(snake.heading, HEADING_DECIMALS),
        score: snake.score,
        boosting: u8::from(snake.boosting),
        segments: downsample(snake),
    }
}

fn downsample(snake: &Snake) -> Vec<f64> {
    let mut segments = Vec::with_capacity(snake.body.len() + 1);
    for point in snake.body.iter().step_by(SEGMENT_STRIDE) {
        segments.push(round_to(point.x, COORD_DECIMALS));
        segments.push(round_to(point.y, COORD_DECIMALS));
    }
    segments
}
