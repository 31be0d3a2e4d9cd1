use super::bot::BotBrain;
use std::collections::{BTreeMap, VecDeque};

pub type SnakeId = u64;
pub type FoodId = u64;
pub type SessionId = u64;
pub type SnakeMap = BTreeMap<SnakeId, Snake>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
  pub x: f64,
  pub y: f64,
}

impl Point {
  pub fn new(x: f64, y: f64) -> Self {
    Self { x, y }
  }
}

#[derive(Debug, Clone)]
pub struct Food {
  pub id: FoodId,
  pub position: Point,
  pub radius: f64,
  /// Tint of the pellet. Random for ambient food, the dead snake's skin for
  /// scattered food. State frames carry only position and size, so nothing
  /// in the server reads it yet.
  #[allow(dead_code)]
  pub color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
  Human(SessionId),
  /// Index into the world's bot roster.
  Bot(usize),
}

#[derive(Debug, Clone)]
pub struct Snake {
  pub id: SnakeId,
  pub name: String,
  pub skin: usize,
  pub accessory: u8,
  pub owner: Owner,
  /// Head first.
  pub body: VecDeque<Point>,
  pub heading: f64,
  pub target_heading: f64,
  pub alive: bool,
  pub score: u32,
  pub boosting: bool,
  pub boost_clock: f64,
  pub spawn_protection: f64,
  pub respawn_grace: f64,
  pub brain: Option<BotBrain>,
}

impl Snake {
  pub fn head(&self) -> Point {
    self.body.front().copied().unwrap_or(Point::new(0.0, 0.0))
  }

  pub fn is_bot(&self) -> bool {
    matches!(self.owner, Owner::Bot(_))
  }

  pub fn is_protected(&self) -> bool {
    self.spawn_protection > 0.0 || self.respawn_grace > 0.0
  }
}
