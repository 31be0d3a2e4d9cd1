use super::bot::think;
use super::collision::{consume_food, resolve_collisions, CollisionBody, Fatality};
use super::config::GameConfig;
use super::constants::{
  BOOST_SHED_RADIUS_SCALE, BOT_ACCESSORY_CHANCE, BOT_NAMES, BOT_RESPAWN_DELAY_MIN_SECS,
  BOT_RESPAWN_DELAY_SPREAD_SECS, BOT_RESPAWN_GRACE_SECS, DEATH_FOOD_EXTRA_RADIUS,
  DEATH_FOOD_JITTER, DEATH_SCATTER_RATIO, FOOD_TOP_UP_CHANCE, MAX_ACCESSORY, MAX_SPAWN_ATTEMPTS,
  SKINS, SPAWN_FALLBACK_REGION_RATIO, SPAWN_MIN_HEAD_DISTANCE, SPAWN_REGION_RATIO,
};
use super::input::{parse_accessory, parse_heading, parse_skin};
use super::math::distance_sq;
use super::physics::advance;
use super::room::session::LatestFrame;
use super::snake::{create_snake, SnakeSpec};
use super::types::{Food, FoodId, Owner, Point, SessionId, SnakeId, SnakeMap};
use super::view::{build_leaderboard, build_state_frame};
use crate::protocol::{encode_server_message, Appearance, ClientMessage, ServerMessage};
use crate::shared::names::sanitize_player_name;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Debug)]
struct SessionEntry {
  snake_id: Option<SnakeId>,
  /// Where this viewer last looked; kept after death so the camera stays put.
  view_center: Point,
  events: mpsc::Sender<String>,
  state: Arc<LatestFrame>,
}

#[derive(Debug, Clone)]
struct BotSlot {
  name: String,
  skin: usize,
  snake_id: Option<SnakeId>,
}

#[derive(Debug, Clone, Copy)]
struct PendingRespawn {
  slot: usize,
  due: f64,
}

/// Authoritative simulation state. Every mutation goes through `&mut self`,
/// so the tick phases and inbound intents are serialized by whoever owns it.
#[derive(Debug)]
pub struct World {
  config: GameConfig,
  snakes: SnakeMap,
  foods: Vec<Food>,
  sessions: BTreeMap<SessionId, SessionEntry>,
  bot_slots: Vec<BotSlot>,
  pending_respawns: Vec<PendingRespawn>,
  clock: f64,
  next_id: u64,
  rng: StdRng,
}

impl World {
  pub fn new(config: GameConfig) -> Self {
    match config.seed {
      Some(seed) => Self::with_seed(config, seed),
      None => Self::with_rng(config, StdRng::from_entropy()),
    }
  }

  pub fn with_seed(config: GameConfig, seed: u64) -> Self {
    Self::with_rng(config, StdRng::seed_from_u64(seed))
  }

  fn with_rng(config: GameConfig, rng: StdRng) -> Self {
    let mut world = Self {
      config,
      snakes: SnakeMap::new(),
      foods: Vec::new(),
      sessions: BTreeMap::new(),
      bot_slots: Vec::new(),
      pending_respawns: Vec::new(),
      clock: 0.0,
      // 0 is reserved for "no snake" in state frames.
      next_id: 1,
      rng,
    };
    while world.foods.len() < world.config.food_count {
      world.spawn_random_food();
    }
    for index in 0..world.config.bot_count {
      let skin = world.rng.gen_range(0..SKINS.len());
      world.bot_slots.push(BotSlot {
        name: BOT_NAMES[index % BOT_NAMES.len()].to_string(),
        skin,
        snake_id: None,
      });
      world.spawn_bot(index);
    }
    tracing::info!(
      food = world.foods.len(),
      bots = world.bot_slots.len(),
      world_size = world.config.world_size,
      "world initialized"
    );
    world
  }

  pub fn config(&self) -> &GameConfig {
    &self.config
  }

  pub fn session_snake(&self, session_id: SessionId) -> Option<SnakeId> {
    self.sessions.get(&session_id)?.snake_id
  }

  /// Runs one fixed step: respawns, bot decisions, movement, eating and
  /// collisions, food top-up, then a snapshot for every session.
  pub fn tick(&mut self, dt: f64) {
    self.clock += dt;
    self.process_respawns();
    self.think_bots(dt);
    self.move_snakes(dt);
    self.resolve_contacts();
    self.top_up_food();
    self.broadcast();
  }

  pub fn add_session(&mut self, events: mpsc::Sender<String>, state: Arc<LatestFrame>) -> SessionId {
    let session_id = self.allocate_id();
    let entry = SessionEntry {
      snake_id: None,
      view_center: Point::new(0.0, 0.0),
      events,
      state,
    };
    send_event(
      &entry,
      &ServerMessage::Welcome {
        id: session_id,
        world: self.config.world_size,
      },
    );
    self.sessions.insert(session_id, entry);
    tracing::info!(session_id, sessions = self.sessions.len(), "session connected");
    session_id
  }

  pub fn apply_message(&mut self, session_id: SessionId, message: ClientMessage) {
    match message {
      ClientMessage::Join(appearance) | ClientMessage::Respawn(appearance) => {
        self.join(session_id, appearance);
      }
      ClientMessage::Input { heading, boost } => self.set_input(session_id, heading, boost),
    }
  }

  /// Creates a snake for a session that has none. Ignored while the session
  /// still owns a living snake.
  pub fn join(&mut self, session_id: SessionId, appearance: Appearance) -> Option<SnakeId> {
    let entry = self.sessions.get(&session_id)?;
    if entry.snake_id.is_some() {
      return None;
    }
    let name = sanitize_player_name(appearance.name.as_deref().unwrap_or_default(), "Player");
    let skin = parse_skin(appearance.skin);
    let accessory = parse_accessory(appearance.accessory);
    let snake_id = self.place_snake(name, skin, accessory, Owner::Human(session_id));

    let entry = self.sessions.get_mut(&session_id)?;
    entry.snake_id = Some(snake_id);
    send_event(entry, &ServerMessage::Spawned { id: snake_id });
    tracing::debug!(session_id, snake_id, "player spawned");
    Some(snake_id)
  }

  /// Heading and boost land together or not at all.
  pub fn set_input(&mut self, session_id: SessionId, heading: f64, boost: bool) {
    let Some(heading) = parse_heading(heading) else { return };
    let Some(snake_id) = self.session_snake(session_id) else { return };
    let Some(snake) = self.snakes.get_mut(&snake_id) else { return };
    snake.target_heading = heading;
    snake.boosting = boost && snake.can_boost(&self.config);
  }

  /// Kills the session's snake through the normal death path, then forgets
  /// the session.
  pub fn disconnect_session(&mut self, session_id: SessionId) {
    if let Some(snake_id) = self.session_snake(session_id) {
      self.kill(snake_id);
    }
    if self.sessions.remove(&session_id).is_some() {
      tracing::info!(session_id, sessions = self.sessions.len(), "session disconnected");
    }
  }

  /// Bots in roster order, then humans in session order.
  fn evaluation_order(&self) -> Vec<SnakeId> {
    let mut order: Vec<(u8, u64, SnakeId)> = self
      .snakes
      .values()
      .map(|snake| match snake.owner {
        Owner::Bot(slot) => (0, slot as u64, snake.id),
        Owner::Human(session_id) => (1, session_id, snake.id),
      })
      .collect();
    order.sort_unstable();
    order.into_iter().map(|(_, _, id)| id).collect()
  }

  fn think_bots(&mut self, dt: f64) {
    for slot in 0..self.bot_slots.len() {
      let Some(snake_id) = self.bot_slots[slot].snake_id else { continue };
      let Some(mut brain) = self.snakes.get_mut(&snake_id).and_then(|snake| snake.brain.take()) else {
        continue;
      };
      let Some(me) = self.snakes.get(&snake_id) else { continue };
      let intent = think(
        &mut brain,
        me,
        &self.snakes,
        &self.foods,
        &self.config,
        dt,
        &mut self.rng,
      );
      if let Some(snake) = self.snakes.get_mut(&snake_id) {
        snake.target_heading = intent.heading;
        snake.boosting = intent.boost && snake.can_boost(&self.config);
        snake.brain = Some(brain);
      }
    }
  }

  fn move_snakes(&mut self, dt: f64) {
    let shed_radius = self.config.food_radius * BOOST_SHED_RADIUS_SCALE;
    for snake_id in self.evaluation_order() {
      let Some(snake) = self.snakes.get_mut(&snake_id) else { continue };
      let report = advance(snake, dt, &self.config, &mut self.rng);
      let color = skin_color(snake.skin);
      for position in report.shed {
        self.push_food(position, shed_radius, color.to_string());
      }
      if report.left_world {
        tracing::debug!(snake_id, "left the world");
        self.kill(snake_id);
      }
    }
  }

  /// Everyone eats first, then lethal contacts are judged against one
  /// snapshot so the outcome does not depend on iteration order.
  fn resolve_contacts(&mut self) {
    let order = self.evaluation_order();
    for snake_id in &order {
      if let Some(snake) = self.snakes.get_mut(snake_id) {
        consume_food(snake, &mut self.foods, &self.config);
      }
    }

    let snapshot: Vec<CollisionBody> = order
      .iter()
      .filter_map(|snake_id| self.snakes.get(snake_id))
      .map(|snake| CollisionBody::capture(snake, &self.config))
      .collect();
    let outcome = resolve_collisions(&snapshot, &self.config);

    for (killer, credit) in outcome.credits {
      if let Some(snake) = self.snakes.get_mut(&killer) {
        snake.score = snake.score.saturating_add(credit);
      }
    }
    for (victim, fatality) in outcome.deaths {
      let killer = match fatality {
        Fatality::Body { by } => by,
        Fatality::HeadOn { against } => against,
      };
      tracing::debug!(snake_id = victim, killer, ?fatality, "collision");
      self.kill(victim);
    }
  }

  /// Removes the snake, scatters food along its body and routes the death to
  /// its owner. A second call for the same id is a no-op.
  fn kill(&mut self, snake_id: SnakeId) {
    let Some(mut snake) = self.snakes.remove(&snake_id) else { return };
    snake.alive = false;

    let count = scatter_count(snake.score, snake.body.len(), self.config.food_value);
    let radius = self.config.food_radius + DEATH_FOOD_EXTRA_RADIUS;
    let color = skin_color(snake.skin);
    for segment in snake.body.iter().take(count) {
      let position = Point::new(
        segment.x + (self.rng.gen::<f64>() - 0.5) * DEATH_FOOD_JITTER,
        segment.y + (self.rng.gen::<f64>() - 0.5) * DEATH_FOOD_JITTER,
      );
      self.push_food(position, radius, color.to_string());
    }
    tracing::debug!(
      snake_id,
      score = snake.score,
      bot = snake.is_bot(),
      scattered = count,
      "snake died"
    );

    match snake.owner {
      Owner::Bot(slot) => {
        if let Some(entry) = self.bot_slots.get_mut(slot) {
          entry.snake_id = None;
        }
        let delay =
          BOT_RESPAWN_DELAY_MIN_SECS + self.rng.gen::<f64>() * BOT_RESPAWN_DELAY_SPREAD_SECS;
        self.pending_respawns.push(PendingRespawn {
          slot,
          due: self.clock + delay,
        });
      }
      Owner::Human(session_id) => {
        let Some(entry) = self.sessions.get_mut(&session_id) else { return };
        if entry.snake_id == Some(snake_id) {
          entry.snake_id = None;
          send_event(entry, &ServerMessage::Death { score: snake.score });
        }
      }
    }
  }

  fn process_respawns(&mut self) {
    if self.pending_respawns.is_empty() {
      return;
    }
    let clock = self.clock;
    let (due, waiting): (Vec<PendingRespawn>, Vec<PendingRespawn>) = self
      .pending_respawns
      .drain(..)
      .partition(|pending| pending.due <= clock);
    self.pending_respawns = waiting;
    for pending in due {
      if let Some(snake_id) = self.spawn_bot(pending.slot) {
        if let Some(snake) = self.snakes.get_mut(&snake_id) {
          snake.respawn_grace = BOT_RESPAWN_GRACE_SECS;
        }
        tracing::debug!(slot = pending.slot, snake_id, "bot respawned");
      }
    }
  }

  fn spawn_bot(&mut self, slot: usize) -> Option<SnakeId> {
    let entry = self.bot_slots.get(slot)?;
    if entry.snake_id.is_some() {
      return None;
    }
    let name = entry.name.clone();
    let skin = entry.skin;
    let accessory = if self.rng.gen::<f64>() < BOT_ACCESSORY_CHANCE {
      self.rng.gen_range(1..=MAX_ACCESSORY)
    } else {
      0
    };
    let snake_id = self.place_snake(name, skin, accessory, Owner::Bot(slot));
    self.bot_slots[slot].snake_id = Some(snake_id);
    Some(snake_id)
  }

  fn place_snake(&mut self, name: String, skin: usize, accessory: u8, owner: Owner) -> SnakeId {
    let id = self.allocate_id();
    let head = self.safe_spawn_point();
    let heading = self.rng.gen::<f64>() * PI * 2.0 - PI;
    let snake = create_snake(
      SnakeSpec {
        id,
        name,
        skin,
        accessory,
        owner,
      },
      head,
      heading,
      &self.config,
    );
    self.snakes.insert(id, snake);
    id
  }

  /// Picks a point in the central region away from every living head, or a
  /// point in the tighter fallback region once the attempts run out.
  fn safe_spawn_point(&mut self) -> Point {
    let half_world = self.config.half_world();
    let min_sq = SPAWN_MIN_HEAD_DISTANCE * SPAWN_MIN_HEAD_DISTANCE;
    for _ in 0..MAX_SPAWN_ATTEMPTS {
      let candidate = self.random_point(half_world * SPAWN_REGION_RATIO);
      let clear = self
        .snakes
        .values()
        .filter(|snake| snake.alive)
        .all(|snake| distance_sq(snake.head(), candidate) >= min_sq);
      if clear {
        return candidate;
      }
    }
    self.random_point(half_world * SPAWN_FALLBACK_REGION_RATIO)
  }

  fn random_point(&mut self, extent: f64) -> Point {
    Point::new(
      (self.rng.gen::<f64>() * 2.0 - 1.0) * extent,
      (self.rng.gen::<f64>() * 2.0 - 1.0) * extent,
    )
  }

  fn top_up_food(&mut self) {
    if self.foods.len() < self.config.food_count && self.rng.gen::<f64>() < FOOD_TOP_UP_CHANCE {
      self.spawn_random_food();
    }
  }

  fn spawn_random_food(&mut self) {
    let position = self.random_point(self.config.half_world());
    let hue = self.rng.gen_range(0..360);
    self.push_food(position, self.config.food_radius, format!("hsl({hue},80%,55%)"));
  }

  fn push_food(&mut self, position: Point, radius: f64, color: String) {
    let id: FoodId = self.allocate_id();
    self.foods.push(Food {
      id,
      position,
      radius,
      color,
    });
  }

  fn broadcast(&mut self) {
    let leaderboard = build_leaderboard(&self.snakes);
    for entry in self.sessions.values_mut() {
      let own = entry.snake_id.and_then(|snake_id| self.snakes.get(&snake_id));
      if let Some(snake) = own {
        entry.view_center = snake.head();
      }
      let frame = build_state_frame(
        entry.snake_id,
        entry.view_center,
        &self.snakes,
        &self.foods,
        &leaderboard,
        &self.config,
      );
      if let Some(payload) = encode_server_message(&ServerMessage::State(frame)) {
        entry.state.store(payload);
      }
    }
  }

  fn allocate_id(&mut self) -> u64 {
    let id = self.next_id;
    self.next_id += 1;
    id
  }
}

/// Food left by a dying snake, never more than it has segments.
pub fn scatter_count(score: u32, body_len: usize, food_value: u32) -> usize {
  let by_score = (score / food_value.max(1)) as usize;
  let by_length = (body_len as f64 * DEATH_SCATTER_RATIO).floor() as usize;
  by_score.max(by_length).min(body_len)
}

fn skin_color(skin: usize) -> &'static str {
  SKINS[skin % SKINS.len()].0
}

fn send_event(entry: &SessionEntry, message: &ServerMessage) {
  let Some(payload) = encode_server_message(message) else { return };
  if let Err(error) = entry.events.try_send(payload) {
    tracing::debug!(%error, "dropping session event");
  }
}
