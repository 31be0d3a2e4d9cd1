pub const DEFAULT_WORLD_SIZE: f64 = 3000.0;
pub const DEFAULT_FOOD_COUNT: usize = 600;
pub const DEFAULT_FOOD_RADIUS: f64 = 4.0;
pub const DEFAULT_TICK_RATE: u32 = 20;
pub const DEFAULT_SEGMENT_SPACING: f64 = 5.0;
pub const DEFAULT_BASE_LENGTH: usize = 10;
pub const DEFAULT_BASE_SPEED: f64 = 110.0;
pub const DEFAULT_BOOST_MULTIPLIER: f64 = 1.85;
pub const DEFAULT_BOOST_MIN_SCORE: u32 = 30;
pub const DEFAULT_BOOST_DRAIN_RATE: f64 = 8.0;
pub const DEFAULT_FOOD_VALUE: u32 = 3;
pub const DEFAULT_BOT_COUNT: usize = 20;
pub const DEFAULT_BASE_TURN_RATE: f64 = 3.2;
pub const DEFAULT_LENGTH_PER_SCORE: f64 = 0.4;
pub const DEFAULT_WIDTH_PER_SCORE: f64 = 0.04;
pub const DEFAULT_LENGTH_HYSTERESIS: usize = 5;
pub const DEFAULT_VIEW_RADIUS: f64 = 1200.0;

pub const BASE_BODY_WIDTH: f64 = 8.0;
pub const MAX_EXTRA_BODY_WIDTH: f64 = 14.0;
pub const HEAD_RADIUS_PADDING: f64 = 1.5;
pub const SPEED_PENALTY_SCORE: f64 = 1200.0;
pub const MAX_SPEED_PENALTY: f64 = 0.1;
pub const TURN_PENALTY_SCORE: f64 = 600.0;
pub const MAX_TURN_PENALTY: f64 = 0.35;

pub const BOOST_EPSILON: f64 = 1e-9;
pub const BOOST_SHED_MARGIN: usize = 2;
pub const BOOST_SHED_JITTER: f64 = 8.0;
pub const BOOST_SHED_RADIUS_SCALE: f64 = 0.8;

pub const EAT_BUFFER: f64 = 4.0;
pub const COLLISION_SKIP_SEGMENTS: usize = 3;
pub const COLLISION_PREFILTER_MARGIN: f64 = 80.0;
pub const KILL_CREDIT_RATIO: f64 = 0.15;

pub const SPAWN_PROTECTION_SECS: f64 = 3.0;
pub const BOT_RESPAWN_GRACE_SECS: f64 = 2.0;
pub const BOT_RESPAWN_DELAY_MIN_SECS: f64 = 4.0;
pub const BOT_RESPAWN_DELAY_SPREAD_SECS: f64 = 5.0;
pub const SPAWN_MIN_HEAD_DISTANCE: f64 = 250.0;
pub const MAX_SPAWN_ATTEMPTS: usize = 50;
pub const SPAWN_REGION_RATIO: f64 = 0.7;
pub const SPAWN_FALLBACK_REGION_RATIO: f64 = 0.4;
pub const BOT_ACCESSORY_CHANCE: f64 = 0.35;
pub const MAX_ACCESSORY: u8 = 7;

pub const DEATH_SCATTER_RATIO: f64 = 0.8;
pub const DEATH_FOOD_JITTER: f64 = 12.0;
pub const DEATH_FOOD_EXTRA_RADIUS: f64 = 2.0;
pub const FOOD_TOP_UP_CHANCE: f64 = 0.15;

pub const LEADERBOARD_SIZE: usize = 10;

pub const SKINS: [(&str, &str); 10] = [
  ("#44ff44", "#1a8a1a"),
  ("#ff4455", "#991133"),
  ("#4499ff", "#1144aa"),
  ("#ffcc00", "#aa8800"),
  ("#ff44ff", "#aa11aa"),
  ("#44ffff", "#11aaaa"),
  ("#ff8833", "#aa5511"),
  ("#ddddff", "#7777aa"),
  ("#ff6699", "#aa2255"),
  ("#88ff44", "#44aa11"),
];

pub const BOT_NAMES: [&str; 20] = [
  "Python",
  "Cobra",
  "Viper",
  "Mamba",
  "Anaconda",
  "Boa",
  "Asp",
  "Krait",
  "Naga",
  "Taipan",
  "Adder",
  "Racer",
  "King",
  "Coral",
  "Sidewinder",
  "Rinkhals",
  "Bushmaster",
  "Copperhead",
  "Rattler",
  "Boomslang",
];
