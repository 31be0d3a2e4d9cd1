use super::constants::{
    DEFAULT_BASE_LENGTH, DEFAULT_BASE_SPEED, DEFAULT_BASE_TURN_RATE, DEFAULT_BOOST_DRAIN_RATE,
    DEFAULT_BOOST_MIN_SCORE, DEFAULT_BOOST_MULTIPLIER, DEFAULT_BOT_COUNT, DEFAULT_FOOD_COUNT,
    DEFAULT_FOOD_RADIUS, DEFAULT_FOOD_VALUE, DEFAULT_LENGTH_HYSTERESIS, DEFAULT_LENGTH_PER_SCORE,
    DEFAULT_SEGMENT_SPACING, DEFAULT_TICK_RATE, DEFAULT_VIEW_RADIUS, DEFAULT_WIDTH_PER_SCORE,
    DEFAULT_WORLD_SIZE,
};
use anyhow::bail;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Simulation tunables. None of these change the shape of the protocol.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Side length of the square arena, centred on the origin.
    pub world_size: f64,
    pub food_count: usize,
    pub food_radius: f64,
    pub tick_rate: u32,
    pub segment_spacing: f64,
    pub base_length: usize,
    pub base_speed: f64,
    pub boost_multiplier: f64,
    pub boost_min_score: u32,
    /// Score points drained per second of boosting.
    pub boost_drain_rate: f64,
    pub food_value: u32,
    pub bot_count: usize,
    /// Radians per second before the size penalty.
    pub base_turn_rate: f64,
    pub length_per_score: f64,
    pub width_per_score: f64,
    /// Extra segments tolerated above the target length before trimming.
    pub length_hysteresis: usize,
    pub view_radius: f64,
    /// Fixed RNG seed for reproducible runs; entropy when unset.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            world_size: DEFAULT_WORLD_SIZE,
            food_count: DEFAULT_FOOD_COUNT,
            food_radius: DEFAULT_FOOD_RADIUS,
            tick_rate: DEFAULT_TICK_RATE,
            segment_spacing: DEFAULT_SEGMENT_SPACING,
            base_length: DEFAULT_BASE_LENGTH,
            base_speed: DEFAULT_BASE_SPEED,
            boost_multiplier: DEFAULT_BOOST_MULTIPLIER,
            boost_min_score: DEFAULT_BOOST_MIN_SCORE,
            boost_drain_rate: DEFAULT_BOOST_DRAIN_RATE,
            food_value: DEFAULT_FOOD_VALUE,
            bot_count: DEFAULT_BOT_COUNT,
            base_turn_rate: DEFAULT_BASE_TURN_RATE,
            length_per_score: DEFAULT_LENGTH_PER_SCORE,
            width_per_score: DEFAULT_WIDTH_PER_SCORE,
            length_hysteresis: DEFAULT_LENGTH_HYSTERESIS,
            view_radius: DEFAULT_VIEW_RADIUS,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Reads every tunable from its environment variable, keeping the default
    /// when the variable is missing or unparsable.
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();
        Self {
            world_size: env_or("WORLD_SIZE", defaults.world_size),
            food_count: env_or("FOOD_COUNT", defaults.food_count),
            food_radius: env_or("FOOD_RADIUS", defaults.food_radius),
            tick_rate: env_or("TICK_RATE", defaults.tick_rate),
            segment_spacing: env_or("SEGMENT_SPACING", defaults.segment_spacing),
            base_length: env_or("BASE_LENGTH", defaults.base_length),
            base_speed: env_or("BASE_SPEED", defaults.base_speed),
            boost_multiplier: env_or("BOOST_MULTIPLIER", defaults.boost_multiplier),
            boost_min_score: env_or("BOOST_MIN_SCORE", defaults.boost_min_score),
            boost_drain_rate: env_or("BOOST_DRAIN_RATE", defaults.boost_drain_rate),
            food_value: env_or("FOOD_VALUE", defaults.food_value),
            bot_count: env_or("BOT_COUNT", defaults.bot_count),
            base_turn_rate: env_or("BASE_TURN_RATE", defaults.base_turn_rate),
            length_per_score: env_or("LENGTH_PER_SCORE", defaults.length_per_score),
            width_per_score: env_or("WIDTH_PER_SCORE", defaults.width_per_score),
            length_hysteresis: env_or("LENGTH_HYSTERESIS", defaults.length_hysteresis),
            view_radius: env_or("VIEW_RADIUS", defaults.view_radius),
            seed: env_opt("WORLD_SEED"),
        }
        .validate()
    }

    pub fn validate(self) -> anyhow::Result<Self> {
        if !(self.world_size.is_finite() && self.world_size > 0.0) {
            bail!("WORLD_SIZE must be a positive number");
        }
        if !(self.segment_spacing.is_finite() && self.segment_spacing > 0.0) {
            bail!("SEGMENT_SPACING must be a positive number");
        }
        if !(self.base_speed.is_finite() && self.base_speed > 0.0) {
            bail!("BASE_SPEED must be a positive number");
        }
        if !(self.base_turn_rate.is_finite() && self.base_turn_rate > 0.0) {
            bail!("BASE_TURN_RATE must be a positive number");
        }
        if !(self.boost_drain_rate.is_finite() && self.boost_drain_rate > 0.0) {
            bail!("BOOST_DRAIN_RATE must be a positive number");
        }
        if self.tick_rate == 0 {
            bail!("TICK_RATE must be at least 1");
        }
        if self.food_value == 0 {
            bail!("FOOD_VALUE must be at least 1");
        }
        if self.base_length < 2 {
            bail!("BASE_LENGTH must be at least 2");
        }
        Ok(self)
    }

    pub fn half_world(&self) -> f64 {
        self.world_size / 2.0
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_rate as f64)
    }

    pub fn tick_seconds(&self) -> f64 {
        1.0 / self.tick_rate as f64
    }

    /// Seconds of boosting that cost one score point.
    pub fn boost_drain_interval(&self) -> f64 {
        1.0 / self.boost_drain_rate
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    let Ok(raw) = env::var(name) else { return default };
    match raw.trim().parse::<T>() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!(variable = name, value = %raw, "ignoring unparsable setting");
            default
        }
    }
}

fn env_opt<T: FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(variable = name, value = %raw, "ignoring unparsable setting");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass_validation() {
        let config = GameConfig::default().validate().expect("defaults are valid");
        assert_eq!(config.half_world(), 1500.0);
        assert!((config.tick_seconds() - 0.05).abs() < 1e-12);
        assert!((config.boost_drain_interval() - 0.125).abs() < 1e-12);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn validation_rejects_zero_tick_rate() {
        let config = GameConfig {
            tick_rate: 0,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validation_rejects_negative_world() {
        let config = GameConfig {
            world_size: -10.0,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
