use crate::game::config::GameConfig;
use anyhow::Context;
use std::env;

const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub game: GameConfig,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let port = match env::var("PORT") {
            Ok(value) => value
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT must be a port number, got {value:?}"))?,
            Err(_) => DEFAULT_PORT,
        };
        let game = GameConfig::from_env().context("invalid game configuration")?;
        Ok(Self { port, game })
    }
}
