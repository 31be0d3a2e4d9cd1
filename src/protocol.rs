use crate::game::input::parse_heading;
use crate::game::types::{SessionId, SnakeId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Appearance {
  pub name: Option<String>,
  pub skin: Option<f64>,
  pub accessory: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClientMessage {
  Join(Appearance),
  Respawn(Appearance),
  Input { heading: f64, boost: bool },
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum JsonClientMessage {
  #[serde(rename = "join")]
  Join {
    name: Option<String>,
    skin: Option<f64>,
    acc: Option<f64>,
  },
  #[serde(rename = "respawn")]
  Respawn {
    name: Option<String>,
    skin: Option<f64>,
    acc: Option<f64>,
  },
  #[serde(rename = "input")]
  Input { a: Option<f64>, b: Option<bool> },
}

/// Parses one inbound text frame. Anything malformed yields `None` and is
/// meant to be dropped without a reply.
pub fn decode_client_message(text: &str) -> Option<ClientMessage> {
  let message = serde_json::from_str::<JsonClientMessage>(text).ok()?;
  match message {
    JsonClientMessage::Join { name, skin, acc } => Some(ClientMessage::Join(Appearance {
      name,
      skin,
      accessory: acc,
    })),
    JsonClientMessage::Respawn { name, skin, acc } => Some(ClientMessage::Respawn(Appearance {
      name,
      skin,
      accessory: acc,
    })),
    JsonClientMessage::Input { a, b } => {
      let heading = parse_heading(a?)?;
      Some(ClientMessage::Input {
        heading,
        boost: b.unwrap_or(false),
      })
    }
  }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
  #[serde(rename = "welcome")]
  Welcome { id: SessionId, world: f64 },
  #[serde(rename = "spawned")]
  Spawned { id: SnakeId },
  #[serde(rename = "death")]
  Death { score: u32 },
  #[serde(rename = "state")]
  State(StateFrame),
}

#[derive(Debug, Clone, Serialize)]
pub struct StateFrame {
  /// Viewer's own snake, 0 when it has none.
  pub pid: SnakeId,
  pub snakes: Vec<VisibleSnake>,
  /// Flattened `[x, y, size]` triples.
  pub food: Vec<f64>,
  pub lb: Vec<LeaderboardEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VisibleSnake {
  pub id: SnakeId,
  #[serde(rename = "n")]
  pub name: String,
  #[serde(rename = "sk")]
  pub skin: usize,
  #[serde(rename = "ac")]
  pub accessory: u8,
  #[serde(rename = "a")]
  pub heading: f64,
  #[serde(rename = "s")]
  pub score: u32,
  #[serde(rename = "b")]
  pub boosting: u8,
  /// Every second segment, flattened `[x, y]` pairs.
  #[serde(rename = "sg")]
  pub segments: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
  #[serde(rename = "n")]
  pub name: String,
  #[serde(rename = "s")]
  pub score: u32,
}

pub fn encode_server_message(message: &ServerMessage) -> Option<String> {
  match serde_json::to_string(message) {
    Ok(text) => Some(text),
    Err(error) => {
      tracing::warn!(?error, "failed to encode server message");
      None
    }
  }
}
