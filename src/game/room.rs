pub mod session;

use super::config::GameConfig;
use super::types::SessionId;
use super::world::World;
use crate::protocol;
use session::{LatestFrame, SessionIo};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug)]
pub struct Room {
  world: Mutex<World>,
  tick_interval: Duration,
  tick_seconds: f64,
}

impl Room {
  pub fn new(config: GameConfig) -> Self {
    Self::with_world(World::new(config))
  }

  pub fn with_world(world: World) -> Self {
    let tick_interval = world.config().tick_interval();
    let tick_seconds = world.config().tick_seconds();
    Self {
      world: Mutex::new(world),
      tick_interval,
      tick_seconds,
    }
  }

  pub async fn add_session(&self) -> SessionIo {
    let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let outbound_state = Arc::new(LatestFrame::new());
    let mut world = self.world.lock().await;
    let session_id = world.add_session(events_tx, Arc::clone(&outbound_state));
    SessionIo {
      session_id,
      outbound_state,
      outbound_events_rx: events_rx,
    }
  }

  pub async fn remove_session(&self, session_id: SessionId) {
    let mut world = self.world.lock().await;
    world.disconnect_session(session_id);
  }

  /// Applies one inbound frame under the world lock, so it lands between
  /// ticks and never half-way through one.
  pub async fn handle_text_message(&self, session_id: SessionId, text: &str) {
    let Some(message) = protocol::decode_client_message(text) else {
      tracing::trace!(session_id, "dropping malformed message");
      return;
    };
    let mut world = self.world.lock().await;
    world.apply_message(session_id, message);
  }

  /// Drives the world at its fixed rate. Late ticks are skipped rather than
  /// replayed in a burst.
  pub fn spawn_loop(self: &Arc<Self>) -> JoinHandle<()> {
    let room = Arc::clone(self);
    tokio::spawn(async move {
      let mut interval = tokio::time::interval(room.tick_interval);
      interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
      loop {
        interval.tick().await;
        let started = Instant::now();
        room.world.lock().await.tick(room.tick_seconds);
        let elapsed = started.elapsed();
        if elapsed > room.tick_interval {
          tracing::warn!(
            elapsed_ms = elapsed.as_millis() as u64,
            budget_ms = room.tick_interval.as_millis() as u64,
            "tick overran its interval"
          );
        }
      }
    })
  }
}
