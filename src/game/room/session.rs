use crate::game::types::SessionId;
use std::sync::{Mutex as StdMutex, PoisonError};
use tokio::sync::{mpsc, Notify};

/// Latest-wins slot for state frames. The tick overwrites whatever the
/// socket has not sent yet, so a slow reader skips frames instead of
/// queueing them.
#[derive(Debug)]
pub struct LatestFrame {
    frame: StdMutex<Option<String>>,
    notify: Notify,
}

impl LatestFrame {
    pub(crate) fn new() -> Self {
        Self {
            frame: StdMutex::new(None),
            notify: Notify::new(),
        }
    }

    pub(crate) fn store(&self, payload: String) {
        *self.frame.lock().unwrap_or_else(PoisonError::into_inner) = Some(payload);
        self.notify.notify_one();
    }

    pub(crate) fn take_latest(&self) -> Option<String> {
        self.frame
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    pub(crate) async fn wait_for_update(&self) {
        self.notify.notified().await;
    }
}

pub struct SessionIo {
    pub session_id: SessionId,
    pub outbound_state: std::sync::Arc<LatestFrame>,
    /// Welcome, spawned and death events. Never dropped in favour of state.
    pub outbound_events_rx: mpsc::Receiver<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_frame_keeps_only_newest_payload() {
        let frame = LatestFrame::new();
        frame.store("one".to_string());
        frame.store("two".to_string());
        assert_eq!(frame.take_latest().as_deref(), Some("two"));
        assert!(frame.take_latest().is_none());
    }

    #[tokio::test]
    async fn store_wakes_waiter() {
        let frame = std::sync::Arc::new(LatestFrame::new());
        let waiter = {
            let frame = std::sync::Arc::clone(&frame);
            tokio::spawn(async move {
                frame.wait_for_update().await;
                frame.take_latest()
            })
        };
        frame.store("tick".to_string());
        let payload = waiter.await.expect("waiter");
        assert_eq!(payload.as_deref(), Some("tick"));
    }
}
