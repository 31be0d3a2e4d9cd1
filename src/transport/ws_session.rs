use crate::game::room::Room;
use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use std::time::Duration;

const PING_INTERVAL: Duration = Duration::from_secs(30);

pub async fn handle_socket(socket: WebSocket, room: Arc<Room>) {
    let (mut sender, mut receiver) = socket.split();
    let session = room.add_session().await;
    let session_id = session.session_id;
    let outbound_state = session.outbound_state;
    let mut outbound_events_rx = session.outbound_events_rx;

    let send_task = tokio::spawn(async move {
        let mut ping = tokio::time::interval(PING_INTERVAL);
        ping.tick().await;

        loop {
            tokio::select! {
                Some(payload) = outbound_events_rx.recv() => {
                    if sender.send(Message::Text(payload)).await.is_err() {
                        return;
                    }
                    continue;
                }
                _ = outbound_state.wait_for_update() => {}
                _ = ping.tick() => {
                    if sender.send(Message::Ping(Vec::new())).await.is_err() {
                        return;
                    }
                    continue;
                }
            }

            // Events queued while waiting go out ahead of the frame.
            while let Ok(payload) = outbound_events_rx.try_recv() {
                if sender.send(Message::Text(payload)).await.is_err() {
                    return;
                }
            }
            if let Some(payload) = outbound_state.take_latest() {
                if sender.send(Message::Text(payload)).await.is_err() {
                    return;
                }
            }
        }
    });

    while let Some(result) = receiver.next().await {
        let Ok(message) = result else { break };
        match message {
            Message::Text(text) => room.handle_text_message(session_id, &text).await,
            Message::Close(_) => break,
            _ => {}
        }
    }

    room.remove_session(session_id).await;
    send_task.abort();
    tracing::debug!(session_id, "socket closed");
}
