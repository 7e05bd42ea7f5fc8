use std::fmt;

use axum::{
    debug_handler,
    extract::{State, WebSocketUpgrade, ws::Message as Frame},
    response::Response,
};
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use tower_sessions::Session;
use tracing::{debug, warn};

use crate::{AppResult, AppState, Identity, session};

use super::{ClientEvent, Connection, MessageStore, Presence, messaging};

#[debug_handler(state = AppState)]
pub(crate) async fn chat_ws(
    State(store): State<MessageStore>,
    State(presence): State<Presence>,
    session: Session,

    ws: WebSocketUpgrade,
) -> AppResult<Response> {
    let identity = session::identity(&session).await?;

    Ok(ws.on_upgrade(move |socket| {
        let (sink, stream) = socket.split();
        serve_socket(sink, stream, identity, store, presence)
    }))
}

/// Runs one chat connection from connect to disconnect over any frame
/// transport: a writer task drains the connection's queue into `sink` while
/// inbound frames from `stream` are decoded and dispatched.
pub(crate) async fn serve_socket<W, R, E>(
    mut sink: W,
    mut stream: R,
    identity: Option<Identity>,
    store: MessageStore,
    presence: Presence,
) where
    W: Sink<Frame> + Send + Unpin + 'static,
    R: Stream<Item = Result<Frame, E>> + Unpin,
    E: fmt::Display,
{
    let (connection, mut outbox) = Connection::open();

    let mut writer_task = tokio::spawn(async move {
        while let Some(event) = outbox.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(err) => {
                    warn!(error = %err, "failed to encode server event");
                    continue;
                }
            };
            if sink.send(Frame::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    presence.connect(identity.as_ref(), connection.clone());

    loop {
        tokio::select! {
            frame = stream.next() => {
                let text = match frame {
                    Some(Ok(Frame::Text(text))) => text,
                    Some(Ok(Frame::Close(_))) | None => break,
                    Some(Err(err)) => {
                        debug!(conn_id = %connection.id(), error = %err, "socket read failed");
                        break;
                    }
                    Some(Ok(_)) => continue,
                };

                let event = match serde_json::from_str::<ClientEvent>(text.as_str()) {
                    Ok(event) => event,
                    Err(err) => {
                        debug!(conn_id = %connection.id(), error = %err, "ignoring unreadable frame");
                        continue;
                    }
                };

                match event {
                    ClientEvent::PrivateMessage(request) => {
                        messaging::send_private_message(&store, &presence, identity.as_ref(), &connection, request).await;
                    }
                }
            }
            _ = &mut writer_task => break,
        }
    }

    presence.disconnect(identity.as_ref(), &connection);
    writer_task.abort();
}
