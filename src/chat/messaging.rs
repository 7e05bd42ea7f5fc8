use tracing::{debug, error, info};

use crate::Identity;

use super::{Connection, MessageStore, Presence, PrivateMessageRequest, ServerEvent, StoreResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Invalid event; nothing stored, nothing emitted.
    Dropped,
    Stored { id: i64, delivered_live: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Refused,
}

/// Persists a private message and pushes it to the recipient (when online)
/// and back to the sending socket.
///
/// Bad input and storage failures drop the event without telling the client.
pub async fn send_private_message(
    store: &MessageStore,
    presence: &Presence,
    sender: Option<&Identity>,
    origin: &Connection,
    PrivateMessageRequest { to, message }: PrivateMessageRequest,
) -> Delivery {
    let Some(sender) = sender else {
        debug!(conn_id = %origin.id(), "private_message from anonymous socket dropped");
        return Delivery::Dropped;
    };
    let Some(recipient) = to.as_deref().and_then(Identity::parse) else {
        debug!(user = %sender, "private_message without recipient dropped");
        return Delivery::Dropped;
    };
    let Some(body) = message.filter(|body| !body.trim().is_empty()) else {
        debug!(user = %sender, "empty private_message dropped");
        return Delivery::Dropped;
    };

    let saved = match store.insert(sender, &recipient, &body).await {
        Ok(saved) => saved,
        Err(err) => {
            error!(user = %sender, to = %recipient, error = %err, "failed to store private_message");
            return Delivery::Dropped;
        }
    };

    let event = ServerEvent::PrivateMessage {
        from: saved.sender,
        message: saved.body,
        id: saved.id,
    };

    let delivered_live = match presence.lookup(&recipient) {
        Some(connection) => connection.emit(event.clone()),
        None => false,
    };
    origin.emit(event);

    info!(id = saved.id, from = %sender, to = %recipient, delivered_live, "private_message stored");
    Delivery::Stored { id: saved.id, delivered_live }
}

/// Removes a message if `requester` sent it.
pub async fn delete_message(store: &MessageStore, id: i64, requester: Option<&Identity>) -> StoreResult<DeleteOutcome> {
    let Some(message) = store.get(id).await? else {
        return Ok(DeleteOutcome::Refused);
    };
    if requester != Some(&message.sender) {
        return Ok(DeleteOutcome::Refused);
    }

    store.delete(id).await?;
    info!(id, user = %message.sender, "message deleted");
    Ok(DeleteOutcome::Deleted)
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;
    use crate::chat::store::memory_store;

    fn name(s: &str) -> Identity {
        Identity::parse(s).unwrap()
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<ServerEvent>) -> Vec<ServerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if !matches!(event, ServerEvent::UpdateUsers { .. }) {
                events.push(event);
            }
        }
        events
    }

    #[tokio::test]
    async fn online_recipient_and_sender_both_get_the_event() {
        let store = memory_store().await;
        let presence = Presence::new();
        let (a, b) = (name("A"), name("B"));
        let (a_conn, mut a_rx) = Connection::open();
        let (b_conn, mut b_rx) = Connection::open();
        presence.connect(Some(&a), a_conn.clone());
        presence.connect(Some(&b), b_conn);

        let delivery = send_private_message(&store, &presence, Some(&a), &a_conn, PrivateMessageRequest::new("B", "hi")).await;

        let Delivery::Stored { id, delivered_live } = delivery else {
            panic!("expected stored, got {delivery:?}");
        };
        assert!(delivered_live);

        let expected = ServerEvent::PrivateMessage { from: a.clone(), message: "hi".to_owned(), id };
        assert_eq!(drain(&mut b_rx), vec![expected.clone()]);
        assert_eq!(drain(&mut a_rx), vec![expected]);
        assert_eq!(store.count().await, 1);
    }

    #[tokio::test]
    async fn offline_recipient_only_echoes_to_sender() {
        let store = memory_store().await;
        let presence = Presence::new();
        let a = name("A");
        let (a_conn, mut a_rx) = Connection::open();
        presence.connect(Some(&a), a_conn.clone());

        let delivery = send_private_message(&store, &presence, Some(&a), &a_conn, PrivateMessageRequest::new("B", "hi")).await;

        assert!(matches!(delivery, Delivery::Stored { delivered_live: false, .. }));
        assert_eq!(drain(&mut a_rx).len(), 1);

        let history = store.conversation(&a, &name("B")).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].body, "hi");
    }

    #[tokio::test]
    async fn invalid_events_are_dropped_silently() {
        let store = memory_store().await;
        let presence = Presence::new();
        let a = name("A");
        let (a_conn, mut a_rx) = Connection::open();
        presence.connect(Some(&a), a_conn.clone());

        let requests = [
            PrivateMessageRequest::new("", "hi"),
            PrivateMessageRequest::new("   ", "hi"),
            PrivateMessageRequest::new("B", ""),
            PrivateMessageRequest::new("B", " \n "),
            PrivateMessageRequest::default(),
        ];
        for request in requests {
            let delivery = send_private_message(&store, &presence, Some(&a), &a_conn, request).await;
            assert_eq!(delivery, Delivery::Dropped);
        }

        let anonymous = send_private_message(&store, &presence, None, &a_conn, PrivateMessageRequest::new("B", "hi")).await;
        assert_eq!(anonymous, Delivery::Dropped);

        assert!(drain(&mut a_rx).is_empty());
        assert_eq!(store.count().await, 0);
    }

    #[tokio::test]
    async fn recipient_is_trimmed_body_kept_verbatim() {
        let store = memory_store().await;
        let presence = Presence::new();
        let a = name("A");
        let (a_conn, _a_rx) = Connection::open();

        send_private_message(&store, &presence, Some(&a), &a_conn, PrivateMessageRequest::new(" B ", " hi ")).await;

        let history = store.conversation(&a, &name("B")).await.unwrap();
        assert_eq!(history[0].recipient.as_str(), "B");
        assert_eq!(history[0].body, " hi ");
    }

    #[tokio::test]
    async fn only_the_sender_may_delete() {
        let store = memory_store().await;
        let (a, b) = (name("A"), name("B"));
        let saved = store.insert(&b, &a, "from b").await.unwrap();

        assert_eq!(delete_message(&store, saved.id, Some(&a)).await.unwrap(), DeleteOutcome::Refused);
        assert_eq!(delete_message(&store, saved.id, None).await.unwrap(), DeleteOutcome::Refused);
        assert!(store.get(saved.id).await.unwrap().is_some());

        assert_eq!(delete_message(&store, saved.id, Some(&b)).await.unwrap(), DeleteOutcome::Deleted);
        assert!(store.get(saved.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn deleting_unknown_id_is_refused() {
        let store = memory_store().await;
        assert_eq!(delete_message(&store, 99, Some(&name("A"))).await.unwrap(), DeleteOutcome::Refused);
    }
}
