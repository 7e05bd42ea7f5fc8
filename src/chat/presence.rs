use std::{collections::HashMap, sync::Arc};

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::Identity;

use super::ServerEvent;

pub type ConnectionId = Uuid;

/// Handle to one live chat socket. Cloning shares the same outbound queue.
#[derive(Debug, Clone)]
pub struct Connection {
    id: ConnectionId,
    tx: mpsc::UnboundedSender<ServerEvent>,
}

impl Connection {
    pub fn open() -> (Connection, mpsc::UnboundedReceiver<ServerEvent>) {
        // Unbounded: a client that stops reading keeps growing its queue until
        // the socket closes. Tolerable on one node; bound it with try_send if not.
        let (tx, rx) = mpsc::unbounded_channel();
        (Connection { id: Uuid::now_v7(), tx }, rx)
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Queues an event for the socket writer. Returns false once the socket is gone.
    pub fn emit(&self, event: ServerEvent) -> bool {
        if self.tx.send(event).is_err() {
            debug!(conn_id = %self.id, "dropping event for closed connection");
            return false;
        }
        true
    }
}

impl PartialEq for Connection {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Connection {}

#[derive(Debug, Default)]
struct PresenceState {
    online: usize,
    live: HashMap<ConnectionId, Connection>,
    routes: HashMap<Identity, Connection>,
}

impl PresenceState {
    fn broadcast_count(&self) {
        for connection in self.live.values() {
            connection.emit(ServerEvent::UpdateUsers { count: self.online });
        }
    }
}

/// Process-wide presence: every live connection, the online counter and the
/// identity → connection routing table.
///
/// The counter counts connections while routes are keyed by identity, so a
/// second socket under one name adds to the count but takes over the route.
#[derive(Debug, Clone, Default)]
pub struct Presence {
    state: Arc<Mutex<PresenceState>>,
}

impl Presence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect(&self, identity: Option<&Identity>, connection: Connection) -> usize {
        let mut state = self.state.lock();

        state.live.insert(connection.id, connection.clone());
        if let Some(identity) = identity {
            if let Some(stale) = state.routes.insert(identity.clone(), connection.clone()) {
                debug!(user = %identity, stale = %stale.id, "route replaced");
            }
        }
        state.online += 1;
        state.broadcast_count();

        info!(conn_id = %connection.id, user = ?identity.map(Identity::as_str), online = state.online, "connected");
        state.online
    }

    pub fn disconnect(&self, identity: Option<&Identity>, connection: &Connection) -> usize {
        let mut state = self.state.lock();

        state.live.remove(&connection.id);
        state.online = state.online.saturating_sub(1);
        // keyed by name only; may evict a newer socket's route
        if let Some(identity) = identity {
            state.routes.remove(identity);
        }
        state.broadcast_count();

        info!(conn_id = %connection.id, user = ?identity.map(Identity::as_str), online = state.online, "disconnected");
        state.online
    }

    pub fn lookup(&self, identity: &Identity) -> Option<Connection> {
        self.state.lock().routes.get(identity).cloned()
    }

    pub fn online_count(&self) -> usize {
        self.state.lock().online
    }

    pub fn broadcast_count(&self) {
        self.state.lock().broadcast_count();
    }
}
