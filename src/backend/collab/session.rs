/**
 * Collaboration Session
 *
 * Drives one websocket connection from acceptance to teardown.
 *
 * # Lifecycle
 *
 * 1. Register the connection and queue the current document snapshot,
 *    both under the project's document lock so no edit can slip in
 *    between the snapshot and the first broadcast this client sees
 * 2. Read text frames until the client goes away; each frame is decoded,
 *    applied, persisted and relayed to the other connections
 * 3. Unregister on every exit path (the `Registration` guard drops)
 *
 * Outbound traffic for the connection goes through a bounded queue drained
 * by a dedicated writer, so replies and broadcasts from other sessions
 * never wait on this client's socket. If that queue overflows the client
 * has missed a frame and the writer closes the connection.
 */

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::backend::auth::AccessGrant;
use crate::backend::collab::documents::DocumentLease;
use crate::backend::collab::registry::PeerHandle;
use crate::backend::collab::state::CollabState;
use crate::backend::error::BackendError;
use crate::backend::realtime::broadcast_frame;
use crate::shared::{Command, Rejection};

struct Session<'a> {
    state: &'a CollabState,
    grant: &'a AccessGrant,
    lease: &'a DocumentLease,
    peer_id: Uuid,
    outbound: &'a mpsc::Sender<String>,
}

/// Serve one accepted collaboration connection until it closes
pub async fn run_session(socket: WebSocket, state: CollabState, grant: AccessGrant) {
    let peer_id = Uuid::new_v4();
    let project_id = grant.project_id;
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (outbound_tx, mut outbound_rx) = mpsc::channel::<String>(state.peer_queue_capacity);
    let lease = state.documents.acquire(project_id);

    let (_registration, lagged) = {
        let guard = match lease.lock().await {
            Ok(guard) => guard,
            Err(e) => {
                tracing::error!("[Collab] Failed to load project {}: {}", project_id, e);
                let _ = ws_tx.close().await;
                return;
            }
        };
        let snapshot = match guard.document().to_json_string() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::error!("[Collab] Failed to encode project {}: {}", project_id, e);
                let _ = ws_tx.close().await;
                return;
            }
        };

        let peer = PeerHandle::new(peer_id, grant.capability, outbound_tx.clone());
        let lagged = peer.lagged();
        let registration = state.registry.register(project_id, peer);
        if outbound_tx.try_send(snapshot).is_err() {
            tracing::warn!("[Collab] Could not queue snapshot for connection {}", peer_id);
        }
        (registration, lagged)
    };

    let writer = async move {
        loop {
            tokio::select! {
                frame = outbound_rx.recv() => {
                    let Some(frame) = frame else { break };
                    if ws_tx.send(Message::Text(frame.into())).await.is_err() {
                        tracing::debug!("[Collab] Connection {} went away during send", peer_id);
                        break;
                    }
                }
                _ = lagged.notified() => {
                    tracing::warn!("[Collab] Closing connection {}, it fell behind", peer_id);
                    break;
                }
            }
        }
        let _ = ws_tx.close().await;
    };

    let session = Session {
        state: &state,
        grant: &grant,
        lease: &lease,
        peer_id,
        outbound: &outbound_tx,
    };
    let reader = async {
        while let Some(message) = ws_rx.next().await {
            match message {
                Ok(Message::Text(text)) => session.handle_frame(text.as_str()).await,
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!("[Collab] Connection {} receive error: {}", peer_id, e);
                    break;
                }
            }
        }
    };

    tokio::select! {
        _ = writer => {}
        _ = reader => {}
    }

    tracing::debug!("[Collab] Session {} on project {} closed", peer_id, project_id);
}

impl Session<'_> {
    async fn handle_frame(&self, frame: &str) {
        if !self.grant.capability.can_edit() {
            tracing::debug!(
                "[Collab] Ignoring command from read-only connection {}",
                self.peer_id
            );
            self.reply(Rejection::read_only());
            return;
        }

        let command = match Command::parse(frame) {
            Ok(command) => command,
            Err(e) => {
                tracing::debug!("[Collab] Rejected frame from {}: {}", self.peer_id, e);
                self.reply(BackendError::from(e).to_rejection());
                return;
            }
        };

        if let Err(e) = self.apply(command, frame).await {
            tracing::error!(
                "[Collab] Command on project {} failed: {}",
                self.grant.project_id,
                e
            );
            self.reply(e.to_rejection());
        }
    }

    /// Apply, persist and relay one command under the project lock
    async fn apply(&self, command: Command, frame: &str) -> Result<(), BackendError> {
        let name = command.name();
        let target = command.target().clone();

        let mut guard = self.lease.lock().await?;
        let next = guard.document().clone().apply(command);
        guard.commit(next).await?;

        let peers = self.state.registry.peers(self.grant.project_id);
        let delivered = broadcast_frame(&peers, self.peer_id, frame);
        tracing::debug!(
            "[Collab] Applied {} {} on project {}, relayed to {} peers",
            name,
            target,
            self.grant.project_id,
            delivered
        );
        Ok(())
    }

    fn reply(&self, rejection: Rejection) {
        if self.outbound.try_send(rejection.to_frame()).is_err() {
            tracing::warn!(
                "[Collab] Dropped rejection for connection {}, queue unavailable",
                self.peer_id
            );
        }
    }
}
