/**
 * Frame Broadcasting
 *
 * Fan-out of a raw command frame to the other connections of a project.
 *
 * Delivery goes through each peer's bounded outbound queue with
 * `try_send`, so one stalled client cannot hold up the rest of the
 * project or the command that triggered the broadcast. A peer whose queue
 * is full has missed a frame and can no longer mirror the document, so it
 * is told to disconnect and resync on reconnect.
 */

use tokio::sync::mpsc::error::TrySendError;
use uuid::Uuid;

use crate::backend::collab::PeerHandle;

/// Broadcast a frame to every peer except the sender
///
/// # Arguments
///
/// * `peers` - Snapshot of the project's connections
/// * `sender` - Connection the frame came from; it never receives it back
/// * `frame` - Frame text, forwarded verbatim
///
/// # Returns
///
/// Number of peers whose queue accepted the frame. Peers with a full queue
/// are disconnected.
pub fn broadcast_frame(peers: &[PeerHandle], sender: Uuid, frame: &str) -> usize {
    let mut delivered = 0;

    for peer in peers.iter().filter(|peer| peer.id != sender) {
        match peer.try_send(frame.to_string()) {
            Ok(()) => delivered += 1,
            Err(TrySendError::Full(_)) => {
                tracing::warn!(
                    "[Realtime] Outbound queue full for connection {}, closing lagging connection",
                    peer.id
                );
                peer.disconnect();
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!("[Realtime] Connection {} already closed", peer.id);
            }
        }
    }

    tracing::debug!("[Realtime] Frame broadcast to {} peers", delivered);
    delivered
}
