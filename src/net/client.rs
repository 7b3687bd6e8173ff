//! Pose Channel Connector
//!
//! Client-side attachment to the relay. Outgoing poses and incoming
//! events cross the async boundary as whole values over channels, so the
//! single-threaded player core never touches a socket and never sees a
//! partially written pose.

use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use futures_util::{SinkExt, StreamExt};
use tracing::{debug, error, warn};

use crate::net::protocol::{ClientMessage, JoinRequest, PoseUpdate, ServerMessage};
use crate::player::PlayerId;
use crate::VERSION;

/// Connection settings.
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Relay URL, e.g. `ws://127.0.0.1:8080`.
    pub url: String,
    /// Room to join.
    pub room: String,
    /// This client's player id.
    pub player_id: PlayerId,
}

/// Pose channel errors.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// Connection or handshake failed.
    #[error("Connection failed: {0}")]
    Connect(#[from] tokio_tungstenite::tungstenite::Error),

    /// Failed to serialize an outgoing message.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Events surfaced to the host game loop.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    /// Join confirmed; `peers` are already in the room and should be
    /// spawned as remote proxies.
    Welcome {
        /// Joined room name.
        room: String,
        /// Players already present.
        peers: Vec<PlayerId>,
    },
    /// A peer joined; spawn a proxy for it.
    PeerJoined(PlayerId),
    /// A peer left; despawn its proxy.
    PeerLeft(PlayerId),
    /// A peer's pose sample; feed it to that proxy.
    Pose {
        /// The owning player.
        player_id: PlayerId,
        /// The received record.
        update: PoseUpdate,
    },
    /// The relay connection is gone. Proxies freeze at their last
    /// rendered pose; reconnecting is the host's decision.
    Disconnected,
}

/// Live connection to the relay.
pub struct PoseChannel {
    outgoing: mpsc::Sender<PoseUpdate>,
    events: mpsc::Receiver<ChannelEvent>,
}

impl PoseChannel {
    /// Connect, join the room, and spawn the I/O tasks.
    pub async fn connect(config: ChannelConfig) -> Result<Self, ChannelError> {
        let (ws_stream, _) = connect_async(config.url.as_str()).await?;
        debug!("Connected to relay at {}", config.url);

        let (mut write, mut read) = ws_stream.split();

        let join = ClientMessage::Join(JoinRequest {
            room: config.room.clone(),
            player_id: hex::encode(config.player_id.as_bytes()),
            client_version: VERSION.to_string(),
        });
        write.send(Message::Text(join.to_json()?)).await?;

        let (outgoing_tx, mut outgoing_rx) = mpsc::channel::<PoseUpdate>(64);
        let (event_tx, event_rx) = mpsc::channel::<ChannelEvent>(256);

        // Reader task: server messages -> host events
        tokio::spawn(async move {
            while let Some(result) = read.next().await {
                match result {
                    Ok(Message::Text(text)) => {
                        let msg = match ServerMessage::from_json(&text) {
                            Ok(m) => m,
                            Err(e) => {
                                warn!("Failed to parse relay message: {}", e);
                                continue;
                            }
                        };
                        if let Some(event) = map_event(msg) {
                            if event_tx.try_send(event).is_err() {
                                // Host stopped draining; poses are
                                // last-write-wins so dropping is safe
                                debug!("Event queue full, dropping");
                            }
                        }
                    }
                    Ok(Message::Close(_)) => {
                        debug!("Relay closed the connection");
                        break;
                    }
                    Err(e) => {
                        error!("WebSocket read error: {}", e);
                        break;
                    }
                    _ => {}
                }
            }
            let _ = event_tx.send(ChannelEvent::Disconnected).await;
        });

        // Writer task: queued poses -> relay
        tokio::spawn(async move {
            while let Some(update) = outgoing_rx.recv().await {
                let msg = ClientMessage::Pose(update);
                let text = match msg.to_json() {
                    Ok(t) => t,
                    Err(e) => {
                        error!("Failed to serialize pose: {}", e);
                        continue;
                    }
                };
                if let Err(e) = write.send(Message::Text(text)).await {
                    error!("Failed to send pose: {}", e);
                    break;
                }
            }
        });

        Ok(Self {
            outgoing: outgoing_tx,
            events: event_rx,
        })
    }

    /// Queue a pose for transmission.
    ///
    /// Never blocks the game loop: if the writer is backed up the sample
    /// is dropped, and the receiver's last-write-wins store absorbs the gap.
    pub fn send_pose(&self, update: PoseUpdate) {
        if self.outgoing.try_send(update).is_err() {
            debug!("Outgoing pose queue full, dropping sample");
        }
    }

    /// Drain one pending event without blocking (game-loop polling).
    pub fn poll_event(&mut self) -> Option<ChannelEvent> {
        self.events.try_recv().ok()
    }

    /// Await the next event (async hosts).
    pub async fn next_event(&mut self) -> Option<ChannelEvent> {
        self.events.recv().await
    }
}

/// Translate a relay message into a host event.
fn map_event(msg: ServerMessage) -> Option<ChannelEvent> {
    match msg {
        ServerMessage::Welcome(info) => Some(ChannelEvent::Welcome {
            room: info.room,
            peers: info.peers.iter().filter_map(|s| parse_hex_id(s)).collect(),
        }),
        ServerMessage::PeerJoined { player_id } => {
            parse_hex_id(&player_id).map(ChannelEvent::PeerJoined)
        }
        ServerMessage::PeerLeft { player_id } => {
            parse_hex_id(&player_id).map(ChannelEvent::PeerLeft)
        }
        ServerMessage::Pose { player_id, update } => {
            parse_hex_id(&player_id).map(|id| ChannelEvent::Pose {
                player_id: id,
                update,
            })
        }
        ServerMessage::Pong { .. } => None,
        ServerMessage::Error(e) => {
            warn!("Relay error {:?}: {}", e.code, e.message);
            None
        }
        ServerMessage::Shutdown { reason } => {
            warn!("Relay shutting down: {}", reason);
            None
        }
    }
}

/// Parse a 16-byte hex player id.
fn parse_hex_id(s: &str) -> Option<PlayerId> {
    let bytes = hex::decode(s).ok()?;
    if bytes.len() != 16 {
        return None;
    }
    let mut arr = [0u8; 16];
    arr.copy_from_slice(&bytes);
    Some(PlayerId::new(arr))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::protocol::{RelayError, ErrorCode, WelcomeInfo};

    fn update() -> PoseUpdate {
        PoseUpdate {
            position: [1.0, 0.0, 2.0],
            orientation: [0.0, 0.0, 0.0, 1.0],
            look_pitch: 10.0,
        }
    }

    #[test]
    fn test_parse_hex_id() {
        let id = PlayerId::new([9u8; 16]);
        assert_eq!(parse_hex_id(&hex::encode(id.as_bytes())), Some(id));
        assert_eq!(parse_hex_id("zz"), None);
        assert_eq!(parse_hex_id("abcd"), None);
    }

    #[test]
    fn test_map_pose_event() {
        let id = PlayerId::new([4u8; 16]);
        let event = map_event(ServerMessage::Pose {
            player_id: hex::encode(id.as_bytes()),
            update: update(),
        });
        assert_eq!(
            event,
            Some(ChannelEvent::Pose {
                player_id: id,
                update: update()
            })
        );
    }

    #[test]
    fn test_map_welcome_filters_bad_ids() {
        let good = PlayerId::new([1u8; 16]);
        let event = map_event(ServerMessage::Welcome(WelcomeInfo {
            room: "crypt".to_string(),
            player_id: hex::encode([0u8; 16]),
            peers: vec![hex::encode(good.as_bytes()), "garbage".to_string()],
            server_version: "0.1.0".to_string(),
        }));
        assert_eq!(
            event,
            Some(ChannelEvent::Welcome {
                room: "crypt".to_string(),
                peers: vec![good]
            })
        );
    }

    #[test]
    fn test_map_non_events() {
        assert_eq!(
            map_event(ServerMessage::Pong {
                timestamp: 1,
                server_time: 2
            }),
            None
        );
        assert_eq!(
            map_event(ServerMessage::Error(RelayError {
                code: ErrorCode::InternalError,
                message: String::new(),
            })),
            None
        );
    }

    #[tokio::test]
    async fn test_send_pose_never_blocks_when_full() {
        let (outgoing, _rx) = mpsc::channel(1);
        let (_tx, events) = mpsc::channel(1);
        let channel = PoseChannel {
            outgoing,
            events,
        };

        // Fill the queue, then keep sending: samples drop silently
        for _ in 0..10 {
            channel.send_pose(update());
        }
    }
}
