//! WebSocket Pose Relay
//!
//! Trust-the-client relay: every pose a room member sends is rebroadcast
//! verbatim to the other members. No validation, no authority, no
//! interest management - the relay's only jobs are room membership and
//! fan-out.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, mpsc, RwLock};
use tokio::time::interval;
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, error, info, instrument, warn};

use crate::net::protocol::{
    ClientMessage, ErrorCode, JoinRequest, RelayError, ServerMessage, WelcomeInfo,
};
use crate::player::PlayerId;

/// Relay configuration.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Bind address.
    pub bind_addr: SocketAddr,
    /// Maximum concurrent connections.
    pub max_connections: usize,
    /// Maximum players per room.
    pub max_room_size: usize,
    /// Connections silent for this long are dropped.
    pub idle_timeout: Duration,
    /// Relay version string.
    pub version: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".parse().unwrap(),
            max_connections: 1000,
            max_room_size: 16,
            idle_timeout: Duration::from_secs(300),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Relay errors.
#[derive(Debug, thiserror::Error)]
pub enum RelayServerError {
    /// Failed to bind to address.
    #[error("Failed to bind: {0}")]
    BindFailed(#[from] std::io::Error),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Connected client state.
struct ConnectedClient {
    /// Player identifier (after join).
    player_id: Option<PlayerId>,
    /// Joined room name.
    room: Option<String>,
    /// Connection time.
    #[allow(dead_code)]
    connected_at: Instant,
    /// Last activity.
    last_activity: Instant,
    /// Message sender (for direct messaging to client).
    sender: mpsc::Sender<ServerMessage>,
}

/// One room of mutually visible players.
#[derive(Default)]
struct Room {
    members: BTreeMap<PlayerId, mpsc::Sender<ServerMessage>>,
}

impl Room {
    /// Send to every member except (optionally) one.
    async fn broadcast_except(&self, except: Option<&PlayerId>, message: &ServerMessage) {
        for (member, sender) in &self.members {
            if Some(member) != except {
                let _ = sender.send(message.clone()).await;
            }
        }
    }
}

type Clients = Arc<RwLock<BTreeMap<SocketAddr, ConnectedClient>>>;
type Rooms = Arc<RwLock<BTreeMap<String, Room>>>;

/// The pose relay server.
pub struct RelayServer {
    config: RelayConfig,
    clients: Clients,
    rooms: Rooms,
    shutdown_tx: broadcast::Sender<()>,
}

impl RelayServer {
    /// Create a new relay.
    pub fn new(config: RelayConfig) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            config,
            clients: Arc::new(RwLock::new(BTreeMap::new())),
            rooms: Arc::new(RwLock::new(BTreeMap::new())),
            shutdown_tx,
        }
    }

    /// Run the relay until shutdown.
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<(), RelayServerError> {
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        info!("Pose relay listening on {}", self.config.bind_addr);

        let cleanup_clients = self.clients.clone();
        let cleanup_rooms = self.rooms.clone();
        let idle_timeout = self.config.idle_timeout;
        let cleanup_handle = tokio::spawn(async move {
            Self::run_cleanup_loop(cleanup_clients, cleanup_rooms, idle_timeout).await;
        });

        let mut shutdown_rx = self.shutdown_tx.subscribe();

        loop {
            tokio::select! {
                result = listener.accept() => {
                    match result {
                        Ok((stream, addr)) => {
                            let client_count = self.clients.read().await.len();
                            if client_count >= self.config.max_connections {
                                warn!("Connection limit reached, rejecting {}", addr);
                                continue;
                            }

                            debug!("New connection from {}", addr);
                            self.handle_connection(stream, addr);
                        }
                        Err(e) => {
                            error!("Accept error: {}", e);
                        }
                    }
                }
                _ = shutdown_rx.recv() => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }

        cleanup_handle.abort();
        Ok(())
    }

    /// Handle a new WebSocket connection.
    fn handle_connection(&self, stream: TcpStream, addr: SocketAddr) {
        let clients = self.clients.clone();
        let rooms = self.rooms.clone();
        let config = self.config.clone();
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        tokio::spawn(async move {
            let ws_stream = match accept_async(stream).await {
                Ok(ws) => ws,
                Err(e) => {
                    error!("WebSocket handshake failed for {}: {}", addr, e);
                    return;
                }
            };

            let (mut ws_sender, mut ws_receiver) = ws_stream.split();
            let (msg_tx, mut msg_rx) = mpsc::channel::<ServerMessage>(64);

            // Register client
            {
                let mut clients = clients.write().await;
                clients.insert(
                    addr,
                    ConnectedClient {
                        player_id: None,
                        room: None,
                        connected_at: Instant::now(),
                        last_activity: Instant::now(),
                        sender: msg_tx.clone(),
                    },
                );
            }

            // Spawn message sender task
            let sender_task = tokio::spawn(async move {
                while let Some(msg) = msg_rx.recv().await {
                    let text = match msg.to_json() {
                        Ok(t) => t,
                        Err(e) => {
                            error!("Failed to serialize message: {}", e);
                            continue;
                        }
                    };
                    if ws_sender.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
            });

            // Handle incoming messages
            loop {
                tokio::select! {
                    msg = ws_receiver.next() => {
                        match msg {
                            Some(Ok(Message::Text(text))) => {
                                let client_msg = match ClientMessage::from_json(&text) {
                                    Ok(m) => m,
                                    Err(e) => {
                                        debug!("Invalid message from {}: {}", addr, e);
                                        let _ = msg_tx.send(ServerMessage::Error(RelayError {
                                            code: ErrorCode::InvalidInput,
                                            message: "Invalid message format".to_string(),
                                        })).await;
                                        continue;
                                    }
                                };

                                // Update activity
                                {
                                    let mut clients = clients.write().await;
                                    if let Some(client) = clients.get_mut(&addr) {
                                        client.last_activity = Instant::now();
                                    }
                                }

                                Self::handle_client_message(
                                    addr, client_msg, &clients, &rooms, &config, &msg_tx,
                                ).await;
                            }
                            Some(Ok(Message::Ping(_))) => {
                                let _ = msg_tx.send(ServerMessage::Pong {
                                    timestamp: 0,
                                    server_time: unix_millis(),
                                }).await;
                            }
                            Some(Ok(Message::Close(_))) | None => {
                                debug!("Client {} disconnected", addr);
                                break;
                            }
                            Some(Err(e)) => {
                                error!("WebSocket error for {}: {}", addr, e);
                                break;
                            }
                            _ => {}
                        }
                    }
                    _ = shutdown_rx.recv() => {
                        let _ = msg_tx.send(ServerMessage::Shutdown {
                            reason: "Relay shutting down".to_string(),
                        }).await;
                        break;
                    }
                }
            }

            // Cleanup
            sender_task.abort();
            Self::leave_room(addr, &clients, &rooms).await;
            {
                let mut clients = clients.write().await;
                clients.remove(&addr);
            }
            debug!("Client {} cleaned up", addr);
        });
    }

    /// Handle a client message.
    async fn handle_client_message(
        addr: SocketAddr,
        msg: ClientMessage,
        clients: &Clients,
        rooms: &Rooms,
        config: &RelayConfig,
        sender: &mpsc::Sender<ServerMessage>,
    ) {
        match msg {
            ClientMessage::Join(join) => {
                Self::handle_join(addr, join, clients, rooms, config, sender).await;
            }
            ClientMessage::Pose(update) => {
                let (player_id, room) = {
                    let clients = clients.read().await;
                    match clients.get(&addr) {
                        Some(c) => (c.player_id, c.room.clone()),
                        None => return,
                    }
                };

                let (Some(player_id), Some(room_name)) = (player_id, room) else {
                    let _ = sender
                        .send(ServerMessage::Error(RelayError {
                            code: ErrorCode::NotJoined,
                            message: "Join a room before sending poses".to_string(),
                        }))
                        .await;
                    return;
                };

                let rooms = rooms.read().await;
                if let Some(room) = rooms.get(&room_name) {
                    // Verbatim fan-out; the relay never inspects the pose
                    room.broadcast_except(
                        Some(&player_id),
                        &ServerMessage::Pose {
                            player_id: hex::encode(player_id.as_bytes()),
                            update,
                        },
                    )
                    .await;
                }
            }
            ClientMessage::Ping { timestamp } => {
                let _ = sender
                    .send(ServerMessage::Pong {
                        timestamp,
                        server_time: unix_millis(),
                    })
                    .await;
            }
            ClientMessage::Leave => {
                Self::leave_room(addr, clients, rooms).await;
            }
        }
    }

    /// Handle a join request.
    async fn handle_join(
        addr: SocketAddr,
        join: JoinRequest,
        clients: &Clients,
        rooms: &Rooms,
        config: &RelayConfig,
        sender: &mpsc::Sender<ServerMessage>,
    ) {
        let already_joined = {
            let clients = clients.read().await;
            clients.get(&addr).map(|c| c.room.is_some()).unwrap_or(false)
        };
        if already_joined {
            let _ = sender
                .send(ServerMessage::Error(RelayError {
                    code: ErrorCode::AlreadyJoined,
                    message: "Connection is already in a room".to_string(),
                }))
                .await;
            return;
        }

        let Some(id_bytes) = join.player_id_bytes() else {
            let _ = sender
                .send(ServerMessage::Error(RelayError {
                    code: ErrorCode::InvalidInput,
                    message: "player_id must be 16 hex-encoded bytes".to_string(),
                }))
                .await;
            return;
        };
        let player_id = PlayerId::new(id_bytes);

        let peers = {
            let mut rooms = rooms.write().await;
            let room = rooms.entry(join.room.clone()).or_default();
            if room.members.len() >= config.max_room_size {
                let _ = sender
                    .send(ServerMessage::Error(RelayError {
                        code: ErrorCode::RoomFull,
                        message: format!("Room {} is full", join.room),
                    }))
                    .await;
                return;
            }

            let peers: Vec<String> = room
                .members
                .keys()
                .map(|id| hex::encode(id.as_bytes()))
                .collect();
            room.members.insert(player_id, sender.clone());

            room.broadcast_except(
                Some(&player_id),
                &ServerMessage::PeerJoined {
                    player_id: hex::encode(player_id.as_bytes()),
                },
            )
            .await;
            peers
        };

        {
            let mut clients = clients.write().await;
            if let Some(client) = clients.get_mut(&addr) {
                client.player_id = Some(player_id);
                client.room = Some(join.room.clone());
            }
        }

        let _ = sender
            .send(ServerMessage::Welcome(WelcomeInfo {
                room: join.room.clone(),
                player_id: hex::encode(player_id.as_bytes()),
                peers,
                server_version: config.version.clone(),
            }))
            .await;

        info!("Player {} joined room {}", player_id.short(), join.room);
    }

    /// Remove a connection from its room and notify the remaining peers.
    async fn leave_room(addr: SocketAddr, clients: &Clients, rooms: &Rooms) {
        let (player_id, room_name) = {
            let mut clients = clients.write().await;
            match clients.get_mut(&addr) {
                Some(client) => (client.player_id.take(), client.room.take()),
                None => return,
            }
        };

        let (Some(player_id), Some(room_name)) = (player_id, room_name) else {
            return;
        };

        let mut rooms = rooms.write().await;
        if let Some(room) = rooms.get_mut(&room_name) {
            room.members.remove(&player_id);
            room.broadcast_except(
                None,
                &ServerMessage::PeerLeft {
                    player_id: hex::encode(player_id.as_bytes()),
                },
            )
            .await;

            if room.members.is_empty() {
                rooms.remove(&room_name);
                debug!("Room {} emptied and removed", room_name);
            }
        }

        info!("Player {} left room {}", player_id.short(), room_name);
    }

    /// Run cleanup loop.
    async fn run_cleanup_loop(clients: Clients, rooms: Rooms, idle_timeout: Duration) {
        let mut interval = interval(Duration::from_secs(60));

        loop {
            interval.tick().await;

            let now = Instant::now();
            let to_remove: Vec<_> = {
                let clients = clients.read().await;
                clients
                    .iter()
                    .filter(|(_, c)| now.duration_since(c.last_activity) > idle_timeout)
                    .map(|(addr, _)| *addr)
                    .collect()
            };

            for addr in to_remove {
                Self::leave_room(addr, &clients, &rooms).await;
                let mut clients = clients.write().await;
                if clients.remove(&addr).is_some() {
                    info!("Removed idle client {}", addr);
                }
            }
        }
    }

    /// Shutdown the relay.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Get active connection count.
    pub async fn connection_count(&self) -> usize {
        self.clients.read().await.len()
    }

    /// Get active room count.
    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }
}

/// Wall-clock in unix milliseconds.
fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::protocol::PoseUpdate;

    #[test]
    fn test_relay_config_default() {
        let config = RelayConfig::default();
        assert_eq!(config.max_connections, 1000);
        assert_eq!(config.max_room_size, 16);
        assert_eq!(config.idle_timeout, Duration::from_secs(300));
    }

    #[tokio::test]
    async fn test_relay_creation() {
        let config = RelayConfig {
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            ..Default::default()
        };
        let relay = RelayServer::new(config);

        assert_eq!(relay.connection_count().await, 0);
        assert_eq!(relay.room_count().await, 0);
    }

    #[tokio::test]
    async fn test_relay_shutdown() {
        let config = RelayConfig {
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            ..Default::default()
        };
        let relay = RelayServer::new(config);
        relay.shutdown();
        // Should not panic
    }

    #[tokio::test]
    async fn test_room_broadcast_excludes_sender() {
        let mut room = Room::default();
        let sender_id = PlayerId::new([1; 16]);
        let peer_id = PlayerId::new([2; 16]);

        let (tx_sender, mut rx_sender) = mpsc::channel(4);
        let (tx_peer, mut rx_peer) = mpsc::channel(4);
        room.members.insert(sender_id, tx_sender);
        room.members.insert(peer_id, tx_peer);

        let message = ServerMessage::Pose {
            player_id: hex::encode(sender_id.as_bytes()),
            update: PoseUpdate {
                position: [1.0, 2.0, 3.0],
                orientation: [0.0, 0.0, 0.0, 1.0],
                look_pitch: 0.0,
            },
        };
        room.broadcast_except(Some(&sender_id), &message).await;

        assert!(rx_peer.try_recv().is_ok(), "peer should receive the pose");
        assert!(rx_sender.try_recv().is_err(), "sender must not echo");
    }

    #[tokio::test]
    async fn test_room_broadcast_to_all() {
        let mut room = Room::default();
        let a = PlayerId::new([1; 16]);
        let b = PlayerId::new([2; 16]);

        let (tx_a, mut rx_a) = mpsc::channel(4);
        let (tx_b, mut rx_b) = mpsc::channel(4);
        room.members.insert(a, tx_a);
        room.members.insert(b, tx_b);

        let message = ServerMessage::PeerLeft {
            player_id: hex::encode([3u8; 16]),
        };
        room.broadcast_except(None, &message).await;

        assert!(rx_a.try_recv().is_ok());
        assert!(rx_b.try_recv().is_ok());
    }
}
