//! Protocol Messages
//!
//! Wire format for client-relay communication over WebSocket.
//! Envelopes are serialized as JSON for debugging ease; the pose record
//! itself is a flat struct with a stable binary form for transports that
//! frame their own payloads.

use serde::{Deserialize, Serialize};

use crate::core::rotation::Quat;
use crate::core::vec3::Vec3;
use crate::player::pose::CharacterPose;

// =============================================================================
// POSE RECORD
// =============================================================================

/// One pose broadcast record.
///
/// Fields are written in this fixed order - position, orientation,
/// look pitch - and read back in the same order. Framing, reliability,
/// and ordering are the transport's problem; receivers apply
/// last-write-wins regardless of send order.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PoseUpdate {
    /// World-space position (x, y, z).
    pub position: [f32; 3],
    /// Body orientation as a unit quaternion (x, y, z, w).
    pub orientation: [f32; 4],
    /// Vertical look angle in degrees, pre-clamped by the sender.
    pub look_pitch: f32,
}

impl PoseUpdate {
    /// Encoded size in bytes: 8 floats, no framing.
    pub const SIZE: usize = 32;

    /// Capture a record from an authored pose.
    pub fn from_pose(pose: &CharacterPose) -> Self {
        Self {
            position: pose.position.to_array(),
            orientation: pose.orientation.to_array(),
            look_pitch: pose.look_pitch,
        }
    }

    /// Rebuild the pose on the receiving side.
    pub fn to_pose(&self) -> CharacterPose {
        CharacterPose {
            position: Vec3::from_array(self.position),
            orientation: Quat::from_array(self.orientation),
            look_pitch: self.look_pitch,
        }
    }

    /// Serialize to the 32-byte binary record.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Deserialize from the binary record.
    pub fn from_bytes(data: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(data)
    }
}

// =============================================================================
// CLIENT -> RELAY MESSAGES
// =============================================================================

/// Messages sent from client to relay.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Join a room.
    Join(JoinRequest),

    /// Pose sample for this client's character.
    Pose(PoseUpdate),

    /// Ping for latency measurement.
    Ping {
        /// Client timestamp, echoed back.
        timestamp: u64,
    },

    /// Leave the current room.
    Leave,
}

/// Room join request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinRequest {
    /// Room name to join.
    pub room: String,
    /// Player's unique identifier (hex string for JSON compatibility).
    pub player_id: String,
    /// Client version for compatibility check.
    pub client_version: String,
}

impl JoinRequest {
    /// Parse player_id from hex string to bytes.
    pub fn player_id_bytes(&self) -> Option<[u8; 16]> {
        let bytes = hex::decode(&self.player_id).ok()?;
        if bytes.len() != 16 {
            return None;
        }
        let mut arr = [0u8; 16];
        arr.copy_from_slice(&bytes);
        Some(arr)
    }
}

// =============================================================================
// RELAY -> CLIENT MESSAGES
// =============================================================================

/// Messages sent from relay to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Join succeeded.
    Welcome(WelcomeInfo),

    /// A peer joined the room.
    PeerJoined {
        /// The joining player (hex id).
        player_id: String,
    },

    /// A peer left the room (or its connection died).
    PeerLeft {
        /// The departing player (hex id).
        player_id: String,
    },

    /// A peer's pose sample.
    Pose {
        /// The owning player (hex id).
        player_id: String,
        /// The pose record, relayed verbatim.
        update: PoseUpdate,
    },

    /// Pong response.
    Pong {
        /// Echoed client timestamp.
        timestamp: u64,
        /// Relay wall-clock in unix millis.
        server_time: u64,
    },

    /// Error message.
    Error(RelayError),

    /// Relay is shutting down.
    Shutdown {
        /// Human-readable reason.
        reason: String,
    },
}

/// Information returned on a successful join.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeInfo {
    /// The joined room.
    pub room: String,
    /// This client's player id (hex), as registered.
    pub player_id: String,
    /// Players already present (hex ids).
    pub peers: Vec<String>,
    /// Relay version.
    pub server_version: String,
}

/// Relay error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayError {
    /// Error code.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
}

/// Error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Malformed message.
    InvalidInput,
    /// Pose sent before joining a room.
    NotJoined,
    /// Already joined a room on this connection.
    AlreadyJoined,
    /// Room is at capacity.
    RoomFull,
    /// Relay at connection capacity.
    ServerOverloaded,
    /// Internal error.
    InternalError,
}

// =============================================================================
// SERIALIZATION HELPERS
// =============================================================================

// Note: binary serialization is reserved for the flat PoseUpdate record.
// The tagged envelopes (#[serde(tag = "type")]) are JSON-only - bincode
// does not support internally tagged enums.

impl ClientMessage {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl ServerMessage {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_update() -> PoseUpdate {
        PoseUpdate {
            position: [1.0, 2.0, 3.0],
            orientation: [0.0, 0.383, 0.0, 0.924],
            look_pitch: -12.5,
        }
    }

    #[test]
    fn test_pose_record_is_32_bytes() {
        let bytes = sample_update().to_bytes().unwrap();
        assert_eq!(bytes.len(), PoseUpdate::SIZE);
    }

    #[test]
    fn test_pose_record_field_order() {
        // position, then orientation, then look_pitch, little-endian f32s
        let update = sample_update();
        let bytes = update.to_bytes().unwrap();
        assert_eq!(&bytes[0..4], &1.0f32.to_le_bytes());
        assert_eq!(&bytes[4..8], &2.0f32.to_le_bytes());
        assert_eq!(&bytes[8..12], &3.0f32.to_le_bytes());
        assert_eq!(&bytes[12..16], &0.0f32.to_le_bytes());
        assert_eq!(&bytes[28..32], &(-12.5f32).to_le_bytes());
    }

    #[test]
    fn test_pose_record_binary_roundtrip() {
        let update = sample_update();
        let bytes = update.to_bytes().unwrap();
        assert_eq!(PoseUpdate::from_bytes(&bytes).unwrap(), update);
    }

    #[test]
    fn test_pose_conversion() {
        let pose = CharacterPose::new(
            Vec3::new(5.0, 0.0, -5.0),
            Quat::from_yaw_deg(30.0),
            45.0,
        );
        let rebuilt = PoseUpdate::from_pose(&pose).to_pose();
        assert_eq!(rebuilt, pose);
    }

    #[test]
    fn test_client_message_json_roundtrip() {
        let msg = ClientMessage::Pose(sample_update());
        let json = msg.to_json().unwrap();
        let parsed = ClientMessage::from_json(&json).unwrap();

        if let ClientMessage::Pose(update) = parsed {
            assert_eq!(update, sample_update());
        } else {
            panic!("Wrong message type");
        }
    }

    #[test]
    fn test_join_request_roundtrip() {
        let msg = ClientMessage::Join(JoinRequest {
            room: "catacombs".to_string(),
            player_id: hex::encode([7u8; 16]),
            client_version: "0.1.0".to_string(),
        });
        let json = msg.to_json().unwrap();
        assert!(json.contains("join"));

        if let ClientMessage::Join(join) = ClientMessage::from_json(&json).unwrap() {
            assert_eq!(join.room, "catacombs");
            assert_eq!(join.player_id_bytes(), Some([7u8; 16]));
        } else {
            panic!("Wrong message type");
        }
    }

    #[test]
    fn test_join_request_rejects_bad_ids() {
        let join = JoinRequest {
            room: "r".to_string(),
            player_id: "not-hex".to_string(),
            client_version: String::new(),
        };
        assert_eq!(join.player_id_bytes(), None);

        let short = JoinRequest {
            player_id: "abcd".to_string(),
            ..join
        };
        assert_eq!(short.player_id_bytes(), None);
    }

    #[test]
    fn test_server_message_json_roundtrip() {
        let msg = ServerMessage::Pose {
            player_id: hex::encode([3u8; 16]),
            update: sample_update(),
        };
        let json = msg.to_json().unwrap();
        let parsed = ServerMessage::from_json(&json).unwrap();

        if let ServerMessage::Pose { update, .. } = parsed {
            assert_eq!(update, sample_update());
        } else {
            panic!("Wrong message type");
        }
    }

    #[test]
    fn test_error_codes() {
        let msg = ServerMessage::Error(RelayError {
            code: ErrorCode::NotJoined,
            message: "Join a room first".to_string(),
        });
        let json = msg.to_json().unwrap();
        assert!(json.contains("not_joined"));
    }
}
