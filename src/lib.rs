//! # Cryptfall Netplay
//!
//! Client-side netplay core for Cryptfall: local movement prediction and
//! remote pose replication for networked first-person characters.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   CRYPTFALL NETPLAY                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Math primitives                           │
//! │  ├── vec3.rs     - 3D float vector                           │
//! │  └── rotation.rs - Yaw quaternion + smoothing helpers        │
//! │                                                              │
//! │  player/         - Character roles (single-threaded)         │
//! │  ├── pose.rs     - CharacterPose, the replicated unit        │
//! │  ├── input.rs    - Per-tick input frame, suspend handle      │
//! │  ├── config.rs   - Movement/look/smoothing tuning            │
//! │  ├── physics.rs  - PhysicsStepper seam + flat-ground stepper │
//! │  ├── local.rs    - Local authority integrator                │
//! │  ├── remote.rs   - Remote proxy smoother                     │
//! │  ├── controller.rs - Role dispatch + lifecycle trait         │
//! │  └── headbob.rs  - Camera bob for the local player           │
//! │                                                              │
//! │  menu/           - Pause menu screen machine                 │
//! │  world/          - Rune puzzle slots                         │
//! │                                                              │
//! │  net/            - Pose transport (async)                    │
//! │  ├── protocol.rs - Wire messages + 32-byte pose record       │
//! │  ├── pacing.rs   - Send/serialization rate limiting         │
//! │  ├── relay.rs    - WebSocket room relay server               │
//! │  └── client.rs   - Pose channel connector                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Replication Model
//!
//! Exactly one process is the **local authority** for each character: it
//! samples input, integrates gravity and jumps against an external
//! physics stepper, and authors a [`CharacterPose`] per tick. Every other
//! process holds a **remote proxy** that stores the last received pose
//! (last-write-wins, no reordering correction) and exponentially smooths
//! its rendered transform toward it each frame. The relay rebroadcasts
//! poses verbatim; nothing in this crate validates them.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod menu;
pub mod net;
pub mod player;
pub mod world;

// Re-export commonly used types
pub use crate::core::rotation::Quat;
pub use crate::core::vec3::Vec3;
pub use crate::net::pacing::{PacingConfig, PosePacer};
pub use crate::net::protocol::PoseUpdate;
pub use crate::player::config::PlayerConfig;
pub use crate::player::controller::{spawn_controller, CharacterController, Role};
pub use crate::player::input::{InputFrame, SuspendHandle};
pub use crate::player::local::LocalAuthorityController;
pub use crate::player::pose::CharacterPose;
pub use crate::player::remote::RemoteProxyController;
pub use crate::player::PlayerId;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Pose broadcast send rate (Hz) - transmissions per second
pub const SEND_RATE: u32 = 30;

/// Pose serialization rate (Hz) - snapshots captured per second
pub const SERIALIZATION_RATE: u32 = 20;
