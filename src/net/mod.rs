//! Pose Transport
//!
//! Everything async lives here. The player roles stay synchronous; they
//! meet the network only through whole-value pose records passed over
//! channels, so a receiver can never observe a half-updated pose.

pub mod client;
pub mod pacing;
pub mod protocol;
pub mod relay;
