//! Pose Send Pacing
//!
//! The outgoing pose channel runs on its own cadence, decoupled from
//! both the simulation tick and the render frame: snapshots of the
//! authored pose are captured at the serialization rate, and at most one
//! update is released per send interval. When the loop stalls, queued
//! snapshots coalesce to the latest one - correctness is unaffected
//! because every receiver is last-write-wins.

use crate::player::pose::CharacterPose;
use crate::net::protocol::PoseUpdate;
use crate::{SEND_RATE, SERIALIZATION_RATE};

/// Pacing tuning.
#[derive(Debug, Clone)]
pub struct PacingConfig {
    /// Transmissions per second.
    pub send_rate: u32,
    /// Pose snapshots captured per second.
    pub serialization_rate: u32,
    /// Skip snapshots identical to the last transmitted update. An idle
    /// character stops costing bandwidth.
    pub suppress_duplicates: bool,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            send_rate: SEND_RATE,
            serialization_rate: SERIALIZATION_RATE,
            suppress_duplicates: true,
        }
    }
}

/// Rate limiter between the authority's pose and the transport.
#[derive(Debug)]
pub struct PosePacer {
    send_interval: f32,
    snapshot_interval: f32,
    suppress_duplicates: bool,
    since_send: f32,
    since_snapshot: f32,
    pending: Option<PoseUpdate>,
    last_sent: Option<PoseUpdate>,
}

impl PosePacer {
    /// Create a pacer that is immediately ready to send (the spawn pose
    /// goes out on the first advance).
    pub fn new(config: PacingConfig) -> Self {
        let send_interval = 1.0 / config.send_rate.max(1) as f32;
        let snapshot_interval = 1.0 / config.serialization_rate.max(1) as f32;
        Self {
            send_interval,
            snapshot_interval,
            suppress_duplicates: config.suppress_duplicates,
            since_send: send_interval,
            since_snapshot: snapshot_interval,
            pending: None,
            last_sent: None,
        }
    }

    /// Advance pacing clocks by `dt` with the currently authored pose.
    ///
    /// Returns a record to transmit, or None when this interval stays
    /// quiet. Never returns more than one record per call - a long stall
    /// produces a single send carrying the latest snapshot.
    pub fn advance(&mut self, dt: f32, pose: &CharacterPose) -> Option<PoseUpdate> {
        self.since_snapshot += dt;
        self.since_send += dt;

        if self.since_snapshot >= self.snapshot_interval {
            self.since_snapshot %= self.snapshot_interval;
            let snapshot = PoseUpdate::from_pose(pose);
            let duplicate =
                self.suppress_duplicates && self.last_sent.as_ref() == Some(&snapshot);
            if !duplicate {
                // Coalesce: an unsent snapshot is simply replaced
                self.pending = Some(snapshot);
            }
        }

        if self.since_send >= self.send_interval {
            if let Some(update) = self.pending.take() {
                self.since_send %= self.send_interval;
                self.last_sent = Some(update);
                return Some(update);
            }
            // Nothing pending: stay armed so the next snapshot sends
            // without waiting out another full interval
            self.since_send = self.send_interval;
        }

        None
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vec3::Vec3;

    const DT: f32 = 1.0 / 60.0;

    fn pose_at_y(y: f32) -> CharacterPose {
        CharacterPose::at(Vec3::new(0.0, y, 0.0))
    }

    #[test]
    fn test_first_advance_sends_spawn_pose() {
        let mut pacer = PosePacer::new(PacingConfig::default());
        let sent = pacer.advance(DT, &pose_at_y(1.0));
        assert!(sent.is_some());
    }

    #[test]
    fn test_send_rate_is_bounded() {
        let mut pacer = PosePacer::new(PacingConfig::default());
        let mut sends = 0;
        // One second of 60 Hz ticks with a constantly moving pose
        for frame in 0..60 {
            if pacer.advance(DT, &pose_at_y(frame as f32)).is_some() {
                sends += 1;
            }
        }
        assert!(sends <= 30, "send rate cap violated: {} sends", sends);
        assert!(sends >= 15, "pacing starved the channel: {} sends", sends);
    }

    #[test]
    fn test_stall_coalesces_to_latest() {
        let mut pacer = PosePacer::new(PacingConfig::default());
        pacer.advance(DT, &pose_at_y(0.0));

        // A one-second stall arrives as a single big dt: exactly one
        // send comes out, carrying the newest pose
        let sent = pacer.advance(1.0, &pose_at_y(42.0));
        let update = sent.expect("stall should flush one update");
        assert_eq!(update.position[1], 42.0);

        assert!(pacer.advance(DT, &pose_at_y(42.0)).is_none());
    }

    #[test]
    fn test_idle_pose_goes_quiet() {
        let mut pacer = PosePacer::new(PacingConfig::default());
        let pose = pose_at_y(5.0);

        assert!(pacer.advance(DT, &pose).is_some());
        for _ in 0..240 {
            assert!(pacer.advance(DT, &pose).is_none(), "duplicate pose was sent");
        }
    }

    #[test]
    fn test_movement_resumes_sending() {
        let mut pacer = PosePacer::new(PacingConfig::default());
        let pose = pose_at_y(5.0);
        pacer.advance(DT, &pose);
        for _ in 0..60 {
            pacer.advance(DT, &pose);
        }

        let mut sent = false;
        for frame in 0..10 {
            if pacer.advance(DT, &pose_at_y(6.0 + frame as f32)).is_some() {
                sent = true;
                break;
            }
        }
        assert!(sent, "movement after idle must resume the stream");
    }

    #[test]
    fn test_duplicate_suppression_can_be_disabled() {
        let config = PacingConfig {
            suppress_duplicates: false,
            ..Default::default()
        };
        let mut pacer = PosePacer::new(config);
        let pose = pose_at_y(5.0);

        let mut sends = 0;
        for _ in 0..60 {
            if pacer.advance(DT, &pose).is_some() {
                sends += 1;
            }
        }
        assert!(sends > 10, "keepalive stream expected: {} sends", sends);
    }
}
