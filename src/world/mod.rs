//! Interactable World State
//!
//! Event-driven toggling for world objects. The interaction raycaster
//! and held-item inventory live host-side; this module receives the
//! resulting "place item into slot" calls and reports what changed.

pub mod puzzle;
