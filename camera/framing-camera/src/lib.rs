//! Adaptive framing camera for multi-racer tracks.
//!
//! The camera keeps a changing pack of racers in view while smoothly
//! chasing one focal racer whose progress is periodically corrected from an
//! authoritative source and so jumps or drifts relative to its reported
//! speed.
//!
//! - [`FramingCamera`] - Zoom fitting and progress follow, ticked by [`FramingCamera::update`]
//! - [`EntityInfo`] - What the camera reads from each racer
//! - [`CameraSettings`] / [`Lens`] - Tuning and projection
//! - [`SyncDiagnostics`] - Reported versus observed focal speed
//!
//! # Tick order
//!
//! Call [`FramingCamera::update`] once per tick, after all racer motion for
//! that tick is final. The camera reads racer state, never writes it.
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**. Applying the
//! camera position and rotation to a scene camera is left to the caller.

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(
    clippy::cast_precision_loss,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::suboptimal_flops
)]

mod camera;
mod entity;
mod error;
mod settings;
mod state;

pub use camera::FramingCamera;
pub use entity::{EntityInfo, EntitySample, EntityState};
pub use error::{CameraError, CameraResult};
pub use settings::{CameraSettings, Lens};
pub use state::{CameraFrameState, FollowPhase, SyncDiagnostics};
