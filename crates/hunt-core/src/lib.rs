//! Core target lifecycle and detection state machine for the spatial
//! hide-and-seek hunt. Platform services (gaze tracking, microphone,
//! world anchors, blob storage, audio playback) are traits implemented by
//! the frontends; everything here is pure, single-threaded tick logic
//! apart from the background save worker.

pub mod anchors;
pub mod constants;
pub mod dwell;
pub mod engine;
pub mod gaze;
pub mod persist;
pub mod playback;
pub mod pose;
pub mod recorder;
pub mod store;
pub mod target;

pub use anchors::*;
pub use constants::*;
pub use dwell::*;
pub use engine::*;
pub use gaze::*;
pub use persist::*;
pub use playback::*;
pub use pose::*;
pub use recorder::*;
pub use store::*;
pub use target::*;
