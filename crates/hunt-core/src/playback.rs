use glam::Vec3;

use crate::recorder::Memo;

/// Pre-recorded voice prompts and effect sounds the engine can request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    /// Opening instruction: "find the first object".
    FindFirst,
    /// Mid-hunt instruction: "now find the next one".
    FindNext,
    /// A target was just discovered.
    Found,
    /// Every target found.
    Win,
    /// Ambient locator ping at the current target's position.
    Locator,
}

/// Handle to one playing sound; polled each tick to sequence prompts so
/// that a memo never overlaps the instruction that introduces it.
pub trait PlaybackHandle {
    fn is_playing(&self) -> bool;
}

/// Spatial audio playback service.
pub trait AudioOutput {
    fn play_cue(&mut self, cue: Cue, position: Vec3, volume: f32) -> Box<dyn PlaybackHandle>;
    fn play_memo(&mut self, memo: &Memo, position: Vec3) -> Box<dyn PlaybackHandle>;
}

/// Playback sink that discards everything; handles report finished
/// immediately. Useful headless and in tests that don't assert on audio.
#[derive(Default)]
pub struct NullAudio;

struct DoneHandle;

impl PlaybackHandle for DoneHandle {
    fn is_playing(&self) -> bool {
        false
    }
}

impl AudioOutput for NullAudio {
    fn play_cue(&mut self, _cue: Cue, _position: Vec3, _volume: f32) -> Box<dyn PlaybackHandle> {
        Box::new(DoneHandle)
    }

    fn play_memo(&mut self, _memo: &Memo, _position: Vec3) -> Box<dyn PlaybackHandle> {
        Box::new(DoneHandle)
    }
}
