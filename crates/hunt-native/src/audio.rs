//! Playback sink for the headless demo: announces cues on the log and
//! models their duration so the engine's prompt sequencing behaves as it
//! would against a real spatial-audio backend.

use std::time::{Duration, Instant};

use glam::Vec3;
use hunt_core::{AudioOutput, Cue, Memo, PlaybackHandle};

const CUE_SECONDS: f32 = 1.5;

struct TimedHandle {
    until: Instant,
}

impl PlaybackHandle for TimedHandle {
    fn is_playing(&self) -> bool {
        Instant::now() < self.until
    }
}

fn handle_for(seconds: f32) -> Box<dyn PlaybackHandle> {
    Box::new(TimedHandle {
        until: Instant::now() + Duration::from_secs_f32(seconds),
    })
}

#[derive(Default)]
pub struct LogAudio;

impl AudioOutput for LogAudio {
    fn play_cue(&mut self, cue: Cue, position: Vec3, volume: f32) -> Box<dyn PlaybackHandle> {
        log::info!("cue {cue:?} at {position} (vol {volume:.1})");
        handle_for(CUE_SECONDS)
    }

    fn play_memo(&mut self, memo: &Memo, position: Vec3) -> Box<dyn PlaybackHandle> {
        log::info!(
            "memo playback at {position} ({:.2}s, {} samples)",
            memo.duration_secs(),
            memo.samples().len()
        );
        handle_for(memo.duration_secs())
    }
}
