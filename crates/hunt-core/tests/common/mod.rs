// Shared collaborator doubles for the integration tests: a scriptable
// microphone, an audio sink that records what was asked of it, and an
// in-memory anchor service.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use fnv::FnvHashMap;
use glam::Vec3;
use hunt_core::{
    AnchorStore, AudioOutput, Cue, Memo, Microphone, PlaybackHandle, Pose, ReferenceFrame,
};

/// Microphone double fed by the test. `stall_reads` makes the next N
/// reads return nothing while `unread_samples` keeps reporting data,
/// reproducing the capture-source quirk the recorder works around.
pub struct FakeMic {
    recording: bool,
    buffer: Vec<f32>,
    cursor: usize,
    pub stall_reads: usize,
}

impl FakeMic {
    pub fn new() -> Self {
        Self {
            recording: false,
            buffer: Vec::new(),
            cursor: 0,
            stall_reads: 0,
        }
    }

    pub fn feed(&mut self, samples: &[f32]) {
        self.buffer.extend_from_slice(samples);
    }

    pub fn feed_constant(&mut self, value: f32, count: usize) {
        self.buffer.extend(std::iter::repeat(value).take(count));
    }
}

impl Microphone for FakeMic {
    fn start(&mut self) {
        self.recording = true;
    }

    fn stop(&mut self) {
        self.recording = false;
    }

    fn is_recording(&self) -> bool {
        self.recording
    }

    fn unread_samples(&self) -> usize {
        self.buffer.len() - self.cursor
    }

    fn read_samples(&mut self, out: &mut [f32]) -> usize {
        if self.stall_reads > 0 {
            self.stall_reads -= 1;
            return 0;
        }
        let n = out.len().min(self.buffer.len() - self.cursor);
        out[..n].copy_from_slice(&self.buffer[self.cursor..self.cursor + n]);
        self.cursor += n;
        n
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum AudioEvent {
    Cue(Cue, Vec3),
    Memo(usize, Vec3), // sample count, position
}

struct FlagHandle(Arc<AtomicBool>);

impl PlaybackHandle for FlagHandle {
    fn is_playing(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Records every playback request; each returned handle stays "playing"
/// until the test calls `finish_all`.
#[derive(Default)]
pub struct FakeAudio {
    pub events: Vec<AudioEvent>,
    handles: Vec<Arc<AtomicBool>>,
}

impl FakeAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish_all(&mut self) {
        for h in &self.handles {
            h.store(false, Ordering::SeqCst);
        }
    }

    pub fn cues(&self) -> Vec<Cue> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AudioEvent::Cue(c, _) => Some(*c),
                AudioEvent::Memo(..) => None,
            })
            .collect()
    }

    pub fn memo_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AudioEvent::Memo(..)))
            .count()
    }

    fn track(&mut self) -> Box<dyn PlaybackHandle> {
        let flag = Arc::new(AtomicBool::new(true));
        self.handles.push(Arc::clone(&flag));
        Box::new(FlagHandle(flag))
    }
}

impl AudioOutput for FakeAudio {
    fn play_cue(&mut self, cue: Cue, position: Vec3, _volume: f32) -> Box<dyn PlaybackHandle> {
        self.events.push(AudioEvent::Cue(cue, position));
        self.track()
    }

    fn play_memo(&mut self, memo: &Memo, position: Vec3) -> Box<dyn PlaybackHandle> {
        self.events
            .push(AudioEvent::Memo(memo.samples().len(), position));
        self.track()
    }
}

/// In-memory world-anchor service. Stores resolved world poses; a
/// configurable origin exercises the reference-frame math.
pub struct MemoryAnchors {
    map: Mutex<FnvHashMap<String, Pose>>,
    origin: Pose,
    pub reject_saves: AtomicBool,
}

impl MemoryAnchors {
    pub fn new() -> Self {
        Self::with_origin(Pose::IDENTITY)
    }

    pub fn with_origin(origin: Pose) -> Self {
        Self {
            map: Mutex::new(FnvHashMap::default()),
            origin,
            reject_saves: AtomicBool::new(false),
        }
    }

    pub fn insert(&self, name: &str, pose: Pose) {
        self.map
            .lock()
            .unwrap()
            .insert(name.to_string(), pose);
    }

    pub fn len(&self) -> usize {
        self.map.lock().unwrap().len()
    }
}

impl AnchorStore for MemoryAnchors {
    fn list_saved(&self) -> Vec<String> {
        let mut names: Vec<String> = self.map.lock().unwrap().keys().cloned().collect();
        names.sort();
        names
    }

    fn resolve(&self, name: &str) -> Option<Pose> {
        self.map.lock().unwrap().get(name).copied()
    }

    fn save(&self, name: &str, frame: &ReferenceFrame, pose_in_frame: &Pose) -> bool {
        if self.reject_saves.load(Ordering::SeqCst) {
            return false;
        }
        let world = frame.frame_to_world(pose_in_frame);
        self.map.lock().unwrap().insert(name.to_string(), world);
        true
    }

    fn remove(&self, name: &str) {
        self.map.lock().unwrap().remove(name);
    }

    fn reference_frame(&self) -> ReferenceFrame {
        ReferenceFrame::new(self.origin)
    }
}
