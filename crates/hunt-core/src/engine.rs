use std::sync::Arc;

use glam::Vec3;

use crate::anchors::AnchorStore;
use crate::constants::{
    CUE_VOLUME, DEFAULT_TARGET_SCALE, DESIGN_DWELL_SECS, HUNT_DWELL_SECS, HUNT_MAX_DISTANCE,
    LOCATOR_VOLUME, MIC_CHUNK_SAMPLES, PROMPT_OFFSET,
};
use crate::gaze::{HeadPose, TickInput};
use crate::persist::{self, SaveTask};
use crate::playback::{AudioOutput, Cue, PlaybackHandle};
use crate::pose::Pose;
use crate::recorder::{drain_mic, Microphone};
use crate::store::BlobStore;
use crate::target::{EvalOptions, Target, TargetVisual};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Authoring: all targets visible and editable, instant gaze selection.
    Design,
    /// Play: targets hidden, found one at a time by deliberate dwell.
    Hunt,
}

/// Drives the voice-prompt sequencing while a hunt is playing, so the
/// target's recorded label always follows, never overlaps, the
/// instructional cue that introduces it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PromptState {
    Idle,
    /// An instruction is playing; once it ends, play the current target's memo.
    AwaitingName,
    /// The found-cue is playing; once it ends, play the "find the next one" cue.
    AwaitingNext,
}

/// Orchestrates the target collection: mode state machine, sequential
/// hunt progression, hunt timer, prompt sequencing, recording, and
/// best-effort persistence. One instance per session, owned by whatever
/// drives the tick loop.
pub struct HuntEngine {
    targets: Vec<Target>,
    /// Index into `targets`, never a reference; deletion clears it.
    current: Option<usize>,
    mode: Mode,
    prompt: PromptState,
    instruction: Cue,
    playing: bool,
    hunt_duration: f64,
    /// Most recent prompt/cue handle; polled to sequence audio.
    sound: Option<Box<dyn PlaybackHandle>>,
    /// Index of the target currently capturing a memo.
    recording: Option<usize>,
    mic_scratch: Vec<f32>,

    pub use_locator_sound: bool,
    pub use_visual_hint: bool,
    pub use_compass: bool,

    blob: Arc<dyn BlobStore>,
    anchors: Arc<dyn AnchorStore>,
    pending_save: Option<SaveTask>,
}

impl HuntEngine {
    /// Build the engine in Design mode and restore every target whose
    /// anchor survived from a previous session.
    pub fn new(blob: Arc<dyn BlobStore>, anchors: Arc<dyn AnchorStore>) -> Self {
        let mut engine = Self {
            targets: Vec::new(),
            current: None,
            mode: Mode::Design,
            prompt: PromptState::Idle,
            instruction: Cue::FindFirst,
            playing: false,
            hunt_duration: 0.0,
            sound: None,
            recording: None,
            mic_scratch: vec![0.0; MIC_CHUNK_SAMPLES],
            use_locator_sound: false,
            use_visual_hint: false,
            use_compass: false,
            blob,
            anchors,
            pending_save: None,
        };
        engine.restore_saved_targets();
        engine
    }

    fn restore_saved_targets(&mut self) {
        for name in self.anchors.list_saved() {
            let Some(pose) = self.anchors.resolve(&name) else {
                log::warn!("saved anchor '{name}' no longer resolves, skipping");
                continue;
            };
            let target = Target::from_anchor(pose, DEFAULT_TARGET_SCALE, name, self.blob.as_ref());
            self.targets.push(target);
            self.current = Some(self.targets.len() - 1);
        }
        if !self.targets.is_empty() {
            log::info!("restored {} anchored targets", self.targets.len());
        }
    }

    // --- accessors ---

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn prompt_state(&self) -> PromptState {
        self.prompt
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn hunt_duration(&self) -> f64 {
        self.hunt_duration
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Mutable access to the collection as a slice; insertion and removal
    /// stay engine operations so `current` can never dangle.
    pub fn targets_mut(&mut self) -> &mut [Target] {
        &mut self.targets
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current(&self) -> Option<&Target> {
        self.current.and_then(|i| self.targets.get(i))
    }

    fn current_mut(&mut self) -> Option<&mut Target> {
        self.current.and_then(|i| self.targets.get_mut(i))
    }

    /// Lowest-index target the current hunt pass has not found yet.
    pub fn next_target_index(&self) -> Option<usize> {
        self.targets.iter().position(|t| !t.is_detected)
    }

    pub fn remaining_target_count(&self) -> usize {
        self.targets.iter().filter(|t| !t.is_detected).count()
    }

    pub fn is_finished(&self) -> bool {
        self.next_target_index().is_none()
    }

    /// True once every target carries a recorded label; the UI must check
    /// this before offering "add target" or the switch to Hunt mode.
    pub fn all_memos_recorded(&self) -> bool {
        self.targets.iter().all(|t| t.memo.is_some())
    }

    pub fn is_recording(&self) -> bool {
        self.recording.is_some()
    }

    // --- authoring (Design mode) ---

    pub fn add_target(&mut self, pose: Pose) -> usize {
        let target = Target::new(pose, DEFAULT_TARGET_SCALE, None, self.blob.as_ref());
        log::info!("added target {}", target.name());
        self.targets.push(target);
        let idx = self.targets.len() - 1;
        self.current = Some(idx);
        idx
    }

    /// Delete the current target and everything persisted under its name.
    /// A capture in progress on it is discarded first.
    pub fn delete_current_target(&mut self, mic: &mut dyn Microphone) {
        let Some(idx) = self.current.take() else {
            return;
        };
        if self.recording == Some(idx) {
            self.targets[idx].cancel_recording(mic);
            self.recording = None;
        }
        let mut target = self.targets.remove(idx);
        log::info!("deleting target {}", target.name());
        target.delete(self.blob.as_ref(), self.anchors.as_ref());
        if let Some(r) = self.recording {
            if r > idx {
                self.recording = Some(r - 1);
            }
        }
    }

    /// Exclusive admin-panel focus: at most one target selected at a time.
    pub fn select_target(&mut self, idx: usize) {
        for (i, t) in self.targets.iter_mut().enumerate() {
            t.is_selected = i == idx;
        }
        if idx < self.targets.len() {
            self.current = Some(idx);
        }
    }

    pub fn set_current_scale(&mut self, scale: f32) {
        if let Some(t) = self.current_mut() {
            t.set_scale(scale);
        }
    }

    /// Externally driven drag: only meaningful while authoring.
    pub fn move_current(&mut self, pose: Pose) {
        if self.mode != Mode::Design {
            return;
        }
        if let Some(t) = self.current_mut() {
            t.pose = pose;
            t.is_handled = true;
        }
    }

    pub fn end_drag(&mut self) {
        if let Some(t) = self.current_mut() {
            t.is_handled = false;
        }
    }

    pub fn start_recording(&mut self, mic: &mut dyn Microphone) {
        if self.recording.is_some() {
            return;
        }
        if let Some(idx) = self.current {
            self.targets[idx].start_recording(mic);
            self.recording = Some(idx);
        }
    }

    pub fn stop_recording(&mut self, mic: &mut dyn Microphone) {
        if let Some(idx) = self.recording.take() {
            self.targets[idx].stop_recording(mic);
        }
    }

    /// Operator playback of the current target's label.
    pub fn play_current_memo(&mut self, audio: &mut dyn AudioOutput, head: &HeadPose) {
        let pos = prompt_position(head);
        if let Some(memo) = self.current().and_then(|t| t.memo.clone()) {
            audio.play_memo(&memo, pos);
        }
    }

    // --- persistence ---

    /// Fire-and-forget save of every target: memo and config blobs plus a
    /// durable anchor, all relative to one reference frame taken now. The
    /// outcome is applied when a later tick polls it.
    pub fn save(&mut self) {
        if self.pending_save.is_some() {
            log::warn!("save already in flight, restarting batch");
        }
        let snapshots = self.targets.iter().map(persist::snapshot).collect();
        self.pending_save = Some(persist::save_all(
            snapshots,
            Arc::clone(&self.blob),
            Arc::clone(&self.anchors),
        ));
    }

    pub fn save_in_flight(&self) -> bool {
        self.pending_save.is_some()
    }

    fn poll_save(&mut self) {
        let Some(task) = self.pending_save.as_ref() else {
            return;
        };
        let Some(result) = task.poll() else {
            return;
        };
        self.pending_save = None;
        for entry in result.entries {
            if let Some(e) = &entry.error {
                log::warn!("save incomplete for {}: {e}", entry.name);
            }
            if let Some(t) = self.targets.iter_mut().find(|t| t.name() == entry.name) {
                t.set_anchor_id(entry.anchor_id);
            }
        }
    }

    /// Per-tick pull of drift-corrected poses for anchored targets.
    fn apply_anchor_drift(&mut self) {
        for t in &mut self.targets {
            if t.is_handled {
                continue; // operator drag wins over drift correction
            }
            if let Some(id) = t.anchor_id() {
                if let Some(pose) = self.anchors.resolve(id) {
                    t.pose = pose;
                }
            }
        }
    }

    // --- mode transitions ---

    /// Clear all detection state for a fresh pass.
    pub fn reset(&mut self) {
        for t in &mut self.targets {
            t.is_detected = false;
            t.reset_dwell();
        }
    }

    /// Refused unless there is at least one target and every target has a
    /// recorded label; returns whether the switch happened.
    pub fn switch_to_hunt(&mut self) -> bool {
        if self.targets.is_empty() || !self.all_memos_recorded() {
            return false;
        }
        self.reset();
        self.playing = false;
        self.current = None;
        for t in &mut self.targets {
            t.is_selected = false;
        }
        self.mode = Mode::Hunt;
        log::info!("switched to hunt mode");
        true
    }

    pub fn design_mode(&mut self, mic: &mut dyn Microphone) {
        if let Some(idx) = self.recording.take() {
            self.targets[idx].cancel_recording(mic);
        }
        self.reset();
        self.current = None;
        self.mode = Mode::Design;
        log::info!("switched to design mode");
    }

    /// Begin a timed hunt attempt: all targets undetected, timer zeroed,
    /// first target up, opening instruction playing.
    pub fn start_hunt(&mut self, audio: &mut dyn AudioOutput, head: &HeadPose) {
        if self.mode != Mode::Hunt || self.targets.is_empty() {
            return;
        }
        self.reset();
        self.hunt_duration = 0.0;
        self.playing = true;
        self.current = self.next_target_index();
        self.play_instruction(Cue::FindFirst, audio, head);
    }

    /// Replay the current instruction (operator "repeat" button).
    pub fn repeat_instruction(&mut self, audio: &mut dyn AudioOutput, head: &HeadPose) {
        if self.playing {
            self.play_instruction(self.instruction, audio, head);
        }
    }

    fn play_instruction(&mut self, cue: Cue, audio: &mut dyn AudioOutput, head: &HeadPose) {
        self.instruction = cue;
        self.sound = Some(audio.play_cue(cue, prompt_position(head), CUE_VOLUME));
        self.prompt = PromptState::AwaitingName;
    }

    /// Stop an in-progress hunt and fall back to authoring. The only way
    /// out of Hunt mode besides finding everything.
    pub fn abort(&mut self, mic: &mut dyn Microphone) {
        self.playing = false;
        self.hunt_duration = 0.0;
        self.prompt = PromptState::Idle;
        self.sound = None;
        self.design_mode(mic);
    }

    // --- hint channels ---

    /// World position the compass hint should point at, when active.
    pub fn compass_target(&self) -> Option<Vec3> {
        if self.mode == Mode::Hunt && self.use_compass {
            self.current().map(|t| t.pose.position)
        } else {
            None
        }
    }

    pub fn hint_visible(&self) -> bool {
        self.mode == Mode::Hunt && self.use_visual_hint && self.current.is_some()
    }

    // --- tick ---

    /// One cooperative tick. Fills `out_visuals` with one entry per target
    /// in collection order for the renderer to consume.
    pub fn step(
        &mut self,
        tick: &TickInput,
        mic: &mut dyn Microphone,
        audio: &mut dyn AudioOutput,
        out_visuals: &mut Vec<TargetVisual>,
    ) {
        out_visuals.clear();
        self.apply_anchor_drift();
        self.poll_save();

        match self.mode {
            Mode::Design => {
                // Scan the whole list; on overlapping zones the first in
                // collection order wins the selection.
                let opts = EvalOptions {
                    dwell_threshold: DESIGN_DWELL_SECS,
                    max_distance: None,
                };
                let mut hit = None;
                for (i, t) in self.targets.iter_mut().enumerate() {
                    let (detected, visual) = t.evaluate(tick, &opts);
                    out_visuals.push(visual);
                    if detected && hit.is_none() {
                        hit = Some(i);
                    }
                }
                if let Some(i) = hit {
                    self.select_target(i);
                    out_visuals[i] = TargetVisual::Selected;
                }
            }
            Mode::Hunt => {
                // Only the current target is evaluated; everything stays
                // hidden unless the operator enabled the visual hint.
                let visual = if self.hint_visible() {
                    TargetVisual::Seen
                } else {
                    TargetVisual::Hidden
                };
                for (i, _) in self.targets.iter().enumerate() {
                    out_visuals.push(if Some(i) == self.current {
                        visual
                    } else {
                        TargetVisual::Hidden
                    });
                }
                if self.playing {
                    if let Some(i) = self.current {
                        let opts = EvalOptions {
                            dwell_threshold: HUNT_DWELL_SECS,
                            max_distance: Some(HUNT_MAX_DISTANCE),
                        };
                        let (detected, _) = self.targets[i].evaluate(tick, &opts);
                        if detected {
                            self.select_target(i);
                            self.target_detected(i, audio);
                        }
                    }
                }
            }
        }

        self.handle_recording(mic);
        self.advance_prompts(tick, audio);

        // Ambient locator ping whenever no prompt occupies the channel.
        if self.mode == Mode::Hunt && self.use_locator_sound && !self.sound_playing() {
            if let Some(t) = self.current() {
                let pos = t.pose.position;
                self.sound = Some(audio.play_cue(Cue::Locator, pos, LOCATOR_VOLUME));
            }
        }

        if self.playing {
            self.hunt_duration += tick.dt as f64;
        }
    }

    fn target_detected(&mut self, idx: usize, audio: &mut dyn AudioOutput) {
        self.targets[idx].is_detected = true;
        log::debug!("target {} detected", self.targets[idx].name());
        if !self.playing {
            return;
        }
        let found_pos = self.targets[idx].pose.position;
        self.current = self.next_target_index();
        if self.current.is_none() {
            // All found: the win cue ends the attempt and stops the timer.
            audio.play_cue(Cue::Win, found_pos, CUE_VOLUME);
            self.playing = false;
            self.prompt = PromptState::Idle;
        } else {
            self.sound = Some(audio.play_cue(Cue::Found, found_pos, CUE_VOLUME));
            self.prompt = PromptState::AwaitingNext;
        }
    }

    fn handle_recording(&mut self, mic: &mut dyn Microphone) {
        match self.recording {
            Some(idx) => {
                self.targets[idx].pump_recording(mic);
                // Overflow auto-stops the capture.
                if !self.targets[idx].is_recording() {
                    self.recording = None;
                }
            }
            None => drain_mic(mic, &mut self.mic_scratch),
        }
    }

    fn advance_prompts(&mut self, tick: &TickInput, audio: &mut dyn AudioOutput) {
        if !self.playing || self.current.is_none() {
            return;
        }
        match self.prompt {
            PromptState::AwaitingName => {
                if !self.sound_playing() {
                    let pos = prompt_position(&tick.head);
                    if let Some(memo) = self.current().and_then(|t| t.memo.clone()) {
                        self.sound = Some(audio.play_memo(&memo, pos));
                    }
                    self.prompt = PromptState::Idle;
                }
            }
            PromptState::AwaitingNext => {
                if !self.sound_playing() {
                    self.play_instruction(Cue::FindNext, audio, &tick.head);
                }
            }
            PromptState::Idle => {}
        }
    }

    fn sound_playing(&self) -> bool {
        self.sound.as_ref().is_some_and(|h| h.is_playing())
    }
}

fn prompt_position(head: &HeadPose) -> Vec3 {
    head.position + head.forward * PROMPT_OFFSET
}

/// Render a hunt duration as the board shows it, `mm:ss`.
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}
