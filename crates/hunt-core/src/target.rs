use crate::anchors::AnchorStore;
use crate::constants::{TARGET_SCALE_MAX, TARGET_SCALE_MIN};
use crate::dwell::DwellTracker;
use crate::gaze::{self, TickInput};
use crate::pose::Pose;
use crate::recorder::{Memo, MemoRecorder, Microphone};
use crate::store::{config_key, memo_key, BlobStore, TargetConfig};

/// What the renderer should show for a target this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetVisual {
    Hidden,
    Seen,
    Selected,
}

/// Mode-dependent detection parameters; see the engine for the values
/// used in Design vs Hunt mode.
#[derive(Clone, Copy, Debug)]
pub struct EvalOptions {
    pub dwell_threshold: f32,
    pub max_distance: Option<f32>,
}

fn generate_name() -> String {
    format!("target-{:032x}", rand::random::<u128>())
}

/// A persisted point of interest: pose, detection state, optional audio
/// label, optional durable anchor. Owns the restore and cleanup of its
/// own memo and config blobs, keyed by its immutable `name`.
pub struct Target {
    pub pose: Pose,
    scale: f32,
    name: String,
    pub is_detected: bool,
    pub is_selected: bool,
    /// True while the operator is dragging this target (Design mode only).
    pub is_handled: bool,
    dwell: DwellTracker,
    pub memo: Option<Memo>,
    anchor_id: Option<String>,
    recorder: MemoRecorder,
}

impl Target {
    /// Create a target, restoring any previously persisted memo and scale
    /// under `name`. Absence of either is not an error; the fields keep
    /// their defaults.
    pub fn new(pose: Pose, scale: f32, name: Option<String>, blob: &dyn BlobStore) -> Self {
        let mut t = Self {
            pose,
            scale: scale.clamp(TARGET_SCALE_MIN, TARGET_SCALE_MAX),
            name: name.unwrap_or_else(generate_name),
            is_detected: false,
            is_selected: false,
            is_handled: false,
            dwell: DwellTracker::new(),
            memo: None,
            anchor_id: None,
            recorder: MemoRecorder::new(),
        };
        t.restore(blob);
        t
    }

    /// A target restored from a previously saved anchor at startup.
    pub fn from_anchor(pose: Pose, scale: f32, name: String, blob: &dyn BlobStore) -> Self {
        let mut t = Self::new(pose, scale, Some(name.clone()), blob);
        t.anchor_id = Some(name);
        t
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale.clamp(TARGET_SCALE_MIN, TARGET_SCALE_MAX);
    }

    pub fn anchor_id(&self) -> Option<&str> {
        self.anchor_id.as_deref()
    }

    pub fn set_anchor_id(&mut self, id: Option<String>) {
        self.anchor_id = id;
    }

    pub fn gaze_dwell(&self) -> f32 {
        self.dwell.elapsed()
    }

    /// Combine the gaze query with this target's own dwell accumulator.
    /// Returns whether the dwell threshold is exceeded this tick, plus the
    /// visual state: `Selected` overrides everything while this target
    /// holds admin focus, independent of gaze.
    pub fn evaluate(&mut self, tick: &TickInput, opts: &EvalOptions) -> (bool, TargetVisual) {
        let hit = gaze::detect(
            &tick.gaze,
            &tick.head,
            self.pose.position,
            self.scale,
            opts.max_distance,
        )
        .is_some();
        let detected = self.dwell.update(hit, tick.dt, opts.dwell_threshold);
        let visual = if self.is_selected {
            TargetVisual::Selected
        } else if detected {
            TargetVisual::Seen
        } else {
            TargetVisual::Hidden
        };
        (detected, visual)
    }

    pub fn reset_dwell(&mut self) {
        self.dwell.reset();
    }

    // --- recording ---

    pub fn is_recording(&self) -> bool {
        self.recorder.is_recording()
    }

    pub fn start_recording(&mut self, mic: &mut dyn Microphone) {
        self.recorder.start(mic);
    }

    /// Finalize the in-progress capture and keep the memo.
    pub fn stop_recording(&mut self, mic: &mut dyn Microphone) {
        if let Some(memo) = self.recorder.stop(mic) {
            self.memo = Some(memo);
        }
    }

    /// Per-tick capture poll; stores the memo if the buffer overflowed.
    pub fn pump_recording(&mut self, mic: &mut dyn Microphone) {
        if let Some(memo) = self.recorder.pump(mic) {
            self.memo = Some(memo);
        }
    }

    /// Stop capturing and throw the partial buffer away.
    pub fn cancel_recording(&mut self, mic: &mut dyn Microphone) {
        self.recorder.discard(mic);
    }

    // --- persistence ---

    /// Reload memo and scale metadata by name. Transient store failures
    /// are logged and leave the in-memory state untouched.
    pub fn restore(&mut self, blob: &dyn BlobStore) {
        match blob.read(&memo_key(&self.name)) {
            Ok(Some(bytes)) => self.memo = Some(Memo::from_bytes(&bytes)),
            Ok(None) => {}
            Err(e) => log::warn!("memo restore failed for {}: {e}", self.name),
        }
        match blob.read(&config_key(&self.name)) {
            Ok(Some(bytes)) => match TargetConfig::from_bytes(&bytes) {
                Ok(cfg) => self.set_scale(cfg.scale),
                Err(e) => log::warn!("config decode failed for {}: {e}", self.name),
            },
            Ok(None) => {}
            Err(e) => log::warn!("config restore failed for {}: {e}", self.name),
        }
    }

    /// Release everything persisted under this target's name: memo blob,
    /// config blob, and the durable anchor. Independent of in-memory
    /// removal from the collection; failures are logged, not propagated.
    pub fn delete(&mut self, blob: &dyn BlobStore, anchors: &dyn AnchorStore) {
        if let Err(e) = blob.delete(&memo_key(&self.name)) {
            log::warn!("memo delete failed for {}: {e}", self.name);
        }
        if let Err(e) = blob.delete(&config_key(&self.name)) {
            log::warn!("config delete failed for {}: {e}", self.name);
        }
        anchors.remove(&self.name);
        self.anchor_id = None;
    }
}
