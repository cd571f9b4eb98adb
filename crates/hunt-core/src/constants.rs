// Shared tuning constants used by the core and the native harness.

// Audio memo capture
pub const MEMO_SAMPLE_RATE: u32 = 48_000; // samples per second, mono f32
pub const MAX_MEMO_SECONDS: usize = 5;
pub const MAX_MEMO_SAMPLES: usize = MEMO_SAMPLE_RATE as usize * MAX_MEMO_SECONDS;
pub const MIC_CHUNK_SAMPLES: usize = MEMO_SAMPLE_RATE as usize / 2; // scratch read size

// The capture source sometimes reports unread samples without advancing
// its read cursor; re-read until fewer than this many remain unread.
pub const MIC_DRAIN_SLACK: usize = 48;
pub const MIC_READ_RETRIES: usize = 8; // safety cap on the re-read loop

// Detection
pub const DESIGN_DWELL_SECS: f32 = 0.0; // instant selection while authoring
pub const HUNT_DWELL_SECS: f32 = 1.2; // deliberate discovery, no passing glances
pub const HUNT_MAX_DISTANCE: f32 = 2.0; // player must be this close in Hunt mode

// Target sizing (detection-sphere radius, metres)
pub const TARGET_SCALE_MIN: f32 = 0.05;
pub const TARGET_SCALE_MAX: f32 = 0.3;
pub const DEFAULT_TARGET_SCALE: f32 = 0.1;

// Audio prompts
pub const PROMPT_OFFSET: f32 = 0.5; // cues play slightly in front of the head
pub const LOCATOR_VOLUME: f32 = 0.6;
pub const CUE_VOLUME: f32 = 1.0;
