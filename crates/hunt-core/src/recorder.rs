use std::sync::Arc;

use crate::constants::{
    MAX_MEMO_SAMPLES, MEMO_SAMPLE_RATE, MIC_CHUNK_SAMPLES, MIC_DRAIN_SLACK, MIC_READ_RETRIES,
};

/// Finalized, immutable audio label for a target.
#[derive(Clone, Debug)]
pub struct Memo {
    samples: Arc<[f32]>,
    sample_rate: u32,
}

impl Memo {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples: samples.into(),
            sample_rate,
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// Little-endian f32 encoding used for the memo blob.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.samples.len() * 4);
        for s in self.samples.iter() {
            out.extend_from_slice(&s.to_le_bytes());
        }
        out
    }

    /// Decode a memo blob; trailing partial samples are ignored.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let samples: Vec<f32> = bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        Self::new(samples, MEMO_SAMPLE_RATE)
    }
}

/// Microphone capture service as seen by the core: start/stop controlled,
/// polled for whatever samples have arrived since the last read.
pub trait Microphone {
    fn start(&mut self);
    fn stop(&mut self);
    fn is_recording(&self) -> bool;
    /// Samples buffered by the capture side that `read_samples` has not
    /// yet consumed. May lag reality; see `MemoRecorder::pump`.
    fn unread_samples(&self) -> usize;
    /// Copy up to `out.len()` unread samples into `out`, returning the count.
    fn read_samples(&mut self, out: &mut [f32]) -> usize;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecorderState {
    Idle,
    Recording,
}

/// Accumulates streaming microphone chunks into a fixed-capacity buffer
/// and finalizes into an immutable [`Memo`] on stop or on overflow.
pub struct MemoRecorder {
    buf: Vec<f32>,
    chunk: Vec<f32>,
    state: RecorderState,
}

impl Default for MemoRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoRecorder {
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(MAX_MEMO_SAMPLES),
            chunk: vec![0.0; MIC_CHUNK_SAMPLES],
            state: RecorderState::Idle,
        }
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state == RecorderState::Recording
    }

    pub fn written(&self) -> usize {
        self.buf.len()
    }

    /// Begin a new capture: rewind the write cursor and start the mic.
    /// Already recording is a no-op, so a double start behaves like one.
    pub fn start(&mut self, mic: &mut dyn Microphone) {
        if self.state == RecorderState::Recording {
            return;
        }
        self.buf.clear();
        self.state = RecorderState::Recording;
        mic.start();
    }

    /// Append captured samples up to capacity. Samples past the maximum
    /// buffer length are silently dropped; hitting capacity finalizes the
    /// memo as an implicit stop.
    pub fn ingest(&mut self, chunk: &[f32], mic: &mut dyn Microphone) -> Option<Memo> {
        if self.state != RecorderState::Recording {
            return None;
        }
        let room = MAX_MEMO_SAMPLES - self.buf.len();
        let take = chunk.len().min(room);
        self.buf.extend_from_slice(&chunk[..take]);
        if self.buf.len() >= MAX_MEMO_SAMPLES {
            return self.stop(mic);
        }
        None
    }

    /// Finalize the capture into a memo trimmed to the written length.
    /// Idle is a no-op.
    pub fn stop(&mut self, mic: &mut dyn Microphone) -> Option<Memo> {
        if self.state != RecorderState::Recording {
            return None;
        }
        mic.stop();
        self.state = RecorderState::Idle;
        let samples = std::mem::take(&mut self.buf);
        log::debug!(
            "memo finalized: {} samples ({:.2}s)",
            samples.len(),
            samples.len() as f32 / MEMO_SAMPLE_RATE as f32
        );
        Some(Memo::new(samples, MEMO_SAMPLE_RATE))
    }

    /// Throw away the in-progress buffer, e.g. when the owning target is
    /// deleted mid-recording.
    pub fn discard(&mut self, mic: &mut dyn Microphone) {
        if self.state == RecorderState::Recording {
            mic.stop();
        }
        self.state = RecorderState::Idle;
        self.buf.clear();
    }

    /// Per-tick poll of the capture source. The source sometimes reports
    /// unread samples without advancing its read cursor, so a single read
    /// can silently return the same data window; re-read until the unread
    /// count genuinely drops below a small slack, with a retry cap.
    ///
    /// Returns the finalized memo when this pump overflowed the buffer.
    pub fn pump(&mut self, mic: &mut dyn Microphone) -> Option<Memo> {
        if self.state != RecorderState::Recording || !mic.is_recording() {
            return None;
        }
        if mic.unread_samples() == 0 {
            return None;
        }
        let mut attempts = 0;
        loop {
            let n = mic.read_samples(&mut self.chunk);
            attempts += 1;
            if n > 0 {
                let chunk: Vec<f32> = self.chunk[..n].to_vec();
                if let Some(memo) = self.ingest(&chunk, mic) {
                    return Some(memo);
                }
            }
            if mic.unread_samples() <= MIC_DRAIN_SLACK || attempts >= MIC_READ_RETRIES {
                return None;
            }
        }
    }

}

/// Discard whatever the mic has buffered while no capture is active. The
/// capture source misbehaves on its very first buffer, so the engine keeps
/// the stream warm and throws the samples away until a real recording
/// starts.
pub fn drain_mic(mic: &mut dyn Microphone, scratch: &mut [f32]) {
    if !mic.is_recording() {
        return;
    }
    let mut attempts = 0;
    while mic.unread_samples() > MIC_DRAIN_SLACK && attempts < MIC_READ_RETRIES {
        let _ = mic.read_samples(scratch);
        attempts += 1;
    }
}
