//! Microphone capture for the native harness: a cpal input stream feeding
//! a shared queue the core polls, with a synthetic fallback for machines
//! without an input device.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, bail, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use hunt_core::Microphone;

pub struct CpalMicrophone {
    queue: Arc<Mutex<VecDeque<f32>>>,
    capturing: Arc<AtomicBool>,
    // Keeps the stream alive; dropping it stops capture.
    _stream: cpal::Stream,
}

impl CpalMicrophone {
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| anyhow!("no default input device"))?;
        let config = device.default_input_config()?;
        if config.sample_format() != cpal::SampleFormat::F32 {
            bail!("input device does not produce f32 samples");
        }
        let channels = config.channels() as usize;
        let rate = config.sample_rate().0;
        if rate != hunt_core::MEMO_SAMPLE_RATE {
            log::warn!(
                "input device runs at {rate} Hz, memos assume {} Hz",
                hunt_core::MEMO_SAMPLE_RATE
            );
        }

        let queue = Arc::new(Mutex::new(VecDeque::new()));
        let capturing = Arc::new(AtomicBool::new(false));
        let cb_queue = Arc::clone(&queue);
        let cb_capturing = Arc::clone(&capturing);
        let stream = device.build_input_stream(
            &config.into(),
            move |data: &[f32], _| {
                if !cb_capturing.load(Ordering::Relaxed) {
                    return;
                }
                let mut q = cb_queue.lock().expect("mic queue lock");
                // Mono: keep the first channel of each frame.
                for frame in data.chunks(channels) {
                    q.push_back(frame[0]);
                }
            },
            |e| log::warn!("input stream error: {e}"),
            None,
        )?;
        stream.play()?;
        log::info!("microphone capture ready ({channels} ch @ {rate} Hz)");

        Ok(Self {
            queue,
            capturing,
            _stream: stream,
        })
    }
}

impl Microphone for CpalMicrophone {
    fn start(&mut self) {
        self.queue.lock().expect("mic queue lock").clear();
        self.capturing.store(true, Ordering::Relaxed);
    }

    fn stop(&mut self) {
        self.capturing.store(false, Ordering::Relaxed);
    }

    fn is_recording(&self) -> bool {
        self.capturing.load(Ordering::Relaxed)
    }

    fn unread_samples(&self) -> usize {
        self.queue.lock().expect("mic queue lock").len()
    }

    fn read_samples(&mut self, out: &mut [f32]) -> usize {
        let mut q = self.queue.lock().expect("mic queue lock");
        let n = out.len().min(q.len());
        for slot in out[..n].iter_mut() {
            *slot = q.pop_front().unwrap_or(0.0);
        }
        n
    }
}

/// Deterministic sine-wave source for machines without a capture device.
/// `advance` is called once per demo tick to simulate samples arriving.
pub struct SimMicrophone {
    recording: bool,
    pending: usize,
    phase: f32,
}

impl SimMicrophone {
    pub fn new() -> Self {
        Self {
            recording: false,
            pending: 0,
            phase: 0.0,
        }
    }

    pub fn advance(&mut self, samples: usize) {
        if self.recording {
            self.pending += samples;
        }
    }
}

impl Microphone for SimMicrophone {
    fn start(&mut self) {
        self.recording = true;
        self.pending = 0;
    }

    fn stop(&mut self) {
        self.recording = false;
    }

    fn is_recording(&self) -> bool {
        self.recording
    }

    fn unread_samples(&self) -> usize {
        self.pending
    }

    fn read_samples(&mut self, out: &mut [f32]) -> usize {
        let n = out.len().min(self.pending);
        for slot in out[..n].iter_mut() {
            *slot = (self.phase * std::f32::consts::TAU).sin() * 0.3;
            self.phase = (self.phase + 440.0 / hunt_core::MEMO_SAMPLE_RATE as f32).fract();
        }
        self.pending -= n;
        n
    }
}

/// Whichever capture source the machine can offer.
pub enum Mic {
    Cpal(CpalMicrophone),
    Sim(SimMicrophone),
}

impl Mic {
    pub fn open() -> Self {
        match CpalMicrophone::new() {
            Ok(m) => Mic::Cpal(m),
            Err(e) => {
                log::warn!("falling back to simulated microphone: {e}");
                Mic::Sim(SimMicrophone::new())
            }
        }
    }

    /// Per-tick hook for the simulated source; real capture ignores it.
    pub fn advance(&mut self, samples: usize) {
        if let Mic::Sim(m) = self {
            m.advance(samples);
        }
    }
}

impl Microphone for Mic {
    fn start(&mut self) {
        match self {
            Mic::Cpal(m) => m.start(),
            Mic::Sim(m) => m.start(),
        }
    }

    fn stop(&mut self) {
        match self {
            Mic::Cpal(m) => m.stop(),
            Mic::Sim(m) => m.stop(),
        }
    }

    fn is_recording(&self) -> bool {
        match self {
            Mic::Cpal(m) => m.is_recording(),
            Mic::Sim(m) => m.is_recording(),
        }
    }

    fn unread_samples(&self) -> usize {
        match self {
            Mic::Cpal(m) => m.unread_samples(),
            Mic::Sim(m) => m.unread_samples(),
        }
    }

    fn read_samples(&mut self, out: &mut [f32]) -> usize {
        match self {
            Mic::Cpal(m) => m.read_samples(out),
            Mic::Sim(m) => m.read_samples(out),
        }
    }
}
