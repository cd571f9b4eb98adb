//! Headless demo of the hunt core on a desktop: authors a small scene,
//! records a label per target (real microphone when available), persists
//! everything, then plays the hunt back with a scripted gaze.
//!
//! Run it twice to see the anchored targets restore from disk.

mod audio;
mod mic;
mod stores;

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Result};
use glam::Vec3;
use hunt_core::{
    format_duration, GazeRay, HeadPose, HuntEngine, Pose, TargetVisual, TickInput,
    MEMO_SAMPLE_RATE,
};

use audio::LogAudio;
use mic::Mic;
use stores::{FileAnchorStore, FileBlobStore};

const TICK_SECS: f32 = 1.0 / 60.0;
const MEMO_RECORD_SECS: f32 = 2.0;
const HUNT_TIMEOUT_TICKS: usize = 60 * 60;

fn idle_tick() -> TickInput {
    TickInput {
        dt: TICK_SECS,
        gaze: GazeRay::inactive(),
        head: HeadPose::default(),
    }
}

/// Player standing one metre from `target`, staring straight at it.
fn gaze_at(target: Vec3) -> TickInput {
    let origin = target - Vec3::Z;
    TickInput {
        dt: TICK_SECS,
        gaze: GazeRay {
            origin,
            dir: Vec3::Z,
            active: true,
        },
        head: HeadPose {
            position: origin,
            forward: Vec3::Z,
        },
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let data_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("hunt-data"));
    let blob = Arc::new(FileBlobStore::new(data_dir.join("blobs"))?);
    let anchors = Arc::new(FileAnchorStore::new(data_dir.join("anchors.json"))?);

    let mut engine = HuntEngine::new(blob, anchors);
    let mut mic = Mic::open();
    let mut audio = LogAudio::default();
    let mut visuals: Vec<TargetVisual> = Vec::new();

    if engine.targets().is_empty() {
        author_scene(&mut engine, &mut mic, &mut audio, &mut visuals)?;
    } else {
        println!("restored {} targets from a previous session", engine.targets().len());
    }

    if !engine.switch_to_hunt() {
        bail!("cannot start the hunt: some targets have no recorded label");
    }
    run_hunt(&mut engine, &mut mic, &mut audio, &mut visuals)?;

    println!(
        "hunt finished: {} targets in {}",
        engine.targets().len(),
        format_duration(engine.hunt_duration())
    );
    Ok(())
}

fn author_scene(
    engine: &mut HuntEngine,
    mic: &mut Mic,
    audio: &mut LogAudio,
    visuals: &mut Vec<TargetVisual>,
) -> Result<()> {
    let spots = [Vec3::new(0.8, 1.2, -1.5), Vec3::new(-0.6, 0.9, -2.0)];
    let samples_per_tick = (MEMO_SAMPLE_RATE as f32 * TICK_SECS) as usize;
    let record_ticks = (MEMO_RECORD_SECS / TICK_SECS) as usize;

    for (i, spot) in spots.iter().enumerate() {
        let idx = engine.add_target(Pose::from_position(*spot));
        engine.select_target(idx);
        println!("recording a {MEMO_RECORD_SECS}s label for target {}...", i + 1);
        engine.start_recording(mic);
        for _ in 0..record_ticks {
            mic.advance(samples_per_tick);
            engine.step(&idle_tick(), mic, audio, visuals);
            thread::sleep(Duration::from_secs_f32(TICK_SECS));
        }
        engine.stop_recording(mic);
    }

    engine.save();
    while engine.save_in_flight() {
        engine.step(&idle_tick(), mic, audio, visuals);
        thread::sleep(Duration::from_millis(5));
    }
    println!("scene saved under {} anchors", engine.targets().len());
    Ok(())
}

fn run_hunt(
    engine: &mut HuntEngine,
    mic: &mut Mic,
    audio: &mut LogAudio,
    visuals: &mut Vec<TargetVisual>,
) -> Result<()> {
    let head = HeadPose {
        position: Vec3::ZERO,
        forward: Vec3::NEG_Z,
    };
    engine.start_hunt(audio, &head);

    for _ in 0..HUNT_TIMEOUT_TICKS {
        if engine.is_finished() {
            return Ok(());
        }
        let tick = match engine.current() {
            Some(t) => gaze_at(t.pose.position),
            None => idle_tick(),
        };
        engine.step(&tick, mic, audio, visuals);
        thread::sleep(Duration::from_secs_f32(TICK_SECS));
    }
    bail!("hunt did not finish within the scripted time budget");
}
