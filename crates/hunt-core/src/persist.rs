//! Best-effort background persistence for the whole target collection.
//!
//! `save_all` snapshots the targets on the tick thread, then a worker
//! thread writes blobs and anchors; the engine polls the returned task on
//! later ticks and applies the anchor ids that came back. Nothing here is
//! allowed to propagate a failure into the tick loop.

use std::sync::{mpsc, Arc};
use std::thread;

use crate::anchors::{AnchorStore, ReferenceFrame};
use crate::pose::Pose;
use crate::store::{config_key, memo_key, BlobStore, StoreError, TargetConfig};
use crate::target::Target;

/// Everything the worker needs from one target, detached from the live
/// collection so the tick loop keeps exclusive ownership of it.
#[derive(Clone, Debug)]
pub struct TargetSnapshot {
    pub name: String,
    pub pose: Pose,
    pub scale: f32,
    pub memo_bytes: Option<Vec<u8>>,
}

pub fn snapshot(target: &Target) -> TargetSnapshot {
    TargetSnapshot {
        name: target.name().to_string(),
        pose: target.pose,
        scale: target.scale(),
        memo_bytes: target.memo.as_ref().map(|m| m.to_bytes()),
    }
}

#[derive(Clone, Debug)]
pub struct SaveEntry {
    pub name: String,
    /// Anchor id now persisted for this target, if the anchor save took.
    pub anchor_id: Option<String>,
    pub error: Option<String>,
}

#[derive(Clone, Debug)]
pub struct SaveResult {
    pub entries: Vec<SaveEntry>,
}

/// Pollable completion of one background save batch.
pub struct SaveTask {
    rx: mpsc::Receiver<SaveResult>,
}

impl SaveTask {
    /// Non-blocking; `Some` exactly once, when the worker has finished.
    pub fn poll(&self) -> Option<SaveResult> {
        self.rx.try_recv().ok()
    }
}

/// Kick off a save batch and return immediately. The reference frame is
/// taken on the calling thread so it reflects the device location at the
/// moment the operator hit save.
pub fn save_all(
    snapshots: Vec<TargetSnapshot>,
    blob: Arc<dyn BlobStore>,
    anchors: Arc<dyn AnchorStore>,
) -> SaveTask {
    let frame = anchors.reference_frame();
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let entries = snapshots
            .iter()
            .map(|s| persist_one(s, &frame, blob.as_ref(), anchors.as_ref()))
            .collect();
        // Receiver may be gone if the engine was torn down; that's fine.
        let _ = tx.send(SaveResult { entries });
    });
    SaveTask { rx }
}

fn persist_one(
    snap: &TargetSnapshot,
    frame: &ReferenceFrame,
    blob: &dyn BlobStore,
    anchors: &dyn AnchorStore,
) -> SaveEntry {
    let mut error = None;

    if let Some(bytes) = &snap.memo_bytes {
        if let Err(e) = blob.write(&memo_key(&snap.name), bytes) {
            log::warn!("memo save failed for {}: {e}", snap.name);
            error = Some(e.to_string());
        }
    }

    match (TargetConfig { scale: snap.scale }).to_bytes() {
        Ok(bytes) => {
            if let Err(e) = blob.write(&config_key(&snap.name), &bytes) {
                log::warn!("config save failed for {}: {e}", snap.name);
                error = Some(e.to_string());
            }
        }
        Err(e) => {
            log::warn!("config encode failed for {}: {e}", snap.name);
            error = Some(e.to_string());
        }
    }

    // Replace any previous anchor under the same name.
    anchors.remove(&snap.name);
    let pose_in_frame = frame.world_to_frame(&snap.pose);
    let anchor_id = if anchors.save(&snap.name, frame, &pose_in_frame) {
        Some(snap.name.clone())
    } else {
        let e = StoreError::AnchorRejected(snap.name.clone());
        log::warn!("anchor save failed: {e}");
        error = Some(e.to_string());
        None
    };

    SaveEntry {
        name: snap.name.clone(),
        anchor_id,
        error,
    }
}
