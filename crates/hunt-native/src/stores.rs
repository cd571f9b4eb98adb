//! File-backed collaborator services: one file per blob, and a single
//! JSON file standing in for the platform anchor store. A desktop has no
//! spatial tracking, so anchors resolve to exactly the pose they were
//! saved with.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use hunt_core::{AnchorStore, BlobStore, Pose, ReferenceFrame, StoreError};

pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    pub fn new(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
        Ok(Self { dir })
    }
}

impl BlobStore for FileBlobStore {
    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        fs::write(self.dir.join(key), bytes)?;
        Ok(())
    }

    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        match fs::read(self.dir.join(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.dir.join(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

pub struct FileAnchorStore {
    path: PathBuf,
    map: Mutex<HashMap<String, Pose>>,
}

impl FileAnchorStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let map = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .with_context(|| format!("parsing {}", path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path,
            map: Mutex::new(map),
        })
    }

    fn flush(&self, map: &HashMap<String, Pose>) -> bool {
        match serde_json::to_vec_pretty(map) {
            Ok(bytes) => match fs::write(&self.path, bytes) {
                Ok(()) => true,
                Err(e) => {
                    log::warn!("anchor file write failed: {e}");
                    false
                }
            },
            Err(e) => {
                log::warn!("anchor encode failed: {e}");
                false
            }
        }
    }
}

impl AnchorStore for FileAnchorStore {
    fn list_saved(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .map
            .lock()
            .expect("anchor lock")
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    fn resolve(&self, name: &str) -> Option<Pose> {
        self.map.lock().expect("anchor lock").get(name).copied()
    }

    fn save(&self, name: &str, frame: &ReferenceFrame, pose_in_frame: &Pose) -> bool {
        let world = frame.frame_to_world(pose_in_frame);
        let mut map = self.map.lock().expect("anchor lock");
        map.insert(name.to_string(), world);
        self.flush(&map)
    }

    fn remove(&self, name: &str) {
        let mut map = self.map.lock().expect("anchor lock");
        if map.remove(name).is_some() {
            self.flush(&map);
        }
    }

    fn reference_frame(&self) -> ReferenceFrame {
        // No tracking hardware: the session origin is the world origin.
        ReferenceFrame::new(Pose::IDENTITY)
    }
}
