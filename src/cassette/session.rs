//! Recording session managing per-port cassette recorders.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Utc;

use super::recorder::CassetteRecorder;

/// Recorder shared between a recording adapter and its session.
pub type SharedRecorder = Arc<Mutex<CassetteRecorder>>;

/// Owns one recorder per port for the duration of a command.
///
/// Each port's cassette is written to `<root>/<timestamp>/<port>.cassette.yaml`.
pub struct RecordingSession {
    /// Recorder for goals API interactions.
    pub api: SharedRecorder,
    /// Recorder for clock interactions.
    pub clock: SharedRecorder,
    output_dir: PathBuf,
}

impl RecordingSession {
    /// Create a session writing into a new timestamped directory under `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory already exists or cannot be created.
    pub fn new(root: &Path) -> Result<Self, String> {
        let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S%.3f").to_string();
        let output_dir = root.join(&timestamp);

        if output_dir.exists() {
            return Err(format!("Cassette directory already exists: {}", output_dir.display()));
        }
        std::fs::create_dir_all(&output_dir)
            .map_err(|e| format!("Failed to create cassette directory: {e}"))?;

        let make_recorder = |port: &str| -> SharedRecorder {
            let path = output_dir.join(format!("{port}.cassette.yaml"));
            Arc::new(Mutex::new(CassetteRecorder::new(path, format!("{timestamp}-{port}"))))
        };

        Ok(Self { api: make_recorder("api"), clock: make_recorder("clock"), output_dir })
    }

    /// Directory the cassettes are written to.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write every port's cassette and return the output directory.
    ///
    /// All recording adapters must have been dropped first.
    ///
    /// # Errors
    ///
    /// Returns an error if an adapter still holds a recorder or a file cannot
    /// be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        fn finish_one(recorder: SharedRecorder, port: &str) -> Result<(), String> {
            let recorder = Arc::try_unwrap(recorder)
                .map_err(|_| format!("Recording adapter for {port} still has references"))?
                .into_inner()
                .map_err(|e| format!("Recorder lock for {port} poisoned: {e}"))?;
            recorder.finish().map_err(|e| format!("Failed to write {port} cassette: {e}"))?;
            Ok(())
        }

        finish_one(self.api, "api")?;
        finish_one(self.clock, "clock")?;
        Ok(self.output_dir)
    }
}
