//! Cassette configuration for composable per-port replay.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::format::Cassette;
use super::replayer::CassetteReplayer;

/// Replayer shared between the adapters serving one cassette.
pub type SharedReplayer = Arc<Mutex<CassetteReplayer>>;

/// Per-port cassette file paths. Ports without a cassette stay unconfigured
/// and fail when called during replay.
#[derive(Debug, Clone, Default)]
pub struct CassetteConfig {
    /// Path to the goals API port cassette file.
    pub api: Option<PathBuf>,
    /// Path to the clock port cassette file.
    pub clock: Option<PathBuf>,
}

/// Per-port replayers, each with its own interaction stream.
pub struct PortReplayers {
    /// Replayer for the goals API port.
    pub api: Option<SharedReplayer>,
    /// Replayer for the clock port.
    pub clock: Option<SharedReplayer>,
}

impl CassetteConfig {
    /// Points each port at `<dir>/<port>.cassette.yaml`, the layout written
    /// by a recording session.
    #[must_use]
    pub fn from_session_dir(dir: &Path) -> Self {
        Self {
            api: Some(dir.join("api.cassette.yaml")),
            clock: Some(dir.join("clock.cassette.yaml")),
        }
    }

    /// Read and parse a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn read_cassette(path: &Path) -> Result<Cassette, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read cassette file {}: {e}", path.display()))?;
        serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse cassette file {}: {e}", path.display()))
    }

    /// Load a single cassette file into a shareable replayer.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<SharedReplayer, String> {
        let cassette = Self::read_cassette(path)?;
        Ok(Arc::new(Mutex::new(CassetteReplayer::new(&cassette))))
    }

    /// Load all configured per-port cassette files.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette file cannot be read or parsed.
    pub fn load_all(&self) -> Result<PortReplayers, String> {
        Ok(PortReplayers {
            api: self.api.as_deref().map(Self::load).transpose()?,
            clock: self.clock.as_deref().map(Self::load).transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::recorder::CassetteRecorder;
    use serde_json::json;

    #[test]
    fn session_dir_layout() {
        let config = CassetteConfig::from_session_dir(Path::new("/tmp/rec"));
        assert_eq!(config.api, Some(PathBuf::from("/tmp/rec/api.cassette.yaml")));
        assert_eq!(config.clock, Some(PathBuf::from("/tmp/rec/clock.cassette.yaml")));
    }

    #[test]
    fn load_per_port_cassettes() {
        let dir = std::env::temp_dir().join("grove_cassette_config_ports");
        std::fs::create_dir_all(&dir).unwrap();

        let api_path = dir.join("api.cassette.yaml");
        let mut recorder = CassetteRecorder::new(&api_path, "api");
        recorder.record("api", "generate_tasks", json!({}), json!({"Ok": {"tasks": []}}));
        recorder.finish().unwrap();

        let config = CassetteConfig { api: Some(api_path), ..CassetteConfig::default() };
        let replayers = config.load_all().unwrap();

        let api = replayers.api.expect("api replayer");
        let mut api = api.lock().unwrap();
        let interaction = api.next_interaction("api", "generate_tasks").unwrap();
        assert_eq!(interaction.output, json!({"Ok": {"tasks": []}}));
        assert!(replayers.clock.is_none());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file_is_reported_with_path() {
        let config = CassetteConfig {
            clock: Some(PathBuf::from("/nonexistent/clock.cassette.yaml")),
            ..CassetteConfig::default()
        };
        let err = config.load_all().err().expect("load should fail");
        assert!(err.contains("/nonexistent/clock.cassette.yaml"));
    }
}
