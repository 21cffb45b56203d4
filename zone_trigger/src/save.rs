//! Zone save files.
//!
//! A save file is JSON of the form
//!
//! ```json
//! {"zones": [{"x1": 10, "y1": 10, "x2": 60, "y2": 60,
//!             "key": "w", "inverted": false, "group": 1, "priority": 2}]}
//! ```
//!
//! Zones are stored in creation order.  `pressed` is transient and never
//! written; files that carry it anyway load fine.  Loading parses the whole
//! file before returning, so a corrupt file never reaches the registry.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::SaveError;
use crate::registry::Registry;
use crate::zone::{GroupId, Zone};

// ════════════════════════════════════════════════════════════════════════════
// Records
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneRecord {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
    pub key: Option<char>,
    #[serde(default)]
    pub inverted: bool,
    #[serde(default)]
    pub group: Option<GroupId>,
    #[serde(default)]
    pub priority: i32,
}

impl From<&Zone> for ZoneRecord {
    fn from(z: &Zone) -> Self {
        ZoneRecord {
            x1: z.x1,
            y1: z.y1,
            x2: z.x2,
            y2: z.y2,
            key: z.key,
            inverted: z.inverted,
            group: z.group(),
            priority: z.priority,
        }
    }
}

impl From<ZoneRecord> for Zone {
    fn from(r: ZoneRecord) -> Self {
        let mut z = Zone::new(r.x1, r.y1, r.x2, r.y2);
        z.key = r.key;
        z.inverted = r.inverted;
        z.priority = r.priority;
        z.group = r.group;
        z
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveData {
    pub zones: Vec<ZoneRecord>,
}

impl SaveData {
    pub fn from_registry(registry: &Registry) -> Self {
        SaveData { zones: registry.iter().map(|(_, z)| ZoneRecord::from(z)).collect() }
    }

    pub fn into_zones(self) -> Vec<Zone> {
        self.zones.into_iter().map(Zone::from).collect()
    }

    pub fn read(path: &Path) -> Result<Self, SaveError> {
        let text = fs::read_to_string(path)
            .map_err(|source| SaveError::Io { path: path.to_path_buf(), source })?;
        serde_json::from_str(&text)
            .map_err(|source| SaveError::Json { path: path.to_path_buf(), source })
    }

    pub fn write(&self, path: &Path) -> Result<(), SaveError> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .map_err(|source| SaveError::Io { path: dir.to_path_buf(), source })?;
        }
        let text = serde_json::to_string_pretty(self)
            .map_err(|source| SaveError::Json { path: path.to_path_buf(), source })?;
        fs::write(path, text).map_err(|source| SaveError::Io { path: path.to_path_buf(), source })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SaveStore: save path + "last save" marker
// ════════════════════════════════════════════════════════════════════════════

/// Where saves go, and which file was used last.
#[derive(Clone, Debug)]
pub struct SaveStore {
    pub save_path: PathBuf,
    /// One-line file holding the path of the most recent save or load.
    pub marker_path: PathBuf,
}

impl SaveStore {
    pub fn new(save_path: impl Into<PathBuf>, marker_path: impl Into<PathBuf>) -> Self {
        SaveStore { save_path: save_path.into(), marker_path: marker_path.into() }
    }

    /// Store that keeps its marker next to `save_path`.
    pub fn beside(save_path: impl Into<PathBuf>) -> Self {
        let save_path = save_path.into();
        let marker_path = save_path.with_file_name("last_save");
        SaveStore { save_path, marker_path }
    }

    pub fn last_save(&self) -> Option<PathBuf> {
        let text = fs::read_to_string(&self.marker_path).ok()?;
        let line = text.lines().next()?.trim();
        (!line.is_empty()).then(|| PathBuf::from(line))
    }

    pub fn set_last_save(&self, path: &Path) -> Result<(), SaveError> {
        if let Some(dir) = self.marker_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .map_err(|source| SaveError::Io { path: dir.to_path_buf(), source })?;
        }
        fs::write(&self.marker_path, path.to_string_lossy().as_bytes())
            .map_err(|source| SaveError::Io { path: self.marker_path.clone(), source })
    }

    /// Write every zone to `save_path` and remember it as the last save.
    pub fn save(&self, registry: &Registry) -> Result<PathBuf, SaveError> {
        let data = SaveData::from_registry(registry);
        data.write(&self.save_path)?;
        self.set_last_save(&self.save_path)?;
        info!(path = %self.save_path.display(), zones = data.zones.len(), "zones saved");
        Ok(self.save_path.clone())
    }

    /// Parse zones from `path` without touching any registry.  A marker that
    /// cannot be updated is logged; the zones are still returned.
    pub fn load(&self, path: &Path) -> Result<Vec<Zone>, SaveError> {
        let zones = SaveData::read(path)?.into_zones();
        if let Err(e) = self.set_last_save(path) {
            warn!(error = %e, "last-save marker not updated");
        }
        info!(path = %path.display(), zones = zones.len(), "zones loaded");
        Ok(zones)
    }

    /// Load the last recorded save, falling back to `save_path` when it exists.
    pub fn load_last(&self) -> Result<Vec<Zone>, SaveError> {
        let path = self
            .last_save()
            .or_else(|| self.save_path.exists().then(|| self.save_path.clone()))
            .ok_or(SaveError::NoSavePath)?;
        self.load(&path)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
