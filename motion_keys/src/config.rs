//! Application configuration: JSON file first, command-line flags on top.
//!
//! The file lives at `<config dir>/motion-keys/config.json`.  A missing file
//! means defaults; a file that does not parse is an error.  Every field is
//! optional in the file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use tracing::info;

use zone_trigger::editor::{DEFAULT_MIN_ZONE_SIZE, DEFAULT_ZONE_SIZE};
use zone_trigger::DEFAULT_THRESHOLD;

// ════════════════════════════════════════════════════════════════════════════
// ActuatorKind
// ════════════════════════════════════════════════════════════════════════════

/// Which backend receives key edges.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ActuatorKind {
    /// Press and release real keys on the system keyboard.
    #[default]
    Keyboard,
    /// Log every press/release.
    Log,
    /// Send note-on/note-off to the first MIDI output port.
    Midi,
}

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Summed zone intensity above which a zone counts as moving.
    pub threshold: u64,
    /// Per-pixel difference above which a pixel counts as changed.
    pub pixel_threshold: u8,
    /// Box blur radius applied to frames before differencing.
    pub blur_radius: usize,
    pub frame_width: usize,
    pub frame_height: usize,
    /// Side of a newly created zone.
    pub zone_size: i32,
    /// Resize never shrinks a zone below this.
    pub min_zone_size: i32,
    pub save_path: PathBuf,
    /// Zone file to open at start-up instead of the last save.
    pub load_path: Option<PathBuf>,
    pub actuator: ActuatorKind,
    pub midi_channel: u8,
    pub midi_velocity: u8,
    /// Load the last save on start-up.
    pub autoload: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            threshold: DEFAULT_THRESHOLD,
            pixel_threshold: 35,
            blur_radius: 2,
            frame_width: 640,
            frame_height: 480,
            zone_size: DEFAULT_ZONE_SIZE,
            min_zone_size: DEFAULT_MIN_ZONE_SIZE,
            save_path: config_dir().join("zones.json"),
            load_path: None,
            actuator: ActuatorKind::Keyboard,
            midi_channel: 0,
            midi_velocity: 100,
            autoload: true,
        }
    }
}

impl AppConfig {
    /// Read a config file.  A missing file yields the defaults.
    pub fn load_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "config file not found, using defaults");
            return Ok(AppConfig::default());
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let cfg = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        info!(path = %path.display(), "config loaded");
        Ok(cfg)
    }

    /// Apply command-line overrides.
    pub fn apply(&mut self, cli: &Cli) {
        if let Some(t) = cli.threshold {
            self.threshold = t;
        }
        if let Some(p) = &cli.save {
            self.save_path = p.clone();
        }
        if let Some(p) = &cli.load {
            self.load_path = Some(p.clone());
        }
        if let Some(a) = cli.actuator {
            self.actuator = a;
        }
        if cli.no_autoload {
            self.autoload = false;
        }
    }
}

/// `<platform config dir>/motion-keys`, or `./motion-keys` when the platform
/// has none.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("motion-keys")
}

// ════════════════════════════════════════════════════════════════════════════
// Cli
// ════════════════════════════════════════════════════════════════════════════

#[derive(Parser, Debug, Default)]
#[command(name = "motion_keys", about = "Motion zones → virtual key presses")]
pub struct Cli {
    /// Config file (default: <config dir>/motion-keys/config.json).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Summed-intensity motion threshold.
    #[arg(long)]
    pub threshold: Option<u64>,

    /// Zone save file.
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Zone file to open at start-up; the Load command reloads it later.
    #[arg(long)]
    pub load: Option<PathBuf>,

    /// Key actuator backend.
    #[arg(long, value_enum)]
    pub actuator: Option<ActuatorKind>,

    /// Start with no zones instead of loading the last save.
    #[arg(long)]
    pub no_autoload: bool,
}

/// Load the config file named by the CLI (or the default one) and apply the
/// CLI overrides.
pub fn resolve(cli: &Cli) -> Result<AppConfig> {
    let path = cli
        .config
        .clone()
        .unwrap_or_else(|| config_dir().join("config.json"));
    let mut cfg = AppConfig::load_file(&path)?;
    cfg.apply(cli);
    Ok(cfg)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = AppConfig::load_file(&dir.path().join("none.json")).unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.threshold, 10_000);
        assert_eq!(cfg.actuator, ActuatorKind::Keyboard);
        assert_eq!(cfg.load_path, None);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"threshold": 5000, "actuator": "midi"}"#).unwrap();
        let cfg = AppConfig::load_file(&path).unwrap();
        assert_eq!(cfg.threshold, 5000);
        assert_eq!(cfg.actuator, ActuatorKind::Midi);
        assert_eq!(cfg.pixel_threshold, 35);
    }

    #[test]
    fn bad_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "threshold = 5").unwrap();
        assert!(AppConfig::load_file(&path).is_err());
    }

    #[test]
    fn cli_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"threshold": 5000}"#).unwrap();
        let cli = Cli::parse_from([
            "motion_keys",
            "--config",
            path.to_str().unwrap(),
            "--threshold",
            "42",
            "--actuator",
            "midi",
            "--no-autoload",
        ]);
        let cfg = resolve(&cli).unwrap();
        assert_eq!(cfg.threshold, 42);
        assert_eq!(cfg.actuator, ActuatorKind::Midi);
        assert!(!cfg.autoload);
    }

    #[test]
    fn load_flag_and_log_backend() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::parse_from([
            "motion_keys",
            "--config",
            dir.path().join("none.json").to_str().unwrap(),
            "--load",
            "other.json",
            "--actuator",
            "log",
        ]);
        let cfg = resolve(&cli).unwrap();
        assert_eq!(cfg.load_path, Some(PathBuf::from("other.json")));
        assert_eq!(cfg.actuator, ActuatorKind::Log);
    }
}
