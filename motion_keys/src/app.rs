//! Top-level application state machine.
//!
//! `AppState` owns the zone `Registry`, the `Editor`, the `MotionDetector`,
//! the save store and the key actuator.  Each tick it applies editor input
//! first, then runs arbitration on the newest frame, so an edit made during a
//! tick is already in effect for that tick's key decisions.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use zone_trigger::{
    release_all, Arbiter, Editor, EditorInput, KeyActuator, Mode, Outcome, Registry, Request,
    SaveError, SaveStore, Zone,
};

use crate::actuator::open_actuator;
use crate::config::AppConfig;
use crate::motion::{FrameSource, GrayFrame, MotionDetector, SimFrameSource};
use crate::visualizer::Visualizer;

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState<A: KeyActuator> {
    registry: Registry,
    editor: Editor,
    arbiter: Arbiter,
    detector: MotionDetector,
    store: SaveStore,
    actuator: A,

    /// Newest raw frame; captured as background when arming.
    frame: Option<GrayFrame>,
    /// Motion map of the newest frame while armed.
    motion: Option<GrayFrame>,

    pub status: String,
}

impl<A: KeyActuator> AppState<A> {
    pub fn new(cfg: &AppConfig, actuator: A) -> Self {
        AppState {
            registry: Registry::new(),
            editor: Editor::new(cfg.zone_size, cfg.min_zone_size),
            arbiter: Arbiter::new(cfg.threshold),
            detector: MotionDetector::new(cfg.blur_radius, cfg.pixel_threshold),
            store: SaveStore::beside(&cfg.save_path),
            actuator,
            frame: None,
            motion: None,
            status: "Ready - press 2 to create a zone, Enter to arm".to_string(),
        }
    }

    // ── editor input ─────────────────────────────────────────────────────

    pub fn handle_input(&mut self, input: EditorInput) {
        match self.editor.handle(&mut self.registry, input) {
            Outcome::Unchanged | Outcome::Changed => {}
            Outcome::ReleaseKey(k) => {
                if let Err(e) = self.actuator.release(k) {
                    warn!(error = %e, "release of removed key not delivered");
                }
            }
            Outcome::Rejected(e) => self.status = e.to_string(),
            Outcome::Request(Request::Load) => self.load(),
            Outcome::Request(Request::Save) => self.save(),
            Outcome::Request(Request::ToggleCapture) => self.toggle_capture(),
        }
    }

    /// Replace all zones with the last save.  On failure nothing changes.
    pub fn load(&mut self) {
        let result = self.store.load_last();
        self.apply_load(result);
    }

    /// Replace all zones with the contents of `path`, which then becomes the
    /// file the Load command reopens.
    pub fn load_from(&mut self, path: &Path) {
        let result = self.store.load(path);
        self.apply_load(result);
    }

    fn apply_load(&mut self, result: Result<Vec<Zone>, SaveError>) {
        match result {
            Ok(zones) => {
                release_all(&mut self.registry, &mut self.actuator);
                self.registry.replace_all(zones);
                self.status = format!("Loaded {} zones", self.registry.len());
            }
            Err(SaveError::NoSavePath) => {
                self.status = "Nothing saved yet".to_string();
            }
            Err(e) => {
                warn!(error = %e, "load failed, zones unchanged");
                self.status = "Error while trying to load save data".to_string();
            }
        }
    }

    pub fn save(&mut self) {
        match self.store.save(&self.registry) {
            Ok(path) => {
                self.status = format!("Saved {} zones to {}", self.registry.len(), path.display());
            }
            Err(e) => {
                warn!(error = %e, "save failed");
                self.status = "Error while trying to save".to_string();
            }
        }
    }

    /// Arm with the newest frame as background, or disarm and release keys.
    pub fn toggle_capture(&mut self) {
        if self.detector.is_armed() {
            self.detector.disarm();
            self.motion = None;
            release_all(&mut self.registry, &mut self.actuator);
            info!("capture disarmed");
            self.status = "Capture disarmed".to_string();
        } else if let Some(frame) = &self.frame {
            self.detector.arm(frame);
            info!("background captured, capture armed");
            self.status = "Background captured".to_string();
        } else {
            self.status = "No frame to capture yet".to_string();
        }
    }

    // ── per-frame tick ────────────────────────────────────────────────────

    /// Take a new frame and, while armed, arbitrate every zone on it.
    pub fn tick(&mut self, frame: GrayFrame) {
        self.motion = match self.detector.detect(&frame) {
            Ok(m) => m,
            Err(e) => {
                warn!(error = %e, "frame skipped");
                None
            }
        };
        if let Some(map) = &self.motion {
            self.arbiter.run_frame(&mut self.registry, map, &mut self.actuator);
        }
        self.frame = Some(frame);
    }

    /// Release every held key.
    pub fn shutdown(&mut self) {
        release_all(&mut self.registry, &mut self.actuator);
    }

    // ── Accessors for the render loop ─────────────────────────────────────

    pub fn registry(&self) -> &Registry { &self.registry }
    pub fn registry_mut(&mut self) -> &mut Registry { &mut self.registry }
    pub fn mode(&self) -> Mode { self.editor.mode() }
    pub fn is_armed(&self) -> bool { self.detector.is_armed() }
    pub fn frame(&self) -> Option<&GrayFrame> { self.frame.as_ref() }
    pub fn motion(&self) -> Option<&GrayFrame> { self.motion.as_ref() }
    pub fn actuator(&self) -> &A { &self.actuator }
}

// ════════════════════════════════════════════════════════════════════════════
// run(): the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application.
///
/// Creates the window, the simulated camera and the configured actuator,
/// then drives input → arbitration → render at ~60 fps until Escape or the
/// window closes.
pub fn run(cfg: AppConfig) -> Result<()> {
    let mut vis = Visualizer::new(cfg.frame_width, cfg.frame_height)
        .map_err(anyhow::Error::msg)
        .context("opening window")?;
    let mut source = SimFrameSource::new(cfg.frame_width, cfg.frame_height);
    let mut app = AppState::new(&cfg, open_actuator(&cfg));

    if let Some(path) = &cfg.load_path {
        app.load_from(path);
    } else if cfg.autoload && app.store.last_save().is_some() {
        app.load();
    }

    while vis.is_open() {
        // 1. Window input → editor
        let input = vis.poll_input();
        if input.quit {
            break;
        }
        for event in input.events {
            app.handle_input(event);
        }

        // 2. Next frame → motion → arbitration
        source.set_hand(input.hand);
        let Some(frame) = source.next_frame() else { break };
        app.tick(frame);

        // 3. Render
        vis.render(
            app.frame(),
            app.motion(),
            app.registry(),
            app.mode(),
            app.is_armed(),
            &app.status,
        );
    }

    app.shutdown();
    info!("motion_keys stopped");
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
