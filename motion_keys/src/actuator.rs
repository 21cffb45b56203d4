//! Key actuator backends.
//!
//! * [`KeyboardActuator`]: injects real key-down / key-up events into the
//!   focused application.
//! * [`LogActuator`]: logs each edge; always available.
//! * [`MidiActuator`]: note-on / note-off on a MIDI output port, with the
//!   note number taken from the key's code point (mod 128).

use enigo::{Direction, Enigo, Key, Keyboard, Settings};
use tracing::{info, warn};

use zone_trigger::{ActuationError, KeyActuator};

use crate::config::{ActuatorKind, AppConfig};

// ── enigo backend ─────────────────────────────────────────────────────────

/// System keyboard injection.
pub struct KeyboardActuator {
    enigo: Enigo,
}

impl KeyboardActuator {
    pub fn new() -> Result<Self, String> {
        let enigo = Enigo::new(&Settings::default()).map_err(|e| e.to_string())?;
        Ok(KeyboardActuator { enigo })
    }

    fn send(&mut self, key: char, direction: Direction) -> Result<(), ActuationError> {
        self.enigo
            .key(Key::Unicode(key), direction)
            .map_err(|e| ActuationError::new(key, e.to_string()))
    }
}

impl KeyActuator for KeyboardActuator {
    fn press(&mut self, key: char) -> Result<(), ActuationError> {
        self.send(key, Direction::Press)
    }
    fn release(&mut self, key: char) -> Result<(), ActuationError> {
        self.send(key, Direction::Release)
    }
}

// ── log backend ───────────────────────────────────────────────────────────

/// Dry-run backend: every edge becomes one log line.
#[derive(Debug, Default)]
pub struct LogActuator;

impl KeyActuator for LogActuator {
    fn press(&mut self, key: char) -> Result<(), ActuationError> {
        info!(key = %key, "press");
        Ok(())
    }
    fn release(&mut self, key: char) -> Result<(), ActuationError> {
        info!(key = %key, "release");
        Ok(())
    }
}

// ── midir backend ─────────────────────────────────────────────────────────

pub struct MidiActuator {
    conn: midir::MidiOutputConnection,
    channel: u8,
    velocity: u8,
}

/// MIDI note for a zone key.
pub fn note_for(key: char) -> u8 {
    (key as u32 % 128) as u8
}

impl MidiActuator {
    fn send(&mut self, key: char, msg: &[u8]) -> Result<(), ActuationError> {
        self.conn
            .send(msg)
            .map_err(|e| ActuationError::new(key, e.to_string()))
    }
}

impl KeyActuator for MidiActuator {
    fn press(&mut self, key: char) -> Result<(), ActuationError> {
        let msg = [0x90 | (self.channel & 0x0F), note_for(key), self.velocity.min(127)];
        self.send(key, &msg)
    }
    fn release(&mut self, key: char) -> Result<(), ActuationError> {
        let msg = [0x80 | (self.channel & 0x0F), note_for(key), 0];
        self.send(key, &msg)
    }
}

/// Try to open the first available MIDI output port, preferring a softsynth.
fn open_midi(channel: u8, velocity: u8) -> Result<MidiActuator, String> {
    let midi_out = midir::MidiOutput::new("motion_keys").map_err(|e| e.to_string())?;

    let ports = midi_out.ports();
    if ports.is_empty() {
        return Err("no MIDI output ports found".to_string());
    }

    let port_idx = ports
        .iter()
        .position(|p| {
            midi_out
                .port_name(p)
                .map(|n| {
                    let n = n.to_lowercase();
                    n.contains("fluid") || n.contains("timidity") || n.contains("synth")
                })
                .unwrap_or(false)
        })
        .unwrap_or(0);

    let port = &ports[port_idx];
    let name = midi_out
        .port_name(port)
        .unwrap_or_else(|_| "Unknown".to_string());
    info!(port = %name, "opening MIDI port");

    let conn = midi_out
        .connect(port, "motion-keys")
        .map_err(|e| e.to_string())?;
    Ok(MidiActuator { conn, channel, velocity })
}

// ════════════════════════════════════════════════════════════════════════════
// open_actuator
// ════════════════════════════════════════════════════════════════════════════

/// Build the configured backend.  Keyboard and MIDI fall back to logging
/// when the device cannot be opened.
pub fn open_actuator(cfg: &AppConfig) -> Box<dyn KeyActuator> {
    match cfg.actuator {
        ActuatorKind::Log => Box::new(LogActuator),
        ActuatorKind::Keyboard => match KeyboardActuator::new() {
            Ok(k) => {
                info!("injecting key events into the focused window");
                Box::new(k)
            }
            Err(e) => {
                warn!(error = %e, "keyboard injection unavailable, logging key edges instead");
                Box::new(LogActuator)
            }
        },
        ActuatorKind::Midi => match open_midi(cfg.midi_channel, cfg.midi_velocity) {
            Ok(m) => Box::new(m),
            Err(e) => {
                warn!(error = %e, "MIDI unavailable, logging key edges instead");
                Box::new(LogActuator)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notes_follow_code_points() {
        assert_eq!(note_for('w'), 119);
        assert_eq!(note_for('0'), 48);
        assert_eq!(note_for('é'), (0xE9 % 128) as u8);
    }

    #[test]
    fn log_backend_is_always_available() {
        let cfg = AppConfig { actuator: ActuatorKind::Log, ..AppConfig::default() };
        let mut a = open_actuator(&cfg);
        assert!(a.press('k').is_ok());
        assert!(a.release('k').is_ok());
    }

    #[test]
    fn log_actuator_tolerates_duplicate_release() {
        let mut a = LogActuator;
        assert!(a.release('x').is_ok());
        assert!(a.release('x').is_ok());
    }
}
