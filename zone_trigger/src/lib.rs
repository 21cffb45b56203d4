//! # zone_trigger
//!
//! Turns a per-frame motion signal into virtual key presses and releases,
//! using user-drawn rectangular **zones**.  Zones may share a **group**; inside
//! a group a higher-**priority** zone that is pressed keeps lower-priority
//! siblings released, so mutually exclusive inputs ("up" / "down") never end
//! up held together.
//!
//! ## Pipeline
//!
//! ```text
//! motion map ──► Arbiter::run_frame ──► activate / deactivate ──► KeyActuator
//!                      ▲
//! pointer + keys ──► Editor ──► Registry mutations
//! ```
//!
//! Editor mutations and the arbitration pass run in a fixed order on one
//! thread per tick, so anything the editor changes is visible to the same
//! tick's arbitration.
//!
//! ## Default editor keymap
//!
//! | Key | Command |
//! |---|---|
//! | `1` | Back to default mode |
//! | `2` | Create a zone at the pointer |
//! | `3` | Delete the zone under the pointer |
//! | `4` | Move mode (drag zones) |
//! | `5` | Resize mode (drag zones) |
//! | `6` | Set key: next key typed becomes the zone's key |
//! | `7` | Invert the zone under the pointer |
//! | `8` | Group: next digit becomes the zone's group |
//! | `9` | Priority: next digit becomes the zone's priority |
//! | `-` | Load zones |
//! | `=` | Save zones |
//! | `Enter` | Arm / disarm background capture |

pub mod actuator;
pub mod arbitration;
pub mod editor;
pub mod error;
pub mod registry;
pub mod save;
pub mod zone;

pub use actuator::{KeyActuator, KeyEdge, RecordingActuator};
pub use arbitration::{
    activate, apply_triggers, can_activate, deactivate, release_all, Activation, Arbiter,
    IntensityMap, DEFAULT_THRESHOLD,
};
pub use editor::{Command, Editor, EditorInput, Mode, Outcome, Request};
pub use error::{ActuationError, EditorError, SaveError};
pub use registry::{Group, Registry};
pub use save::{SaveData, SaveStore, ZoneRecord};
pub use zone::{GroupId, Zone, ZoneId};
