//! # motion_keys
//!
//! Motion-controlled virtual keys: draw zones over a camera view, give each
//! one a key, and moving inside a zone presses that key.  Zones that share a
//! group are arbitrated by priority, so opposing keys are never held
//! together.  The zone engine itself lives in [`zone_trigger`]; this crate
//! adds the frames, the window, the key backends and the run loop.
//!
//! ## Tick
//!
//! 1. Poll the window: pointer moves, left-button drags and typed keys go to
//!    the zone editor.
//! 2. Grab the next frame.  While capture is armed it is differenced against
//!    the background and every zone is arbitrated on the result.
//! 3. Draw the frame, the zones and the mode line.
//!
//! ## Frame sources
//!
//! * [`motion::SimFrameSource`]: a synthetic scene; holding the **right**
//!   mouse button puts a bright "hand" under the pointer.
//!
//! ## Key backends
//!
//! | `--actuator` | Effect |
//! |---|---|
//! | `keyboard` (default) | Real key-down/key-up events via `enigo` |
//! | `log` | Every press/release is logged |
//! | `midi` | Note-on/off on the first MIDI output port |

pub mod actuator;
pub mod app;
pub mod config;
pub mod logging;
pub mod motion;
pub mod visualizer;
