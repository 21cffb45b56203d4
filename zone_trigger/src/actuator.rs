//! Key actuator boundary.
//!
//! The arbitration engine only ever calls [`KeyActuator::press`] and
//! [`KeyActuator::release`] on state edges.  Backends that drive real
//! outputs live in the application crate.

use crate::error::ActuationError;

/// Receives press/release edges for zone keys.
///
/// A release for a key that is not held must be harmless.
pub trait KeyActuator {
    fn press(&mut self, key: char) -> Result<(), ActuationError>;
    fn release(&mut self, key: char) -> Result<(), ActuationError>;
}

impl<A: KeyActuator + ?Sized> KeyActuator for Box<A> {
    fn press(&mut self, key: char) -> Result<(), ActuationError> { (**self).press(key) }
    fn release(&mut self, key: char) -> Result<(), ActuationError> { (**self).release(key) }
}

/// One delivered edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyEdge {
    Press(char),
    Release(char),
}

/// Actuator that records every edge it receives, in order.
///
/// Useful as a dry-run backend and in tests.  With `fail` set it still
/// records the edge but reports an error.
#[derive(Debug, Default)]
pub struct RecordingActuator {
    pub edges: Vec<KeyEdge>,
    pub fail: bool,
}

impl RecordingActuator {
    pub fn new() -> Self { RecordingActuator::default() }

    pub fn failing() -> Self {
        RecordingActuator { edges: Vec::new(), fail: true }
    }

    /// Take the recorded edges, leaving the log empty.
    pub fn drain(&mut self) -> Vec<KeyEdge> {
        std::mem::take(&mut self.edges)
    }

    fn record(&mut self, edge: KeyEdge, key: char) -> Result<(), ActuationError> {
        self.edges.push(edge);
        if self.fail {
            Err(ActuationError::new(key, "recording actuator set to fail"))
        } else {
            Ok(())
        }
    }
}

impl KeyActuator for RecordingActuator {
    fn press(&mut self, key: char) -> Result<(), ActuationError> {
        self.record(KeyEdge::Press(key), key)
    }
    fn release(&mut self, key: char) -> Result<(), ActuationError> {
        self.record(KeyEdge::Release(key), key)
    }
}
