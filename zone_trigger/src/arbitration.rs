//! Per-frame arbitration: raw triggers in, key edges out.
//!
//! Each frame every zone is either *triggered* or not.  Triggered zones are
//! activated, the rest deactivated, in creation order.  Inside a group a
//! pressed zone blocks activation of strictly lower priorities, and a zone
//! that activates releases any strictly lower-priority sibling still held.
//! Equal priorities never interfere.
//!
//! Activation and deactivation are edge-triggered: a zone that is already in
//! the requested state produces no actuator call.

use tracing::{debug, warn};

use crate::actuator::KeyActuator;
use crate::registry::Registry;
use crate::zone::{Zone, ZoneId};

/// Summed intensity a zone must exceed to count as moving.
pub const DEFAULT_THRESHOLD: u64 = 10_000;

// ════════════════════════════════════════════════════════════════════════════
// IntensityMap: motion detector boundary
// ════════════════════════════════════════════════════════════════════════════

/// A per-frame motion map in zone coordinates.
pub trait IntensityMap {
    /// Sum of intensities over columns `x1..x2`, rows `y1..y2`.
    ///
    /// Implementations clip to their own extent; an empty or inverted
    /// rectangle sums to 0.
    fn region_sum(&self, x1: i32, y1: i32, x2: i32, y2: i32) -> u64;
}

// ════════════════════════════════════════════════════════════════════════════
// activate / deactivate
// ════════════════════════════════════════════════════════════════════════════

/// Result of [`activate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Activation {
    Activated,
    AlreadyActive,
    /// A higher-priority sibling is pressed.
    Blocked,
    Missing,
}

/// False iff some other pressed zone in the same group has strictly higher
/// priority.  Ungrouped zones can always activate.
pub fn can_activate(registry: &Registry, id: ZoneId) -> bool {
    let Some(zone) = registry.get(id) else { return false };
    let Some(group) = zone.group().and_then(|g| registry.find_group(g)) else {
        return true;
    };
    !group.zones.iter().any(|&w| {
        w != id
            && registry
                .get(w)
                .is_some_and(|other| other.priority > zone.priority && other.is_pressed())
    })
}

/// Press a zone if arbitration allows it, then release lower-priority
/// siblings that are still held.
pub fn activate<A>(registry: &mut Registry, id: ZoneId, actuator: &mut A) -> Activation
where
    A: KeyActuator + ?Sized,
{
    let Some(zone) = registry.get(id) else { return Activation::Missing };
    if zone.is_pressed() {
        return Activation::AlreadyActive;
    }
    if !can_activate(registry, id) {
        return Activation::Blocked;
    }

    let (key, group, priority) = (zone.key, zone.group(), zone.priority);
    if let Some(k) = key {
        if let Err(e) = actuator.press(k) {
            warn!(zone = id.0, error = %e, "press not delivered; zone still marked pressed");
        }
    }
    registry.set_pressed(id, true);
    debug!(zone = id.0, key = ?key, group = ?group, priority, "zone pressed");

    let Some(group) = group.and_then(|g| registry.find_group(g)) else {
        return Activation::Activated;
    };
    let dominated: Vec<ZoneId> = group
        .zones
        .iter()
        .copied()
        .filter(|&w| {
            w != id
                && registry
                    .get(w)
                    .is_some_and(|other| other.priority < priority && other.is_pressed())
        })
        .collect();
    for w in dominated {
        debug!(zone = w.0, by = id.0, "released by higher-priority sibling");
        deactivate(registry, w, actuator);
    }

    Activation::Activated
}

/// Release a zone.  Returns false if it was not pressed (or is unknown).
pub fn deactivate<A>(registry: &mut Registry, id: ZoneId, actuator: &mut A) -> bool
where
    A: KeyActuator + ?Sized,
{
    let Some(zone) = registry.get(id) else { return false };
    if !zone.is_pressed() {
        return false;
    }
    let key = zone.key;
    if let Some(k) = key {
        if let Err(e) = actuator.release(k) {
            warn!(zone = id.0, error = %e, "release not delivered; zone still marked released");
        }
    }
    registry.set_pressed(id, false);
    debug!(zone = id.0, key = ?key, "zone released");
    true
}

/// Release every pressed zone, in creation order.
pub fn release_all<A>(registry: &mut Registry, actuator: &mut A)
where
    A: KeyActuator + ?Sized,
{
    for id in registry.ids() {
        deactivate(registry, id, actuator);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Arbiter: one pass per frame
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Arbiter {
    pub threshold: u64,
}

impl Default for Arbiter {
    fn default() -> Self { Arbiter { threshold: DEFAULT_THRESHOLD } }
}

impl Arbiter {
    pub fn new(threshold: u64) -> Self { Arbiter { threshold } }

    /// Raw trigger for one zone: motion over the threshold, XOR `inverted`.
    pub fn is_triggered<M: IntensityMap + ?Sized>(&self, zone: &Zone, map: &M) -> bool {
        let moving = map.region_sum(zone.x1, zone.y1, zone.x2, zone.y2) > self.threshold;
        moving != zone.inverted
    }

    /// Trigger every zone from `map` and arbitrate.
    pub fn run_frame<M, A>(&self, registry: &mut Registry, map: &M, actuator: &mut A)
    where
        M: IntensityMap + ?Sized,
        A: KeyActuator + ?Sized,
    {
        apply_triggers(registry, actuator, |_, zone| self.is_triggered(zone, map));
    }
}

/// Arbitrate one frame from an arbitrary trigger function.
///
/// Zones are visited in creation order; each is activated if `triggered`
/// says so and deactivated otherwise.
pub fn apply_triggers<A, F>(registry: &mut Registry, actuator: &mut A, mut triggered: F)
where
    A: KeyActuator + ?Sized,
    F: FnMut(ZoneId, &Zone) -> bool,
{
    for id in registry.ids() {
        let Some(zone) = registry.get(id) else { continue };
        if triggered(id, zone) {
            activate(registry, id, actuator);
        } else {
            deactivate(registry, id, actuator);
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
