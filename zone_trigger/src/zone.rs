//! A single trigger zone: rectangle, key, inversion, group and priority.

use serde::{Deserialize, Serialize};

/// Group identifier.  Zones sharing one are arbitrated by priority.
pub type GroupId = u32;

// ════════════════════════════════════════════════════════════════════════════
// ZoneId: stable arena handle
// ════════════════════════════════════════════════════════════════════════════

/// Stable handle for a zone held by a [`Registry`](crate::Registry).
///
/// Handles are never reused, and they order zones by creation time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ZoneId(pub u64);

// ════════════════════════════════════════════════════════════════════════════
// Zone
// ════════════════════════════════════════════════════════════════════════════

/// A rectangular trigger region mapped to an optional virtual key.
///
/// Bounds are pixel coordinates in the same space as the motion map:
/// the zone covers columns `x1..x2` and rows `y1..y2`.
///
/// `group` and `pressed` are read-only from outside the crate: the
/// [`Registry`](crate::Registry) keeps group membership in sync and only the
/// arbitration engine flips `pressed`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Zone {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
    /// `None` → visual/logical zone that never actuates a key.
    pub key: Option<char>,
    /// Flip the trigger: fires when there is *no* motion.
    pub inverted: bool,
    /// Rank inside the group; ignored for ungrouped zones.
    pub priority: i32,
    pub(crate) group: Option<GroupId>,
    pub(crate) pressed: bool,
}

impl Zone {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Zone {
            x1,
            y1,
            x2,
            y2,
            key: None,
            inverted: false,
            priority: 0,
            group: None,
            pressed: false,
        }
    }

    /// A `size`×`size` zone with its top-left corner at `(x, y)`.
    pub fn square_at(x: i32, y: i32, size: i32) -> Self {
        Zone::new(x, y, x + size, y + size)
    }

    pub fn with_key(mut self, key: char) -> Self {
        self.key = Some(key);
        self
    }

    pub fn with_group(mut self, group: GroupId, priority: i32) -> Self {
        self.group = Some(group);
        self.priority = priority;
        self
    }

    pub fn inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    pub fn group(&self) -> Option<GroupId> { self.group }
    pub fn is_pressed(&self) -> bool { self.pressed }

    pub fn width(&self) -> i32 { self.x2 - self.x1 }
    pub fn height(&self) -> i32 { self.y2 - self.y1 }

    /// Strict interior test: points on the border are outside.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.x1 < x && x < self.x2 && self.y1 < y && y < self.y2
    }

    /// Translate so the top-left corner lands on `(x, y)`; size is kept.
    pub fn set_position(&mut self, x: i32, y: i32) {
        let dx = x - self.x1;
        let dy = y - self.y1;
        self.x1 += dx;
        self.y1 += dy;
        self.x2 += dx;
        self.y2 += dy;
    }

    /// Move the far corner so the zone is `w`×`h`.
    pub fn set_size(&mut self, w: i32, h: i32) {
        self.x2 = self.x1 + w;
        self.y2 = self.y1 + h;
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_zone_defaults() {
        let z = Zone::new(1, 2, 3, 4);
        assert_eq!(z.key, None);
        assert!(!z.inverted);
        assert_eq!(z.group(), None);
        assert_eq!(z.priority, 0);
        assert!(!z.is_pressed());
    }

    #[test]
    fn contains_excludes_border() {
        let z = Zone::new(10, 10, 20, 20);
        assert!(z.contains(15, 15));
        assert!(!z.contains(10, 15));
        assert!(!z.contains(15, 20));
        assert!(!z.contains(25, 15));
    }

    #[test]
    fn set_position_keeps_size() {
        let mut z = Zone::new(10, 10, 60, 40);
        z.set_position(100, 5);
        assert_eq!((z.x1, z.y1, z.x2, z.y2), (100, 5, 150, 35));
        assert_eq!((z.width(), z.height()), (50, 30));
    }

    #[test]
    fn set_size_moves_far_corner_only() {
        let mut z = Zone::square_at(10, 10, 50);
        z.set_size(20, 70);
        assert_eq!((z.x1, z.y1, z.x2, z.y2), (10, 10, 30, 80));
    }
}
