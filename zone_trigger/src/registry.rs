//! Zone arena plus the derived group index.
//!
//! The registry is the only owner of zones.  Groups hold [`ZoneId`]s, never
//! zones, and a group exists exactly while at least one zone references it:
//! it is created on the first join and dropped when its last member leaves.

use std::collections::BTreeMap;

use tracing::debug;

use crate::zone::{GroupId, Zone, ZoneId};

// ════════════════════════════════════════════════════════════════════════════
// Group
// ════════════════════════════════════════════════════════════════════════════

/// Members of one arbitration group, in join order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    pub id: GroupId,
    pub zones: Vec<ZoneId>,
}

// ════════════════════════════════════════════════════════════════════════════
// Registry
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default)]
pub struct Registry {
    zones: BTreeMap<ZoneId, Zone>,
    groups: BTreeMap<GroupId, Group>,
    next_id: u64,
}

impl Registry {
    pub fn new() -> Self { Registry::default() }

    /// Store `zone` and, if it names a group, join that group.
    pub fn add_zone(&mut self, zone: Zone) -> ZoneId {
        let id = ZoneId(self.next_id);
        self.next_id += 1;
        let group = zone.group;
        self.zones.insert(id, zone);
        if let Some(g) = group {
            self.join_group(id, g);
        }
        id
    }

    /// Remove a zone and its group membership.  Unknown ids are a no-op.
    pub fn remove_zone(&mut self, id: ZoneId) -> Option<Zone> {
        let zone = self.zones.remove(&id)?;
        if let Some(g) = zone.group {
            self.leave_group(id, g);
        }
        Some(zone)
    }

    /// Move a zone from its current group (if any) to `new_group`.
    ///
    /// Leave, reassign and join happen inside one `&mut self` call, so no
    /// reader can see the zone between groups.  Returns false for unknown ids.
    pub fn regroup(&mut self, id: ZoneId, new_group: Option<GroupId>) -> bool {
        let Some(zone) = self.zones.get_mut(&id) else { return false };
        let old_group = zone.group;
        zone.group = new_group;
        if old_group == new_group {
            return true;
        }
        if let Some(g) = old_group {
            self.leave_group(id, g);
        }
        if let Some(g) = new_group {
            self.join_group(id, g);
        }
        debug!(zone = id.0, from = ?old_group, to = ?new_group, "zone regrouped");
        true
    }

    pub fn find_group(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(&id)
    }

    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    pub fn get(&self, id: ZoneId) -> Option<&Zone> {
        self.zones.get(&id)
    }

    /// Mutable access for geometry, key, inversion and priority edits.
    /// Group and pressed state stay behind [`Registry::regroup`] and the
    /// arbitration engine.
    pub fn get_mut(&mut self, id: ZoneId) -> Option<&mut Zone> {
        self.zones.get_mut(&id)
    }

    pub(crate) fn set_pressed(&mut self, id: ZoneId, pressed: bool) {
        if let Some(z) = self.zones.get_mut(&id) {
            z.pressed = pressed;
        }
    }

    /// Zones in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (ZoneId, &Zone)> {
        self.zones.iter().map(|(id, z)| (*id, z))
    }

    pub fn ids(&self) -> Vec<ZoneId> {
        self.zones.keys().copied().collect()
    }

    pub fn len(&self) -> usize { self.zones.len() }
    pub fn is_empty(&self) -> bool { self.zones.is_empty() }

    /// The topmost zone whose interior contains `(x, y)`.
    ///
    /// Topmost is the most recently created, which is also the one drawn last.
    pub fn zone_at(&self, x: i32, y: i32) -> Option<ZoneId> {
        self.zones
            .iter()
            .rev()
            .find(|(_, z)| z.contains(x, y))
            .map(|(id, _)| *id)
    }

    /// Drop every zone and group, then add `zones` in order.
    ///
    /// Pressed state is reset; callers release held keys first.
    pub fn replace_all(&mut self, zones: impl IntoIterator<Item = Zone>) {
        self.zones.clear();
        self.groups.clear();
        for mut z in zones {
            z.pressed = false;
            self.add_zone(z);
        }
    }

    // ── group bookkeeping ────────────────────────────────────────────────

    fn join_group(&mut self, id: ZoneId, group: GroupId) {
        self.groups
            .entry(group)
            .or_insert_with(|| Group { id: group, zones: Vec::new() })
            .zones
            .push(id);
    }

    fn leave_group(&mut self, id: ZoneId, group: GroupId) {
        let Some(g) = self.groups.get_mut(&group) else { return };
        g.zones.retain(|z| *z != id);
        if g.zones.is_empty() {
            self.groups.remove(&group);
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_grouped_zone_creates_group() {
        let mut reg = Registry::new();
        let a = reg.add_zone(Zone::square_at(0, 0, 10).with_group(3, 1));
        let b = reg.add_zone(Zone::square_at(20, 0, 10).with_group(3, 2));
        let g = reg.find_group(3).unwrap();
        assert_eq!(g.zones, vec![a, b]);
        assert!(reg.find_group(4).is_none());
    }

    #[test]
    fn ungrouped_zone_has_no_group() {
        let mut reg = Registry::new();
        reg.add_zone(Zone::square_at(0, 0, 10));
        assert_eq!(reg.groups().count(), 0);
    }

    #[test]
    fn remove_last_member_prunes_group() {
        let mut reg = Registry::new();
        let a = reg.add_zone(Zone::square_at(0, 0, 10).with_group(1, 0));
        let b = reg.add_zone(Zone::square_at(20, 0, 10).with_group(1, 0));
        reg.remove_zone(a);
        assert_eq!(reg.find_group(1).unwrap().zones, vec![b]);
        reg.remove_zone(b);
        assert!(reg.find_group(1).is_none());
        assert!(reg.is_empty());
    }

    #[test]
    fn remove_unknown_is_noop() {
        let mut reg = Registry::new();
        let a = reg.add_zone(Zone::square_at(0, 0, 10));
        assert!(reg.remove_zone(a).is_some());
        assert!(reg.remove_zone(a).is_none());
    }

    #[test]
    fn regroup_moves_membership() {
        let mut reg = Registry::new();
        let a = reg.add_zone(Zone::square_at(0, 0, 10).with_group(1, 0));
        assert!(reg.regroup(a, Some(2)));
        assert!(reg.find_group(1).is_none());
        assert_eq!(reg.find_group(2).unwrap().zones, vec![a]);
        assert_eq!(reg.get(a).unwrap().group(), Some(2));

        assert!(reg.regroup(a, None));
        assert_eq!(reg.groups().count(), 0);
        assert_eq!(reg.get(a).unwrap().group(), None);
    }

    #[test]
    fn regroup_same_group_does_not_duplicate() {
        let mut reg = Registry::new();
        let a = reg.add_zone(Zone::square_at(0, 0, 10).with_group(1, 0));
        reg.regroup(a, Some(1));
        assert_eq!(reg.find_group(1).unwrap().zones, vec![a]);
    }

    #[test]
    fn zone_at_prefers_newest_overlap() {
        let mut reg = Registry::new();
        let old = reg.add_zone(Zone::square_at(0, 0, 50));
        let new = reg.add_zone(Zone::square_at(25, 25, 50));
        assert_eq!(reg.zone_at(30, 30), Some(new));
        assert_eq!(reg.zone_at(10, 10), Some(old));
        assert_eq!(reg.zone_at(200, 200), None);
    }

    #[test]
    fn ids_stay_in_creation_order_after_removal() {
        let mut reg = Registry::new();
        let a = reg.add_zone(Zone::square_at(0, 0, 10));
        let b = reg.add_zone(Zone::square_at(0, 0, 10));
        let c = reg.add_zone(Zone::square_at(0, 0, 10));
        reg.remove_zone(b);
        let d = reg.add_zone(Zone::square_at(0, 0, 10));
        assert_eq!(reg.ids(), vec![a, c, d]);
    }

    #[test]
    fn replace_all_rebuilds_groups_and_resets_pressed() {
        let mut reg = Registry::new();
        let a = reg.add_zone(Zone::square_at(0, 0, 10).with_group(9, 0));
        reg.set_pressed(a, true);

        let mut pressed = Zone::square_at(0, 0, 10).with_group(5, 1);
        pressed.pressed = true;
        reg.replace_all(vec![pressed, Zone::square_at(5, 5, 10)]);

        assert_eq!(reg.len(), 2);
        assert!(reg.find_group(9).is_none());
        assert_eq!(reg.find_group(5).unwrap().zones.len(), 1);
        assert!(reg.iter().all(|(_, z)| !z.is_pressed()));
    }
}
