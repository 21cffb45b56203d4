//! Interactive zone editor.
//!
//! A single [`Editor`] holds the active [`Mode`], the last pointer position
//! and the current drag selection.  [`Editor::handle`] is the whole
//! transition function: every `(mode, input)` pair lands in exactly one
//! match arm.
//!
//! One-shot modes (`SetKey`, `GroupAssign`, `PriorityAssign`) consume the
//! next key, whatever it is, and fall back to `Default` even when the key
//! is rejected or no zone is under the pointer.  `Move` and `Resize` persist
//! until another mode is chosen, and keep accepting commands meanwhile.

use tracing::{debug, info, warn};

use crate::error::EditorError;
use crate::registry::Registry;
use crate::zone::{GroupId, Zone, ZoneId};

/// Side length of a freshly created zone.
pub const DEFAULT_ZONE_SIZE: i32 = 50;
/// Smallest width/height a resize can produce.
pub const DEFAULT_MIN_ZONE_SIZE: i32 = 4;

// ════════════════════════════════════════════════════════════════════════════
// Mode
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Default,
    SetKey,
    Move,
    Resize,
    GroupAssign,
    PriorityAssign,
}

impl Mode {
    pub fn is_one_shot(self) -> bool {
        matches!(self, Mode::SetKey | Mode::GroupAssign | Mode::PriorityAssign)
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Default => "DEFAULT",
            Mode::SetKey => "SET_KEY",
            Mode::Move => "MOVE",
            Mode::Resize => "RESIZE",
            Mode::GroupAssign => "GROUP",
            Mode::PriorityAssign => "PRIORITY",
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Command: the key vocabulary
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Reset,
    Create,
    Delete,
    EnterMove,
    EnterResize,
    EnterSetKey,
    Invert,
    EnterGroupAssign,
    EnterPriorityAssign,
    Load,
    Save,
    ToggleCapture,
}

impl Command {
    /// Character delivered for the Enter key.
    pub const ENTER: char = '\r';

    /// Default keymap.
    pub fn from_key(key: char) -> Option<Command> {
        let cmd = match key {
            '1' => Command::Reset,
            '2' => Command::Create,
            '3' => Command::Delete,
            '4' => Command::EnterMove,
            '5' => Command::EnterResize,
            '6' => Command::EnterSetKey,
            '7' => Command::Invert,
            '8' => Command::EnterGroupAssign,
            '9' => Command::EnterPriorityAssign,
            '-' => Command::Load,
            '=' => Command::Save,
            '\r' | '\n' => Command::ToggleCapture,
            _ => return None,
        };
        Some(cmd)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Inputs and outcomes
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorInput {
    PointerMoved { x: i32, y: i32 },
    PointerDown { x: i32, y: i32 },
    PointerUp,
    Key(char),
}

/// Work the editor hands back to its owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Request {
    Load,
    Save,
    ToggleCapture,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing changed (unknown key, no zone under the pointer, …).
    Unchanged,
    /// Zones or the mode changed.
    Changed,
    /// A held key left the zone set (zone deleted or re-keyed); the owner
    /// must release it on the actuator.
    ReleaseKey(char),
    Request(Request),
    Rejected(EditorError),
}

/// What the pointer picked up on press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selection {
    pub zone: ZoneId,
    /// Pointer position at pick-up.
    pub initial: (i32, i32),
    /// Pointer minus the zone's top-left corner at pick-up.
    pub offset: (i32, i32),
}

// ════════════════════════════════════════════════════════════════════════════
// Editor
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug)]
pub struct Editor {
    mode: Mode,
    pointer: (i32, i32),
    selection: Option<Selection>,
    zone_size: i32,
    min_zone_size: i32,
}

impl Default for Editor {
    fn default() -> Self { Editor::new(DEFAULT_ZONE_SIZE, DEFAULT_MIN_ZONE_SIZE) }
}

impl Editor {
    pub fn new(zone_size: i32, min_zone_size: i32) -> Self {
        Editor {
            mode: Mode::Default,
            pointer: (0, 0),
            selection: None,
            zone_size: zone_size.max(1),
            min_zone_size: min_zone_size.max(1),
        }
    }

    pub fn mode(&self) -> Mode { self.mode }
    pub fn pointer(&self) -> (i32, i32) { self.pointer }
    pub fn selection(&self) -> Option<Selection> { self.selection }

    /// Force a mode (the capture toggle resets to `Default` through here too).
    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            debug!(from = self.mode.label(), to = mode.label(), "editor mode");
        }
        self.mode = mode;
    }

    /// Feed one input.
    pub fn handle(&mut self, registry: &mut Registry, input: EditorInput) -> Outcome {
        match input {
            EditorInput::PointerMoved { x, y } => {
                self.pointer = (x, y);
                self.drag(registry, x, y)
            }
            EditorInput::PointerDown { x, y } => {
                self.pointer = (x, y);
                self.select(registry, x, y);
                Outcome::Unchanged
            }
            EditorInput::PointerUp => {
                self.selection = None;
                Outcome::Unchanged
            }
            EditorInput::Key(key) => self.handle_key(registry, key),
        }
    }

    // ── pointer ──────────────────────────────────────────────────────────

    fn select(&mut self, registry: &Registry, x: i32, y: i32) {
        self.selection = registry.zone_at(x, y).and_then(|id| {
            let z = registry.get(id)?;
            Some(Selection { zone: id, initial: (x, y), offset: (x - z.x1, y - z.y1) })
        });
    }

    fn drag(&mut self, registry: &mut Registry, x: i32, y: i32) -> Outcome {
        let Some(sel) = self.selection else { return Outcome::Unchanged };
        let Some(zone) = registry.get_mut(sel.zone) else {
            self.selection = None;
            return Outcome::Unchanged;
        };
        match self.mode {
            Mode::Move => {
                zone.set_position(x - sel.offset.0, y - sel.offset.1);
                Outcome::Changed
            }
            Mode::Resize => {
                let w = x - sel.initial.0 + sel.offset.0;
                let h = y - sel.initial.1 + sel.offset.1;
                zone.set_size(w.max(self.min_zone_size), h.max(self.min_zone_size));
                Outcome::Changed
            }
            Mode::Default | Mode::SetKey | Mode::GroupAssign | Mode::PriorityAssign => {
                Outcome::Unchanged
            }
        }
    }

    // ── keys ─────────────────────────────────────────────────────────────

    fn handle_key(&mut self, registry: &mut Registry, key: char) -> Outcome {
        let target = registry.zone_at(self.pointer.0, self.pointer.1);
        match self.mode {
            Mode::SetKey => {
                self.set_mode(Mode::Default);
                let Some(id) = target else { return Outcome::Unchanged };
                self.assign_key(registry, id, key)
            }
            Mode::GroupAssign => {
                self.set_mode(Mode::Default);
                match parse_digit(key) {
                    Ok(group) => match target {
                        Some(id) => self.assign_group(registry, id, group as GroupId),
                        None => Outcome::Unchanged,
                    },
                    Err(e) => {
                        warn!(error = %e, "group not assigned");
                        Outcome::Rejected(e)
                    }
                }
            }
            Mode::PriorityAssign => {
                self.set_mode(Mode::Default);
                match parse_digit(key) {
                    Ok(priority) => match target_mut(registry, target) {
                        Some(zone) if zone.priority == priority as i32 => Outcome::Changed,
                        Some(zone) => {
                            zone.priority = priority as i32;
                            unpress(zone)
                        }
                        None => Outcome::Unchanged,
                    },
                    Err(e) => {
                        warn!(error = %e, "priority not assigned");
                        Outcome::Rejected(e)
                    }
                }
            }
            Mode::Default | Mode::Move | Mode::Resize => match Command::from_key(key) {
                Some(cmd) => self.run_command(registry, cmd, target),
                None => Outcome::Unchanged,
            },
        }
    }

    fn run_command(
        &mut self,
        registry: &mut Registry,
        cmd: Command,
        target: Option<ZoneId>,
    ) -> Outcome {
        let (x, y) = self.pointer;
        match cmd {
            Command::Reset => self.enter(Mode::Default),
            Command::EnterMove => self.enter(Mode::Move),
            Command::EnterResize => self.enter(Mode::Resize),
            Command::EnterSetKey => self.enter(Mode::SetKey),
            Command::EnterGroupAssign => self.enter(Mode::GroupAssign),
            Command::EnterPriorityAssign => self.enter(Mode::PriorityAssign),
            Command::Create => {
                let id = registry.add_zone(Zone::square_at(x, y, self.zone_size));
                info!(zone = id.0, x, y, "zone created");
                Outcome::Changed
            }
            Command::Delete => {
                let Some(id) = target else { return Outcome::Unchanged };
                if self.selection.is_some_and(|s| s.zone == id) {
                    self.selection = None;
                }
                let Some(zone) = registry.remove_zone(id) else { return Outcome::Unchanged };
                info!(zone = id.0, "zone deleted");
                match zone.key {
                    Some(k) if zone.is_pressed() => Outcome::ReleaseKey(k),
                    _ => Outcome::Changed,
                }
            }
            Command::Invert => match target_mut(registry, target) {
                Some(zone) => {
                    zone.inverted = !zone.inverted;
                    Outcome::Changed
                }
                None => Outcome::Unchanged,
            },
            Command::Load => Outcome::Request(Request::Load),
            Command::Save => Outcome::Request(Request::Save),
            Command::ToggleCapture => {
                self.set_mode(Mode::Default);
                Outcome::Request(Request::ToggleCapture)
            }
        }
    }

    fn enter(&mut self, mode: Mode) -> Outcome {
        self.set_mode(mode);
        Outcome::Changed
    }

    /// Re-key a zone.  A held zone is marked released so the next frame
    /// presses the new key; the old key is handed back for release.
    fn assign_key(&mut self, registry: &mut Registry, id: ZoneId, key: char) -> Outcome {
        let Some(zone) = registry.get_mut(id) else { return Outcome::Unchanged };
        let old = zone.key.replace(key);
        info!(zone = id.0, key = ?key, "zone key set");
        if zone.pressed {
            zone.pressed = false;
            if let Some(k) = old {
                return Outcome::ReleaseKey(k);
            }
        }
        Outcome::Changed
    }

    /// Move a zone to `group`.  A held zone is marked released so the next
    /// frame arbitrates it against its new siblings.
    fn assign_group(&mut self, registry: &mut Registry, id: ZoneId, group: GroupId) -> Outcome {
        let Some(old) = registry.get(id).map(Zone::group) else { return Outcome::Unchanged };
        if old == Some(group) {
            return Outcome::Changed;
        }
        registry.regroup(id, Some(group));
        match registry.get_mut(id) {
            Some(zone) => unpress(zone),
            None => Outcome::Unchanged,
        }
    }
}

/// Clear the pressed flag of a zone whose arbitration inputs changed.
fn unpress(zone: &mut Zone) -> Outcome {
    if !std::mem::take(&mut zone.pressed) {
        return Outcome::Changed;
    }
    match zone.key {
        Some(k) => Outcome::ReleaseKey(k),
        None => Outcome::Changed,
    }
}

fn target_mut(registry: &mut Registry, target: Option<ZoneId>) -> Option<&mut Zone> {
    match target {
        Some(id) => registry.get_mut(id),
        None => None,
    }
}

fn parse_digit(key: char) -> Result<u32, EditorError> {
    key.to_digit(10).ok_or(EditorError::InvalidNumber(key))
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actuator::RecordingActuator;
    use crate::actuator::KeyEdge;
    use crate::arbitration::{activate, apply_triggers};

    fn at(ed: &mut Editor, reg: &mut Registry, x: i32, y: i32) {
        ed.handle(reg, EditorInput::PointerMoved { x, y });
    }

    fn key(ed: &mut Editor, reg: &mut Registry, k: char) -> Outcome {
        ed.handle(reg, EditorInput::Key(k))
    }

    #[test]
    fn create_spawns_default_zone_at_pointer() {
        let mut reg = Registry::new();
        let mut ed = Editor::default();
        at(&mut ed, &mut reg, 30, 40);
        assert_eq!(key(&mut ed, &mut reg, '2'), Outcome::Changed);

        let (_, z) = reg.iter().next().unwrap();
        assert_eq!((z.x1, z.y1, z.x2, z.y2), (30, 40, 80, 90));
        assert_eq!(z.key, None);
        assert!(!z.inverted);
        assert_eq!(z.group(), None);
        assert_eq!(z.priority, 0);
    }

    #[test]
    fn delete_removes_topmost_only() {
        let mut reg = Registry::new();
        let under = reg.add_zone(Zone::square_at(0, 0, 50));
        let over = reg.add_zone(Zone::square_at(10, 10, 50));
        let mut ed = Editor::default();
        at(&mut ed, &mut reg, 20, 20);
        key(&mut ed, &mut reg, '3');
        assert!(reg.get(over).is_none());
        assert!(reg.get(under).is_some());
    }

    #[test]
    fn delete_with_no_target_is_noop() {
        let mut reg = Registry::new();
        reg.add_zone(Zone::square_at(0, 0, 10));
        let mut ed = Editor::default();
        at(&mut ed, &mut reg, 500, 500);
        assert_eq!(key(&mut ed, &mut reg, '3'), Outcome::Unchanged);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn deleting_pressed_zone_hands_back_its_key() {
        let mut reg = Registry::new();
        let id = reg.add_zone(Zone::square_at(0, 0, 50).with_key('q'));
        activate(&mut reg, id, &mut RecordingActuator::new());
        let mut ed = Editor::default();
        at(&mut ed, &mut reg, 5, 5);
        assert_eq!(key(&mut ed, &mut reg, '3'), Outcome::ReleaseKey('q'));
    }

    #[test]
    fn invert_toggles_zone_under_pointer() {
        let mut reg = Registry::new();
        let id = reg.add_zone(Zone::square_at(0, 0, 50));
        let mut ed = Editor::default();
        at(&mut ed, &mut reg, 5, 5);
        key(&mut ed, &mut reg, '7');
        assert!(reg.get(id).unwrap().inverted);
        key(&mut ed, &mut reg, '7');
        assert!(!reg.get(id).unwrap().inverted);
    }

    #[test]
    fn set_key_captures_any_next_key() {
        let mut reg = Registry::new();
        let id = reg.add_zone(Zone::square_at(0, 0, 50));
        let mut ed = Editor::default();
        at(&mut ed, &mut reg, 5, 5);
        key(&mut ed, &mut reg, '6');
        assert_eq!(ed.mode(), Mode::SetKey);
        // '3' would be delete in default mode; here it is just the key.
        key(&mut ed, &mut reg, '3');
        assert_eq!(ed.mode(), Mode::Default);
        assert_eq!(reg.get(id).unwrap().key, Some('3'));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn rekeying_pressed_zone_releases_old_key() {
        let mut reg = Registry::new();
        let id = reg.add_zone(Zone::square_at(0, 0, 50).with_key('a'));
        activate(&mut reg, id, &mut RecordingActuator::new());
        let mut ed = Editor::default();
        at(&mut ed, &mut reg, 5, 5);
        key(&mut ed, &mut reg, '6');
        assert_eq!(key(&mut ed, &mut reg, 'b'), Outcome::ReleaseKey('a'));
        let z = reg.get(id).unwrap();
        assert_eq!(z.key, Some('b'));
        assert!(!z.is_pressed());
    }

    #[test]
    fn group_assign_regroups_zone() {
        let mut reg = Registry::new();
        let id = reg.add_zone(Zone::square_at(0, 0, 50));
        let mut ed = Editor::default();
        at(&mut ed, &mut reg, 5, 5);
        key(&mut ed, &mut reg, '8');
        assert_eq!(ed.mode(), Mode::GroupAssign);
        key(&mut ed, &mut reg, '4');
        assert_eq!(ed.mode(), Mode::Default);
        assert_eq!(reg.get(id).unwrap().group(), Some(4));
        assert_eq!(reg.find_group(4).unwrap().zones, vec![id]);
    }

    #[test]
    fn priority_assign_sets_priority() {
        let mut reg = Registry::new();
        let id = reg.add_zone(Zone::square_at(0, 0, 50));
        let mut ed = Editor::default();
        at(&mut ed, &mut reg, 5, 5);
        key(&mut ed, &mut reg, '9');
        key(&mut ed, &mut reg, '7');
        assert_eq!(reg.get(id).unwrap().priority, 7);
        assert_eq!(ed.mode(), Mode::Default);
    }

    fn pressed_pair(reg: &mut Registry, a: Zone, b: Zone) -> (ZoneId, ZoneId) {
        let a = reg.add_zone(a.with_key('a'));
        let b = reg.add_zone(b.with_key('b'));
        let mut act = RecordingActuator::new();
        activate(reg, a, &mut act);
        activate(reg, b, &mut act);
        assert!(reg.get(a).unwrap().is_pressed() && reg.get(b).unwrap().is_pressed());
        (a, b)
    }

    fn run_frames(reg: &mut Registry, act: &mut RecordingActuator, frames: usize) {
        for _ in 0..frames {
            apply_triggers(reg, act, |_, _| true);
        }
    }

    #[test]
    fn raising_priority_of_held_zone_rearbitrates_group() {
        let mut reg = Registry::new();
        let (a, b) = pressed_pair(
            &mut reg,
            Zone::new(0, 0, 50, 50).with_group(1, 0),
            Zone::new(100, 0, 150, 50).with_group(1, 0),
        );
        let mut ed = Editor::default();
        at(&mut ed, &mut reg, 10, 10);
        key(&mut ed, &mut reg, '9');
        assert_eq!(key(&mut ed, &mut reg, '5'), Outcome::ReleaseKey('a'));
        assert!(!reg.get(a).unwrap().is_pressed());

        let mut act = RecordingActuator::new();
        run_frames(&mut reg, &mut act, 3);
        assert!(reg.get(a).unwrap().is_pressed());
        assert!(!reg.get(b).unwrap().is_pressed());
        assert_eq!(act.edges, vec![KeyEdge::Press('a'), KeyEdge::Release('b')]);
    }

    #[test]
    fn lowering_priority_of_held_zone_yields_to_sibling() {
        let mut reg = Registry::new();
        let (a, b) = pressed_pair(
            &mut reg,
            Zone::new(0, 0, 50, 50).with_group(1, 3),
            Zone::new(100, 0, 150, 50).with_group(1, 3),
        );
        let mut ed = Editor::default();
        at(&mut ed, &mut reg, 10, 10);
        key(&mut ed, &mut reg, '9');
        key(&mut ed, &mut reg, '0');

        let mut act = RecordingActuator::new();
        run_frames(&mut reg, &mut act, 2);
        assert!(!reg.get(a).unwrap().is_pressed());
        assert!(reg.get(b).unwrap().is_pressed());
        assert!(act.edges.is_empty());
    }

    #[test]
    fn same_priority_keeps_held_zone_pressed() {
        let mut reg = Registry::new();
        let id = reg.add_zone(Zone::square_at(0, 0, 50).with_key('k').with_group(1, 4));
        activate(&mut reg, id, &mut RecordingActuator::new());
        let mut ed = Editor::default();
        at(&mut ed, &mut reg, 5, 5);
        key(&mut ed, &mut reg, '9');
        assert_eq!(key(&mut ed, &mut reg, '4'), Outcome::Changed);
        assert!(reg.get(id).unwrap().is_pressed());
    }

    #[test]
    fn regrouping_held_zone_over_pressed_sibling_rearbitrates() {
        let mut reg = Registry::new();
        let (a, b) = pressed_pair(
            &mut reg,
            Zone::new(0, 0, 50, 50).with_group(2, 5),
            Zone::new(100, 0, 150, 50).with_group(1, 0),
        );
        let mut ed = Editor::default();
        at(&mut ed, &mut reg, 10, 10);
        key(&mut ed, &mut reg, '8');
        assert_eq!(key(&mut ed, &mut reg, '1'), Outcome::ReleaseKey('a'));
        assert_eq!(reg.find_group(1).unwrap().zones, vec![b, a]);
        assert!(reg.find_group(2).is_none());

        let mut act = RecordingActuator::new();
        run_frames(&mut reg, &mut act, 3);
        assert!(reg.get(a).unwrap().is_pressed());
        assert!(!reg.get(b).unwrap().is_pressed());
        assert_eq!(act.edges, vec![KeyEdge::Press('a'), KeyEdge::Release('b')]);
    }

    #[test]
    fn regrouping_into_same_group_keeps_held_zone_pressed() {
        let mut reg = Registry::new();
        let id = reg.add_zone(Zone::square_at(0, 0, 50).with_key('k').with_group(3, 0));
        activate(&mut reg, id, &mut RecordingActuator::new());
        let mut ed = Editor::default();
        at(&mut ed, &mut reg, 5, 5);
        key(&mut ed, &mut reg, '8');
        assert_eq!(key(&mut ed, &mut reg, '3'), Outcome::Changed);
        assert!(reg.get(id).unwrap().is_pressed());
    }

    #[test]
    fn invalid_number_is_rejected_and_resets_mode() {
        let mut reg = Registry::new();
        let id = reg.add_zone(Zone::square_at(0, 0, 50));
        let mut ed = Editor::default();
        at(&mut ed, &mut reg, 5, 5);

        key(&mut ed, &mut reg, '8');
        assert_eq!(
            key(&mut ed, &mut reg, 'x'),
            Outcome::Rejected(EditorError::InvalidNumber('x'))
        );
        assert_eq!(ed.mode(), Mode::Default);
        assert_eq!(reg.get(id).unwrap().group(), None);

        key(&mut ed, &mut reg, '9');
        assert!(matches!(key(&mut ed, &mut reg, '!'), Outcome::Rejected(_)));
        assert_eq!(ed.mode(), Mode::Default);
    }

    #[test]
    fn one_shot_modes_reset_after_one_input_even_without_target() {
        for enter in ['6', '8', '9'] {
            let mut reg = Registry::new();
            let mut ed = Editor::default();
            at(&mut ed, &mut reg, 5, 5);
            key(&mut ed, &mut reg, enter);
            assert!(ed.mode().is_one_shot());
            assert_eq!(key(&mut ed, &mut reg, '1'), Outcome::Unchanged);
            assert_eq!(ed.mode(), Mode::Default);
        }
    }

    #[test]
    fn move_drags_zone_by_pickup_offset() {
        let mut reg = Registry::new();
        let id = reg.add_zone(Zone::new(10, 10, 60, 40));
        let mut ed = Editor::default();
        key(&mut ed, &mut reg, '4');
        assert_eq!(ed.mode(), Mode::Move);

        ed.handle(&mut reg, EditorInput::PointerDown { x: 20, y: 15 });
        at(&mut ed, &mut reg, 120, 215);
        let z = reg.get(id).unwrap();
        assert_eq!((z.x1, z.y1, z.x2, z.y2), (110, 210, 160, 240));

        ed.handle(&mut reg, EditorInput::PointerUp);
        assert!(ed.selection().is_none());
        at(&mut ed, &mut reg, 0, 0);
        assert_eq!(reg.get(id).unwrap().x1, 110);
    }

    #[test]
    fn resize_grows_by_pointer_displacement() {
        let mut reg = Registry::new();
        let id = reg.add_zone(Zone::new(10, 10, 60, 60));
        let mut ed = Editor::default();
        key(&mut ed, &mut reg, '5');

        ed.handle(&mut reg, EditorInput::PointerDown { x: 20, y: 30 });
        // offset (10, 20); w = 50 - 20 + 10 = 40, h = 70 - 30 + 20 = 60
        at(&mut ed, &mut reg, 50, 70);
        let z = reg.get(id).unwrap();
        assert_eq!((z.x1, z.y1, z.x2, z.y2), (10, 10, 50, 70));
    }

    #[test]
    fn resize_clamps_to_minimum_size() {
        let mut reg = Registry::new();
        let id = reg.add_zone(Zone::new(10, 10, 60, 60));
        let mut ed = Editor::new(50, 4);
        key(&mut ed, &mut reg, '5');
        ed.handle(&mut reg, EditorInput::PointerDown { x: 20, y: 20 });
        at(&mut ed, &mut reg, -100, -100);
        let z = reg.get(id).unwrap();
        assert_eq!((z.width(), z.height()), (4, 4));
    }

    #[test]
    fn drag_in_default_mode_does_nothing() {
        let mut reg = Registry::new();
        let id = reg.add_zone(Zone::new(10, 10, 60, 60));
        let mut ed = Editor::default();
        ed.handle(&mut reg, EditorInput::PointerDown { x: 20, y: 20 });
        assert!(ed.selection().is_some());
        assert_eq!(
            ed.handle(&mut reg, EditorInput::PointerMoved { x: 200, y: 200 }),
            Outcome::Unchanged
        );
        assert_eq!(reg.get(id).unwrap().x1, 10);
    }

    #[test]
    fn commands_still_work_in_move_mode() {
        let mut reg = Registry::new();
        let mut ed = Editor::default();
        key(&mut ed, &mut reg, '4');
        key(&mut ed, &mut reg, '2');
        assert_eq!(reg.len(), 1);
        assert_eq!(ed.mode(), Mode::Move);
        key(&mut ed, &mut reg, '1');
        assert_eq!(ed.mode(), Mode::Default);
    }

    #[test]
    fn requests_are_handed_back() {
        let mut reg = Registry::new();
        let mut ed = Editor::default();
        assert_eq!(key(&mut ed, &mut reg, '-'), Outcome::Request(Request::Load));
        assert_eq!(key(&mut ed, &mut reg, '='), Outcome::Request(Request::Save));

        key(&mut ed, &mut reg, '5');
        assert_eq!(
            key(&mut ed, &mut reg, Command::ENTER),
            Outcome::Request(Request::ToggleCapture)
        );
        assert_eq!(ed.mode(), Mode::Default);
    }

    #[test]
    fn deleting_selected_zone_clears_selection() {
        let mut reg = Registry::new();
        reg.add_zone(Zone::new(0, 0, 50, 50));
        let mut ed = Editor::default();
        key(&mut ed, &mut reg, '4');
        ed.handle(&mut reg, EditorInput::PointerDown { x: 10, y: 10 });
        key(&mut ed, &mut reg, '3');
        assert!(ed.selection().is_none());
        assert_eq!(
            ed.handle(&mut reg, EditorInput::PointerMoved { x: 30, y: 30 }),
            Outcome::Unchanged
        );
    }
}
