/// Interactive-element registry.
///
/// Every renderer returns the set of things the player can act on: a
/// button set and a character-box set. Only one set is keyboard-navigable
/// at a time; the pointer can reach both.

use crate::domain::command::Command;
use crate::domain::snapshot::ScreenKind;
use crate::view::geometry::Rect;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default)]
pub enum ElementSet {
    #[default]
    Buttons,
    CharacterBoxes,
}

/// Stable handle to one element of the current registry.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct ElementRef {
    pub set: ElementSet,
    pub index: usize,
}

impl ElementRef {
    pub fn button(index: usize) -> Self {
        ElementRef { set: ElementSet::Buttons, index }
    }

    pub fn character_box(index: usize) -> Self {
        ElementRef { set: ElementSet::CharacterBoxes, index }
    }
}

/// What an element does when triggered.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Action {
    /// Send this value in the command kind of the current screen.
    Choose(String),
    /// Submit the text-entry field.
    SubmitEntry,
    /// Leave the current prompt without choosing anything.
    Cancel,
}

impl Action {
    /// Produce the command for this action. `entry` is the current
    /// text-entry value and is only read by `SubmitEntry`.
    pub fn resolve(&self, kind: &ScreenKind, entry: &str) -> Command {
        match self {
            Action::Choose(value) => Command::for_kind(kind, value.clone()),
            Action::SubmitEntry => Command::TextInput(entry.to_string()),
            Action::Cancel => Command::Cancel,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct InteractiveElement {
    pub index: usize,
    pub bounds: Rect,
    /// Only dead characters are disabled.
    pub disabled: bool,
    pub action: Action,
}

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Registry {
    pub buttons: Vec<InteractiveElement>,
    pub character_boxes: Vec<InteractiveElement>,
    pub mode: ElementSet,
}

impl Registry {
    pub fn for_kind(kind: &ScreenKind) -> Self {
        let mode = if *kind == ScreenKind::BattleTarget {
            ElementSet::CharacterBoxes
        } else {
            ElementSet::Buttons
        };
        Registry { mode, ..Registry::default() }
    }

    /// Append a button and return its handle.
    pub fn add_button(&mut self, bounds: Rect, action: Action) -> ElementRef {
        let index = self.buttons.len();
        self.buttons.push(InteractiveElement {
            index,
            bounds,
            disabled: false,
            action,
        });
        ElementRef::button(index)
    }

    pub fn add_character_box(&mut self, bounds: Rect, disabled: bool, action: Action) -> ElementRef {
        let index = self.character_boxes.len();
        self.character_boxes.push(InteractiveElement {
            index,
            bounds,
            disabled,
            action,
        });
        ElementRef::character_box(index)
    }

    fn set(&self, set: ElementSet) -> &[InteractiveElement] {
        match set {
            ElementSet::Buttons => &self.buttons,
            ElementSet::CharacterBoxes => &self.character_boxes,
        }
    }

    /// The keyboard-navigable set.
    pub fn active(&self) -> &[InteractiveElement] {
        self.set(self.mode)
    }

    pub fn get(&self, r: ElementRef) -> Option<&InteractiveElement> {
        self.set(r.set).get(r.index)
    }

    /// Handle for position `index` of the active set.
    pub fn active_ref(&self, index: usize) -> Option<ElementRef> {
        (index < self.active().len()).then_some(ElementRef { set: self.mode, index })
    }

    /// Topmost element under a cell. Buttons paint above character boxes.
    pub fn hit(&self, x: i32, y: i32) -> Option<ElementRef> {
        let top_down = [ElementSet::Buttons, ElementSet::CharacterBoxes];
        top_down.into_iter().find_map(|set| {
            self.set(set)
                .iter()
                .rev()
                .find(|e| e.bounds.contains(x, y))
                .map(|e| ElementRef { set, index: e.index })
        })
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty() && self.character_boxes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_follows_screen_kind() {
        assert_eq!(Registry::for_kind(&ScreenKind::BattleTarget).mode, ElementSet::CharacterBoxes);
        assert_eq!(Registry::for_kind(&ScreenKind::Battle).mode, ElementSet::Buttons);
        assert_eq!(Registry::for_kind(&ScreenKind::Unknown("x".into())).mode, ElementSet::Buttons);
    }

    #[test]
    fn hit_prefers_buttons() {
        let mut reg = Registry::for_kind(&ScreenKind::BattleTarget);
        reg.add_character_box(Rect::new(0, 0, 10, 10), false, Action::Choose("Slime".into()));
        reg.add_button(Rect::new(2, 2, 4, 3), Action::Choose("Back".into()));
        assert_eq!(reg.hit(3, 3), Some(ElementRef::button(0)));
        assert_eq!(reg.hit(8, 8), Some(ElementRef::character_box(0)));
        assert_eq!(reg.hit(20, 20), None);
        assert_eq!(reg.active().len(), 1);
        assert_eq!(reg.active_ref(0), Some(ElementRef::character_box(0)));
        assert_eq!(reg.active_ref(1), None);
    }

    #[test]
    fn resolve_uses_screen_kind_and_entry() {
        let choose = Action::Choose("Attack".into());
        assert_eq!(choose.resolve(&ScreenKind::Menu, "ignored"), Command::MenuOption("Attack".into()));
        assert_eq!(choose.resolve(&ScreenKind::Travel, ""), Command::TextInput("Attack".into()));
        assert_eq!(Action::SubmitEntry.resolve(&ScreenKind::Text, "hello"), Command::TextInput("hello".into()));
        assert_eq!(Action::Cancel.resolve(&ScreenKind::BattleTarget, "x"), Command::Cancel);
    }
}
