/// Keyboard cursor and pointer gestures over the current registry.
///
/// Each element moves through `default -> hover -> pressed -> default`.
/// A pointer press only fires when it is released over the same element;
/// releasing anywhere else cancels it. Enter fires the selected element
/// once per physical key-down.
///
/// The navigator never looks at the loading gate. The session drops every
/// event while the gate is engaged, before it reaches this type.

use crate::view::registry::{ElementRef, InteractiveElement, Registry};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NavKey {
    Up,
    Down,
    Left,
    Right,
    Enter,
}

impl NavKey {
    /// Cursor step for an arrow key.
    fn delta(self) -> Option<isize> {
        match self {
            NavKey::Up | NavKey::Left => Some(-1),
            NavKey::Down | NavKey::Right => Some(1),
            NavKey::Enter => None,
        }
    }
}

/// How an element should be drawn right now.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum VisualState {
    Default,
    Hover,
    Pressed,
}

/// Result of feeding one event to the navigator.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NavOutcome {
    Idle,
    /// The cursor moved; focus-dependent details must be re-rendered.
    CursorMoved,
    Fire(ElementRef),
}

#[derive(Clone, Debug, Default)]
pub struct Navigator {
    selected: Option<usize>,
    hovered: Option<ElementRef>,
    pressed: Option<ElementRef>,
    enter_latched: bool,
    /// When false, disabled elements are skipped by the cursor and inert to gestures.
    disabled_selectable: bool,
}

impl Navigator {
    pub fn new(disabled_selectable: bool) -> Self {
        Navigator { disabled_selectable, ..Navigator::default() }
    }

    /// Forget everything about the previous screen. The Enter latch
    /// survives so a key held across a screen change does not fire twice.
    pub fn reset(&mut self) {
        self.selected = None;
        self.hovered = None;
        self.pressed = None;
    }

    /// Attach to a fresh registry with an optional preselected element.
    pub fn bind(&mut self, registry: &Registry, initial: Option<usize>) {
        self.selected = initial.filter(|&i| {
            registry.active().get(i).is_some_and(|e| self.eligible(e))
        });
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    #[cfg(test)]
    pub fn hovered(&self) -> Option<ElementRef> {
        self.hovered
    }

    pub fn visual(&self, registry: &Registry, element: ElementRef) -> VisualState {
        if self.pressed == Some(element) {
            return VisualState::Pressed;
        }
        let selected = element.set == registry.mode && self.selected == Some(element.index);
        if self.hovered == Some(element) || selected {
            VisualState::Hover
        } else {
            VisualState::Default
        }
    }

    // ── Keyboard ──

    pub fn key_down(&mut self, registry: &Registry, key: NavKey) -> NavOutcome {
        match key.delta() {
            Some(delta) => self.step(registry, delta),
            None => {
                if self.enter_latched {
                    return NavOutcome::Idle;
                }
                self.enter_latched = true;
                self.fire_selected(registry)
            }
        }
    }

    pub fn key_up(&mut self, key: NavKey) {
        if key == NavKey::Enter {
            self.enter_latched = false;
        }
    }

    /// Take the Enter latch without firing anything. Returns false if
    /// Enter is already held. Used by screens that consume Enter themselves.
    pub fn latch_enter(&mut self) -> bool {
        !std::mem::replace(&mut self.enter_latched, true)
    }

    fn fire_selected(&self, registry: &Registry) -> NavOutcome {
        let Some(index) = self.selected else {
            return NavOutcome::Idle;
        };
        match registry.active().get(index) {
            Some(e) if self.eligible(e) => registry
                .active_ref(index)
                .map_or(NavOutcome::Idle, NavOutcome::Fire),
            _ => NavOutcome::Idle,
        }
    }

    /// Move the cursor by `delta`, wrapping, skipping ineligible elements.
    fn step(&mut self, registry: &Registry, delta: isize) -> NavOutcome {
        let elements = registry.active();
        let n = elements.len() as isize;
        if n == 0 {
            return NavOutcome::Idle;
        }
        let mut at = match self.selected {
            Some(i) => i as isize,
            None if delta > 0 => -1,
            None => n,
        };
        for _ in 0..n {
            at = (at + delta).rem_euclid(n);
            if self.eligible(&elements[at as usize]) {
                let next = Some(at as usize);
                if next == self.selected {
                    return NavOutcome::Idle;
                }
                self.selected = next;
                return NavOutcome::CursorMoved;
            }
        }
        NavOutcome::Idle
    }

    // ── Pointer ──

    pub fn pointer_moved(&mut self, registry: &Registry, x: i32, y: i32) -> NavOutcome {
        if self.pressed.is_some() {
            return NavOutcome::Idle;
        }
        let hit = self.target(registry, x, y);
        if hit == self.hovered {
            return NavOutcome::Idle;
        }
        let left = self.hovered.is_some();
        self.hovered = hit;

        let before = self.selected;
        match hit {
            Some(r) if r.set == registry.mode => self.selected = Some(r.index),
            Some(_) => {}
            None if left => self.selected = None,
            None => {}
        }
        if self.selected != before {
            NavOutcome::CursorMoved
        } else {
            NavOutcome::Idle
        }
    }

    pub fn pointer_down(&mut self, registry: &Registry, x: i32, y: i32) {
        self.pressed = self.target(registry, x, y);
    }

    pub fn pointer_up(&mut self, registry: &Registry, x: i32, y: i32) -> NavOutcome {
        let Some(pressed) = self.pressed.take() else {
            return NavOutcome::Idle;
        };
        if self.target(registry, x, y) == Some(pressed) {
            NavOutcome::Fire(pressed)
        } else {
            NavOutcome::Idle
        }
    }

    // ── Internal ──

    fn eligible(&self, element: &InteractiveElement) -> bool {
        self.disabled_selectable || !element.disabled
    }

    fn target(&self, registry: &Registry, x: i32, y: i32) -> Option<ElementRef> {
        registry
            .hit(x, y)
            .filter(|&r| registry.get(r).is_some_and(|e| self.eligible(e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::snapshot::ScreenKind;
    use crate::view::geometry::Rect;
    use crate::view::registry::{Action, ElementSet};
    use proptest::prelude::*;

    fn buttons(n: usize) -> Registry {
        let mut r = Registry::for_kind(&ScreenKind::Menu);
        for i in 0..n {
            r.add_button(Rect::new(i as i32 * 10, 0, 8, 3), Action::Choose(format!("opt{i}")));
        }
        r
    }

    /// Target screen: three character boxes, the middle one dead, plus Back.
    fn targets() -> Registry {
        let mut r = Registry::for_kind(&ScreenKind::BattleTarget);
        r.add_character_box(Rect::new(0, 0, 10, 5), false, Action::Choose("Ayla".into()));
        r.add_character_box(Rect::new(20, 0, 10, 5), true, Action::Choose("Slime".into()));
        r.add_character_box(Rect::new(40, 0, 10, 5), false, Action::Choose("Imp".into()));
        r.add_button(Rect::new(20, 10, 10, 3), Action::Choose("Back".into()));
        r
    }

    // ── Keyboard ──

    #[test]
    fn first_step_from_nothing() {
        let reg = buttons(3);
        let mut nav = Navigator::new(true);
        assert_eq!(nav.key_down(&reg, NavKey::Down), NavOutcome::CursorMoved);
        assert_eq!(nav.selected(), Some(0));

        let mut nav = Navigator::new(true);
        nav.key_down(&reg, NavKey::Up);
        assert_eq!(nav.selected(), Some(2));
    }

    #[test]
    fn arrows_wrap_around() {
        let reg = buttons(3);
        let mut nav = Navigator::new(true);
        nav.bind(&reg, Some(2));
        nav.key_down(&reg, NavKey::Right);
        assert_eq!(nav.selected(), Some(0));
        nav.key_down(&reg, NavKey::Left);
        assert_eq!(nav.selected(), Some(2));
    }

    #[test]
    fn empty_registry_ignores_keys() {
        let reg = buttons(0);
        let mut nav = Navigator::new(true);
        assert_eq!(nav.key_down(&reg, NavKey::Down), NavOutcome::Idle);
        assert_eq!(nav.key_down(&reg, NavKey::Enter), NavOutcome::Idle);
        assert_eq!(nav.selected(), None);
    }

    #[test]
    fn enter_fires_once_per_press() {
        let reg = buttons(2);
        let mut nav = Navigator::new(true);
        nav.bind(&reg, Some(1));
        assert_eq!(nav.key_down(&reg, NavKey::Enter), NavOutcome::Fire(ElementRef::button(1)));
        // Auto-repeat while held.
        assert_eq!(nav.key_down(&reg, NavKey::Enter), NavOutcome::Idle);
        nav.key_up(NavKey::Enter);
        assert_eq!(nav.key_down(&reg, NavKey::Enter), NavOutcome::Fire(ElementRef::button(1)));
    }

    #[test]
    fn enter_without_selection_does_nothing() {
        let reg = buttons(2);
        let mut nav = Navigator::new(true);
        assert_eq!(nav.key_down(&reg, NavKey::Enter), NavOutcome::Idle);
    }

    #[test]
    fn latch_survives_reset() {
        let reg = buttons(1);
        let mut nav = Navigator::new(true);
        nav.bind(&reg, Some(0));
        nav.key_down(&reg, NavKey::Enter);
        nav.reset();
        nav.bind(&reg, Some(0));
        assert_eq!(nav.key_down(&reg, NavKey::Enter), NavOutcome::Idle);
    }

    #[test]
    fn target_cursor_walks_character_boxes_only() {
        let reg = targets();
        let mut nav = Navigator::new(true);
        for expected in [0, 1, 2, 0] {
            nav.key_down(&reg, NavKey::Down);
            assert_eq!(nav.selected(), Some(expected));
        }
        assert_eq!(nav.key_down(&reg, NavKey::Enter), NavOutcome::Fire(ElementRef::character_box(0)));
    }

    // ── Disabled elements ──

    #[test]
    fn dead_targets_selectable_by_default() {
        let reg = targets();
        let mut nav = Navigator::new(true);
        nav.pointer_down(&reg, 25, 2);
        assert_eq!(nav.pointer_up(&reg, 25, 2), NavOutcome::Fire(ElementRef::character_box(1)));
    }

    #[test]
    fn skipping_policy_makes_dead_targets_inert() {
        let reg = targets();
        let mut nav = Navigator::new(false);
        nav.key_down(&reg, NavKey::Down);
        nav.key_down(&reg, NavKey::Down);
        assert_eq!(nav.selected(), Some(2));

        assert_eq!(nav.pointer_moved(&reg, 25, 2), NavOutcome::Idle);
        assert_eq!(nav.hovered(), None);
        nav.pointer_down(&reg, 25, 2);
        assert_eq!(nav.pointer_up(&reg, 25, 2), NavOutcome::Idle);

        let mut nav = Navigator::new(false);
        nav.bind(&reg, Some(1));
        assert_eq!(nav.selected(), None);
    }

    // ── Pointer ──

    #[test]
    fn press_and_release_inside_fires() {
        let reg = buttons(2);
        let mut nav = Navigator::new(true);
        assert_eq!(nav.pointer_moved(&reg, 12, 1), NavOutcome::CursorMoved);
        assert_eq!(nav.selected(), Some(1));
        nav.pointer_down(&reg, 12, 1);
        assert_eq!(nav.visual(&reg, ElementRef::button(1)), VisualState::Pressed);
        assert_eq!(nav.pointer_up(&reg, 13, 2), NavOutcome::Fire(ElementRef::button(1)));
        assert_eq!(nav.visual(&reg, ElementRef::button(1)), VisualState::Hover);
    }

    #[test]
    fn release_elsewhere_cancels() {
        let reg = buttons(2);
        let mut nav = Navigator::new(true);
        nav.pointer_down(&reg, 2, 1);
        // Dragging while pressed does not hover anything else.
        assert_eq!(nav.pointer_moved(&reg, 12, 1), NavOutcome::Idle);
        assert_eq!(nav.pointer_up(&reg, 12, 1), NavOutcome::Idle);
        assert_eq!(nav.visual(&reg, ElementRef::button(0)), VisualState::Default);
    }

    #[test]
    fn leaving_clears_the_cursor() {
        let reg = buttons(2);
        let mut nav = Navigator::new(true);
        nav.pointer_moved(&reg, 2, 1);
        assert_eq!(nav.pointer_moved(&reg, 2, 20), NavOutcome::CursorMoved);
        assert_eq!(nav.selected(), None);
        assert_eq!(nav.hovered(), None);
    }

    #[test]
    fn pointer_only_button_does_not_move_the_cursor() {
        let reg = targets();
        let mut nav = Navigator::new(true);
        nav.bind(&reg, Some(2));
        assert_eq!(nav.pointer_moved(&reg, 22, 11), NavOutcome::Idle);
        assert_eq!(nav.hovered(), Some(ElementRef::button(0)));
        assert_eq!(nav.selected(), Some(2));
        assert_eq!(reg.mode, ElementSet::CharacterBoxes);
    }

    proptest! {
        /// The cursor never leaves the active set, whatever the key sequence.
        #[test]
        fn cursor_stays_in_bounds(n in 0usize..8, keys in proptest::collection::vec(0u8..5, 0..40)) {
            let reg = buttons(n);
            let mut nav = Navigator::new(true);
            for k in keys {
                let key = [NavKey::Up, NavKey::Down, NavKey::Left, NavKey::Right, NavKey::Enter][k as usize];
                if let NavOutcome::Fire(r) = nav.key_down(&reg, key) {
                    prop_assert!(r.index < n);
                }
                nav.key_up(key);
                if let Some(i) = nav.selected() {
                    prop_assert!(i < n);
                }
            }
        }
    }
}
