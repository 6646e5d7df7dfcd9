/// Screen renderers.
///
/// Each renderer is a pure function from a snapshot slice plus a
/// `RenderContext` to a `Built` scene and registry. Nothing here touches
/// the terminal.

pub mod battle;
pub mod conversation;
pub mod menu;
pub mod message;
pub mod text_entry;
pub mod title;
pub mod travel;

use crate::config::BattleConfig;
use crate::domain::snapshot::{ScreenKind, Snapshot};
use crate::view::geometry::{Rect, Size};
use crate::view::registry::{Action, ElementRef, Registry};
use crate::view::scene::{Label, Node, NodeId, Scene, Tone, Weight};
use crate::view::text;
use crate::view::theme;

/// Inputs every renderer may read besides the snapshot itself.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RenderContext {
    pub viewport: Size,
    /// Cursor position in the active set, used for hover-driven details.
    pub focus: Option<usize>,
    pub battle: BattleConfig,
}

impl RenderContext {
    pub fn new(viewport: Size) -> Self {
        RenderContext { viewport, focus: None, battle: BattleConfig::default() }
    }

    pub fn with_focus(mut self, focus: Option<usize>) -> Self {
        self.focus = focus;
        self
    }

    pub fn with_battle(mut self, battle: BattleConfig) -> Self {
        self.battle = battle;
        self
    }
}

/// Renderer output before the dispatcher stamps its identity on it.
#[derive(Clone, PartialEq, Debug)]
pub struct Built {
    pub scene: Scene,
    pub registry: Registry,
    pub initial_selection: Option<usize>,
}

/// Scene and registry under construction.
pub(crate) struct Canvas {
    pub scene: Scene,
    pub registry: Registry,
    pub kind: ScreenKind,
    pub initial_selection: Option<usize>,
}

impl Canvas {
    pub fn new(snapshot: &Snapshot) -> Self {
        let kind = snapshot.kind();
        Canvas {
            scene: Scene::new(snapshot.background.clone()),
            registry: Registry::for_kind(&kind),
            kind,
            initial_selection: None,
        }
    }

    pub fn panel(&mut self, rect: Rect, border: Tone) -> NodeId {
        self.scene.push(Node::Panel { rect, border, element: None })
    }

    pub fn text(&mut self, label: Label) -> NodeId {
        self.scene.label(label)
    }

    pub fn portrait(&mut self, rect: Rect, url: Option<&str>, dead: bool, mirrored: bool) -> NodeId {
        self.scene.push(Node::Portrait {
            rect,
            url: url.map(str::to_string),
            dead,
            mirrored,
        })
    }

    /// Add a button to the scene and the button set.
    pub fn button(&mut self, rect: Rect, label: &str, action: Action) -> ElementRef {
        let element = self.registry.add_button(rect, action);
        let lines = button_lines(label, rect);
        self.scene.push(Node::Button { rect, lines, element });
        element
    }

    /// Box with wrapped text inside, one cell of padding on the sides.
    pub fn text_box(&mut self, rect: Rect, content: &str) -> NodeId {
        self.panel(rect, Tone::Normal);
        let inner = Rect::new(rect.x + 2 * theme::PAD, rect.y + theme::PAD, rect.w - 4 * theme::PAD, rect.h - 2 * theme::PAD);
        self.text(Label::new(inner, content))
    }

    pub fn finish(self) -> Built {
        Built {
            scene: self.scene,
            registry: self.registry,
            initial_selection: self.initial_selection,
        }
    }
}

/// Label lines of a button: wrapped, then trimmed to the rows it has.
fn button_lines(label: &str, rect: Rect) -> Vec<String> {
    let inner_w = (rect.w - 2).max(1) as usize;
    let rows = (rect.h - 2).max(1) as usize;
    let mut lines = text::wrap(label, inner_w);
    if lines.len() > rows {
        lines.truncate(rows);
        if let Some(last) = lines.last_mut() {
            *last = text::truncate(&format!("{last}{}", text::ELLIPSIS), inner_w);
        }
    }
    lines
}

/// Height of a button of `width` cells that shows all of `label`.
pub fn button_height(label: &str, width: i32) -> i32 {
    let lines = text::wrap(label, (width - 2).max(1) as usize).len().max(1) as i32;
    lines + 2
}

/// The top-left main text box shared by menu-like screens. Returns its rect.
pub(crate) fn main_text_box(canvas: &mut Canvas, content: &str, viewport: Size) -> Rect {
    let max_w = viewport.w - 2 * theme::PAD;
    let wrap = (max_w - 4 * theme::PAD).max(1) as usize;
    let measured = text::measure(content, wrap);
    let w = (measured.w + 4 * theme::PAD).min(max_w).max(4 * theme::PAD + 1);
    let h = measured.h.max(1) + 2 * theme::PAD;
    let rect = Rect::new(theme::PAD, 0, w, h);
    let node = canvas.text_box(rect, content);
    if let Some(label) = canvas.scene.label_mut(node) {
        label.weight = Weight::Bold;
    }
    rect
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_height_grows_with_label() {
        assert_eq!(button_height("Run", 12), 3);
        assert_eq!(button_height("↑\nForest", 12), 4);
    }

    #[test]
    fn overlong_button_label_is_trimmed() {
        let lines = button_lines("a very long label for a tiny button", Rect::new(0, 0, 8, 3));
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("..."));
    }
}
