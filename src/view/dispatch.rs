/// Snapshot to screen: picks the one renderer that matches the screen
/// state and stamps the result with its identity.
///
/// A new `ScreenView` is built from scratch on every call. Nothing of the
/// previous screen survives, so a stale button can never fire.

use crate::domain::snapshot::{ScreenKind, ScreenState, Snapshot};
use crate::view::geometry::Rect;
use crate::view::registry::Registry;
use crate::view::scene::{Node, Scene};
use crate::view::screens::{
    battle, conversation, menu, message, text_entry, title, travel, Built, RenderContext,
};

/// Which renderer produced a view.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RendererId {
    Title,
    Menu,
    Battle,
    Message,
    BattleMessage,
    StatsMessage,
    TextEntry,
    Travel,
    Conversation,
}

#[derive(Clone, PartialEq, Debug)]
pub struct ScreenView {
    pub kind: ScreenKind,
    pub renderer: RendererId,
    pub scene: Scene,
    pub registry: Registry,
    pub initial_selection: Option<usize>,
    /// Bounds of the text entry field, on screens that take typed input.
    pub entry: Option<Rect>,
}

impl ScreenView {
    fn new(kind: ScreenKind, renderer: RendererId, built: Built) -> Self {
        let entry = built.scene.nodes.iter().find_map(|n| match n {
            Node::Field { rect } => Some(*rect),
            _ => None,
        });
        ScreenView {
            kind,
            renderer,
            scene: built.scene,
            registry: built.registry,
            initial_selection: built.initial_selection,
            entry,
        }
    }
}

pub fn dispatch(snapshot: &Snapshot, ctx: &RenderContext) -> ScreenView {
    let (renderer, built) = match &snapshot.state {
        ScreenState::Title(p) => (RendererId::Title, title::render(snapshot, p, ctx)),
        ScreenState::Menu(p) => (RendererId::Menu, menu::render(snapshot, p, ctx)),
        ScreenState::Battle(b) | ScreenState::BattleTarget(b) => {
            (RendererId::Battle, battle::render(snapshot, b, ctx))
        }
        ScreenState::Message { style, prompt } => {
            (RendererId::Message, message::render(snapshot, *style, prompt, ctx))
        }
        ScreenState::BattleMessage(m) => {
            (RendererId::BattleMessage, message::render_battle(snapshot, m, ctx))
        }
        ScreenState::StatsMessage(c) => {
            (RendererId::StatsMessage, message::render_stats(snapshot, c, ctx))
        }
        ScreenState::TextEntry(p) => (RendererId::TextEntry, text_entry::render(snapshot, p, ctx)),
        ScreenState::Travel(t) => (RendererId::Travel, travel::render(snapshot, t, ctx)),
        ScreenState::Conversation(c) => {
            (RendererId::Conversation, conversation::render(snapshot, c, ctx))
        }
        ScreenState::Unknown { prompt, .. } => (RendererId::Menu, menu::render(snapshot, prompt, ctx)),
    };
    ScreenView::new(snapshot.kind(), renderer, built)
}
