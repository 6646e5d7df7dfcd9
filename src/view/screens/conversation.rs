/// Conversation screen: the NPC speaks from the left, the player answers
/// from the right. Hovering a reply previews its detail as the player's line.

use crate::domain::snapshot::{ConversationState, Snapshot};
use crate::view::geometry::{Rect, Size};
use crate::view::layout::{self, GridSpec};
use crate::view::registry::Action;
use crate::view::scene::{Label, Tone, Weight};
use crate::view::screens::{button_height, main_text_box, Built, Canvas, RenderContext};
use crate::view::theme;

pub fn render(snapshot: &Snapshot, talk: &ConversationState, ctx: &RenderContext) -> Built {
    let mut canvas = Canvas::new(snapshot);
    let vp = ctx.viewport;
    let options = &talk.choices.options[..talk.choices.len().min(theme::CONVERSATION_MAX_OPTIONS)];

    let mut top = theme::PAD;
    if !talk.main_text.is_empty() {
        top += main_text_box(&mut canvas, &talk.main_text, vp).bottom();
    }

    let width = vp.w - 2 * theme::PAD;
    let min_h = theme::PORTRAIT.h + 2 * theme::PAD;

    let npc = Speaker {
        text: &talk.npc_text,
        portrait: talk.npc_portrait.as_deref(),
        candidates: vec![],
        mirrored: false,
    };
    let npc_box = npc.draw(&mut canvas, Rect::new(theme::PAD, top, width, 0), min_h);

    let focus = ctx.focus.filter(|&i| i < options.len());
    let player = Speaker {
        text: focus.and_then(|i| talk.choices.detail(i)).unwrap_or(talk.player_text.as_str()),
        portrait: talk.player_portrait.as_deref(),
        candidates: (0..options.len())
            .filter_map(|i| talk.choices.detail(i))
            .chain(std::iter::once(talk.player_text.as_str()))
            .collect(),
        mirrored: true,
    };
    player.draw(&mut canvas, Rect::new(theme::PAD, npc_box.bottom() + theme::PAD, width, 0), min_h);

    if !options.is_empty() {
        let w = theme::CONVERSATION_BUTTON_W;
        let h = options.iter().map(|o| button_height(o, w)).max().unwrap_or(theme::BUTTON_H);
        let spec = GridSpec {
            count: options.len(),
            columns: options.len(),
            cell: Size::new(w, h),
            col_spacing: theme::MENU_COL_SPACING,
            row_spacing: 0,
        };
        for (rect, option) in layout::bottom_grid(&spec, vp).into_iter().zip(options) {
            canvas.button(rect, option, Action::Choose(option.clone()));
        }
    }

    canvas.finish()
}

struct Speaker<'a> {
    text: &'a str,
    portrait: Option<&'a str>,
    /// Texts the box may have to hold; it is sized for the tallest.
    candidates: Vec<&'a str>,
    mirrored: bool,
}

impl Speaker<'_> {
    fn draw(self, canvas: &mut Canvas, mut bounds: Rect, min_h: i32) -> Rect {
        let frame = layout::text_frame(bounds, Some(theme::PORTRAIT));
        let texts = std::iter::once(self.text).chain(self.candidates.iter().copied());
        bounds.h = layout::autosize(min_h, texts, frame.wrap, theme::TEXT_BOX_PADDING);
        canvas.panel(bounds, Tone::Normal);

        let (portrait_x, text_x) = if self.mirrored {
            (bounds.right() - 2 * theme::PAD - theme::PORTRAIT.w, bounds.x + 2 * theme::PAD)
        } else {
            (bounds.x + 2 * theme::PAD, frame.origin.x)
        };
        let portrait = Rect::new(portrait_x, bounds.y + theme::PAD, theme::PORTRAIT.w, theme::PORTRAIT.h);
        canvas.portrait(portrait, self.portrait, false, self.mirrored);

        let rect = Rect::new(text_x, frame.origin.y, frame.wrap as i32, bounds.h - 2 * theme::PAD);
        let weight = if self.mirrored { Weight::Italic } else { Weight::Regular };
        canvas.text(Label::new(rect, self.text).weight(weight));
        bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::snapshot::{Choices, ScreenState};

    fn talk(options: &[&str], details: &[&str]) -> (Snapshot, ConversationState) {
        let state = ConversationState {
            main_text: String::new(),
            npc_text: "Have you seen my cat?".into(),
            player_text: "...".into(),
            npc_portrait: Some("old_woman.png".into()),
            player_portrait: Some("hero.png".into()),
            choices: Choices {
                options: options.iter().map(|s| s.to_string()).collect(),
                details: details.iter().map(|s| s.to_string()).collect(),
                ..Choices::default()
            },
        };
        (Snapshot { background: None, state: ScreenState::Conversation(state.clone()) }, state)
    }

    #[test]
    fn at_most_four_replies_in_one_row() {
        let (snap, state) = talk(&["Yes", "No", "Maybe", "Ask", "Leave"], &[]);
        let built = render(&snap, &state, &RenderContext::new(Size::new(120, 40)));
        let b = &built.registry.buttons;
        assert_eq!(b.len(), 4);
        assert!(b.iter().all(|e| e.bounds.y == b[0].bounds.y));
        assert!(b.iter().all(|e| e.bounds.w == theme::CONVERSATION_BUTTON_W));
    }

    #[test]
    fn player_portrait_is_mirrored_on_the_right() {
        let (snap, state) = talk(&["Yes"], &[]);
        let built = render(&snap, &state, &RenderContext::new(Size::new(100, 40)));
        let portraits: Vec<_> = built.scene.portraits().collect();
        assert_eq!(portraits.len(), 2);
        let (npc_rect, npc_url, _, npc_mirrored) = portraits[0];
        let (hero_rect, hero_url, _, hero_mirrored) = portraits[1];
        assert_eq!((npc_url, npc_mirrored), (Some("old_woman.png"), false));
        assert_eq!((hero_url, hero_mirrored), (Some("hero.png"), true));
        assert!(npc_rect.x < 50 && hero_rect.x > 50);
        assert!(hero_rect.y > npc_rect.y);
    }

    #[test]
    fn hover_swaps_the_player_line() {
        let (snap, state) = talk(&["Yes", "No"], &["Of course I have.", "Never seen it."]);
        let ctx = RenderContext::new(Size::new(100, 40));
        let plain = render(&snap, &state, &ctx);
        let hovered = render(&snap, &state, &ctx.with_focus(Some(1)));
        assert!(plain.scene.has_text("..."));
        assert!(hovered.scene.has_text("Never seen it."));
        assert!(!hovered.scene.has_text("..."));
        assert!(hovered.scene.has_text("Have you seen my cat?"));
        assert_eq!(plain.registry, hovered.registry);
        assert_eq!(plain.scene.nodes.len(), hovered.scene.nodes.len());
    }
}
