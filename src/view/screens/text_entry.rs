/// Free-text screen: main and sub text like a menu, an entry field near
/// the bottom, and a Send button under it. The typed text itself lives in
/// the session; the scene only reserves the field.

use crate::domain::snapshot::{Prompt, Snapshot};
use crate::view::geometry::{Point, Rect, Size};
use crate::view::registry::Action;
use crate::view::scene::Node;
use crate::view::screens::menu::{self, SubText};
use crate::view::screens::{main_text_box, Built, Canvas, RenderContext};
use crate::view::theme;

pub const SEND: &str = "Send";

pub fn render(snapshot: &Snapshot, prompt: &Prompt, ctx: &RenderContext) -> Built {
    let mut canvas = Canvas::new(snapshot);
    let vp = ctx.viewport;

    let main = main_text_box(&mut canvas, &prompt.main_text, vp);
    if !prompt.sub_text.trim().is_empty() {
        menu::sub_text_box(
            &mut canvas,
            main.bottom() + theme::PAD,
            vp,
            SubText {
                base_text: &prompt.sub_text,
                base_portrait: prompt.portrait.as_deref(),
                focus_text: None,
                focus_portrait: None,
                candidates: Vec::new(),
                any_portrait: prompt.portrait.is_some(),
            },
        );
    }

    let field = field_rect(vp);
    canvas.scene.push(Node::Field { rect: field });

    let send = Rect::centered_on(
        Point::new(vp.w / 2, field.bottom() + theme::BUTTON_H / 2),
        Size::new(theme::SEND_W, theme::BUTTON_H),
    );
    canvas.button(send, SEND, Action::SubmitEntry);
    canvas.finish()
}

pub fn field_rect(viewport: Size) -> Rect {
    let w = theme::ENTRY_FIELD.w.min(viewport.w - 2 * theme::PAD);
    Rect::new((viewport.w - w) / 2, viewport.h - theme::ENTRY_BOTTOM_MARGIN, w, theme::ENTRY_FIELD.h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::snapshot::ScreenState;

    fn entry() -> (Snapshot, Prompt) {
        let prompt = Prompt {
            main_text: "What is your name?".into(),
            sub_text: "Speak clearly.".into(),
            ..Prompt::default()
        };
        (Snapshot { background: None, state: ScreenState::TextEntry(prompt.clone()) }, prompt)
    }

    #[test]
    fn field_and_send_sit_near_the_bottom() {
        let (snap, prompt) = entry();
        let vp = Size::new(100, 30);
        let built = render(&snap, &prompt, &RenderContext::new(vp));
        let field = built.scene.nodes.iter().find_map(|n| match n {
            Node::Field { rect } => Some(*rect),
            _ => None,
        });
        assert_eq!(field, Some(Rect::new(20, 23, 60, 3)));
        let send = &built.registry.buttons;
        assert_eq!(send.len(), 1);
        assert_eq!(send[0].action, Action::SubmitEntry);
        assert_eq!(send[0].bounds.y, 26);
        assert!(send[0].bounds.bottom() <= 30);
        assert!(built.scene.has_text("Speak clearly."));
    }

    #[test]
    fn narrow_terminal_shrinks_the_field() {
        let r = field_rect(Size::new(40, 20));
        assert_eq!(r.w, 38);
        assert_eq!(r.x, 1);
    }
}
