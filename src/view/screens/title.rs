/// Title screen: one boxed headline slightly above center, with the menu
/// grid underneath when the server offers options.

use crate::domain::snapshot::{Prompt, Snapshot};
use crate::view::geometry::{Rect, Size};
use crate::view::scene::{Label, Tone, Weight};
use crate::view::screens::{menu, Built, Canvas, RenderContext};
use crate::view::text;
use crate::view::theme;

pub fn render(snapshot: &Snapshot, prompt: &Prompt, ctx: &RenderContext) -> Built {
    let mut canvas = Canvas::new(snapshot);
    let vp = ctx.viewport;

    let bounds = title_bounds(&prompt.main_text, vp);
    canvas.panel(bounds, Tone::Title);
    let inner = Rect::new(bounds.x + 1, bounds.y + 1 + theme::PAD, bounds.w - 2, bounds.h - 2 - 2 * theme::PAD);
    canvas.text(
        Label::new(inner, prompt.main_text.as_str())
            .tone(Tone::Title)
            .weight(Weight::Bold)
            .centered(),
    );

    menu::menu_grid(&mut canvas, &prompt.choices.options, vp);
    canvas.finish()
}

/// Width grows with the headline; the box sits a third of the way down
/// the free space.
fn title_bounds(headline: &str, viewport: Size) -> Rect {
    let max_w = viewport.w - 2 * theme::PAD;
    let w = theme::TITLE_MIN_W
        .max(text::natural_width(headline) as i32 + theme::TITLE_PADDING)
        .min(max_w);
    let lines = text::measure(headline, (w - 2).max(1) as usize).h.max(1);
    let h = lines + 2 + 2 * theme::PAD;
    Rect::new((viewport.w - w) / 2, ((viewport.h - h) / 3).max(0), w, h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::snapshot::{Choices, ScreenState};

    fn title(main: &str, options: &[&str]) -> (Snapshot, Prompt) {
        let prompt = Prompt {
            main_text: main.into(),
            choices: Choices { options: options.iter().map(|s| s.to_string()).collect(), ..Choices::default() },
            ..Prompt::default()
        };
        (Snapshot { background: None, state: ScreenState::Title(prompt.clone()) }, prompt)
    }

    #[test]
    fn short_title_uses_minimum_width() {
        let r = title_bounds("Dream", Size::new(100, 30));
        assert_eq!(r.w, theme::TITLE_MIN_W);
        assert_eq!(r.x, 30);
        assert_eq!(r.y, (30 - r.h) / 3);
    }

    #[test]
    fn long_title_grows_with_padding() {
        let headline = "The Long and Winding Road of Forgotten Dreams";
        let r = title_bounds(headline, Size::new(120, 30));
        assert_eq!(r.w, headline.len() as i32 + theme::TITLE_PADDING);
        assert_eq!(r.x, (120 - r.w) / 2);
    }

    #[test]
    fn title_options_become_buttons() {
        let (snap, prompt) = title("Dreamfront", &["New Game", "Load Game"]);
        let built = render(&snap, &prompt, &RenderContext::new(Size::new(100, 30)));
        assert_eq!(built.registry.buttons.len(), 2);
        assert!(built.scene.has_text("Dreamfront"));

        let (snap, prompt) = title("Dreamfront", &[]);
        let built = render(&snap, &prompt, &RenderContext::new(Size::new(100, 30)));
        assert!(built.registry.is_empty());
    }
}
