/// Default renderer: main text, optional sub-text box, bottom menu grid.
///
/// Used for `menu` and for any screen kind the client does not know.
/// Hovering a menu option swaps the sub-text for that option's detail and
/// the portrait for that option's portrait; the box is sized for the
/// tallest of all of them so nothing moves.

use crate::domain::snapshot::{Prompt, ScreenKind, Snapshot};
use crate::view::geometry::{Rect, Size};
use crate::view::layout::{self, GridSpec};
use crate::view::registry::Action;
use crate::view::scene::{Label, Tone};
use crate::view::screens::{button_height, main_text_box, Built, Canvas, RenderContext};
use crate::view::theme;

pub fn render(snapshot: &Snapshot, prompt: &Prompt, ctx: &RenderContext) -> Built {
    let mut canvas = Canvas::new(snapshot);
    let vp = ctx.viewport;
    let main = main_text_box(&mut canvas, &prompt.main_text, vp);

    let is_menu = canvas.kind == ScreenKind::Menu;
    if is_menu || !prompt.sub_text.trim().is_empty() {
        let choices = &prompt.choices;
        let focus = if is_menu { ctx.focus.filter(|&i| i < choices.len()) } else { None };

        let mut candidates: Vec<&str> = choices.details.iter().map(String::as_str).collect();
        if is_menu {
            candidates.extend(choices.options.iter().map(String::as_str));
        }
        let base_portrait = if is_menu { prompt.portrait.as_deref() } else { None };

        sub_text_box(
            &mut canvas,
            main.bottom() + theme::PAD,
            vp,
            SubText {
                base_text: &prompt.sub_text,
                base_portrait,
                focus_text: focus.and_then(|i| choices.detail(i)),
                focus_portrait: focus.and_then(|i| choices.portrait(i)),
                candidates,
                any_portrait: base_portrait.is_some() || (is_menu && choices.has_portraits()),
            },
        );
    }

    menu_grid(&mut canvas, &prompt.choices.options, vp);
    canvas.finish()
}

/// Content of a sub-text box, base and hovered.
pub(crate) struct SubText<'a> {
    pub base_text: &'a str,
    pub base_portrait: Option<&'a str>,
    pub focus_text: Option<&'a str>,
    pub focus_portrait: Option<&'a str>,
    /// Every text that may replace the base on hover.
    pub candidates: Vec<&'a str>,
    pub any_portrait: bool,
}

/// Full-width sub-text box starting at row `top`. Returns its bounds.
pub(crate) fn sub_text_box(canvas: &mut Canvas, top: i32, viewport: Size, sub: SubText<'_>) -> Rect {
    let mut bounds = Rect::new(theme::PAD, top, viewport.w - 2 * theme::PAD, 0);

    let min_h = if sub.any_portrait {
        (theme::SUB_TEXT_MIN_H * 2).max(theme::PORTRAIT.h + 2 * theme::PAD)
    } else {
        theme::SUB_TEXT_MIN_H
    };
    let worst = layout::text_frame(bounds, sub.any_portrait.then_some(theme::PORTRAIT));
    let candidates = std::iter::once(sub.base_text).chain(sub.candidates.iter().copied());
    bounds.h = layout::autosize(min_h, candidates, worst.wrap, theme::TEXT_BOX_PADDING);

    canvas.panel(bounds, Tone::Normal);

    let shown = sub.focus_text.unwrap_or(sub.base_text);
    let portrait = sub.focus_portrait.or(sub.base_portrait);
    let frame = layout::text_frame(bounds, portrait.map(|_| theme::PORTRAIT));
    if let Some(url) = portrait {
        let rect = Rect::new(bounds.x + 2 * theme::PAD, bounds.y + theme::PAD, theme::PORTRAIT.w, theme::PORTRAIT.h);
        canvas.portrait(rect, Some(url), false, false);
    }
    canvas.text(Label::new(frame.rect(bounds.h - 2 * theme::PAD), shown));
    bounds
}

/// Bottom-anchored option grid. Every option becomes one button, in order.
pub(crate) fn menu_grid(canvas: &mut Canvas, options: &[String], viewport: Size) {
    if options.is_empty() {
        return;
    }
    let columns = layout::menu_columns(&canvas.kind, options.len());
    let width = layout::menu_button_width(&canvas.kind, viewport.w);
    let height = options.iter().map(|o| button_height(o, width)).max().unwrap_or(theme::BUTTON_H);
    let spec = GridSpec {
        count: options.len(),
        columns,
        cell: Size::new(width, height),
        col_spacing: theme::MENU_COL_SPACING,
        row_spacing: theme::MENU_ROW_SPACING,
    };
    for (rect, option) in layout::bottom_grid(&spec, viewport).into_iter().zip(options) {
        canvas.button(rect, option, Action::Choose(option.clone()));
    }
}
