/// Travel screen: compass of movement buttons around an optional center
/// action, two corner buttons, and a 3x3 locator in the top-right corner.

use crate::domain::snapshot::{Direction, Snapshot, TravelState};
use crate::view::geometry::{Point, Rect, Size};
use crate::view::layout::{self, CompassSlot, CompassSource};
use crate::view::registry::Action;
use crate::view::scene::{Node, Tone};
use crate::view::screens::menu::{self, SubText};
use crate::view::screens::{button_height, main_text_box, Built, Canvas, RenderContext};
use crate::view::theme;

pub const SAVE_AND_EXIT: &str = "Save and Exit";
pub const PARTY_MENU: &str = "Party Menu";

pub fn render(snapshot: &Snapshot, travel: &TravelState, ctx: &RenderContext) -> Built {
    let mut canvas = Canvas::new(snapshot);
    let vp = ctx.viewport;
    let prompt = &travel.prompt;
    let options = &prompt.choices.options;
    let slots = layout::assign_compass(options);

    // Compass buttons come first in the registry, so focus maps straight to a slot.
    let hovered = ctx.focus.and_then(|i| slots.get(i)).map(|s| s.option);
    let candidates = slots.iter().filter_map(|s| prompt.choices.detail(s.option)).collect();

    let main = main_text_box(&mut canvas, &prompt.main_text, vp);
    let sub = menu::sub_text_box(
        &mut canvas,
        main.bottom() + theme::PAD,
        vp,
        SubText {
            base_text: &prompt.sub_text,
            base_portrait: prompt.portrait.as_deref(),
            focus_text: hovered.and_then(|i| prompt.choices.detail(i)),
            focus_portrait: None,
            candidates,
            any_portrait: prompt.portrait.is_some(),
        },
    );

    if let Some(position) = travel.position {
        locator(&mut canvas, position, vp);
    }

    let corner_h = theme::BUTTON_H;
    let corner_y = vp.h - corner_h - theme::MENU_BOTTOM_MARGIN;
    // Center the compass in the space between the sub box and the corner row.
    let free_mid = (sub.bottom() + corner_y) / 2;
    let center = Point::new(vp.w / 2, free_mid.max(vp.h / 2) + theme::COMPASS_DROP);

    for slot in &slots {
        let label = compass_label(travel, slot, &options[slot.option]);
        let size = Size::new(theme::COMPASS_BUTTON_W, button_height(&label, theme::COMPASS_BUTTON_W));
        let offset = layout::compass_offset(slot.direction, theme::COMPASS_RADIUS);
        let rect = Rect::centered_on(Point::new(center.x + offset.x, center.y + offset.y), size);
        canvas.button(rect, &label, Action::Choose(options[slot.option].clone()));
    }

    if let Some(option) = center_option(options) {
        let size = Size::new(theme::CENTER_BUTTON_W, button_height(option, theme::CENTER_BUTTON_W));
        canvas.button(Rect::centered_on(center, size), option, Action::Choose(option.clone()));
    }

    if options.iter().any(|o| o == SAVE_AND_EXIT) {
        let rect = Rect::new(vp.w - theme::CORNER_INSET_X - theme::CORNER_BUTTON_W / 2, corner_y, theme::CORNER_BUTTON_W, corner_h);
        canvas.button(rect, SAVE_AND_EXIT, Action::Choose(SAVE_AND_EXIT.to_string()));
    }
    if options.iter().any(|o| o == PARTY_MENU) {
        let rect = Rect::new(theme::CORNER_INSET_X - theme::CORNER_BUTTON_W / 2, corner_y, theme::CORNER_BUTTON_W, corner_h);
        canvas.button(rect, PARTY_MENU, Action::Choose(PARTY_MENU.to_string()));
    }

    canvas.finish()
}

/// Arrow on the first line, then what lies in that direction.
fn compass_label(travel: &TravelState, slot: &CompassSlot, option: &str) -> String {
    let arrow = slot.direction.arrow();
    let text = match slot.source {
        CompassSource::Literal => travel
            .movement_text
            .get(&slot.direction)
            .map(String::as_str)
            .unwrap_or(option),
        CompassSource::TravelTo => option,
    };
    format!("{arrow}\n{text}")
}

/// The first option that is neither a compass move nor a corner button.
fn center_option(options: &[String]) -> Option<&String> {
    options.iter().find(|o| {
        Direction::from_label(o).is_none()
            && !layout::is_travel_to(o)
            && o.as_str() != SAVE_AND_EXIT
            && o.as_str() != PARTY_MENU
    })
}

fn locator(canvas: &mut Canvas, (row, col): (usize, usize), viewport: Size) {
    let cell = theme::LOCATOR_CELL;
    let inner = Size::new(3 * cell.w + 2, 3 * cell.h);
    let frame = Rect::new(viewport.w - inner.w - 2 - theme::PAD, 0, inner.w + 2, inner.h + 2);
    canvas.panel(frame, Tone::Muted);
    for r in 0..3 {
        for c in 0..3 {
            let rect = Rect::new(
                frame.x + 1 + c as i32 * (cell.w + 1),
                frame.y + 1 + r as i32 * cell.h,
                cell.w,
                cell.h,
            );
            canvas.scene.push(Node::Marker { rect, filled: (r, c) == (row, col) });
        }
    }
}
