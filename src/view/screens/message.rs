/// Message family overlays.
///
/// Every variant ends with a single pre-selected "Continue" button at the
/// bottom of the screen. The overlays differ only in what sits inside:
///   - `message` / `dialogue`: main text, then portrait with sub text
///   - `message_mini`: a small fixed box with the main text
///   - `battle_message`: sub text between two portraits
///   - `stats_message`: a character sheet

use crate::domain::character::Character;
use crate::domain::snapshot::{BattleMessageState, MessageStyle, Prompt, Snapshot};
use crate::view::geometry::{Point, Rect, Size};
use crate::view::layout;
use crate::view::registry::Action;
use crate::view::scene::{Label, Tone, Weight};
use crate::view::screens::{Built, Canvas, RenderContext};
use crate::view::text;
use crate::view::theme;

pub const CONTINUE: &str = "Continue";

pub fn render(snapshot: &Snapshot, style: MessageStyle, prompt: &Prompt, ctx: &RenderContext) -> Built {
    let mut canvas = Canvas::new(snapshot);
    let vp = ctx.viewport;

    match style {
        MessageStyle::Mini => {
            let size = Size::new(theme::MESSAGE_MINI.w.min(vp.w), theme::MESSAGE_MINI.h.min(vp.h));
            let overlay = overlay(&mut canvas, vp, size);
            let inner = overlay.inset(theme::PAD);
            let rect = Rect::new(inner.x + theme::PAD, inner.y, inner.w - 2 * theme::PAD, inner.h);
            canvas.text(Label::new(rect, prompt.main_text.as_str()).centered());
        }
        MessageStyle::Standard | MessageStyle::Dialogue => {
            let portrait = prompt.portrait.as_deref();
            let width = (vp.w - 2 * theme::MESSAGE_SIDE_MARGIN).max(theme::MESSAGE_MINI.w).min(vp.w);
            let min_h = if portrait.is_some() { theme::MESSAGE_MIN_H_PORTRAIT } else { theme::MESSAGE_MIN_H };

            let main_wrap = (width - 4 * theme::PAD).max(1) as usize;
            let main_h = text::measure(&prompt.main_text, main_wrap).h;
            let sizing = layout::text_frame(Rect::new(0, 0, width, 0), portrait.map(|_| theme::PORTRAIT));
            let sub_h = text::measure(&prompt.sub_text, sizing.wrap).h;
            let body_h = portrait.map_or(sub_h, |_| sub_h.max(theme::PORTRAIT.h));
            let gap = if main_h > 0 && body_h > 0 { theme::PAD } else { 0 };
            let height = min_h.max(main_h + gap + body_h + 2 * theme::PAD).min(continue_top(vp) - theme::PAD);

            let bounds = overlay(&mut canvas, vp, Size::new(width, height));
            let inner_x = bounds.x + 2 * theme::PAD;
            canvas.text(
                Label::new(Rect::new(inner_x, bounds.y + theme::PAD, main_wrap as i32, main_h), prompt.main_text.as_str())
                    .weight(Weight::Bold),
            );

            let body = Rect::new(bounds.x, bounds.y + theme::PAD + main_h + gap - theme::PAD, bounds.w, body_h + 2 * theme::PAD);
            let frame = layout::text_frame(body, portrait.map(|_| theme::PORTRAIT));
            if let Some(url) = portrait {
                let rect = Rect::new(inner_x, body.y + theme::PAD, theme::PORTRAIT.w, theme::PORTRAIT.h);
                canvas.portrait(rect, Some(url), false, false);
            }
            let weight = if style == MessageStyle::Dialogue { Weight::Italic } else { Weight::Regular };
            canvas.text(Label::new(frame.rect(body_h), prompt.sub_text.as_str()).weight(weight));
        }
    }

    continue_button(&mut canvas, vp);
    canvas.finish()
}

pub fn render_battle(snapshot: &Snapshot, message: &BattleMessageState, ctx: &RenderContext) -> Built {
    let mut canvas = Canvas::new(snapshot);
    let vp = ctx.viewport;
    let width = (vp.w - 2 * theme::MESSAGE_SIDE_MARGIN).max(theme::MESSAGE_MINI.w).min(vp.w);

    let left = message.portrait.as_deref();
    let right = message.second_portrait();
    let portraits = left.is_some() as i32 + right.is_some() as i32;

    let main_wrap = (width - 4 * theme::PAD).max(1) as usize;
    let main_h = text::measure(&message.main_text, main_wrap).h;
    let sub_w = (width - 4 * theme::PAD - portraits * (theme::PORTRAIT.w + theme::PAD)).max(1);
    let sub_h = text::measure(&message.sub_text, sub_w as usize).h;
    let body_h = if portraits > 0 { sub_h.max(theme::PORTRAIT.h) } else { sub_h };
    let min_h = if portraits > 0 { theme::MESSAGE_MIN_H_PORTRAIT } else { theme::MESSAGE_MIN_H };
    let height = min_h.max(main_h + theme::PAD + body_h + 2 * theme::PAD).min(continue_top(vp) - theme::PAD);

    let bounds = overlay(&mut canvas, vp, Size::new(width, height));
    canvas.text(
        Label::new(Rect::new(bounds.x + 2 * theme::PAD, bounds.y + theme::PAD, main_wrap as i32, main_h), message.main_text.as_str())
            .weight(Weight::Bold),
    );

    let body_y = bounds.y + theme::PAD + main_h + theme::PAD;
    let mut sub_x = bounds.x + 2 * theme::PAD;
    if let Some(url) = left {
        canvas.portrait(Rect::new(sub_x, body_y, theme::PORTRAIT.w, theme::PORTRAIT.h), Some(url), false, false);
        sub_x += theme::PORTRAIT.w + theme::PAD;
    }
    if let Some(url) = right {
        let x = bounds.right() - 2 * theme::PAD - theme::PORTRAIT.w;
        canvas.portrait(Rect::new(x, body_y, theme::PORTRAIT.w, theme::PORTRAIT.h), Some(url), false, true);
    }
    canvas.text(Label::new(Rect::new(sub_x, body_y, sub_w, body_h), message.sub_text.as_str()));

    continue_button(&mut canvas, vp);
    canvas.finish()
}

pub fn render_stats(snapshot: &Snapshot, character: &Character, ctx: &RenderContext) -> Built {
    let mut canvas = Canvas::new(snapshot);
    let vp = ctx.viewport;
    let size = Size::new(
        (vp.w - 2 * theme::SHEET_MARGIN.w).max(theme::MESSAGE_MINI.w),
        (continue_top(vp) - 2 * theme::SHEET_MARGIN.h).max(theme::MESSAGE_MINI.h),
    );
    let sheet = overlay(&mut canvas, vp, size);
    let inner = Rect::new(sheet.x + 2 * theme::PAD, sheet.y + theme::PAD, sheet.w - 4 * theme::PAD, sheet.h - 2 * theme::PAD);

    canvas.text(
        Label::new(Rect::new(inner.x, inner.y, inner.w, 1), character.name.as_str())
            .tone(Tone::Title)
            .weight(Weight::Bold)
            .centered(),
    );

    let top = inner.y + 2;
    let portrait = Rect::new(inner.x, top, theme::PORTRAIT.w, theme::PORTRAIT.h);
    let url = Some(character.portrait.as_str()).filter(|p| !p.is_empty());
    canvas.portrait(portrait, url, character.is_dead(), false);

    let info_x = portrait.right() + 2 * theme::PAD;
    let info_w = (inner.right() - info_x).max(1);
    let mut y = top;
    let class_line = format!("Level {} {}", character.level, character.job_class);
    canvas.text(Label::new(Rect::new(info_x, y, info_w, 1), class_line).weight(Weight::Bold));
    y += 1;
    if !character.description.is_empty() {
        let h = text::measure(&character.description, info_w as usize).h;
        canvas.text(Label::new(Rect::new(info_x, y, info_w, h), character.description.as_str()).tone(Tone::Muted));
        y += h;
    }
    if let Some(exp) = character.experience {
        let line = match character.exp_goal {
            Some(goal) => format!("EXP: {exp}/{goal}"),
            None => format!("EXP: {exp}"),
        };
        canvas.text(Label::new(Rect::new(info_x, y, info_w, 1), line));
        y += 1;
    }

    let s = &character.stats;
    let mut entries = vec![format!("HP: {}/{}", s.hp, s.max_hp), format!("MP: {}/{}", s.mp, s.max_mp)];
    entries.extend(s.attributes().into_iter().map(|(name, value)| format!("{name}: {value}")));

    let list_top = y.max(portrait.bottom()) + theme::PAD;
    let col_w = inner.w / 2;
    for (i, entry) in entries.into_iter().enumerate() {
        let col = (i % 2) as i32;
        let row = (i / 2) as i32;
        let rect = Rect::new(inner.x + col * col_w, list_top + row, col_w - theme::PAD, 1);
        canvas.text(Label::new(rect, entry));
    }

    continue_button(&mut canvas, vp);
    canvas.finish()
}

/// Top row of the Continue button.
fn continue_top(viewport: Size) -> i32 {
    viewport.h - theme::BUTTON_H - theme::MENU_BOTTOM_MARGIN
}

/// Centered overlay panel, clear of the Continue row.
fn overlay(canvas: &mut Canvas, viewport: Size, size: Size) -> Rect {
    let center = Point::new(viewport.w / 2, continue_top(viewport) / 2);
    let mut rect = Rect::centered_on(center, size);
    rect.y = rect.y.max(0);
    canvas.panel(rect, Tone::Accent);
    rect
}

fn continue_button(canvas: &mut Canvas, viewport: Size) {
    let rect = Rect::new(
        (viewport.w - theme::CONTINUE_W) / 2,
        continue_top(viewport),
        theme::CONTINUE_W,
        theme::BUTTON_H,
    );
    canvas.button(rect, CONTINUE, Action::Choose(CONTINUE.to_string()));
    canvas.initial_selection = Some(0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::character::Stats;
    use crate::domain::snapshot::ScreenState;
    use crate::view::scene::Node;

    fn prompt(main: &str, sub: &str, portrait: Option<&str>) -> Prompt {
        Prompt {
            main_text: main.into(),
            sub_text: sub.into(),
            portrait: portrait.map(str::to_string),
            ..Prompt::default()
        }
    }

    fn message(style: MessageStyle, p: &Prompt, vp: Size) -> Built {
        let snap = Snapshot { background: None, state: ScreenState::Message { style, prompt: p.clone() } };
        render(&snap, style, p, &RenderContext::new(vp))
    }

    fn overlay_rect(built: &Built) -> Rect {
        built
            .scene
            .nodes
            .iter()
            .find_map(|n| match n {
                Node::Panel { rect, border: Tone::Accent, .. } => Some(*rect),
                _ => None,
            })
            .unwrap()
    }

    // ── Continue ──

    #[test]
    fn every_variant_preselects_continue() {
        let vp = Size::new(100, 30);
        let p = prompt("You found a key.", "It is rusty.", None);
        for style in [MessageStyle::Standard, MessageStyle::Mini, MessageStyle::Dialogue] {
            let built = message(style, &p, vp);
            assert_eq!(built.registry.buttons.len(), 1);
            assert_eq!(built.initial_selection, Some(0));
            assert_eq!(built.registry.buttons[0].action, Action::Choose(CONTINUE.into()));
        }
    }

    // ── Overlay sizing ──

    #[test]
    fn message_overlay_spans_the_middle() {
        let built = message(MessageStyle::Standard, &prompt("Hello", "", None), Size::new(100, 30));
        let r = overlay_rect(&built);
        assert_eq!(r.w, 100 - 2 * theme::MESSAGE_SIDE_MARGIN);
        assert_eq!(r.h, theme::MESSAGE_MIN_H);
        assert_eq!(r.x, theme::MESSAGE_SIDE_MARGIN);
    }

    #[test]
    fn portrait_raises_the_minimum_height() {
        let built = message(MessageStyle::Standard, &prompt("Hello", "Hi", Some("sage.png")), Size::new(100, 30));
        assert_eq!(overlay_rect(&built).h, theme::MESSAGE_MIN_H_PORTRAIT);
        let (rect, url, _, _) = built.scene.portraits().next().unwrap();
        assert_eq!(url, Some("sage.png"));
        // Sub text starts to the right of the portrait.
        let sub = built.scene.labels().find(|l| l.content == "Hi").unwrap();
        assert!(sub.rect.x >= rect.right());
    }

    #[test]
    fn mini_is_a_fixed_box() {
        let built = message(MessageStyle::Mini, &prompt("Saved.", "ignored", None), Size::new(100, 30));
        assert_eq!(overlay_rect(&built).size(), theme::MESSAGE_MINI);
        assert!(!built.scene.has_text("ignored"));
    }

    #[test]
    fn dialogue_sub_text_is_italic() {
        let built = message(MessageStyle::Dialogue, &prompt("Elder", "Welcome back.", None), Size::new(100, 30));
        let sub = built.scene.labels().find(|l| l.content == "Welcome back.").unwrap();
        assert_eq!(sub.weight, Weight::Italic);
    }

    // ── Battle message ──

    fn battle_message(left: Option<&str>, right: Option<&str>) -> Built {
        let m = BattleMessageState {
            main_text: "Critical hit!".into(),
            sub_text: "The slime is defeated.".into(),
            portrait: left.map(str::to_string),
            npc_portrait: right.map(str::to_string),
        };
        let snap = Snapshot { background: None, state: ScreenState::BattleMessage(m.clone()) };
        render_battle(&snap, &m, &RenderContext::new(Size::new(100, 30)))
    }

    #[test]
    fn battle_message_shows_both_portraits() {
        let built = battle_message(Some("hero.png"), Some("slime.png"));
        let urls: Vec<_> = built.scene.portraits().map(|(_, u, _, _)| u).collect();
        assert_eq!(urls, vec![Some("hero.png"), Some("slime.png")]);
        assert_eq!(built.initial_selection, Some(0));
    }

    #[test]
    fn identical_portrait_is_shown_once() {
        let built = battle_message(Some("hero.png"), Some("hero.png"));
        assert_eq!(built.scene.portraits().count(), 1);
    }

    // ── Stats sheet ──

    #[test]
    fn stats_sheet_lists_level_exp_and_attributes() {
        let c = Character {
            name: "Ayla".into(),
            level: 7,
            job_class: "Knight".into(),
            description: "A wandering knight.".into(),
            experience: Some(120),
            exp_goal: Some(200),
            stats: Stats { hp: 40, max_hp: 50, mp: 3, max_mp: 9, attack: 12, luck: 4, ..Stats::default() },
            ..Character::default()
        };
        let snap = Snapshot { background: None, state: ScreenState::StatsMessage(c.clone()) };
        let built = render_stats(&snap, &c, &RenderContext::new(Size::new(100, 36)));
        for line in ["Ayla", "Level 7 Knight", "A wandering knight.", "EXP: 120/200", "HP: 40/50", "MP: 3/9"] {
            assert!(built.scene.has_text(line), "missing {line}");
        }
        assert!(built.scene.labels().any(|l| l.content.ends_with(": 12")));
        assert!(!built.scene.labels().any(|l| l.content.starts_with("SP")));
        assert_eq!(built.initial_selection, Some(0));
    }

    #[test]
    fn stats_sheet_without_exp() {
        let c = Character { name: "Brom".into(), level: 1, job_class: "Monk".into(), ..Character::default() };
        let snap = Snapshot { background: None, state: ScreenState::StatsMessage(c.clone()) };
        let built = render_stats(&snap, &c, &RenderContext::new(Size::new(100, 36)));
        assert!(!built.scene.labels().any(|l| l.content.starts_with("EXP")));
    }
}
