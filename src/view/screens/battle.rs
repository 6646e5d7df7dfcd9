/// Battle and target-selection screens.
///
/// Enemies sit in a centered row near the top, the player party in a
/// centered row near the bottom. On `battle` the active character's box
/// grows to hold its action grid. On `battle_target` every character box
/// is interactive (players first, then enemies) and a pointer-only Back
/// button sits underneath.

use crate::domain::character::{Character, Stats};
use crate::domain::snapshot::{BattleState, ScreenKind, Snapshot};
use crate::view::geometry::{Point, Rect, Size};
use crate::view::layout::GridSpec;
use crate::view::registry::{Action, ElementRef};
use crate::view::scene::{Label, Node, Tone, Weight};
use crate::view::screens::{menu, Built, Canvas, RenderContext};
use crate::view::text;
use crate::view::theme;

/// Label of the button that leaves target selection.
pub const BACK: &str = "Back";

pub fn render(snapshot: &Snapshot, battle: &BattleState, ctx: &RenderContext) -> Built {
    let mut canvas = Canvas::new(snapshot);
    let vp = ctx.viewport;
    let targeting = canvas.kind == ScreenKind::BattleTarget;

    let enemy_y = if battle.main_text.is_empty() {
        theme::PAD
    } else {
        let bar = Rect::new(theme::PAD, 0, vp.w - 2 * theme::PAD, 3);
        canvas.text_box(bar, &battle.main_text);
        theme::ENEMY_ROW_Y
    };

    let active = if targeting { None } else { battle.active_player() };
    let actions = active.map(|_| ActionGrid::new(&battle.choices.options, ctx));

    // Player row: widths shrink to fit, the active box grows downward.
    let player_w = fit_width(theme::PLAYER_BOX.w, battle.players.len(), vp.w, theme::MIN_PLAYER_BOX_W);
    let player_sizes: Vec<Size> = battle
        .players
        .iter()
        .enumerate()
        .map(|(i, _)| {
            let extra = match (&actions, active) {
                (Some(grid), Some(a)) if a == i => grid.size(player_w).h,
                _ => 0,
            };
            Size::new(player_w, theme::PLAYER_BOX.h + extra)
        })
        .collect();
    let row_h = player_sizes.iter().map(|s| s.h).max().unwrap_or(0);
    let margin = if targeting { theme::TARGET_ROW_MARGIN } else { theme::BATTLE_ROW_MARGIN };
    let player_y = vp.h - row_h - margin;

    let player_rects = row_rects(&player_sizes, player_y, vp.w);
    for (character, rect) in battle.players.iter().zip(&player_rects) {
        let element = targeting.then(|| {
            canvas
                .registry
                .add_character_box(*rect, character.is_dead(), Action::Choose(character.name.clone()))
        });
        player_box(&mut canvas, character, *rect, element);
    }

    let enemy_sizes = enemy_sizes(&battle.enemies, vp.w);
    let enemy_rects = row_rects(&enemy_sizes, enemy_y, vp.w);
    for (character, rect) in battle.enemies.iter().zip(&enemy_rects) {
        let element = targeting.then(|| {
            canvas
                .registry
                .add_character_box(*rect, character.is_dead(), Action::Choose(character.name.clone()))
        });
        enemy_box(&mut canvas, character, *rect, element);
    }

    match (actions, active) {
        (Some(grid), Some(a)) => grid.place(&mut canvas, &battle.choices.options, player_rects[a]),
        _ if !targeting => menu::menu_grid(&mut canvas, &battle.choices.options, vp),
        _ => {}
    }

    if targeting {
        let rect = Rect::centered_on(
            Point::new(vp.w / 2, vp.h - theme::TARGET_ROW_MARGIN / 2 - 1),
            Size::new(theme::BACK_W, theme::BUTTON_H),
        );
        canvas.button(rect, BACK, Action::Cancel);
    }

    canvas.finish()
}

/// Box width for `count` boxes of `preferred` width in a row of `viewport_w`.
fn fit_width(preferred: i32, count: usize, viewport_w: i32, min: i32) -> i32 {
    if count == 0 {
        return preferred;
    }
    let n = count as i32;
    let avail = viewport_w - 2 * theme::PAD - (n - 1) * theme::PARTY_SPACING;
    preferred.min(avail / n).max(min)
}

fn enemy_sizes(enemies: &[Character], viewport_w: i32) -> Vec<Size> {
    let natural: Vec<Size> = enemies
        .iter()
        .map(|e| if e.is_boss() { theme::BOSS_BOX } else { theme::ENEMY_BOX })
        .collect();
    let n = natural.len() as i32;
    let total: i32 = natural.iter().map(|s| s.w).sum::<i32>() + (n - 1).max(0) * theme::PARTY_SPACING;
    let avail = viewport_w - 2 * theme::PAD - (n - 1).max(0) * theme::PARTY_SPACING;
    let content = total - (n - 1).max(0) * theme::PARTY_SPACING;
    if total <= viewport_w - 2 * theme::PAD || content <= 0 {
        return natural;
    }
    natural
        .into_iter()
        .map(|s| Size::new((s.w * avail / content).max(theme::MIN_ENEMY_BOX_W), s.h))
        .collect()
}

/// Lay boxes left to right, centered as a group, tops aligned at `y`.
fn row_rects(sizes: &[Size], y: i32, viewport_w: i32) -> Vec<Rect> {
    let n = sizes.len() as i32;
    let total: i32 = sizes.iter().map(|s| s.w).sum::<i32>() + (n - 1).max(0) * theme::PARTY_SPACING;
    let mut x = (viewport_w - total) / 2;
    sizes
        .iter()
        .map(|s| {
            let r = Rect::new(x, y, s.w, s.h);
            x += s.w + theme::PARTY_SPACING;
            r
        })
        .collect()
}

fn border_tone(character: &Character) -> Tone {
    if character.is_dead() {
        Tone::Dead
    } else if character.active_turn {
        Tone::ActiveTurn
    } else {
        Tone::Normal
    }
}

fn text_tone(character: &Character) -> Tone {
    if character.is_dead() { Tone::Dead } else { Tone::Normal }
}

fn player_box(canvas: &mut Canvas, c: &Character, rect: Rect, element: Option<ElementRef>) {
    let dead = c.is_dead();
    canvas.scene.push(Node::Panel { rect, border: border_tone(c), element });

    let portrait_w = theme::PORTRAIT.w.min(rect.w / 3);
    let portrait = Rect::new(rect.x + theme::PAD, rect.y + theme::PAD, portrait_w, theme::PORTRAIT.h);
    canvas.portrait(portrait, Some(c.portrait.as_str()).filter(|p| !p.is_empty()), dead, false);

    let text_x = portrait.right() + theme::PAD;
    let text_w = (rect.right() - theme::PAD - text_x - theme::PAD).max(4);
    let tone = text_tone(c);

    canvas.text(
        Label::new(Rect::new(text_x, rect.y + 1, text_w, 1), text::truncate(&c.name, text_w as usize))
            .tone(tone)
            .weight(Weight::Bold),
    );

    let s = &c.stats;
    let bars = [
        ("HP", s.hp, s.max_hp, Tone::Hp),
        ("MP", s.mp, s.max_mp, if dead { Tone::BarEmpty } else { Tone::Mp }),
        ("SP", s.sp, s.max_sp, if dead { Tone::BarEmpty } else { Tone::Sp }),
    ];
    for (i, (label, value, max, bar_tone)) in bars.into_iter().enumerate() {
        let y = rect.y + 2 + 2 * i as i32;
        canvas.text(Label::new(Rect::new(text_x, y, text_w, 1), format!("{label}: {value} / {max}")).tone(tone));
        canvas.scene.push(Node::Bar {
            rect: Rect::new(text_x, y + 1, text_w, 1),
            ratio: Stats::ratio(value, max),
            tone: bar_tone,
        });
    }
}

fn enemy_box(canvas: &mut Canvas, c: &Character, rect: Rect, element: Option<ElementRef>) {
    canvas.scene.push(Node::Panel { rect, border: border_tone(c), element });

    let size = if c.is_boss() { theme::BOSS_PORTRAIT } else { theme::PORTRAIT };
    let pw = size.w.min(rect.w - 2 * theme::PAD);
    let portrait = Rect::new(rect.x + (rect.w - pw) / 2, rect.y + theme::PAD, pw, size.h);
    canvas.portrait(portrait, Some(c.portrait.as_str()).filter(|p| !p.is_empty()), c.is_dead(), false);

    let name_top = portrait.bottom();
    let name = Rect::new(rect.x + theme::PAD, name_top, rect.w - 2 * theme::PAD, rect.bottom() - 1 - name_top);
    let weight = if c.is_boss() { Weight::Bold } else { Weight::Regular };
    canvas.text(Label::new(name, c.name.as_str()).tone(text_tone(c)).weight(weight).centered());
}

/// Action buttons inside the active character's box.
struct ActionGrid {
    columns: usize,
    rows: usize,
    count: usize,
}

impl ActionGrid {
    fn new(options: &[String], ctx: &RenderContext) -> Self {
        let columns = ctx.battle.menu_columns.max(1);
        let rows = ctx.battle.menu_rows.max(options.len().div_ceil(columns)).max(1);
        ActionGrid { columns, rows, count: options.len() }
    }

    fn button_w(&self, box_w: i32) -> i32 {
        let cols = self.columns as i32;
        ((box_w - 2 * theme::PAD - (cols - 1) * theme::ACTION_COL_SPACING) / cols).max(3)
    }

    fn spec(&self, box_w: i32) -> GridSpec {
        GridSpec {
            count: self.count,
            columns: self.columns,
            cell: Size::new(self.button_w(box_w), theme::BUTTON_H),
            col_spacing: theme::ACTION_COL_SPACING,
            row_spacing: theme::ACTION_ROW_SPACING,
        }
    }

    /// Extra height the box needs. Reserves `rows` rows even when fewer are used.
    fn size(&self, box_w: i32) -> Size {
        let w = self.button_w(box_w);
        let rows = self.rows as i32;
        let cols = self.columns as i32;
        Size::new(
            cols * w + (cols - 1) * theme::ACTION_COL_SPACING,
            rows * theme::BUTTON_H + (rows - 1) * theme::ACTION_ROW_SPACING,
        )
    }

    fn place(self, canvas: &mut Canvas, options: &[String], active_box: Rect) {
        let spec = self.spec(active_box.w);
        let size = spec.size();
        let origin = Point::new(
            active_box.x + (active_box.w - size.w) / 2,
            active_box.y + theme::PLAYER_BOX.h - 1,
        );
        for (rect, option) in spec.cells_from(origin).into_iter().zip(options) {
            canvas.button(rect, option, Action::Choose(option.clone()));
        }
    }
}
