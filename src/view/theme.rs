/// Static sizing constants, in terminal cells.
///
/// A terminal cell is roughly twice as tall as it is wide, so vertical
/// distances are about half of the horizontal ones for the same look.

use crate::view::geometry::Size;

pub const PAD: i32 = 1;

// ── Portraits ──

pub const PORTRAIT: Size = Size::new(12, 6);
pub const BOSS_PORTRAIT: Size = Size::new(16, 8);

// ── Battle boxes ──

pub const PLAYER_BOX: Size = Size::new(36, 9);
pub const ENEMY_BOX: Size = Size::new(16, 10);
pub const BOSS_BOX: Size = Size::new(22, 13);
/// Horizontal gap between boxes in a party row.
pub const PARTY_SPACING: i32 = 2;
pub const ENEMY_ROW_Y: i32 = 3;
pub const BACK_W: i32 = 10;
/// Rows between the player row and the bottom of the viewport. Target
/// selection keeps room for the Back button underneath.
pub const BATTLE_ROW_MARGIN: i32 = 1;
pub const TARGET_ROW_MARGIN: i32 = 5;
pub const MIN_PLAYER_BOX_W: i32 = 22;
pub const MIN_ENEMY_BOX_W: i32 = 10;
pub const ACTION_COL_SPACING: i32 = 1;
pub const ACTION_ROW_SPACING: i32 = 0;

// ── Buttons and menus ──

/// One label line plus top and bottom border.
pub const BUTTON_H: i32 = 3;
pub const MENU_COL_SPACING: i32 = 4;
pub const MENU_ROW_SPACING: i32 = 0;
pub const MENU_BOTTOM_MARGIN: i32 = 1;
pub const MENU_BUTTON_MAX_W: i32 = 32;
pub const BATTLE_MENU_BUTTON_MAX_W: i32 = 12;
pub const MIN_BUTTON_W: i32 = 6;

// ── Text boxes ──

pub const SUB_TEXT_MIN_H: i32 = 5;
/// Extra rows added to measured text to form a box.
pub const TEXT_BOX_PADDING: i32 = 3;

// ── Travel ──

pub const COMPASS_RADIUS: i32 = 8;
pub const COMPASS_DROP: i32 = 3;
pub const COMPASS_BUTTON_W: i32 = 16;
pub const CENTER_BUTTON_W: i32 = 18;
pub const CORNER_BUTTON_W: i32 = 16;
pub const CORNER_INSET_X: i32 = 14;
pub const LOCATOR_CELL: Size = Size::new(3, 1);

// ── Conversation ──

pub const CONVERSATION_BUTTON_W: i32 = 16;
pub const CONVERSATION_MAX_OPTIONS: usize = 4;

// ── Messages ──

pub const MESSAGE_SIDE_MARGIN: i32 = 12;
pub const MESSAGE_MIN_H: i32 = 8;
pub const MESSAGE_MIN_H_PORTRAIT: i32 = 12;
pub const MESSAGE_MINI: Size = Size::new(40, 7);
pub const CONTINUE_W: i32 = 14;
pub const SHEET_MARGIN: Size = Size::new(12, 4);

// ── Title / text entry ──

pub const TITLE_MIN_W: i32 = 40;
pub const TITLE_PADDING: i32 = 6;
pub const ENTRY_FIELD: Size = Size::new(60, 3);
pub const SEND_W: i32 = 10;
pub const ENTRY_BOTTOM_MARGIN: i32 = 7;
