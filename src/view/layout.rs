/// Layout primitives shared by the screen renderers.
///
///   - Grid centering for button menus
///   - Compass slot assignment for travel
///   - Worst-case text box autosizing
///   - Text frames beside an optional portrait

use crate::domain::snapshot::{Direction, ScreenKind};
use crate::view::geometry::{Point, Rect, Size};
use crate::view::text;
use crate::view::theme;

// ── Grids ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct GridSpec {
    pub count: usize,
    pub columns: usize,
    pub cell: Size,
    pub col_spacing: i32,
    pub row_spacing: i32,
}

impl GridSpec {
    pub fn rows(&self) -> usize {
        let cols = self.columns.max(1);
        self.count.div_ceil(cols)
    }

    /// Total extent: `columns*w + (columns-1)*col_spacing` by the same for rows.
    pub fn size(&self) -> Size {
        let cols = self.columns.max(1) as i32;
        let rows = self.rows() as i32;
        if rows == 0 {
            return Size::new(0, 0);
        }
        Size::new(
            cols * self.cell.w + (cols - 1) * self.col_spacing,
            rows * self.cell.h + (rows - 1) * self.row_spacing,
        )
    }

    /// Cell rects in row-major order, starting at `origin`.
    pub fn cells_from(&self, origin: Point) -> Vec<Rect> {
        let cols = self.columns.max(1);
        (0..self.count)
            .map(|i| {
                let col = (i % cols) as i32;
                let row = (i / cols) as i32;
                Rect::new(
                    origin.x + col * (self.cell.w + self.col_spacing),
                    origin.y + row * (self.cell.h + self.row_spacing),
                    self.cell.w,
                    self.cell.h,
                )
            })
            .collect()
    }
}

/// Column rule for the bottom menu grid.
pub fn menu_columns(kind: &ScreenKind, count: usize) -> usize {
    match (kind, count) {
        (ScreenKind::Battle, _) => 6,
        (_, 1) => 1,
        _ => 2,
    }
}

/// Button width for the bottom menu grid on a viewport of `width` cells.
pub fn menu_button_width(kind: &ScreenKind, width: i32) -> i32 {
    let w = match kind {
        ScreenKind::Battle => (width * 12 / 100).min(theme::BATTLE_MENU_BUTTON_MAX_W),
        _ => (width * 28 / 100).min(theme::MENU_BUTTON_MAX_W),
    };
    w.max(theme::MIN_BUTTON_W)
}

/// Bottom-anchored, horizontally centered menu grid.
pub fn bottom_grid(spec: &GridSpec, viewport: Size) -> Vec<Rect> {
    let size = spec.size();
    let origin = Point::new(
        (viewport.w - size.w) / 2,
        viewport.h - size.h - theme::MENU_BOTTOM_MARGIN,
    );
    spec.cells_from(origin)
}

// ── Compass ──

/// How an option landed in a compass slot.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CompassSource {
    Literal,
    TravelTo,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CompassSlot {
    pub option: usize,
    pub direction: Direction,
    pub source: CompassSource,
}

pub const TRAVEL_PREFIX: &str = "Travel to ";

pub fn is_travel_to(option: &str) -> bool {
    option.starts_with(TRAVEL_PREFIX)
}

/// Assign options to the four compass slots. Literal direction labels keep
/// their own slot; each `Travel to ...` option takes the first slot, in
/// N, S, E, W order, not already held. Options that find no slot are
/// left out.
pub fn assign_compass(options: &[String]) -> Vec<CompassSlot> {
    let mut taken: Vec<Direction> = Vec::with_capacity(4);
    let mut slots = Vec::with_capacity(4);

    for (i, opt) in options.iter().enumerate() {
        if let Some(dir) = Direction::from_label(opt) {
            if !taken.contains(&dir) {
                taken.push(dir);
                slots.push(CompassSlot { option: i, direction: dir, source: CompassSource::Literal });
            }
        }
    }

    for (i, opt) in options.iter().enumerate() {
        if !is_travel_to(opt) {
            continue;
        }
        if let Some(dir) = Direction::ALL.into_iter().find(|d| !taken.contains(d)) {
            taken.push(dir);
            slots.push(CompassSlot { option: i, direction: dir, source: CompassSource::TravelTo });
        }
    }

    slots.sort_by_key(|s| s.option);
    slots
}

/// Offset of a compass slot from the compass center. Horizontal factors
/// are 2.25 radii, vertical 1.25 radii halved for the cell aspect ratio.
pub fn compass_offset(direction: Direction, radius: i32) -> Point {
    let r = radius as f32;
    let (dx, dy) = match direction {
        Direction::North => (0.0, -1.25),
        Direction::South => (0.0, 1.25),
        Direction::East => (2.25, 0.0),
        Direction::West => (-2.25, 0.0),
    };
    Point::new((dx * r).round() as i32, (dy * r / 2.0).round() as i32)
}

// ── Text boxes ──

/// `max(min_height, measured + padding)` over every candidate text, so a
/// box never has to grow when its content is swapped on hover.
pub fn autosize<'a>(
    min_height: i32,
    candidates: impl IntoIterator<Item = &'a str>,
    wrap_width: usize,
    padding: i32,
) -> i32 {
    let tallest = candidates
        .into_iter()
        .map(|c| text::measure(c, wrap_width).h)
        .max()
        .unwrap_or(0);
    min_height.max(tallest + padding)
}

/// Where text goes inside a box that may hold a portrait on its left.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TextFrame {
    pub origin: Point,
    pub wrap: usize,
}

impl TextFrame {
    /// Label rect of `height` rows at this frame.
    pub fn rect(&self, height: i32) -> Rect {
        Rect::new(self.origin.x, self.origin.y, self.wrap as i32, height)
    }
}

pub fn text_frame(bounds: Rect, portrait: Option<Size>) -> TextFrame {
    let pad = theme::PAD;
    match portrait {
        Some(p) => TextFrame {
            origin: Point::new(bounds.x + 3 * pad + p.w, bounds.y + pad),
            wrap: (bounds.w - p.w - 4 * pad).max(1) as usize,
        },
        None => TextFrame {
            origin: Point::new(bounds.x + 2 * pad, bounds.y + pad),
            wrap: (bounds.w - 4 * pad).max(1) as usize,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(count: usize, columns: usize) -> GridSpec {
        GridSpec { count, columns, cell: Size::new(10, 3), col_spacing: 4, row_spacing: 1 }
    }

    #[test]
    fn five_in_two_columns_is_three_rows() {
        let g = spec(5, 2);
        assert_eq!(g.rows(), 3);
        assert_eq!(g.size(), Size::new(2 * 10 + 4, 3 * 3 + 2));
        let cells = g.cells_from(Point::new(0, 0));
        assert_eq!(cells[4], Rect::new(0, 8, 10, 3));
        assert_eq!(cells[1], Rect::new(14, 0, 10, 3));
    }

    #[test]
    fn empty_grid_has_no_extent() {
        assert_eq!(spec(0, 2).size(), Size::new(0, 0));
        assert!(spec(0, 2).cells_from(Point::new(3, 3)).is_empty());
    }

    #[test]
    fn bottom_grid_is_centered_in_x() {
        let cells = bottom_grid(&spec(2, 2), Size::new(80, 24));
        assert_eq!(cells[0].x, (80 - 24) / 2);
        assert_eq!(cells[0].bottom(), 24 - theme::MENU_BOTTOM_MARGIN);
        assert_eq!(cells[1].x - cells[0].right(), 4);
    }

    #[test]
    fn column_rule() {
        assert_eq!(menu_columns(&ScreenKind::Battle, 1), 6);
        assert_eq!(menu_columns(&ScreenKind::Menu, 1), 1);
        assert_eq!(menu_columns(&ScreenKind::Menu, 5), 2);
    }

    fn opts(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn travel_to_takes_free_slots() {
        let slots = assign_compass(&opts(&["North", "Travel to Lake", "Rest", "Travel to Cave", "West"]));
        let dirs: Vec<(usize, Direction)> = slots.iter().map(|s| (s.option, s.direction)).collect();
        assert_eq!(
            dirs,
            vec![(0, Direction::North), (1, Direction::South), (3, Direction::East), (4, Direction::West)],
        );
        assert_eq!(slots[1].source, CompassSource::TravelTo);
    }

    #[test]
    fn overflowing_travel_options_are_dropped() {
        let slots = assign_compass(&opts(&[
            "Travel to A", "Travel to B", "Travel to C", "Travel to D", "Travel to E",
        ]));
        assert_eq!(slots.len(), 4);
        assert!(slots.iter().all(|s| s.option < 4));
    }

    #[test]
    fn offsets_follow_cell_aspect() {
        assert_eq!(compass_offset(Direction::North, 8), Point::new(0, -5));
        assert_eq!(compass_offset(Direction::East, 8), Point::new(18, 0));
        assert_eq!(compass_offset(Direction::West, 8), Point::new(-18, 0));
    }

    #[test]
    fn autosize_uses_tallest_candidate() {
        let long = "one two three four five six seven eight nine ten";
        assert_eq!(autosize(5, ["short"], 10, 3), 5);
        assert_eq!(autosize(5, ["short", long], 10, 3), text::measure(long, 10).h + 3);
    }

    #[test]
    fn portrait_narrows_the_frame() {
        let bounds = Rect::new(10, 5, 60, 12);
        let plain = text_frame(bounds, None);
        let framed = text_frame(bounds, Some(theme::PORTRAIT));
        assert_eq!(plain.origin, Point::new(12, 6));
        assert_eq!(plain.wrap, 56);
        assert_eq!(framed.origin.x, 10 + 3 + 12);
        assert_eq!(framed.wrap, 60 - 12 - 4);
    }
}
