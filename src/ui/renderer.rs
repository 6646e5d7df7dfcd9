/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Compose the session's scene into the `front` buffer
///   2. Compare each cell with the `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// Composition is separate from output so it runs without a terminal.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, queue,
    style::{Attribute, Color, Print, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use unicode_width::UnicodeWidthChar;

use crate::session::client::Session;
use crate::session::navigator::{Navigator, VisualState};
use crate::ui::assets::AssetCache;
use crate::view::geometry::{Rect, Size};
use crate::view::registry::Registry;
use crate::view::scene::{Align, Label, Node, Tone, Weight};
use crate::view::text;

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Attr {
    Plain,
    Bold,
    Italic,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
    attr: Attr,
    wide: bool, // true = this char occupies 2 terminal columns
    cont: bool, // true = continuation of previous wide char (skip render)
}

impl Cell {
    /// Explicit dark background for every empty cell, used for Clear too,
    /// so the gaps between rows match on VTE terminals.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell {
        ch: ' ',
        fg: Color::White,
        bg: Cell::BASE_BG,
        attr: Attr::Plain,
        wide: false,
        cont: false,
    };

    /// Sentinel used to invalidate the back buffer.
    const INVALID: Cell = Cell {
        ch: '?',
        fg: Color::Magenta,
        bg: Color::Magenta,
        attr: Attr::Plain,
        wide: false,
        cont: false,
    };
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    fn get(&self, x: i32, y: i32) -> Cell {
        self.index(x, y).map_or(Cell::BLANK, |i| self.cells[i])
    }

    fn set_char(&mut self, x: i32, y: i32, ch: char, fg: Color, attr: Attr) -> i32 {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0) as i32;
        if w == 0 {
            return 0;
        }
        let wide = w == 2 && self.index(x + 1, y).is_some();
        if let Some(i) = self.index(x, y) {
            let bg = self.cells[i].bg;
            self.cells[i] = Cell { ch, fg, bg, attr, wide, cont: false };
            if wide {
                let j = i + 1;
                self.cells[j] = Cell { ch: ' ', fg, bg: self.cells[j].bg, attr, wide: false, cont: true };
            }
        }
        w
    }

    /// Write a string at (x, y), clipped to `max_w` columns. Keeps the background.
    fn put_str(&mut self, x: i32, y: i32, s: &str, max_w: i32, fg: Color, attr: Attr) {
        let mut cx = x;
        for ch in s.chars() {
            let w = UnicodeWidthChar::width(ch).unwrap_or(0) as i32;
            if cx + w > x + max_w {
                break;
            }
            cx += self.set_char(cx, y, ch, fg, attr);
        }
    }

    fn fill(&mut self, rect: Rect, ch: char, fg: Color, bg: Color) {
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                if let Some(i) = self.index(x, y) {
                    self.cells[i] = Cell { ch, fg, bg, ..Cell::BLANK };
                }
            }
        }
    }

    /// Rounded single-line frame around `rect`.
    fn frame(&mut self, rect: Rect, fg: Color, attr: Attr) {
        if rect.w < 2 || rect.h < 2 {
            return;
        }
        let (r, b) = (rect.right() - 1, rect.bottom() - 1);
        for x in rect.x + 1..r {
            self.set_char(x, rect.y, '─', fg, attr);
            self.set_char(x, b, '─', fg, attr);
        }
        for y in rect.y + 1..b {
            self.set_char(rect.x, y, '│', fg, attr);
            self.set_char(r, y, '│', fg, attr);
        }
        self.set_char(rect.x, rect.y, '╭', fg, attr);
        self.set_char(r, rect.y, '╮', fg, attr);
        self.set_char(rect.x, b, '╰', fg, attr);
        self.set_char(r, b, '╯', fg, attr);
    }

    /// Darken every cell, for the loading overlay backdrop.
    fn dim(&mut self) {
        for cell in &mut self.cells {
            cell.fg = dim_color(cell.fg);
            cell.bg = dim_color(cell.bg);
        }
    }
}

// ── Colors ──

const PANEL_BG: Color = Color::Rgb { r: 30, g: 32, b: 52 };
const BUTTON_BG: Color = Color::Rgb { r: 40, g: 44, b: 70 };
const BUTTON_HOVER_BG: Color = Color::Rgb { r: 62, g: 70, b: 110 };
const BUTTON_PRESSED_BG: Color = Color::Rgb { r: 96, g: 84, b: 40 };
const DEAD_TINT: Color = Color::Rgb { r: 70, g: 70, b: 70 };

fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Normal => Color::Rgb { r: 220, g: 220, b: 230 },
        Tone::Muted => Color::Rgb { r: 140, g: 140, b: 160 },
        Tone::Title => Color::Rgb { r: 255, g: 220, b: 120 },
        Tone::Accent => Color::Rgb { r: 110, g: 190, b: 255 },
        Tone::ActiveTurn => Color::Rgb { r: 255, g: 200, b: 50 },
        Tone::Dead => Color::Rgb { r: 110, g: 110, b: 110 },
        Tone::Hp => Color::Rgb { r: 90, g: 210, b: 100 },
        Tone::Mp => Color::Rgb { r: 80, g: 140, b: 255 },
        Tone::Sp => Color::Rgb { r: 230, g: 150, b: 60 },
        Tone::BarEmpty => Color::Rgb { r: 60, g: 60, b: 70 },
    }
}

fn dim_color(c: Color) -> Color {
    match c {
        Color::Rgb { r, g, b } => Color::Rgb { r: r / 3, g: g / 3, b: b / 3 },
        _ => Color::DarkGrey,
    }
}

fn attr_for(weight: Weight) -> Attr {
    match weight {
        Weight::Regular => Attr::Plain,
        Weight::Bold => Attr::Bold,
        Weight::Italic => Attr::Italic,
    }
}

// ── Compose: build front buffer content ──

/// Everything composition needs from the session, borrowed for one frame.
struct Frame<'a> {
    registry: &'a Registry,
    navigator: &'a Navigator,
    entry: Option<&'a str>,
}

fn compose(buf: &mut FrameBuffer, assets: &mut AssetCache, session: &Session) {
    buf.clear();
    if let Some(view) = session.view() {
        if let Some(swatch) = view.scene.background.as_deref().and_then(|u| assets.get(u)) {
            let full = Rect::new(0, 0, buf.width as i32, buf.height as i32);
            buf.fill(full, swatch.glyph, dim_color(dim_color(swatch.tint)), Cell::BASE_BG);
        }
        let frame = Frame {
            registry: &view.registry,
            navigator: session.navigator(),
            entry: session.entry().map(|e| e.value()),
        };
        for node in &view.scene.nodes {
            compose_node(buf, assets, &frame, node);
        }
    }
    if session.gate().is_engaged() {
        buf.dim();
        compose_loading(buf, &session.gate().label());
    }
}

fn compose_node(buf: &mut FrameBuffer, assets: &mut AssetCache, frame: &Frame<'_>, node: &Node) {
    match node {
        Node::Panel { rect, border, element } => {
            buf.fill(rect.inset(1), ' ', Color::White, PANEL_BG);
            let state = element.map_or(VisualState::Default, |e| frame.navigator.visual(frame.registry, e));
            let (color, attr) = match state {
                VisualState::Default => (tone_color(*border), Attr::Plain),
                VisualState::Hover => (tone_color(Tone::Accent), Attr::Bold),
                VisualState::Pressed => (tone_color(Tone::ActiveTurn), Attr::Bold),
            };
            buf.frame(*rect, color, attr);
        }
        Node::Label(label) => compose_label(buf, label),
        Node::Portrait { rect, url, dead, mirrored } => {
            let Some(swatch) = url.as_deref().and_then(|u| assets.get(u)) else {
                return;
            };
            let tint = if *dead { DEAD_TINT } else { swatch.tint };
            buf.fill(*rect, ' ', tint, PANEL_BG);
            // Lit on the facing side.
            for y in rect.y..rect.bottom() {
                for x in rect.x..rect.right() {
                    let from_face = if *mirrored { rect.right() - 1 - x } else { x - rect.x };
                    let glyph = if from_face < rect.w / 3 { swatch.glyph } else { '▓' };
                    buf.set_char(x, y, glyph, tint, Attr::Plain);
                }
            }
        }
        Node::Bar { rect, ratio, tone } => {
            let filled = (ratio * rect.w as f32).round() as i32;
            for x in 0..rect.w {
                let (ch, color) = if x < filled {
                    ('█', tone_color(*tone))
                } else {
                    ('░', tone_color(Tone::BarEmpty))
                };
                buf.set_char(rect.x + x, rect.y, ch, color, Attr::Plain);
            }
        }
        Node::Marker { rect, filled } => {
            let (glyph, tone) = if *filled { ("[■]", Tone::Accent) } else { ("[ ]", Tone::Muted) };
            buf.put_str(rect.x, rect.y, glyph, rect.w, tone_color(tone), Attr::Plain);
        }
        Node::Button { rect, lines, element } => {
            let state = frame.navigator.visual(frame.registry, *element);
            let disabled = frame.registry.get(*element).is_some_and(|e| e.disabled);
            let (bg, border, attr) = match state {
                VisualState::Default => (BUTTON_BG, Tone::Normal, Attr::Plain),
                VisualState::Hover => (BUTTON_HOVER_BG, Tone::Accent, Attr::Bold),
                VisualState::Pressed => (BUTTON_PRESSED_BG, Tone::ActiveTurn, Attr::Bold),
            };
            let fg = if disabled { tone_color(Tone::Dead) } else { tone_color(Tone::Normal) };
            buf.fill(*rect, ' ', fg, bg);
            buf.frame(*rect, tone_color(border), attr);
            let inner_w = rect.w - 2;
            let top = rect.y + 1 + ((rect.h - 2) - lines.len() as i32).max(0) / 2;
            for (i, line) in lines.iter().enumerate() {
                let w = text::display_width(line) as i32;
                let x = rect.x + 1 + (inner_w - w).max(0) / 2;
                buf.put_str(x, top + i as i32, line, inner_w, fg, attr);
            }
        }
        Node::Field { rect } => {
            buf.fill(*rect, ' ', Color::White, PANEL_BG);
            buf.frame(*rect, tone_color(Tone::Accent), Attr::Plain);
            let inner_w = (rect.w - 4).max(1);
            let value = frame.entry.unwrap_or("");
            let mut shown = entry_tail(value, inner_w).to_string();
            shown.push('▏');
            buf.put_str(rect.x + 2, rect.y + 1, &shown, inner_w, tone_color(Tone::Normal), Attr::Plain);
        }
    }
}

/// Longest suffix of `value` narrower than `max_w`, leaving a column for the caret.
fn entry_tail(value: &str, max_w: i32) -> &str {
    let mut width = 0;
    let mut start = value.len();
    for (i, ch) in value.char_indices().rev() {
        width += ch.width().unwrap_or(0) as i32;
        if width >= max_w {
            break;
        }
        start = i;
    }
    &value[start..]
}

fn compose_label(buf: &mut FrameBuffer, label: &Label) {
    let fg = tone_color(label.tone);
    let attr = attr_for(label.weight);
    for (i, line) in label.lines.iter().take(label.rect.h.max(0) as usize).enumerate() {
        let x = match label.align {
            Align::Left => label.rect.x,
            Align::Center => label.rect.x + (label.rect.w - text::display_width(line) as i32).max(0) / 2,
        };
        buf.put_str(x, label.rect.y + i as i32, line, label.rect.w, fg, attr);
    }
}

fn compose_loading(buf: &mut FrameBuffer, label: &str) {
    let w = text::display_width(label) as i32 + 6;
    let rect = Rect::centered_on(
        crate::view::geometry::Point::new(buf.width as i32 / 2, buf.height as i32 / 2),
        Size::new(w, 3),
    );
    buf.fill(rect, ' ', Color::White, PANEL_BG);
    buf.frame(rect, tone_color(Tone::Title), Attr::Bold);
    buf.put_str(rect.x + 3, rect.y + 1, label, w - 4, tone_color(Tone::Title), Attr::Bold);
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    assets: AssetCache,
    key_release: bool,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            assets: AssetCache::new(),
            key_release: false,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        // Release events let held keys end immediately instead of by timeout.
        self.key_release = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if self.key_release {
            execute!(
                self.writer,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame.
        self.back.cells.fill(Cell::INVALID);
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        if self.key_release {
            execute!(self.writer, PopKeyboardEnhancementFlags)?;
        }
        execute!(
            self.writer,
            SetAttribute(Attribute::Reset),
            DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    /// True when the terminal reports key Release events.
    pub fn reports_key_release(&self) -> bool {
        self.key_release
    }

    /// Current terminal size in cells.
    pub fn viewport(&self) -> Size {
        Size::new(self.term_w as i32, self.term_h as i32)
    }

    /// Re-read the terminal size. Returns the new size when it changed.
    pub fn poll_resize(&mut self) -> io::Result<Option<Size>> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize == self.term_w && th as usize == self.term_h {
            return Ok(None);
        }
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        self.back.cells.fill(Cell::INVALID);
        queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        Ok(Some(self.viewport()))
    }

    pub fn render(&mut self, session: &Session) -> io::Result<()> {
        compose(&mut self.front, &mut self.assets, session);
        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut last_attr = Attr::Plain;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Explicit base colors, never ResetColor: the terminal default may differ from BASE_BG.
        queue!(
            self.writer,
            SetAttribute(Attribute::Reset),
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            let mut x = 0;
            while x < self.front.width {
                let (xi, yi) = (x as i32, y as i32);
                let cell = self.front.get(xi, yi);
                let prev = self.back.get(xi, yi);

                if cell.cont {
                    if cell != prev {
                        need_move = true;
                    }
                    x += 1;
                    continue;
                }

                let cont_changed = cell.wide
                    && x + 1 < self.front.width
                    && self.front.get(xi + 1, yi) != self.back.get(xi + 1, yi);

                if cell == prev && !cont_changed {
                    need_move = true;
                    x += 1;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }

                if cell.attr != last_attr {
                    // Resetting attributes also resets colors.
                    queue!(self.writer, SetAttribute(Attribute::Reset))?;
                    match cell.attr {
                        Attr::Plain => {}
                        Attr::Bold => queue!(self.writer, SetAttribute(Attribute::Bold))?,
                        Attr::Italic => queue!(self.writer, SetAttribute(Attribute::Italic))?,
                    }
                    queue!(self.writer, SetForegroundColor(cell.fg), SetBackgroundColor(cell.bg))?;
                    last_attr = cell.attr;
                    last_fg = cell.fg;
                    last_bg = cell.bg;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.ch))?;

                if cell.wide {
                    last_x = x + 1;
                    x += 2;
                } else {
                    last_x = x;
                    x += 1;
                }
                last_y = y;
            }
        }

        self.writer.flush()
    }
}
