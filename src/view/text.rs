/// Text measurement and wrapping in terminal cells.
///
/// Widths come from `unicode-width`, so CJK and other wide glyphs count as
/// two cells. Wrapping is greedy on spaces, keeps explicit newlines, and
/// hard-splits words that are wider than the wrap width.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::view::geometry::Size;

pub const ELLIPSIS: &str = "...";

pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

fn char_width(c: char) -> usize {
    UnicodeWidthChar::width(c).unwrap_or(0)
}

/// Wrap `text` to lines of at most `width` cells. Empty text has no lines.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    if text.is_empty() {
        return Vec::new();
    }
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        wrap_paragraph(paragraph.trim_end_matches('\r'), width, &mut lines);
    }
    lines
}

fn wrap_paragraph(paragraph: &str, width: usize, out: &mut Vec<String>) {
    let mut line = String::new();
    let mut line_w = 0;
    let mut any = false;

    for word in paragraph.split(' ').filter(|w| !w.is_empty()) {
        any = true;
        let word_w = display_width(word);

        if word_w > width {
            // Flush, then split the long word across as many lines as it needs.
            if line_w > 0 {
                out.push(std::mem::take(&mut line));
                line_w = 0;
            }
            for c in word.chars() {
                let cw = char_width(c);
                if line_w + cw > width && line_w > 0 {
                    out.push(std::mem::take(&mut line));
                    line_w = 0;
                }
                line.push(c);
                line_w += cw;
            }
            continue;
        }

        let needed = if line_w == 0 { word_w } else { line_w + 1 + word_w };
        if needed > width {
            out.push(std::mem::take(&mut line));
            line.push_str(word);
            line_w = word_w;
        } else {
            if line_w > 0 {
                line.push(' ');
            }
            line.push_str(word);
            line_w = needed;
        }
    }

    if line_w > 0 || !any {
        out.push(line);
    }
}

/// Size of `text` once wrapped at `width`.
pub fn measure(text: &str, width: usize) -> Size {
    let lines = wrap(text, width);
    let w = lines.iter().map(|l| display_width(l)).max().unwrap_or(0);
    Size::new(w as i32, lines.len() as i32)
}

/// Single-line width of the widest explicit line, without wrapping.
pub fn natural_width(text: &str) -> usize {
    text.split('\n').map(display_width).max().unwrap_or(0)
}

/// Cut `text` to `max` cells, ending in `...` when anything was removed.
pub fn truncate(text: &str, max: usize) -> String {
    if display_width(text) <= max {
        return text.to_string();
    }
    let ell = display_width(ELLIPSIS);
    if max <= ell {
        return ELLIPSIS.chars().take(max).collect();
    }
    let budget = max - ell;
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let cw = char_width(c);
        if used + cw > budget {
            break;
        }
        out.push(c);
        used += cw;
    }
    out.push_str(ELLIPSIS);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greedy_word_wrap() {
        assert_eq!(wrap("Hello world foo bar", 10), vec!["Hello", "world foo", "bar"]);
    }

    #[test]
    fn explicit_newlines_are_kept() {
        assert_eq!(wrap("↑\nForest", 20), vec!["↑", "Forest"]);
        assert_eq!(wrap("a\n\nb", 20), vec!["a", "", "b"]);
    }

    #[test]
    fn long_words_are_split() {
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn wide_glyphs_count_double() {
        assert_eq!(display_width("勇者"), 4);
        assert_eq!(wrap("勇者の剣", 4), vec!["勇者", "の剣"]);
    }

    #[test]
    fn empty_text_measures_zero() {
        assert_eq!(measure("", 10), Size::new(0, 0));
        assert_eq!(measure("one two", 3), Size::new(3, 2));
    }

    #[test]
    fn truncate_adds_ellipsis() {
        assert_eq!(truncate("Sir Reginald", 8), "Sir R...");
        assert_eq!(truncate("Ayla", 8), "Ayla");
        assert_eq!(truncate("Ayla", 2), "..");
    }
}
