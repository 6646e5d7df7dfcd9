/// URL-keyed image stand-ins.
///
/// A terminal cannot show the server's images, so every url maps to a
/// stable swatch: a tint derived from the url, plus a shading glyph. The
/// same url always yields the same swatch, so portraits stay recognisable
/// from screen to screen.

use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};

use crossterm::style::Color;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Swatch {
    pub tint: Color,
    pub glyph: char,
}

const GLYPHS: [char; 4] = ['░', '▒', '▓', '█'];

#[derive(Default)]
pub struct AssetCache {
    swatches: HashMap<String, Swatch>,
}

impl AssetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swatch for `url`. An empty url has no image.
    pub fn get(&mut self, url: &str) -> Option<&Swatch> {
        if url.is_empty() {
            return None;
        }
        Some(self.swatches.entry(url.to_string()).or_insert_with(|| swatch_for(url)))
    }

    pub fn len(&self) -> usize {
        self.swatches.len()
    }
}

fn swatch_for(url: &str) -> Swatch {
    let mut hasher = DefaultHasher::new();
    url.hash(&mut hasher);
    let h = hasher.finish();
    // Keep channels in the mid range so text stays readable on top.
    let channel = |shift: u32| 60 + ((h >> shift) & 0x7f) as u8;
    Swatch {
        tint: Color::Rgb { r: channel(0), g: channel(8), b: channel(16) },
        glyph: GLYPHS[((h >> 24) % GLYPHS.len() as u64) as usize],
    }
}
