use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};

use super::{FontId, FontSystem};

/// One laid-out line composited into a single coverage bitmap.
#[derive(Debug, Clone, PartialEq)]
pub struct LineBitmap {
    pub width: u32,
    pub height: u32,
    /// Top-left of the bitmap relative to the layout origin, in pixels.
    pub offset: (i32, i32),
    /// Row-major coverage, one byte per pixel.
    pub coverage: Vec<u8>,
}

impl FontSystem {
    /// Lays out `text` on one line at `px` pixels and composites its glyphs.
    ///
    /// Returns `None` for an unknown font or a line with nothing to draw
    /// (empty or whitespace only).
    pub fn rasterize_line(&self, id: FontId, text: &str, px: f32) -> Option<LineBitmap> {
        let font = self.get(id)?;

        let mut layout: Layout<()> = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings::default());
        layout.append(&[font], &TextStyle::new(text, px, 0));

        let glyphs: Vec<_> = layout
            .glyphs()
            .iter()
            .filter(|g| g.char_data.rasterize() && g.width > 0 && g.height > 0)
            .collect();

        let left = glyphs.iter().map(|g| g.x.floor() as i32).min()?;
        let top = glyphs.iter().map(|g| g.y.floor() as i32).min()?;
        let right = glyphs.iter().map(|g| g.x.floor() as i32 + g.width as i32).max()?;
        let bottom = glyphs.iter().map(|g| g.y.floor() as i32 + g.height as i32).max()?;

        let mut line = LineBitmap {
            width: (right - left) as u32,
            height: (bottom - top) as u32,
            offset: (left, top),
            coverage: vec![0; ((right - left) * (bottom - top)) as usize],
        };

        for g in glyphs {
            let (metrics, bitmap) = font.rasterize_config(g.key);
            let x = (g.x.floor() as i32 - left) as u32;
            let y = (g.y.floor() as i32 - top) as u32;
            line.blit(x, y, &bitmap, metrics.width.min(g.width) as u32, metrics.height.min(g.height) as u32);
        }

        Some(line)
    }
}

impl LineBitmap {
    /// Max-combines a `w`×`h` glyph bitmap at `(x, y)`. Parts outside the
    /// line are clipped.
    fn blit(&mut self, x: u32, y: u32, src: &[u8], w: u32, h: u32) {
        let w_visible = w.min(self.width.saturating_sub(x));
        let h_visible = h.min(self.height.saturating_sub(y));

        for row in 0..h_visible {
            let src_row = (row * w) as usize;
            let dst_row = ((y + row) * self.width + x) as usize;
            for col in 0..w_visible as usize {
                let Some(&c) = src.get(src_row + col) else { return };
                let dst = &mut self.coverage[dst_row + col];
                *dst = (*dst).max(c);
            }
        }
    }
}
