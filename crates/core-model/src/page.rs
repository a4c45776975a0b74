/// Pixel geometry used to map document lines onto fixed-height pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMetrics {
    pub page_height_px: u32,
    /// Fixed line height; when unset it is derived from the font size.
    pub line_height_px: Option<u32>,
}

impl Default for PageMetrics {
    fn default() -> Self {
        Self {
            page_height_px: 800,
            line_height_px: None,
        }
    }
}

impl PageMetrics {
    pub fn new(page_height_px: u32, line_height_px: Option<u32>) -> Self {
        Self {
            page_height_px: page_height_px.max(1),
            line_height_px,
        }
    }

    /// `ceil(font_size * 1.25)` unless overridden.
    pub fn line_height(&self, font_size: u16) -> u32 {
        self.line_height_px
            .unwrap_or_else(|| (u32::from(font_size) * 5).div_ceil(4))
            .max(1)
    }

    /// 1-based page containing 0-based `line`.
    pub fn page_of_line(&self, line: usize, font_size: u16) -> usize {
        let y = line as u64 * u64::from(self.line_height(font_size));
        (y / u64::from(self.page_height_px.max(1))) as usize + 1
    }
}
