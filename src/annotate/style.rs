/// Visual style for one zone: outline/box color, line thickness, text size.
#[derive(Clone, Copy, Debug)]
pub struct Style {
    pub color: [u8; 3],
    pub thickness: u32,
    pub text_scale: f32,
}

impl Style {
    /// Style for the zone at `index`, colored from the palette.
    pub fn for_index(palette: &ColorPalette, index: usize) -> Self {
        Self {
            color: palette.by_idx(index),
            thickness: 4,
            text_scale: 24.0,
        }
    }

    pub fn with_thickness(mut self, thickness: u32) -> Self {
        self.thickness = thickness;
        self
    }

    pub fn with_text_scale(mut self, text_scale: f32) -> Self {
        self.text_scale = text_scale;
        self
    }
}

impl Default for Style {
    fn default() -> Self {
        Self {
            color: [255, 64, 64],
            thickness: 4,
            text_scale: 24.0,
        }
    }
}

/// Fixed color palette, cycled by zone index.
#[derive(Clone, Debug)]
pub struct ColorPalette {
    colors: Vec<[u8; 3]>,
}

impl ColorPalette {
    /// Color for index `idx`, wrapping around the palette.
    pub fn by_idx(&self, idx: usize) -> [u8; 3] {
        self.colors[idx % self.colors.len()]
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self {
            colors: vec![
                [163, 81, 251],
                [255, 64, 64],
                [255, 161, 160],
                [255, 118, 51],
                [255, 182, 51],
                [209, 212, 53],
                [76, 251, 18],
                [148, 207, 26],
                [64, 222, 138],
                [27, 150, 64],
                [0, 214, 193],
                [46, 156, 170],
                [0, 196, 255],
                [54, 71, 151],
                [102, 117, 255],
                [0, 25, 239],
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_wraps_around() {
        let palette = ColorPalette::default();
        let n = palette.len();
        assert_eq!(palette.by_idx(0), palette.by_idx(n));
        assert_eq!(palette.by_idx(3), palette.by_idx(n + 3));
    }

    #[test]
    fn adjacent_indices_get_distinct_colors() {
        let palette = ColorPalette::default();
        assert_ne!(palette.by_idx(0), palette.by_idx(1));
    }
}
