use std::collections::HashMap;

use crate::color::Color;

/// Mapping from `Color` to (count, positions), built by a single streaming
/// pass over the source (spec §3, §4.G). Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct Histogram {
    entries: HashMap<Color, (u32, Vec<(u32, u32)>)>,
}

impl Histogram {
    pub fn new() -> Self {
        Histogram::default()
    }

    /// Build a histogram from a row-major 32-bit RGBA buffer.
    #[tracing::instrument(level = "debug", skip(rgba))]
    pub fn from_rgba(rgba: &[u8], width: u32, height: u32) -> Self {
        let mut histogram = Histogram::new();
        let mut idx = 0usize;
        for y in 0..height {
            for x in 0..width {
                let base = idx * 4;
                let color = Color::new(rgba[base], rgba[base + 1], rgba[base + 2], rgba[base + 3]);
                histogram.record(color, x, y);
                idx += 1;
            }
        }
        histogram
    }

    pub fn record(&mut self, color: Color, x: u32, y: u32) {
        let entry = self.entries.entry(color).or_insert_with(|| (0, Vec::new()));
        entry.0 += 1;
        entry.1.push((x, y));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_count(&self) -> u64 {
        self.entries.values().map(|(count, _)| *count as u64).sum()
    }

    pub fn count_of(&self, color: &Color) -> u32 {
        self.entries.get(color).map(|(c, _)| *c).unwrap_or(0)
    }

    pub fn positions_of(&self, color: &Color) -> &[(u32, u32)] {
        self.entries
            .get(color)
            .map(|(_, p)| p.as_slice())
            .unwrap_or(&[])
    }

    pub fn colors(&self) -> impl Iterator<Item = &Color> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Color, u32)> {
        self.entries.iter().map(|(c, (count, _))| (c, *count))
    }

    pub fn iter_with_positions(&self) -> impl Iterator<Item = (&Color, u32, &[(u32, u32)])> {
        self.entries
            .iter()
            .map(|(c, (count, positions))| (c, *count, positions.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn histogram_count_invariant_equals_pixel_count() {
        let width = 2u32;
        let height = 2u32;
        let rgba = vec![
            255, 0, 0, 255, //
            0, 255, 0, 255, //
            0, 0, 255, 255, //
            255, 255, 255, 255, //
        ];
        let histogram = Histogram::from_rgba(&rgba, width, height);
        assert_eq!(histogram.total_count(), (width * height) as u64);
        assert_eq!(histogram.len(), 4);
    }

    #[test]
    fn repeated_colors_accumulate_positions() {
        let rgba = vec![1, 2, 3, 255, 1, 2, 3, 255];
        let histogram = Histogram::from_rgba(&rgba, 2, 1);
        let color = Color::new(1, 2, 3, 255);
        assert_eq!(histogram.count_of(&color), 2);
        assert_eq!(histogram.positions_of(&color), &[(0, 0), (1, 0)]);
    }
}
