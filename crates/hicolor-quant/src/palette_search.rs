use std::collections::HashMap;
use std::sync::Mutex;

use hicolor_core::{Color, DistanceMetric, Palette};

/// Nearest-index lookup over a palette, with an append-only cache guarded
/// by a mutex for concurrent insert (spec §4.B).
pub struct PaletteWrapper {
    colors: Vec<Color>,
    metric: DistanceMetric,
    cache: Mutex<HashMap<Color, usize>>,
}

impl PaletteWrapper {
    pub fn new(palette: &Palette, metric: DistanceMetric) -> Self {
        let colors: Vec<Color> = palette.iter().copied().collect();
        let mut cache = HashMap::with_capacity(colors.len());
        for (idx, color) in colors.iter().enumerate() {
            // Exact hits pre-filled; later duplicates keep the first index.
            cache.entry(*color).or_insert(idx);
        }
        PaletteWrapper {
            colors,
            metric,
            cache: Mutex::new(cache),
        }
    }

    pub fn with_default_metric(palette: &Palette) -> Self {
        PaletteWrapper::new(palette, DistanceMetric::default())
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn palette_colors(&self) -> &[Color] {
        &self.colors
    }

    /// Nearest-color index lookup, memoized.
    pub fn nearest_index(&self, color: Color) -> usize {
        if let Some(&idx) = self.cache.lock().unwrap().get(&color) {
            return idx;
        }

        let mut best_idx = 0usize;
        let mut best_dist = u32::MAX;
        for (idx, candidate) in self.colors.iter().enumerate() {
            let dist = self.metric.distance(color, *candidate);
            if dist < best_dist {
                best_dist = dist;
                best_idx = idx;
                if dist <= 1 {
                    break;
                }
            }
        }

        self.cache.lock().unwrap().insert(color, best_idx);
        best_idx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_hit_returns_its_own_index() {
        let palette = Palette::from_colors(vec![Color::BLACK, Color::WHITE, Color::rgb(10, 20, 30)]);
        let wrapper = PaletteWrapper::with_default_metric(&palette);
        assert_eq!(wrapper.nearest_index(Color::rgb(10, 20, 30)), 2);
    }

    #[test]
    fn miss_finds_nearest_by_metric() {
        let palette = Palette::from_colors(vec![Color::BLACK, Color::WHITE]);
        let wrapper = PaletteWrapper::new(&palette, DistanceMetric::Euclidean);
        assert_eq!(wrapper.nearest_index(Color::rgb(10, 10, 10)), 0);
        assert_eq!(wrapper.nearest_index(Color::rgb(240, 240, 240)), 1);
    }

    #[test]
    fn cache_is_append_only_and_idempotent() {
        let palette = Palette::from_colors(vec![Color::BLACK, Color::WHITE]);
        let wrapper = PaletteWrapper::new(&palette, DistanceMetric::Euclidean);
        let first = wrapper.nearest_index(Color::rgb(5, 5, 5));
        let second = wrapper.nearest_index(Color::rgb(5, 5, 5));
        assert_eq!(first, second);
    }
}
