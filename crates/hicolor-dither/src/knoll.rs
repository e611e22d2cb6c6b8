use hicolor_core::{Color, DistanceMetric, Palette};

use crate::ditherer::{wrapper_for, Ditherer};
use crate::ordered::bayer_matrix;

const CANDIDATE_COUNT: usize = 4;
const TILE_ORDER: usize = 4;

/// Pattern dithering (spec §4.D): pick the few nearest palette colors to
/// the target, weight them by closeness, then let a Bayer threshold over
/// the pixel's tile position decide which weighted candidate wins —
/// reproducing the target's average over the tile rather than per-pixel.
pub struct KnollDitherer;

impl Ditherer for KnollDitherer {
    fn dither(&self, width: u32, height: u32, source: &[Color], palette: &Palette, metric: Option<DistanceMetric>) -> Vec<u8> {
        let wrapper = wrapper_for(palette, metric);
        let colors = wrapper.palette_colors();
        let metric = metric.unwrap_or_default();
        let matrix = bayer_matrix(TILE_ORDER);
        let n2 = (TILE_ORDER * TILE_ORDER) as u32;

        source
            .iter()
            .enumerate()
            .map(|(idx, &target)| {
                let x = (idx as u32) % width.max(1);
                let y = (idx as u32) / width.max(1);

                let mut ranked: Vec<(usize, u32)> = colors
                    .iter()
                    .enumerate()
                    .map(|(i, &c)| (i, metric.distance(target, c)))
                    .collect();
                ranked.sort_by_key(|&(_, d)| d);
                ranked.truncate(CANDIDATE_COUNT.min(ranked.len()));

                let inverse_weights: Vec<f64> = ranked.iter().map(|&(_, d)| 1.0 / (1.0 + d as f64)).collect();
                let total: f64 = inverse_weights.iter().sum();

                let threshold = matrix[(y as usize) % TILE_ORDER][(x as usize) % TILE_ORDER] as f64 / n2 as f64;
                let mut cumulative = 0.0;
                let mut chosen = ranked[0].0;
                for (i, &(candidate_idx, _)) in ranked.iter().enumerate() {
                    cumulative += inverse_weights[i] / total;
                    if threshold < cumulative {
                        chosen = candidate_idx;
                        break;
                    }
                }

                chosen as u8
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_color_matching_a_palette_entry_always_selects_it() {
        let palette = Palette::from_colors(vec![Color::BLACK, Color::WHITE, Color::rgb(128, 128, 128)]);
        let source = vec![Color::rgb(128, 128, 128); 16];
        let indices = KnollDitherer.dither(4, 4, &source, &palette, None);
        assert!(indices.iter().all(|&i| i == 2));
    }

    #[test]
    fn midpoint_color_distributes_across_tile_positions() {
        let palette = Palette::from_colors(vec![Color::BLACK, Color::WHITE]);
        let source = vec![Color::rgb(128, 128, 128); 16];
        let indices = KnollDitherer.dither(4, 4, &source, &palette, None);
        assert!(indices.contains(&0));
        assert!(indices.contains(&1));
    }
}
