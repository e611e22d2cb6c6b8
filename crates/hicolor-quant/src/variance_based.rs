use hicolor_core::Color;

use crate::cube::{Axis, ColorCube};
use crate::quantizer::Quantizer;

/// Variance-based quantizer (spec §4.C.4): always split the cube with the
/// largest weighted variance; search every distinct value on every axis as
/// a threshold and keep the one minimizing the sum of per-side weighted
/// variance, falling back to a median split if no threshold improves on it.
pub struct VarianceBasedQuantizer;

fn best_threshold_split(cube: &ColorCube) -> Option<(ColorCube, ColorCube)> {
    let mut best: Option<(f64, ColorCube, ColorCube)> = None;

    for axis in Axis::ALL {
        for &threshold in &cube.distinct_values(axis) {
            if let Some((left, right)) = cube.split_at_threshold(axis, threshold) {
                if left.is_empty() || right.is_empty() {
                    continue;
                }
                let score = left.weighted_variance() + right.weighted_variance();
                if best.as_ref().map_or(true, |(best_score, _, _)| score < *best_score) {
                    best = Some((score, left, right));
                }
            }
        }
    }

    best.map(|(_, left, right)| (left, right))
}

impl Quantizer for VarianceBasedQuantizer {
    fn reduce_distinct(&self, target: u8, entries: &[(Color, u32)]) -> Vec<Color> {
        let mut cubes = vec![ColorCube::new(entries.to_vec())];

        while cubes.len() < target as usize {
            let split_idx = cubes
                .iter()
                .enumerate()
                .filter(|(_, c)| c.entries.len() >= 2)
                .max_by(|(_, a), (_, b)| {
                    a.weighted_variance()
                        .partial_cmp(&b.weighted_variance())
                        .unwrap()
                })
                .map(|(i, _)| i);

            let Some(idx) = split_idx else {
                break;
            };

            let split = best_threshold_split(&cubes[idx])
                .or_else(|| cubes[idx].split_at_median(cubes[idx].longest_axis()));

            match split {
                Some((left, right)) => {
                    cubes.remove(idx);
                    cubes.push(left);
                    cubes.push(right);
                }
                None => break,
            }
        }

        cubes.iter().map(ColorCube::mean_color).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hicolor_core::Histogram;

    #[test]
    fn reduce_produces_requested_count() {
        let mut h = Histogram::new();
        for r in 0..16u8 {
            for g in 0..4u8 {
                h.record(Color::rgb(r * 16, g * 64, 0), r as u32, g as u32);
            }
        }
        let palette = VarianceBasedQuantizer.reduce(6, &h);
        assert_eq!(palette.len(), 6);
    }

    #[test]
    fn falls_back_to_median_when_no_threshold_splits_cleanly() {
        let entries = vec![(Color::rgb(1, 1, 1), 1), (Color::rgb(1, 1, 1), 2)];
        let colors = VarianceBasedQuantizer.reduce_distinct(2, &entries);
        assert!(!colors.is_empty());
    }
}
