use hicolor_core::Color;

use crate::cube::ColorCube;
use crate::quantizer::Quantizer;

/// Median-cut quantizer (spec §4.C.2): repeatedly split the cube with the
/// largest bounding-box volume along its longest axis, at the median index.
pub struct MedianCutQuantizer;

impl Quantizer for MedianCutQuantizer {
    fn reduce_distinct(&self, target: u8, entries: &[(Color, u32)]) -> Vec<Color> {
        let mut cubes = vec![ColorCube::new(entries.to_vec())];

        while cubes.len() < target as usize {
            let split_idx = cubes
                .iter()
                .enumerate()
                .filter(|(_, c)| c.entries.len() >= 2)
                .max_by_key(|(_, c)| c.volume())
                .map(|(i, _)| i);

            let Some(idx) = split_idx else {
                break;
            };

            let axis = cubes[idx].longest_axis();
            match cubes[idx].split_at_median(axis) {
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
    fn reduce_produces_requested_count_when_enough_distinct_colors() {
        let mut h = Histogram::new();
        for r in 0..16u8 {
            h.record(Color::rgb(r * 16, 0, 0), r as u32, 0);
        }
        let palette = MedianCutQuantizer.reduce(4, &h);
        assert_eq!(palette.len(), 4);
    }

    #[test]
    fn never_splits_into_empty_cube() {
        let entries = vec![(Color::rgb(1, 1, 1), 1)];
        let colors = MedianCutQuantizer.reduce_distinct(4, &entries);
        assert!(!colors.is_empty());
    }
}
