use std::collections::HashMap;

use hicolor_core::Color;

use crate::cube::ColorCube;
use crate::quantizer::Quantizer;

/// Wu's color quantizer (spec §4.C.3): bucket into a 32x32x32 grid (top 5
/// bits per channel), split the cube with the largest bounding-box volume
/// at the midpoint of its longest axis, and represent each leaf by its
/// count-weighted mean shifted back up to 8 bits.
pub struct WuQuantizer;

fn bucket(value: u8) -> u8 {
    value >> 3
}

impl Quantizer for WuQuantizer {
    fn reduce_distinct(&self, target: u8, entries: &[(Color, u32)]) -> Vec<Color> {
        let mut buckets: HashMap<Color, u32> = HashMap::new();
        for (c, n) in entries {
            let key = Color::new(bucket(c.r), bucket(c.g), bucket(c.b), 0);
            *buckets.entry(key).or_insert(0) += n;
        }
        let bucketed: Vec<(Color, u32)> = buckets.into_iter().collect();

        let mut cubes = vec![ColorCube::new(bucketed)];

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
            let (lo, hi) = cubes[idx].bounds()[axis as usize];
            let midpoint = lo + (hi - lo) / 2;

            match cubes[idx].split_at_threshold(axis, midpoint) {
                Some((left, right)) => {
                    cubes.remove(idx);
                    cubes.push(left);
                    cubes.push(right);
                }
                None => break,
            }
        }

        cubes
            .iter()
            .map(|cube| {
                let mean = cube.mean_color();
                Color::rgb(
                    (mean.r << 3) | 0x04,
                    (mean.g << 3) | 0x04,
                    (mean.b << 3) | 0x04,
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hicolor_core::Histogram;

    #[test]
    fn reduce_produces_requested_count() {
        let mut h = Histogram::new();
        for r in 0..32u8 {
            h.record(Color::rgb(r * 8, 0, 0), r as u32, 0);
        }
        let palette = WuQuantizer.reduce(4, &h);
        assert_eq!(palette.len(), 4);
    }

    #[test]
    fn representative_colors_stay_in_8_bit_range() {
        let entries = vec![(Color::rgb(250, 250, 250), 10), (Color::rgb(5, 5, 5), 3)];
        for c in WuQuantizer.reduce_distinct(2, &entries) {
            assert!(c.r <= 255 && c.g <= 255 && c.b <= 255);
        }
    }
}
