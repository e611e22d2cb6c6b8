use hicolor_core::Color;

use crate::cube::{Axis, ColorCube};
use crate::quantizer::Quantizer;

/// Variance-cut quantizer (spec §4.C.5): splittability is the cube's sum
/// of squared error from its centroid; split along the axis of greatest
/// univariate variance at the mean value on that axis, falling back to a
/// median-index split when that would leave a side empty.
pub struct VarianceCutQuantizer;

fn axis_variance(cube: &ColorCube, axis: Axis) -> f64 {
    let total = cube.weight().max(1) as f64;
    let mean: f64 = cube
        .entries
        .iter()
        .map(|(c, n)| axis.component(*c) as f64 * *n as f64)
        .sum::<f64>()
        / total;
    cube.entries
        .iter()
        .map(|(c, n)| {
            let d = axis.component(*c) as f64 - mean;
            d * d * *n as f64
        })
        .sum::<f64>()
        / total
}

fn greatest_variance_axis(cube: &ColorCube) -> Axis {
    Axis::ALL
        .into_iter()
        .max_by(|a, b| axis_variance(cube, *a).partial_cmp(&axis_variance(cube, *b)).unwrap())
        .unwrap()
}

fn mean_component(cube: &ColorCube, axis: Axis) -> u8 {
    let total = cube.weight().max(1) as f64;
    let sum: f64 = cube
        .entries
        .iter()
        .map(|(c, n)| axis.component(*c) as f64 * *n as f64)
        .sum();
    (sum / total).round() as u8
}

impl Quantizer for VarianceCutQuantizer {
    fn reduce_distinct(&self, target: u8, entries: &[(Color, u32)]) -> Vec<Color> {
        let mut cubes = vec![ColorCube::new(entries.to_vec())];

        while cubes.len() < target as usize {
            let split_idx = cubes
                .iter()
                .enumerate()
                .filter(|(_, c)| c.entries.len() >= 2)
                .max_by(|(_, a), (_, b)| {
                    a.sum_squared_error()
                        .partial_cmp(&b.sum_squared_error())
                        .unwrap()
                })
                .map(|(i, _)| i);

            let Some(idx) = split_idx else {
                break;
            };

            let axis = greatest_variance_axis(&cubes[idx]);
            let threshold = mean_component(&cubes[idx], axis);
            let split = cubes[idx]
                .split_at_threshold(axis, threshold)
                .or_else(|| cubes[idx].split_at_median(axis));

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
            for b in 0..4u8 {
                h.record(Color::rgb(r * 16, 0, b * 64), r as u32, b as u32);
            }
        }
        let palette = VarianceCutQuantizer.reduce(5, &h);
        assert_eq!(palette.len(), 5);
    }
}
