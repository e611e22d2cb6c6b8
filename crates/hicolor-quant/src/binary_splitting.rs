use nalgebra::{Matrix3, SymmetricEigen, Vector3};

use hicolor_core::Color;

use crate::cube::ColorCube;
use crate::quantizer::Quantizer;

/// Binary-splitting quantizer (spec §4.C.6): splittability is the largest
/// eigenvalue of the cube's 3x3 RGB covariance matrix; split by projecting
/// every entry onto the dominant eigenvector and partitioning at the mean
/// projection.
pub struct BinarySplittingQuantizer;

fn covariance(cube: &ColorCube) -> (Vector3<f64>, Matrix3<f64>) {
    let total = cube.weight().max(1) as f64;
    let mean = cube.mean_color();
    let mean_v = Vector3::new(mean.r as f64, mean.g as f64, mean.b as f64);

    let mut cov = Matrix3::zeros();
    for (c, n) in &cube.entries {
        let w = *n as f64;
        let d = Vector3::new(c.r as f64, c.g as f64, c.b as f64) - mean_v;
        cov += (d * d.transpose()) * w;
    }
    cov /= total;
    (mean_v, cov)
}

fn largest_eigenvalue(cov: &Matrix3<f64>) -> f64 {
    let eigen = SymmetricEigen::new(*cov);
    eigen.eigenvalues.max()
}

fn dominant_eigenvector(cov: &Matrix3<f64>) -> Vector3<f64> {
    let eigen = SymmetricEigen::new(*cov);
    let (max_idx, _) = eigen
        .eigenvalues
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
        .unwrap();
    eigen.eigenvectors.column(max_idx).into_owned()
}

fn split_on_dominant_axis(cube: &ColorCube) -> Option<(ColorCube, ColorCube)> {
    if cube.entries.len() < 2 {
        return None;
    }
    let (mean_v, cov) = covariance(cube);
    let axis = dominant_eigenvector(&cov);

    let projections: Vec<f64> = cube
        .entries
        .iter()
        .map(|(c, _)| Vector3::new(c.r as f64, c.g as f64, c.b as f64).dot(&axis))
        .collect();
    let mean_projection = mean_v.dot(&axis);

    let mut left = Vec::new();
    let mut right = Vec::new();
    for (entry, &proj) in cube.entries.iter().zip(&projections) {
        if proj <= mean_projection {
            left.push(*entry);
        } else {
            right.push(*entry);
        }
    }

    if left.is_empty() || right.is_empty() {
        return cube.split_at_median(cube.longest_axis());
    }
    Some((ColorCube::new(left), ColorCube::new(right)))
}

impl Quantizer for BinarySplittingQuantizer {
    fn reduce_distinct(&self, target: u8, entries: &[(Color, u32)]) -> Vec<Color> {
        let mut cubes = vec![ColorCube::new(entries.to_vec())];

        while cubes.len() < target as usize {
            let split_idx = cubes
                .iter()
                .enumerate()
                .filter(|(_, c)| c.entries.len() >= 2)
                .max_by(|(_, a), (_, b)| {
                    let (_, cov_a) = covariance(a);
                    let (_, cov_b) = covariance(b);
                    largest_eigenvalue(&cov_a)
                        .partial_cmp(&largest_eigenvalue(&cov_b))
                        .unwrap()
                })
                .map(|(i, _)| i);

            let Some(idx) = split_idx else {
                break;
            };

            match split_on_dominant_axis(&cubes[idx]) {
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
                h.record(Color::rgb(r * 16, g * 64, 255 - r * 16), r as u32, g as u32);
            }
        }
        let palette = BinarySplittingQuantizer.reduce(7, &h);
        assert_eq!(palette.len(), 7);
    }
}
