use nalgebra::{Matrix3, SymmetricEigen, Vector3};

use hicolor_core::Color;

use crate::quantizer::Quantizer;

/// PCA-rotation wrapper (spec §4.C.8): project the histogram onto its
/// principal axes, rescale each axis to [0, 255], run the wrapped
/// quantizer in that rotated space, then invert the transform.
pub struct PcaQuantizerWrapper {
    pub base: Box<dyn Quantizer + Send + Sync>,
}

impl PcaQuantizerWrapper {
    pub fn new(base: Box<dyn Quantizer + Send + Sync>) -> Self {
        PcaQuantizerWrapper { base }
    }
}

struct PcaTransform {
    mean: Vector3<f64>,
    eigenvectors: Matrix3<f64>,
    axis_min: [f64; 3],
    axis_range: [f64; 3],
}

fn fit(entries: &[(Color, u32)]) -> PcaTransform {
    let total = entries.iter().map(|(_, n)| *n as f64).sum::<f64>().max(1.0);
    let mut mean = Vector3::zeros();
    for (c, n) in entries {
        mean += Vector3::new(c.r as f64, c.g as f64, c.b as f64) * (*n as f64);
    }
    mean /= total;

    let mut cov = Matrix3::zeros();
    for (c, n) in entries {
        let d = Vector3::new(c.r as f64, c.g as f64, c.b as f64) - mean;
        cov += (d * d.transpose()) * (*n as f64);
    }
    cov /= total;

    let eigen = SymmetricEigen::new(cov);
    let eigenvectors = eigen.eigenvectors;

    let mut axis_min = [f64::MAX; 3];
    let mut axis_max = [f64::MIN; 3];
    for (c, _) in entries {
        let v = eigenvectors.transpose() * (Vector3::new(c.r as f64, c.g as f64, c.b as f64) - mean);
        for axis in 0..3 {
            axis_min[axis] = axis_min[axis].min(v[axis]);
            axis_max[axis] = axis_max[axis].max(v[axis]);
        }
    }

    let mut axis_range = [0.0; 3];
    for axis in 0..3 {
        let range = axis_max[axis] - axis_min[axis];
        // Degenerate axis (min == max): substitute a unit range so the
        // forward/inverse transform stays well-defined.
        axis_range[axis] = if range.abs() < f64::EPSILON { 1.0 } else { range };
    }

    PcaTransform {
        mean,
        eigenvectors,
        axis_min,
        axis_range,
    }
}

impl PcaTransform {
    fn forward(&self, c: Color) -> Color {
        let v = self.eigenvectors.transpose() * (Vector3::new(c.r as f64, c.g as f64, c.b as f64) - self.mean);
        let mut out = [0u8; 3];
        for axis in 0..3 {
            let normalized = (v[axis] - self.axis_min[axis]) / self.axis_range[axis];
            out[axis] = (normalized * 255.0).round().clamp(0.0, 255.0) as u8;
        }
        Color::rgb(out[0], out[1], out[2])
    }

    fn inverse(&self, c: Color) -> Color {
        let components = [c.r as f64, c.g as f64, c.b as f64];
        let mut v = Vector3::zeros();
        for axis in 0..3 {
            let normalized = components[axis] / 255.0;
            v[axis] = normalized * self.axis_range[axis] + self.axis_min[axis];
        }
        let original = self.eigenvectors * v + self.mean;
        Color::rgb(
            original.x.round().clamp(0.0, 255.0) as u8,
            original.y.round().clamp(0.0, 255.0) as u8,
            original.z.round().clamp(0.0, 255.0) as u8,
        )
    }
}

impl Quantizer for PcaQuantizerWrapper {
    fn reduce_distinct(&self, target: u8, entries: &[(Color, u32)]) -> Vec<Color> {
        let transform = fit(entries);
        let rotated: Vec<(Color, u32)> = entries
            .iter()
            .map(|(c, n)| (transform.forward(*c), *n))
            .collect();

        self.base
            .reduce_distinct(target, &rotated)
            .into_iter()
            .map(|c| transform.inverse(c))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::median_cut::MedianCutQuantizer;
    use hicolor_core::Histogram;

    #[test]
    fn reduce_produces_requested_count() {
        let mut h = Histogram::new();
        for r in 0..16u8 {
            h.record(Color::rgb(r * 16, r * 8, 255 - r * 16), r as u32, 0);
        }
        let wrapper = PcaQuantizerWrapper::new(Box::new(MedianCutQuantizer));
        let palette = wrapper.reduce(4, &h);
        assert_eq!(palette.len(), 4);
    }

    #[test]
    fn handles_degenerate_flat_axis() {
        let entries = vec![(Color::rgb(10, 10, 10), 1), (Color::rgb(10, 20, 10), 1)];
        let wrapper = PcaQuantizerWrapper::new(Box::new(MedianCutQuantizer));
        let colors = wrapper.reduce_distinct(2, &entries);
        assert_eq!(colors.len(), 2);
    }
}
