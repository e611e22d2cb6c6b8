use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use hicolor_core::{Color, DistanceMetric, Palette};

use crate::ditherer::{wrapper_for, Ditherer};

const NOISE_SEED: u64 = 42;
const NOISE_STRENGTH: f64 = 14.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoiseSpectrum {
    White,
    Blue,
    Brown,
}

/// Deterministic per-pixel noise added before nearest-neighbor lookup
/// (spec §4.D). The PRNG is always seeded 42 so output is reproducible.
pub struct NoiseDitherer {
    spectrum: NoiseSpectrum,
}

impl NoiseDitherer {
    pub fn new(spectrum: NoiseSpectrum) -> Self {
        NoiseDitherer { spectrum }
    }

    fn field(&self, width: usize, height: usize) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(NOISE_SEED);
        let white: Vec<f64> = (0..width * height).map(|_| rng.gen_range(-0.5..0.5)).collect();

        match self.spectrum {
            NoiseSpectrum::White => white,
            // High-pass: subtract the local 3x3 mean to suppress low
            // frequencies, leaving mostly high-frequency energy.
            NoiseSpectrum::Blue => {
                let at = |x: i64, y: i64| -> f64 {
                    if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
                        0.0
                    } else {
                        white[(y as usize) * width + (x as usize)]
                    }
                };
                let mut out = vec![0.0; width * height];
                for y in 0..height {
                    for x in 0..width {
                        let (xi, yi) = (x as i64, y as i64);
                        let mut sum = 0.0;
                        let mut count = 0.0;
                        for dy in -1..=1i64 {
                            for dx in -1..=1i64 {
                                sum += at(xi + dx, yi + dy);
                                count += 1.0;
                            }
                        }
                        out[y * width + x] = at(xi, yi) - sum / count;
                    }
                }
                out
            }
            // Low-pass: integrate row-wise then column-wise, renormalized
            // so variance stays comparable to the other spectra.
            NoiseSpectrum::Brown => {
                let mut out = vec![0.0; width * height];
                for y in 0..height {
                    let mut acc = 0.0;
                    for x in 0..width {
                        acc += white[y * width + x];
                        out[y * width + x] = acc;
                    }
                }
                for x in 0..width {
                    let mut acc = 0.0;
                    for y in 0..height {
                        acc += out[y * width + x];
                        out[y * width + x] = acc;
                    }
                }
                let max_abs = out.iter().fold(1e-9f64, |m, &v| m.max(v.abs()));
                out.iter_mut().for_each(|v| *v = *v / max_abs * 0.5);
                out
            }
        }
    }
}

impl Ditherer for NoiseDitherer {
    fn dither(&self, width: u32, height: u32, source: &[Color], palette: &Palette, metric: Option<DistanceMetric>) -> Vec<u8> {
        let wrapper = wrapper_for(palette, metric);
        let field = self.field(width as usize, height as usize);

        source
            .iter()
            .zip(field.iter())
            .map(|(&c, &n)| {
                let bias = n * NOISE_STRENGTH;
                let apply = |v: u8| (v as f64 + bias).round().clamp(0.0, 255.0) as u8;
                wrapper.nearest_index(Color::rgb(apply(c.r), apply(c.g), apply(c.b))) as u8
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_reproduces_identical_output() {
        let palette = Palette::from_colors(vec![Color::BLACK, Color::WHITE, Color::rgb(128, 128, 128)]);
        let source = vec![Color::rgb(100, 100, 100); 32];
        let a = NoiseDitherer::new(NoiseSpectrum::White).dither(8, 4, &source, &palette, None);
        let b = NoiseDitherer::new(NoiseSpectrum::White).dither(8, 4, &source, &palette, None);
        assert_eq!(a, b);
    }

    #[test]
    fn all_three_spectra_stay_in_palette_bounds() {
        let palette = Palette::from_colors(vec![Color::BLACK, Color::WHITE]);
        let source = vec![Color::rgb(128, 128, 128); 64];
        for spectrum in [NoiseSpectrum::White, NoiseSpectrum::Blue, NoiseSpectrum::Brown] {
            let indices = NoiseDitherer::new(spectrum).dither(8, 8, &source, &palette, None);
            assert!(indices.iter().all(|&i| i < 2));
        }
    }
}
