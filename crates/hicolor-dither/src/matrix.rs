use hicolor_core::{Color, DistanceMetric, Palette};

use crate::ditherer::{wrapper_for, Ditherer};

/// One row of a diffusion kernel: `(dx, weight)` pairs relative to the
/// pixel currently being processed. Row 0 only diffuses within the
/// current scanline (dx > 0); later rows diffuse to the rows below.
type KernelRow = Vec<(i32, i32)>;

/// Error-diffusion kernel, weights normalized by `divisor` (spec §4.D).
#[derive(Debug, Clone)]
pub struct Kernel {
    pub name: &'static str,
    pub rows: Vec<KernelRow>,
    pub divisor: i32,
}

macro_rules! kernel {
    ($name:expr, $divisor:expr, [$($row:expr),+ $(,)?]) => {
        Kernel {
            name: $name,
            rows: vec![$($row.to_vec()),+],
            divisor: $divisor,
        }
    };
}

impl Kernel {
    pub fn floyd_steinberg() -> Self {
        kernel!("FloydSteinberg", 16, [
            [(1, 7)],
            [(-1, 3), (0, 5), (1, 1)],
        ])
    }

    pub fn simple() -> Self {
        kernel!("Simple", 8, [
            [(1, 3)],
            [(0, 3), (1, 2)],
        ])
    }

    pub fn jarvis_judice_ninke() -> Self {
        kernel!("JarvisJudiceNinke", 48, [
            [(1, 7), (2, 5)],
            [(-2, 3), (-1, 5), (0, 7), (1, 5), (2, 3)],
            [(-2, 1), (-1, 3), (0, 5), (1, 3), (2, 1)],
        ])
    }

    pub fn stucki() -> Self {
        kernel!("Stucki", 42, [
            [(1, 8), (2, 4)],
            [(-2, 2), (-1, 4), (0, 8), (1, 4), (2, 2)],
            [(-2, 1), (-1, 2), (0, 4), (1, 2), (2, 1)],
        ])
    }

    pub fn atkinson() -> Self {
        kernel!("Atkinson", 8, [
            [(1, 1), (2, 1)],
            [(-1, 1), (0, 1), (1, 1)],
            [(0, 1)],
        ])
    }

    pub fn burkes() -> Self {
        kernel!("Burkes", 32, [
            [(1, 8), (2, 4)],
            [(-2, 2), (-1, 4), (0, 8), (1, 4), (2, 2)],
        ])
    }

    pub fn sierra() -> Self {
        kernel!("Sierra", 32, [
            [(1, 5), (2, 3)],
            [(-2, 2), (-1, 4), (0, 5), (1, 4), (2, 2)],
            [(-1, 2), (0, 3), (1, 2)],
        ])
    }

    pub fn two_row_sierra() -> Self {
        kernel!("TwoRowSierra", 16, [
            [(1, 4), (2, 3)],
            [(-2, 1), (-1, 2), (0, 3), (1, 2), (2, 1)],
        ])
    }

    pub fn sierra_lite() -> Self {
        kernel!("SierraLite", 4, [
            [(1, 2)],
            [(-1, 1), (0, 1)],
        ])
    }

    /// Zhigang Fan's kernel.
    pub fn fan93() -> Self {
        kernel!("Fan93", 16, [
            [(1, 7)],
            [(-2, 1), (-1, 3), (0, 5)],
        ])
    }

    pub fn shiau_fan() -> Self {
        kernel!("ShiauFan", 8, [
            [(1, 4)],
            [(-2, 1), (-1, 1), (0, 2)],
        ])
    }
}

/// Parametrized error-diffusion ditherer (spec §4.D). Scans left-to-right,
/// top-to-bottom; corrects each pixel with the accumulated error, picks the
/// nearest palette entry, then spreads the residual per `kernel`.
pub struct MatrixBasedDitherer {
    pub kernel: Kernel,
}

impl MatrixBasedDitherer {
    pub fn new(kernel: Kernel) -> Self {
        MatrixBasedDitherer { kernel }
    }
}

impl Ditherer for MatrixBasedDitherer {
    fn dither(&self, width: u32, height: u32, source: &[Color], palette: &Palette, metric: Option<DistanceMetric>) -> Vec<u8> {
        let wrapper = wrapper_for(palette, metric);
        let w = width as i64;
        let h = height as i64;
        let mut error = vec![[0f64; 3]; source.len()];
        let mut out = vec![0u8; source.len()];

        for y in 0..h {
            for x in 0..w {
                let idx = (y * w + x) as usize;
                let e = error[idx];
                let corrected = Color::rgb(
                    (source[idx].r as f64 + e[0]).round().clamp(0.0, 255.0) as u8,
                    (source[idx].g as f64 + e[1]).round().clamp(0.0, 255.0) as u8,
                    (source[idx].b as f64 + e[2]).round().clamp(0.0, 255.0) as u8,
                );
                let chosen_idx = wrapper.nearest_index(corrected);
                out[idx] = chosen_idx as u8;
                let chosen = wrapper.palette_colors()[chosen_idx];

                let quant_error = [
                    corrected.r as f64 - chosen.r as f64,
                    corrected.g as f64 - chosen.g as f64,
                    corrected.b as f64 - chosen.b as f64,
                ];

                for (row_offset, row) in self.kernel.rows.iter().enumerate() {
                    let ny = y + row_offset as i64;
                    if ny >= h {
                        continue;
                    }
                    for &(dx, weight) in row {
                        let nx = x + dx as i64;
                        if nx < 0 || nx >= w {
                            continue;
                        }
                        let nidx = (ny * w + nx) as usize;
                        let share = weight as f64 / self.kernel.divisor as f64;
                        error[nidx][0] += quant_error[0] * share;
                        error[nidx][1] += quant_error[1] * share;
                        error[nidx][2] += quant_error[2] * share;
                    }
                }
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floyd_steinberg_weights_sum_to_divisor() {
        let k = Kernel::floyd_steinberg();
        let sum: i32 = k.rows.iter().flatten().map(|&(_, w)| w).sum();
        assert_eq!(sum, k.divisor);
    }

    #[test]
    fn all_eleven_named_kernels_are_distinct() {
        let kernels = [
            Kernel::floyd_steinberg().name,
            Kernel::simple().name,
            Kernel::jarvis_judice_ninke().name,
            Kernel::stucki().name,
            Kernel::atkinson().name,
            Kernel::burkes().name,
            Kernel::sierra().name,
            Kernel::two_row_sierra().name,
            Kernel::sierra_lite().name,
            Kernel::fan93().name,
            Kernel::shiau_fan().name,
        ];
        assert_eq!(kernels.len(), 11);
        let distinct: std::collections::HashSet<_> = kernels.iter().collect();
        assert_eq!(distinct.len(), 11);
    }

    #[test]
    fn dithering_a_two_color_gradient_uses_both_palette_entries() {
        let palette = Palette::from_colors(vec![Color::BLACK, Color::WHITE]);
        let ditherer = MatrixBasedDitherer::new(Kernel::floyd_steinberg());
        let width = 16;
        let source: Vec<Color> = (0..width).map(|x| Color::rgb((x * 16) as u8, (x * 16) as u8, (x * 16) as u8)).collect();
        let indices = ditherer.dither(width as u32, 1, &source, &palette, None);
        assert!(indices.contains(&0));
        assert!(indices.contains(&1));
    }

    #[test]
    fn solid_color_input_never_diffuses_visible_error() {
        let palette = Palette::from_colors(vec![Color::rgb(50, 50, 50), Color::WHITE]);
        let ditherer = MatrixBasedDitherer::new(Kernel::stucki());
        let source = vec![Color::rgb(50, 50, 50); 64];
        let indices = ditherer.dither(8, 8, &source, &palette, None);
        assert!(indices.iter().all(|&i| i == 0));
    }
}
