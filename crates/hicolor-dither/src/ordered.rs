use hicolor_core::{Color, DistanceMetric, Palette};

use crate::ditherer::{wrapper_for, Ditherer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BayerSize {
    Bayer2x2,
    Bayer4x4,
    Bayer8x8,
}

impl BayerSize {
    fn order(self) -> usize {
        match self {
            BayerSize::Bayer2x2 => 2,
            BayerSize::Bayer4x4 => 4,
            BayerSize::Bayer8x8 => 8,
        }
    }
}

/// Recursive Bayer threshold-matrix construction: `B(2n)[i][j] =
/// 4*B(n)[i%n][j%n] + quadrant offset`, quadrant offsets {TL=0, TR=2, BL=3,
/// BR=1}. Produces the classic 2x2/4x4/8x8 tables without hand transcription.
pub(crate) fn bayer_matrix(order: usize) -> Vec<Vec<u32>> {
    if order == 1 {
        return vec![vec![0]];
    }
    let half = order / 2;
    let prev = bayer_matrix(half);
    let quadrant = |qi: usize, qj: usize| -> u32 {
        match (qi, qj) {
            (0, 0) => 0,
            (0, 1) => 2,
            (1, 0) => 3,
            (1, 1) => 1,
            _ => unreachable!(),
        }
    };
    let mut out = vec![vec![0u32; order]; order];
    for i in 0..order {
        for j in 0..order {
            out[i][j] = 4 * prev[i % half][j % half] + quadrant(i / half, j / half);
        }
    }
    out
}

/// Classic threshold-matrix dithering (spec §4.D): bias each channel by the
/// matrix entry for `(x mod n, y mod n)`, then snap to the nearest palette
/// color.
pub struct OrderedDitherer {
    matrix: Vec<Vec<u32>>,
    order: usize,
}

impl OrderedDitherer {
    pub fn new(size: BayerSize) -> Self {
        let order = size.order();
        OrderedDitherer {
            matrix: bayer_matrix(order),
            order,
        }
    }
}

impl Ditherer for OrderedDitherer {
    fn dither(&self, width: u32, height: u32, source: &[Color], palette: &Palette, metric: Option<DistanceMetric>) -> Vec<u8> {
        let wrapper = wrapper_for(palette, metric);
        let cube_edge = (palette.len() as f64).cbrt().max(1.0);
        let scale = 255.0 / cube_edge;
        let n2 = (self.order * self.order) as f64;

        let mut out = Vec::with_capacity(source.len());
        for y in 0..height {
            for x in 0..width {
                let idx = (y * width + x) as usize;
                let threshold = self.matrix[(y as usize) % self.order][(x as usize) % self.order] as f64 / n2 - 0.5;
                let bias = threshold * scale;
                let biased = |v: u8| (v as f64 + bias).round().clamp(0.0, 255.0) as u8;
                let c = source[idx];
                let biased_color = Color::rgb(biased(c.r), biased(c.g), biased(c.b));
                out.push(wrapper.nearest_index(biased_color) as u8);
            }
        }
        out
    }
}
