use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use hicolor_core::Color;

use crate::quantizer::Quantizer;

const ADU_SEED: u64 = 42;

/// Adaptive Distributing Units quantizer (spec §4.C.7): competitive
/// learning over `iteration_count` rounds, seeded from the most frequent
/// colors, with a decaying learning rate and a neighbor pull around each
/// round's winning unit.
pub struct AduQuantizer {
    pub iteration_count: u32,
}

impl Default for AduQuantizer {
    fn default() -> Self {
        AduQuantizer { iteration_count: 10 }
    }
}

#[derive(Clone, Copy)]
struct Unit {
    r: f64,
    g: f64,
    b: f64,
}

impl Unit {
    fn from_color(c: Color) -> Self {
        Unit {
            r: c.r as f64,
            g: c.g as f64,
            b: c.b as f64,
        }
    }

    fn to_color(self) -> Color {
        Color::rgb(
            self.r.round().clamp(0.0, 255.0) as u8,
            self.g.round().clamp(0.0, 255.0) as u8,
            self.b.round().clamp(0.0, 255.0) as u8,
        )
    }

    fn dist_sq(self, c: Color) -> f64 {
        let dr = self.r - c.r as f64;
        let dg = self.g - c.g as f64;
        let db = self.b - c.b as f64;
        dr * dr + dg * dg + db * db
    }

    fn unit_dist_sq(self, other: Unit) -> f64 {
        let dr = self.r - other.r;
        let dg = self.g - other.g;
        let db = self.b - other.b;
        dr * dr + dg * dg + db * db
    }

    fn pull_toward(&mut self, c: Color, amount: f64) {
        self.r += amount * (c.r as f64 - self.r);
        self.g += amount * (c.g as f64 - self.g);
        self.b += amount * (c.b as f64 - self.b);
    }
}

impl Quantizer for AduQuantizer {
    fn reduce_distinct(&self, target: u8, entries: &[(Color, u32)]) -> Vec<Color> {
        let mut sorted_by_count = entries.to_vec();
        sorted_by_count.sort_by(|a, b| b.1.cmp(&a.1));

        let mut units: Vec<Unit> = sorted_by_count
            .iter()
            .take(target as usize)
            .map(|(c, _)| Unit::from_color(*c))
            .collect();

        if units.is_empty() {
            return Vec::new();
        }

        let mut rng = StdRng::seed_from_u64(ADU_SEED);
        let iterations = self.iteration_count.max(1);
        let mut shuffled: Vec<(Color, u32)> = entries.to_vec();

        for iter in 0..iterations {
            shuffled.shuffle(&mut rng);
            let alpha = (0.01 * (-3.0 * iter as f64 / iterations as f64).exp()).max(0.001);

            for &(color, count) in &shuffled {
                let winner_idx = units
                    .iter()
                    .enumerate()
                    .min_by(|(_, a), (_, b)| a.dist_sq(color).partial_cmp(&b.dist_sq(color)).unwrap())
                    .map(|(i, _)| i)
                    .unwrap();
                let winner_unit = units[winner_idx];
                let winner_distance = winner_unit.dist_sq(color);

                for (idx, unit) in units.iter_mut().enumerate() {
                    if idx == winner_idx {
                        continue;
                    }
                    let d = winner_unit.unit_dist_sq(*unit);
                    if d < 2.0 * winner_distance {
                        unit.pull_toward(color, 0.1 * alpha * (-d / 1000.0).exp());
                    }
                }

                let step = (alpha * (count as f64 + 1.0).ln() / 10.0).min(1.0);
                units[winner_idx].pull_toward(color, step);
            }
        }

        units.into_iter().map(Unit::to_color).collect()
    }
}
