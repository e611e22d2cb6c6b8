use hicolor_core::Color;

/// Shared cube abstraction (spec §3 "ColorCube") used by median-cut, Wu,
/// variance-based, variance-cut, and binary-splitting quantizers. Holds a
/// subset of histogram entries and exposes the primitives each algorithm
/// needs to compute its own splittability metric and split point.
#[derive(Debug, Clone)]
pub struct ColorCube {
    pub entries: Vec<(Color, u32)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    R,
    G,
    B,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::R, Axis::G, Axis::B];

    pub fn component(self, c: Color) -> u8 {
        match self {
            Axis::R => c.r,
            Axis::G => c.g,
            Axis::B => c.b,
        }
    }
}

impl ColorCube {
    pub fn new(entries: Vec<(Color, u32)>) -> Self {
        ColorCube { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn weight(&self) -> u64 {
        self.entries.iter().map(|(_, n)| *n as u64).sum()
    }

    /// Count-weighted mean color, the cube's representative (spec §3).
    pub fn mean_color(&self) -> Color {
        let total = self.weight().max(1) as f64;
        let mut r = 0f64;
        let mut g = 0f64;
        let mut b = 0f64;
        let mut a = 0f64;
        for (c, n) in &self.entries {
            let w = *n as f64;
            r += c.r as f64 * w;
            g += c.g as f64 * w;
            b += c.b as f64 * w;
            a += c.a as f64 * w;
        }
        Color::new(
            (r / total).round() as u8,
            (g / total).round() as u8,
            (b / total).round() as u8,
            (a / total).round() as u8,
        )
    }

    /// (min, max) per RGB axis.
    pub fn bounds(&self) -> [(u8, u8); 3] {
        let mut mins = [255u8; 3];
        let mut maxs = [0u8; 3];
        for (c, _) in &self.entries {
            for (axis, value) in Axis::ALL.into_iter().zip([c.r, c.g, c.b]) {
                let idx = axis as usize;
                mins[idx] = mins[idx].min(value);
                maxs[idx] = maxs[idx].max(value);
            }
        }
        [(mins[0], maxs[0]), (mins[1], maxs[1]), (mins[2], maxs[2])]
    }

    /// Axis-aligned bounding-box volume (spec §4.C.2).
    pub fn volume(&self) -> u64 {
        self.bounds()
            .iter()
            .map(|(lo, hi)| (*hi as u64).saturating_sub(*lo as u64) + 1)
            .product()
    }

    pub fn longest_axis(&self) -> Axis {
        let bounds = self.bounds();
        let ranges: Vec<u16> = bounds.iter().map(|(lo, hi)| (*hi - *lo) as u16).collect();
        // Tie-break R > G > B (spec §4.C.2).
        if ranges[0] >= ranges[1] && ranges[0] >= ranges[2] {
            Axis::R
        } else if ranges[1] >= ranges[2] {
            Axis::G
        } else {
            Axis::B
        }
    }

    /// Splittability metric WL·(σR² + σG² + σB²) with L = pixel count
    /// (spec §4.C.4). Since σ² = sum_sq / L, this reduces to the raw sum
    /// of squared per-channel deviations from the weighted mean.
    pub fn weighted_variance(&self) -> f64 {
        let mean = self.mean_color();
        let mut sum_sq = 0f64;
        for (c, n) in &self.entries {
            let w = *n as f64;
            let dr = c.r as f64 - mean.r as f64;
            let dg = c.g as f64 - mean.g as f64;
            let db = c.b as f64 - mean.b as f64;
            sum_sq += w * (dr * dr + dg * dg + db * db);
        }
        sum_sq
    }

    /// Sum of squared error from the cube's centroid (spec §4.C.5).
    pub fn sum_squared_error(&self) -> f64 {
        let mean = self.mean_color();
        self.entries
            .iter()
            .map(|(c, n)| {
                let dr = c.r as f64 - mean.r as f64;
                let dg = c.g as f64 - mean.g as f64;
                let db = c.b as f64 - mean.b as f64;
                (dr * dr + dg * dg + db * db) * *n as f64
            })
            .sum()
    }

    /// Split at the median index along `axis`; never emits an empty child.
    /// Returns `None` if the cube has fewer than 2 entries.
    pub fn split_at_median(&self, axis: Axis) -> Option<(ColorCube, ColorCube)> {
        if self.entries.len() < 2 {
            return None;
        }
        let mut sorted = self.entries.clone();
        sorted.sort_by_key(|(c, _)| axis.component(*c));
        let median = sorted.len() / 2;
        let (left, right) = sorted.split_at(median);
        if left.is_empty() || right.is_empty() {
            return None;
        }
        Some((ColorCube::new(left.to_vec()), ColorCube::new(right.to_vec())))
    }

    /// Split at a given threshold along `axis`: entries with `component <=
    /// threshold` go left. Falls back to the median split if either side
    /// would be empty (spec §4.C.5).
    pub fn split_at_threshold(&self, axis: Axis, threshold: u8) -> Option<(ColorCube, ColorCube)> {
        let mut left = Vec::new();
        let mut right = Vec::new();
        for entry in &self.entries {
            if axis.component(entry.0) <= threshold {
                left.push(*entry);
            } else {
                right.push(*entry);
            }
        }
        if left.is_empty() || right.is_empty() {
            return self.split_at_median(axis);
        }
        Some((ColorCube::new(left), ColorCube::new(right)))
    }

    /// Distinct values observed along `axis`, ascending.
    pub fn distinct_values(&self, axis: Axis) -> Vec<u8> {
        let mut values: Vec<u8> = self.entries.iter().map(|(c, _)| axis.component(*c)).collect();
        values.sort_unstable();
        values.dedup();
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_color_is_weighted_centroid() {
        let cube = ColorCube::new(vec![(Color::rgb(0, 0, 0), 1), (Color::rgb(10, 10, 10), 3)]);
        let mean = cube.mean_color();
        assert_eq!(mean.r, 8); // (0*1 + 10*3)/4 = 7.5 -> rounds to 8
    }

    #[test]
    fn split_at_median_never_emits_empty_child() {
        let cube = ColorCube::new(vec![(Color::rgb(5, 0, 0), 1)]);
        assert!(cube.split_at_median(Axis::R).is_none());
    }

    #[test]
    fn longest_axis_tie_breaks_r_then_g_then_b() {
        let cube = ColorCube::new(vec![(Color::rgb(0, 0, 0), 1), (Color::rgb(10, 10, 10), 1)]);
        assert_eq!(cube.longest_axis(), Axis::R);
    }
}
