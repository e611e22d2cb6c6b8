use hicolor_core::{Color, DistanceMetric};

use crate::binary_splitting::BinarySplittingQuantizer;
use crate::quantizer::Quantizer;
use crate::variance_cut::VarianceCutQuantizer;
use crate::wu::WuQuantizer;

const DEFAULT_ITERATIONS: u32 = 25;

/// K-means-style refinement pass run after a base quantizer seeds the
/// initial centroids (spec §4.C.9 "ant-tree refinement"). Every round
/// reassigns each histogram entry to its nearest current centroid by
/// Euclidean distance, then recomputes each centroid as the count-weighted
/// mean of its assigned entries, honoring counts throughout.
pub struct AntTreeRefiner {
    pub iterations: u32,
}

impl Default for AntTreeRefiner {
    fn default() -> Self {
        AntTreeRefiner {
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

fn dist_sq(a: Color, b: Color) -> i64 {
    let dr = a.r as i64 - b.r as i64;
    let dg = a.g as i64 - b.g as i64;
    let db = a.b as i64 - b.b as i64;
    dr * dr + dg * dg + db * db
}

impl AntTreeRefiner {
    pub fn refine(&self, mut centroids: Vec<Color>, entries: &[(Color, u32)]) -> Vec<Color> {
        if centroids.is_empty() {
            return centroids;
        }

        for _ in 0..self.iterations.max(1) {
            let mut sums = vec![(0i64, 0i64, 0i64, 0u64); centroids.len()];

            for (color, count) in entries {
                let nearest = centroids
                    .iter()
                    .enumerate()
                    .min_by_key(|(_, c)| dist_sq(**c, *color))
                    .map(|(i, _)| i)
                    .unwrap();

                let entry = &mut sums[nearest];
                let n = *count as i64;
                entry.0 += color.r as i64 * n;
                entry.1 += color.g as i64 * n;
                entry.2 += color.b as i64 * n;
                entry.3 += *count as u64;
            }

            for (idx, (r, g, b, n)) in sums.into_iter().enumerate() {
                if n > 0 {
                    centroids[idx] = Color::rgb(
                        (r as f64 / n as f64).round() as u8,
                        (g as f64 / n as f64).round() as u8,
                        (b as f64 / n as f64).round() as u8,
                    );
                }
            }
        }

        centroids
    }
}

/// Wraps a base quantizer's output with k-means-style refinement over a
/// caller-supplied distance metric (spec §4.C.9), unlike the standalone
/// [`AntTreeRefiner`] which is always Euclidean. Owns its own refinement
/// loop rather than delegating to [`AntTreeRefiner`] so the metric actually
/// reaches the nearest-centroid assignment.
pub struct AntRefinementWrapper {
    pub base: Box<dyn Quantizer + Send + Sync>,
    pub metric: DistanceMetric,
    pub iterations: u32,
}

impl AntRefinementWrapper {
    pub fn new(base: Box<dyn Quantizer + Send + Sync>) -> Self {
        AntRefinementWrapper {
            base,
            metric: DistanceMetric::default(),
            iterations: DEFAULT_ITERATIONS,
        }
    }

    pub fn with_metric(base: Box<dyn Quantizer + Send + Sync>, metric: DistanceMetric) -> Self {
        AntRefinementWrapper {
            base,
            metric,
            iterations: DEFAULT_ITERATIONS,
        }
    }

    fn refine(&self, mut centroids: Vec<Color>, entries: &[(Color, u32)]) -> Vec<Color> {
        if centroids.is_empty() {
            return centroids;
        }

        for _ in 0..self.iterations.max(1) {
            let mut sums = vec![(0i64, 0i64, 0i64, 0u64); centroids.len()];

            for (color, count) in entries {
                let nearest = centroids
                    .iter()
                    .enumerate()
                    .min_by_key(|(_, c)| self.metric.distance(**c, *color))
                    .map(|(i, _)| i)
                    .unwrap();

                let entry = &mut sums[nearest];
                let n = *count as i64;
                entry.0 += color.r as i64 * n;
                entry.1 += color.g as i64 * n;
                entry.2 += color.b as i64 * n;
                entry.3 += *count as u64;
            }

            for (idx, (r, g, b, n)) in sums.into_iter().enumerate() {
                if n > 0 {
                    centroids[idx] = Color::rgb(
                        (r as f64 / n as f64).round() as u8,
                        (g as f64 / n as f64).round() as u8,
                        (b as f64 / n as f64).round() as u8,
                    );
                }
            }
        }

        centroids
    }
}

impl Quantizer for AntRefinementWrapper {
    fn reduce_distinct(&self, target: u8, entries: &[(Color, u32)]) -> Vec<Color> {
        let seeded = self.base.reduce_distinct(target, entries);
        self.refine(seeded, entries)
    }
}

/// Wu's quantizer seeded centroids, refined by ant-tree iteration.
pub struct WuAntQuantizer(AntRefinementWrapper);

impl Default for WuAntQuantizer {
    fn default() -> Self {
        WuAntQuantizer(AntRefinementWrapper::new(Box::new(WuQuantizer)))
    }
}

impl WuAntQuantizer {
    pub fn with_metric(metric: DistanceMetric) -> Self {
        WuAntQuantizer(AntRefinementWrapper::with_metric(Box::new(WuQuantizer), metric))
    }
}

impl Quantizer for WuAntQuantizer {
    fn reduce_distinct(&self, target: u8, entries: &[(Color, u32)]) -> Vec<Color> {
        self.0.reduce_distinct(target, entries)
    }
}

/// Binary-splitting seeded centroids, refined by ant-tree iteration.
pub struct BinarySplittingAntQuantizer(AntRefinementWrapper);

impl Default for BinarySplittingAntQuantizer {
    fn default() -> Self {
        BinarySplittingAntQuantizer(AntRefinementWrapper::new(Box::new(BinarySplittingQuantizer)))
    }
}

impl BinarySplittingAntQuantizer {
    pub fn with_metric(metric: DistanceMetric) -> Self {
        BinarySplittingAntQuantizer(AntRefinementWrapper::with_metric(Box::new(BinarySplittingQuantizer), metric))
    }
}

impl Quantizer for BinarySplittingAntQuantizer {
    fn reduce_distinct(&self, target: u8, entries: &[(Color, u32)]) -> Vec<Color> {
        self.0.reduce_distinct(target, entries)
    }
}

/// Variance-cut seeded centroids, refined by ant-tree iteration (spec's
/// "BSITATCQ" composite).
pub struct BsitatcqQuantizer(AntRefinementWrapper);

impl Default for BsitatcqQuantizer {
    fn default() -> Self {
        BsitatcqQuantizer(AntRefinementWrapper::new(Box::new(VarianceCutQuantizer)))
    }
}

impl BsitatcqQuantizer {
    pub fn with_metric(metric: DistanceMetric) -> Self {
        BsitatcqQuantizer(AntRefinementWrapper::with_metric(Box::new(VarianceCutQuantizer), metric))
    }
}

impl Quantizer for BsitatcqQuantizer {
    fn reduce_distinct(&self, target: u8, entries: &[(Color, u32)]) -> Vec<Color> {
        self.0.reduce_distinct(target, entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hicolor_core::Histogram;

    fn sample_histogram() -> Histogram {
        let mut h = Histogram::new();
        for r in 0..16u8 {
            h.record(Color::rgb(r * 16, 255 - r * 16, r * 8), r as u32, 0);
        }
        h
    }

    #[test]
    fn wu_ant_produces_requested_count() {
        let palette = WuAntQuantizer::default().reduce(6, &sample_histogram());
        assert_eq!(palette.len(), 6);
    }

    #[test]
    fn refinement_never_collapses_centroids_when_evenly_weighted() {
        let entries = vec![(Color::rgb(0, 0, 0), 50), (Color::rgb(255, 255, 255), 50)];
        let seeded = vec![Color::rgb(0, 0, 0), Color::rgb(255, 255, 255)];
        let refined = AntTreeRefiner::default().refine(seeded, &entries);
        assert_eq!(refined.len(), 2);
        assert_ne!(refined[0], refined[1]);
    }

    #[test]
    fn wrapper_assignment_follows_the_supplied_metric_not_euclidean() {
        // (220,20,20) is exactly equidistant from the two seeds under plain
        // Euclidean distance, so Euclidean keeps it on the first seed by
        // assignment order; CompuPhase's red-channel weighting (scaled by
        // the pair's average red value) breaks that tie the other way.
        // One refinement pass is enough for the two metrics' cluster means
        // to diverge.
        let entries = vec![
            (Color::rgb(220, 20, 20), 10),
            (Color::rgb(20, 220, 20), 10),
            (Color::rgb(20, 20, 220), 10),
        ];
        let seeded = vec![Color::rgb(0, 255, 0), Color::rgb(0, 0, 255)];

        let mut euclidean = AntRefinementWrapper::with_metric(Box::new(crate::wu::WuQuantizer), DistanceMetric::Euclidean);
        euclidean.iterations = 1;
        let mut compuphase = AntRefinementWrapper::with_metric(Box::new(crate::wu::WuQuantizer), DistanceMetric::CompuPhase);
        compuphase.iterations = 1;

        let refined_euclidean = euclidean.refine(seeded.clone(), &entries);
        let refined_compuphase = compuphase.refine(seeded, &entries);

        assert_ne!(refined_euclidean, refined_compuphase);
    }
}
