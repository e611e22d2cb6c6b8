use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use hicolor_core::{Color, Disposal, Error, Frame, Histogram, Palette};
use hicolor_dither::{Ditherer, NoDither};
use hicolor_quant::PaletteWrapper;

use crate::config::{ColorOrdering, LayerConfig};

const SHUFFLE_SEED: u64 = 42;

/// Builds the sub-frame stack for hi-color layering (spec §4.E): each
/// frame carries at most `MaximumColorsPerSubImage` exact colors, stacked
/// with `DoNotDispose` so the eye fuses them into more than 256 colors.
pub struct HiColorLayerer {
    config: LayerConfig,
}

impl HiColorLayerer {
    pub fn new(config: LayerConfig) -> Self {
        HiColorLayerer { config }
    }

    #[tracing::instrument(level = "info", skip(self, source))]
    pub fn layer(&self, source: &[Color], width: u32, height: u32) -> Result<Vec<Frame>, Error> {
        if source.len() != width as usize * height as usize {
            return Err(Error::invalid_argument("source", "length must equal width * height"));
        }
        if width == 0 || height == 0 {
            return Err(Error::invalid_argument("dimensions", "width and height must be nonzero"));
        }

        let mut histogram = Histogram::new();
        for y in 0..height {
            for x in 0..width {
                histogram.record(source[(y * width + x) as usize], x, y);
            }
        }

        if histogram.is_empty() {
            return Ok(Vec::new());
        }

        let max_colors = self.config.maximum_colors_per_sub_image.max(1) as usize;
        let distinct = histogram.len();

        let mut needed_frames = (distinct + max_colors - 1) / max_colors;
        needed_frames = needed_frames.max(1);
        if let Some(total) = self.config.total_frame_duration {
            let slice_nanos = self.config.minimum_sub_image_duration.as_nanos().max(1);
            let limit = (total.as_nanos() / slice_nanos).max(1) as usize;
            needed_frames = needed_frames.min(limit);
        }

        let mut frames = Vec::with_capacity(needed_frames);
        let mut remaining_frames = needed_frames;
        let mut background_emitted = false;

        if self.config.first_sub_image_inits_background {
            let palette = self.background_palette(&histogram, max_colors as u8);
            let indices = match &self.config.ditherer {
                Some(configured) => configured.dither(width, height, source, &palette, self.config.color_distance_metric),
                None => NoDither.dither(width, height, source, &palette, self.config.color_distance_metric),
            };

            let mut frame = Frame::new(width as u16, height as u16, palette);
            frame.indices = indices;
            frame.disposal = Disposal::DoNotDispose;
            frame.duration = self.config.minimum_sub_image_duration;
            frames.push(frame);
            remaining_frames = remaining_frames.saturating_sub(1);
            background_emitted = true;
        }

        let mut colors: Vec<(Color, u32)> = histogram.iter().map(|(c, n)| (*c, n)).collect();
        self.sort_colors(&mut colors, &histogram, width, height);

        let windows: Vec<&[(Color, u32)]> = colors.chunks(max_colors).take(remaining_frames.max(0)).collect();

        for (i, window) in windows.iter().enumerate() {
            let is_last = i + 1 == windows.len();
            let backfill_this_frame = self.config.use_back_filling || (is_last && !background_emitted);

            let mut palette = Palette::from_colors(vec![Color::TRANSPARENT]);
            for &(color, _) in window.iter() {
                palette.push(color);
            }

            let mut indices = vec![0u8; source.len()];
            for (j, &(color, _)) in window.iter().enumerate() {
                for &(x, y) in histogram.positions_of(&color) {
                    indices[(y * width + x) as usize] = (j + 1) as u8;
                }
            }

            if backfill_this_frame {
                let wrapper = PaletteWrapper::new(&palette, self.config.color_distance_metric.unwrap_or_default());
                let window_set: std::collections::HashSet<u32> =
                    window.iter().map(|(c, _)| c.argb_key()).collect();
                for &(color, _) in colors.iter() {
                    if window_set.contains(&color.argb_key()) {
                        continue;
                    }
                    let nearest = wrapper.nearest_index(color) as u8;
                    for &(x, y) in histogram.positions_of(&color) {
                        indices[(y * width + x) as usize] = nearest;
                    }
                }
            }

            let mut frame = Frame::new(width as u16, height as u16, palette);
            frame.indices = indices;
            frame.disposal = Disposal::DoNotDispose;
            frame.transparent_color_index = Some(0);
            frame.duration = self.config.minimum_sub_image_duration;
            frames.push(frame);
        }

        if let Some(total) = self.config.total_frame_duration {
            let emitted: std::time::Duration = frames.iter().map(|f| f.duration).sum();
            if emitted < total {
                let shortfall = total - emitted;
                if let Some(last) = frames.last_mut() {
                    let slice = self.config.sub_image_duration_time_slice.as_nanos().max(1);
                    let extended_nanos = (last.duration + shortfall).as_nanos();
                    let rounded = (extended_nanos / slice) * slice;
                    last.duration = std::time::Duration::from_nanos(rounded as u64);
                }
            }
        }

        Ok(frames)
    }

    fn background_palette(&self, histogram: &Histogram, target: u8) -> Palette {
        match &self.config.quantizer {
            Some(q) => q.reduce(target, histogram),
            None => {
                let mut entries: Vec<(Color, u32)> = histogram.iter().map(|(c, n)| (*c, n)).collect();
                entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.argb_key().cmp(&b.0.argb_key())));
                entries.truncate(target as usize);
                Palette::from_colors(entries.into_iter().map(|(c, _)| c).collect())
            }
        }
    }

    fn sort_colors(&self, colors: &mut [(Color, u32)], histogram: &Histogram, width: u32, height: u32) {
        match self.config.color_ordering {
            ColorOrdering::MostUsedFirst => {
                colors.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.argb_key().cmp(&b.0.argb_key())));
            }
            ColorOrdering::LeastUsedFirst => {
                colors.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.argb_key().cmp(&b.0.argb_key())));
            }
            ColorOrdering::HighLuminanceFirst => {
                colors.sort_by(|a, b| luminance(b.0).partial_cmp(&luminance(a.0)).unwrap());
            }
            ColorOrdering::LowLuminanceFirst => {
                colors.sort_by(|a, b| luminance(a.0).partial_cmp(&luminance(b.0)).unwrap());
            }
            ColorOrdering::FromCenter => {
                let center = (width as f64 / 2.0, height as f64 / 2.0);
                colors.sort_by(|a, b| {
                    min_sq_dist_to_center(histogram, a.0, center)
                        .partial_cmp(&min_sq_dist_to_center(histogram, b.0, center))
                        .unwrap()
                });
            }
            ColorOrdering::Random => {
                let mut rng = StdRng::seed_from_u64(SHUFFLE_SEED);
                colors.shuffle(&mut rng);
            }
        }
    }
}

fn luminance(c: Color) -> f64 {
    0.299 * c.r as f64 + 0.587 * c.g as f64 + 0.114 * c.b as f64
}

/// Minimum squared distance from any pixel of `color` to the image center
/// (spec §4.E `FromCenter` ordering).
fn min_sq_dist_to_center(histogram: &Histogram, color: Color, center: (f64, f64)) -> f64 {
    histogram
        .positions_of(&color)
        .iter()
        .map(|&(x, y)| {
            let dx = x as f64 - center.0;
            let dy = y as f64 - center.1;
            dx * dx + dy * dy
        })
        .fold(f64::MAX, f64::min)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, color: Color) -> Vec<Color> {
        vec![color; (width * height) as usize]
    }

    #[test]
    fn single_color_image_produces_one_sparse_frame() {
        let layerer = HiColorLayerer::new(LayerConfig::default());
        let frames = layerer.layer(&solid(4, 4, Color::rgb(10, 20, 30)), 4, 4).unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].palette.len(), 2); // transparent + the one color
        assert!(frames[0].indices.iter().all(|&i| i == 1));
    }

    #[test]
    fn more_colors_than_budget_spread_across_multiple_frames() {
        let mut config = LayerConfig::default();
        config.maximum_colors_per_sub_image = 2;
        let layerer = HiColorLayerer::new(config);

        let source: Vec<Color> = (0..6u8).map(|i| Color::rgb(i * 10, i * 10, i * 10)).collect();
        let frames = layerer.layer(&source, 6, 1).unwrap();
        assert_eq!(frames.len(), 3);
        for frame in &frames {
            assert!(frame.palette.len() <= 3); // transparent + up to 2 colors
        }
    }

    #[test]
    fn every_source_pixel_is_covered_by_some_frame_when_back_filling() {
        let mut config = LayerConfig::default();
        config.maximum_colors_per_sub_image = 1;
        config.use_back_filling = true;
        let layerer = HiColorLayerer::new(config);

        let source: Vec<Color> = (0..4u8).map(|i| Color::rgb(i * 40, i * 40, i * 40)).collect();
        let frames = layerer.layer(&source, 4, 1).unwrap();
        for frame in &frames {
            assert!(frame.indices.iter().all(|&i| i != 0), "back-filled frame must leave no transparent pixel");
        }
    }

    #[test]
    fn empty_source_yields_no_frames() {
        let layerer = HiColorLayerer::new(LayerConfig::default());
        let frames = layerer.layer(&[], 0, 0);
        assert!(frames.is_err());
    }
}
