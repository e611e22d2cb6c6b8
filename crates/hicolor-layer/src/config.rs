use std::time::Duration;

use hicolor_core::DistanceMetric;
use hicolor_dither::Ditherer;
use hicolor_quant::Quantizer;

/// Order in which distinct colors are assigned to sub-frame windows
/// (spec §4.E).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorOrdering {
    MostUsedFirst,
    LeastUsedFirst,
    HighLuminanceFirst,
    LowLuminanceFirst,
    FromCenter,
    Random,
}

/// Hi-color layering configuration (spec §4.E). Construct with
/// `LayerConfig::default()` and override the fields that matter for a
/// given run.
pub struct LayerConfig {
    pub maximum_colors_per_sub_image: u8,
    pub minimum_sub_image_duration: Duration,
    pub sub_image_duration_time_slice: Duration,
    pub total_frame_duration: Option<Duration>,
    pub color_ordering: ColorOrdering,
    pub first_sub_image_inits_background: bool,
    pub use_back_filling: bool,
    pub quantizer: Option<Box<dyn Quantizer + Send + Sync>>,
    pub ditherer: Option<Box<dyn Ditherer + Send + Sync>>,
    pub color_distance_metric: Option<DistanceMetric>,
}

impl Default for LayerConfig {
    fn default() -> Self {
        LayerConfig {
            maximum_colors_per_sub_image: 255,
            minimum_sub_image_duration: Duration::from_millis(10),
            sub_image_duration_time_slice: Duration::from_millis(10),
            total_frame_duration: None,
            color_ordering: ColorOrdering::MostUsedFirst,
            first_sub_image_inits_background: false,
            use_back_filling: false,
            quantizer: None,
            ditherer: None,
            color_distance_metric: None,
        }
    }
}
