use hicolor_core::{Color, DistanceMetric, Palette};

use crate::ditherer::{wrapper_for, Ditherer};

/// Nearest-color lookup with no error propagation (spec §4.D).
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDither;

impl Ditherer for NoDither {
    fn dither(&self, _width: u32, _height: u32, source: &[Color], palette: &Palette, metric: Option<DistanceMetric>) -> Vec<u8> {
        let wrapper = wrapper_for(palette, metric);
        source.iter().map(|&c| wrapper.nearest_index(c) as u8).collect()
    }
}
