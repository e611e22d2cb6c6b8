use hicolor_core::{DistanceMetric, Palette};
use hicolor_quant::PaletteWrapper;

/// Uniform ditherer contract (spec §4.D): map a truecolor raster onto a
/// palette, producing one index per pixel. `metric = None` defers to
/// `PaletteWrapper`'s default (CompuPhase).
pub trait Ditherer {
    fn dither(
        &self,
        width: u32,
        height: u32,
        source: &[hicolor_core::Color],
        palette: &Palette,
        metric: Option<DistanceMetric>,
    ) -> Vec<u8>;
}

pub(crate) fn wrapper_for(palette: &Palette, metric: Option<DistanceMetric>) -> PaletteWrapper {
    PaletteWrapper::new(palette, metric.unwrap_or_default())
}
