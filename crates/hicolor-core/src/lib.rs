//! Shared data model for the hi-color GIF layering pipeline: colors,
//! distance metrics, histograms, palettes, frames, and the error
//! taxonomy. Every other crate in this workspace depends on this one.

mod color;
mod distance;
mod error;
mod frame;
mod histogram;
mod palette;

pub use color::Color;
pub use distance::{ChannelWeights, Cie94Variant, DistanceMetric};
pub use error::{Error, Result};
pub use frame::{Disposal, Frame, LoopCount};
pub use histogram::Histogram;
pub use palette::Palette;
