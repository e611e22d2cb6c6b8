//! Ditherers (spec §4.D): the uniform `Ditherer` contract plus every
//! concrete algorithm — no-op nearest-color, matrix error diffusion,
//! ordered Bayer thresholding, spectral noise, Hilbert-curve (Riemersma)
//! diffusion, and Knoll pattern dithering.

mod ditherer;
mod knoll;
mod matrix;
mod no_dither;
mod noise;
mod ordered;
mod riemersma;

pub use ditherer::Ditherer;
pub use knoll::KnollDitherer;
pub use matrix::{Kernel, MatrixBasedDitherer};
pub use no_dither::NoDither;
pub use noise::{NoiseDitherer, NoiseSpectrum};
pub use ordered::{BayerSize, OrderedDitherer};
pub use riemersma::RiemersmaDitherer;
