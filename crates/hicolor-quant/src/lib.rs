//! Palette search and color quantization (spec §4.B-§4.C): the
//! `Quantizer` trait, the shared `ColorCube` splitting abstraction, every
//! concrete reduction algorithm, the PCA and ant-tree refinement wrappers,
//! and the fixed reference palettes.

mod adu;
mod ant_refinement;
mod binary_splitting;
mod cube;
mod fixed_palettes;
mod median_cut;
mod octree;
mod palette_search;
mod pca;
mod quantizer;
mod variance_based;
mod variance_cut;
mod wu;

pub use adu::AduQuantizer;
pub use ant_refinement::{AntRefinementWrapper, AntTreeRefiner, BinarySplittingAntQuantizer, BsitatcqQuantizer, WuAntQuantizer};
pub use binary_splitting::BinarySplittingQuantizer;
pub use cube::{Axis, ColorCube};
pub use fixed_palettes::{
    ega16, mac_8bit, vga256, web_safe, Ega16Quantizer, Mac8BitQuantizer, Vga256Quantizer, WebSafeQuantizer,
};
pub use median_cut::MedianCutQuantizer;
pub use octree::OctreeQuantizer;
pub use palette_search::PaletteWrapper;
pub use pca::PcaQuantizerWrapper;
pub use quantizer::{pad_to_target, Quantizer};
pub use variance_based::VarianceBasedQuantizer;
pub use variance_cut::VarianceCutQuantizer;
pub use wu::WuQuantizer;
