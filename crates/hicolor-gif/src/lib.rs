//! GIF89a container writer (spec §4.F): hand-rolled LZW codec, bit/packet
//! packing, color-table layout, the frame-window dirty-rectangle optimizer,
//! and the atomic work-in-progress file commit protocol.

mod bit_writer;
mod color_table;
mod frame_window;
mod lzw;
mod packet_writer;
mod wip;
mod writer;

pub use lzw::LzwEncoder;
pub use wip::WipToken;
pub use writer::GifWriter;
