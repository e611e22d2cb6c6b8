use tracing::{debug, info, instrument};

use hicolor_core::{Disposal, Error, Frame, LoopCount, Palette};

use crate::color_table::{size_bits, write_color_table};
use crate::frame_window::dirty_rect;
use crate::lzw::LzwEncoder;
use crate::wip::WipToken;

/// GIF89a stream writer (spec §4.F): header, logical screen descriptor,
/// optional global color table, NETSCAPE loop extension, and one
/// graphic-control-extension + image-descriptor + data block per frame,
/// terminated by the trailer byte.
pub struct GifWriter {
    width: u16,
    height: u16,
    global_palette: Option<Palette>,
    loop_count: LoopCount,
    background_color_index: u8,
    use_compressed_lzw: bool,
    buffer: Vec<u8>,
    previous_disposal: Option<Disposal>,
}

impl GifWriter {
    pub fn new(width: u16, height: u16, global_palette: Option<Palette>, loop_count: LoopCount) -> Result<Self, Error> {
        if width == 0 || height == 0 {
            return Err(Error::invalid_argument("dimensions", "width and height must be nonzero"));
        }

        let mut buffer = Vec::new();
        buffer.extend_from_slice(b"GIF89a");
        buffer.extend_from_slice(&width.to_le_bytes());
        buffer.extend_from_slice(&height.to_le_bytes());

        let gct_size_bits = global_palette.as_ref().map(|p| size_bits(p.len()));
        let packed = match gct_size_bits {
            Some(n) => 0x80 | ((n) << 4) | n,
            None => 0,
        };
        buffer.push(packed);
        buffer.push(0); // background color index
        buffer.push(0); // pixel aspect ratio

        if let (Some(palette), Some(n)) = (&global_palette, gct_size_bits) {
            write_color_table(&mut buffer, palette.as_slice(), n);
        }

        if let LoopCount::Set(count) = loop_count {
            buffer.extend_from_slice(&[0x21, 0xFF, 0x0B]);
            buffer.extend_from_slice(b"NETSCAPE2.0");
            buffer.push(0x03);
            buffer.push(0x01);
            buffer.extend_from_slice(&count.to_le_bytes());
            buffer.push(0x00);
        }

        Ok(GifWriter {
            width,
            height,
            global_palette,
            loop_count,
            background_color_index: 0,
            use_compressed_lzw: true,
            buffer,
            previous_disposal: None,
        })
    }

    pub fn with_uncompressed_lzw(mut self) -> Self {
        self.use_compressed_lzw = false;
        self
    }

    #[instrument(level = "debug", skip(self, frame))]
    pub fn add_frame(&mut self, frame: &Frame) -> Result<(), Error> {
        if frame.pixel_count() != frame.indices.len() {
            return Err(Error::invalid_argument(
                "frame",
                "indices length does not match width * height",
            ));
        }

        let (offset, width, height, indices) = self.windowed(frame);

        let duration_cs = (frame.duration.as_millis() / 10).min(u16::MAX as u128) as u16;
        let packed_gce = (frame.disposal.code() << 2) | frame.transparent_color_index.map_or(0, |_| 1);
        self.buffer.extend_from_slice(&[0x21, 0xF9, 0x04, packed_gce]);
        self.buffer.extend_from_slice(&duration_cs.to_le_bytes());
        self.buffer.push(frame.transparent_color_index.unwrap_or(0));
        self.buffer.push(0x00);

        self.buffer.push(0x2C);
        self.buffer.extend_from_slice(&offset.0.to_le_bytes());
        self.buffer.extend_from_slice(&offset.1.to_le_bytes());
        self.buffer.extend_from_slice(&width.to_le_bytes());
        self.buffer.extend_from_slice(&height.to_le_bytes());

        let local_n = if frame.use_local_color_table {
            Some(size_bits(frame.palette.len()))
        } else {
            None
        };
        let packed_id = match local_n {
            Some(n) => 0x80 | n,
            None => 0,
        };
        self.buffer.push(packed_id);
        if let Some(n) = local_n {
            write_color_table(&mut self.buffer, frame.palette.as_slice(), n);
        }

        let bpp = local_n
            .or_else(|| self.global_palette.as_ref().map(|p| size_bits(p.len())))
            .unwrap_or(7)
            .max(1);
        let encoder = LzwEncoder::new(bpp);
        if self.use_compressed_lzw {
            encoder.encode_compressed(&indices, &mut self.buffer);
        } else {
            encoder.encode_uncompressed(&indices, &mut self.buffer);
        }

        debug!(width, height, disposal = ?frame.disposal, "wrote frame");
        self.previous_disposal = Some(frame.disposal);
        Ok(())
    }

    /// Applies the dirty-rectangle optimization (spec §4.F) when the
    /// previous frame used `DoNotDispose`.
    fn windowed(&self, frame: &Frame) -> ((u16, u16), u16, u16, Vec<u8>) {
        if self.previous_disposal != Some(Disposal::DoNotDispose) {
            return (frame.offset, frame.width, frame.height, frame.indices.clone());
        }

        match dirty_rect(frame.width as u32, frame.height as u32, &frame.indices, self.background_color_index) {
            Some((left, top, w, h)) => {
                let mut trimmed = Vec::with_capacity((w * h) as usize);
                for y in top..top + h {
                    let row_start = (y * frame.width as u32 + left) as usize;
                    trimmed.extend_from_slice(&frame.indices[row_start..row_start + w as usize]);
                }
                (
                    (frame.offset.0 + left as u16, frame.offset.1 + top as u16),
                    w as u16,
                    h as u16,
                    trimmed,
                )
            }
            None => (frame.offset, 1, 1, vec![self.background_color_index]),
        }
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.buffer.push(0x3B);
        self.buffer
    }

    #[instrument(level = "info", skip(self))]
    pub fn finish_to_path(self, path: impl AsRef<std::path::Path> + std::fmt::Debug) -> Result<(), Error> {
        let bytes = self.finish();
        let mut token = WipToken::create(path)?;
        token.write_all(&bytes)?;
        token.commit()?;
        info!(bytes = bytes.len(), "GIF committed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use hicolor_core::Color;

    use super::*;

    fn solid_frame(width: u16, height: u16, palette: Palette, value: u8) -> Frame {
        let mut frame = Frame::new(width, height, palette);
        frame.indices = vec![value; frame.pixel_count()];
        frame.disposal = Disposal::DoNotDispose;
        frame
    }

    #[test]
    fn header_begins_with_signature_and_ends_with_trailer() {
        let palette = Palette::from_colors(vec![Color::BLACK, Color::WHITE]);
        let writer = GifWriter::new(2, 2, Some(palette), LoopCount::NotSet).unwrap();
        let bytes = writer.finish();
        assert!(bytes.starts_with(b"GIF89a"));
        assert_eq!(*bytes.last().unwrap(), 0x3B);
    }

    #[test]
    fn netscape_extension_present_only_when_loop_count_set() {
        let palette = Palette::from_colors(vec![Color::BLACK, Color::WHITE]);
        let looping = GifWriter::new(1, 1, Some(palette.clone()), LoopCount::Set(0))
            .unwrap()
            .finish();
        let not_looping = GifWriter::new(1, 1, Some(palette), LoopCount::NotSet).unwrap().finish();

        let needle = b"NETSCAPE2.0";
        assert!(looping.windows(needle.len()).any(|w| w == needle));
        assert!(!not_looping.windows(needle.len()).any(|w| w == needle));
    }

    #[test]
    fn single_frame_round_trips_through_data_sub_block_framing() {
        let palette = Palette::from_colors(vec![Color::rgb(123, 45, 67)]);
        let mut writer = GifWriter::new(1, 1, Some(palette.clone()), LoopCount::NotSet).unwrap();
        let mut frame = Frame::new(1, 1, palette);
        frame.duration = Duration::from_millis(10);
        writer.add_frame(&frame).unwrap();
        let bytes = writer.finish();

        assert!(bytes.starts_with(b"GIF89a"));
        assert_eq!(*bytes.last().unwrap(), 0x3B);
    }

    #[test]
    fn dirty_rect_trims_second_frame_after_do_not_dispose() {
        let palette = Palette::from_colors(vec![Color::BLACK, Color::WHITE]);
        let mut writer = GifWriter::new(4, 4, Some(palette.clone()), LoopCount::NotSet).unwrap();

        let first = solid_frame(4, 4, palette.clone(), 0);
        writer.add_frame(&first).unwrap();

        let mut second = Frame::new(4, 4, palette);
        second.indices[5] = 1;
        second.disposal = Disposal::DoNotDispose;
        let (_, w, h, trimmed) = writer.windowed(&second);
        assert_eq!((w, h), (1, 1));
        assert_eq!(trimmed, vec![1]);
    }
}
