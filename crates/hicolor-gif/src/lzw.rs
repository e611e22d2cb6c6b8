use std::collections::HashMap;

use crate::bit_writer::BitWriter;
use crate::packet_writer::PacketWriter;

const MAX_CODE_WIDTH: u8 = 12;

/// Hand-rolled GIF LZW encoder (spec §4.F): a genuine variable-width
/// compressed mode with a 4096-entry dictionary and clear-code resets, and
/// a degenerate uncompressed mode that emits each byte as a literal code
/// for trivial decoder compatibility.
pub struct LzwEncoder {
    pub bits_per_pixel: u8,
}

impl LzwEncoder {
    pub fn new(bits_per_pixel: u8) -> Self {
        LzwEncoder {
            bits_per_pixel: bits_per_pixel.max(2),
        }
    }

    fn clear_code(&self) -> u16 {
        1 << self.bits_per_pixel
    }

    fn eoi_code(&self) -> u16 {
        self.clear_code() + 1
    }

    /// The GIF image-data "LZW minimum code size" byte.
    pub fn min_code_size(&self) -> u8 {
        self.bits_per_pixel
    }

    pub fn encode_compressed(&self, data: &[u8], output: &mut Vec<u8>) {
        output.push(self.min_code_size());
        let mut packets = PacketWriter::new(output);
        let mut bits = BitWriter::new(&mut packets);

        let clear_code = self.clear_code();
        let eoi_code = self.eoi_code();
        let first_free_code = eoi_code + 1;

        let mut dict: HashMap<(i32, u8), u16> = HashMap::new();
        let mut next_code = first_free_code;
        let mut code_width = self.bits_per_pixel + 1;

        bits.write_code(clear_code, code_width);

        let mut current: Option<u16> = None;
        for &byte in data {
            match current {
                None => current = Some(byte as u16),
                Some(prefix) => {
                    let key = (prefix as i32, byte);
                    if let Some(&code) = dict.get(&key) {
                        current = Some(code);
                    } else {
                        bits.write_code(prefix, code_width);
                        dict.insert(key, next_code);
                        next_code += 1;

                        if next_code > (1u16 << code_width) - 1 {
                            if code_width < MAX_CODE_WIDTH {
                                code_width += 1;
                            } else {
                                bits.write_code(clear_code, code_width);
                                dict.clear();
                                next_code = first_free_code;
                                code_width = self.bits_per_pixel + 1;
                            }
                        }
                        current = Some(byte as u16);
                    }
                }
            }
        }

        if let Some(prefix) = current {
            bits.write_code(prefix, code_width);
        }
        bits.write_code(eoi_code, code_width);
        bits.finish();
        packets.finish();
    }

    /// Degenerate uncompressed mode: every pixel is its own literal code at
    /// a fixed 9-bit (or `min_code_size + 1`) width, with a clear code
    /// forced every 254 pixels so the decoder's implicit dictionary never
    /// needs to widen past that width.
    pub fn encode_uncompressed(&self, data: &[u8], output: &mut Vec<u8>) {
        output.push(self.min_code_size());
        let mut packets = PacketWriter::new(output);
        let mut bits = BitWriter::new(&mut packets);

        let clear_code = self.clear_code();
        let eoi_code = self.eoi_code();
        let code_width = self.bits_per_pixel + 1;
        const PIXELS_BEFORE_RECLEAR: u32 = 254;

        bits.write_code(clear_code, code_width);
        let mut since_clear = 0u32;
        for &byte in data {
            bits.write_code(byte as u16, code_width);
            since_clear += 1;
            if since_clear == PIXELS_BEFORE_RECLEAR {
                bits.write_code(clear_code, code_width);
                since_clear = 0;
            }
        }
        bits.write_code(eoi_code, code_width);
        bits.finish();
        packets.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal LZW decoder, used only to verify the encoder's round-trip
    /// property (spec §8 property 6). Not part of the shipped writer.
    fn decode(encoded: &[u8]) -> Vec<u8> {
        let min_code_size = encoded[0];
        let mut bytes = Vec::new();
        let mut i = 1usize;
        while encoded[i] != 0 {
            let len = encoded[i] as usize;
            bytes.extend_from_slice(&encoded[i + 1..i + 1 + len]);
            i += 1 + len;
        }

        let clear_code = 1u16 << min_code_size;
        let eoi_code = clear_code + 1;
        let mut code_width = min_code_size + 1;

        let mut bitpos = 0usize;
        let read_code = |bitpos: &mut usize, width: u8| -> u16 {
            let mut value = 0u32;
            for b in 0..width {
                let byte_idx = (*bitpos + b as usize) / 8;
                let bit_idx = (*bitpos + b as usize) % 8;
                let bit = (bytes[byte_idx] >> bit_idx) & 1;
                value |= (bit as u32) << b;
            }
            *bitpos += width as usize;
            value as u16
        };

        let mut dict: Vec<Vec<u8>> = (0..clear_code).map(|c| vec![c as u8]).collect();
        let mut output = Vec::new();
        let mut prev: Option<Vec<u8>> = None;

        loop {
            let code = read_code(&mut bitpos, code_width);
            if code == eoi_code {
                break;
            }
            if code == clear_code {
                dict = (0..clear_code).map(|c| vec![c as u8]).collect();
                code_width = min_code_size + 1;
                prev = None;
                continue;
            }

            let entry = if (code as usize) < dict.len() {
                dict[code as usize].clone()
            } else if let Some(p) = &prev {
                let mut e = p.clone();
                e.push(p[0]);
                e
            } else {
                panic!("invalid LZW stream");
            };

            output.extend_from_slice(&entry);

            if let Some(p) = prev {
                let mut new_entry = p.clone();
                new_entry.push(entry[0]);
                dict.push(new_entry);
                if dict.len() as u32 + 2 > (1u32 << code_width) && code_width < MAX_CODE_WIDTH {
                    code_width += 1;
                }
            }
            prev = Some(entry);
        }

        output
    }

    #[test]
    fn compressed_round_trip_reproduces_input() {
        let data: Vec<u8> = (0..2000u32).map(|i| ((i / 10) % 4) as u8).collect();
        let encoder = LzwEncoder::new(2);
        let mut out = Vec::new();
        encoder.encode_compressed(&data, &mut out);
        assert_eq!(decode(&out), data);
    }

    #[test]
    fn compressed_round_trip_handles_dictionary_reset() {
        let data: Vec<u8> = (0..20000u32).map(|i| (i % 8) as u8).collect();
        let encoder = LzwEncoder::new(3);
        let mut out = Vec::new();
        encoder.encode_compressed(&data, &mut out);
        assert_eq!(decode(&out), data);
    }

    #[test]
    fn uncompressed_round_trip_reproduces_input() {
        let data = vec![0u8, 1, 0, 1, 1, 1, 0];
        let encoder = LzwEncoder::new(2);
        let mut out = Vec::new();
        encoder.encode_uncompressed(&data, &mut out);
        assert_eq!(decode(&out), data);
    }

    #[test]
    fn uncompressed_mode_clears_every_254_pixels() {
        let data = vec![3u8; 600];
        let encoder = LzwEncoder::new(2);
        let mut out = Vec::new();
        encoder.encode_uncompressed(&data, &mut out);
        assert_eq!(decode(&out), data);
    }

    #[test]
    fn data_blocks_end_with_empty_terminator() {
        let encoder = LzwEncoder::new(8);
        let mut out = Vec::new();
        encoder.encode_compressed(&[1, 2, 3], &mut out);
        assert_eq!(*out.last().unwrap(), 0);
    }
}
