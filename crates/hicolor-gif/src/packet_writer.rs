/// Buffers GIF data sub-blocks: up to 255 payload bytes per block, each
/// preceded by its own length byte, terminated by an empty block (spec
/// §4.F). The `BitWriter` drains whole bytes into this as they form.
pub struct PacketWriter<'a> {
    output: &'a mut Vec<u8>,
    current: Vec<u8>,
}

impl<'a> PacketWriter<'a> {
    pub fn new(output: &'a mut Vec<u8>) -> Self {
        PacketWriter {
            output,
            current: Vec::with_capacity(255),
        }
    }

    pub fn push_byte(&mut self, byte: u8) {
        self.current.push(byte);
        if self.current.len() == 255 {
            self.flush_block();
        }
    }

    fn flush_block(&mut self) {
        if self.current.is_empty() {
            return;
        }
        self.output.push(self.current.len() as u8);
        self.output.extend_from_slice(&self.current);
        self.current.clear();
    }

    /// Flush any partial sub-block and emit the terminating empty block.
    pub fn finish(mut self) {
        self.flush_block();
        self.output.push(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_short_block_is_length_prefixed_and_terminated() {
        let mut out = Vec::new();
        {
            let mut packets = PacketWriter::new(&mut out);
            for b in [1u8, 2, 3] {
                packets.push_byte(b);
            }
            packets.finish();
        }
        assert_eq!(out, vec![3, 1, 2, 3, 0]);
    }

    #[test]
    fn exact_255_bytes_flushes_one_full_block_plus_empty_terminator() {
        let mut out = Vec::new();
        {
            let mut packets = PacketWriter::new(&mut out);
            for _ in 0..255 {
                packets.push_byte(7);
            }
            packets.finish();
        }
        assert_eq!(out[0], 255);
        assert_eq!(out.len(), 1 + 255 + 1);
        assert_eq!(*out.last().unwrap(), 0);
    }

    #[test]
    fn spans_multiple_blocks_past_255_bytes() {
        let mut out = Vec::new();
        {
            let mut packets = PacketWriter::new(&mut out);
            for i in 0..300u32 {
                packets.push_byte((i % 256) as u8);
            }
            packets.finish();
        }
        assert_eq!(out[0], 255);
        assert_eq!(out[256], 45); // second block length: 300 - 255
        assert_eq!(*out.last().unwrap(), 0);
    }
}
