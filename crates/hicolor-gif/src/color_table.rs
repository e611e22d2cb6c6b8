use hicolor_core::Color;

/// Smallest `n` in 0..=7 with `2^(n+1) >= used_entry_count` (spec §4.F
/// color-table size rounding).
pub fn size_bits(used_entry_count: usize) -> u8 {
    for n in 0..=7u8 {
        if (1usize << (n + 1)) >= used_entry_count.max(1) {
            return n;
        }
    }
    7
}

/// Writes a color table padded to `2^(n+1)` entries with (0,0,0), per the
/// GIF89a block layout.
pub fn write_color_table(output: &mut Vec<u8>, colors: &[Color], n: u8) {
    let table_size = 1usize << (n + 1);
    for color in colors.iter().take(table_size) {
        output.extend_from_slice(&[color.r, color.g, color.b]);
    }
    for _ in colors.len().min(table_size)..table_size {
        output.extend_from_slice(&[0, 0, 0]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_bits_rounds_up_to_smallest_power_of_two() {
        assert_eq!(size_bits(1), 0);
        assert_eq!(size_bits(2), 0);
        assert_eq!(size_bits(3), 1);
        assert_eq!(size_bits(4), 1);
        assert_eq!(size_bits(5), 2);
        assert_eq!(size_bits(256), 7);
    }

    #[test]
    fn write_color_table_pads_unused_entries_with_black() {
        let mut out = Vec::new();
        write_color_table(&mut out, &[Color::rgb(1, 2, 3)], 1);
        assert_eq!(out.len(), 4 * 3);
        assert_eq!(&out[0..3], &[1, 2, 3]);
        assert_eq!(&out[3..6], &[0, 0, 0]);
    }
}
