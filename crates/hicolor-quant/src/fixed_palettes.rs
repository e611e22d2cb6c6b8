use hicolor_core::{Color, Palette};

use crate::quantizer::Quantizer;

/// The 16-color EGA palette (spec §4.C.10).
pub fn ega16() -> Palette {
    const LEVELS: [(u8, u8, u8); 16] = [
        (0, 0, 0),
        (0, 0, 170),
        (0, 170, 0),
        (0, 170, 170),
        (170, 0, 0),
        (170, 0, 170),
        (170, 85, 0),
        (170, 170, 170),
        (85, 85, 85),
        (85, 85, 255),
        (85, 255, 85),
        (85, 255, 255),
        (255, 85, 85),
        (255, 85, 255),
        (255, 255, 85),
        (255, 255, 255),
    ];
    Palette::from_colors(LEVELS.iter().map(|&(r, g, b)| Color::rgb(r, g, b)).collect())
}

/// The 216-color web-safe cube: 6^3 steps of {0, 51, 102, 153, 204, 255}.
pub fn web_safe() -> Palette {
    const STEPS: [u8; 6] = [0, 51, 102, 153, 204, 255];
    let mut colors = Vec::with_capacity(216);
    for r in STEPS {
        for g in STEPS {
            for b in STEPS {
                colors.push(Color::rgb(r, g, b));
            }
        }
    }
    Palette::from_colors(colors)
}

/// Classic Mac 8-bit palette: an 8x8x4 grid over RG steps {0,36,73,109,
/// 146,182,219,255} and B steps {0,85,170,255} (spec §4.C.10).
pub fn mac_8bit() -> Palette {
    const RG_STEPS: [u8; 8] = [0, 36, 73, 109, 146, 182, 219, 255];
    const B_STEPS: [u8; 4] = [0, 85, 170, 255];
    let mut colors = Vec::with_capacity(8 * 8 * 4);
    for r in RG_STEPS {
        for g in RG_STEPS {
            for b in B_STEPS {
                colors.push(Color::rgb(r, g, b));
            }
        }
    }
    Palette::from_colors(colors)
}

/// VGA 256-color palette: EGA16 ∪ web-safe ∪ 24 grayscale steps.
pub fn vga256() -> Palette {
    let mut colors: Vec<Color> = ega16().iter().copied().collect();
    colors.extend(web_safe().iter().copied());
    for i in 0..24u32 {
        let v = (8 + 10 * i).min(255) as u8;
        colors.push(Color::rgb(v, v, v));
    }
    colors.truncate(256);
    Palette::from_colors(colors)
}

macro_rules! fixed_palette_quantizer {
    ($name:ident, $table:expr) => {
        /// Quantizes by taking the first `target` entries of the baked-in
        /// table, ignoring the histogram (spec §4.C.10).
        pub struct $name;

        impl Quantizer for $name {
            fn reduce_distinct(&self, target: u8, _entries: &[(Color, u32)]) -> Vec<Color> {
                $table.iter().copied().take(target as usize).collect()
            }
        }
    };
}

fixed_palette_quantizer!(Ega16Quantizer, ega16());
fixed_palette_quantizer!(WebSafeQuantizer, web_safe());
fixed_palette_quantizer!(Mac8BitQuantizer, mac_8bit());
fixed_palette_quantizer!(Vga256Quantizer, vga256());

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ega16_has_sixteen_colors() {
        assert_eq!(ega16().len(), 16);
    }

    #[test]
    fn web_safe_has_216_colors() {
        assert_eq!(web_safe().len(), 216);
    }

    #[test]
    fn mac_8bit_has_256_colors() {
        assert_eq!(mac_8bit().len(), 256);
    }

    #[test]
    fn vga256_caps_at_256() {
        assert_eq!(vga256().len(), 256);
    }
}
