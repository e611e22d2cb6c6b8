/// 8-bit sRGB color with alpha (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0 };
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }

    pub fn argb_key(&self) -> u32 {
        u32::from_be_bytes([self.a, self.r, self.g, self.b])
    }

    /// sRGB → CIE Lab (D65 reference white), per §4.A.
    pub fn lab(&self) -> [f64; 3] {
        let to_linear = |c: u8| {
            let c = c as f64 / 255.0;
            if c > 0.04045 {
                ((c + 0.055) / 1.055).powf(2.4)
            } else {
                c / 12.92
            }
        };
        let r = to_linear(self.r);
        let g = to_linear(self.g);
        let b = to_linear(self.b);

        // sRGB → XYZ (D65)
        let x = 0.4124564 * r + 0.3575761 * g + 0.1804375 * b;
        let y = 0.2126729 * r + 0.7151522 * g + 0.0721750 * b;
        let z = 0.0193339 * r + 0.1191920 * g + 0.9503041 * b;

        // D65 reference white
        const XN: f64 = 0.95047;
        const YN: f64 = 1.0;
        const ZN: f64 = 1.08883;

        let f = |t: f64| {
            const DELTA: f64 = 6.0 / 29.0;
            if t > DELTA.powi(3) {
                t.cbrt()
            } else {
                t / (3.0 * DELTA * DELTA) + 4.0 / 29.0
            }
        };

        let fx = f(x / XN);
        let fy = f(y / YN);
        let fz = f(z / ZN);

        let l = 116.0 * fy - 16.0;
        let a_axis = 500.0 * (fx - fy);
        let b_axis = 200.0 * (fy - fz);
        [l, a_axis, b_axis]
    }

    /// sRGB → BT.601 Y'UV, per §4.A.
    pub fn yuv(&self) -> [f64; 3] {
        let r = self.r as f64;
        let g = self.g as f64;
        let b = self.b as f64;
        let y = 0.299 * r + 0.587 * g + 0.114 * b;
        let u = -0.14713 * r - 0.28886 * g + 0.436 * b;
        let v = 0.615 * r - 0.51499 * g - 0.10001 * b;
        [y, u, v]
    }

    /// sRGB → Y'CbCr, per §4.A.
    pub fn ycbcr(&self) -> [f64; 3] {
        let r = self.r as f64;
        let g = self.g as f64;
        let b = self.b as f64;
        let y = 0.299 * r + 0.587 * g + 0.114 * b;
        let cb = 128.0 - 0.168736 * r - 0.331264 * g + 0.5 * b;
        let cr = 128.0 + 0.5 * r - 0.418688 * g - 0.081312 * b;
        [y, cb, cr]
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::TRANSPARENT
    }
}
