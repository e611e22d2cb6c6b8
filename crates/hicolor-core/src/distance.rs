//! Color distance metrics (spec §4.A): a uniform `distance(c1, c2)`
//! interface over 13 named metrics, monotone in perceived difference.

use crate::color::Color;

/// Published per-channel weight sets for the weighted metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelWeights {
    /// BT.709 luma coefficients, R 2126 / G 7152 / B 722 over 10000.
    Bt709,
    /// Nommyde weights, R 4984 / G 8625 / B 2979 over 10000.
    Nommyde,
    LowRed,
    HighRed,
}

impl ChannelWeights {
    fn rgb(self) -> (f64, f64, f64) {
        match self {
            ChannelWeights::Bt709 => (0.2126, 0.7152, 0.0722),
            ChannelWeights::Nommyde => (0.4984, 0.8625, 0.2979),
            ChannelWeights::LowRed => (2.0, 4.0, 3.0),
            ChannelWeights::HighRed => (3.0, 4.0, 2.0),
        }
    }
}

/// CIE94 application-specific constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cie94Variant {
    Textiles,
    GraphicArts,
}

impl Cie94Variant {
    fn constants(self) -> (f64, f64, f64) {
        // (kL, k1, k2)
        match self {
            Cie94Variant::Textiles => (2.0, 0.048, 0.014),
            Cie94Variant::GraphicArts => (1.0, 0.045, 0.015),
        }
    }
}

/// The 13 distance metrics specified by §4.A, unified behind `distance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceMetric {
    Euclidean,
    EuclideanAlpha,
    Manhattan,
    ManhattanAlpha,
    WeightedEuclidean(ChannelWeights),
    WeightedManhattan(ChannelWeights),
    WeightedYuv,
    WeightedYCbCr,
    CompuPhase,
    PngQuant,
    Cie94(Cie94Variant),
    Ciede2000,
}

impl Default for DistanceMetric {
    fn default() -> Self {
        // §4.B: default metric is CompuPhase when unspecified.
        DistanceMetric::CompuPhase
    }
}

impl DistanceMetric {
    pub fn distance(&self, c1: Color, c2: Color) -> u32 {
        match self {
            DistanceMetric::Euclidean => euclidean(c1, c2, false),
            DistanceMetric::EuclideanAlpha => euclidean(c1, c2, true),
            DistanceMetric::Manhattan => manhattan(c1, c2, false),
            DistanceMetric::ManhattanAlpha => manhattan(c1, c2, true),
            DistanceMetric::WeightedEuclidean(w) => weighted_euclidean(c1, c2, *w),
            DistanceMetric::WeightedManhattan(w) => weighted_manhattan(c1, c2, *w),
            DistanceMetric::WeightedYuv => weighted_yuv(c1, c2),
            DistanceMetric::WeightedYCbCr => weighted_ycbcr(c1, c2),
            DistanceMetric::CompuPhase => compuphase(c1, c2),
            DistanceMetric::PngQuant => pngquant(c1, c2, (255, 255, 255, 255)),
            DistanceMetric::Cie94(variant) => cie94(c1, c2, *variant),
            DistanceMetric::Ciede2000 => ciede2000(c1, c2),
        }
    }
}

fn diff(a: u8, b: u8) -> i64 {
    a as i64 - b as i64
}

fn euclidean(c1: Color, c2: Color, with_alpha: bool) -> u32 {
    let dr = diff(c1.r, c2.r);
    let dg = diff(c1.g, c2.g);
    let db = diff(c1.b, c2.b);
    let mut sum = dr * dr + dg * dg + db * db;
    if with_alpha {
        let da = diff(c1.a, c2.a);
        sum += da * da;
    }
    sum as u32
}

fn manhattan(c1: Color, c2: Color, with_alpha: bool) -> u32 {
    let mut sum = diff(c1.r, c2.r).abs() + diff(c1.g, c2.g).abs() + diff(c1.b, c2.b).abs();
    if with_alpha {
        sum += diff(c1.a, c2.a).abs();
    }
    sum as u32
}

fn weighted_euclidean(c1: Color, c2: Color, weights: ChannelWeights) -> u32 {
    let (wr, wg, wb) = weights.rgb();
    let dr = diff(c1.r, c2.r) as f64;
    let dg = diff(c1.g, c2.g) as f64;
    let db = diff(c1.b, c2.b) as f64;
    (wr * dr * dr + wg * dg * dg + wb * db * db).round() as u32
}

fn weighted_manhattan(c1: Color, c2: Color, weights: ChannelWeights) -> u32 {
    let (wr, wg, wb) = weights.rgb();
    let dr = diff(c1.r, c2.r).abs() as f64;
    let dg = diff(c1.g, c2.g).abs() as f64;
    let db = diff(c1.b, c2.b).abs() as f64;
    (wr * dr + wg * dg + wb * db).round() as u32
}

/// BT.601 Y'UV distance with default weights (6, 2, 2, 10) normalized by
/// sum, applied to (ΔY, ΔU, ΔV, ΔA).
fn weighted_yuv(c1: Color, c2: Color) -> u32 {
    let yuv1 = c1.yuv();
    let yuv2 = c2.yuv();
    let dy = yuv1[0] - yuv2[0];
    let du = yuv1[1] - yuv2[1];
    let dv = yuv1[2] - yuv2[2];
    let da = diff(c1.a, c2.a) as f64;
    let sum = 6.0 + 2.0 + 2.0 + 10.0;
    let (wy, wu, wv, wa) = (6.0 / sum, 2.0 / sum, 2.0 / sum, 10.0 / sum);
    (wy * dy * dy + wu * du * du + wv * dv * dv + wa * da * da).round() as u32
}

fn weighted_ycbcr(c1: Color, c2: Color) -> u32 {
    let y1 = c1.ycbcr();
    let y2 = c2.ycbcr();
    let dy = y1[0] - y2[0];
    let dcb = y1[1] - y2[1];
    let dcr = y1[2] - y2[2];
    let da = diff(c1.a, c2.a) as f64;
    let (wy, wcb, wcr, wa) = (2.0 / 5.0, 1.0 / 5.0, 1.0 / 5.0, 1.0 / 5.0);
    (wy * dy * dy + wcb * dcb * dcb + wcr * dcr * dcr + wa * da * da).round() as u32
}

/// "Low-cost approximation" (§4.A), integer arithmetic only.
fn compuphase(c1: Color, c2: Color) -> u32 {
    let r_bar = (c1.r as i64 + c2.r as i64) / 2;
    let dr = diff(c1.r, c2.r);
    let dg = diff(c1.g, c2.g);
    let db = diff(c1.b, c2.b);
    let da = diff(c1.a, c2.a);
    let term_r = ((512 + r_bar) * dr * dr) >> 8;
    let term_g = 4 * dg * dg;
    let term_b = ((767 - r_bar) * db * db) >> 8;
    let term_a = da * da;
    (term_r + term_g + term_b + term_a) as u32
}

/// Blend-on-black vs blend-on-white per channel, prescaled by a white
/// point (default (255,255,255,255) = equal weight), per §4.A.
fn pngquant(c1: Color, c2: Color, white_point: (u16, u16, u16, u16)) -> u32 {
    let scale = |v: u8, wp: u16| v as f64 * wp as f64 / 255.0;

    let a1 = c1.a as f64 / 255.0;
    let a2 = c2.a as f64 / 255.0;

    let blend = |v: u8, a: f64, on_white: bool, wp: u16| {
        let base = if on_white { 255.0 } else { 0.0 };
        scale(v, wp) * a + base * (1.0 - a)
    };

    let mut total = 0.0f64;
    for (v1, v2, wp) in [
        (c1.r, c2.r, white_point.0),
        (c1.g, c2.g, white_point.1),
        (c1.b, c2.b, white_point.2),
    ] {
        let black_diff = blend(v1, a1, false, wp) - blend(v2, a2, false, wp);
        let white_diff = blend(v1, a1, true, wp) - blend(v2, a2, true, wp);
        total += black_diff * black_diff + white_diff * white_diff;
    }
    let da = (c1.a as f64 - c2.a as f64) * white_point.3 as f64 / 255.0;
    total += da * da;
    total.round() as u32
}

fn cie94(c1: Color, c2: Color, variant: Cie94Variant) -> u32 {
    let (kl, k1, k2) = variant.constants();
    let lab1 = c1.lab();
    let lab2 = c2.lab();

    let dl = lab1[0] - lab2[0];
    let c1_chroma = (lab1[1] * lab1[1] + lab1[2] * lab1[2]).sqrt();
    let c2_chroma = (lab2[1] * lab2[1] + lab2[2] * lab2[2]).sqrt();
    let dc = c1_chroma - c2_chroma;
    let da = lab1[1] - lab2[1];
    let db = lab1[2] - lab2[2];
    let dh_sq = (da * da + db * db - dc * dc).max(0.0);

    let sl = 1.0;
    let sc = 1.0 + k1 * c1_chroma;
    let sh = 1.0 + k2 * c1_chroma;

    let term = (dl / (kl * sl)).powi(2) + (dc / sc).powi(2) + dh_sq / (sh * sh);
    // (ΔE)²·100 cast to integer, per §4.A.
    (term * 100.0).round() as u32
}

/// Full CIEDE2000 formula (G correction, hue-bar wrapping, rotation term
/// RT, SL/SC/SH weighting), per §4.A.
fn ciede2000(c1: Color, c2: Color) -> u32 {
    let lab1 = c1.lab();
    let lab2 = c2.lab();

    let (l1, a1, b1) = (lab1[0], lab1[1], lab1[2]);
    let (l2, a2, b2) = (lab2[0], lab2[1], lab2[2]);

    let c1m = (a1 * a1 + b1 * b1).sqrt();
    let c2m = (a2 * a2 + b2 * b2).sqrt();
    let c_bar = (c1m + c2m) / 2.0;

    let c_bar7 = c_bar.powi(7);
    const POW25_7: f64 = 6103515625.0; // 25^7
    let g = 0.5 * (1.0 - (c_bar7 / (c_bar7 + POW25_7)).sqrt());

    let a1p = a1 * (1.0 + g);
    let a2p = a2 * (1.0 + g);

    let c1p = (a1p * a1p + b1 * b1).sqrt();
    let c2p = (a2p * a2p + b2 * b2).sqrt();

    let hue = |a: f64, b: f64| -> f64 {
        if a == 0.0 && b == 0.0 {
            0.0
        } else {
            let h = b.atan2(a).to_degrees();
            if h < 0.0 { h + 360.0 } else { h }
        }
    };
    let h1p = hue(a1p, b1);
    let h2p = hue(a2p, b2);

    let dlp = l2 - l1;
    let dcp = c2p - c1p;

    let dhp = if c1p * c2p == 0.0 {
        0.0
    } else {
        let mut dh = h2p - h1p;
        if dh > 180.0 {
            dh -= 360.0;
        } else if dh < -180.0 {
            dh += 360.0;
        }
        dh
    };
    let dhp_big = 2.0 * (c1p * c2p).sqrt() * (dhp.to_radians() / 2.0).sin();

    let l_bar_p = (l1 + l2) / 2.0;
    let c_bar_p = (c1p + c2p) / 2.0;

    let h_bar_p = if c1p * c2p == 0.0 {
        h1p + h2p
    } else {
        let sum = h1p + h2p;
        if (h1p - h2p).abs() > 180.0 {
            if sum < 360.0 { (sum + 360.0) / 2.0 } else { (sum - 360.0) / 2.0 }
        } else {
            sum / 2.0
        }
    };

    let t = 1.0
        - 0.17 * (h_bar_p - 30.0).to_radians().cos()
        + 0.24 * (2.0 * h_bar_p).to_radians().cos()
        + 0.32 * (3.0 * h_bar_p + 6.0).to_radians().cos()
        - 0.20 * (4.0 * h_bar_p - 63.0).to_radians().cos();

    let d_theta = 30.0 * (-((h_bar_p - 275.0) / 25.0).powi(2)).exp();
    let c_bar_p7 = c_bar_p.powi(7);
    let rc = 2.0 * (c_bar_p7 / (c_bar_p7 + POW25_7)).sqrt();
    let rt = -rc * (2.0 * d_theta.to_radians()).sin();

    let sl = 1.0 + (0.015 * (l_bar_p - 50.0).powi(2)) / (20.0 + (l_bar_p - 50.0).powi(2)).sqrt();
    let sc = 1.0 + 0.045 * c_bar_p;
    let sh = 1.0 + 0.015 * c_bar_p * t;

    const KL: f64 = 1.0;
    const KC: f64 = 1.0;
    const KH: f64 = 1.0;

    let term_l = dlp / (KL * sl);
    let term_c = dcp / (KC * sc);
    let term_h = dhp_big / (KH * sh);

    let de2 = term_l * term_l + term_c * term_c + term_h * term_h
        + rt * term_c * term_h;

    // (ΔE)²·100 cast to integer, per §4.A; clamp negative rounding noise.
    (de2.max(0.0) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compuphase_matches_scenario_4() {
        let red = Color::rgb(255, 0, 0);
        let blue = Color::rgb(0, 0, 255);
        assert_eq!(compuphase(red, blue), 416_287);
    }

    #[test]
    fn euclidean_is_zero_for_identical_colors() {
        let c = Color::rgb(10, 20, 30);
        assert_eq!(DistanceMetric::Euclidean.distance(c, c), 0);
    }

    #[test]
    fn ciede2000_is_symmetric() {
        let a = Color::rgb(200, 50, 90);
        let b = Color::rgb(40, 180, 10);
        let d_ab = ciede2000(a, b);
        let d_ba = ciede2000(b, a);
        assert!((d_ab as i64 - d_ba as i64).abs() <= 1);
    }

    #[test]
    fn ciede2000_is_zero_for_identical_colors() {
        let c = Color::rgb(128, 64, 200);
        assert_eq!(ciede2000(c, c), 0);
    }

    #[test]
    fn cie94_variants_differ() {
        let a = Color::rgb(255, 0, 0);
        let b = Color::rgb(0, 255, 0);
        let textiles = cie94(a, b, Cie94Variant::Textiles);
        let graphic_arts = cie94(a, b, Cie94Variant::GraphicArts);
        assert_ne!(textiles, graphic_arts);
    }
}
