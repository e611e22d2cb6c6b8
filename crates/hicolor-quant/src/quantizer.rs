use hicolor_core::{Color, Histogram, Palette};

/// Common contract for every quantizer (spec §4.C): reduce a histogram to
/// a palette of exactly `target` colors.
pub trait Quantizer {
    /// Algorithm-specific reduction, invoked only when `distinct colors >
    /// target` (the base `reduce` below handles every other case per the
    /// normalization rules).
    fn reduce_distinct(&self, target: u8, entries: &[(Color, u32)]) -> Vec<Color>;

    /// Full `reduce(target, histogram) -> Palette` contract, applying the
    /// normalization rules of §4.C before/after delegating to
    /// `reduce_distinct`.
    fn reduce(&self, target: u8, histogram: &Histogram) -> Palette {
        reduce_with(self, target, histogram)
    }
}

fn reduce_with<Q: Quantizer + ?Sized>(q: &Q, target: u8, histogram: &Histogram) -> Palette {
    // Rule 1: target = 0 -> empty palette.
    if target == 0 {
        return Palette::new();
    }

    // Rule 3: dedup by ARGB (the histogram is already keyed by Color, so
    // this is the histogram's entry set).
    let mut entries: Vec<(Color, u32)> = histogram.iter().map(|(c, n)| (*c, n)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.argb_key().cmp(&b.0.argb_key())));

    // Rule 2: target = 1 -> first color of input, or transparent if empty.
    if target == 1 {
        let color = entries.first().map(|(c, _)| *c).unwrap_or(Color::TRANSPARENT);
        return Palette::from_colors(vec![color]);
    }

    let distinct = entries.len();

    let colors = if distinct <= target as usize {
        // Rule 4: use the distinct colors verbatim, skip the algorithm.
        entries.into_iter().map(|(c, _)| c).collect()
    } else {
        q.reduce_distinct(target, &entries)
    };

    pad_to_target(colors, target)
}

/// Normalization rule 5: pad a short result to exactly `target` colors.
pub fn pad_to_target(mut colors: Vec<Color>, target: u8) -> Palette {
    let target = target as usize;
    if colors.len() > target {
        colors.truncate(target);
        return Palette::from_colors(colors);
    }

    let mut present: std::collections::HashSet<u32> =
        colors.iter().map(|c| c.argb_key()).collect();

    let mut push_if_new = |colors: &mut Vec<Color>, present: &mut std::collections::HashSet<u32>, c: Color| {
        if colors.len() < target && present.insert(c.argb_key()) {
            colors.push(c);
        }
    };

    for c in [Color::BLACK, Color::WHITE, Color::TRANSPARENT] {
        if colors.len() >= target {
            break;
        }
        push_if_new(&mut colors, &mut present, c);
    }

    // 7-hue wheel x 5 shade factors.
    const HUES: [(f64, f64, f64); 7] = [
        (1.0, 0.0, 0.0),
        (1.0, 0.5, 0.0),
        (1.0, 1.0, 0.0),
        (0.0, 1.0, 0.0),
        (0.0, 0.0, 1.0),
        (0.29, 0.0, 0.51),
        (0.56, 0.0, 1.0),
    ];
    const SHADES: [f64; 5] = [1.0, 0.75, 0.5, 0.25, 0.1];

    'wheel: for shade in SHADES {
        for (r, g, b) in HUES {
            if colors.len() >= target {
                break 'wheel;
            }
            let c = Color::rgb(
                (r * shade * 255.0).round() as u8,
                (g * shade * 255.0).round() as u8,
                (b * shade * 255.0).round() as u8,
            );
            push_if_new(&mut colors, &mut present, c);
        }
    }

    // Pseudorandom fallback: (37i mod 256, 73i mod 256, 109i mod 256).
    let mut i: u32 = 1;
    while colors.len() < target {
        let c = Color::rgb(
            ((37 * i) % 256) as u8,
            ((73 * i) % 256) as u8,
            ((109 * i) % 256) as u8,
        );
        push_if_new(&mut colors, &mut present, c);
        i += 1;
        if i > 100_000 {
            // InternalInvariant (spec §7): padding must always reach
            // `target` given the 24-bit color space has far more than
            // 256 candidates; failing here is a bug, not user error.
            unreachable!("palette padding could not reach target size");
        }
    }

    Palette::from_colors(colors)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Identity;
    impl Quantizer for Identity {
        fn reduce_distinct(&self, target: u8, entries: &[(Color, u32)]) -> Vec<Color> {
            entries.iter().take(target as usize).map(|(c, _)| *c).collect()
        }
    }

    #[test]
    fn target_zero_is_empty() {
        let mut h = Histogram::new();
        h.record(Color::BLACK, 0, 0);
        assert_eq!(Identity.reduce(0, &h).len(), 0);
    }

    #[test]
    fn target_one_is_first_color_or_transparent() {
        let h = Histogram::new();
        assert_eq!(Identity.reduce(1, &h).get(0), Some(Color::TRANSPARENT));
    }

    #[test]
    fn fewer_distinct_than_target_uses_them_verbatim_then_pads() {
        let mut h = Histogram::new();
        h.record(Color::rgb(1, 2, 3), 0, 0);
        let palette = Identity.reduce(4, &h);
        assert_eq!(palette.len(), 4);
        assert_eq!(palette.get(0), Some(Color::rgb(1, 2, 3)));
        assert!(palette.has_distinct_argb(4));
    }

    #[test]
    fn padding_never_duplicates_argb() {
        let palette = pad_to_target(vec![Color::BLACK], 256);
        assert_eq!(palette.len(), 256);
        assert!(palette.has_distinct_argb(256));
    }
}
