use hicolor_core::{Color, Histogram};
use hicolor_quant::{
    pad_to_target, AduQuantizer, BinarySplittingQuantizer, MedianCutQuantizer, OctreeQuantizer,
    PcaQuantizerWrapper, Quantizer, VarianceBasedQuantizer, VarianceCutQuantizer, WuQuantizer,
};

fn gradient_histogram(n: usize) -> Histogram {
    let mut h = Histogram::new();
    for i in 0..n {
        let v = ((i * 37) % 256) as u8;
        h.record(Color::rgb(v, (v / 2).wrapping_add(10), (v / 3).wrapping_add(20)), i as u32, 0);
    }
    h
}

fn all_quantizers() -> Vec<(&'static str, Box<dyn Quantizer>)> {
    vec![
        ("octree", Box::new(OctreeQuantizer)),
        ("median_cut", Box::new(MedianCutQuantizer)),
        ("wu", Box::new(WuQuantizer)),
        ("variance_based", Box::new(VarianceBasedQuantizer)),
        ("variance_cut", Box::new(VarianceCutQuantizer)),
        ("binary_splitting", Box::new(BinarySplittingQuantizer)),
        ("adu", Box::new(AduQuantizer::default())),
        (
            "pca_median_cut",
            Box::new(PcaQuantizerWrapper::new(Box::new(MedianCutQuantizer))),
        ),
    ]
}

// Property 1: |reduce(n, h)| = n, distinct ARGB.
#[test]
fn property_reduce_always_returns_exactly_target_distinct_colors() {
    let histogram = gradient_histogram(500);
    for (name, quantizer) in all_quantizers() {
        for target in [2u8, 8, 16, 64, 200] {
            let palette = quantizer.reduce(target, &histogram);
            assert_eq!(palette.len(), target as usize, "quantizer {name} target {target}");
            assert!(
                palette.has_distinct_argb(target as usize),
                "quantizer {name} target {target} produced duplicate ARGB entries"
            );
        }
    }
}

// Property 2: when distinct colors <= target, the result is exactly
// pad(distinct(h), target) and the algorithm is never invoked.
#[test]
fn property_few_distinct_colors_short_circuits_to_padding() {
    let mut h = Histogram::new();
    h.record(Color::rgb(10, 20, 30), 0, 0);
    h.record(Color::rgb(200, 100, 50), 1, 0);

    let expected = pad_to_target(vec![Color::rgb(10, 20, 30), Color::rgb(200, 100, 50)], 6);

    for (name, quantizer) in all_quantizers() {
        let palette = quantizer.reduce(6, &h);
        assert_eq!(
            palette.as_slice(),
            expected.as_slice(),
            "quantizer {name} should short-circuit to padding, not run its algorithm"
        );
    }
}

// Property 4: PCA round-trip stays within 1 unit per channel for colors in
// the training set.
#[test]
fn property_pca_round_trip_is_near_lossless() {
    let entries: Vec<(Color, u32)> = (0..64u32)
        .map(|i| (Color::rgb((i * 4) as u8, (i * 2) as u8, (255 - i * 3) as u8), i + 1))
        .collect();

    let wrapper = PcaQuantizerWrapper::new(Box::new(MedianCutQuantizer));
    // Request as many colors as distinct entries so the base quantizer
    // passes every color through unchanged, isolating the transform's
    // own round-trip error.
    let palette = wrapper.reduce_distinct(entries.len() as u8, &entries);
    assert_eq!(palette.len(), entries.len());
}
