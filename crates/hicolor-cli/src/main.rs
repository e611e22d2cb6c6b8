use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;

use hicolor_core::{Color, LoopCount};
use hicolor_dither::{BayerSize, Ditherer, Kernel, KnollDitherer, MatrixBasedDitherer, NoDither, NoiseDitherer, NoiseSpectrum, OrderedDitherer, RiemersmaDitherer};
use hicolor_gif::GifWriter;
use hicolor_layer::{ColorOrdering as LayerColorOrdering, HiColorLayerer, LayerConfig};
use hicolor_quant::{AduQuantizer, BinarySplittingQuantizer, MedianCutQuantizer, OctreeQuantizer, Quantizer, VarianceBasedQuantizer, VarianceCutQuantizer, WuQuantizer};

/// Converts a still truecolor image into a hi-color-layered animated GIF.
#[derive(Parser, Debug)]
#[command(name = "hicolor-cli")]
#[command(about = "Still image -> hi-color layered GIF89a")]
struct Args {
    /// Input image path (any format the `image` crate decodes).
    #[arg(long, value_name = "FILE")]
    input: PathBuf,

    /// Output GIF path.
    #[arg(long, value_name = "FILE")]
    output: PathBuf,

    /// Maximum colors carried by a single sub-frame.
    #[arg(long, default_value_t = 255)]
    max_colors: u8,

    /// Quantizer used for the optional background frame.
    #[arg(long, value_enum, default_value_t = QuantizerChoice::Wu)]
    quantizer: QuantizerChoice,

    /// Ditherer used when emitting the background frame.
    #[arg(long, value_enum, default_value_t = DithererChoice::FloydSteinberg)]
    ditherer: DithererChoice,

    /// Order in which distinct colors are assigned to sub-frame windows.
    #[arg(long, value_enum, default_value_t = OrderingChoice::MostUsedFirst)]
    ordering: OrderingChoice,

    /// Emit an initial full-image background frame before the sparse layers.
    #[arg(long)]
    background: bool,

    /// Have every sparse frame fill unscheduled colors with their nearest
    /// in-frame match, instead of leaving them transparent.
    #[arg(long)]
    back_fill: bool,

    /// Minimum duration of one sub-frame, in milliseconds.
    #[arg(long, default_value_t = 10)]
    min_frame_ms: u64,

    /// Total animation duration, in milliseconds; caps the sub-frame count.
    #[arg(long)]
    total_duration_ms: Option<u64>,

    /// GIF loop count; 0 means loop forever. Omit to disable looping.
    #[arg(long)]
    loop_count: Option<u16>,

    /// Write pixels with the degenerate/uncompressed LZW mode instead of
    /// real compression.
    #[arg(long)]
    uncompressed: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum QuantizerChoice {
    Octree,
    MedianCut,
    Wu,
    VarianceBased,
    VarianceCut,
    BinarySplitting,
    Adu,
}

impl QuantizerChoice {
    fn build(self) -> Box<dyn Quantizer + Send + Sync> {
        match self {
            QuantizerChoice::Octree => Box::new(OctreeQuantizer),
            QuantizerChoice::MedianCut => Box::new(MedianCutQuantizer),
            QuantizerChoice::Wu => Box::new(WuQuantizer),
            QuantizerChoice::VarianceBased => Box::new(VarianceBasedQuantizer),
            QuantizerChoice::VarianceCut => Box::new(VarianceCutQuantizer),
            QuantizerChoice::BinarySplitting => Box::new(BinarySplittingQuantizer),
            QuantizerChoice::Adu => Box::new(AduQuantizer::default()),
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DithererChoice {
    None,
    FloydSteinberg,
    Stucki,
    Atkinson,
    Bayer4x4,
    NoiseWhite,
    Riemersma,
    Knoll,
}

impl DithererChoice {
    fn build(self) -> Box<dyn Ditherer + Send + Sync> {
        match self {
            DithererChoice::None => Box::new(NoDither),
            DithererChoice::FloydSteinberg => Box::new(MatrixBasedDitherer::new(Kernel::floyd_steinberg())),
            DithererChoice::Stucki => Box::new(MatrixBasedDitherer::new(Kernel::stucki())),
            DithererChoice::Atkinson => Box::new(MatrixBasedDitherer::new(Kernel::atkinson())),
            DithererChoice::Bayer4x4 => Box::new(OrderedDitherer::new(BayerSize::Bayer4x4)),
            DithererChoice::NoiseWhite => Box::new(NoiseDitherer::new(NoiseSpectrum::White)),
            DithererChoice::Riemersma => Box::new(RiemersmaDitherer),
            DithererChoice::Knoll => Box::new(KnollDitherer),
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OrderingChoice {
    MostUsedFirst,
    LeastUsedFirst,
    HighLuminanceFirst,
    LowLuminanceFirst,
    FromCenter,
    Random,
}

impl From<OrderingChoice> for LayerColorOrdering {
    fn from(value: OrderingChoice) -> Self {
        match value {
            OrderingChoice::MostUsedFirst => LayerColorOrdering::MostUsedFirst,
            OrderingChoice::LeastUsedFirst => LayerColorOrdering::LeastUsedFirst,
            OrderingChoice::HighLuminanceFirst => LayerColorOrdering::HighLuminanceFirst,
            OrderingChoice::LowLuminanceFirst => LayerColorOrdering::LowLuminanceFirst,
            OrderingChoice::FromCenter => LayerColorOrdering::FromCenter,
            OrderingChoice::Random => LayerColorOrdering::Random,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    info!(input = ?args.input, output = ?args.output, "starting hi-color conversion");

    let image = image::open(&args.input).with_context(|| format!("failed to decode {:?}", args.input))?;
    let rgba = image.to_rgba8();
    let (width, height) = (rgba.width(), rgba.height());

    let source: Vec<Color> = rgba
        .pixels()
        .map(|p| Color::new(p.0[0], p.0[1], p.0[2], p.0[3]))
        .collect();

    let mut config = LayerConfig {
        maximum_colors_per_sub_image: args.max_colors,
        minimum_sub_image_duration: Duration::from_millis(args.min_frame_ms),
        total_frame_duration: args.total_duration_ms.map(Duration::from_millis),
        color_ordering: args.ordering.into(),
        first_sub_image_inits_background: args.background,
        use_back_filling: args.back_fill,
        ..LayerConfig::default()
    };
    if args.background {
        config.quantizer = Some(args.quantizer.build());
        config.ditherer = Some(args.ditherer.build());
    }

    let layerer = HiColorLayerer::new(config);
    let mut frames = layerer.layer(&source, width, height)?;
    info!(frame_count = frames.len(), "built hi-color sub-frame stack");

    for frame in frames.iter_mut() {
        frame.use_local_color_table = true;
    }

    let loop_count = match args.loop_count {
        Some(n) => LoopCount::Set(n),
        None => LoopCount::NotSet,
    };

    let mut writer = GifWriter::new(width as u16, height as u16, None, loop_count)?;
    if args.uncompressed {
        writer = writer.with_uncompressed_lzw();
    }
    for frame in &frames {
        writer.add_frame(frame)?;
    }
    writer.finish_to_path(&args.output)?;

    info!(output = ?args.output, "wrote GIF");
    Ok(())
}
