use anyhow::Context;
use capture_fx::image_pipeline::{
    ColorblindMode, EffectConfig, EffectPipeline, FilterKind, PixelBuffer,
};
use capture_fx::logger::{self, info};

const CAPTURE_WIDTH: usize = 320;
const CAPTURE_HEIGHT: usize = 180;
const PREVIEW_EDGE: usize = 96;

/// Stand-in for a rendered view: a diagonal RGB8 gradient.
fn synthetic_capture(width: usize, height: usize) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        for x in 0..width {
            bytes.push((x * 255 / width) as u8);
            bytes.push((y * 255 / height) as u8);
            bytes.push(((x + y) * 255 / (width + height)) as u8);
        }
    }
    bytes
}

/// Half-transparent white badge with an opaque border.
fn synthetic_watermark(width: usize, height: usize) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            let border = x < 2 || y < 2 || x >= width - 2 || y >= height - 2;
            let alpha = if border { 255 } else { 128 };
            bytes.extend_from_slice(&[255, 255, 255, alpha]);
        }
    }
    bytes
}

fn main() -> anyhow::Result<()> {
    logger::init();

    info!("Starting capture_fx...");

    let capture = PixelBuffer::from_rgb8(
        CAPTURE_WIDTH,
        CAPTURE_HEIGHT,
        &synthetic_capture(CAPTURE_WIDTH, CAPTURE_HEIGHT),
    )
    .context("ingesting capture")?;
    let watermark = PixelBuffer::from_rgba8(96, 48, &synthetic_watermark(96, 48))
        .context("ingesting watermark")?;

    let config = EffectConfig::builder()
        .filter(FilterKind::Sepia)
        .vignette(0.6)
        .noise(0.05)
        .colorblind(ColorblindMode::Normal)
        .watermark(watermark)
        .build();
    let pipeline = EffectPipeline::new(config).context("building effect pipeline")?;

    info!("Effect pipeline initialized");
    info!("Stages: {:?}", pipeline.stage_names());

    let mut rng = rand::rng();

    let preview = pipeline
        .preview(&capture, PREVIEW_EDGE, PREVIEW_EDGE, &mut rng)
        .context("rendering preview")?;
    info!("Preview frame: {}x{}", preview.width(), preview.height());

    let mut output = capture.clone();
    let timings = pipeline
        .run_with_timings(&mut output, &mut rng)
        .context("running effect pipeline")?;

    info!("\n{}", timings.summary());
    info!(
        "Processed {}x{} capture, ready for encoding",
        output.width(),
        output.height()
    );

    Ok(())
}
