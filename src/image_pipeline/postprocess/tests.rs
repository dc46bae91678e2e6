use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::image_pipeline::common::error::{EffectError, Result};
use crate::image_pipeline::effects::ColorblindMode;
use crate::image_pipeline::postprocess::{
    CancelFlag, EffectConfig, EffectPipeline, FilterKind, StageOutcome,
};
use crate::image_pipeline::raster::{OverlaySource, PixelBuffer, Rgba};

#[derive(Debug)]
struct MockOverlay {
    should_fail: bool,
    raster: PixelBuffer,
    reads: Arc<AtomicUsize>,
    cancel_on_read: Option<CancelFlag>,
}

impl MockOverlay {
    fn readable(raster: PixelBuffer) -> Self {
        Self {
            should_fail: false,
            raster,
            reads: Arc::new(AtomicUsize::new(0)),
            cancel_on_read: None,
        }
    }

    fn unreadable() -> Self {
        Self {
            should_fail: true,
            raster: PixelBuffer::filled(8, 8, Rgba::WHITE).unwrap(),
            reads: Arc::new(AtomicUsize::new(0)),
            cancel_on_read: None,
        }
    }
}

impl OverlaySource for MockOverlay {
    fn dimensions(&self) -> (usize, usize) {
        self.raster.dimensions()
    }

    fn read_raster(&self) -> Result<&PixelBuffer> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if let Some(flag) = &self.cancel_on_read {
            flag.cancel();
        }
        if self.should_fail {
            return Err(EffectError::UnreadableResource(
                "Mock texture without read access".to_string(),
            ));
        }
        Ok(&self.raster)
    }
}

fn checkerboard(width: usize, height: usize) -> PixelBuffer {
    let mut pixels = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let v = if (x + y) % 2 == 0 { 0.83 } else { 0.27 };
            pixels.push(Rgba::rgb(v, 1.0 - v, (x as f32) / width as f32));
        }
    }
    PixelBuffer::from_pixels(width, height, pixels).unwrap()
}

#[test]
fn test_config_builder() {
    let config = EffectConfig::builder()
        .filter(FilterKind::Sepia)
        .blur(true)
        .vignette(0.4)
        .noise(0.1)
        .glitch(true)
        .colorblind(ColorblindMode::Tritanopia)
        .build();

    assert_eq!(config.filter, FilterKind::Sepia);
    assert_eq!(config.posterize_levels, 15);
    assert!(config.blur);
    assert_eq!(config.vignette_intensity, 0.4);
    assert_eq!(config.noise_amount, 0.1);
    assert!(config.glitch);
    assert_eq!(config.colorblind, ColorblindMode::Tritanopia);
    assert!(config.watermark.is_none());
}

#[test]
fn test_default_config_plans_nothing() {
    let pipeline = EffectPipeline::new(EffectConfig::default()).unwrap();
    assert!(pipeline.stages().is_empty());

    let original = checkerboard(6, 6);
    let mut buffer = original.clone();
    pipeline.run_seeded(&mut buffer, 1).unwrap();
    assert_eq!(buffer, original);
}

#[test]
fn test_stage_order_is_fixed() {
    let config = EffectConfig::builder()
        .filter(FilterKind::Invert)
        .blur(true)
        .vignette(0.3)
        .noise(0.2)
        .glitch(true)
        .colorblind(ColorblindMode::Protanopia)
        .watermark(PixelBuffer::filled(2, 2, Rgba::WHITE).unwrap())
        .build();
    let pipeline = EffectPipeline::new(config).unwrap();

    assert_eq!(
        pipeline.stage_names(),
        vec![
            "invert",
            "blur",
            "glitch",
            "noise",
            "vignette",
            "watermark",
            "colorblind"
        ]
    );
}

#[test]
fn test_invalid_config_rejected() {
    let zero_levels = EffectConfig::builder()
        .filter(FilterKind::Posterize)
        .posterize_levels(0)
        .build();
    assert!(matches!(
        EffectPipeline::new(zero_levels),
        Err(EffectError::InvalidArgument(_))
    ));

    let hot_vignette = EffectConfig::builder().vignette(1.5).build();
    assert!(matches!(
        EffectPipeline::new(hot_vignette),
        Err(EffectError::InvalidArgument(_))
    ));

    let nan_noise = EffectConfig::builder().noise(f32::NAN).build();
    assert!(matches!(
        EffectPipeline::new(nan_noise),
        Err(EffectError::InvalidArgument(_))
    ));

    // levels only matter when posterize is selected
    let unused_levels = EffectConfig::builder()
        .filter(FilterKind::Grayscale)
        .posterize_levels(0)
        .build();
    assert!(EffectPipeline::new(unused_levels).is_ok());
}

#[test]
fn test_set_config_keeps_old_on_failure() {
    let mut pipeline =
        EffectPipeline::new(EffectConfig::builder().blur(true).build()).unwrap();
    let result = pipeline.set_config(EffectConfig::builder().noise(-1.0).build());

    assert!(result.is_err());
    assert_eq!(pipeline.stage_names(), vec!["blur"]);
    assert!(pipeline.config().blur);

    pipeline
        .set_config(EffectConfig::builder().filter(FilterKind::Grayscale).build())
        .unwrap();
    assert_eq!(pipeline.stage_names(), vec!["grayscale"]);
}

#[test]
fn test_vignette_on_white_end_to_end() {
    let pipeline = EffectPipeline::new(EffectConfig::builder().vignette(0.5).build()).unwrap();
    let mut buffer = PixelBuffer::filled(4, 4, Rgba::WHITE).unwrap();
    pipeline.run_seeded(&mut buffer, 0).unwrap();

    let corner = buffer.get(0, 0).unwrap();
    assert!((corner.r - 0.5).abs() < 1e-5);
    assert!((corner.g - 0.5).abs() < 1e-5);
    assert!((corner.b - 0.5).abs() < 1e-5);

    let center = buffer.get(2, 2).unwrap();
    assert!((center.r - 1.0).abs() < 1e-5);
}

#[test]
fn test_posterize_end_to_end_is_stable() {
    let pipeline = EffectPipeline::new(
        EffectConfig::builder()
            .filter(FilterKind::Posterize)
            .posterize_levels(15)
            .build(),
    )
    .unwrap();
    let source = checkerboard(8, 8);

    let mut first = source.clone();
    pipeline.run_seeded(&mut first, 0).unwrap();
    let mut second = source.clone();
    pipeline.run_seeded(&mut second, 0).unwrap();
    assert_eq!(first, second);

    let mut again = first.clone();
    pipeline.run_seeded(&mut again, 0).unwrap();
    assert_eq!(again, first);
}

#[test]
fn test_seeded_random_stages_repeat() {
    let pipeline = EffectPipeline::new(
        EffectConfig::builder().glitch(true).noise(0.3).build(),
    )
    .unwrap();

    let mut a = checkerboard(32, 24);
    let mut b = a.clone();
    pipeline.run_seeded(&mut a, 1234).unwrap();
    pipeline.run_seeded(&mut b, 1234).unwrap();
    assert_eq!(a, b);

    let mut c = checkerboard(32, 24);
    pipeline.run_seeded(&mut c, 4321).unwrap();
    assert_ne!(a, c);
}

#[test]
fn test_unreadable_watermark_is_skipped() {
    let overlay = MockOverlay::unreadable();
    let reads = overlay.reads.clone();
    let pipeline = EffectPipeline::new(
        EffectConfig::builder()
            .filter(FilterKind::Grayscale)
            .watermark(overlay)
            .build(),
    )
    .unwrap();

    let mut buffer = checkerboard(10, 10);
    let mut expected = buffer.clone();
    EffectPipeline::new(EffectConfig::builder().filter(FilterKind::Grayscale).build())
        .unwrap()
        .run_seeded(&mut expected, 0)
        .unwrap();

    let mut rng = StdRng::seed_from_u64(0);
    let timings = pipeline.run_with_timings(&mut buffer, &mut rng).unwrap();

    assert_eq!(reads.load(Ordering::SeqCst), 1);
    assert_eq!(buffer, expected);
    let watermark = &timings.stages()[1];
    assert_eq!(watermark.name, "watermark");
    assert!(matches!(watermark.outcome, StageOutcome::Skipped(_)));
    assert_eq!(timings.applied().collect::<Vec<_>>(), vec!["grayscale"]);
}

#[test]
fn test_readable_watermark_is_composited() {
    let overlay = MockOverlay::readable(PixelBuffer::filled(4, 4, Rgba::WHITE).unwrap());
    let pipeline =
        EffectPipeline::new(EffectConfig::builder().watermark(overlay).build()).unwrap();

    let mut buffer = PixelBuffer::new(16, 16).unwrap();
    pipeline.run_seeded(&mut buffer, 0).unwrap();

    assert!((buffer.get(15, 0).unwrap().r - 0.5).abs() < 1e-5);
    assert!((buffer.get(12, 3).unwrap().g - 0.5).abs() < 1e-5);
    assert_eq!(buffer.get(11, 0).unwrap(), Rgba::BLACK);
    assert_eq!(buffer.get(15, 4).unwrap(), Rgba::BLACK);
}

#[test]
fn test_cancel_before_run() {
    let pipeline = EffectPipeline::new(
        EffectConfig::builder()
            .filter(FilterKind::Invert)
            .blur(true)
            .build(),
    )
    .unwrap();
    let cancel = CancelFlag::new();
    cancel.cancel();

    let original = checkerboard(5, 5);
    let mut buffer = original.clone();
    let mut rng = StdRng::seed_from_u64(0);
    let result = pipeline.run_cancellable(&mut buffer, &mut rng, &cancel);

    assert_eq!(
        result.unwrap_err(),
        EffectError::Cancelled {
            next_stage: "invert"
        }
    );
    assert_eq!(buffer, original);
}

#[test]
fn test_cancel_between_stages() {
    let cancel = CancelFlag::new();
    let mut overlay = MockOverlay::readable(PixelBuffer::filled(2, 2, Rgba::WHITE).unwrap());
    overlay.cancel_on_read = Some(cancel.clone());

    let pipeline = EffectPipeline::new(
        EffectConfig::builder()
            .watermark(overlay)
            .colorblind(ColorblindMode::Deuteranopia)
            .build(),
    )
    .unwrap();

    let mut buffer = PixelBuffer::new(8, 8).unwrap();
    let mut rng = StdRng::seed_from_u64(0);
    let result = pipeline.run_cancellable(&mut buffer, &mut rng, &cancel);

    assert!(matches!(
        result,
        Err(EffectError::Cancelled {
            next_stage: "colorblind"
        })
    ));
    // the watermark stage completed before the abort
    assert!(buffer.get(7, 0).unwrap().r > 0.0);

    cancel.reset();
    assert!(!cancel.is_cancelled());
}

#[test]
fn test_timings_cover_every_stage() {
    let pipeline = EffectPipeline::new(
        EffectConfig::builder()
            .filter(FilterKind::Sepia)
            .blur(true)
            .vignette(0.2)
            .build(),
    )
    .unwrap();

    let mut buffer = checkerboard(20, 12);
    let mut rng = StdRng::seed_from_u64(0);
    let timings = pipeline.run_with_timings(&mut buffer, &mut rng).unwrap();

    let names: Vec<_> = timings.stages().iter().map(|s| s.name).collect();
    assert_eq!(names, vec!["sepia", "blur", "vignette"]);
    assert!(timings.get_stage("blur").is_some());
    assert!(timings.get_stage("glitch").is_none());
    assert!(timings.total_duration() >= timings.get_stage("blur").unwrap());
    assert!(timings.summary().contains("Total"));
}

#[test]
fn test_preview_leaves_source_untouched() {
    let pipeline = EffectPipeline::new(
        EffectConfig::builder()
            .filter(FilterKind::Invert)
            .build(),
    )
    .unwrap();
    let source = checkerboard(40, 20);
    let mut rng = StdRng::seed_from_u64(0);

    let frame = pipeline.preview(&source, 10, 10, &mut rng).unwrap();

    assert_eq!(frame.dimensions(), (10, 5));
    assert_eq!(source, checkerboard(40, 20));
    let expected = source.get(0, 0).unwrap();
    let inverted = frame.get(0, 0).unwrap();
    assert!((inverted.r - (1.0 - expected.r)).abs() < 1e-5);
}

#[test]
fn test_config_clone_shares_watermark() {
    let config = EffectConfig::builder()
        .watermark(PixelBuffer::filled(3, 3, Rgba::WHITE).unwrap())
        .build();
    let copy = config.clone();

    let (a, b) = (config.watermark.unwrap(), copy.watermark.unwrap());
    assert!(Arc::ptr_eq(&a, &b));
}
