use crate::image_pipeline::common::error::EffectError;
use crate::image_pipeline::raster::{OverlaySource, PixelBuffer, Rgba, fit_within};

#[test]
fn test_zero_dimensions_rejected() {
    assert!(matches!(
        PixelBuffer::new(0, 4),
        Err(EffectError::InvalidArgument(_))
    ));
    assert!(matches!(
        PixelBuffer::new(4, 0),
        Err(EffectError::InvalidArgument(_))
    ));
}

#[test]
fn test_get_set_bounds() {
    let mut buffer = PixelBuffer::new(3, 2).unwrap();
    assert!(buffer.set(2, 1, Rgba::WHITE).is_ok());
    assert_eq!(buffer.get(2, 1).unwrap(), Rgba::WHITE);

    let err = buffer.get(3, 0).unwrap_err();
    assert_eq!(
        err,
        EffectError::IndexOutOfRange {
            x: 3,
            y: 0,
            width: 3,
            height: 2
        }
    );
    assert!(matches!(
        buffer.set(0, 2, Rgba::WHITE),
        Err(EffectError::IndexOutOfRange { .. })
    ));
}

#[test]
fn test_set_clamps_channels() {
    let mut buffer = PixelBuffer::new(1, 1).unwrap();
    buffer.set(0, 0, Rgba::new(1.7, -0.3, 0.5, 2.0)).unwrap();
    assert_eq!(buffer.get(0, 0).unwrap(), Rgba::new(1.0, 0.0, 0.5, 1.0));

    buffer.set(0, 0, Rgba::new(f32::NAN, 0.2, 0.2, 1.0)).unwrap();
    assert_eq!(buffer.get(0, 0).unwrap().r, 0.0);
}

#[test]
fn test_set_all_size_mismatch() {
    let mut buffer = PixelBuffer::new(2, 2).unwrap();
    let err = buffer.set_all(vec![Rgba::WHITE; 3]).unwrap_err();
    assert_eq!(
        err,
        EffectError::SizeMismatch {
            expected: 4,
            actual: 3
        }
    );
    // untouched after a failed bulk write
    assert!(buffer.pixels().iter().all(|p| *p == Rgba::BLACK));
}

#[test]
fn test_set_all_clamps() {
    let mut buffer = PixelBuffer::new(2, 1).unwrap();
    buffer
        .set_all(vec![Rgba::rgb(1.5, 0.5, -1.0), Rgba::rgb(0.1, 0.2, 0.3)])
        .unwrap();
    assert_eq!(buffer.pixels()[0], Rgba::rgb(1.0, 0.5, 0.0));
    assert_eq!(buffer.pixels()[1], Rgba::rgb(0.1, 0.2, 0.3));
}

#[test]
fn test_from_pixels_checks_length() {
    assert!(matches!(
        PixelBuffer::from_pixels(2, 2, vec![Rgba::BLACK; 5]),
        Err(EffectError::SizeMismatch { expected: 4, actual: 5 })
    ));
}

#[test]
fn test_rgb8_ingestion() {
    let bytes = [255u8, 0, 51, 0, 255, 0];
    let buffer = PixelBuffer::from_rgb8(2, 1, &bytes).unwrap();
    let first = buffer.get(0, 0).unwrap();
    assert_eq!(first.r, 1.0);
    assert_eq!(first.g, 0.0);
    assert!((first.b - 0.2).abs() < 1e-6);
    assert_eq!(first.a, 1.0);
    assert_eq!(buffer.get(1, 0).unwrap(), Rgba::rgb(0.0, 1.0, 0.0));

    assert!(matches!(
        PixelBuffer::from_rgb8(2, 1, &bytes[..5]),
        Err(EffectError::SizeMismatch { expected: 6, actual: 5 })
    ));
}

#[test]
fn test_rgba8_ingestion_keeps_alpha() {
    let bytes = [0u8, 0, 0, 0, 255, 255, 255, 128];
    let buffer = PixelBuffer::from_rgba8(1, 2, &bytes).unwrap();
    assert_eq!(buffer.get(0, 0).unwrap(), Rgba::TRANSPARENT);
    assert!((buffer.get(0, 1).unwrap().a - 128.0 / 255.0).abs() < 1e-6);
}

#[test]
fn test_par_map_positioned_sees_coordinates() {
    let mut buffer = PixelBuffer::new(4, 3).unwrap();
    buffer.par_map_positioned(|x, y, _| Rgba::rgb(x as f32 / 10.0, y as f32 / 10.0, 2.0));
    let p = buffer.get(3, 2).unwrap();
    assert!((p.r - 0.3).abs() < 1e-6);
    assert!((p.g - 0.2).abs() < 1e-6);
    assert_eq!(p.b, 1.0);
}

#[test]
fn test_fit_never_upscales() {
    let fit = fit_within(10, 20, 100, 100);
    assert_eq!((fit.width, fit.height), (10, 20));
    assert_eq!(fit.scale, 1.0);
}

#[test]
fn test_fit_preserves_aspect() {
    let fit = fit_within(400, 200, 50, 50);
    assert_eq!((fit.width, fit.height), (50, 25));
    assert_eq!(fit.scale, 0.125);
}

#[test]
fn test_fit_degenerate_bound() {
    let fit = fit_within(40, 20, 0, 10);
    assert_eq!((fit.width, fit.height), (0, 0));
    assert_eq!(fit.source_index(0, 40), 0);
}

#[test]
fn test_downscale_to_fit() {
    let mut pixels = Vec::new();
    for y in 0..4 {
        for x in 0..8 {
            pixels.push(Rgba::rgb(x as f32 / 8.0, y as f32 / 4.0, 0.0));
        }
    }
    let buffer = PixelBuffer::from_pixels(8, 4, pixels).unwrap();
    let small = buffer.downscaled_to_fit(4, 4).unwrap();
    assert_eq!(small.dimensions(), (4, 2));
    assert_eq!(small.get(1, 1).unwrap(), buffer.get(2, 2).unwrap());

    let same = buffer.downscaled_to_fit(100, 100).unwrap();
    assert_eq!(same, buffer);

    assert!(matches!(
        buffer.downscaled_to_fit(0, 4),
        Err(EffectError::InvalidArgument(_))
    ));
}

#[test]
fn test_pixel_buffer_is_always_readable() {
    let buffer = PixelBuffer::filled(3, 2, Rgba::WHITE).unwrap();
    let source: &dyn OverlaySource = &buffer;
    assert_eq!(source.dimensions(), (3, 2));
    assert_eq!(source.read_raster().unwrap().len(), 6);
}

#[test]
fn test_rgba_add_and_div_touch_every_channel() {
    let sum = Rgba::new(0.1, 0.2, 0.3, 0.4) + Rgba::new(0.3, 0.2, 0.1, 0.4);
    let mean = sum / 2.0;
    assert!((mean.r - 0.2).abs() < 1e-6);
    assert!((mean.g - 0.2).abs() < 1e-6);
    assert!((mean.b - 0.2).abs() < 1e-6);
    assert!((mean.a - 0.4).abs() < 1e-6);
}
