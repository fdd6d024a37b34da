use wavelift::host::{Matrix, MatrixLayout, decompose_matrix, reconstruct_subband};
use wavelift::{
    Band, Buffer, Cdf97, Normalization, Orientation, StepSizeTable, SubbandStore,
    TransformEngine, WaveError,
};

/// Deterministic pseudo-random 8-bit-range image.
fn noise_image(width: usize, height: usize, seed: u32) -> Buffer<f64> {
    let mut state = seed;
    Buffer::from_fn(width, height, |_, _| {
        state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        ((state >> 16) % 256) as f64
    })
}

fn max_abs_diff(a: &Buffer<f64>, b: &Buffer<f64>) -> f64 {
    assert_eq!(a.dimensions(), b.dimensions());
    a.data()
        .iter()
        .zip(b.data())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

#[test]
fn test_roundtrip_identity_across_sizes_and_scales() {
    let engine = TransformEngine::new(Cdf97::default());
    for &(width, height, scales) in &[
        (64, 64, 1),
        (64, 64, 4),
        (37, 21, 3),
        (100, 3, 2),
        (8, 8, 3),
        (5, 130, 2),
    ] {
        let image = noise_image(width, height, (width * height) as u32);
        let mut store = SubbandStore::new(image.clone());
        engine.decompose(&mut store, scales).expect("decompose");
        assert_eq!(store.len(), 1 + 6 * scales);
        engine.reconstruct(&mut store).expect("reconstruct");

        let err = max_abs_diff(store.image(), &image);
        assert!(
            err < 1e-5,
            "{}x{} at {} scales: max error {}",
            width,
            height,
            scales,
            err
        );
    }
}

#[test]
fn test_roundtrip_single_precision() {
    let engine = TransformEngine::new(Cdf97::default());
    let image: Buffer<f32> = noise_image(48, 40, 7).cast();
    let mut store = SubbandStore::new(image.clone());
    engine.decompose(&mut store, 3).unwrap();
    engine.reconstruct(&mut store).unwrap();

    for (a, b) in store.image().data().iter().zip(image.data()) {
        // Tolerance relative to the 8-bit dynamic range.
        assert!((a - b).abs() <= 1e-4 * 255.0, "{} vs {}", a, b);
    }
}

#[test]
fn test_roundtrip_unit_gain() {
    let engine = TransformEngine::new(Cdf97::new(Normalization::UnitGain));
    let image = noise_image(32, 16, 99);
    let mut store = SubbandStore::new(image.clone());
    engine.decompose(&mut store, 2).unwrap();
    // The lowpass chain keeps the DC level with unit gain.
    let mean_ll = store.ll(2).unwrap().mean();
    assert!((mean_ll - image.mean()).abs() < 0.1 * image.mean());
    engine.reconstruct(&mut store).unwrap();
    assert!(max_abs_diff(store.image(), &image) < 1e-9);
}

#[test]
fn test_addressing_after_decomposition() {
    let engine = TransformEngine::new(Cdf97::default());
    let image = noise_image(30, 18, 3);
    let mut store = SubbandStore::new(image.clone());
    engine.decompose(&mut store, 2).unwrap();

    assert_eq!(store.len(), 13);
    assert_eq!(store.num_bands(), 7);
    assert_eq!((store.pad_x(), store.pad_y()), (2, 2));

    // Slot 0 keeps the padded source.
    let padded = store.image();
    assert_eq!(padded.dimensions(), (32, 20));
    assert_eq!(padded.crop(0, 0, 30, 18).unwrap(), image);
    assert!(padded.crop(30, 0, 2, 20).unwrap().is_null());

    assert_eq!(store.ll(2).unwrap().dimensions(), (8, 5));
    for orientation in Orientation::ALL {
        assert_eq!(store.band(1, orientation).unwrap().dimensions(), (16, 10));
    }

    // LL(2) is the lowpass of LL(1), recomputed one scale at a time.
    let kernel = Cdf97::default();
    let mut manual = SubbandStore::new(store.image().clone());
    TransformEngine::new(kernel).decompose(&mut manual, 1).unwrap();
    let ll1 = manual.ll(1).unwrap().clone();
    let mut single = SubbandStore::new(ll1);
    TransformEngine::new(kernel).decompose(&mut single, 1).unwrap();
    assert!(max_abs_diff(single.ll(1).unwrap(), store.ll(2).unwrap()) < 1e-12);
}

#[test]
fn test_one_dimensional_scenario() {
    let engine = TransformEngine::new(Cdf97::default());
    let signal = Buffer::from_vec(8, 1, (1..=8).map(f64::from).collect()).unwrap();
    let mut store = SubbandStore::new(signal.clone());
    engine.decompose(&mut store, 1).unwrap();

    assert_eq!(store.len(), 7);
    assert_eq!(store.l(1).unwrap().dimensions(), (4, 1));
    assert_eq!(store.h(1).unwrap().dimensions(), (4, 1));
    for band in [Band::Hh, Band::Hl, Band::Lh, Band::Ll] {
        assert_eq!(store.get(1, band).unwrap().size(), 0);
    }
    let expected_low = [1.88605282, 4.34625631, 6.99541208, 9.98917257];
    for (a, e) in store.l(1).unwrap().data().iter().zip(expected_low) {
        assert!((a - e).abs() < 1e-6);
    }

    engine.reconstruct(&mut store).unwrap();
    assert!(max_abs_diff(store.image(), &signal) < 1e-6);
}

#[test]
fn test_one_dimensional_multi_scale_with_padding() {
    let engine = TransformEngine::new(Cdf97::default());
    let signal = noise_image(45, 1, 11);
    let mut store = SubbandStore::new(signal.clone());
    engine.decompose(&mut store, 3).unwrap();
    assert_eq!((store.pad_x(), store.pad_y()), (3, 0));
    assert_eq!(store.l(3).unwrap().dimensions(), (6, 1));
    engine.reconstruct(&mut store).unwrap();
    assert!(max_abs_diff(store.image(), &signal) < 1e-5);
}

#[test]
fn test_recycled_bands_keep_storage() {
    let engine = TransformEngine::new(Cdf97::default());
    let mut store = SubbandStore::new(noise_image(32, 32, 5));
    engine.decompose(&mut store, 2).unwrap();
    let before: Vec<*const f64> = (1..=2)
        .flat_map(|s| Orientation::ALL.map(|o| (s, o)))
        .map(|(s, o)| store.band(s, o).unwrap().data().as_ptr())
        .collect();

    engine.reconstruct(&mut store).unwrap();
    store.set_image(noise_image(32, 32, 6));
    engine.decompose(&mut store, 2).unwrap();
    let after: Vec<*const f64> = (1..=2)
        .flat_map(|s| Orientation::ALL.map(|o| (s, o)))
        .map(|(s, o)| store.band(s, o).unwrap().data().as_ptr())
        .collect();
    assert_eq!(before, after);

    // A different scale count reallocates.
    engine.reconstruct(&mut store).unwrap();
    engine.decompose(&mut store, 3).unwrap();
    assert_eq!(store.len(), 19);
    assert_eq!(store.ll(3).unwrap().dimensions(), (4, 4));

    // So does a different image size.
    engine.reconstruct(&mut store).unwrap();
    store.set_image(noise_image(64, 16, 8));
    engine.decompose(&mut store, 3).unwrap();
    assert_eq!(store.hl(1).unwrap().dimensions(), (32, 8));
    assert_eq!(store.ll(3).unwrap().dimensions(), (8, 2));
}

#[test]
fn test_quantized_reconstruction_degrades_gracefully() {
    let engine = TransformEngine::new(Cdf97::default());
    let image = noise_image(32, 32, 21);
    let mut store = SubbandStore::new(image.clone());
    engine.decompose(&mut store, 3).unwrap();

    let steps = StepSizeTable::uniform(3, 4.0);
    store.quantize_int(&steps).unwrap();
    for scale in 1..=3 {
        for orientation in Orientation::ALL {
            let band = store.band(scale, orientation).unwrap();
            assert!(band.data().iter().all(|v| v.fract() == 0.0));
        }
    }
    store.dequantize_int(&steps).unwrap();
    engine.reconstruct(&mut store).unwrap();

    let psnr = store.image().psnr(&image);
    assert!(psnr > 25.0 && psnr.is_finite(), "psnr {}", psnr);
}

#[test]
fn test_copy_for_reconstruction_with_assign() {
    let engine = TransformEngine::new(Cdf97::default());
    let image = noise_image(16, 16, 2);
    let mut original = SubbandStore::new(image.clone());
    engine.decompose(&mut original, 2).unwrap();

    let mut copy = SubbandStore::with_dimensions(16, 16);
    engine.decompose(&mut copy, 2).unwrap();
    copy.assign(&original);
    engine.reconstruct(&mut copy).unwrap();
    assert!(max_abs_diff(copy.image(), &image) < 1e-5);
}

#[test]
fn test_unaddressable_scale_count_is_an_error() {
    let engine = TransformEngine::new(Cdf97::default());
    let image = noise_image(8, 8, 4);
    let mut store = SubbandStore::new(image.clone());

    for num_scales in [64, usize::MAX] {
        assert!(matches!(
            engine.decompose(&mut store, num_scales),
            Err(WaveError::InvalidArg(_))
        ));
    }
    assert_eq!(store.len(), 1);
    assert_eq!(store.image(), &image);

    // The store is still usable afterwards.
    engine.decompose(&mut store, 3).unwrap();
    engine.reconstruct(&mut store).unwrap();
    assert!(max_abs_diff(store.image(), &image) < 1e-5);

    let matrix = Matrix::new(8, 8, MatrixLayout::RowMajor, image.into_vec()).unwrap();
    assert!(decompose_matrix(&matrix, 64).is_err());
    assert!(reconstruct_subband(&matrix, 64, 1, 0).is_err());
}
