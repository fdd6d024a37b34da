use tempfile::TempDir;
use wavelift::{Buffer, Cdf97, Orientation, SubbandStore, TransformEngine, WaveError};

const LEVELS: usize = 3;

fn test_image(width: usize, height: usize) -> Buffer<f64> {
    Buffer::from_fn(width, height, |x, y| {
        let (fx, fy) = (x as f64, y as f64);
        128.0 + 60.0 * (fx * 0.31).sin() * (fy * 0.17).cos() + ((x * 7 + y * 13) % 11) as f64
    })
}

fn decomposed(width: usize, height: usize) -> SubbandStore<f64> {
    let mut store = SubbandStore::new(test_image(width, height));
    TransformEngine::new(Cdf97::default())
        .decompose(&mut store, LEVELS)
        .unwrap();
    store
}

/// Zeroes every detail band except `(scale, keep)` and the coarsest LL.
fn isolate(store: &mut SubbandStore<f64>, scale: usize, keep: Orientation) {
    for s in 1..=store.num_scales() {
        for orientation in Orientation::ALL {
            if (s, orientation) != (scale, keep) {
                store.band_mut(s, orientation).unwrap().zero();
            }
        }
    }
    let coarsest = store.num_scales();
    store.ll_mut(coarsest).unwrap().zero();
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
fn test_single_band_matches_masked_reconstruction() {
    let engine = TransformEngine::new(Cdf97::default());
    let store = decomposed(40, 24);

    for scale in 1..=LEVELS {
        for orientation in Orientation::ALL {
            let mut masked = store.clone();
            isolate(&mut masked, scale, orientation);
            engine.reconstruct(&mut masked).unwrap();

            let mut single = store.clone();
            engine.reconstruct_one(&mut single, scale, orientation).unwrap();

            assert_eq!(single.image().dimensions(), (40, 24));
            let err = max_abs_diff(single.image(), masked.image());
            assert!(err < 1e-9, "{}({}): max error {}", orientation, scale, err);
        }
    }
}

#[test]
fn test_single_band_contributions_sum_to_image() {
    let engine = TransformEngine::new(Cdf97::default());
    let store = decomposed(32, 32);
    let image = test_image(32, 32);

    // Coarsest LL alone.
    let mut total = store.clone();
    for s in 1..=LEVELS {
        for orientation in Orientation::ALL {
            total.band_mut(s, orientation).unwrap().zero();
        }
    }
    engine.reconstruct(&mut total).unwrap();
    let mut sum = total.image().clone();

    for scale in 1..=LEVELS {
        for orientation in Orientation::ALL {
            let mut single = store.clone();
            engine.reconstruct_one(&mut single, scale, orientation).unwrap();
            sum += single.image();
        }
    }
    assert!(max_abs_diff(&sum, &image) < 1e-6);
}

#[test]
fn test_single_band_of_padded_image() {
    let engine = TransformEngine::new(Cdf97::default());
    let store = decomposed(27, 13);
    assert_eq!((store.pad_x(), store.pad_y()), (5, 3));

    let mut single = store.clone();
    engine.reconstruct_one(&mut single, 2, Orientation::Hh).unwrap();
    assert_eq!(single.image().dimensions(), (27, 13));
    assert!(single.image().energy() > 0.0);
}

#[test]
fn test_zero_band_contributes_nothing() {
    let engine = TransformEngine::new(Cdf97::default());
    let mut store = decomposed(16, 16);
    store.lh_mut(1).unwrap().zero();
    engine.reconstruct_one(&mut store, 1, Orientation::Lh).unwrap();
    assert!(store.image().is_null());
}

#[test]
fn test_single_band_rejections() {
    let engine = TransformEngine::new(Cdf97::default());
    let mut store = decomposed(16, 16);

    assert!(matches!(
        engine.reconstruct_one(&mut store, 0, Orientation::Hl),
        Err(WaveError::InvalidScale { .. })
    ));
    assert!(matches!(
        engine.reconstruct_one(&mut store, LEVELS + 1, Orientation::Hl),
        Err(WaveError::InvalidScale { .. })
    ));
    assert!(matches!(
        Orientation::try_from(3u8),
        Err(WaveError::InvalidSubband(_))
    ));
    assert!(store.band_by_code(1, 3).is_err());
    assert_eq!(
        store.band_by_code(1, 2).unwrap(),
        store.band(1, Orientation::Hh).unwrap()
    );

    let mut signal = SubbandStore::new(Buffer::<f64>::from_fn(16, 1, |x, _| x as f64));
    engine.decompose(&mut signal, 2).unwrap();
    assert!(matches!(
        engine.reconstruct_one(&mut signal, 1, Orientation::Hh),
        Err(WaveError::InvalidOperation(_))
    ));
}

#[test]
fn test_subbands_survive_file_roundtrip() {
    let dir = TempDir::new().unwrap();
    let store = decomposed(32, 16);

    for scale in 1..=LEVELS {
        for orientation in Orientation::ALL {
            let band = store.band(scale, orientation).unwrap();
            let path = dir.path().join(format!("{}{}.raw", orientation, scale));
            band.save(&path, false).unwrap();
            assert_eq!(&Buffer::<f64>::load(&path, false).unwrap(), band);
        }
    }

    // Byte-swapped files only read back with the same setting.
    let ll = store.ll(LEVELS).unwrap();
    let path = dir.path().join("ll.raw");
    ll.save(&path, true).unwrap();
    assert_eq!(&Buffer::<f64>::load(&path, true).unwrap(), ll);
    assert_ne!(&Buffer::<f64>::load(&path, false).unwrap_or_default(), ll);
}

#[test]
fn test_reconstruct_from_loaded_subbands() {
    let dir = TempDir::new().unwrap();
    let engine = TransformEngine::new(Cdf97::default());
    let store = decomposed(24, 24);

    let mut restored = SubbandStore::with_dimensions(24, 24);
    engine.decompose(&mut restored, LEVELS).unwrap();
    for scale in 1..=LEVELS {
        for orientation in Orientation::ALL {
            let path = dir.path().join(format!("band_{}_{}.raw", scale, orientation));
            store.band(scale, orientation).unwrap().save(&path, false).unwrap();
            *restored.band_mut(scale, orientation).unwrap() = Buffer::load(&path, false).unwrap();
        }
    }
    let path = dir.path().join("ll.raw");
    store.ll(LEVELS).unwrap().save(&path, false).unwrap();
    *restored.ll_mut(LEVELS).unwrap() = Buffer::load(&path, false).unwrap();

    engine.reconstruct(&mut restored).unwrap();
    assert!(max_abs_diff(restored.image(), &test_image(24, 24)) < 1e-5);
}
