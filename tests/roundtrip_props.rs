// Test intent: property-based round-trips and linearity for arbitrary
// real signals.

use proptest::prelude::*;
use specfft::{NaiveDft, Radix2Fft, SymmetricDft, Transform};

fn assert_close(a: &[f64], b: &[f64], tol: f64) -> Result<(), TestCaseError> {
    for (x, y) in a.iter().zip(b) {
        prop_assert!((x - y).abs() < tol, "{} vs {}", x, y);
    }
    Ok(())
}

fn roundtrip<E: Transform<f64>>(engine: &E, signal: &[f64]) -> Vec<f64> {
    let mut spectrum = engine.forward_vec(signal).unwrap();
    let mut out = vec![0.0; signal.len()];
    engine.inverse(&mut spectrum, &mut out).unwrap();
    out
}

proptest! {
    #[test]
    fn dfts_roundtrip_any_length(signal in prop::collection::vec(-1e3f64..1e3, 1..48)) {
        assert_close(&signal, &roundtrip(&NaiveDft, &signal), 1e-6)?;
        assert_close(&signal, &roundtrip(&SymmetricDft, &signal), 1e-6)?;
    }

    #[test]
    fn fft_roundtrip_power_of_two(log2 in 0usize..11, seed in any::<u64>()) {
        let n = 1usize << log2;
        let signal: Vec<f64> = (0..n)
            .map(|i| ((seed.wrapping_mul(6364136223846793005).wrapping_add(i as u64) >> 11) as f64
                / (1u64 << 53) as f64) * 2.0 - 1.0)
            .collect();
        assert_close(&signal, &roundtrip(&Radix2Fft, &signal), 1e-6)?;
    }

    #[test]
    fn forward_is_linear(
        pair in prop::collection::vec((-10.0f64..10.0, -10.0f64..10.0), 16),
        scale in -4.0f64..4.0,
    ) {
        let a: Vec<f64> = pair.iter().map(|p| p.0).collect();
        let b: Vec<f64> = pair.iter().map(|p| p.1).collect();
        let mixed: Vec<f64> = a.iter().zip(&b).map(|(x, y)| x + scale * y).collect();
        let fa = Radix2Fft.forward_vec(&a).unwrap();
        let fb = Radix2Fft.forward_vec(&b).unwrap();
        let fm = Radix2Fft.forward_vec(&mixed).unwrap();
        for k in 0..16 {
            prop_assert!((fm.re(k) - (fa.re(k) + scale * fb.re(k))).abs() < 1e-9);
            prop_assert!((fm.im(k) - (fa.im(k) + scale * fb.im(k))).abs() < 1e-9);
        }
    }
}
