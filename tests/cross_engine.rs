// Test intent: every engine agrees with the naive DFT on shared bins, and
// forward/inverse round-trips hold for random input up to 32768 points.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use specfft::{NaiveDft, Radix2Fft, SymmetricDft, Transform};
#[cfg(feature = "parallel")]
use specfft::{ParallelConfig, ParallelRadix2Fft};

fn random_signal(rng: &mut StdRng, n: usize) -> Vec<f64> {
    (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

#[cfg(feature = "parallel")]
fn forced_parallel(threads: usize) -> ParallelRadix2Fft {
    ParallelRadix2Fft::with_config(
        ParallelConfig::default()
            .with_threads(threads)
            .with_threshold(1),
    )
    .unwrap()
}

fn assert_roundtrip<E: Transform<f64>>(engine: &E, signal: &[f64], tol: f64) {
    let mut spectrum = engine.forward_vec(signal).unwrap();
    let mut out = vec![0.0; signal.len()];
    engine.inverse(&mut spectrum, &mut out).unwrap();
    for (i, (a, b)) in signal.iter().zip(&out).enumerate() {
        assert!(
            (a - b).abs() < tol,
            "{} n={} i={i}: {a} vs {b}",
            engine.name(),
            signal.len()
        );
    }
}

#[test]
fn forward_outputs_agree_for_power_of_two_sizes() {
    let mut rng = StdRng::seed_from_u64(7);
    #[cfg(feature = "parallel")]
    let parallel = forced_parallel(4);
    for log2 in 0..=9 {
        let n = 1usize << log2;
        let signal = random_signal(&mut rng, n);
        let reference = NaiveDft.forward_vec(&signal).unwrap();
        let half = SymmetricDft.forward_vec(&signal).unwrap();
        let radix2 = Radix2Fft.forward_vec(&signal).unwrap();
        #[cfg(feature = "parallel")]
        let par = parallel.forward_vec(&signal).unwrap();
        for k in 0..n {
            let tol = 1e-9 * n as f64;
            assert!((reference.re(k) - radix2.re(k)).abs() < tol, "radix2 n={n} k={k}");
            assert!((reference.im(k) - radix2.im(k)).abs() < tol, "radix2 n={n} k={k}");
            #[cfg(feature = "parallel")]
            {
                assert!((reference.re(k) - par.re(k)).abs() < tol, "parallel n={n} k={k}");
                assert!((reference.im(k) - par.im(k)).abs() < tol, "parallel n={n} k={k}");
            }
            if k < half.len() {
                assert!((reference.re(k) - half.re(k)).abs() < tol, "symmetric n={n} k={k}");
                assert!((reference.im(k) - half.im(k)).abs() < tol, "symmetric n={n} k={k}");
            }
        }
    }
}

#[test]
fn full_spectrum_is_hermitian_for_real_input() {
    let mut rng = StdRng::seed_from_u64(11);
    let n = 128;
    let signal = random_signal(&mut rng, n);
    let spectrum = Radix2Fft.forward_vec(&signal).unwrap();
    for k in 1..n {
        let a = spectrum.get(k);
        let b = spectrum.get(n - k).conj();
        assert!((a.re - b.re).abs() < 1e-10 && (a.im - b.im).abs() < 1e-10, "k={k}");
    }
}

#[test]
fn fft_roundtrip_large_random() {
    let mut rng = StdRng::seed_from_u64(1234);
    #[cfg(feature = "parallel")]
    let parallel = forced_parallel(4);
    for log2 in [10, 12, 15] {
        let signal = random_signal(&mut rng, 1 << log2);
        assert_roundtrip(&Radix2Fft, &signal, 1e-9);
        #[cfg(feature = "parallel")]
        assert_roundtrip(&parallel, &signal, 1e-9);
    }
}

#[test]
fn dft_roundtrip_random_any_length() {
    let mut rng = StdRng::seed_from_u64(99);
    for n in [1usize, 2, 3, 7, 10, 31, 100, 257] {
        let signal = random_signal(&mut rng, n);
        assert_roundtrip(&NaiveDft, &signal, 1e-9);
        assert_roundtrip(&SymmetricDft, &signal, 1e-9);
    }
}

#[test]
fn buffers_are_reusable_across_calls() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut spectrum = specfft::SpectrumBuffer::allocate(256);
    let mut out = vec![0.0f64; 256];
    for _ in 0..5 {
        let signal = random_signal(&mut rng, 256);
        Radix2Fft.forward(&signal, &mut spectrum).unwrap();
        Radix2Fft.inverse(&mut spectrum, &mut out).unwrap();
        for (a, b) in signal.iter().zip(&out) {
            assert!((a - b).abs() < 1e-12);
        }
    }
}

#[test]
fn oversized_forward_buffer_needs_exact_window_to_invert() {
    let signal = [1.0f64, -2.0, 0.5, 3.0];
    let mut spectrum = specfft::SpectrumBuffer::allocate(6);
    Radix2Fft.forward(&signal, &mut spectrum).unwrap();
    let mut out = [0.0f64; 6];
    // six bins read back as a six-point transform
    assert!(Radix2Fft
        .inverse(&mut spectrum, &mut out)
        .unwrap_err()
        .is_invalid_argument());

    let (re, im) = spectrum.into_parts();
    let mut exact =
        specfft::SpectrumBuffer::from_parts(re[..4].to_vec(), im[..4].to_vec()).unwrap();
    let mut restored = [0.0f64; 4];
    Radix2Fft.inverse(&mut exact, &mut restored).unwrap();
    for (a, b) in signal.iter().zip(&restored) {
        assert!((a - b).abs() < 1e-12);
    }
}
