//! Basic usage example for specfft
//!
//! Runs every available engine over the same signal, prints the spectrum as
//! magnitude/phase pairs, and restores the signal with the inverse.

use specfft::{new_transform, SpectrumBuffer, SymmetricDft, Transform, TransformKind};

fn main() {
    println!("=== specfft Basic Usage Example ===\n");

    let signal: Vec<f64> = (0..8)
        .map(|i| (2.0 * std::f64::consts::PI * i as f64 / 8.0).cos() + 0.5)
        .collect();
    println!("Input: {:?}\n", signal);

    for &kind in TransformKind::ALL {
        let engine = new_transform::<f64>(kind).unwrap();
        println!("{}", engine.name());

        let mut spectrum = engine.allocate_spectrum(signal.len());
        engine.forward(&signal, &mut spectrum).unwrap();
        for k in 0..spectrum.len() {
            println!(
                "   bin {k}: |X| = {:.3}, arg = {:+.3} rad",
                spectrum.magnitude(k),
                spectrum.phase(k)
            );
        }

        let mut restored = vec![0.0; signal.len()];
        engine.inverse(&mut spectrum, &mut restored).unwrap();
        println!(
            "   inverse: {:?}\n",
            restored.iter().map(|x| format!("{x:.3}")).collect::<Vec<_>>()
        );
    }

    // Odd lengths are only accepted by the DFT engines.
    let odd = [1.0f64, 2.0, 3.0, 4.0, 5.0];
    let mut half = SpectrumBuffer::allocate(specfft::symmetric::half_spectrum_len(odd.len()));
    SymmetricDft.forward(&odd, &mut half).unwrap();
    println!("Half spectrum of {:?}:", odd);
    for c in half.to_complex_vec() {
        println!("   {:.3}{:+.3}i", c.re, c.im);
    }
    let err = new_transform::<f64>(TransformKind::Radix2)
        .unwrap()
        .forward_vec(&odd)
        .unwrap_err();
    println!("Radix-2 on 5 points: {err}");
}
