//! Demonstrates enabling verbose logging for specfft.
use std::time::Duration;

use specfft::{ParallelConfig, ParallelRadix2Fft, Transform};

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Trace)
        .init();

    let fft = ParallelRadix2Fft::with_config(
        ParallelConfig::from_env().with_threads(4).with_threshold(64),
    )
    .unwrap();

    let signal: Vec<f32> = (0..1024).map(|i| (i % 16) as f32).collect();
    let mut spectrum = fft.forward_vec(&signal).unwrap();
    let mut restored = vec![0.0; signal.len()];
    fft.inverse(&mut spectrum, &mut restored).unwrap();

    println!("shutdown: {:?}", fft.shutdown(Duration::from_millis(250)));
}
