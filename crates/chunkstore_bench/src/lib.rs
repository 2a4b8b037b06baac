//! Benchmark utilities.

use rand::Rng;

/// Generate random chunk data of the specified size.
pub fn random_data(size: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..size).map(|_| rng.gen()).collect()
}

/// Generate chunk keys for a 2-d grid of `rows` x `cols` chunks under `array`.
pub fn chunk_keys(array: &str, rows: usize, cols: usize) -> Vec<String> {
    (0..rows)
        .flat_map(|r| (0..cols).map(move |c| format!("{array}/c/{r}/{c}")))
        .collect()
}
