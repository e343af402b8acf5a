use crate::sample::Sample;
use lazy_static::lazy_static;
use rand::{thread_rng, Rng};

lazy_static! {
    pub static ref REGULAR_DATA: Vec<Sample> = regular_series(30_000);
    pub static ref WALK_DATA: Vec<Sample> = random_walk_series(30_000);
}

/// Same timestamp and value over and over, the pathological best case.
pub fn constant_series(n: usize) -> Vec<Sample> {
    vec![Sample::new(1_000, 3.14); n]
}

/// Fixed-interval timestamps with a smooth value curve.
pub fn regular_series(n: usize) -> Vec<Sample> {
    (0..n)
        .map(|k| Sample::new(1_000 * k as u64, (k as f64 / 10.0).sin()))
        .collect()
}

/// Jittered timestamps with a drifting value.
pub fn random_walk_series(n: usize) -> Vec<Sample> {
    let mut rng = thread_rng();
    let mut ts: u64 = 1_600_000_000_000_000;
    let mut value: f64 = 20.0;
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        ts += rng.gen_range(1..2_000);
        value += rng.gen_range(-0.5..0.5);
        out.push(Sample::new(ts, value));
    }
    out
}

/// Non-decreasing timestamps with bursty gaps.
pub fn irregular_timestamps(n: usize) -> Vec<u64> {
    let mut rng = thread_rng();
    let mut ts: u64 = 1_000_000;
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        if rng.gen_bool(0.3) {
            ts += rng.gen_range(0..1_000_000);
        } else {
            ts += 1_000;
        }
        out.push(ts);
    }
    out
}
