// Tally - A sampling InfluxDB metrics client for Rust!
//
// Copyright 2024 The Tally Developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use rand::{Rng, RngCore};
use std::fmt;
use std::sync::{Mutex, PoisonError};

/// Source of the uniform draws used to decide whether a metric is sent.
#[derive(Default)]
pub(crate) enum Sampler {
    #[default]
    ThreadLocal,
    Seeded(Mutex<Box<dyn RngCore + Send>>),
}

impl Sampler {
    pub(crate) fn seeded<R>(rng: R) -> Self
    where
        R: RngCore + Send + 'static,
    {
        Sampler::Seeded(Mutex::new(Box::new(rng)))
    }

    /// Return true if a metric with the given sample rate should be sent.
    ///
    /// Rates of 1.0 and above always pass without drawing. Otherwise one value
    /// in [0, 1) is drawn and the metric is dropped when the draw exceeds the
    /// rate, so rates of zero and below (almost) never pass.
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub(crate) fn keep(&self, rate: f32) -> bool {
        if rate >= 1.0 {
            return true;
        }

        // NaN rates keep the metric, same as a rate of 1.0
        !(self.draw() > rate)
    }

    fn draw(&self) -> f32 {
        match self {
            Sampler::ThreadLocal => rand::thread_rng().gen::<f32>(),
            Sampler::Seeded(rng) => rng.lock().unwrap_or_else(PoisonError::into_inner).gen::<f32>(),
        }
    }
}

impl fmt::Debug for Sampler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sampler::ThreadLocal => f.write_str("Sampler::ThreadLocal"),
            Sampler::Seeded(_) => f.write_str("Sampler::Seeded(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Sampler;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn seeded(seed: u64) -> Sampler {
        Sampler::seeded(ChaCha8Rng::seed_from_u64(seed))
    }

    #[test]
    fn test_full_rate_always_kept() {
        let sampler = Sampler::default();
        assert!((0..1000).all(|_| sampler.keep(1.0)));
        assert!((0..1000).all(|_| sampler.keep(2.5)));
    }

    #[test]
    fn test_zero_and_negative_rates_dropped() {
        let sampler = seeded(7);
        assert!((0..10_000).all(|_| !sampler.keep(0.0)));
        assert!((0..10_000).all(|_| !sampler.keep(-1.0)));
    }

    #[test]
    fn test_partial_rate_converges() {
        let sampler = seeded(42);
        let n = 20_000;

        for rate in [0.1f32, 0.25, 0.5, 0.9] {
            let kept = (0..n).filter(|_| sampler.keep(rate)).count();
            let observed = kept as f32 / n as f32;
            assert!(
                (observed - rate).abs() < 0.02,
                "rate {} observed {} over {} draws",
                rate,
                observed,
                n
            );
        }
    }

    #[test]
    fn test_same_seed_same_decisions() {
        let first = seeded(99);
        let second = seeded(99);

        let a: Vec<bool> = (0..500).map(|_| first.keep(0.5)).collect();
        let b: Vec<bool> = (0..500).map(|_| second.keep(0.5)).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_thread_local_partial_rate_sometimes_drops() {
        let sampler = Sampler::default();
        let kept = (0..1000).filter(|_| sampler.keep(0.5)).count();

        assert!(kept > 0); // always happening (probably)
        assert!(kept < 1000); // never happening (probably)
    }
}
