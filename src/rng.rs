// src/rng.rs
//! Random Number Generation for LSM Simulations
//!
//! # Design
//!
//! A pricing run is reproducible from one `u64` base seed:
//! 1. **Per-path streams**: path `i` draws all of its normals from
//!    `StdRng::seed_from_u64(base_seed + i)`, so the path matrix does not depend
//!    on how rows are scheduled across threads.
//! 2. **Split stream**: the training/evaluation partition uses its own stream,
//!    derived from the base seed, so enabling path splitting never perturbs
//!    the simulated paths.
//!
//! A run without a seed draws the base seed from OS entropy. The seed actually
//! used is reported back so such runs can still be replayed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

/// Offset separating the partition stream from the per-path streams.
const SPLIT_STREAM_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

/// RNG factory for reproducible parallel simulations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RngFactory {
    base_seed: u64,
}

impl RngFactory {
    pub fn new(base_seed: u64) -> Self {
        Self { base_seed }
    }

    /// Factory with a fresh, unreproducible base seed.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy().gen())
    }

    /// Seeded factory when `seed` is given, entropy-seeded otherwise.
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::new)
    }

    pub fn base_seed(&self) -> u64 {
        self.base_seed
    }

    /// Create the standard RNG for a specific path
    pub fn create_std_rng(&self, path_id: u64) -> StdRng {
        StdRng::seed_from_u64(self.base_seed.wrapping_add(path_id))
    }

    /// RNG used to draw the training/evaluation partition
    pub fn split_rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.base_seed ^ SPLIT_STREAM_SALT)
    }
}

pub fn get_normal_draw<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    StandardNormal.sample(rng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_std_rng_reproducibility() {
        let factory = RngFactory::new(42);

        let mut rng1 = factory.create_std_rng(7);
        let mut rng2 = factory.create_std_rng(7);

        for _ in 0..100 {
            assert_eq!(get_normal_draw(&mut rng1), get_normal_draw(&mut rng2));
        }
    }

    #[test]
    fn test_different_paths_differ() {
        let factory = RngFactory::new(42);

        let mut rng1 = factory.create_std_rng(0);
        let mut rng2 = factory.create_std_rng(1);

        let vals1: Vec<f64> = (0..10).map(|_| get_normal_draw(&mut rng1)).collect();
        let vals2: Vec<f64> = (0..10).map(|_| get_normal_draw(&mut rng2)).collect();

        assert_ne!(vals1, vals2);
    }

    #[test]
    fn test_split_stream_is_distinct_from_path_streams() {
        let factory = RngFactory::new(42);
        let mut split = factory.split_rng();
        let mut first_path = factory.create_std_rng(0);

        let a: Vec<u64> = (0..4).map(|_| split.gen()).collect();
        let b: Vec<u64> = (0..4).map(|_| first_path.gen()).collect();
        assert_ne!(a, b);
    }

    #[test]
    fn test_optional_seed() {
        assert_eq!(RngFactory::from_optional_seed(Some(5)).base_seed(), 5);
        // Two entropy factories colliding has probability 2^-64.
        assert_ne!(
            RngFactory::from_entropy().base_seed(),
            RngFactory::from_entropy().base_seed()
        );
    }

    #[test]
    fn test_normal_distribution() {
        let factory = RngFactory::new(42);
        let mut rng = factory.create_std_rng(0);

        let samples: Vec<f64> = (0..10000).map(|_| get_normal_draw(&mut rng)).collect();

        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        let variance =
            samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / samples.len() as f64;

        assert!(mean.abs() < 0.05, "Mean should be close to 0, got {}", mean);
        assert!(
            (variance - 1.0).abs() < 0.05,
            "Variance should be close to 1, got {}",
            variance
        );
    }
}
