//! Uniform random sources used by the variate generators.

use crate::error::ConfigError;
use crate::traits::UniformSource;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

const MODULUS: u64 = 2_147_483_647;
const MULTIPLIER: u64 = 630_360_016;

/// Seed of stream 1 in the classic Law & Kelton generator.
pub const DEFAULT_LCG_SEED: u64 = 1_973_272_912;

/// Prime-modulus multiplicative LCG (`z = 630360016 * z mod (2^31 - 1)`).
///
/// Output is mapped to `(((z >> 7) | 1) + 1) / 2^24`, which is never 0 but
/// can be exactly 1.0; callers that need an open interval go through
/// [`UniformSource::open_uniform`].
#[derive(Debug, Clone)]
pub struct Lcg {
    state: u64,
}

impl Lcg {
    pub fn new(seed: u64) -> Result<Self, ConfigError> {
        let state = seed % MODULUS;
        if state == 0 {
            return Err(ConfigError::ZeroLcgSeed);
        }
        Ok(Self { state })
    }

    pub fn state(&self) -> u64 {
        self.state
    }
}

impl UniformSource for Lcg {
    fn next_uniform(&mut self) -> f64 {
        self.state = self.state * MULTIPLIER % MODULUS;
        (((self.state >> 7) | 1) + 1) as f64 / 16_777_216.0
    }
}

impl UniformSource for StdRng {
    fn next_uniform(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum RngKind {
    #[default]
    Lcg,
    Platform,
}

/// The generator a run draws every variate from.
#[derive(Debug, Clone)]
pub enum RandomStream {
    Lcg(Lcg),
    Platform(StdRng),
}

impl RandomStream {
    pub fn new(kind: RngKind, seed: u64) -> Result<Self, ConfigError> {
        match kind {
            RngKind::Lcg => Ok(Self::Lcg(Lcg::new(seed)?)),
            RngKind::Platform => Ok(Self::Platform(StdRng::seed_from_u64(seed))),
        }
    }
}

impl UniformSource for RandomStream {
    fn next_uniform(&mut self) -> f64 {
        match self {
            Self::Lcg(lcg) => lcg.next_uniform(),
            Self::Platform(rng) => rng.next_uniform(),
        }
    }
}
