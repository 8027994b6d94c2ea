//! Error type for rejected [`GrowthConfig`](crate::gen::GrowthConfig)s

use crate::Float;

/// The reason that a configuration was refused by the generator
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("turn angle must be finite, got {0}")]
    NonFiniteAngle(Float),

    #[error("length reduction factor must be within [0, 1), got {0}")]
    ReductionFactorOutOfRange(Float),

    #[error("initial branch length must be finite and greater than zero, got {0}")]
    InvalidBranchLength(Float),

    #[error("root position must be finite, got ({x}, {y}, {z})")]
    NonFiniteRoot { x: Float, y: Float, z: Float },

    #[error("iteration count {given} is above the maximum of {max}")]
    TooManyIterations { given: usize, max: usize },

    #[error("point capacity must be at least 1, to hold the root")]
    NoPointCapacity,
}
