use thiserror::Error;

/// Everything that can go wrong while configuring or running a bake.
///
/// The numerical pipeline itself has no runtime failure modes; all variants
/// except [`OceanError::Cancelled`] are raised at construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OceanError {
    #[error("grid resolution {0} must be a power of two and at least 2")]
    InvalidResolution(usize),

    #[error("domain half-extent along {axis} must be finite and positive, got {value}")]
    InvalidExtent { axis: char, value: f32 },

    #[error("wind direction must be a finite, non-zero vector")]
    InvalidWindDirection,

    #[error("spectrum parameter `{name}` must be finite and non-negative, got {value}")]
    InvalidParameter { name: &'static str, value: f32 },

    #[error("a bake needs at least one time sample")]
    InvalidSampleCount,

    #[error("bake cancelled after {completed} of {total} time samples")]
    Cancelled { completed: usize, total: usize },
}

pub type Result<T> = std::result::Result<T, OceanError>;
