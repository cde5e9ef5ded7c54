//! Frequency-domain model of the sea state: configuration, Phillips energy
//! density, and the random initial amplitudes drawn from it.
pub mod params;
pub mod phillips;
pub mod seed;

pub use params::SpectrumParams;
pub use phillips::PhillipsSpectrum;
pub use seed::{GaussianSource, InitialSpectrum, RngGaussian};
