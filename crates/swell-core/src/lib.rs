//! Offline FFT ocean synthesis.
//!
//! A [`wave_field::WaveField`] samples a Phillips spectrum once and evaluates
//! the displaced surface at any time through a 2D inverse FFT. An
//! [`baker::OceanBaker`] drives a wave field across one loop period and
//! collects the result into a [`volume::BakedVolume`] laid out for a
//! volumetric RGB32F texture.
pub mod baker;
pub mod error;
pub mod fft;
pub mod grid;
pub mod spectrum;
pub mod stats;
pub mod vector;
pub mod volume;
pub mod wave_field;

pub use baker::{reconcile_time_span, BakeConfig, BakeProgress, LoopPeriod, OceanBaker};
pub use error::{OceanError, Result};
pub use grid::OceanGrid;
pub use spectrum::params::SpectrumParams;
pub use vector::Vec3;
pub use volume::{BakedVolume, Playback, VolumeLayout, VolumeUpload};
pub use wave_field::WaveField;

/// Gravitational acceleration used by the deep-water dispersion relation (m/s²).
pub const GRAVITY: f32 = 9.81;
