//! Volumetric baker: runs a wave field over one seamless loop and collects
//! the displacement and normal fields into an `N × N × T` volume.
use std::convert::Infallible;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{OceanError, Result};
use crate::grid::OceanGrid;
use crate::spectrum::SpectrumParams;
use crate::volume::{BakedVolume, VolumeLayout};
use crate::wave_field::WaveField;
use crate::GRAVITY;

/// Resolved spans closer than this to the request (seconds) are not reported.
const SPAN_TOLERANCE: f32 = 1e-3;

/// Everything needed to bake one ocean volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BakeConfig {
    /// Spatial resolution N (power of two).
    pub resolution: usize,
    /// Number of time slices T.
    pub time_samples: usize,
    /// Requested loop length in seconds; snapped to a whole number of
    /// fastest-wave periods.
    pub time_span: f32,
    pub half_extent_x: f32,
    pub half_extent_z: f32,
    pub spectrum: SpectrumParams,
}

impl Default for BakeConfig {
    fn default() -> Self {
        Self {
            resolution: 64,
            time_samples: 32,
            time_span: 5.0,
            half_extent_x: 256.0,
            half_extent_z: 256.0,
            spectrum: SpectrumParams::default(),
        }
    }
}

impl BakeConfig {
    pub fn grid(&self) -> Result<OceanGrid> {
        OceanGrid::new(self.resolution, self.half_extent_x, self.half_extent_z)
    }
}

/// Outcome of snapping a requested loop length to the wave physics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LoopPeriod {
    pub requested: f32,
    /// Period of the shortest wave the grid represents.
    pub min_period: f32,
    /// Whole periods of `min_period` in the loop (≥ 1).
    pub cycles: u32,
    pub resolved: f32,
}

impl LoopPeriod {
    pub fn was_adjusted(&self) -> bool {
        let diff = (self.resolved - self.requested).abs();
        diff.is_nan() || diff > SPAN_TOLERANCE
    }
}

/// Period of the highest-frequency wave on `grid`:
/// λ = min(2Lx/N, 2Lz/N), k = 2π/λ, ω = √(g·k), T = 2π/ω.
pub fn min_wave_period(grid: &OceanGrid) -> f32 {
    let n = grid.resolution() as f64;
    let wavelength = (2.0 * grid.half_extent_x() as f64 / n).min(2.0 * grid.half_extent_z() as f64 / n);
    let k_max = std::f64::consts::TAU / wavelength;
    let omega_max = (GRAVITY as f64 * k_max).sqrt();
    (std::f64::consts::TAU / omega_max) as f32
}

/// Snap `requested` to the nearest whole multiple of the grid's minimum wave
/// period, never below one period. Non-finite or non-positive requests
/// resolve to a single period. Never fails.
pub fn reconcile_time_span(requested: f32, grid: &OceanGrid) -> LoopPeriod {
    let min_period = min_wave_period(grid);
    let ratio = requested as f64 / min_period as f64;
    let cycles = if ratio.is_finite() && ratio > 0.0 {
        ratio.round().clamp(1.0, u32::MAX as f64) as u32
    } else {
        1
    };
    LoopPeriod {
        requested,
        min_period,
        cycles,
        resolved: (cycles as f64 * min_period as f64) as f32,
    }
}

/// Shared bake progress: a monotonically increasing slice counter and a
/// cooperative cancel flag, safe to poll from another thread.
#[derive(Debug, Default)]
pub struct BakeProgress {
    completed: AtomicUsize,
    total: AtomicUsize,
    cancelled: AtomicBool,
}

impl BakeProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Acquire)
    }

    pub fn total(&self) -> usize {
        self.total.load(Ordering::Acquire)
    }

    /// Completed fraction in `[0, 1]`; 0 before the bake starts.
    pub fn fraction(&self) -> f32 {
        let total = self.total();
        if total == 0 { 0.0 } else { self.completed() as f32 / total as f32 }
    }

    pub fn is_finished(&self) -> bool {
        let total = self.total();
        total > 0 && self.completed() >= total
    }

    /// Ask a running bake to stop before its next slice.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    fn start(&self, total: usize) {
        self.completed.store(0, Ordering::Release);
        self.total.store(total, Ordering::Release);
    }

    fn advance(&self) {
        self.completed.fetch_add(1, Ordering::AcqRel);
    }
}

/// Owns the wave field for the duration of one bake.
#[derive(Debug)]
pub struct OceanBaker {
    field: WaveField,
    time_samples: usize,
    period: LoopPeriod,
}

impl OceanBaker {
    /// Validate `config`, reconcile the loop length and seed the wave field.
    pub fn new(config: &BakeConfig) -> Result<Self> {
        if config.time_samples == 0 {
            return Err(OceanError::InvalidSampleCount);
        }
        let grid = config.grid()?;
        let period = reconcile_time_span(config.time_span, &grid);
        if period.was_adjusted() {
            warn!(
                "adjusting bake time span from {:.3}s to {:.3}s ({} × {:.3}s) for a seamless loop",
                period.requested, period.resolved, period.cycles, period.min_period
            );
        }
        let field = WaveField::new(grid, &config.spectrum)?.looping(period.resolved)?;
        Ok(Self { field, time_samples: config.time_samples, period })
    }

    #[inline]
    pub fn loop_period(&self) -> LoopPeriod {
        self.period
    }

    /// Resolved loop length in seconds.
    #[inline]
    pub fn time_span(&self) -> f32 {
        self.period.resolved
    }

    #[inline]
    pub fn resolution(&self) -> usize {
        self.field.grid().resolution()
    }

    #[inline]
    pub fn time_samples(&self) -> usize {
        self.time_samples
    }

    pub fn layout(&self) -> VolumeLayout {
        VolumeLayout {
            resolution: self.resolution(),
            time_samples: self.time_samples,
            time_span: self.period.resolved,
        }
    }

    /// Evaluation time of every slice, in order.
    pub fn sample_times(&self) -> Vec<f32> {
        let layout = self.layout();
        (0..self.time_samples).map(|i| layout.sample_time(i)).collect()
    }

    /// Bake every slice. The wave field is dropped when this returns.
    pub fn bake(self) -> BakedVolume {
        let progress = BakeProgress::new();
        match self.run(&progress, |_| Ok::<(), Infallible>(())) {
            Ok(volume) => volume,
            Err(never) => match never {},
        }
    }

    /// Bake while publishing progress; stops between slices with
    /// [`OceanError::Cancelled`] once `progress.cancel()` has been called.
    pub fn bake_with(self, progress: &BakeProgress) -> Result<BakedVolume> {
        self.run(progress, |p| {
            if p.is_cancelled() {
                Err(OceanError::Cancelled { completed: p.completed(), total: p.total() })
            } else {
                Ok(())
            }
        })
    }

    fn run<E>(
        mut self,
        progress: &BakeProgress,
        mut checkpoint: impl FnMut(&BakeProgress) -> std::result::Result<(), E>,
    ) -> std::result::Result<BakedVolume, E> {
        let layout = self.layout();
        let n = layout.resolution;
        let grid = *self.field.grid();
        info!(
            "baking {n}×{n}×{} ocean volume: span {:.3}s, domain {}×{}",
            layout.time_samples,
            layout.time_span,
            2.0 * grid.half_extent_x(),
            2.0 * grid.half_extent_z()
        );

        progress.start(layout.time_samples);
        let mut displacement = Vec::with_capacity(layout.texel_count());
        let mut normal = Vec::with_capacity(layout.texel_count());

        for i in 0..layout.time_samples {
            checkpoint(progress)?;
            let time = layout.sample_time(i);
            self.field.update(time);

            let vertices = self.field.vertices();
            let rest = self.field.original_positions();
            displacement.extend(vertices.iter().zip(rest).map(|(v, r)| *v - *r));
            normal.extend_from_slice(self.field.normals());

            progress.advance();
            debug!("baked slice {}/{} at t={time:.3}s", i + 1, layout.time_samples);
        }

        let volume = BakedVolume::new(layout, displacement, normal);
        log_surface_stats(&volume);
        info!(
            "bake complete: {:.2} MiB across displacement and normal volumes",
            (2 * layout.byte_len()) as f64 / (1024.0 * 1024.0)
        );
        Ok(volume)
    }
}

/// Height range at the start, middle and end of the loop.
fn log_surface_stats(volume: &BakedVolume) {
    if !log::log_enabled!(log::Level::Debug) {
        return;
    }
    let last = volume.time_samples() - 1;
    for t in [0, last / 2, last] {
        let s = volume.slice_stats(t);
        debug!(
            "slice {t} (t={:.3}s): height [{:.3}, {:.3}], mean {:.4}, std {:.3}, max horizontal {:.3}",
            volume.layout().sample_time(t),
            s.min_height,
            s.max_height,
            s.mean_height,
            s.std_height,
            s.max_horizontal
        );
    }
}
