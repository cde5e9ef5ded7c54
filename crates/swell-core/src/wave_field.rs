//! Spectral wave field: evolves the seeded spectrum in time and synthesizes
//! the displaced surface and its normals through a 2D inverse FFT.
//!
//! Per `update(t)`:
//!   1. h̃(K,t) = h0(K)·e^{iωt} + conj(h0(−K))·e^{−iωt}, ω = √(g|K|); DC forced to 0.
//!   2. Vertical spectrum = h̃; horizontal spectra = i·K̂·h̃ (scaled by choppiness).
//!      Mirror cells get the conjugate of their partner so the transform is real.
//!   3. Recentre (the zero wavevector sits at N/2), inverse FFT, un-recentre.
//!   4. vertex = rest + (x, height_scale·y, z).
//!   5. Normals from central differences over the periodic grid.
use std::f64::consts::TAU;

use num_complex::Complex32;

use crate::error::{OceanError, Result};
use crate::fft::Ifft2d;
use crate::grid::OceanGrid;
use crate::spectrum::phillips::MIN_WAVENUMBER;
use crate::spectrum::{GaussianSource, InitialSpectrum, PhillipsSpectrum, RngGaussian, SpectrumParams};
use crate::stats::SurfaceStats;
use crate::vector::Vec3;
use crate::GRAVITY;

const X: usize = 0;
const Y: usize = 1;
const Z: usize = 2;

/// Static per-cell data derived from the grid at construction.
#[derive(Debug, Clone, Copy)]
struct SpectralCell {
    k_len: f32,
    /// Unit wavevector; zero for the DC cell.
    k_hat: [f32; 2],
    /// Angular frequency in rad/s.
    omega: f64,
    /// Flat index of the cell at −K.
    mirror: usize,
}

#[derive(Debug)]
pub struct WaveField {
    grid: OceanGrid,
    params: SpectrumParams,
    initial: InitialSpectrum,
    cells: Vec<SpectralCell>,

    evolved: Vec<Complex32>,
    /// Displacement spectra, indexed by axis X, Y, Z.
    spectra: [Vec<Complex32>; 3],
    work: Vec<Complex32>,
    ifft: Ifft2d,

    rest: Vec<Vec3>,
    offsets: Vec<Vec3>,
    vertices: Vec<Vec3>,
    normals: Vec<Vec3>,
}

impl WaveField {
    /// Build a wave field seeded deterministically from `params.seed`.
    pub fn new(grid: OceanGrid, params: &SpectrumParams) -> Result<Self> {
        Self::with_source(grid, params, &mut RngGaussian::from_seed(params.seed))
    }

    /// Build a wave field drawing its initial amplitudes from `source`.
    pub fn with_source<S: GaussianSource + ?Sized>(
        grid: OceanGrid,
        params: &SpectrumParams,
        source: &mut S,
    ) -> Result<Self> {
        let phillips = PhillipsSpectrum::new(params)?;
        let ifft = Ifft2d::new(grid.resolution())?;
        let initial = InitialSpectrum::generate(&grid, &phillips, source);

        let n = grid.resolution();
        let count = grid.cell_count();
        let mut cells = Vec::with_capacity(count);
        for row in 0..n {
            for col in 0..n {
                let [kx, kz] = grid.wavevector(row, col);
                let k_len = (kx * kx + kz * kz).sqrt();
                let k_hat = if k_len < MIN_WAVENUMBER { [0.0, 0.0] } else { [kx / k_len, kz / k_len] };
                cells.push(SpectralCell {
                    k_len,
                    k_hat,
                    omega: dispersion(k_len),
                    mirror: grid.mirror_index(row, col),
                });
            }
        }

        let rest = grid.rest_positions();
        let zero = Complex32::new(0.0, 0.0);
        Ok(Self {
            grid,
            params: params.clone(),
            initial,
            cells,
            evolved: vec![zero; count],
            spectra: [vec![zero; count], vec![zero; count], vec![zero; count]],
            work: vec![zero; count],
            ifft,
            vertices: rest.clone(),
            rest,
            offsets: vec![Vec3::ZERO; count],
            normals: vec![Vec3::Y; count],
        })
    }

    /// Quantize every angular frequency to the nearest multiple of `2π/period`
    /// so the whole surface repeats exactly after `period` seconds. Waves
    /// slower than the loop fundamental run at the fundamental instead of
    /// stopping; only the DC cell keeps ω = 0.
    pub fn looping(mut self, period: f32) -> Result<Self> {
        if !period.is_finite() || period <= 0.0 {
            return Err(OceanError::InvalidParameter { name: "loop_period", value: period });
        }
        let base = TAU / period as f64;
        for cell in &mut self.cells {
            if cell.k_len < MIN_WAVENUMBER {
                continue;
            }
            cell.omega = (dispersion(cell.k_len) / base).round().max(1.0) * base;
        }
        Ok(self)
    }

    #[inline]
    pub fn grid(&self) -> &OceanGrid {
        &self.grid
    }

    #[inline]
    pub fn params(&self) -> &SpectrumParams {
        &self.params
    }

    #[inline]
    pub fn initial_spectrum(&self) -> &InitialSpectrum {
        &self.initial
    }

    /// Displaced vertex positions from the last `update`.
    #[inline]
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Undisplaced grid positions. Never change.
    #[inline]
    pub fn original_positions(&self) -> &[Vec3] {
        &self.rest
    }

    #[inline]
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// `vertices − original_positions`, computed directly from the IFFT output.
    #[inline]
    pub fn displacements(&self) -> &[Vec3] {
        &self.offsets
    }

    /// Vertical displacement spectrum of the last `update`, before recentring.
    #[inline]
    pub fn height_spectrum(&self) -> &[Complex32] {
        &self.spectra[Y]
    }

    pub fn surface_stats(&self) -> SurfaceStats {
        SurfaceStats::from_displacements(&self.offsets)
    }

    /// Evaluate the surface at `time` seconds. Deterministic: the result
    /// depends only on the seed spectrum and `time`.
    pub fn update(&mut self, time: f32) {
        self.evolve(time as f64);
        self.fill_displacement_spectra();

        let n = self.grid.resolution();
        let gains = [self.params.choppiness, self.params.height_scale, self.params.choppiness];
        for axis in [X, Y, Z] {
            recentred_ifft(&mut self.ifft, &self.spectra[axis], &mut self.work, n);
            let gain = gains[axis];
            for (idx, (offset, w)) in self.offsets.iter_mut().zip(&self.work).enumerate() {
                let v = checkerboard(idx, n) * w.re * gain;
                match axis {
                    X => offset.x = v,
                    Y => offset.y = v,
                    _ => offset.z = v,
                }
            }
        }

        for ((vertex, rest), offset) in self.vertices.iter_mut().zip(&self.rest).zip(&self.offsets) {
            *vertex = *rest + *offset;
        }
        compute_normals(&self.grid, &self.offsets, &mut self.normals);
    }

    fn evolve(&mut self, t: f64) {
        let h0 = self.initial.h0();
        let h0_conj = self.initial.h0_conj();
        for (idx, (out, cell)) in self.evolved.iter_mut().zip(&self.cells).enumerate() {
            if cell.k_len < MIN_WAVENUMBER {
                *out = Complex32::new(0.0, 0.0);
                continue;
            }
            let (s, c) = (cell.omega * t).sin_cos();
            let phase = Complex32::new(c as f32, s as f32);
            *out = h0[idx] * phase + h0_conj[cell.mirror] * phase.conj();
        }
    }

    fn fill_displacement_spectra(&mut self) {
        for (idx, cell) in self.cells.iter().enumerate() {
            // Each mirror pair is written once, from its lower index.
            if cell.mirror < idx {
                continue;
            }
            let h = self.evolved[idx];
            let rotated = Complex32::new(-h.im, h.re);
            let values = [rotated * cell.k_hat[0], h, rotated * cell.k_hat[1]];
            for axis in [X, Y, Z] {
                self.spectra[axis][idx] = values[axis];
                if cell.mirror != idx {
                    self.spectra[axis][cell.mirror] = values[axis].conj();
                }
            }
        }
    }
}

/// Deep-water dispersion ω = √(g·k).
fn dispersion(k_len: f32) -> f64 {
    (GRAVITY as f64 * k_len as f64).sqrt()
}

/// `(−1)^(row+col)`.
#[inline]
fn checkerboard(idx: usize, n: usize) -> f32 {
    if (idx / n + idx % n) % 2 == 0 { 1.0 } else { -1.0 }
}

/// Inverse-transform a spectrum whose zero frequency sits at `(N/2, N/2)`.
/// The caller multiplies the result by `checkerboard` again to land on the
/// rest grid.
fn recentred_ifft(ifft: &mut Ifft2d, spectrum: &[Complex32], work: &mut [Complex32], n: usize) {
    for (idx, (w, s)) in work.iter_mut().zip(spectrum).enumerate() {
        *w = *s * checkerboard(idx, n);
    }
    ifft.process(work);
}

/// Central-difference normals. Neighbour indices wrap, and the rest spacing is
/// added back explicitly so the seam sees the same geometry as the interior.
fn compute_normals(grid: &OceanGrid, offsets: &[Vec3], normals: &mut [Vec3]) {
    let n = grid.resolution();
    let span_x = Vec3::new(2.0 * grid.cell_size_x(), 0.0, 0.0);
    let span_z = Vec3::new(0.0, 0.0, 2.0 * grid.cell_size_z());
    for row in 0..n {
        let up = (row + 1) % n;
        let down = (row + n - 1) % n;
        for col in 0..n {
            let right = (col + 1) % n;
            let left = (col + n - 1) % n;
            let tangent = offsets[grid.index(row, right)] - offsets[grid.index(row, left)] + span_x;
            let bitangent = offsets[grid.index(up, col)] - offsets[grid.index(down, col)] + span_z;
            normals[grid.index(row, col)] = bitangent.cross(tangent).normalize_or(Vec3::Y);
        }
    }
}
