//! Random initial amplitudes `h0(K)`, the persistent seed of a sea state.
use num_complex::Complex32;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::grid::OceanGrid;
use crate::spectrum::phillips::PhillipsSpectrum;

/// Supplier of independent standard-normal samples.
pub trait GaussianSource {
    fn standard_normal(&mut self) -> f32;
}

/// [`GaussianSource`] backed by any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngGaussian<R: Rng>(pub R);

impl RngGaussian<StdRng> {
    /// Deterministic source for a sea-state seed.
    pub fn from_seed(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed ^ 0x0CEA_5EED_9E37_79B9))
    }
}

impl<R: Rng> GaussianSource for RngGaussian<R> {
    fn standard_normal(&mut self) -> f32 {
        self.0.sample(StandardNormal)
    }
}

/// `h0` and its element-wise conjugate, fixed for the lifetime of a wave field.
#[derive(Debug, Clone)]
pub struct InitialSpectrum {
    h0: Vec<Complex32>,
    h0_conj: Vec<Complex32>,
}

impl InitialSpectrum {
    /// Draw `h0(K) = (ξr + iξi)·√(P(K)/2)` for every cell, row-major.
    /// Two normals are consumed per cell (real first), including the DC cell,
    /// so the draw sequence depends only on the resolution.
    pub fn generate<S: GaussianSource + ?Sized>(
        grid: &OceanGrid,
        spectrum: &PhillipsSpectrum,
        source: &mut S,
    ) -> Self {
        let n = grid.resolution();
        let mut h0 = Vec::with_capacity(grid.cell_count());
        for row in 0..n {
            for col in 0..n {
                let p = spectrum.density(grid.wavevector(row, col));
                let xi_r = source.standard_normal();
                let xi_i = source.standard_normal();
                h0.push(Complex32::new(xi_r, xi_i) * (p / 2.0).sqrt());
            }
        }
        let h0_conj = h0.iter().map(|h| h.conj()).collect();
        Self { h0, h0_conj }
    }

    #[inline]
    pub fn h0(&self) -> &[Complex32] {
        &self.h0
    }

    #[inline]
    pub fn h0_conj(&self) -> &[Complex32] {
        &self.h0_conj
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectrum::params::SpectrumParams;

    /// Replays a fixed cycle of values.
    struct Cycle {
        values: Vec<f32>,
        next: usize,
    }

    impl GaussianSource for Cycle {
        fn standard_normal(&mut self) -> f32 {
            let v = self.values[self.next % self.values.len()];
            self.next += 1;
            v
        }
    }

    fn setup() -> (OceanGrid, PhillipsSpectrum) {
        let grid = OceanGrid::square(8, 100.0).unwrap();
        let params = SpectrumParams { wind_direction: [1.0, 0.0], wind_speed: 10.0, ..Default::default() };
        (grid, PhillipsSpectrum::new(&params).unwrap())
    }

    #[test]
    fn conj_array_is_exact_conjugate() {
        let (grid, spectrum) = setup();
        let init = InitialSpectrum::generate(&grid, &spectrum, &mut RngGaussian::from_seed(3));
        for (h, c) in init.h0().iter().zip(init.h0_conj()) {
            assert_eq!(h.conj(), *c);
        }
    }

    #[test]
    fn amplitude_follows_phillips_density() {
        let (grid, spectrum) = setup();
        let mut source = Cycle { values: vec![1.0, -2.0], next: 0 };
        let init = InitialSpectrum::generate(&grid, &spectrum, &mut source);

        let idx = grid.index(4, 6);
        let scale = (spectrum.density(grid.wavevector(4, 6)) / 2.0).sqrt();
        assert!(scale > 0.0);
        assert_eq!(init.h0()[idx], Complex32::new(scale, -2.0 * scale));
        // DC cell carries nothing regardless of the draw.
        assert_eq!(init.h0()[grid.index(4, 4)], Complex32::new(0.0, 0.0));
    }

    #[test]
    fn same_seed_same_spectrum() {
        let (grid, spectrum) = setup();
        let a = InitialSpectrum::generate(&grid, &spectrum, &mut RngGaussian::from_seed(11));
        let b = InitialSpectrum::generate(&grid, &spectrum, &mut RngGaussian::from_seed(11));
        let c = InitialSpectrum::generate(&grid, &spectrum, &mut RngGaussian::from_seed(12));
        assert_eq!(a.h0(), b.h0());
        assert_ne!(a.h0(), c.h0());
    }
}
