//! Phillips spectrum: wind-driven energy density over wavevectors.
//!
//! P(K) = A · exp(−1/(k²·Lw²)) / k⁴ · (K̂·ŵ)² · exp(−k²·l²)
//!
//! with Lw = V²/g the largest wave sustained by wind speed V, ŵ the unit wind
//! direction and l = Lw · damping the ripple cut-off length.
use crate::error::Result;
use crate::spectrum::params::SpectrumParams;
use crate::GRAVITY;

/// Wavenumbers below this are treated as the mean (DC) component.
pub const MIN_WAVENUMBER: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhillipsSpectrum {
    amplitude: f32,
    wind_dir: [f32; 2],
    /// Lw².
    wind_scale_sq: f32,
    /// l².
    damping_sq: f32,
}

impl PhillipsSpectrum {
    pub fn new(params: &SpectrumParams) -> Result<Self> {
        let wind_dir = params.validate()?;
        let wind_scale = params.wind_speed * params.wind_speed / GRAVITY;
        let damping_len = wind_scale * params.damping;
        Ok(Self {
            amplitude: params.amplitude,
            wind_dir,
            wind_scale_sq: wind_scale * wind_scale,
            damping_sq: damping_len * damping_len,
        })
    }

    /// Energy density at wavevector `k = (kx, kz)`. Always ≥ 0; exactly 0 at
    /// the DC term and for a calm sea (zero wind speed).
    pub fn density(&self, k: [f32; 2]) -> f32 {
        let k_len_sq = k[0] * k[0] + k[1] * k[1];
        let k_len = k_len_sq.sqrt();
        if k_len < MIN_WAVENUMBER || self.wind_scale_sq == 0.0 {
            return 0.0;
        }

        let k_dot_w = (k[0] * self.wind_dir[0] + k[1] * self.wind_dir[1]) / k_len;
        let value = self.amplitude
            * (-1.0 / (k_len_sq * self.wind_scale_sq)).exp()
            / (k_len_sq * k_len_sq)
            * k_dot_w
            * k_dot_w
            * (-k_len_sq * self.damping_sq).exp();

        // exp underflow and 0/0 at extreme scales collapse to no energy.
        if value.is_finite() { value.max(0.0) } else { 0.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spectrum(wind: [f32; 2]) -> PhillipsSpectrum {
        PhillipsSpectrum::new(&SpectrumParams {
            amplitude: 0.0005,
            wind_direction: wind,
            wind_speed: 10.0,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn zero_at_dc() {
        let p = spectrum([1.0, 0.0]);
        assert_eq!(p.density([0.0, 0.0]), 0.0);
        assert_eq!(p.density([MIN_WAVENUMBER * 0.5, 0.0]), 0.0);
    }

    #[test]
    fn non_negative_over_a_sweep() {
        let p = spectrum([1.0, 0.5]);
        for i in -40..=40 {
            for j in -40..=40 {
                let k = [i as f32 * 0.05, j as f32 * 0.05];
                let d = p.density(k);
                assert!(d >= 0.0 && d.is_finite(), "P({k:?}) = {d}");
            }
        }
    }

    #[test]
    fn crosswind_waves_carry_no_energy() {
        let p = spectrum([1.0, 0.0]);
        assert_eq!(p.density([0.0, 0.1]), 0.0);
        assert!(p.density([0.1, 0.0]) > 0.0);
    }

    #[test]
    fn symmetric_under_wavevector_negation() {
        let p = spectrum([0.6, 0.8]);
        let k = [0.07, -0.03];
        assert!((p.density(k) - p.density([-k[0], -k[1]])).abs() < 1e-12);
    }

    #[test]
    fn calm_sea_has_no_energy() {
        let p = PhillipsSpectrum::new(&SpectrumParams { wind_speed: 0.0, ..Default::default() })
            .unwrap();
        assert_eq!(p.density([0.1, 0.1]), 0.0);
    }
}
