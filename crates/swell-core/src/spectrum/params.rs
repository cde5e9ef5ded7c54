use serde::{Deserialize, Serialize};

use crate::error::{OceanError, Result};

/// Spectrum and synthesis parameters for one sea state.
/// Defaults reproduce the reference scene (30 m/s wind blowing toward −z).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectrumParams {
    /// Seed for the Gaussian draws of the initial spectrum.
    pub seed: u64,
    /// Phillips amplitude `A`.
    pub amplitude: f32,
    /// Wind direction on the (x, z) plane; normalized internally.
    pub wind_direction: [f32; 2],
    /// Wind speed in m/s. Sets the dominant wave scale `V²/g`.
    pub wind_speed: f32,
    /// Fraction of the wind wave scale below which ripples are suppressed.
    pub damping: f32,
    /// Multiplier turning the normalized vertical IFFT output into world height.
    /// A visual calibration constant, not a physical one.
    pub height_scale: f32,
    /// Multiplier on horizontal (Gerstner) displacement. 0 = pure heightfield.
    pub choppiness: f32,
}

impl Default for SpectrumParams {
    fn default() -> Self {
        Self {
            seed: 42,
            amplitude: 0.0005,
            wind_direction: [0.0, -1.0],
            wind_speed: 30.0,
            damping: 0.001,
            height_scale: 70.0,
            choppiness: 1.0,
        }
    }
}

impl SpectrumParams {
    /// Check every scalar is usable and return the unit wind direction.
    pub fn validate(&self) -> Result<[f32; 2]> {
        let scalars = [
            ("amplitude", self.amplitude),
            ("wind_speed", self.wind_speed),
            ("damping", self.damping),
            ("height_scale", self.height_scale),
            ("choppiness", self.choppiness),
        ];
        for (name, value) in scalars {
            if !value.is_finite() || value < 0.0 {
                return Err(OceanError::InvalidParameter { name, value });
            }
        }

        let [wx, wz] = self.wind_direction;
        let len = (wx * wx + wz * wz).sqrt();
        if !len.is_finite() || len < 1e-6 {
            return Err(OceanError::InvalidWindDirection);
        }
        Ok([wx / len, wz / len])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_validate() {
        let dir = SpectrumParams::default().validate().unwrap();
        assert_eq!(dir, [0.0, -1.0]);
    }

    #[test]
    fn wind_direction_is_normalized() {
        let p = SpectrumParams { wind_direction: [3.0, 4.0], ..Default::default() };
        let [x, z] = p.validate().unwrap();
        assert!((x - 0.6).abs() < 1e-6 && (z - 0.8).abs() < 1e-6);
    }

    #[test]
    fn rejects_zero_wind_and_negative_scalars() {
        let p = SpectrumParams { wind_direction: [0.0, 0.0], ..Default::default() };
        assert_eq!(p.validate(), Err(OceanError::InvalidWindDirection));

        let p = SpectrumParams { amplitude: -1.0, ..Default::default() };
        assert!(matches!(
            p.validate(),
            Err(OceanError::InvalidParameter { name: "amplitude", .. })
        ));

        let p = SpectrumParams { wind_speed: f32::INFINITY, ..Default::default() };
        assert!(p.validate().is_err());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let p: SpectrumParams = serde_json::from_str(r#"{ "wind_speed": 12.5, "seed": 7 }"#).unwrap();
        assert_eq!(p.wind_speed, 12.5);
        assert_eq!(p.seed, 7);
        assert_eq!(p.height_scale, SpectrumParams::default().height_scale);
    }
}
