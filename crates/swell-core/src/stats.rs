//! Summary statistics of a displaced surface, used for bake diagnostics.
use serde::Serialize;

use crate::vector::Vec3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SurfaceStats {
    pub min_height: f32,
    pub max_height: f32,
    pub mean_height: f32,
    pub std_height: f32,
    /// Largest horizontal displacement length.
    pub max_horizontal: f32,
}

impl SurfaceStats {
    /// Statistics over a slice of displacement vectors. An empty slice gives
    /// all zeros.
    pub fn from_displacements(displacements: &[Vec3]) -> Self {
        if displacements.is_empty() {
            return Self {
                min_height: 0.0,
                max_height: 0.0,
                mean_height: 0.0,
                std_height: 0.0,
                max_horizontal: 0.0,
            };
        }

        let n = displacements.len() as f64;
        let mut min_height = f32::INFINITY;
        let mut max_height = f32::NEG_INFINITY;
        let mut max_horizontal = 0.0f32;
        let mut sum = 0.0f64;
        for d in displacements {
            min_height = min_height.min(d.y);
            max_height = max_height.max(d.y);
            max_horizontal = max_horizontal.max((d.x * d.x + d.z * d.z).sqrt());
            sum += d.y as f64;
        }
        let mean = sum / n;
        let var = displacements.iter().map(|d| (d.y as f64 - mean).powi(2)).sum::<f64>() / n;

        Self {
            min_height,
            max_height,
            mean_height: mean as f32,
            std_height: var.sqrt() as f32,
            max_horizontal,
        }
    }

    /// Crest-or-trough amplitude: `max(|min|, |max|)`.
    pub fn max_abs_height(&self) -> f32 {
        self.min_height.abs().max(self.max_height.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_over_known_heights() {
        let d = [
            Vec3::new(3.0, -1.0, 4.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 3.0, 0.0),
        ];
        let s = SurfaceStats::from_displacements(&d);
        assert_eq!(s.min_height, -1.0);
        assert_eq!(s.max_height, 3.0);
        assert!((s.mean_height - 1.0).abs() < 1e-6);
        assert!((s.std_height - (8.0f32 / 3.0).sqrt()).abs() < 1e-5);
        assert_eq!(s.max_horizontal, 5.0);
        assert_eq!(s.max_abs_height(), 3.0);
    }

    #[test]
    fn empty_slice_is_all_zero() {
        let s = SurfaceStats::from_displacements(&[]);
        assert_eq!(s.max_abs_height(), 0.0);
    }
}
