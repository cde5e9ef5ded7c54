use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::{OceanError, Result};
use crate::vector::Vec3;

/// Square `N × N` sampling lattice over one period of the ocean surface.
///
/// The domain spans `[-half_extent_x, half_extent_x)` along x (columns) and
/// `[-half_extent_z, half_extent_z)` along z (rows). Flat indices are
/// row-major: `row * N + col`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OceanGrid {
    resolution: usize,
    half_extent_x: f32,
    half_extent_z: f32,
}

impl OceanGrid {
    /// Validate and build a grid. `resolution` must be a power of two ≥ 2 and
    /// both half-extents finite and positive.
    pub fn new(resolution: usize, half_extent_x: f32, half_extent_z: f32) -> Result<Self> {
        if resolution < 2 || !resolution.is_power_of_two() {
            return Err(OceanError::InvalidResolution(resolution));
        }
        for (axis, value) in [('x', half_extent_x), ('z', half_extent_z)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(OceanError::InvalidExtent { axis, value });
            }
        }
        Ok(Self { resolution, half_extent_x, half_extent_z })
    }

    /// Square domain `[-half_extent, half_extent)²`.
    pub fn square(resolution: usize, half_extent: f32) -> Result<Self> {
        Self::new(resolution, half_extent, half_extent)
    }

    #[inline]
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.resolution * self.resolution
    }

    #[inline]
    pub fn half_extent_x(&self) -> f32 {
        self.half_extent_x
    }

    #[inline]
    pub fn half_extent_z(&self) -> f32 {
        self.half_extent_z
    }

    /// Rest spacing between neighbouring columns.
    #[inline]
    pub fn cell_size_x(&self) -> f32 {
        2.0 * self.half_extent_x / self.resolution as f32
    }

    /// Rest spacing between neighbouring rows.
    #[inline]
    pub fn cell_size_z(&self) -> f32 {
        2.0 * self.half_extent_z / self.resolution as f32
    }

    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.resolution + col
    }

    /// Index of the cell at the negated wavevector, `((N−m) mod N, (N−n) mod N)`.
    #[inline]
    pub fn mirror_index(&self, row: usize, col: usize) -> usize {
        let n = self.resolution;
        self.index((n - row) % n, (n - col) % n)
    }

    /// Wavevector `(kx, kz)` of spectral cell `(row, col)`.
    /// The zero wavevector sits at `(N/2, N/2)`.
    #[inline]
    pub fn wavevector(&self, row: usize, col: usize) -> [f32; 2] {
        let half = (self.resolution / 2) as f32;
        [
            PI * (col as f32 - half) / self.half_extent_x,
            PI * (row as f32 - half) / self.half_extent_z,
        ]
    }

    /// Undisplaced position of vertex `(row, col)` at sea level.
    #[inline]
    pub fn rest_position(&self, row: usize, col: usize) -> Vec3 {
        Vec3::new(
            -self.half_extent_x + col as f32 * self.cell_size_x(),
            0.0,
            -self.half_extent_z + row as f32 * self.cell_size_z(),
        )
    }

    /// Rest positions for every vertex in flat index order.
    pub fn rest_positions(&self) -> Vec<Vec3> {
        let n = self.resolution;
        (0..n)
            .flat_map(|row| (0..n).map(move |col| (row, col)))
            .map(|(row, col)| self.rest_position(row, col))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_power_of_two_resolution() {
        for n in [0, 1, 3, 6, 100] {
            assert_eq!(OceanGrid::square(n, 10.0), Err(OceanError::InvalidResolution(n)));
        }
        assert!(OceanGrid::square(64, 10.0).is_ok());
    }

    #[test]
    fn rejects_degenerate_extent() {
        assert!(matches!(
            OceanGrid::new(8, 0.0, 1.0),
            Err(OceanError::InvalidExtent { axis: 'x', .. })
        ));
        assert!(matches!(
            OceanGrid::new(8, 1.0, f32::NAN),
            Err(OceanError::InvalidExtent { axis: 'z', .. })
        ));
    }

    #[test]
    fn zero_wavevector_at_grid_centre() {
        let g = OceanGrid::square(8, 100.0).unwrap();
        assert_eq!(g.wavevector(4, 4), [0.0, 0.0]);
        let [kx, kz] = g.wavevector(4, 5);
        assert!((kx - PI / 100.0).abs() < 1e-7);
        assert_eq!(kz, 0.0);
    }

    #[test]
    fn mirror_negates_wavevector_away_from_nyquist_edge() {
        let g = OceanGrid::square(8, 50.0).unwrap();
        for row in 1..8 {
            for col in 1..8 {
                let m = g.mirror_index(row, col);
                let [kx, kz] = g.wavevector(row, col);
                let [mx, mz] = g.wavevector(m / 8, m % 8);
                assert!((kx + mx).abs() < 1e-6 && (kz + mz).abs() < 1e-6);
            }
        }
        // Mirror is an involution.
        for idx in 0..64 {
            let m = g.mirror_index(idx / 8, idx % 8);
            assert_eq!(g.mirror_index(m / 8, m % 8), idx);
        }
    }

    #[test]
    fn rest_positions_tile_one_period() {
        let g = OceanGrid::new(4, 2.0, 8.0).unwrap();
        let p = g.rest_positions();
        assert_eq!(p.len(), 16);
        assert_eq!(p[0], Vec3::new(-2.0, 0.0, -8.0));
        assert_eq!(p[g.index(3, 3)], Vec3::new(1.0, 0.0, 4.0));
        assert_eq!(g.cell_size_x(), 1.0);
        assert_eq!(g.cell_size_z(), 4.0);
    }
}
