//! Radix-2 Cooley–Tukey FFT over power-of-two lengths.
//!
//! Iterative and in place: the input is permuted into bit-reversed order and
//! combined with butterflies of doubling span. Twiddles and the permutation
//! are computed once per plan so a bake can reuse the same plan and scratch
//! buffer for every time sample.
use num_complex::Complex32;
#[cfg(feature = "threading")]
use rayon::prelude::*;

use crate::error::{OceanError, Result};

/// Precomputed twiddles and bit-reversal permutation for one transform length.
#[derive(Debug, Clone)]
pub struct Radix2Plan {
    len: usize,
    /// `e^{+2πik/len}` for `k ∈ [0, len/2)`; conjugated for the forward direction.
    twiddles: Vec<Complex32>,
    bit_reverse: Vec<usize>,
}

impl Radix2Plan {
    pub fn new(len: usize) -> Result<Self> {
        if len == 0 || !len.is_power_of_two() {
            return Err(OceanError::InvalidResolution(len));
        }
        let bits = len.trailing_zeros();
        let bit_reverse = (0..len)
            .map(|i| if bits == 0 { 0 } else { i.reverse_bits() >> (usize::BITS - bits) })
            .collect();
        let twiddles = (0..len / 2)
            .map(|k| {
                let angle = std::f64::consts::TAU * k as f64 / len as f64;
                Complex32::new(angle.cos() as f32, angle.sin() as f32)
            })
            .collect();
        Ok(Self { len, twiddles, bit_reverse })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Unnormalized inverse DFT: `x[j] = Σ_k X[k]·e^{+2πijk/N}`.
    pub fn inverse(&self, buf: &mut [Complex32]) {
        self.transform(buf, false);
    }

    /// Unnormalized forward DFT: `X[k] = Σ_j x[j]·e^{−2πijk/N}`.
    pub fn forward(&self, buf: &mut [Complex32]) {
        self.transform(buf, true);
    }

    fn transform(&self, buf: &mut [Complex32], forward: bool) {
        let n = self.len;
        assert_eq!(buf.len(), n, "buffer length does not match FFT plan");

        for (i, &j) in self.bit_reverse.iter().enumerate() {
            if i < j {
                buf.swap(i, j);
            }
        }

        let mut span = 2;
        while span <= n {
            let half = span / 2;
            let stride = n / span;
            for block in buf.chunks_exact_mut(span) {
                let (lo, hi) = block.split_at_mut(half);
                for k in 0..half {
                    let w = self.twiddles[k * stride];
                    let w = if forward { w.conj() } else { w };
                    let a = lo[k];
                    let b = hi[k] * w;
                    lo[k] = a + b;
                    hi[k] = a - b;
                }
            }
            span *= 2;
        }
    }
}

/// Normalized 2D inverse FFT over an `N × N` row-major array.
///
/// Every row is transformed before any column (the column pass runs on a
/// transposed copy held in the reusable scratch buffer), and the result is
/// scaled once by `1/N²`.
#[derive(Debug, Clone)]
pub struct Ifft2d {
    plan: Radix2Plan,
    scratch: Vec<Complex32>,
}

impl Ifft2d {
    pub fn new(side: usize) -> Result<Self> {
        let plan = Radix2Plan::new(side)?;
        Ok(Self { plan, scratch: vec![Complex32::new(0.0, 0.0); side * side] })
    }

    pub fn process(&mut self, data: &mut [Complex32]) {
        let n = self.plan.len();
        assert_eq!(data.len(), n * n, "buffer is not {n}×{n}");

        inverse_rows(&self.plan, data);
        transpose(data, &mut self.scratch, n);
        inverse_rows(&self.plan, &mut self.scratch);
        transpose(&self.scratch, data, n);

        let norm = 1.0 / (n * n) as f32;
        for v in data.iter_mut() {
            *v *= norm;
        }
    }
}

#[cfg(feature = "threading")]
fn inverse_rows(plan: &Radix2Plan, data: &mut [Complex32]) {
    data.par_chunks_mut(plan.len()).for_each(|row| plan.inverse(row));
}

#[cfg(not(feature = "threading"))]
fn inverse_rows(plan: &Radix2Plan, data: &mut [Complex32]) {
    data.chunks_mut(plan.len()).for_each(|row| plan.inverse(row));
}

fn transpose(src: &[Complex32], dst: &mut [Complex32], n: usize) {
    for r in 0..n {
        for c in 0..n {
            dst[c * n + r] = src[r * n + c];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::TAU;

    fn c(re: f32, im: f32) -> Complex32 {
        Complex32::new(re, im)
    }

    fn naive_inverse(input: &[Complex32]) -> Vec<Complex32> {
        let n = input.len();
        (0..n)
            .map(|j| {
                input.iter().enumerate().fold(c(0.0, 0.0), |acc, (k, &x)| {
                    let a = TAU * (j * k) as f64 / n as f64;
                    acc + x * c(a.cos() as f32, a.sin() as f32)
                })
            })
            .collect()
    }

    /// Textbook recursive even/odd split, kept as an oracle for the iterative plan.
    fn recursive_inverse(data: &mut [Complex32]) {
        let n = data.len();
        if n <= 1 {
            return;
        }
        let mut even: Vec<_> = data.iter().step_by(2).copied().collect();
        let mut odd: Vec<_> = data.iter().skip(1).step_by(2).copied().collect();
        recursive_inverse(&mut even);
        recursive_inverse(&mut odd);
        for k in 0..n / 2 {
            let a = TAU * k as f64 / n as f64;
            let t = c(a.cos() as f32, a.sin() as f32) * odd[k];
            data[k] = even[k] + t;
            data[k + n / 2] = even[k] - t;
        }
    }

    fn sample_signal(n: usize) -> Vec<Complex32> {
        (0..n).map(|i| c((i as f32 * 0.37).sin(), (i as f32 * 1.3).cos() * 0.5)).collect()
    }

    #[test]
    fn rejects_non_power_of_two_length() {
        assert!(Radix2Plan::new(0).is_err());
        assert!(Radix2Plan::new(12).is_err());
        assert!(Ifft2d::new(3).is_err());
        assert!(Radix2Plan::new(1).is_ok());
    }

    #[test]
    fn length_one_is_identity() {
        let plan = Radix2Plan::new(1).unwrap();
        let mut buf = vec![c(2.5, -1.0)];
        plan.inverse(&mut buf);
        assert_eq!(buf, vec![c(2.5, -1.0)]);
    }

    #[test]
    fn inverse_matches_naive_dft() {
        for n in [2, 4, 8, 32] {
            let input = sample_signal(n);
            let expected = naive_inverse(&input);
            let mut buf = input.clone();
            Radix2Plan::new(n).unwrap().inverse(&mut buf);
            for (got, want) in buf.iter().zip(&expected) {
                assert!((*got - *want).norm() < 1e-4, "n={n}: {got} vs {want}");
            }
        }
    }

    #[test]
    fn inverse_matches_recursive_split() {
        let input = sample_signal(64);
        let mut reference = input.clone();
        recursive_inverse(&mut reference);
        let mut buf = input;
        Radix2Plan::new(64).unwrap().inverse(&mut buf);
        for (got, want) in buf.iter().zip(&reference) {
            assert!((*got - *want).norm() < 1e-4);
        }
    }

    #[test]
    fn forward_then_inverse_scales_by_length() {
        let n = 16;
        let input = sample_signal(n);
        let plan = Radix2Plan::new(n).unwrap();
        let mut buf = input.clone();
        plan.forward(&mut buf);
        plan.inverse(&mut buf);
        for (got, want) in buf.iter().zip(&input) {
            assert!((*got / n as f32 - *want).norm() < 1e-5);
        }
    }

    #[test]
    fn single_bin_2d_gives_plane_wave() {
        let n = 8;
        let (a, b) = (1usize, 3usize);
        let mut data = vec![c(0.0, 0.0); n * n];
        data[a * n + b] = c(1.0, 0.0);
        Ifft2d::new(n).unwrap().process(&mut data);

        let norm = 1.0 / (n * n) as f64;
        for m in 0..n {
            for k in 0..n {
                let phase = TAU * (a * m + b * k) as f64 / n as f64;
                let got = data[m * n + k];
                assert!((got.re as f64 - norm * phase.cos()).abs() < 1e-6);
                assert!((got.im as f64 - norm * phase.sin()).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn conjugate_pair_gives_real_cosine() {
        // X[1] = X[N−1] = 1/2 along one axis → cos(2πn/N) scaled by 1/N² across rows.
        let n = 16;
        let mut data = vec![c(0.0, 0.0); n * n];
        data[1] = c(0.5, 0.0);
        data[n - 1] = c(0.5, 0.0);
        Ifft2d::new(n).unwrap().process(&mut data);
        let norm = 1.0 / (n * n) as f64;
        for m in 0..n {
            for k in 0..n {
                let v = data[m * n + k];
                let expected = norm * (TAU * k as f64 / n as f64).cos();
                assert!((v.re as f64 - expected).abs() < 1e-7);
                assert!(v.im.abs() < 1e-7);
            }
        }
    }
}
