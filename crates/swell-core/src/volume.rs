//! Baked displacement/normal volumes and the playback contract.
//!
//! Both volumes are flat `N × N × T` arrays of [`Vec3`] with time as the
//! outermost index: `t·N·N + row·N + col`. This is the texel order of a
//! 3-channel float volume texture of width N, height N and depth T.
use serde::{Deserialize, Serialize};

use crate::stats::SurfaceStats;
use crate::vector::Vec3;

/// Shape and timing of a baked volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeLayout {
    pub resolution: usize,
    pub time_samples: usize,
    /// Resolved loop length in seconds.
    pub time_span: f32,
}

impl VolumeLayout {
    #[inline]
    pub fn slice_len(&self) -> usize {
        self.resolution * self.resolution
    }

    #[inline]
    pub fn texel_count(&self) -> usize {
        self.slice_len() * self.time_samples
    }

    /// Bytes of one RGB32F volume.
    #[inline]
    pub fn byte_len(&self) -> usize {
        self.texel_count() * std::mem::size_of::<Vec3>()
    }

    #[inline]
    pub fn index(&self, t: usize, row: usize, col: usize) -> usize {
        t * self.slice_len() + row * self.resolution + col
    }

    /// Simulation time of slice `i`: `i/(T−1)·span`, or 0 for a single slice.
    pub fn sample_time(&self, i: usize) -> f32 {
        if self.time_samples <= 1 {
            0.0
        } else {
            i as f32 / (self.time_samples - 1) as f32 * self.time_span
        }
    }
}

/// Where a playback time falls between two baked slices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlicePosition {
    pub lower: usize,
    pub upper: usize,
    /// Weight of `upper`, in `[0, 1)`.
    pub blend: f32,
}

/// Playback-side view of a baked ocean: the loop length and volume shape,
/// plus whatever handle the upload collaborator returned.
#[derive(Debug, Clone)]
pub struct Playback<H> {
    handle: H,
    layout: VolumeLayout,
}

impl<H> Playback<H> {
    pub fn new(handle: H, layout: VolumeLayout) -> Self {
        Self { handle, layout }
    }

    #[inline]
    pub fn handle(&self) -> &H {
        &self.handle
    }

    pub fn into_handle(self) -> H {
        self.handle
    }

    #[inline]
    pub fn layout(&self) -> &VolumeLayout {
        &self.layout
    }

    #[inline]
    pub fn time_span(&self) -> f32 {
        self.layout.time_span
    }

    #[inline]
    pub fn resolution(&self) -> usize {
        self.layout.resolution
    }

    /// Loop phase `(time mod span) / span` in `[0, 1)`. Negative times wrap.
    pub fn normalized_time(&self, time: f32) -> f32 {
        normalized_time(time, self.layout.time_span)
    }

    /// Bracketing slices for `time`.
    pub fn slice_position(&self, time: f32) -> SlicePosition {
        slice_position(&self.layout, time)
    }
}

fn normalized_time(time: f32, span: f32) -> f32 {
    if span.is_nan() || span <= 0.0 || !time.is_finite() {
        return 0.0;
    }
    let phase = time.rem_euclid(span) / span;
    // rem_euclid can round up to exactly `span` for tiny negative inputs.
    if phase >= 1.0 { 0.0 } else { phase }
}

fn slice_position(layout: &VolumeLayout, time: f32) -> SlicePosition {
    if layout.time_samples <= 1 {
        return SlicePosition { lower: 0, upper: 0, blend: 0.0 };
    }
    let last = layout.time_samples - 1;
    let pos = normalized_time(time, layout.time_span) * last as f32;
    let lower = (pos.floor() as usize).min(last - 1);
    SlicePosition { lower, upper: lower + 1, blend: (pos - lower as f32).clamp(0.0, 1.0) }
}

/// External collaborator that takes ownership of a baked volume, typically by
/// creating a GPU 3D texture from it.
pub trait VolumeUpload {
    type Handle;
    type Error;

    fn upload(
        &mut self,
        layout: &VolumeLayout,
        displacement: Vec<Vec3>,
        normal: Vec<Vec3>,
    ) -> Result<Self::Handle, Self::Error>;
}

/// Finished bake: displacement-from-rest and normal volumes.
#[derive(Debug, Clone)]
pub struct BakedVolume {
    layout: VolumeLayout,
    displacement: Vec<Vec3>,
    normal: Vec<Vec3>,
}

impl BakedVolume {
    pub(crate) fn new(layout: VolumeLayout, displacement: Vec<Vec3>, normal: Vec<Vec3>) -> Self {
        debug_assert_eq!(displacement.len(), layout.texel_count());
        debug_assert_eq!(normal.len(), layout.texel_count());
        Self { layout, displacement, normal }
    }

    #[inline]
    pub fn layout(&self) -> &VolumeLayout {
        &self.layout
    }

    #[inline]
    pub fn resolution(&self) -> usize {
        self.layout.resolution
    }

    #[inline]
    pub fn time_samples(&self) -> usize {
        self.layout.time_samples
    }

    #[inline]
    pub fn time_span(&self) -> f32 {
        self.layout.time_span
    }

    #[inline]
    pub fn displacement(&self) -> &[Vec3] {
        &self.displacement
    }

    #[inline]
    pub fn normal(&self) -> &[Vec3] {
        &self.normal
    }

    /// Packed RGB32F texel data of both volumes.
    pub fn as_rgb32f(&self) -> (&[f32], &[f32]) {
        (bytemuck::cast_slice(&self.displacement), bytemuck::cast_slice(&self.normal))
    }

    pub fn displacement_slice(&self, t: usize) -> &[Vec3] {
        let len = self.layout.slice_len();
        &self.displacement[t * len..(t + 1) * len]
    }

    pub fn normal_slice(&self, t: usize) -> &[Vec3] {
        let len = self.layout.slice_len();
        &self.normal[t * len..(t + 1) * len]
    }

    pub fn slice_stats(&self, t: usize) -> SurfaceStats {
        SurfaceStats::from_displacements(self.displacement_slice(t))
    }

    /// `(displacement, normal)` at grid cell `(row, col)` and playback `time`,
    /// linearly interpolated between the bracketing slices. Cell coordinates
    /// wrap, matching a repeat-addressed texture.
    pub fn sample(&self, row: usize, col: usize, time: f32) -> (Vec3, Vec3) {
        let n = self.layout.resolution;
        let (row, col) = (row % n, col % n);
        let pos = slice_position(&self.layout, time);
        let a = self.layout.index(pos.lower, row, col);
        let b = self.layout.index(pos.upper, row, col);
        let displacement = self.displacement[a].lerp(self.displacement[b], pos.blend);
        let normal = self.normal[a].lerp(self.normal[b], pos.blend).normalize_or(Vec3::Y);
        (displacement, normal)
    }

    pub fn playback(&self) -> Playback<()> {
        Playback::new((), self.layout)
    }

    pub fn into_parts(self) -> (VolumeLayout, Vec<Vec3>, Vec<Vec3>) {
        (self.layout, self.displacement, self.normal)
    }

    /// Move both volumes into `uploader`; the CPU copies are gone afterwards.
    pub fn upload<U: VolumeUpload>(self, uploader: &mut U) -> Result<Playback<U::Handle>, U::Error> {
        let (layout, displacement, normal) = self.into_parts();
        let handle = uploader.upload(&layout, displacement, normal)?;
        Ok(Playback::new(handle, layout))
    }
}
