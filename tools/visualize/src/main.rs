//! Diagnostic visualizer: bakes a small ocean volume and writes PNG height
//! and normal maps to data/debug/.
//! Not part of the main pipeline; no tests, no clippy target.

use std::fs;
use std::path::Path;

use swell_core::{BakeConfig, BakedVolume, OceanBaker, SpectrumParams};

const N: usize = 128;
const SLICES: usize = 8;

// ── Colour helpers ────────────────────────────────────────────────────────────

/// Signed height → blue ramp: troughs deep blue, crests near white.
fn height_to_rgb(h: f32, max_abs: f32) -> [u8; 3] {
    let t = if max_abs > 0.0 { (0.5 + 0.5 * h / max_abs).clamp(0.0, 1.0) } else { 0.5 };
    let r = (20.0 + 215.0 * t * t) as u8;
    let g = (60.0 + 185.0 * t) as u8;
    let b = (140.0 + 115.0 * t) as u8;
    [r, g, b]
}

/// Unit normal → tangent-space style RGB (x, z in the red/green channels).
fn normal_to_rgb(x: f32, y: f32, z: f32) -> [u8; 3] {
    let enc = |v: f32| ((v * 0.5 + 0.5).clamp(0.0, 1.0) * 255.0) as u8;
    [enc(x), enc(z), enc(y)]
}

fn write_height(volume: &BakedVolume, t: usize, max_abs: f32, out_dir: &Path) {
    let n = volume.resolution();
    let slice = volume.displacement_slice(t);
    let mut img = image::RgbImage::new(n as u32, n as u32);
    for r in 0..n {
        for c in 0..n {
            let [rv, gv, bv] = height_to_rgb(slice[r * n + c].y, max_abs);
            img.put_pixel(c as u32, r as u32, image::Rgb([rv, gv, bv]));
        }
    }
    let path = out_dir.join(format!("height_t{t}.png"));
    img.save(&path).expect("failed to save height map");
    println!("Wrote {}", path.display());
}

fn write_normal(volume: &BakedVolume, t: usize, out_dir: &Path) {
    let n = volume.resolution();
    let slice = volume.normal_slice(t);
    let mut img = image::RgbImage::new(n as u32, n as u32);
    for r in 0..n {
        for c in 0..n {
            let v = slice[r * n + c];
            img.put_pixel(c as u32, r as u32, image::Rgb(normal_to_rgb(v.x, v.y, v.z)));
        }
    }
    let path = out_dir.join(format!("normal_t{t}.png"));
    img.save(&path).expect("failed to save normal map");
    println!("Wrote {}", path.display());
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    let config = BakeConfig {
        resolution: N,
        time_samples: SLICES,
        time_span: 5.0,
        half_extent_x: 256.0,
        half_extent_z: 256.0,
        spectrum: SpectrumParams { amplitude: 0.5, ..Default::default() },
    };

    println!("Baking {N}×{N}×{SLICES} ocean volume…");
    let baker = OceanBaker::new(&config).expect("invalid bake config");
    println!("Loop period {:.3}s", baker.time_span());
    let volume = baker.bake();

    let out_dir = Path::new("data/debug");
    fs::create_dir_all(out_dir).expect("cannot create data/debug/");

    // One colour scale across all slices so frames are comparable.
    let max_abs = (0..volume.time_samples())
        .map(|t| volume.slice_stats(t).max_abs_height())
        .fold(0.0f32, f32::max);

    for t in 0..volume.time_samples() {
        write_height(&volume, t, max_abs, out_dir);
    }
    write_normal(&volume, 0, out_dir);

    let s = volume.slice_stats(0);
    println!(
        "Slice 0: height [{:.3}, {:.3}] std {:.3}, max horizontal {:.3}",
        s.min_height, s.max_height, s.std_height, s.max_horizontal
    );
}
