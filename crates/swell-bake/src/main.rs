//! Offline ocean bake: turns a bake config into displacement and normal
//! volumes on disk, ready to be loaded as RGB32F 3D textures.
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use serde::Serialize;
use swell_core::{BakeConfig, BakeProgress, OceanBaker, Vec3, VolumeLayout, VolumeUpload};

#[derive(Parser, Debug)]
#[command(name = "swell-bake", about = "Bake a looping FFT ocean into volume textures")]
struct Args {
    /// JSON bake config; missing fields take their defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Spatial resolution N (power of two).
    #[arg(short, long)]
    resolution: Option<usize>,

    /// Number of time slices T.
    #[arg(short = 't', long)]
    samples: Option<usize>,

    /// Requested loop length in seconds.
    #[arg(long)]
    time_span: Option<f32>,

    /// Wind speed in m/s.
    #[arg(long)]
    wind_speed: Option<f32>,

    /// Phillips spectrum amplitude.
    #[arg(long)]
    amplitude: Option<f32>,

    /// Sea-state seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Output directory.
    #[arg(short, long, default_value = "data/bake")]
    out: PathBuf,
}

impl Args {
    fn bake_config(&self) -> Result<BakeConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading bake config {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("parsing bake config {}", path.display()))?
            }
            None => BakeConfig::default(),
        };
        if let Some(n) = self.resolution {
            config.resolution = n;
        }
        if let Some(t) = self.samples {
            config.time_samples = t;
        }
        if let Some(span) = self.time_span {
            config.time_span = span;
        }
        if let Some(v) = self.wind_speed {
            config.spectrum.wind_speed = v;
        }
        if let Some(a) = self.amplitude {
            config.spectrum.amplitude = a;
        }
        if let Some(seed) = self.seed {
            config.spectrum.seed = seed;
        }
        Ok(config)
    }
}

#[derive(Serialize)]
struct Manifest<'a> {
    resolution: usize,
    time_samples: usize,
    requested_time_span: f32,
    time_span: f32,
    min_wave_period: f32,
    loop_cycles: u32,
    texel_format: &'static str,
    displacement: &'a str,
    normal: &'a str,
    bytes_per_volume: usize,
    config: &'a BakeConfig,
}

/// Writes each volume as raw little-endian RGB32F texels.
struct RawVolumeWriter {
    dir: PathBuf,
}

impl RawVolumeWriter {
    const DISPLACEMENT: &'static str = "displacement.bin";
    const NORMAL: &'static str = "normal.bin";

    fn write(&self, name: &str, texels: &[Vec3]) -> Result<()> {
        let path = self.dir.join(name);
        let file = fs::File::create(&path).with_context(|| format!("creating {}", path.display()))?;
        let mut out = BufWriter::new(file);
        for v in bytemuck::cast_slice::<Vec3, f32>(texels) {
            out.write_all(&v.to_le_bytes())?;
        }
        out.flush().with_context(|| format!("writing {}", path.display()))?;
        info!("wrote {}", path.display());
        Ok(())
    }
}

impl VolumeUpload for RawVolumeWriter {
    type Handle = PathBuf;
    type Error = anyhow::Error;

    fn upload(&mut self, layout: &VolumeLayout, displacement: Vec<Vec3>, normal: Vec<Vec3>) -> Result<PathBuf> {
        info!(
            "writing {}×{}×{} volumes to {}",
            layout.resolution,
            layout.resolution,
            layout.time_samples,
            self.dir.display()
        );
        self.write(Self::DISPLACEMENT, &displacement)?;
        self.write(Self::NORMAL, &normal)?;
        Ok(self.dir.clone())
    }
}

fn write_manifest(dir: &Path, manifest: &Manifest) -> Result<()> {
    let path = dir.join("manifest.json");
    let json = serde_json::to_string_pretty(manifest)?;
    fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    info!("wrote {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = args.bake_config()?;
    let baker = OceanBaker::new(&config).context("invalid bake config")?;
    let period = baker.loop_period();
    let total = baker.time_samples();

    let started = Instant::now();
    let progress = BakeProgress::new();
    let volume = std::thread::scope(|s| {
        let worker = s.spawn(|| baker.bake_with(&progress));
        let mut reported = 0;
        while !worker.is_finished() {
            let done = progress.completed();
            if done != reported {
                reported = done;
                info!("slice {done}/{total} ({:.0}%)", 100.0 * progress.fraction());
            }
            std::thread::sleep(Duration::from_millis(50));
        }
        worker.join().map_err(|_| anyhow::anyhow!("bake worker panicked"))
    })??;
    info!("baked in {:.2}s", started.elapsed().as_secs_f32());

    fs::create_dir_all(&args.out).with_context(|| format!("creating {}", args.out.display()))?;
    let layout = *volume.layout();
    let mut writer = RawVolumeWriter { dir: args.out.clone() };
    let dir = volume.upload(&mut writer)?.into_handle();

    write_manifest(
        &dir,
        &Manifest {
            resolution: layout.resolution,
            time_samples: layout.time_samples,
            requested_time_span: period.requested,
            time_span: period.resolved,
            min_wave_period: period.min_period,
            loop_cycles: period.cycles,
            texel_format: "rgb32f-le",
            displacement: RawVolumeWriter::DISPLACEMENT,
            normal: RawVolumeWriter::NORMAL,
            bytes_per_volume: layout.byte_len(),
            config: &config,
        },
    )?;
    Ok(())
}
