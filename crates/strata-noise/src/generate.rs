//! Height-field authoring entry points. Parameters are clamped, never rejected.

use serde::Deserialize;
use strata_field::HeightField;

use crate::{GradientNoise, GridNoise, Noise, PlasmaNoise};

pub const MIN_PERLIN_FREQUENCY: i32 = 2;
pub const MIN_PERLIN_OCTAVES: i32 = 1;

/// Generator selection as it appears in configuration files.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NoiseParams {
    Flat,
    Slope {
        #[serde(default = "default_slope_height")]
        height: f32,
    },
    Plasma {
        #[serde(default = "default_plasma_scale")]
        scale: i32,
    },
    Perlin {
        #[serde(default = "default_frequency")]
        frequency: i32,
        #[serde(default = "default_octaves")]
        octaves: i32,
        #[serde(default = "default_persistence")]
        persistence: f32,
    },
    Cellular {
        #[serde(default = "default_cells")]
        cells: i32,
    },
}

fn default_slope_height() -> f32 {
    1.0
}
fn default_plasma_scale() -> i32 {
    6
}
fn default_frequency() -> i32 {
    4
}
fn default_octaves() -> i32 {
    4
}
fn default_persistence() -> f32 {
    0.5
}
fn default_cells() -> i32 {
    8
}

impl Default for NoiseParams {
    fn default() -> Self {
        NoiseParams::Perlin {
            frequency: default_frequency(),
            octaves: default_octaves(),
            persistence: default_persistence(),
        }
    }
}

impl NoiseParams {
    /// Generator `name` with every parameter at its default.
    pub fn defaults_for(name: &str) -> Option<NoiseParams> {
        let params = match name {
            "flat" => NoiseParams::Flat,
            "slope" => NoiseParams::Slope {
                height: default_slope_height(),
            },
            "plasma" => NoiseParams::Plasma {
                scale: default_plasma_scale(),
            },
            "perlin" => NoiseParams::default(),
            "cellular" => NoiseParams::Cellular {
                cells: default_cells(),
            },
            _ => return None,
        };
        Some(params)
    }

    pub fn name(&self) -> &'static str {
        match self {
            NoiseParams::Flat => "flat",
            NoiseParams::Slope { .. } => "slope",
            NoiseParams::Plasma { .. } => "plasma",
            NoiseParams::Perlin { .. } => "perlin",
            NoiseParams::Cellular { .. } => "cellular",
        }
    }
}

/// Writes the selected generator into `field`.
pub fn generate(field: &mut HeightField, seed: u64, params: &NoiseParams) {
    log::debug!(
        target: "noise",
        "generating {} into {}x{} field (seed {:#x})",
        params.name(),
        field.width_x(),
        field.width_y(),
        seed
    );
    match *params {
        NoiseParams::Flat => flat(field),
        NoiseParams::Slope { height } => slope(field, height),
        NoiseParams::Plasma { scale } => plasma(field, seed, scale),
        NoiseParams::Perlin {
            frequency,
            octaves,
            persistence,
        } => perlin(field, seed, frequency, octaves, persistence),
        NoiseParams::Cellular { cells } => cellular(field, seed, cells),
    }
}

pub fn flat(field: &mut HeightField) {
    field.fill(0.0);
}

/// Height rises linearly along +X from 0 to just under `height`.
pub fn slope(field: &mut HeightField, height: f32) {
    let w = field.width_x();
    for y in 0..field.width_y() {
        for x in 0..w {
            field.set_height(x, y, x as f32 / w as f32 * height);
        }
    }
}

/// Diamond-square plasma sampled bicubically. `scale` is clamped to `1..=12`.
pub fn plasma(field: &mut HeightField, seed: u64, scale: i32) {
    let clamped = scale.clamp(1, PlasmaNoise::MAX_SCALE as i32);
    if clamped != scale {
        log::debug!(target: "noise", "plasma scale {} clamped to {}", scale, clamped);
    }
    let mut noise = Noise::from(PlasmaNoise::new(clamped as u32, seed));
    sample_into(field, &mut noise);
}

/// Multi-octave Perlin noise normalized by the total amplitude.
///
/// Octave `i` (1-based) uses a `(frequency * i)^2` gradient grid seeded `seed + i - 1` with
/// amplitude `persistence^(i - 1)`.
pub fn perlin(field: &mut HeightField, seed: u64, frequency: i32, octaves: i32, persistence: f32) {
    let frequency = frequency.max(MIN_PERLIN_FREQUENCY) as usize;
    let octaves = octaves.max(MIN_PERLIN_OCTAVES) as usize;
    let persistence = if persistence.is_nan() {
        0.0
    } else {
        persistence.clamp(0.0, 1.0)
    };

    let (w, h) = (field.width_x(), field.width_y());
    let layers: Vec<GradientNoise> = (1..=octaves)
        .map(|i| {
            let mut n = GradientNoise::new(
                frequency * i,
                frequency * i,
                seed.wrapping_add(i as u64 - 1),
            );
            n.scale(w as u32, h as u32);
            n
        })
        .collect();

    for y in 0..h {
        for x in 0..w {
            let mut amplitude = 1.0f32;
            let mut total = 0.0f32;
            let mut height = 0.0f32;
            for layer in &layers {
                height += layer.perlin(x as f32, y as f32) * amplitude;
                total += amplitude;
                amplitude *= persistence;
            }
            field.set_height(x, y, height / total);
        }
    }
}

/// Worley distance over a `cells x cells` jittered grid, stretched to `[0, 1]`.
pub fn cellular(field: &mut HeightField, seed: u64, cells: i32) {
    let cells = cells.max(1) as usize;
    let mut noise = Noise::from(GridNoise::new(cells, cells, seed));
    sample_into(field, &mut noise);

    let (lo, hi) = field
        .heights()
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if hi > lo {
        let range = hi - lo;
        for y in 0..field.width_y() {
            for x in 0..field.width_x() {
                let v = field.height(x, y);
                field.set_height(x, y, (v - lo) / range);
            }
        }
    }
}

/// Scales `noise` to the field and writes its natural sample into every cell.
pub fn sample_into(field: &mut HeightField, noise: &mut Noise) {
    let (w, h) = (field.width_x(), field.width_y());
    noise.scale(w as u32, h as u32);
    for y in 0..h {
        for x in 0..w {
            field.set_height(x, y, noise.sample(x as f32, y as f32));
        }
    }
}
