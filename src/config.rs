use std::error::Error;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use strata_field::SectionLayout;
use strata_noise::NoiseParams;
use strata_runtime::DEFAULT_THREADS;

pub const MIN_COMPONENT_SIZE: usize = 2;
pub const MAX_COMPONENT_SIZE: usize = 1024;
pub const MAX_SECTIONS_PER_AXIS: usize = 256;
/// Upper bound on height-field cells, halo included.
pub const MAX_FIELD_CELLS: usize = 1 << 24;

/// Terrain settings as read from a TOML file. Missing keys take their defaults.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct TerrainConfig {
    /// Vertices per section edge.
    #[serde(default = "default_component_size")]
    pub component_size: usize,
    #[serde(default = "default_sections")]
    pub sections_x: usize,
    #[serde(default = "default_sections")]
    pub sections_y: usize,
    /// Output Z for a normalized height of 1.0.
    #[serde(default = "default_height_scale")]
    pub height_scale: f32,
    #[serde(default = "default_tiling")]
    pub tiling: f32,
    #[serde(default = "default_border")]
    pub border: bool,
    #[serde(default = "default_threads")]
    pub threads: usize,
    #[serde(default)]
    pub async_cooking: bool,
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub lods: LodConfig,
    #[serde(default)]
    pub generator: NoiseParams,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct LodConfig {
    #[serde(default)]
    pub count: usize,
    #[serde(default = "default_lod_distance_scale")]
    pub distance_scale: f32,
}

fn default_component_size() -> usize {
    64
}
fn default_sections() -> usize {
    1
}
fn default_height_scale() -> f32 {
    32.0
}
fn default_tiling() -> f32 {
    1.0
}
fn default_border() -> bool {
    true
}
fn default_threads() -> usize {
    DEFAULT_THREADS
}
fn default_lod_distance_scale() -> f32 {
    1.0
}

impl Default for LodConfig {
    fn default() -> Self {
        Self {
            count: 0,
            distance_scale: default_lod_distance_scale(),
        }
    }
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            component_size: default_component_size(),
            sections_x: default_sections(),
            sections_y: default_sections(),
            height_scale: default_height_scale(),
            tiling: default_tiling(),
            border: default_border(),
            threads: default_threads(),
            async_cooking: false,
            seed: 0,
            lods: LodConfig::default(),
            generator: NoiseParams::default(),
        }
    }
}

impl TerrainConfig {
    /// Clamps every numeric field into its usable range. Never fails.
    pub fn sanitized(mut self) -> Self {
        self.component_size = self.component_size.clamp(MIN_COMPONENT_SIZE, MAX_COMPONENT_SIZE);
        self.sections_x = self.sections_x.clamp(1, MAX_SECTIONS_PER_AXIS);
        self.sections_y = self.sections_y.clamp(1, MAX_SECTIONS_PER_AXIS);
        self.fit_field_cells();
        self.threads = self.threads.max(1);
        if !self.height_scale.is_finite() || self.height_scale < 0.0 {
            self.height_scale = default_height_scale();
        }
        if !self.tiling.is_finite() {
            self.tiling = default_tiling();
        }
        self.lods.count = self.lods.count.min(self.component_size);
        if !self.lods.distance_scale.is_finite() || self.lods.distance_scale <= 0.0 {
            self.lods.distance_scale = default_lod_distance_scale();
        }
        self
    }

    /// Drops sections from the longer axis until the field fits in [`MAX_FIELD_CELLS`].
    fn fit_field_cells(&mut self) {
        let requested = (self.sections_x, self.sections_y);
        while self.field_cells() > MAX_FIELD_CELLS && (self.sections_x > 1 || self.sections_y > 1) {
            if self.sections_x >= self.sections_y {
                self.sections_x -= 1;
            } else {
                self.sections_y -= 1;
            }
        }
        if requested != (self.sections_x, self.sections_y) {
            log::warn!(
                "{}x{} sections of size {} exceed {} field cells, using {}x{}",
                requested.0,
                requested.1,
                self.component_size,
                MAX_FIELD_CELLS,
                self.sections_x,
                self.sections_y
            );
        }
    }

    fn field_cells(&self) -> usize {
        let (w, h) = SectionLayout::new(self.component_size, self.sections_x, self.sections_y).field_size();
        w * h
    }
}

pub fn load_config(path: &Path) -> Result<TerrainConfig, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    let cfg: TerrainConfig = toml::from_str(&s)?;
    Ok(cfg)
}
