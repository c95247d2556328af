use std::error::Error;
use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use strata_noise::NoiseParams;

use strata::{Terrain, TerrainConfig, load_config};

#[derive(Parser, Debug)]
#[command(name = "strata", version, about = "Procedural height-field terrain generator and section mesher")]
struct Args {
    /// TOML terrain configuration; defaults apply to missing keys
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Mesh build worker threads
    #[arg(long)]
    threads: Option<usize>,

    /// Noise seed
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    sections_x: Option<usize>,

    #[arg(long)]
    sections_y: Option<usize>,

    /// Vertices per section edge
    #[arg(long)]
    component_size: Option<usize>,

    /// Height generator; uses default parameters unless the config selects the same kind
    #[arg(long, value_enum)]
    generator: Option<GeneratorKind>,

    /// Skip the perimeter skirt
    #[arg(long)]
    no_border: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum GeneratorKind {
    Flat,
    Slope,
    Plasma,
    Perlin,
    Cellular,
}

impl GeneratorKind {
    fn default_params(self) -> NoiseParams {
        NoiseParams::defaults_for(self.name()).unwrap_or_default()
    }

    fn name(self) -> &'static str {
        match self {
            GeneratorKind::Flat => "flat",
            GeneratorKind::Slope => "slope",
            GeneratorKind::Plasma => "plasma",
            GeneratorKind::Perlin => "perlin",
            GeneratorKind::Cellular => "cellular",
        }
    }
}

impl Args {
    fn apply(&self, cfg: &mut TerrainConfig) {
        if let Some(t) = self.threads {
            cfg.threads = t;
        }
        if let Some(s) = self.seed {
            cfg.seed = s;
        }
        if let Some(x) = self.sections_x {
            cfg.sections_x = x;
        }
        if let Some(y) = self.sections_y {
            cfg.sections_y = y;
        }
        if let Some(n) = self.component_size {
            cfg.component_size = n;
        }
        if let Some(kind) = self.generator {
            if cfg.generator.name() != kind.name() {
                cfg.generator = kind.default_params();
            }
        }
        if self.no_border {
            cfg.border = false;
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut cfg = match &args.config {
        Some(path) => {
            log::info!("loading terrain config from {}", path.display());
            load_config(path)?
        }
        None => TerrainConfig::default(),
    };
    args.apply(&mut cfg);
    let cfg = cfg.sanitized();
    log::info!(
        "terrain {}x{} sections of {} vertices, generator={}, seed={}, threads={}",
        cfg.sections_x,
        cfg.sections_y,
        cfg.component_size,
        cfg.generator.name(),
        cfg.seed,
        cfg.threads
    );

    let t0 = Instant::now();
    let params = cfg.generator.clone();
    let seed = cfg.seed;
    let mut terrain = Terrain::new(cfg)?;
    let report = terrain.generate(&params, seed);
    let stats = terrain.stats();
    log::info!(
        "built {}/{} sections: {} vertices, {} triangles; border {} vertices, {} triangles; {:.3}s total",
        report.built,
        stats.sections,
        stats.vertices,
        stats.triangles,
        stats.border_vertices,
        stats.border_triangles,
        t0.elapsed().as_secs_f64()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_defaults_parse_for_every_kind() {
        for kind in GeneratorKind::value_variants() {
            assert_eq!(kind.default_params().name(), kind.name());
        }
    }

    #[test]
    fn cli_overrides_config() {
        let args = Args::parse_from([
            "strata",
            "--threads",
            "2",
            "--sections-x",
            "3",
            "--component-size",
            "17",
            "--generator",
            "plasma",
            "--no-border",
        ]);
        let mut cfg = TerrainConfig::default();
        args.apply(&mut cfg);
        assert_eq!(cfg.threads, 2);
        assert_eq!(cfg.sections_x, 3);
        assert_eq!(cfg.sections_y, 1);
        assert_eq!(cfg.component_size, 17);
        assert_eq!(cfg.generator, NoiseParams::Plasma { scale: 6 });
        assert!(!cfg.border);
    }

    #[test]
    fn same_generator_kind_keeps_config_params() {
        let args = Args::parse_from(["strata", "--generator", "cellular"]);
        let mut cfg = TerrainConfig {
            generator: NoiseParams::Cellular { cells: 3 },
            ..TerrainConfig::default()
        };
        args.apply(&mut cfg);
        assert_eq!(cfg.generator, NoiseParams::Cellular { cells: 3 });
    }
}
