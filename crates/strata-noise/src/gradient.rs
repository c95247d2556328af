use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::f32::consts::TAU;
use strata_geom::Vec2;

use crate::GridScale;
use crate::interp::{fade, lerp};

/// Grid of unit gradient vectors sampled as classic 2-D Perlin noise.
#[derive(Clone, Debug)]
pub struct GradientNoise {
    width: usize,
    height: usize,
    scale: GridScale,
    gradient: Vec<Vec2>,
}

impl GradientNoise {
    /// Grids smaller than 2x2 have no cell to interpolate across and are grown to 2x2.
    pub fn new(width: usize, height: usize, seed: u64) -> Self {
        let width = width.max(2);
        let height = height.max(2);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let gradient = (0..width * height)
            .map(|_| {
                let a = rng.gen_range(0.0..TAU);
                Vec2::new(a.cos(), a.sin())
            })
            .collect();
        Self {
            width,
            height,
            scale: GridScale::IDENTITY,
            gradient,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Maps the sample range onto the span between the first and last grid line.
    pub fn scale(&mut self, sample_width: u32, sample_height: u32) {
        self.scale = GridScale::fit(
            (self.width - 1) as f32,
            (self.height - 1) as f32,
            sample_width,
            sample_height,
        );
    }

    #[inline]
    pub fn gradient(&self, x: usize, y: usize) -> Vec2 {
        self.gradient[y * self.width + x]
    }

    /// Perlin noise at a sample coordinate; roughly in `[-0.71, 0.71]`.
    pub fn perlin(&self, x: f32, y: f32) -> f32 {
        let gx = (x * self.scale.x).clamp(0.0, (self.width - 1) as f32);
        let gy = (y * self.scale.y).clamp(0.0, (self.height - 1) as f32);
        let x0 = (gx.floor() as usize).min(self.width - 2);
        let y0 = (gy.floor() as usize).min(self.height - 2);
        let p = Vec2::new(gx, gy);

        let corner = |cx: usize, cy: usize| {
            let offset = p - Vec2::new(cx as f32, cy as f32);
            self.gradient(cx, cy).dot(offset)
        };

        let u = fade(gx - x0 as f32);
        let v = fade(gy - y0 as f32);
        let bottom = lerp(u, corner(x0, y0), corner(x0 + 1, y0));
        let top = lerp(u, corner(x0, y0 + 1), corner(x0 + 1, y0 + 1));
        lerp(v, bottom, top)
    }
}
