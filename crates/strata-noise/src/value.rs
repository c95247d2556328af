use std::ops::Deref;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::GridScale;
use crate::interp::{corp, curp, lerp};

/// Interpolation applied when sampling a [`ValueNoise`] grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Interp {
    #[default]
    Linear,
    Cosine,
    Cubic,
}

/// Grid of independent random scalars in `[0, 1)`.
#[derive(Clone, Debug)]
pub struct ValueNoise {
    width: usize,
    height: usize,
    scale: GridScale,
    value: Vec<f32>,
}

impl ValueNoise {
    pub fn new(width: usize, height: usize, seed: u64) -> Self {
        let width = width.max(2);
        let height = height.max(2);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let value = (0..width * height).map(|_| rng.gen_range(0.0..1.0)).collect();
        Self::from_values(width, height, value)
    }

    pub(crate) fn from_values(width: usize, height: usize, value: Vec<f32>) -> Self {
        debug_assert_eq!(value.len(), width * height);
        Self {
            width,
            height,
            scale: GridScale::IDENTITY,
            value,
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

    pub fn scale(&mut self, sample_width: u32, sample_height: u32) {
        self.scale = GridScale::fit(
            (self.width - 1) as f32,
            (self.height - 1) as f32,
            sample_width,
            sample_height,
        );
    }

    #[inline]
    pub fn value(&self, x: usize, y: usize) -> f32 {
        self.value[y * self.width + x]
    }

    pub fn values(&self) -> &[f32] {
        &self.value
    }

    /// Cell corner and fractional offset for a sample coordinate.
    #[inline]
    fn locate(&self, x: f32, y: f32) -> (usize, usize, f32, f32) {
        let gx = (x * self.scale.x).clamp(0.0, (self.width - 1) as f32);
        let gy = (y * self.scale.y).clamp(0.0, (self.height - 1) as f32);
        let x0 = (gx.floor() as usize).min(self.width - 2);
        let y0 = (gy.floor() as usize).min(self.height - 2);
        (x0, y0, gx - x0 as f32, gy - y0 as f32)
    }

    /// Read with coordinates clamped to the grid; feeds the 4x4 bicubic stencil.
    #[inline]
    fn value_clamped(&self, x: isize, y: isize) -> f32 {
        let x = x.clamp(0, self.width as isize - 1) as usize;
        let y = y.clamp(0, self.height as isize - 1) as usize;
        self.value(x, y)
    }

    pub fn sample(&self, mode: Interp, x: f32, y: f32) -> f32 {
        match mode {
            Interp::Linear => self.linear(x, y),
            Interp::Cosine => self.cosine(x, y),
            Interp::Cubic => self.cubic(x, y),
        }
    }

    pub fn linear(&self, x: f32, y: f32) -> f32 {
        self.blend(x, y, lerp)
    }

    pub fn cosine(&self, x: f32, y: f32) -> f32 {
        self.blend(x, y, corp)
    }

    fn blend(&self, x: f32, y: f32, f: fn(f32, f32, f32) -> f32) -> f32 {
        let (x0, y0, tx, ty) = self.locate(x, y);
        let bottom = f(tx, self.value(x0, y0), self.value(x0 + 1, y0));
        let top = f(tx, self.value(x0, y0 + 1), self.value(x0 + 1, y0 + 1));
        f(ty, bottom, top)
    }

    /// Bicubic sample over the surrounding 4x4 neighbourhood.
    pub fn cubic(&self, x: f32, y: f32) -> f32 {
        let (x0, y0, tx, ty) = self.locate(x, y);
        let (x0, y0) = (x0 as isize, y0 as isize);
        let mut rows = [0.0f32; 4];
        for (j, row) in rows.iter_mut().enumerate() {
            let yy = y0 - 1 + j as isize;
            let p = [
                self.value_clamped(x0 - 1, yy),
                self.value_clamped(x0, yy),
                self.value_clamped(x0 + 1, yy),
                self.value_clamped(x0 + 2, yy),
            ];
            *row = curp(tx, p);
        }
        curp(ty, rows)
    }
}

/// Value noise whose grid comes from diamond-square midpoint displacement.
#[derive(Clone, Debug)]
pub struct PlasmaNoise {
    inner: ValueNoise,
}

impl PlasmaNoise {
    /// Largest recursion depth; the grid edge is `2^scale + 1`.
    pub const MAX_SCALE: u32 = 12;
    /// Displacement applied at the coarsest level, halved every level.
    const ROUGHNESS: f32 = 0.5;

    pub fn new(scale: u32, seed: u64) -> Self {
        let scale = scale.clamp(1, Self::MAX_SCALE);
        let side = (1usize << scale) + 1;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut v = vec![0.0f32; side * side];
        let at = |x: usize, y: usize| y * side + x;

        let last = side - 1;
        for (x, y) in [(0, 0), (last, 0), (0, last), (last, last)] {
            v[at(x, y)] = rng.gen_range(0.0..1.0);
        }

        let mut step = last;
        let mut amp = Self::ROUGHNESS;
        while step > 1 {
            let half = step / 2;

            // Diamond: square centres from their four corners
            for y in (half..side).step_by(step) {
                for x in (half..side).step_by(step) {
                    let avg = (v[at(x - half, y - half)]
                        + v[at(x + half, y - half)]
                        + v[at(x - half, y + half)]
                        + v[at(x + half, y + half)])
                        * 0.25;
                    v[at(x, y)] = avg + rng.gen_range(-amp..amp);
                }
            }

            // Square: edge midpoints from their in-bounds orthogonal neighbours
            for y in (0..side).step_by(half) {
                let start = if (y / half) % 2 == 0 { half } else { 0 };
                for x in (start..side).step_by(step) {
                    let mut sum = 0.0;
                    let mut count = 0.0;
                    if x >= half {
                        sum += v[at(x - half, y)];
                        count += 1.0;
                    }
                    if x + half < side {
                        sum += v[at(x + half, y)];
                        count += 1.0;
                    }
                    if y >= half {
                        sum += v[at(x, y - half)];
                        count += 1.0;
                    }
                    if y + half < side {
                        sum += v[at(x, y + half)];
                        count += 1.0;
                    }
                    v[at(x, y)] = sum / count + rng.gen_range(-amp..amp);
                }
            }

            step = half;
            amp *= 0.5;
        }

        normalize(&mut v);
        Self {
            inner: ValueNoise::from_values(side, side, v),
        }
    }

    pub fn scale(&mut self, sample_width: u32, sample_height: u32) {
        self.inner.scale(sample_width, sample_height);
    }

    pub fn into_value_noise(self) -> ValueNoise {
        self.inner
    }
}

impl Deref for PlasmaNoise {
    type Target = ValueNoise;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// Stretches values to `[0, 1]`; a constant grid becomes all zeros.
fn normalize(v: &mut [f32]) {
    let (lo, hi) = v
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &x| {
            (lo.min(x), hi.max(x))
        });
    let range = hi - lo;
    for x in v.iter_mut() {
        *x = if range > 0.0 { (*x - lo) / range } else { 0.0 };
    }
}
