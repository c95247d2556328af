use std::ops::Range;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use strata_geom::Vec2;

use crate::GridScale;

/// Random points over a `width x height` area with a unit-cell acceleration grid.
///
/// Points are stored grouped by cell so each cell's candidates are a contiguous range.
#[derive(Clone, Debug)]
pub struct PointNoise {
    width: usize,
    height: usize,
    scale: GridScale,
    points: Vec<Vec2>,
    tags: Vec<f32>,
    cell_start: Vec<u32>,
}

impl PointNoise {
    pub fn new(x_bias: usize, y_bias: usize, points: usize, seed: u64) -> Self {
        let width = x_bias.max(1);
        let height = y_bias.max(1);
        let count = points.max(1);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut scattered: Vec<(usize, Vec2, f32)> = (0..count)
            .map(|_| {
                let p = Vec2::new(
                    rng.gen_range(0.0..width as f32),
                    rng.gen_range(0.0..height as f32),
                );
                let tag = rng.gen_range(0.0..1.0);
                (cell_of(p, width, height), p, tag)
            })
            .collect();
        scattered.sort_by_key(|&(cell, _, _)| cell);

        let mut cell_start = vec![0u32; width * height + 1];
        for &(cell, _, _) in &scattered {
            cell_start[cell + 1] += 1;
        }
        for i in 1..cell_start.len() {
            cell_start[i] += cell_start[i - 1];
        }

        Self {
            width,
            height,
            scale: GridScale::IDENTITY,
            points: scattered.iter().map(|&(_, p, _)| p).collect(),
            tags: scattered.iter().map(|&(_, _, t)| t).collect(),
            cell_start,
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
            self.width as f32,
            self.height as f32,
            sample_width,
            sample_height,
        );
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Nearest point to a location given in native grid units.
    pub fn nearest(&self, location: Vec2) -> Option<Vec2> {
        self.nearest_index(location).map(|(i, _)| self.points[i])
    }

    fn nearest_index(&self, location: Vec2) -> Option<(usize, f32)> {
        nearest_in_grid(location, self.width, self.height, &self.points, |cell| {
            self.cell_start[cell] as usize..self.cell_start[cell + 1] as usize
        })
    }

    /// Pseudo-random value tied to the nearest point, for cellular patterns.
    pub fn dot(&self, x: f32, y: f32) -> f32 {
        let p = Vec2::new(x * self.scale.x, y * self.scale.y);
        self.nearest_index(p).map_or(0.0, |(i, _)| self.tags[i])
    }

    /// Distance to the nearest point, in native grid units.
    pub fn worley(&self, x: f32, y: f32) -> f32 {
        self.worley_squared(x, y).sqrt()
    }

    pub fn worley_squared(&self, x: f32, y: f32) -> f32 {
        let p = Vec2::new(x * self.scale.x, y * self.scale.y);
        self.nearest_index(p).map_or(0.0, |(_, d2)| d2)
    }
}

/// Exactly one random point inside every unit cell of a `width x height` grid.
#[derive(Clone, Debug)]
pub struct GridNoise {
    width: usize,
    height: usize,
    scale: GridScale,
    points: Vec<Vec2>,
    tags: Vec<f32>,
}

impl GridNoise {
    pub fn new(width: usize, height: usize, seed: u64) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut points = Vec::with_capacity(width * height);
        let mut tags = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                points.push(Vec2::new(
                    x as f32 + rng.gen_range(0.0..1.0),
                    y as f32 + rng.gen_range(0.0..1.0),
                ));
                tags.push(rng.gen_range(0.0..1.0));
            }
        }
        Self {
            width,
            height,
            scale: GridScale::IDENTITY,
            points,
            tags,
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
            self.width as f32,
            self.height as f32,
            sample_width,
            sample_height,
        );
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// The point owned by grid cell `(x, y)`.
    #[inline]
    pub fn point(&self, x: usize, y: usize) -> Vec2 {
        self.points[y * self.width + x]
    }

    pub fn nearest(&self, location: Vec2) -> Option<Vec2> {
        self.nearest_index(location).map(|(i, _)| self.points[i])
    }

    fn nearest_index(&self, location: Vec2) -> Option<(usize, f32)> {
        nearest_in_grid(location, self.width, self.height, &self.points, |cell| {
            cell..cell + 1
        })
    }

    pub fn dot(&self, x: f32, y: f32) -> f32 {
        let p = Vec2::new(x * self.scale.x, y * self.scale.y);
        self.nearest_index(p).map_or(0.0, |(i, _)| self.tags[i])
    }

    pub fn worley(&self, x: f32, y: f32) -> f32 {
        self.worley_squared(x, y).sqrt()
    }

    pub fn worley_squared(&self, x: f32, y: f32) -> f32 {
        let p = Vec2::new(x * self.scale.x, y * self.scale.y);
        self.nearest_index(p).map_or(0.0, |(_, d2)| d2)
    }
}

#[inline]
fn cell_of(p: Vec2, width: usize, height: usize) -> usize {
    let cx = (p.x.max(0.0) as usize).min(width - 1);
    let cy = (p.y.max(0.0) as usize).min(height - 1);
    cy * width + cx
}

/// Ring-by-ring nearest-point search over a unit-cell grid.
///
/// `candidates(cell)` yields indices into `points` for the points whose coordinates lie in
/// that cell. After each ring, every unvisited cell lies outside the visited square, so the
/// distance from `p` to the nearest open side of that square bounds any remaining point.
/// Returns the winning index and its squared distance.
fn nearest_in_grid(
    p: Vec2,
    width: usize,
    height: usize,
    points: &[Vec2],
    candidates: impl Fn(usize) -> Range<usize>,
) -> Option<(usize, f32)> {
    if points.is_empty() || width == 0 || height == 0 {
        return None;
    }
    let cx = (p.x.max(0.0) as usize).min(width - 1) as isize;
    let cy = (p.y.max(0.0) as usize).min(height - 1) as isize;
    let (w, h) = (width as isize, height as isize);

    let mut best: Option<(usize, f32)> = None;
    let visit = |x: isize, y: isize, best: &mut Option<(usize, f32)>| {
        if x < 0 || y < 0 || x >= w || y >= h {
            return;
        }
        for i in candidates((y * w + x) as usize) {
            let d2 = p.distance_sq(points[i]);
            if best.is_none_or(|(_, bd)| d2 < bd) {
                *best = Some((i, d2));
            }
        }
    };

    for r in 0..w.max(h) {
        if r == 0 {
            visit(cx, cy, &mut best);
        } else {
            for x in cx - r..=cx + r {
                visit(x, cy - r, &mut best);
                visit(x, cy + r, &mut best);
            }
            for y in cy - r + 1..cy + r {
                visit(cx - r, y, &mut best);
                visit(cx + r, y, &mut best);
            }
        }

        let mut bound = f32::INFINITY;
        if cx - r > 0 {
            bound = bound.min((p.x - (cx - r) as f32).max(0.0));
        }
        if cx + r + 1 < w {
            bound = bound.min(((cx + r + 1) as f32 - p.x).max(0.0));
        }
        if cy - r > 0 {
            bound = bound.min((p.y - (cy - r) as f32).max(0.0));
        }
        if cy + r + 1 < h {
            bound = bound.min(((cy + r + 1) as f32 - p.y).max(0.0));
        }
        if bound == f32::INFINITY {
            break;
        }
        if let Some((_, d2)) = best {
            if d2 <= bound * bound {
                break;
            }
        }
    }
    best
}
