//! Seeded procedural noise used to author height-field content.
//!
//! Every generator owns a native grid of per-cell state and is sampled in height-field
//! coordinates after a call to `scale(sample_width, sample_height)`. Until `scale` runs the
//! mapping is the identity, i.e. coordinates are read as native grid units.
#![forbid(unsafe_code)]

pub mod generate;
mod gradient;
mod interp;
mod point;
mod value;

pub use generate::{NoiseParams, generate};
pub use gradient::GradientNoise;
pub use interp::{corp, curp, fade, lerp};
pub use point::{GridNoise, PointNoise};
pub use value::{Interp, PlasmaNoise, ValueNoise};

/// Affine mapping from sample coordinates to native grid coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct GridScale {
    pub x: f32,
    pub y: f32,
}

impl GridScale {
    pub(crate) const IDENTITY: GridScale = GridScale { x: 1.0, y: 1.0 };

    /// Spreads `sample_w x sample_h` samples across `span_x x span_y` grid units.
    pub(crate) fn fit(span_x: f32, span_y: f32, sample_w: u32, sample_h: u32) -> Self {
        Self {
            x: span_x / sample_w.max(1) as f32,
            y: span_y / sample_h.max(1) as f32,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NoiseKind {
    Gradient,
    Value,
    Plasma,
    Point,
    Grid,
}

/// The closed set of noise generators with a shared scaling entry point.
#[derive(Clone, Debug)]
pub enum Noise {
    Gradient(GradientNoise),
    Value(ValueNoise),
    Plasma(PlasmaNoise),
    Point(PointNoise),
    Grid(GridNoise),
}

impl Noise {
    pub fn kind(&self) -> NoiseKind {
        match self {
            Noise::Gradient(_) => NoiseKind::Gradient,
            Noise::Value(_) => NoiseKind::Value,
            Noise::Plasma(_) => NoiseKind::Plasma,
            Noise::Point(_) => NoiseKind::Point,
            Noise::Grid(_) => NoiseKind::Grid,
        }
    }

    /// Native grid size.
    pub fn dims(&self) -> (usize, usize) {
        match self {
            Noise::Gradient(n) => (n.width(), n.height()),
            Noise::Value(n) => (n.width(), n.height()),
            Noise::Plasma(n) => (n.width(), n.height()),
            Noise::Point(n) => (n.width(), n.height()),
            Noise::Grid(n) => (n.width(), n.height()),
        }
    }

    pub fn scale(&mut self, sample_width: u32, sample_height: u32) {
        match self {
            Noise::Gradient(n) => n.scale(sample_width, sample_height),
            Noise::Value(n) => n.scale(sample_width, sample_height),
            Noise::Plasma(n) => n.scale(sample_width, sample_height),
            Noise::Point(n) => n.scale(sample_width, sample_height),
            Noise::Grid(n) => n.scale(sample_width, sample_height),
        }
    }

    /// Samples with the generator's natural mode: Perlin for gradients, bilinear for value
    /// grids, bicubic for plasma and Worley distance for point sets.
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        match self {
            Noise::Gradient(n) => n.perlin(x, y),
            Noise::Value(n) => n.linear(x, y),
            Noise::Plasma(n) => n.cubic(x, y),
            Noise::Point(n) => n.worley(x, y),
            Noise::Grid(n) => n.worley(x, y),
        }
    }
}

impl From<GradientNoise> for Noise {
    fn from(n: GradientNoise) -> Self {
        Noise::Gradient(n)
    }
}

impl From<ValueNoise> for Noise {
    fn from(n: ValueNoise) -> Self {
        Noise::Value(n)
    }
}

impl From<PlasmaNoise> for Noise {
    fn from(n: PlasmaNoise) -> Self {
        Noise::Plasma(n)
    }
}

impl From<PointNoise> for Noise {
    fn from(n: PointNoise) -> Self {
        Noise::Point(n)
    }
}

impl From<GridNoise> for Noise {
    fn from(n: GridNoise) -> Self {
        Noise::Grid(n)
    }
}
