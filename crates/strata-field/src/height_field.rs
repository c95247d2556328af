use strata_geom::Vec3;

use crate::frame::surface_frame;
use crate::rect::FieldRect;
use crate::section::SectionView;

/// Dense row-major grid of normalized heights with a one-cell halo ring.
///
/// Consumers scale heights by a separate maximum-height value; the field itself only stores
/// the normalized samples. The payload area is `(width_x - 2) x (width_y - 2)`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HeightField {
    width_x: usize,
    width_y: usize,
    heights: Vec<f32>,
}

/// Normals and tangents for a block of interior cells, row-major over `rect`.
#[derive(Clone, Debug, Default)]
pub struct SurfaceFrames {
    pub rect: FieldRect,
    pub normals: Vec<Vec3>,
    pub tangents: Vec<Vec3>,
}

impl HeightField {
    pub fn new(width_x: usize, width_y: usize) -> Self {
        Self {
            width_x,
            width_y,
            heights: vec![0.0; width_x * width_y],
        }
    }

    /// Reallocates to `x * y` zeroed cells. Non-positive sizes leave the field untouched.
    pub fn resize(&mut self, x: i32, y: i32) {
        if x <= 0 || y <= 0 {
            log::debug!("ignoring height-field resize to {}x{}", x, y);
            return;
        }
        self.width_x = x as usize;
        self.width_y = y as usize;
        self.heights.clear();
        self.heights.resize(self.width_x * self.width_y, 0.0);
    }

    #[inline]
    pub fn width_x(&self) -> usize {
        self.width_x
    }

    #[inline]
    pub fn width_y(&self) -> usize {
        self.width_y
    }

    #[inline]
    pub fn payload_width_x(&self) -> usize {
        self.width_x.saturating_sub(2)
    }

    #[inline]
    pub fn payload_width_y(&self) -> usize {
        self.width_y.saturating_sub(2)
    }

    #[inline]
    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    #[inline]
    fn idx(&self, x: usize, y: usize) -> usize {
        y * self.width_x + x
    }

    /// Raw read. Callers validate coordinates; out-of-range access panics.
    #[inline]
    pub fn height(&self, x: usize, y: usize) -> f32 {
        debug_assert!(x < self.width_x && y < self.width_y);
        self.heights[self.idx(x, y)]
    }

    /// Raw write. Callers validate coordinates; out-of-range access panics.
    #[inline]
    pub fn set_height(&mut self, x: usize, y: usize, value: f32) {
        debug_assert!(x < self.width_x && y < self.width_y);
        let i = self.idx(x, y);
        self.heights[i] = value;
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        if x < self.width_x && y < self.width_y {
            Some(self.heights[self.idx(x, y)])
        } else {
            None
        }
    }

    /// Best-effort read for untrusted coordinates: negative coordinates clamp to zero,
    /// reads past the far edge return `0.0`.
    pub fn height_clamped(&self, x: i64, y: i64) -> f32 {
        let x = x.max(0) as usize;
        let y = y.max(0) as usize;
        self.get(x, y).unwrap_or(0.0)
    }

    /// Write that ignores out-of-range coordinates. Returns whether the cell was written.
    pub fn set_height_checked(&mut self, x: usize, y: usize, value: f32) -> bool {
        if x < self.width_x && y < self.width_y {
            self.set_height(x, y, value);
            true
        } else {
            false
        }
    }

    pub fn fill(&mut self, value: f32) {
        self.heights.fill(value);
    }

    /// Copies a `size x size` window starting at `(origin_x, origin_y)`.
    ///
    /// Cells of the window that fall outside the field read as `0.0`.
    pub fn extract_section(&self, origin_x: usize, origin_y: usize, size: usize) -> SectionView {
        let mut data = Vec::with_capacity(size * size);
        for y in 0..size {
            let fy = origin_y + y;
            for x in 0..size {
                data.push(self.get(origin_x + x, fy).unwrap_or(0.0));
            }
        }
        SectionView::from_parts(origin_x, origin_y, size, data)
    }

    /// Normals and tangents for every interior cell inside `region`.
    ///
    /// The halo ring never gets a frame of its own; `region` is clipped to `1..width-1` on
    /// both axes. Heights are multiplied by `height_scale` before differencing.
    pub fn compute_normals_and_tangents(&self, region: FieldRect, height_scale: f32) -> SurfaceFrames {
        let interior = FieldRect::new(
            1,
            1,
            self.width_x.saturating_sub(1),
            self.width_y.saturating_sub(1),
        );
        let rect = region.intersect(&interior);
        if rect.is_empty() {
            return SurfaceFrames {
                rect,
                ..SurfaceFrames::default()
            };
        }
        let n = rect.width() * rect.height();
        let mut normals = Vec::with_capacity(n);
        let mut tangents = Vec::with_capacity(n);
        for y in rect.y0..rect.y1 {
            for x in rect.x0..rect.x1 {
                let f = surface_frame(
                    self.height(x - 1, y) * height_scale,
                    self.height(x + 1, y) * height_scale,
                    self.height(x, y - 1) * height_scale,
                    self.height(x, y + 1) * height_scale,
                );
                normals.push(f.normal);
                tangents.push(f.tangent);
            }
        }
        SurfaceFrames {
            rect,
            normals,
            tangents,
        }
    }
}
