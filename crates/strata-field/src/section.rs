use crate::HALO;

/// Owned, immutable copy of a square field window including its halo.
///
/// Built fresh for every build request and moved into exactly one worker, so no two
/// builders ever share a buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct SectionView {
    origin_x: usize,
    origin_y: usize,
    size: usize,
    data: Vec<f32>,
}

impl SectionView {
    pub(crate) fn from_parts(origin_x: usize, origin_y: usize, size: usize, data: Vec<f32>) -> Self {
        debug_assert_eq!(data.len(), size * size);
        Self {
            origin_x,
            origin_y,
            size,
            data,
        }
    }

    #[inline]
    pub fn origin(&self) -> (usize, usize) {
        (self.origin_x, self.origin_y)
    }

    /// Window edge length, halo included.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Vertex width of the mesh this window feeds (window minus the halo on both sides).
    #[inline]
    pub fn vertex_width(&self) -> usize {
        self.size.saturating_sub(2 * HALO)
    }

    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Window-local read, `(0,0)` being the halo corner.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.size + x]
    }

    /// Read in vertex coordinates, i.e. skipping the halo ring.
    #[inline]
    pub fn vertex_height(&self, vx: usize, vy: usize) -> f32 {
        self.get(vx + HALO, vy + HALO)
    }
}
