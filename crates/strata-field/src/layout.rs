use crate::HALO;
use crate::rect::FieldRect;

/// Grid coordinate of one mesh section.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionCoord {
    pub sx: u32,
    pub sy: u32,
}

impl SectionCoord {
    #[inline]
    pub const fn new(sx: u32, sy: u32) -> Self {
        Self { sx, sy }
    }
}

/// How the terrain is cut into equally sized sections sharing their edge vertices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SectionLayout {
    component_size: usize,
    sections_x: usize,
    sections_y: usize,
}

impl SectionLayout {
    pub const MIN_COMPONENT_SIZE: usize = 2;

    /// `component_size` is the vertex width of a section; all inputs are clamped.
    pub fn new(component_size: usize, sections_x: usize, sections_y: usize) -> Self {
        Self {
            component_size: component_size.max(Self::MIN_COMPONENT_SIZE),
            sections_x: sections_x.max(1),
            sections_y: sections_y.max(1),
        }
    }

    #[inline]
    pub fn component_size(&self) -> usize {
        self.component_size
    }

    #[inline]
    pub fn sections_x(&self) -> usize {
        self.sections_x
    }

    #[inline]
    pub fn sections_y(&self) -> usize {
        self.sections_y
    }

    #[inline]
    pub fn section_count(&self) -> usize {
        self.sections_x * self.sections_y
    }

    /// Quads per section edge; also the stride between neighbouring section origins.
    #[inline]
    pub fn stride(&self) -> usize {
        self.component_size - 1
    }

    /// Edge length of a section window, halo included.
    #[inline]
    pub fn window_size(&self) -> usize {
        self.component_size + 2 * HALO
    }

    /// Height-field dimensions needed to hold every section plus the halo ring.
    pub fn field_size(&self) -> (usize, usize) {
        (
            self.stride() * self.sections_x + 1 + 2 * HALO,
            self.stride() * self.sections_y + 1 + 2 * HALO,
        )
    }

    #[inline]
    pub fn contains(&self, coord: SectionCoord) -> bool {
        (coord.sx as usize) < self.sections_x && (coord.sy as usize) < self.sections_y
    }

    #[inline]
    pub fn index_of(&self, coord: SectionCoord) -> usize {
        coord.sy as usize * self.sections_x + coord.sx as usize
    }

    #[inline]
    pub fn coord_of(&self, index: usize) -> SectionCoord {
        SectionCoord::new(
            (index % self.sections_x) as u32,
            (index / self.sections_x) as u32,
        )
    }

    /// All sections in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = SectionCoord> + use<> {
        let layout = *self;
        (0..layout.section_count()).map(move |i| layout.coord_of(i))
    }

    /// Top-left corner of the section window in field space.
    #[inline]
    pub fn window_origin(&self, coord: SectionCoord) -> (usize, usize) {
        (
            coord.sx as usize * self.stride(),
            coord.sy as usize * self.stride(),
        )
    }

    /// Position of the section's first vertex in terrain space.
    #[inline]
    pub fn world_origin(&self, coord: SectionCoord) -> (f32, f32) {
        let (x, y) = self.window_origin(coord);
        (x as f32, y as f32)
    }

    /// Field cells the section reads: its vertices and their halo.
    pub fn window_rect(&self, coord: SectionCoord) -> FieldRect {
        let (x, y) = self.window_origin(coord);
        let s = self.window_size();
        FieldRect::new(x, y, x + s, y + s)
    }

    /// Sections whose vertices or normals depend on any cell in `rect`, row-major.
    pub fn sections_touching(&self, rect: FieldRect) -> Vec<SectionCoord> {
        if rect.is_empty() {
            return Vec::new();
        }
        self.coords()
            .filter(|&c| self.window_rect(c).overlaps(&rect))
            .collect()
    }
}
