use strata_field::{HALO, SectionView, surface_frame};
use strata_geom::{Vec2, Vec3};

use crate::component::ComponentData;

/// Per-build inputs that do not live in the section snapshot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SectionParams {
    /// Terrain-space position of the section's first vertex; drives UV continuity.
    pub world_x: f32,
    pub world_y: f32,
    pub tiling: f32,
    /// Multiplier from normalized heights to output Z.
    pub height_scale: f32,
    /// `false` is an update-only build: geometry is refreshed, the index buffer left empty.
    pub create_triangles: bool,
}

impl Default for SectionParams {
    fn default() -> Self {
        Self {
            world_x: 0.0,
            world_y: 0.0,
            tiling: 1.0,
            height_scale: 1.0,
            create_triangles: true,
        }
    }
}

pub fn build_section(view: &SectionView, params: &SectionParams) -> ComponentData {
    let mut out = ComponentData::with_section_capacity(view.vertex_width());
    build_section_into(view, params, &mut out);
    out
}

/// Builds into `out`, reusing its allocations.
///
/// Vertices are component-local `(x, y, h)` in row-major order; normals and tangents come
/// from the snapshot's own halo so edges match the neighbouring sections exactly.
pub fn build_section_into(view: &SectionView, params: &SectionParams, out: &mut ComponentData) {
    out.clear_keep_capacity();
    let n = view.vertex_width();
    out.reserve_section(n);

    let scale = params.height_scale;
    let h = |x: usize, y: usize| view.get(x, y) * scale;
    for y in 0..n {
        for x in 0..n {
            let (hx, hy) = (x + HALO, y + HALO);
            out.vertices.push(Vec3::new(x as f32, y as f32, h(hx, hy)));
            out.uvs.push(Vec2::new(
                (params.world_x + x as f32) * params.tiling,
                (params.world_y + y as f32) * params.tiling,
            ));
            let frame = surface_frame(h(hx - 1, hy), h(hx + 1, hy), h(hx, hy - 1), h(hx, hy + 1));
            out.normals.push(frame.normal);
            out.tangents.push(frame.tangent);
        }
    }

    if params.create_triangles {
        push_grid_triangles(n, &mut out.triangles);
    }
}

/// Two counter-clockwise (seen from +Z) triangles per quad of an `n x n` vertex grid,
/// split along the `(x, y)`-`(x+1, y+1)` diagonal.
pub fn push_grid_triangles(n: usize, idx: &mut Vec<u32>) {
    let quads = n.saturating_sub(1);
    idx.reserve(quads * quads * 6);
    let n = n as u32;
    for y in 0..quads as u32 {
        for x in 0..quads as u32 {
            let i = y * n + x;
            idx.extend_from_slice(&[i, i + 1, i + n + 1, i, i + n + 1, i + n]);
        }
    }
}
