use strata_field::HeightField;
use strata_geom::{Vec2, Vec3};

use crate::component::ComponentData;

/// Vertices emitted by [`build_border`] for a field with the given payload widths.
pub fn border_vertex_count(payload_x: usize, payload_y: usize) -> usize {
    if payload_x < 2 || payload_y < 2 {
        return 0;
    }
    4 * (payload_x + payload_y)
}

pub fn border_triangle_count(payload_x: usize, payload_y: usize) -> usize {
    if payload_x < 2 || payload_y < 2 {
        return 0;
    }
    4 * (payload_x - 1) + 4 * (payload_y - 1)
}

/// Vertical skirt around the whole terrain perimeter, in field-local space.
///
/// Each side is a strip of bottom/top vertex pairs: the bottom sits at `-height_scale`, the
/// top at the edge vertex height. Faces point away from the terrain. Sides are emitted as
/// -X, +X, -Y, +Y. Fields whose payload is narrower than two vertices produce nothing.
pub fn build_border(field: &HeightField, height_scale: f32, create_triangles: bool) -> ComponentData {
    let (wx, wy) = (field.payload_width_x(), field.payload_width_y());
    let mut out = ComponentData::default();
    if wx < 2 || wy < 2 {
        log::debug!(target: "mesh", "border skipped for {}x{} payload", wx, wy);
        return out;
    }
    let verts = border_vertex_count(wx, wy);
    out.vertices.reserve(verts);
    out.uvs.reserve(verts);
    out.normals.reserve(verts);
    out.tangents.reserve(verts);
    if create_triangles {
        out.triangles.reserve(border_triangle_count(wx, wy) * 3);
    }

    let (fx, fy) = ((wx - 1) as f32, (wy - 1) as f32);
    let minus_x = |i: usize| (0.0f32, i as f32, field.height(1, i + 1));
    let plus_x = |i: usize| (fx, i as f32, field.height(wx, i + 1));
    let minus_y = |i: usize| (i as f32, 0.0f32, field.height(i + 1, 1));
    let plus_y = |i: usize| (i as f32, fy, field.height(i + 1, wy));
    let sides: [(usize, Vec3, Vec3, bool, &dyn Fn(usize) -> (f32, f32, f32)); 4] = [
        (wy, -Vec3::X, Vec3::Z, false, &minus_x),
        (wy, Vec3::X, Vec3::Z, true, &plus_x),
        (wx, -Vec3::Y, Vec3::X, true, &minus_y),
        (wx, Vec3::Y, Vec3::X, false, &plus_y),
    ];
    for (len, normal, tangent, flip, at) in sides {
        let edge = Edge {
            normal,
            tangent,
            flip,
            height_scale,
            create_triangles,
        };
        edge.emit(&mut out, len, at);
    }
    out
}

struct Edge {
    normal: Vec3,
    tangent: Vec3,
    /// Reverses the winding so the face points along `normal`.
    flip: bool,
    height_scale: f32,
    create_triangles: bool,
}

impl Edge {
    fn emit(&self, out: &mut ComponentData, len: usize, at: &dyn Fn(usize) -> (f32, f32, f32)) {
        let base = out.vertices.len() as u32;
        for i in 0..len {
            let (x, y, h) = at(i);
            out.vertices.push(Vec3::new(x, y, -self.height_scale));
            out.vertices.push(Vec3::new(x, y, h * self.height_scale));
            out.uvs.push(Vec2::new(i as f32, 0.0));
            out.uvs.push(Vec2::new(i as f32, h + 1.0));
            for _ in 0..2 {
                out.normals.push(self.normal);
                out.tangents.push(self.tangent);
            }
        }
        if !self.create_triangles {
            return;
        }
        for i in 0..len.saturating_sub(1) as u32 {
            let b0 = base + 2 * i;
            let (t0, b1) = (b0 + 1, b0 + 2);
            let t1 = b1 + 1;
            if self.flip {
                out.triangles.extend_from_slice(&[t1, t0, b0, b1, t1, b0]);
            } else {
                out.triangles.extend_from_slice(&[b0, t0, t1, b0, t1, b1]);
            }
        }
    }
}
