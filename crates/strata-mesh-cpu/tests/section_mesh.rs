use proptest::prelude::*;
use strata_field::{FieldRect, HeightField, SectionCoord, SectionLayout};
use strata_geom::Vec3;
use strata_mesh_cpu::{ComponentData, SectionParams, build_section, build_section_into};

fn wavy(layout: &SectionLayout) -> HeightField {
    let (w, h) = layout.field_size();
    let mut f = HeightField::new(w, h);
    for y in 0..h {
        for x in 0..w {
            f.set_height(x, y, ((x as f32) * 0.37).sin() * 0.5 + ((y as f32) * 0.21).cos() * 0.25);
        }
    }
    f
}

fn section(layout: &SectionLayout, field: &HeightField, coord: SectionCoord, params: SectionParams) -> ComponentData {
    let (ox, oy) = layout.window_origin(coord);
    let view = field.extract_section(ox, oy, layout.window_size());
    let (wx, wy) = layout.world_origin(coord);
    build_section(
        &view,
        &SectionParams {
            world_x: wx,
            world_y: wy,
            ..params
        },
    )
}

fn face_normal(d: &ComponentData, t: &[u32]) -> Vec3 {
    let a = d.vertices[t[0] as usize];
    let b = d.vertices[t[1] as usize];
    let c = d.vertices[t[2] as usize];
    (b - a).cross(c - a)
}

#[test]
fn flat_field_has_up_normals_and_x_tangents() {
    let layout = SectionLayout::new(5, 2, 1);
    let (w, h) = layout.field_size();
    let field = HeightField::new(w, h);
    for coord in layout.coords() {
        let d = section(&layout, &field, coord, SectionParams::default());
        assert_eq!(d.vertex_count(), 25);
        assert_eq!(d.triangles.len(), 6 * 16);
        assert!(d.is_consistent());
        assert!(d.normals.iter().all(|&n| n == Vec3::Z));
        assert!(d.tangents.iter().all(|&t| t == Vec3::X));
    }
}

#[test]
fn triangles_wind_counter_clockwise_from_above() {
    let layout = SectionLayout::new(6, 1, 1);
    let field = wavy(&layout);
    let d = section(&layout, &field, SectionCoord::new(0, 0), SectionParams::default());
    for t in d.triangles.chunks_exact(3) {
        assert!(face_normal(&d, t).z > 0.0);
    }
}

#[test]
fn vertices_are_component_local_and_scaled() {
    let layout = SectionLayout::new(4, 2, 2);
    let field = wavy(&layout);
    let params = SectionParams {
        height_scale: 10.0,
        ..SectionParams::default()
    };
    let coord = SectionCoord::new(1, 1);
    let d = section(&layout, &field, coord, params);
    let (ox, oy) = layout.window_origin(coord);
    for y in 0..4 {
        for x in 0..4 {
            let v = d.vertices[y * 4 + x];
            assert_eq!((v.x, v.y), (x as f32, y as f32));
            assert_eq!(v.z, field.height(ox + x + 1, oy + y + 1) * 10.0);
        }
    }
}

#[test]
fn shared_edges_agree_between_neighbours() {
    let layout = SectionLayout::new(5, 2, 2);
    let field = wavy(&layout);
    let params = SectionParams {
        height_scale: 4.0,
        ..SectionParams::default()
    };
    let left = section(&layout, &field, SectionCoord::new(0, 0), params);
    let right = section(&layout, &field, SectionCoord::new(1, 0), params);
    let below = section(&layout, &field, SectionCoord::new(0, 1), params);
    let n = 5;
    for i in 0..n {
        let a = i * n + (n - 1);
        let b = i * n;
        assert_eq!(left.vertices[a].z, right.vertices[b].z);
        assert_eq!(left.normals[a], right.normals[b]);
        assert_eq!(left.tangents[a], right.tangents[b]);
        assert_eq!(left.uvs[a], right.uvs[b]);

        let top = (n - 1) * n + i;
        assert_eq!(left.normals[top], below.normals[i]);
        assert_eq!(left.uvs[top], below.uvs[i]);
    }
}

#[test]
fn section_frames_match_whole_field_pass() {
    let layout = SectionLayout::new(5, 2, 2);
    let field = wavy(&layout);
    let (w, h) = layout.field_size();
    let frames = field.compute_normals_and_tangents(FieldRect::new(0, 0, w, h), 2.0);
    let params = SectionParams {
        height_scale: 2.0,
        ..SectionParams::default()
    };
    let coord = SectionCoord::new(1, 1);
    let d = section(&layout, &field, coord, params);
    let (ox, oy) = layout.window_origin(coord);
    let fw = frames.rect.width();
    for y in 0..5 {
        for x in 0..5 {
            let fx = ox + x + 1 - frames.rect.x0;
            let fy = oy + y + 1 - frames.rect.y0;
            assert_eq!(d.normals[y * 5 + x], frames.normals[fy * fw + fx]);
        }
    }
}

#[test]
fn uvs_follow_world_position_and_tiling() {
    let layout = SectionLayout::new(3, 3, 1);
    let (w, h) = layout.field_size();
    let field = HeightField::new(w, h);
    let params = SectionParams {
        tiling: 0.5,
        ..SectionParams::default()
    };
    let d = section(&layout, &field, SectionCoord::new(2, 0), params);
    // World origin of section 2 is 2 * (n - 1) = 4.
    assert_eq!(d.uvs[0].x, 2.0);
    assert_eq!(d.uvs[2].x, 3.0);
    assert_eq!(d.uvs[3 * 2].y, 1.0);
}

#[test]
fn update_only_build_skips_indices_but_keeps_geometry() {
    let layout = SectionLayout::new(4, 1, 1);
    let field = wavy(&layout);
    let coord = SectionCoord::new(0, 0);
    let full = section(&layout, &field, coord, SectionParams::default());
    let update = section(
        &layout,
        &field,
        coord,
        SectionParams {
            create_triangles: false,
            ..SectionParams::default()
        },
    );
    assert!(update.triangles.is_empty());
    assert_eq!(update.vertices, full.vertices);
    assert_eq!(update.normals, full.normals);
}

#[test]
fn build_into_reuses_buffers() {
    let layout = SectionLayout::new(8, 1, 1);
    let field = wavy(&layout);
    let view = field.extract_section(0, 0, layout.window_size());
    let mut out = ComponentData::default();
    build_section_into(&view, &SectionParams::default(), &mut out);
    let cap = out.vertices.capacity();
    build_section_into(&view, &SectionParams::default(), &mut out);
    assert_eq!(out.vertices.capacity(), cap);
    assert_eq!(out.vertex_count(), 64);
}

#[test]
fn bounds_cover_scaled_heights() {
    let layout = SectionLayout::new(3, 1, 1);
    let (w, h) = layout.field_size();
    let mut field = HeightField::new(w, h);
    field.set_height(2, 2, 1.0);
    let d = section(
        &layout,
        &field,
        SectionCoord::new(0, 0),
        SectionParams {
            height_scale: 5.0,
            ..SectionParams::default()
        },
    );
    let b = d.bounds().expect("non-empty mesh has bounds");
    assert_eq!(b.min, Vec3::new(0.0, 0.0, 0.0));
    assert_eq!(b.max, Vec3::new(2.0, 2.0, 5.0));
}

proptest! {
    #[test]
    fn index_count_matches_quad_count(n in 2usize..24, seed in 0u32..1000) {
        let layout = SectionLayout::new(n, 1, 1);
        let (w, h) = layout.field_size();
        let mut field = HeightField::new(w, h);
        for y in 0..h {
            for x in 0..w {
                field.set_height(x, y, ((x as u32 * 31 + y as u32 * 17 + seed) % 97) as f32 / 97.0);
            }
        }
        let view = field.extract_section(0, 0, layout.window_size());
        let d = build_section(&view, &SectionParams::default());
        prop_assert_eq!(d.vertex_count(), n * n);
        prop_assert_eq!(d.triangles.len(), 6 * (n - 1) * (n - 1));
        prop_assert!(d.is_consistent());
        prop_assert!(d.triangles.iter().all(|&i| (i as usize) < n * n));
    }
}
