//! CPU mesh generation for height-field sections and the perimeter skirt (engine-only).
#![forbid(unsafe_code)]

mod border;
mod component;
mod section;
mod slot;

pub use border::{border_triangle_count, border_vertex_count, build_border};
pub use component::{CollisionMesh, ComponentData};
pub use section::{SectionParams, build_section, build_section_into, push_grid_triangles};
pub use slot::MeshSlot;
