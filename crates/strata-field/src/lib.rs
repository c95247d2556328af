//! Height-field storage, section snapshots, and the shared normal/tangent kernel.
#![forbid(unsafe_code)]

mod frame;
mod height_field;
mod layout;
mod rect;
mod section;

pub use frame::{SurfaceFrame, surface_frame};
pub use height_field::{HeightField, SurfaceFrames};
pub use layout::{SectionCoord, SectionLayout};
pub use rect::FieldRect;
pub use section::SectionView;

/// Width of the halo ring kept around every section window.
pub const HALO: usize = 1;
