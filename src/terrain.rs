use std::time::Instant;

use hashbrown::HashSet;
use strata_field::{FieldRect, HeightField, SectionCoord, SectionLayout};
use strata_mesh_cpu::{CollisionMesh, MeshSlot, build_border};
use strata_noise::NoiseParams;
use strata_runtime::{
    BuildReport, BuildRequest, BuildScheduler, CancelToken, CookOutcome, CookQueue, CookTicket, SectionOut,
    ThreadPoolBuildError,
};

use crate::config::TerrainConfig;

/// Aggregate mesh sizes across every section plus the border.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TerrainStats {
    pub sections: usize,
    pub vertices: usize,
    pub triangles: usize,
    pub border_vertices: usize,
    pub border_triangles: usize,
}

/// Height field plus one mesh slot and collision queue per section.
///
/// Builds after a layout change create topology; every other build only refreshes geometry.
pub struct Terrain {
    config: TerrainConfig,
    layout: SectionLayout,
    field: HeightField,
    slots: Vec<MeshSlot>,
    collision: Vec<CookQueue<CollisionMesh>>,
    border: MeshSlot,
    dirty: HashSet<SectionCoord>,
    topology_dirty: bool,
    cook_requests: Vec<(SectionCoord, CookTicket)>,
    scheduler: BuildScheduler,
}

impl Terrain {
    pub fn new(config: TerrainConfig) -> Result<Self, ThreadPoolBuildError> {
        let config = config.sanitized();
        let scheduler = BuildScheduler::new(config.threads)?;
        let layout = SectionLayout::new(config.component_size, config.sections_x, config.sections_y);
        let mut terrain = Self {
            config,
            layout,
            field: HeightField::default(),
            slots: Vec::new(),
            collision: Vec::new(),
            border: MeshSlot::new(),
            dirty: HashSet::new(),
            topology_dirty: true,
            cook_requests: Vec::new(),
            scheduler,
        };
        terrain.rebuild_heightmap();
        Ok(terrain)
    }

    #[inline]
    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    #[inline]
    pub fn layout(&self) -> SectionLayout {
        self.layout
    }

    #[inline]
    pub fn field(&self) -> &HeightField {
        &self.field
    }

    /// Direct access for editing tools. Mark touched sections with [`Terrain::update_range`].
    pub fn field_mut(&mut self) -> &mut HeightField {
        &mut self.field
    }

    pub fn section(&self, sx: u32, sy: u32) -> Option<&MeshSlot> {
        let coord = SectionCoord::new(sx, sy);
        self.layout
            .contains(coord)
            .then(|| &self.slots[self.layout.index_of(coord)])
    }

    pub fn border(&self) -> &MeshSlot {
        &self.border
    }

    pub fn collision(&self, sx: u32, sy: u32) -> Option<&CollisionMesh> {
        let coord = SectionCoord::new(sx, sy);
        if !self.layout.contains(coord) {
            return None;
        }
        self.collision[self.layout.index_of(coord)].active()
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.scheduler.cancel_token()
    }

    pub fn is_mesh_dirty(&self) -> bool {
        self.topology_dirty
    }

    pub fn dirty_sections(&self) -> usize {
        self.dirty.len()
    }

    /// Changes the section layout. Inputs are clamped. A new layout reallocates and zeroes the
    /// field; the current layout leaves everything as is.
    pub fn resize(&mut self, component_size: usize, sections_x: usize, sections_y: usize) {
        self.config.component_size = component_size;
        self.config.sections_x = sections_x;
        self.config.sections_y = sections_y;
        self.config = self.config.clone().sanitized();
        let layout = SectionLayout::new(self.config.component_size, self.config.sections_x, self.config.sections_y);
        if layout == self.layout {
            return;
        }
        self.layout = layout;
        self.topology_dirty = true;
        self.rebuild_heightmap();
    }

    /// New UV tiling; every section picks it up on the next build.
    pub fn set_tiling(&mut self, tiling: f32) {
        if !tiling.is_finite() {
            log::debug!(target: "terrain", "ignoring non-finite tiling {}", tiling);
            return;
        }
        self.config.tiling = tiling;
        self.dirty.extend(self.layout.coords());
    }

    pub fn enable_border(&mut self, enable: bool) {
        if self.config.border == enable {
            return;
        }
        self.config.border = enable;
        if enable {
            self.rebuild_border(true);
        } else {
            self.border.clear();
        }
    }

    /// LOD count is capped at the component size; only stored for the renderer.
    pub fn set_lods(&mut self, count: usize, distance_scale: f32) {
        self.config.lods.count = count.min(self.config.component_size);
        if distance_scale.is_finite() && distance_scale > 0.0 {
            self.config.lods.distance_scale = distance_scale;
        }
    }

    /// Zeroes the height field and rebuilds every mesh from scratch.
    pub fn rebuild(&mut self) -> BuildReport {
        self.topology_dirty = true;
        self.rebuild_heightmap();
        self.refresh()
    }

    /// Rebuilds every section from the current height field.
    pub fn refresh(&mut self) -> BuildReport {
        let coords: Vec<SectionCoord> = self.layout.coords().collect();
        self.dirty.extend(coords.iter().copied());
        let report = self.build(None);
        if self.config.border {
            self.rebuild_border(false);
        }
        report
    }

    /// Marks one section for the next [`Terrain::update`]. Out-of-layout coordinates are ignored.
    pub fn update_section(&mut self, sx: u32, sy: u32) {
        let coord = SectionCoord::new(sx, sy);
        if self.layout.contains(coord) {
            self.dirty.insert(coord);
        }
    }

    /// Marks every section whose window overlaps `range` (field coordinates).
    pub fn update_range(&mut self, range: FieldRect) {
        self.dirty.extend(self.layout.sections_touching(range));
    }

    /// Rebuilds only the marked sections, plus the border if any of them sits on the perimeter.
    pub fn update(&mut self) -> BuildReport {
        if self.topology_dirty {
            return self.refresh();
        }
        if self.dirty.is_empty() {
            return BuildReport::default();
        }
        let coords: Vec<SectionCoord> = self.dirty.iter().copied().collect();
        let touches_edge = coords.iter().any(|c| self.on_perimeter(*c));
        let report = self.build(Some(coords));
        if self.config.border && touches_edge {
            self.rebuild_border(false);
        }
        report
    }

    /// Writes `params` noise into the field and refreshes the mesh.
    pub fn generate(&mut self, params: &NoiseParams, seed: u64) -> BuildReport {
        strata_noise::generate(&mut self.field, seed, params);
        self.refresh()
    }

    /// Reports an asynchronous cook back for `(sx, sy)`.
    pub fn finish_collision(&mut self, sx: u32, sy: u32, ticket: CookTicket, success: bool) -> CookOutcome {
        let coord = SectionCoord::new(sx, sy);
        if !self.layout.contains(coord) {
            return CookOutcome::Ignored;
        }
        self.collision[self.layout.index_of(coord)].finish(ticket, success)
    }

    /// Cook requests issued since the last call, for an external cooker to process.
    pub fn take_cook_requests(&mut self) -> Vec<(SectionCoord, CookTicket)> {
        std::mem::take(&mut self.cook_requests)
    }

    pub fn stats(&self) -> TerrainStats {
        let mut stats = TerrainStats {
            sections: self.slots.len(),
            border_vertices: self.border.data().vertex_count(),
            border_triangles: self.border.data().triangle_count(),
            ..TerrainStats::default()
        };
        for slot in &self.slots {
            stats.vertices += slot.data().vertex_count();
            stats.triangles += slot.data().triangle_count();
        }
        stats
    }

    fn on_perimeter(&self, c: SectionCoord) -> bool {
        let (sx, sy) = (c.sx as usize, c.sy as usize);
        sx == 0 || sy == 0 || sx + 1 == self.layout.sections_x() || sy + 1 == self.layout.sections_y()
    }

    fn rebuild_heightmap(&mut self) {
        let (w, h) = self.layout.field_size();
        self.field.resize(w as i32, h as i32);
        if self.topology_dirty {
            let count = self.layout.section_count();
            self.slots.clear();
            self.slots.resize_with(count, MeshSlot::new);
            let first = self.collision.iter().map(CookQueue::next_ticket).max().unwrap_or(0);
            self.collision.clear();
            self.collision.resize_with(count, || CookQueue::starting_at(first));
            self.border.clear();
            self.dirty.clear();
            self.cook_requests.clear();
        }
        log::info!(target: "terrain", "heightmap rebuilt ({}x{})", w, h);
    }

    fn build(&mut self, sections: Option<Vec<SectionCoord>>) -> BuildReport {
        let t0 = Instant::now();
        let create = self.topology_dirty;
        let request = BuildRequest {
            layout: self.layout,
            sections,
            tiling: self.config.tiling,
            height_scale: self.config.height_scale,
            create_triangles: create,
        };
        let async_cooking = self.config.async_cooking;
        let Self {
            scheduler,
            field,
            slots,
            collision,
            dirty,
            cook_requests,
            layout,
            ..
        } = self;
        let report = scheduler.run(field, &request, &mut |out: SectionOut| {
            let idx = layout.index_of(out.coord);
            let coord = out.coord;
            if !slots[idx].apply(out.data) {
                return;
            }
            dirty.remove(&coord);
            let mesh = CollisionMesh::from_component(slots[idx].data());
            if async_cooking {
                let ticket = collision[idx].submit(mesh);
                cook_requests.push((coord, ticket));
            } else {
                collision[idx].cook_now(mesh);
            }
        });
        if create && !report.cancelled {
            self.topology_dirty = false;
        }
        log::info!(
            target: "terrain",
            "terrain mesh rebuilt in {:.3}s ({}/{} sections, {})",
            t0.elapsed().as_secs_f64(),
            report.built,
            report.sections,
            if create { "create" } else { "update" }
        );
        report
    }

    fn rebuild_border(&mut self, force_create: bool) {
        let create = force_create || self.topology_dirty || !self.border.is_created();
        let data = build_border(&self.field, self.config.height_scale, create);
        if create {
            self.border.create(data);
        } else {
            self.border.update(data);
        }
    }
}
