use crate::{BuildReport, SectionOut};

/// Progress hooks for a build. Called on the thread that runs the build, never on workers.
pub trait BuildObserver: Send + Sync {
    fn build_started(&self, _sections: usize, _workers: usize) {}
    fn section_built(&self, _out: &SectionOut) {}
    fn build_finished(&self, _report: &BuildReport) {}
}

/// Reports progress through the `log` facade under the `build` target.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogObserver;

impl BuildObserver for LogObserver {
    fn build_started(&self, sections: usize, workers: usize) {
        log::info!(target: "build", "building {} sections on {} workers", sections, workers);
    }

    fn section_built(&self, out: &SectionOut) {
        log::debug!(
            target: "build",
            "section ({}, {}) worker={} verts={} tris={} t={}ms",
            out.coord.sx,
            out.coord.sy,
            out.worker,
            out.data.vertex_count(),
            out.data.triangle_count(),
            out.t_build_ms
        );
    }

    fn build_finished(&self, report: &BuildReport) {
        if report.cancelled {
            log::warn!(
                target: "build",
                "build cancelled after {}/{} sections ({}ms)",
                report.built,
                report.sections,
                report.t_total_ms
            );
        } else {
            log::info!(
                target: "build",
                "built {} sections in {}ms",
                report.built,
                report.t_total_ms
            );
        }
    }
}

/// Drops every notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullObserver;

impl BuildObserver for NullObserver {}
