//! Section build scheduling and collision-cook bookkeeping (engine-only).
#![forbid(unsafe_code)]

mod cancel;
mod cook;
mod observer;

use std::sync::Arc;
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender, unbounded};
use rayon::{ThreadPool, ThreadPoolBuilder};
use strata_field::{HeightField, SectionCoord, SectionLayout, SectionView};
use strata_mesh_cpu::{ComponentData, SectionParams, build_section};

pub use cancel::CancelToken;
pub use cook::{CookOutcome, CookQueue, CookTicket};
pub use observer::{BuildObserver, LogObserver, NullObserver};
pub use rayon::ThreadPoolBuildError;

pub const DEFAULT_THREADS: usize = 4;

/// What to build and how.
#[derive(Clone, Debug, PartialEq)]
pub struct BuildRequest {
    pub layout: SectionLayout,
    /// Sections to build; `None` builds every section of the layout.
    pub sections: Option<Vec<SectionCoord>>,
    pub tiling: f32,
    pub height_scale: f32,
    /// `false` rebuilds geometry only; see [`SectionParams::create_triangles`].
    pub create_triangles: bool,
}

impl BuildRequest {
    pub fn full(layout: SectionLayout) -> Self {
        Self {
            layout,
            sections: None,
            tiling: 1.0,
            height_scale: 1.0,
            create_triangles: true,
        }
    }

    /// Requested sections in row-major order, without duplicates or out-of-layout entries.
    pub fn resolve_sections(&self) -> Vec<SectionCoord> {
        match &self.sections {
            None => self.layout.coords().collect(),
            Some(list) => {
                let mut coords: Vec<SectionCoord> = list
                    .iter()
                    .copied()
                    .filter(|c| self.layout.contains(*c))
                    .collect();
                coords.sort_unstable_by_key(|c| (c.sy, c.sx));
                coords.dedup();
                coords
            }
        }
    }
}

/// One finished section, handed to the sink on the calling thread.
#[derive(Clone, Debug)]
pub struct SectionOut {
    pub coord: SectionCoord,
    /// Index of the worker stream that built it, `0..workers`.
    pub worker: usize,
    pub data: ComponentData,
    pub t_build_ms: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub sections: usize,
    pub built: usize,
    pub workers: usize,
    pub cancelled: bool,
    pub t_total_ms: u32,
}

impl BuildReport {
    pub fn skipped(&self) -> usize {
        self.sections - self.built
    }
}

/// Receives finished sections. Implemented for any `FnMut(SectionOut)`.
pub trait SectionSink {
    fn accept(&mut self, out: SectionOut);
}

impl<F: FnMut(SectionOut)> SectionSink for F {
    fn accept(&mut self, out: SectionOut) {
        self(out)
    }
}

struct SectionJob {
    coord: SectionCoord,
    view: SectionView,
    params: SectionParams,
}

/// Fixed worker pool that meshes sections in parallel.
///
/// Jobs go into one FIFO queue in row-major order, so each worker's own stream is row-major
/// while completion order across workers is unspecified. Results are drained and delivered on
/// the calling thread; the height field is only read, before any job is dispatched.
pub struct BuildScheduler {
    pool: Arc<ThreadPool>,
    threads: usize,
    observer: Arc<dyn BuildObserver>,
    cancel: CancelToken,
}

impl BuildScheduler {
    pub fn new(threads: usize) -> Result<Self, ThreadPoolBuildError> {
        let threads = threads.max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("strata-build-{i}"))
            .build()?;
        Ok(Self {
            pool: Arc::new(pool),
            threads,
            observer: Arc::new(LogObserver),
            cancel: CancelToken::new(),
        })
    }

    pub fn with_observer(mut self, observer: Arc<dyn BuildObserver>) -> Self {
        self.observer = observer;
        self
    }

    #[inline]
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Token shared with running builds; cancelling it skips the sections not yet started.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Builds the requested sections and blocks until every one has reached `sink`, or
    /// until the build is cancelled.
    pub fn run(&self, field: &HeightField, request: &BuildRequest, sink: &mut dyn SectionSink) -> BuildReport {
        let t0 = Instant::now();
        let coords = request.resolve_sections();
        let total = coords.len();
        let workers = self.threads.min(total);
        let mut report = BuildReport {
            sections: total,
            workers,
            ..BuildReport::default()
        };
        self.observer.build_started(total, workers);
        if total == 0 {
            self.observer.build_finished(&report);
            return report;
        }

        let (job_tx, job_rx) = unbounded::<SectionJob>();
        let (res_tx, res_rx) = unbounded::<SectionOut>();
        let layout = request.layout;
        let size = layout.window_size();
        for coord in coords {
            let (ox, oy) = layout.window_origin(coord);
            let (world_x, world_y) = layout.world_origin(coord);
            let job = SectionJob {
                coord,
                view: field.extract_section(ox, oy, size),
                params: SectionParams {
                    world_x,
                    world_y,
                    tiling: request.tiling,
                    height_scale: request.height_scale,
                    create_triangles: request.create_triangles,
                },
            };
            // Receiver is alive until the workers below drop it.
            let _ = job_tx.send(job);
        }
        drop(job_tx);

        for worker in 0..workers {
            let rx = job_rx.clone();
            let tx = res_tx.clone();
            let cancel = self.cancel.clone();
            self.pool.spawn(move || run_worker(worker, rx, tx, cancel));
        }
        drop(job_rx);
        drop(res_tx);

        while let Ok(out) = res_rx.recv() {
            self.observer.section_built(&out);
            sink.accept(out);
            report.built += 1;
        }

        report.cancelled = report.built < total;
        report.t_total_ms = t0.elapsed().as_millis().min(u128::from(u32::MAX)) as u32;
        self.observer.build_finished(&report);
        report
    }
}

fn run_worker(worker: usize, rx: Receiver<SectionJob>, tx: Sender<SectionOut>, cancel: CancelToken) {
    while let Ok(job) = rx.recv() {
        if cancel.is_cancelled() {
            continue;
        }
        let t0 = Instant::now();
        let data = build_section(&job.view, &job.params);
        let t_build_ms = t0.elapsed().as_millis().min(u128::from(u32::MAX)) as u32;
        let out = SectionOut {
            coord: job.coord,
            worker,
            data,
            t_build_ms,
        };
        if tx.send(out).is_err() {
            break;
        }
    }
}
