use std::sync::{Arc, Mutex};

use strata_field::{HeightField, SectionCoord, SectionLayout};
use strata_geom::Vec3;
use strata_noise::NoiseParams;
use strata_runtime::{BuildObserver, BuildReport, BuildRequest, BuildScheduler, SectionOut};

fn noisy(layout: &SectionLayout, seed: u64) -> HeightField {
    let (w, h) = layout.field_size();
    let mut f = HeightField::new(w, h);
    strata_noise::generate(&mut f, seed, &NoiseParams::default());
    f
}

fn run_all(threads: usize, field: &HeightField, request: &BuildRequest) -> (Vec<SectionOut>, BuildReport) {
    let scheduler = BuildScheduler::new(threads).expect("pool");
    let mut outs = Vec::new();
    let report = scheduler.run(field, request, &mut |out: SectionOut| outs.push(out));
    (outs, report)
}

fn by_coord(mut outs: Vec<SectionOut>) -> Vec<SectionOut> {
    outs.sort_by_key(|o| (o.coord.sy, o.coord.sx));
    outs
}

#[test]
fn pool_size_does_not_change_output() {
    let layout = SectionLayout::new(9, 3, 3);
    let field = noisy(&layout, 11);
    let request = BuildRequest {
        height_scale: 12.0,
        tiling: 0.25,
        ..BuildRequest::full(layout)
    };
    let (one, r1) = run_all(1, &field, &request);
    let (four, r4) = run_all(4, &field, &request);
    assert_eq!(r1.workers, 1);
    assert_eq!(r4.workers, 4);
    let one = by_coord(one);
    let four = by_coord(four);
    assert_eq!(one.len(), 9);
    for (a, b) in one.iter().zip(&four) {
        assert_eq!(a.coord, b.coord);
        assert_eq!(a.data, b.data);
    }
}

#[test]
fn every_section_built_exactly_once() {
    let layout = SectionLayout::new(5, 4, 3);
    let field = noisy(&layout, 3);
    let (outs, report) = run_all(4, &field, &BuildRequest::full(layout));
    assert_eq!(report.sections, 12);
    assert_eq!(report.built, 12);
    assert!(!report.cancelled);
    let mut coords: Vec<_> = outs.iter().map(|o| o.coord).collect();
    coords.sort_by_key(|c| (c.sy, c.sx));
    coords.dedup();
    assert_eq!(coords, layout.coords().collect::<Vec<_>>());
}

#[test]
fn each_worker_stream_is_row_major() {
    let layout = SectionLayout::new(17, 5, 4);
    let field = noisy(&layout, 5);
    let (outs, report) = run_all(3, &field, &BuildRequest::full(layout));
    assert_eq!(report.built, 20);
    for worker in 0..report.workers {
        let stream: Vec<usize> = outs
            .iter()
            .filter(|o| o.worker == worker)
            .map(|o| layout.index_of(o.coord))
            .collect();
        assert!(stream.windows(2).all(|w| w[0] < w[1]), "worker {worker}: {stream:?}");
    }
}

#[test]
fn pool_is_capped_by_section_count() {
    let layout = SectionLayout::new(5, 2, 1);
    let field = noisy(&layout, 1);
    let (outs, report) = run_all(8, &field, &BuildRequest::full(layout));
    assert_eq!(report.workers, 2);
    assert!(outs.iter().all(|o| o.worker < 2));
}

#[test]
fn flat_two_by_one_field_faces_up_everywhere() {
    let layout = SectionLayout::new(5, 2, 1);
    let (w, h) = layout.field_size();
    let field = HeightField::new(w, h);
    let (outs, _) = run_all(4, &field, &BuildRequest::full(layout));
    assert_eq!(outs.len(), 2);
    for out in outs {
        assert_eq!(out.data.vertex_count(), 25);
        assert_eq!(out.data.triangles.len(), 96);
        assert!(out.data.normals.iter().all(|&n| n == Vec3::Z));
    }
}

#[test]
fn subset_requests_are_sorted_deduplicated_and_clipped() {
    let layout = SectionLayout::new(5, 3, 2);
    let field = noisy(&layout, 9);
    let request = BuildRequest {
        sections: Some(vec![
            SectionCoord::new(2, 1),
            SectionCoord::new(0, 0),
            SectionCoord::new(2, 1),
            SectionCoord::new(7, 0),
        ]),
        ..BuildRequest::full(layout)
    };
    assert_eq!(
        request.resolve_sections(),
        vec![SectionCoord::new(0, 0), SectionCoord::new(2, 1)]
    );
    let (outs, report) = run_all(4, &field, &request);
    assert_eq!(report.sections, 2);
    assert_eq!(by_coord(outs).iter().map(|o| o.coord).collect::<Vec<_>>(), request.resolve_sections());
}

#[test]
fn empty_request_builds_nothing() {
    let layout = SectionLayout::new(5, 2, 2);
    let field = noisy(&layout, 0);
    let request = BuildRequest {
        sections: Some(Vec::new()),
        ..BuildRequest::full(layout)
    };
    let (outs, report) = run_all(4, &field, &request);
    assert!(outs.is_empty());
    assert_eq!(report.workers, 0);
    assert!(!report.cancelled);
}

#[test]
fn update_only_request_carries_no_indices() {
    let layout = SectionLayout::new(5, 2, 2);
    let field = noisy(&layout, 2);
    let request = BuildRequest {
        create_triangles: false,
        ..BuildRequest::full(layout)
    };
    let (outs, _) = run_all(2, &field, &request);
    assert!(outs.iter().all(|o| o.data.triangles.is_empty() && o.data.vertex_count() == 25));
}

#[test]
fn cancelled_token_skips_queued_sections() {
    let layout = SectionLayout::new(5, 3, 3);
    let field = noisy(&layout, 4);
    let scheduler = BuildScheduler::new(2).expect("pool");
    scheduler.cancel_token().cancel();
    let mut delivered = 0;
    let report = scheduler.run(&field, &BuildRequest::full(layout), &mut |_: SectionOut| delivered += 1);
    assert_eq!(delivered, 0);
    assert_eq!(report.built, 0);
    assert_eq!(report.skipped(), 9);
    assert!(report.cancelled);

    scheduler.cancel_token().reset();
    let report = scheduler.run(&field, &BuildRequest::full(layout), &mut |_: SectionOut| {});
    assert_eq!(report.built, 9);
    assert!(!report.cancelled);
}

#[test]
fn cancelling_from_the_sink_stops_the_build() {
    let layout = SectionLayout::new(65, 6, 6);
    let field = noisy(&layout, 8);
    let scheduler = BuildScheduler::new(1).expect("pool");
    let token = scheduler.cancel_token();
    let mut seen = Vec::new();
    let report = scheduler.run(&field, &BuildRequest::full(layout), &mut |out: SectionOut| {
        token.cancel();
        seen.push(out.coord);
    });
    assert_eq!(report.built, seen.len());
    assert!(report.built >= 1);
    let mut unique = seen.clone();
    unique.dedup();
    assert_eq!(unique, seen);
}

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<String>>,
}

impl BuildObserver for Recorder {
    fn build_started(&self, sections: usize, workers: usize) {
        self.events.lock().unwrap().push(format!("start {sections} {workers}"));
    }

    fn section_built(&self, out: &SectionOut) {
        self.events.lock().unwrap().push(format!("built {} {}", out.coord.sx, out.coord.sy));
    }

    fn build_finished(&self, report: &BuildReport) {
        self.events.lock().unwrap().push(format!("done {}", report.built));
    }
}

#[test]
fn observer_sees_every_section() {
    let layout = SectionLayout::new(5, 2, 2);
    let field = noisy(&layout, 6);
    let recorder = Arc::new(Recorder::default());
    let scheduler = BuildScheduler::new(4).expect("pool").with_observer(recorder.clone());
    scheduler.run(&field, &BuildRequest::full(layout), &mut |_: SectionOut| {});
    let events = recorder.events.lock().unwrap();
    assert_eq!(events.first().map(String::as_str), Some("start 4 4"));
    assert_eq!(events.last().map(String::as_str), Some("done 4"));
    assert_eq!(events.iter().filter(|e| e.starts_with("built")).count(), 4);
}
