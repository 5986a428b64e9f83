use std::cell::Cell;
use std::rc::Rc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use trellis_core::prelude::*;
use trellis_core::{MemoryHost, Root};

const SECTION_COUNT: usize = 4;
const ROWS_PER_SECTION: usize = 32;
const ROW_SAMPLES: &[usize] = &[8, 16, 32, 64];

fn row(section: usize, row: usize) -> Element {
    Element::component("Row", move |cx| {
        let (selected, _) = use_state(cx, || false);
        Ok(tag("li")
            .key(row)
            .attr("aria-selected", selected)
            .child(tag("span").child(format!("Item {section}-{row}")))
            .child(tag("small").child(format!("Detail {section}-{row}")))
            .into())
    })
    .with_key(row)
}

fn content(sections: usize, rows: Rc<Cell<usize>>) -> Element {
    Element::component("Content", move |_| {
        let rows = rows.get();
        Ok((0..sections)
            .map(|section| {
                Element::from(
                    tag("section")
                        .key(section)
                        .child(tag("h2").child(format!("Section {section}")))
                        .child(tag("ul").children((0..rows).map(|index| row(section, index)))),
                )
            })
            .collect())
    })
}

struct Fixture {
    root: Root<MemoryHost>,
    rows: Rc<Cell<usize>>,
}

impl Fixture {
    fn new(sections: usize, rows_per_section: usize) -> Self {
        let mut host = MemoryHost::new();
        let container = host.create_container("body");
        let rows = Rc::new(Cell::new(rows_per_section));
        let root = Root::new(host, container);
        root.render(content(sections, Rc::clone(&rows)))
            .expect("initial render");
        Self { root, rows }
    }
}

fn ui_object_count(sections: usize, rows_per_section: usize) -> usize {
    sections * (4 + rows_per_section * 5)
}

fn bench_steady_state(c: &mut Criterion) {
    let fixture = Fixture::new(SECTION_COUNT, ROWS_PER_SECTION);
    c.bench_function("rerender_unchanged", |b| {
        b.iter(|| {
            fixture.root.rerender().expect("rerender");
            fixture.root.host_mut().clear_mutations();
        });
    });
}

fn bench_row_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("rerender_row_churn");
    for &rows_per_section in ROW_SAMPLES {
        group.bench_with_input(
            BenchmarkId::new("host_nodes", ui_object_count(SECTION_COUNT, rows_per_section)),
            &rows_per_section,
            |b, &rows_per_section| {
                let fixture = Fixture::new(SECTION_COUNT, rows_per_section);
                b.iter(|| {
                    fixture.rows.set(rows_per_section - 1);
                    fixture.root.rerender().expect("shrink");
                    fixture.rows.set(rows_per_section);
                    fixture.root.rerender().expect("grow");
                    black_box(fixture.root.host_mut().take_mutations());
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_steady_state, bench_row_churn);
criterion_main!(benches);
