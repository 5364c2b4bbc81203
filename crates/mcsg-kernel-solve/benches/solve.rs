use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mcsg_kernel_geom::Surface;
use mcsg_kernel_solve::{process_point, SolveValues};

fn surf(card: &str) -> Surface {
    card.parse().unwrap()
}

fn bench_process_point(c: &mut Criterion) {
    let planes = [surf("px 23"), surf("py 10"), surf("pz 30")];
    let line_path = [surf("px 3"), surf("py 0"), surf("so 5")];
    let general = [surf("cz 5"), surf("cx 5"), surf("pz 3")];

    c.bench_function("process_point three planes", |b| {
        b.iter(|| process_point(black_box(&planes[0]), &planes[1], &planes[2]))
    });
    c.bench_function("process_point two planes and sphere", |b| {
        b.iter(|| process_point(black_box(&line_path[0]), &line_path[1], &line_path[2]))
    });
    c.bench_function("process_point crossed cylinders", |b| {
        b.iter(|| process_point(black_box(&general[0]), &general[1], &general[2]))
    });
}

fn bench_solve_all(c: &mut Criterion) {
    let sv = SolveValues::new(
        "x^2+y^2+z^2-25".parse().unwrap(),
        "x^2+y^2-9".parse().unwrap(),
        "y".parse().unwrap(),
    );
    c.bench_function("solve_all sphere cylinder plane", |b| {
        b.iter(|| black_box(sv.clone()).solve_all())
    });
}

criterion_group!(benches, bench_process_point, bench_solve_all);
criterion_main!(benches);
