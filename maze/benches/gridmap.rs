use criterion::{black_box, criterion_group, criterion_main, Criterion};
use maze::{search, Algorithm, GridMap, MazeParams, Point};
use rand::{rngs::StdRng, SeedableRng};

fn load_base_map_scaled(factor: usize) -> GridMap {
    let rows = 32 * factor;
    let columns = 32 * factor;
    let params = MazeParams::new(
        rows,
        columns,
        Point { row: 0, col: 0 },
        Point {
            row: rows - 1,
            col: columns - 1,
        },
        0.25,
    );

    // keep drawing until the corners are connected so every iteration does full work
    let mut rng = StdRng::seed_from_u64(1234);
    loop {
        let map = params.generate(&mut rng).unwrap();
        if search(&map, Algorithm::Bfs).path.is_some() {
            return map;
        }
    }
}

fn bench_map_scaled(c: &mut Criterion, factor: usize) {
    let map = load_base_map_scaled(factor);

    for algorithm in [Algorithm::Bfs, Algorithm::Dfs] {
        c.bench_function(&format!("{}_map_scaled_{}", algorithm, factor), |b| {
            b.iter(|| {
                let outcome = search(black_box(&map), black_box(algorithm));
                assert!(outcome.path.is_some());
            })
        });
    }
}

pub fn map_small(c: &mut Criterion) {
    bench_map_scaled(c, 1);
}

pub fn map_medium(c: &mut Criterion) {
    bench_map_scaled(c, 2);
}

pub fn map_large(c: &mut Criterion) {
    bench_map_scaled(c, 4);
}

criterion_group!(benches, map_small, map_medium, map_large);
criterion_main!(benches);
