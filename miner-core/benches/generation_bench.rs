use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use miner_core::economy::{Economy, PlayerStats};
use miner_core::engine::{MineConfig, MineEngine};
use miner_core::generation::{CellGenerator, WorldSeed};
use miner_core::world::{GridGeometry, Viewport, WorldWindow};

fn bench_generation(c: &mut Criterion) {
    let seed = WorldSeed::default();
    c.bench_function("sample", |b| {
        b.iter(|| seed.sample(black_box(1_000), black_box(7)))
    });

    let gen = CellGenerator::default();
    c.bench_function("generate_cell", |b| {
        b.iter(|| gen.generate(black_box(250), black_box(5), black_box(0.09)))
    });

    c.bench_function("generate_row_12", |b| {
        b.iter(|| gen.generate_row(black_box(250), 12, 0.0))
    });
}

fn bench_window(c: &mut Criterion) {
    let gen = CellGenerator::default();

    c.bench_function("sync_fresh_viewport", |b| {
        b.iter(|| {
            let mut window = WorldWindow::new(GridGeometry::default());
            window.sync(
                Viewport {
                    scroll_px: black_box(56_000.0),
                    height_px: 900.0,
                },
                &gen,
                0.0,
            )
        })
    });

    // Scrolling one row at a time; each step realizes at most one new row
    c.bench_function("scroll_200_rows", |b| {
        b.iter(|| {
            let mut window = WorldWindow::new(GridGeometry::default());
            for step in 0..200u32 {
                window.sync(
                    Viewport {
                        scroll_px: f64::from(step) * 56.0,
                        height_px: 900.0,
                    },
                    &gen,
                    0.0,
                );
            }
            window.generated_row_count()
        })
    });
}

fn bench_mining(c: &mut Criterion) {
    c.bench_function("mine_first_row", |b| {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
        b.iter(|| {
            let mut engine = MineEngine::new(MineConfig::default()).unwrap();
            engine.generate_row(0);
            for col in 0..12 {
                while let Ok(outcome) = engine.swing(0, col, &mut rng) {
                    if outcome.broke {
                        break;
                    }
                }
            }
            engine.economy().currency()
        })
    });

    c.bench_function("upgrade_price_sweep", |b| {
        let eco = Economy::new(PlayerStats::default());
        b.iter(|| {
            miner_core::economy::upgrades::UpgradeId::ALL
                .iter()
                .map(|&id| eco.upgrade_price(id))
                .sum::<f64>()
        })
    });
}

criterion_group!(benches, bench_generation, bench_window, bench_mining);
criterion_main!(benches);
