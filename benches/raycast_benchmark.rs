// benches/raycast_benchmark.rs
use std::time::Duration;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use glam::DVec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use grid_raycaster::config::EngineConfig;
use grid_raycaster::core::level::LevelSpec;
use grid_raycaster::core::maze::{TileMap, default_map};
use grid_raycaster::core::player::Player;
use grid_raycaster::engine::Engine;
use grid_raycaster::render::casters::RayCaster;
use grid_raycaster::render::textures::TextureManager;

/// Walled border, roughly one interior cell in five solid.
fn random_map(rng: &mut impl Rng, cols: usize, rows: usize) -> TileMap {
    let grid: Vec<Vec<u32>> = (0..rows)
        .map(|j| {
            (0..cols)
                .map(|i| {
                    let border = i == 0 || j == 0 || i == cols - 1 || j == rows - 1;
                    if border || rng.gen_range(0..5) == 0 { rng.gen_range(1..=5) } else { 0 }
                })
                .collect()
        })
        .collect();
    TileMap::from_rows(&grid)
}

fn raycast_benchmark_fn(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(7);
    let cfg = EngineConfig::default();

    let map = random_map(&mut rng, 64, 64);
    let origins: Vec<(DVec2, f64)> = map
        .free_cells()
        .take(100)
        .map(|cell| (cell.center(), rng.gen_range(0.0..std::f64::consts::TAU)))
        .collect();

    let mut group = c.benchmark_group("Raycast");

    group.bench_function("cast_800_rays_random_64x64", |b| {
        let mut caster = RayCaster::new();
        let mut it = origins.iter().cycle();
        b.iter(|| {
            let &(origin, angle) = it.next().unwrap();
            caster.cast(black_box(&cfg), origin, angle, black_box(&map)).len()
        })
    });

    group.bench_function("full_frame_default_level", |b| {
        let map = default_map();
        let mut tm = TextureManager::for_map(cfg.texture_size, "assets/textures", &map, cfg.fallback_texture);
        let mut objects = LevelSpec::builtin()
            .populate(&mut tm, "assets/sprites", Duration::ZERO)
            .unwrap();
        let mut engine = Engine::for_map(cfg.clone(), &map, &tm).unwrap();
        let mut player = Player::new(1.5, 5.0, 0.0);
        let mut t = Duration::ZERO;
        b.iter(|| {
            player.angle = (player.angle + 0.01) % std::f64::consts::TAU;
            t += Duration::from_millis(16);
            engine.update(&player, &map, &mut objects, &tm, t);
            black_box(engine.objects_to_render().len())
        })
    });
    group.finish();
}

criterion_group!(benches, raycast_benchmark_fn);
criterion_main!(benches);
