use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use glam::Vec3;
use molvis::picking::{pick_ray, Ray};
use molvis::scene::{Aabb, SphereInstance};

/// A cubic lattice of `n^3` spheres, 1.5 apart.
fn lattice(n: u32) -> (Vec<SphereInstance>, Aabb) {
    let mut spheres = Vec::with_capacity((n * n * n) as usize);
    let mut bounds = Aabb::default();
    for x in 0..n {
        for y in 0..n {
            for z in 0..n {
                let center = Vec3::new(x as f32, y as f32, z as f32) * 1.5;
                bounds.include(center - Vec3::splat(0.5));
                bounds.include(center + Vec3::splat(0.5));
                spheres.push(SphereInstance::new(center, 0.5, [1.0; 4]));
            }
        }
    }
    (spheres, bounds)
}

fn pick_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("pick_ray");

    for n in [5_u32, 10, 20] {
        let (spheres, bounds) = lattice(n);
        let target = bounds.center();
        let hit = Ray::new(target + Vec3::new(0.0, 0.0, 100.0), -Vec3::Z);
        let miss = Ray::new(Vec3::new(-50.0, -50.0, 100.0), -Vec3::Z);

        group.bench_function(format!("{}_spheres_hit", spheres.len()), |b| {
            b.iter(|| black_box(pick_ray(&spheres, &bounds, black_box(&hit))));
        });
        group.bench_function(format!("{}_spheres_miss", spheres.len()), |b| {
            b.iter(|| black_box(pick_ray(&spheres, &bounds, black_box(&miss))));
        });
    }
    group.finish();
}

criterion_group!(benches, pick_benchmark);
criterion_main!(benches);
