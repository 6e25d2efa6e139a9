use criterion::{Criterion, black_box, criterion_group, criterion_main};
use mvnfast::Mvn;
use mvnfast::ndarray::Array2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

// d x d covariance with 1 on the diagonal and 0.3 elsewhere
fn equicorrelated(d: usize) -> Array2<f64> {
    Array2::from_shape_fn((d, d), |(i, j)| if i == j { 1.0 } else { 0.3 })
}

fn random_points(n: usize, d: usize) -> Array2<f64> {
    let mut rng = Pcg64Mcg::seed_from_u64(9);
    Array2::from_shape_simple_fn((n, d), || 4.0 * rng.random::<f64>() - 2.0)
}

fn sample_bench(c: &mut Criterion) {
    let d = 10;
    let mvn = Mvn::new(&vec![0.0; d], equicorrelated(d).view(), false).unwrap();
    let mut rng = Pcg64Mcg::seed_from_u64(9);
    let mut out = Array2::zeros((10_000, d));

    for ncores in [1, 4] {
        c.bench_function(&format!("sample_into 10000x{d}, ncores = {ncores}"), |b| {
            b.iter(|| mvn.sample_into(black_box(out.view_mut()), ncores, &mut rng).unwrap())
        });
    }
}

fn density_bench(c: &mut Criterion) {
    let d = 10;
    let mvn = Mvn::new(&vec![0.0; d], equicorrelated(d).view(), false).unwrap();
    let x = random_points(10_000, d);

    for ncores in [1, 4] {
        c.bench_function(&format!("density 10000x{d}, ncores = {ncores}"), |b| {
            b.iter(|| mvn.density(black_box(x.view()), true, ncores).unwrap())
        });
    }
}

fn mahalanobis_bench(c: &mut Criterion) {
    let d = 10;
    let mvn = Mvn::new(&vec![0.0; d], equicorrelated(d).view(), false).unwrap();
    let x = random_points(10_000, d);
    c.bench_function(&format!("mahalanobis 10000x{d}"), |b| {
        b.iter(|| mvn.mahalanobis(black_box(x.view()), 1).unwrap())
    });
}

fn factor_bench(c: &mut Criterion) {
    let cov = equicorrelated(50);
    c.bench_function("resolve_factor 50x50", |b| {
        b.iter(|| mvnfast::resolve_factor(black_box(cov.view()), false).unwrap())
    });
}

criterion_group!(sampling, sample_bench);

criterion_group!(evaluation, density_bench, mahalanobis_bench, factor_bench);

criterion_main!(sampling, evaluation);
