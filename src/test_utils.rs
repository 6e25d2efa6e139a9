use ndarray::{Array1, Array2, Axis};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// Stand-in for the host's uniform generator, fixed seed.
pub fn host_rng() -> Pcg64Mcg {
    Pcg64Mcg::seed_from_u64(9)
}

/// Random, reasonably well conditioned covariance matrices: `B Bᵗ + dim * I`,
/// with the entries of `B` uniform in [-1, 1).
pub fn random_covariances(dim: usize, count: usize) -> impl Iterator<Item = Array2<f64>> {
    let mut rng = Pcg64Mcg::seed_from_u64(17);

    (0..count).map(move |_| {
        let b = Array2::from_shape_simple_fn((dim, dim), || 2.0 * rng.random::<f64>() - 1.0);
        b.dot(&b.t()) + Array2::<f64>::eye(dim) * dim as f64
    })
}

/// Column means of the rows of `m`
pub fn empirical_mean(m: &Array2<f64>) -> Array1<f64> {
    m.sum_axis(Axis(0)) / m.nrows() as f64
}

/// Sample covariance of the rows of `m`
pub fn empirical_covariance(m: &Array2<f64>) -> Array2<f64> {
    let centered = m - &empirical_mean(m);
    centered.t().dot(&centered) / (m.nrows() - 1) as f64
}

/// Pearson correlation of two equally long sequences
pub fn correlation(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len());
    let n = a.len() as f64;
    let mean_a = a.iter().sum::<f64>() / n;
    let mean_b = b.iter().sum::<f64>() / n;
    let (mut cov, mut var_a, mut var_b) = (0.0, 0.0, 0.0);
    for (x, y) in a.iter().zip(b) {
        cov += (x - mean_a) * (y - mean_b);
        var_a += (x - mean_a) * (x - mean_a);
        var_b += (y - mean_b) * (y - mean_b);
    }
    cov / (var_a * var_b).sqrt()
}
