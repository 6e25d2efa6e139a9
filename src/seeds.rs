use crate::MvnError;
use rand::Rng;
use tracing::trace;

/// Draw one seed per worker from the caller's uniform generator.
///
/// Produces `ncores` values uniformly from `[1, u64::MAX]`; seed `t` feeds the engine of
/// partition block `t`. All of them are drawn, up front and on the calling thread, even
/// if fewer blocks end up being used, so the consumption of `source` depends only on
/// `ncores`. The host's generator is never touched from a worker thread.
pub fn distribute_seeds<R: Rng + ?Sized>(
    source: &mut R,
    ncores: usize,
) -> Result<Vec<u64>, MvnError> {
    if ncores == 0 {
        return Err(MvnError::invalid("ncores", "must be at least 1"));
    }
    let seeds: Vec<u64> = (0..ncores)
        .map(|_| source.random_range(1..=u64::MAX))
        .collect();
    trace!(?seeds, "distributed seeds");
    Ok(seeds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn one_nonzero_seed_per_core() {
        let seeds = distribute_seeds(&mut host_rng(), 8).unwrap();
        assert_eq!(seeds.len(), 8);
        assert!(seeds.iter().all(|s| *s >= 1));

        let mut sorted = seeds.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 8, "seeds should be distinct: {seeds:?}");
    }

    #[test]
    fn same_source_state_same_seeds() {
        let a = distribute_seeds(&mut host_rng(), 4).unwrap();
        let b = distribute_seeds(&mut host_rng(), 4).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn first_seeds_do_not_depend_on_ncores() {
        let a = distribute_seeds(&mut host_rng(), 2).unwrap();
        let b = distribute_seeds(&mut host_rng(), 6).unwrap();
        assert_eq!(a[..], b[..2]);
    }

    #[test]
    fn zero_cores_is_invalid() {
        assert!(matches!(
            distribute_seeds(&mut host_rng(), 0),
            Err(MvnError::InvalidParameter { name: "ncores", .. })
        ));
    }
}
