use std::io::Write;

use rand::{distributions::Uniform, rngs::StdRng, SeedableRng};
use rand_distr::{Distribution, LogNormal};

use super::*;

/// A tiny `in_dim=1, hidden_dim=2, num_layers=2` flow, written to a scratch
/// file so [`FeedForwardFlow::load`] can be exercised end-to-end. The
/// first-layer weights are small enough that `tanh` stays in its
/// compressive range across a wide key span, which is what lets the
/// auto-switch tests below actually separate a skewed key set from a
/// near-uniform one instead of just reproducing the raw ordering.
fn write_scratch_flow(tag: &str) -> std::path::PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("afli_nf_test_{}_{}.txt", std::process::id(), tag));
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "1 2 2").unwrap();
    writeln!(file, "0.0 1.0").unwrap();
    writeln!(file, "1 2").unwrap();
    writeln!(file, "0.00005 0.00005").unwrap();
    writeln!(file, "2 1").unwrap();
    writeln!(file, "1.0 1.0").unwrap();
    path
}

/// `n` unique keys drawn from a heavily right-skewed lognormal distribution
/// (many small keys, a thin tail of very large ones) — the shape the flow
/// transform is meant to help with.
fn lognormal_keys(n: usize, seed: u64) -> Vec<i64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let dist = LogNormal::new(0.0_f64, 2.0_f64).unwrap();
    let mut seen = std::collections::BTreeSet::new();
    while seen.len() < n {
        let k = (dist.sample(&mut rng) * 1000.0) as i64;
        seen.insert(k);
    }
    seen.into_iter().collect()
}

/// `n` unique keys drawn uniformly over a wide range — a distribution the
/// raw linear model already fits well, so the flow shouldn't help.
fn uniform_keys(n: usize, seed: u64) -> Vec<i64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let dist = Uniform::new(0_i64, 2_000_000_i64);
    let mut seen = std::collections::BTreeSet::new();
    while seen.len() < n {
        seen.insert(dist.sample(&mut rng));
    }
    seen.into_iter().collect()
}

#[test]
fn test_flow_load_and_transform_batch() {
    let path = write_scratch_flow("transform_batch");
    let flow = FeedForwardFlow::load(&path).unwrap();
    assert_eq!(flow.in_dim(), 1);

    let batch = [0.0, 1.0, 2.0, -1.0];
    let out = flow.transform_batch(&batch);
    assert_eq!(out.len(), batch.len());
    for (&k, &t) in batch.iter().zip(out.iter()) {
        assert_eq!(t, flow.transform(k));
    }

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_auto_switch_enables_on_skewed_keys() {
    let path = write_scratch_flow("auto_switch_skewed");
    let mut nfl: Nfl<i64, i64> = Nfl::new(&path, 64).unwrap();

    let keys = lognormal_keys(500, 42);
    let pairs: Vec<(i64, i64)> = keys.into_iter().enumerate().map(|(i, k)| (k, i as i64)).collect();

    let bucket_size = nfl.auto_switch(&pairs);
    assert!(
        nfl.enabled(),
        "expected the flow to win on a heavily skewed key set"
    );

    nfl.bulk_load(&pairs, bucket_size.max(1) as usize, 0);
    nfl.transform(&pairs[..10.min(pairs.len())]);
    for i in 0..10.min(pairs.len()) {
        assert!(nfl.find(i).is_some());
    }

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_auto_switch_disables_on_near_uniform_keys() {
    let path = write_scratch_flow("auto_switch_uniform");
    let mut nfl: Nfl<i64, i64> = Nfl::new(&path, 64).unwrap();

    let keys = uniform_keys(2000, 7);
    let pairs: Vec<(i64, i64)> = keys.into_iter().enumerate().map(|(i, k)| (k, i as i64)).collect();

    let bucket_size = nfl.auto_switch(&pairs);
    assert!(
        !nfl.enabled(),
        "expected the raw key space to already be well-fit by the linear model"
    );

    nfl.bulk_load(&pairs, bucket_size.max(1) as usize, 0);
    nfl.transform(&pairs[..10.min(pairs.len())]);
    for i in 0..10.min(pairs.len()) {
        assert!(nfl.find(i).is_some());
    }

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_insert_update_remove_through_wrapper() {
    let path = write_scratch_flow("insert_update_remove");
    let mut nfl: Nfl<i64, i64> = Nfl::new(&path, 8).unwrap();

    let pairs: Vec<(i64, i64)> = (0..50).map(|i| (i, i)).collect();
    let bucket_size = nfl.auto_switch(&pairs);
    nfl.bulk_load(&pairs, bucket_size.max(1) as usize, 0);

    nfl.transform(&[(5, 5)]);
    assert_eq!(nfl.find(0), Some(5));

    nfl.transform(&[(5, 500)]);
    assert!(nfl.update(0));
    nfl.transform(&[(5, 0)]);
    assert_eq!(nfl.find(0), Some(500));

    assert_eq!(nfl.remove(0), 1);
    assert_eq!(nfl.find(0), None);

    std::fs::remove_file(&path).ok();
}
