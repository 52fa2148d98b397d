use super::*;

#[test]
fn test_analyze_no_collisions_on_dense_sequence() {
    let keys: Vec<i64> = (0..50).collect();
    let info = analyze(&keys, 2.0).expect("a dense sequence should fit a model");
    let total: usize = info.conflicts.iter().map(|c| c.count).sum();
    assert_eq!(total, keys.len());
    // positions strictly increase between conflict records.
    for w in info.conflicts.windows(2) {
        assert!(w[0].position < w[1].position);
    }
}

#[test]
fn test_analyze_groups_collisions_by_predicted_slot() {
    // All keys map to roughly the same area of a tiny, tightly-amplified
    // slot space, forcing every key to collide in one bucket.
    let keys: Vec<i64> = vec![1, 2, 3, 4, 5];
    let info = analyze(&keys, 0.01).unwrap();
    let total: usize = info.conflicts.iter().map(|c| c.count).sum();
    assert_eq!(total, keys.len());
}

#[test]
fn test_analyze_returns_none_for_constant_keys() {
    let keys = [7_i64; 10];
    assert!(analyze(&keys, 2.0).is_none());
}

#[test]
fn test_tail_conflicts_zero_when_no_model() {
    let keys = [1_i64; 5];
    assert_eq!(tail_conflicts(&keys, 2.0), 0);
}

#[test]
fn test_tail_conflicts_reflects_heavy_collisions() {
    // A handful of evenly spread keys plus a pile of identical-ish keys
    // clustered at the high end should produce a nonzero 99th-percentile
    // tail count once enough of the batch collides.
    let mut keys: Vec<i64> = (0..20).collect();
    keys.extend(std::iter::repeat(1000).take(200));
    keys.sort_unstable();
    let tail = tail_conflicts(&keys, 2.0);
    assert!(tail > 0);
}
