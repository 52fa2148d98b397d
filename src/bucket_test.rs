use super::*;

#[test]
fn test_new_bucket_holds_seed_pairs() {
    let bucket: Bucket<i64, i64> = Bucket::new(&[(1, 10), (2, 20)], 4);
    assert_eq!(bucket.len(), 2);
    assert_eq!(bucket.capacity(), 4);
    assert_eq!(bucket.find(1), Some(&10));
    assert_eq!(bucket.find(2), Some(&20));
    assert_eq!(bucket.find(3), None);
}

#[test]
fn test_insert_until_full_then_refuses() {
    let mut bucket: Bucket<i64, i64> = Bucket::new(&[], 2);
    assert!(bucket.insert(1, 10));
    assert!(bucket.insert(2, 20));
    assert!(!bucket.insert(3, 30));
    assert_eq!(bucket.len(), 2);
}

#[test]
fn test_update_overwrites_matching_key() {
    let mut bucket: Bucket<i64, i64> = Bucket::new(&[(1, 10)], 2);
    assert!(bucket.update(1, 99));
    assert_eq!(bucket.find(1), Some(&99));
    assert!(!bucket.update(2, 99));
}

#[test]
fn test_remove_compacts_and_reports_count() {
    let mut bucket: Bucket<i64, i64> = Bucket::new(&[(1, 10), (2, 20), (3, 30)], 3);
    assert_eq!(bucket.remove(2), 1);
    assert_eq!(bucket.len(), 2);
    assert_eq!(bucket.find(2), None);
    assert_eq!(bucket.remove(2), 0);
}

#[test]
fn test_iter_yields_all_pairs() {
    let bucket: Bucket<i64, i64> = Bucket::new(&[(1, 10), (2, 20)], 2);
    let collected: Vec<(i64, i64)> = bucket.iter().copied().collect();
    assert_eq!(collected, vec![(1, 10), (2, 20)]);
}
