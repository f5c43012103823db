//! Stratified partitioning.
//!
//! Fire events are rare, so an unstratified split risks a test partition
//! with almost no positive rows. Both the train/test split and the
//! cross-validation folds keep class proportions intact.

use std::collections::BTreeMap;

use ndarray::Array1;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::TrainError;

/// Split row indices into (train, test), stratified by target class.
///
/// Each class contributes `round(count * test_size)` rows to the test
/// partition, clamped so that a class with at least two members appears in
/// both partitions. Deterministic for a fixed seed.
pub fn stratified_split(
    targets: &Array1<usize>,
    test_size: f64,
    seed: u64,
) -> Result<(Vec<usize>, Vec<usize>), TrainError> {
    let mut train = Vec::new();
    let mut test = Vec::new();

    let mut rng = StdRng::seed_from_u64(seed);
    for (_, mut indices) in group_by_class(targets) {
        indices.shuffle(&mut rng);

        let count = indices.len();
        let mut n_test = (count as f64 * test_size).round() as usize;
        if count >= 2 {
            n_test = n_test.clamp(1, count - 1);
        } else {
            n_test = 0;
        }

        test.extend_from_slice(&indices[..n_test]);
        train.extend_from_slice(&indices[n_test..]);
    }

    train.sort_unstable();
    test.sort_unstable();
    Ok((train, test))
}

/// Assign every row to one of `k` folds, stratified by target class.
/// Fails when any class has fewer members than the fold count.
pub fn stratified_folds(
    targets: &Array1<usize>,
    k: usize,
    seed: u64,
) -> Result<Vec<usize>, TrainError> {
    let mut assignment = vec![0usize; targets.len()];

    let mut rng = StdRng::seed_from_u64(seed);
    for (class, mut indices) in group_by_class(targets) {
        if indices.len() < k {
            return Err(TrainError::Stratification {
                class,
                count: indices.len(),
                required: k,
            });
        }
        indices.shuffle(&mut rng);
        for (position, index) in indices.into_iter().enumerate() {
            assignment[index] = position % k;
        }
    }

    Ok(assignment)
}

fn group_by_class(targets: &Array1<usize>) -> BTreeMap<usize, Vec<usize>> {
    let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (index, class) in targets.iter().enumerate() {
        groups.entry(*class).or_default().push(index);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets(negatives: usize, positives: usize) -> Array1<usize> {
        let mut values = vec![0usize; negatives];
        values.extend(std::iter::repeat(1).take(positives));
        Array1::from_vec(values)
    }

    fn class_fraction(targets: &Array1<usize>, indices: &[usize]) -> f64 {
        let positives = indices.iter().filter(|&&i| targets[i] == 1).count();
        positives as f64 / indices.len() as f64
    }

    #[test]
    fn test_split_is_disjoint_and_complete() {
        let y = targets(30, 10);
        let (train, test) = stratified_split(&y, 0.25, 42).unwrap();

        let mut all: Vec<usize> = train.iter().chain(test.iter()).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..40).collect::<Vec<_>>());
    }

    #[test]
    fn test_split_preserves_class_proportions() {
        let y = targets(80, 20);
        let (train, test) = stratified_split(&y, 0.2, 7).unwrap();

        assert!((class_fraction(&y, &train) - 0.2).abs() < 0.05);
        assert!((class_fraction(&y, &test) - 0.2).abs() < 0.05);
    }

    #[test]
    fn test_split_is_deterministic() {
        let y = targets(30, 10);
        assert_eq!(
            stratified_split(&y, 0.25, 42).unwrap(),
            stratified_split(&y, 0.25, 42).unwrap()
        );
    }

    #[test]
    fn test_both_classes_present_in_both_partitions() {
        let y = targets(20, 4);
        let (train, test) = stratified_split(&y, 0.2, 1).unwrap();

        for indices in [&train, &test] {
            assert!(indices.iter().any(|&i| y[i] == 0));
            assert!(indices.iter().any(|&i| y[i] == 1));
        }
    }

    #[test]
    fn test_folds_cover_all_classes() {
        let y = targets(12, 6);
        let assignment = stratified_folds(&y, 3, 9).unwrap();
        assert_eq!(assignment.len(), 18);

        for fold in 0..3 {
            let in_fold: Vec<usize> = (0..18).filter(|&i| assignment[i] == fold).collect();
            assert!(in_fold.iter().any(|&i| y[i] == 0));
            assert!(in_fold.iter().any(|&i| y[i] == 1));
        }
    }

    #[test]
    fn test_folds_fail_on_tiny_class() {
        let y = targets(10, 2);
        let err = stratified_folds(&y, 3, 0).unwrap_err();
        assert!(matches!(
            err,
            TrainError::Stratification {
                class: 1,
                count: 2,
                required: 3
            }
        ));
    }
}
