use itertools::Itertools;
use rand::{seq::SliceRandom, Rng};

use crate::model::Face;

/// Faces for `count` tiles in sets of four, cycling through a shuffled standard
/// set. With `exclude_singleton_pairs`, a trailing lone pair joins the last set of
/// four instead of getting a face of its own.
///
/// The result is in assignment order; callers shuffle it over the board.
pub fn quadruplet_faces(rng: &mut impl Rng, count: usize, exclude_singleton_pairs: bool) -> Vec<Face> {
    let mut faces = Face::standard();
    faces.shuffle(rng);

    let mut labels: Vec<Face> = (0..count).map(|i| faces[(i / 4) % faces.len()]).collect();
    if exclude_singleton_pairs && count % 4 == 2 && count > 4 {
        let previous = labels[count - 3];
        labels[count - 2] = previous;
        labels[count - 1] = previous;
    }
    labels
}

/// One face per pair, in the order the pairs will be placed.
///
/// Small boards use a random subset of faces, each at least twice, so the same
/// face shows up on more than one pair where possible. Larger boards cycle through
/// the full standard set.
pub fn pair_faces(rng: &mut impl Rng, pairs: usize, exclude_singleton_pairs: bool) -> Vec<Face> {
    if pairs == 0 {
        return Vec::new();
    }

    let mut faces = Face::standard();
    if pairs < faces.len() * 2 {
        faces.shuffle(rng);
        let keep = if exclude_singleton_pairs {
            (pairs / 2).max(1)
        } else {
            pairs.div_ceil(2)
        };
        faces.truncate(keep);
    }

    let mut order: Vec<Face> = faces.iter().chain(faces.iter()).copied().sorted().collect();
    while order.len() < pairs {
        let mut more = faces.clone();
        more.shuffle(rng);
        order.extend(more);
    }
    order.truncate(pairs);
    order.shuffle(rng);
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::rng::seeded_rng;
    use std::collections::HashMap;

    fn counts(faces: &[Face]) -> HashMap<Face, usize> {
        faces.iter().copied().counts()
    }

    #[test]
    fn test_quadruplets_fill_standard_board() {
        let mut rng = seeded_rng(1, 0);
        let faces = quadruplet_faces(&mut rng, 136, false);
        let counts = counts(&faces);
        assert_eq!(counts.len(), 34);
        assert!(counts.values().all(|&n| n == 4));
    }

    #[test]
    fn test_quadruplets_leave_trailing_pair() {
        let mut rng = seeded_rng(2, 0);
        let faces = quadruplet_faces(&mut rng, 10, false);
        let mut sizes: Vec<usize> = counts(&faces).into_values().collect();
        sizes.sort();
        assert_eq!(sizes, vec![2, 4, 4]);
    }

    #[test]
    fn test_quadruplets_merge_trailing_pair() {
        let mut rng = seeded_rng(2, 0);
        let faces = quadruplet_faces(&mut rng, 10, true);
        let mut sizes: Vec<usize> = counts(&faces).into_values().collect();
        sizes.sort();
        assert_eq!(sizes, vec![4, 6]);
    }

    #[test]
    fn test_pair_faces_small_board() {
        let mut rng = seeded_rng(3, 0);
        let order = pair_faces(&mut rng, 6, false);
        assert_eq!(order.len(), 6);
        let counts = counts(&order);
        assert_eq!(counts.len(), 3);
        assert!(counts.values().all(|&n| n == 2));
    }

    #[test]
    fn test_pair_faces_without_singletons() {
        for seed in 0..20 {
            let mut rng = seeded_rng(seed, 0);
            let order = pair_faces(&mut rng, 7, true);
            assert_eq!(order.len(), 7);
            assert!(counts(&order).values().all(|&n| n >= 2), "seed {}", seed);
        }
    }

    #[test]
    fn test_pair_faces_full_board() {
        let mut rng = seeded_rng(4, 0);
        let order = pair_faces(&mut rng, 68, false);
        let counts = counts(&order);
        assert_eq!(counts.len(), 34);
        assert!(counts.values().all(|&n| n == 2));
    }

    #[test]
    fn test_pair_faces_large_board_cycles() {
        let mut rng = seeded_rng(5, 0);
        let order = pair_faces(&mut rng, 100, false);
        assert_eq!(order.len(), 100);
        assert!(counts(&order).values().all(|&n| n >= 2));
    }

    #[test]
    fn test_pair_faces_empty() {
        let mut rng = seeded_rng(6, 0);
        assert!(pair_faces(&mut rng, 0, false).is_empty());
    }
}
