use rand::Rng;

/// Fisher-Yates shuffle into a new vector; `items` is left untouched.
pub fn shuffle<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut shuffled = items.to_vec();
    for i in (1..shuffled.len()).rev() {
        let j = rng.gen_range(0..=i);
        shuffled.swap(i, j);
    }
    shuffled
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = SmallRng::seed_from_u64(7);
        let input = vec!["a", "b", "b", "c", "d", "e"];
        let out = shuffle(&input, &mut rng);
        assert_eq!(out.len(), input.len());
        let mut sorted_in = input.clone();
        let mut sorted_out = out.clone();
        sorted_in.sort();
        sorted_out.sort();
        assert_eq!(sorted_in, sorted_out);
    }

    #[test]
    fn test_shuffle_does_not_mutate_input() {
        let mut rng = SmallRng::seed_from_u64(1);
        let input = vec![1, 2, 3, 4, 5];
        let _ = shuffle(&input, &mut rng);
        assert_eq!(input, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_shuffle_trivial_inputs() {
        let mut rng = SmallRng::seed_from_u64(3);
        assert!(shuffle::<u8, _>(&[], &mut rng).is_empty());
        assert_eq!(shuffle(&[9], &mut rng), vec![9]);
    }

    #[test]
    fn test_every_position_is_reachable() {
        // Each element of a 3-sequence should land in each slot at least once.
        let mut rng = SmallRng::seed_from_u64(42);
        let mut seen = [[false; 3]; 3];
        for _ in 0..500 {
            let out = shuffle(&[0usize, 1, 2], &mut rng);
            for (slot, &v) in out.iter().enumerate() {
                seen[v][slot] = true;
            }
        }
        assert!(seen.iter().all(|row| row.iter().all(|&s| s)));
    }
}
